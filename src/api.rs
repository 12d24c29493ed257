//! HTTP API
//!
//! JSON endpoints under `/api`: seed locations, merged forecasts, validation
//! results, and the token-gated cron ingestion trigger.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::alerts;
use crate::config::FlycastConfig;
use crate::locations;
use crate::models::{ForecastPoint, Location};
use crate::rules::AlertRule;
use crate::validator::{DayVerdict, Verdict, validate_weather};
use crate::weather;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FlycastConfig>,
}

/// Build the `/api` router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/locations", get(list_locations))
        .route("/forecast", get(get_forecast))
        .route("/validation", get(get_validation))
        .route("/cron/ingest", post(cron_ingest))
        .with_state(state)
}

/// JSON error payload with a status code.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Missing or invalid bearer token".to_string(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn upstream(err: &anyhow::Error) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: format!("{err:#}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct LocationDto {
    pub id: u32,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f32,
    pub timezone: String,
    pub description: String,
    pub wind_directions: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl LocationDto {
    fn new(location: &Location, distance_km: Option<f64>) -> Self {
        Self {
            id: location.id,
            name: location.name.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
            elevation: location.elevation,
            timezone: location.timezone.clone(),
            description: location.description.clone(),
            wind_directions: location
                .wind_profile
                .sectors()
                .iter()
                .map(|s| s.label())
                .collect(),
            distance_km,
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

#[derive(Debug, Deserialize)]
struct NearQuery {
    lat: Option<f64>,
    lon: Option<f64>,
}

/// Seed locations, optionally sorted by distance from `?lat=&lon=`.
async fn list_locations(Query(query): Query<NearQuery>) -> Json<Vec<LocationDto>> {
    let dtos = match (query.lat, query.lon) {
        (Some(lat), Some(lon)) => locations::locations_by_distance(lat, lon)
            .into_iter()
            .map(|(location, distance)| LocationDto::new(&location, Some(distance)))
            .collect(),
        _ => locations::seed_locations()
            .iter()
            .map(|location| LocationDto::new(location, None))
            .collect(),
    };
    Json(dtos)
}

#[derive(Debug, Deserialize)]
struct LocationQuery {
    location_id: u32,
}

fn lookup_location(id: u32) -> Result<Location, ApiError> {
    locations::find_location(id)
        .ok_or_else(|| ApiError::not_found(format!("Unknown location id {id}")))
}

/// Merged forecast series for one location, served from cache when fresh.
async fn get_forecast(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<Vec<ForecastPoint>>, ApiError> {
    let location = lookup_location(query.location_id)?;
    let points = weather::get_combined_forecast(&state.config.weather, &location)
        .await
        .map_err(|err| {
            tracing::error!(location = %location.name, error = %err, "Forecast fetch failed");
            ApiError::upstream(&err)
        })?;
    Ok(Json(points))
}

#[derive(Debug, Serialize)]
struct ValidationResponse {
    location: LocationDto,
    rule: String,
    overall: Verdict,
    days: Vec<DayVerdict>,
}

/// Validation verdict for one location under its alert rule.
async fn get_validation(
    State(state): State<AppState>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<ValidationResponse>, ApiError> {
    let location = lookup_location(query.location_id)?;
    let points = weather::get_combined_forecast(&state.config.weather, &location)
        .await
        .map_err(|err| {
            tracing::error!(location = %location.name, error = %err, "Forecast fetch failed");
            ApiError::upstream(&err)
        })?;

    let rule = AlertRule::for_location(&location);
    let validation = validate_weather(&points, &rule, &location);
    Ok(Json(ValidationResponse {
        location: LocationDto::new(&location, None),
        rule: rule.name,
        overall: validation.overall,
        days: validation.days,
    }))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum IngestResult {
    Positive,
    Negative,
    Error,
}

#[derive(Debug, Serialize)]
struct IngestOutcome {
    alert_name: String,
    location: LocationDto,
    result: IngestResult,
    days: Vec<DayVerdict>,
}

/// Refresh every seed location and return the per-location outcomes.
///
/// One location failing never aborts the batch; it shows up as an `error`
/// entry instead.
async fn cron_ingest(
    State(state): State<AppState>,
    headers: axum::http::HeaderMap,
) -> Result<Json<Vec<IngestOutcome>>, ApiError> {
    let Some(secret) = state.config.server.cron_secret.as_deref() else {
        tracing::warn!("Cron ingest called but no cron secret is configured");
        return Err(ApiError::unauthorized());
    };
    let expected = format!("Bearer {secret}");
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    if presented != Some(expected.as_str()) {
        return Err(ApiError::unauthorized());
    }

    let outcomes = join_all(locations::seed_locations().into_iter().map(|location| {
        let config = Arc::clone(&state.config);
        async move {
            match ingest_location(&config, &location).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::error!(
                        location = %location.name,
                        error = %format!("{err:#}"),
                        "Ingestion failed"
                    );
                    IngestOutcome {
                        alert_name: AlertRule::for_location(&location).name,
                        location: LocationDto::new(&location, None),
                        result: IngestResult::Error,
                        days: Vec::new(),
                    }
                }
            }
        }
    }))
    .await;

    Ok(Json(outcomes))
}

async fn ingest_location(
    config: &FlycastConfig,
    location: &Location,
) -> anyhow::Result<IngestOutcome> {
    let points = weather::refresh_combined_forecast(&config.weather, location).await?;
    let rule = AlertRule::for_location(location);
    let validation = validate_weather(&points, &rule, location);

    let result = match validation.overall {
        Verdict::Positive => IngestResult::Positive,
        Verdict::Negative => IngestResult::Negative,
    };

    if result == IngestResult::Positive && alerts::alerts_configured() {
        // A failed notification is logged, not propagated; the verdict stands.
        if let Err(err) = alerts::send_flyable_alert(location, &validation).await {
            tracing::warn!(
                location = %location.name,
                error = %format!("{err:#}"),
                "Failed to send flyable alert"
            );
        }
    }

    Ok(IngestOutcome {
        alert_name: rule.name,
        location: LocationDto::new(location, None),
        result,
        days: validation.days,
    })
}
