//! Email notifications for flyable conditions
//!
//! Sends a summary mail when a location's overall verdict turns positive
//! during cron ingestion. SMTP credentials come from the environment; when
//! they are absent, alerting is simply off.

use anyhow::{Context, Result};
use lettre::{
    Message, Transport, transport::smtp::SmtpTransport,
    transport::smtp::authentication::Credentials,
};
use std::env;

use crate::models::Location;
use crate::validator::{Verdict, WeatherValidation};

/// Whether the SMTP environment is fully configured.
#[must_use]
pub fn alerts_configured() -> bool {
    env::var("FLYCAST_SMTP_ADDRESS").is_ok()
        && env::var("FLYCAST_SMTP_PASSWORD").is_ok()
        && env::var("FLYCAST_NOTIFICATION_EMAIL").is_ok()
}

fn create_mailer() -> Result<SmtpTransport> {
    let smtp_address =
        env::var("FLYCAST_SMTP_ADDRESS").context("Missing FLYCAST_SMTP_ADDRESS env var")?;
    let smtp_password =
        env::var("FLYCAST_SMTP_PASSWORD").context("Missing FLYCAST_SMTP_PASSWORD env var")?;
    let relay = env::var("FLYCAST_SMTP_RELAY").unwrap_or_else(|_| "smtp.gmail.com".to_string());

    let credentials = Credentials::new(smtp_address, smtp_password);

    let mailer = SmtpTransport::relay(&relay)?.credentials(credentials).build();

    Ok(mailer)
}

/// Send a flyable-conditions summary for a location.
pub async fn send_flyable_alert(
    location: &Location,
    validation: &WeatherValidation,
) -> Result<()> {
    let notification_email = env::var("FLYCAST_NOTIFICATION_EMAIL")
        .context("Missing FLYCAST_NOTIFICATION_EMAIL env var")?;
    let smtp_address =
        env::var("FLYCAST_SMTP_ADDRESS").context("Missing FLYCAST_SMTP_ADDRESS env var")?;

    let email = Message::builder()
        .from(
            format!("Flycast <{smtp_address}>")
                .parse()
                .context("Failed to parse from address")?,
        )
        .to(notification_email
            .parse()
            .context("Failed to parse to address")?)
        .subject(format!("Flyable conditions at {}", location.name))
        .body(format_alert_body(location, validation))?;

    let mailer = create_mailer()?;

    mailer.send(&email).context("Failed to send email")?;

    tracing::info!(location = %location.name, "Sent flyable alert email");

    Ok(())
}

fn format_alert_body(location: &Location, validation: &WeatherValidation) -> String {
    let mut lines = vec![format!(
        "The forecast for {} ({}) looks flyable.",
        location.name,
        location.format_coordinates()
    )];
    lines.push(String::new());

    for day in &validation.days {
        if day.result != Verdict::Positive {
            continue;
        }
        let intervals = if day.flyable_intervals.is_empty() {
            "all daytime hours".to_string()
        } else {
            day.flyable_intervals
                .iter()
                .map(|i| format!("{}-{}", i.start, i.end))
                .collect::<Vec<_>>()
                .join(", ")
        };
        lines.push(format!("{}: {}", day.date, intervals));
    }

    lines.push(String::new());
    lines.push("Check the conditions yourself before launching.".to_string());
    lines.join("\n")
}
