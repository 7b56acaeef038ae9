use anyhow::{Context, Result};
use lettre::{
    transport::smtp::authentication::Credentials, transport::smtp::SmtpTransport, Message,
    Transport,
};
use std::env;

use crate::models::BookingConfirmation;

/// Delivers booking confirmations to the traveler. Failure is reported back
/// to the caller, never swallowed.
#[async_trait::async_trait]
pub trait ConfirmationNotifier: Send + Sync {
    async fn deliver(&self, confirmation: &BookingConfirmation) -> Result<()>;
}

/// SMTP-backed notifier. Credentials come from the environment so they never
/// land in a config file.
pub struct SmtpNotifier {
    relay: String,
    from_name: String,
}

impl SmtpNotifier {
    pub fn new(relay: impl Into<String>, from_name: impl Into<String>) -> Self {
        Self {
            relay: relay.into(),
            from_name: from_name.into(),
        }
    }
}

fn create_mailer(relay: &str) -> Result<SmtpTransport> {
    let smtp_address = env::var("SMTP_ADDRESS").context("Missing SMTP_ADDRESS env var")?;
    let smtp_app_password =
        env::var("SMTP_APP_PASSWORD").context("Missing SMTP_APP_PASSWORD env var")?;

    let credentials = Credentials::new(smtp_address, smtp_app_password);

    let mailer = SmtpTransport::relay(relay)?.credentials(credentials).build();

    Ok(mailer)
}

/// Subject line for a confirmation email.
#[must_use]
pub fn confirmation_subject(confirmation: &BookingConfirmation) -> String {
    match &confirmation.destination_city {
        Some(city) => format!("Your trip to {} is booked", city),
        None => "Your trip is booked".to_string(),
    }
}

/// Plain-text body summarizing the booking. Pure so it can be tested
/// without a mail server.
#[must_use]
pub fn confirmation_body(confirmation: &BookingConfirmation) -> String {
    let mut body = format!(
        "Hi {},\n\nyour booking is confirmed.\n\nFlight {}: total {} {}\n",
        confirmation.traveler_name,
        confirmation.flight.id,
        confirmation.flight.price.total,
        confirmation.flight.price.currency,
    );

    body.push_str(&format!("Hotel: {}\n", confirmation.hotel.hotel.name));
    if let Some(stay) = confirmation.hotel.selected_stay() {
        body.push_str(&format!(
            "Stay: {} to {}, total {} {}\n",
            stay.check_in_date, stay.check_out_date, stay.price.total, stay.price.currency
        ));
    }

    if let Some(comparison) = &confirmation.cost_of_living {
        let origin = confirmation.origin_city.as_deref().unwrap_or("your origin");
        let destination = confirmation
            .destination_city
            .as_deref()
            .unwrap_or("your destination");
        let diff = comparison.percentage_difference;
        if diff > 0.0 {
            body.push_str(&format!(
                "\nHeads up: {destination} is about {diff:.0}% more expensive than {origin}.\n"
            ));
        } else if diff < 0.0 {
            body.push_str(&format!(
                "\nGood news: {destination} is about {:.0}% cheaper than {origin}.\n",
                -diff
            ));
        } else {
            body.push_str(&format!(
                "\nPrices in {destination} are about the same as in {origin}.\n"
            ));
        }
    }

    body.push_str("\nWe will reach you at ");
    body.push_str(&confirmation.traveler_phone);
    body.push_str(" if anything changes.\n\nSafe travels,\nPackAndGo");
    body
}

#[async_trait::async_trait]
impl ConfirmationNotifier for SmtpNotifier {
    async fn deliver(&self, confirmation: &BookingConfirmation) -> Result<()> {
        let smtp_address = env::var("SMTP_ADDRESS").context("Missing SMTP_ADDRESS env var")?;

        let email = Message::builder()
            .from(
                format!("{} <{}>", self.from_name, smtp_address)
                    .parse()
                    .context("Failed to parse from address")?,
            )
            .to(confirmation
                .traveler_email
                .parse()
                .context("Failed to parse traveler address")?)
            .subject(confirmation_subject(confirmation))
            .body(confirmation_body(confirmation))?;

        let mailer = create_mailer(&self.relay)?;

        mailer
            .send(&email)
            .context("Failed to send confirmation email")?;

        tracing::info!(
            "Sent booking confirmation to {}",
            confirmation.traveler_email
        );

        Ok(())
    }
}
