use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use packandgo::airports::AirportResolver;
use packandgo::api::AppState;
use packandgo::booking::BookingService;
use packandgo::config::PackAndGoConfig;
use packandgo::email::SmtpNotifier;
use packandgo::providers::{
    AmadeusClient, AmadeusClientConfig, ApiNinjasClient, NinjasClientConfig,
};
use packandgo::web;

#[tokio::main]
async fn main() -> Result<()> {
    let config = PackAndGoConfig::load()?;

    init_tracing(&config);

    let amadeus_client_id = config
        .amadeus
        .client_id
        .clone()
        .context("Missing Amadeus client id (PACKANDGO_AMADEUS__CLIENT_ID)")?;
    let amadeus_client_secret = config
        .amadeus
        .client_secret
        .clone()
        .context("Missing Amadeus client secret (PACKANDGO_AMADEUS__CLIENT_SECRET)")?;
    let ninja_api_key = config
        .airports
        .api_key
        .clone()
        .context("Missing API Ninjas key (PACKANDGO_AIRPORTS__API_KEY)")?;

    let mut amadeus_config = AmadeusClientConfig::new(amadeus_client_id, amadeus_client_secret)
        .with_base_url(config.amadeus.base_url.clone());
    amadeus_config.timeout_secs = config.amadeus.timeout_seconds;
    let amadeus = Arc::new(AmadeusClient::new(amadeus_config)?);

    let mut ninjas_config =
        NinjasClientConfig::new(ninja_api_key).with_base_url(config.airports.base_url.clone());
    ninjas_config.timeout_secs = config.airports.timeout_seconds;
    let airports = Arc::new(ApiNinjasClient::new(ninjas_config)?);

    // Amadeus resolves cities with proper metropolitan codes; the airports
    // feed is the fallback when it fails or comes back empty.
    let resolver = Arc::new(AirportResolver::new(amadeus.clone(), airports.clone()));

    let notifier = Arc::new(SmtpNotifier::new(
        config.email.smtp_relay.clone(),
        config.email.from_name.clone(),
    ));

    let booking = Arc::new(BookingService::new(resolver, notifier));

    let state = AppState {
        amadeus,
        airports,
        booking,
    };

    web::run(&config.server, state).await
}

fn init_tracing(config: &PackAndGoConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
