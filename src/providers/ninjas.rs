//! API Ninjas airports client
//!
//! Free-text and IATA airport lookup, authenticated with an `X-Api-Key`
//! header. Serves the airport-suggestion endpoint and doubles as the
//! secondary provider for city resolution when Amadeus fails.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::error::ProviderError;
use crate::airports::{AirportLookup, AirportRecord};

const PROVIDER: &str = "api-ninjas";

/// Default base URL for the airports API.
const DEFAULT_BASE_URL: &str = "https://api.api-ninjas.com";

/// Configuration for the API Ninjas client.
#[derive(Debug, Clone)]
pub struct NinjasClientConfig {
    /// API key for X-Api-Key header authentication
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl NinjasClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// One airport as the provider shapes it; passed through to the suggestion
/// endpoint unmodified.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NinjaAirport {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub iata: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Client for the API Ninjas airports endpoint.
pub struct ApiNinjasClient {
    http: Client,
    base_url: String,
}

impl ApiNinjasClient {
    /// Create a new API Ninjas client.
    pub fn new(config: NinjasClientConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        let api_key_header = HeaderValue::from_str(&config.api_key)
            .map_err(|_| ProviderError::api(PROVIDER, 0, "invalid API key format"))?;
        headers.insert(HeaderName::from_static("x-api-key"), api_key_header);

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("PackAndGo/0.1.0")
            .build()
            .map_err(|e| ProviderError::http(PROVIDER, e))?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Airports matching a free-text name (the search-box suggestions).
    #[instrument(skip(self))]
    pub async fn airports_by_name(&self, query: &str) -> Result<Vec<NinjaAirport>, ProviderError> {
        let url = format!(
            "{}/v1/airports?name={}",
            self.base_url,
            urlencoding::encode(query)
        );
        let airports = self.fetch(&url).await?;
        info!("Airport search for '{}' returned {} results", query, airports.len());
        Ok(airports)
    }

    /// Airports with a specific IATA code.
    #[instrument(skip(self))]
    pub async fn airports_by_iata(&self, iata: &str) -> Result<Vec<NinjaAirport>, ProviderError> {
        let url = format!(
            "{}/v1/airports?iata={}",
            self.base_url,
            urlencoding::encode(iata)
        );
        let airports = self.fetch(&url).await?;
        debug!("IATA lookup for '{}' returned {} results", iata, airports.len());
        Ok(airports)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<NinjaAirport>, ProviderError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::http(PROVIDER, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            warn!("API Ninjas rejected the request with {}", status);
            return Err(ProviderError::Unauthorized { provider: PROVIDER });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("API Ninjas error {}: {}", status, body);
            return Err(ProviderError::api(PROVIDER, status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::json(PROVIDER, e.to_string()))
    }
}

#[async_trait::async_trait]
impl AirportLookup for ApiNinjasClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    async fn airports_for(&self, iata: &str) -> Result<Vec<AirportRecord>, ProviderError> {
        let airports = self.airports_by_iata(iata).await?;

        Ok(airports
            .into_iter()
            .map(|airport| AirportRecord {
                airport_name: airport.name,
                city_name: airport.city,
                // This feed carries no metropolitan city codes; the airport
                // code itself stands in.
                city_code: None,
                country: Some(airport.country).filter(|c| !c.is_empty()),
            })
            .collect())
    }
}
