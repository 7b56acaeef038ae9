//! Amadeus self-service API client
//!
//! Covers the three endpoints the service proxies: flight-offers search,
//! hotel-offers search by city, and airport/city location lookup. Requests
//! authenticate with an OAuth2 client-credentials token that is cached
//! in-process until shortly before it expires.
//!
//! Calls are not retried; failures are logged with enough context to
//! diagnose and surface to the caller as `ProviderError`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::error::ProviderError;
use crate::airports::{AirportLookup, AirportRecord};
use crate::models::{FlightOffer, HotelOffer};

const PROVIDER: &str = "amadeus";

/// Refresh the token this long before the server-side expiry.
const TOKEN_EXPIRY_MARGIN_SECS: i64 = 30;

/// Configuration for the Amadeus client.
#[derive(Debug, Clone)]
pub struct AmadeusClientConfig {
    pub client_id: String,
    pub client_secret: String,
    /// Base URL for the API (test or production environment)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl AmadeusClientConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url: "https://test.api.amadeus.com".to_string(),
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

#[derive(Debug)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Client for the Amadeus self-service APIs.
pub struct AmadeusClient {
    http: Client,
    config: AmadeusClientConfig,
    token: Mutex<Option<CachedToken>>,
}

/// Parameters for a flight-offers search.
#[derive(Debug, Clone)]
pub struct FlightSearchParams {
    pub origin: String,
    pub destination: String,
    /// Departure date, YYYY-MM-DD
    pub departure_date: String,
    /// Return date for round trips, YYYY-MM-DD
    pub return_date: Option<String>,
    pub adults: u32,
    pub max_results: u32,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

/// One entry of the reference-data locations response.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LocationDto {
    pub name: String,
    pub iata_code: String,
    #[serde(default)]
    pub address: LocationAddress,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LocationAddress {
    pub city_name: Option<String>,
    pub city_code: Option<String>,
    pub country_name: Option<String>,
}

impl AmadeusClient {
    /// Create a new Amadeus client.
    pub fn new(config: AmadeusClientConfig) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("PackAndGo/0.1.0")
            .build()
            .map_err(|e| ProviderError::http(PROVIDER, e))?;

        Ok(Self {
            http,
            config,
            token: Mutex::new(None),
        })
    }

    /// Search flight offers between two airports.
    #[instrument(skip(self), fields(origin = %params.origin, destination = %params.destination))]
    pub async fn flight_offers(
        &self,
        params: &FlightSearchParams,
    ) -> Result<Vec<FlightOffer>, ProviderError> {
        info!(
            "Flight search: {} -> {} departing {}",
            params.origin, params.destination, params.departure_date
        );

        let mut query: Vec<(&str, String)> = vec![
            ("originLocationCode", params.origin.clone()),
            ("destinationLocationCode", params.destination.clone()),
            ("departureDate", params.departure_date.clone()),
            ("adults", params.adults.to_string()),
            ("max", params.max_results.to_string()),
        ];
        if let Some(return_date) = &params.return_date {
            query.push(("returnDate", return_date.clone()));
        }

        let url = format!("{}/v2/shopping/flight-offers", self.config.base_url);
        let envelope: DataEnvelope<FlightOffer> = self.get_json(&url, &query).await?;

        info!("Flight search returned {} offers", envelope.data.len());
        Ok(envelope.data)
    }

    /// Search hotel offers in a city.
    #[instrument(skip(self))]
    pub async fn hotel_offers(
        &self,
        city_code: &str,
        check_in_date: &str,
        check_out_date: &str,
    ) -> Result<Vec<HotelOffer>, ProviderError> {
        info!(
            "Hotel search in {} from {} to {}",
            city_code, check_in_date, check_out_date
        );

        let query = [
            ("cityCode", city_code.to_string()),
            ("checkInDate", check_in_date.to_string()),
            ("checkOutDate", check_out_date.to_string()),
        ];

        let url = format!("{}/v2/shopping/hotel-offers", self.config.base_url);
        let envelope: DataEnvelope<HotelOffer> = self.get_json(&url, &query).await?;

        info!("Hotel search returned {} offers", envelope.data.len());
        Ok(envelope.data)
    }

    /// Look up airports and cities by IATA code or keyword.
    #[instrument(skip(self))]
    pub async fn locations(&self, keyword: &str) -> Result<Vec<LocationDto>, ProviderError> {
        let query = [
            ("subType", "AIRPORT,CITY".to_string()),
            ("keyword", keyword.to_string()),
        ];

        let url = format!("{}/v1/reference-data/locations", self.config.base_url);
        let envelope: DataEnvelope<LocationDto> = self.get_json(&url, &query).await?;
        debug!(
            "Location lookup for '{}' returned {} entries",
            keyword,
            envelope.data.len()
        );
        Ok(envelope.data)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::http(PROVIDER, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            warn!("Amadeus rejected the request with {}", status);
            return Err(ProviderError::Unauthorized { provider: PROVIDER });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Amadeus API error {} on {}: {}", status, url, body);
            return Err(ProviderError::api(PROVIDER, status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::json(PROVIDER, e.to_string()))
    }

    /// Return a valid access token, fetching a fresh one when the cached
    /// token is missing or about to expire.
    async fn access_token(&self) -> Result<String, ProviderError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.access_token.clone());
            }
            debug!("Cached Amadeus token expired, requesting a new one");
        }

        let url = format!("{}/v1/security/oauth2/token", self.config.base_url);
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ProviderError::http(PROVIDER, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Unauthorized { provider: PROVIDER });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::api(PROVIDER, status.as_u16(), body));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::json(PROVIDER, e.to_string()))?;

        let expires_at =
            Utc::now() + chrono::Duration::seconds(token.expires_in - TOKEN_EXPIRY_MARGIN_SECS);
        debug!("Obtained Amadeus access token, valid until {}", expires_at);

        let access_token = token.access_token.clone();
        *cached = Some(CachedToken {
            access_token: token.access_token,
            expires_at,
        });

        Ok(access_token)
    }
}

#[async_trait::async_trait]
impl AirportLookup for AmadeusClient {
    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    async fn airports_for(&self, iata: &str) -> Result<Vec<AirportRecord>, ProviderError> {
        let locations = self.locations(iata).await?;

        Ok(locations
            .into_iter()
            .map(|location| AirportRecord {
                airport_name: location.name,
                city_name: location
                    .address
                    .city_name
                    .unwrap_or_else(|| iata.to_uppercase()),
                city_code: location.address.city_code,
                country: location.address.country_name,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AmadeusClientConfig::new("id", "secret");
        assert_eq!(config.base_url, "https://test.api.amadeus.com");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_config_with_base_url() {
        let config = AmadeusClientConfig::new("id", "secret").with_base_url("http://localhost:1");
        assert_eq!(config.base_url, "http://localhost:1");
    }

    #[test]
    fn test_location_dto_parse() {
        let raw = serde_json::json!({
            "type": "location",
            "subType": "AIRPORT",
            "name": "LISZT FERENC INTL",
            "iataCode": "BUD",
            "address": {
                "cityName": "Budapest",
                "cityCode": "BUD",
                "countryName": "Hungary",
                "countryCode": "HU"
            }
        });
        let dto: LocationDto = serde_json::from_value(raw).unwrap();
        assert_eq!(dto.iata_code, "BUD");
        assert_eq!(dto.address.city_name.as_deref(), Some("Budapest"));
        assert_eq!(dto.address.country_name.as_deref(), Some("Hungary"));
    }

    #[test]
    fn test_empty_envelope_defaults() {
        let envelope: DataEnvelope<LocationDto> = serde_json::from_str("{}").unwrap();
        assert!(envelope.data.is_empty());
    }
}
