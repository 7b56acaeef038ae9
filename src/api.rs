//! HTTP API handlers
//!
//! The operations the UI calls: airport suggestions, flight search, hotel
//! search, cost-of-living comparison and booking submission. Handlers stay
//! thin; module errors map onto status codes with a JSON error body, the
//! shape the original clients expect.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::airports::ResolutionError;
use crate::booking::{BookingError, BookingRequest, BookingService};
use crate::cost_of_living::{self, CostOfLivingResult, LookupError};
use crate::models::{BookingConfirmation, FlightOffer, HotelOffer};
use crate::providers::{
    AmadeusClient, ApiNinjasClient, FlightSearchParams, NinjaAirport, ProviderError,
};

/// Shared handles to the services behind the API.
#[derive(Clone)]
pub struct AppState {
    pub amadeus: Arc<AmadeusClient>,
    pub airports: Arc<ApiNinjasClient>,
    pub booking: Arc<BookingService>,
}

/// An API failure: a status code plus a JSON `{"error": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        tracing::error!("Provider call failed: {}", e);
        Self::new(StatusCode::BAD_GATEWAY, e.to_string())
    }
}

impl From<BookingError> for ApiError {
    fn from(e: BookingError) -> Self {
        let status = match e {
            BookingError::MissingField { .. } => StatusCode::BAD_REQUEST,
            BookingError::NotificationFailed { .. } => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, e.to_string())
    }
}

impl From<LookupError> for ApiError {
    fn from(e: LookupError) -> Self {
        let status = match e {
            LookupError::PlaceNotFound { .. } => StatusCode::NOT_FOUND,
            LookupError::InvalidIndex { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self::new(status, e.to_string())
    }
}

impl From<ResolutionError> for ApiError {
    fn from(e: ResolutionError) -> Self {
        Self::not_found(e.to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchQuery {
    pub origin_code: String,
    pub destination_code: String,
    pub date_of_departure: Option<String>,
    pub date_of_return: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelSearchQuery {
    pub city_code: String,
    pub check_in_date: String,
    pub check_out_date: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostOfLivingQuery {
    pub origin: String,
    pub destination: String,
}

/// GET /city-and-airport-search/{query} - airport suggestions for the
/// search boxes, provider response passed through.
pub async fn city_and_airport_search(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<Vec<NinjaAirport>>, ApiError> {
    let airports = state.airports.airports_by_name(&query).await?;
    Ok(Json(airports))
}

/// GET /flight-search - proxy the flight-offers search.
pub async fn flight_search(
    State(state): State<AppState>,
    Query(query): Query<FlightSearchQuery>,
) -> Result<Json<Vec<FlightOffer>>, ApiError> {
    let params = FlightSearchParams {
        origin: query.origin_code,
        destination: query.destination_code,
        departure_date: validate_departure_date(query.date_of_departure.as_deref()),
        return_date: query.date_of_return,
        adults: 1,
        max_results: 10,
    };

    let offers = state.amadeus.flight_offers(&params).await?;
    if offers.is_empty() {
        return Err(ApiError::not_found("No flights found"));
    }
    Ok(Json(offers))
}

/// GET /hotel-search - proxy the hotel-offers search. A missing check-out
/// date means a one-night stay starting at check-in.
pub async fn hotel_search(
    State(state): State<AppState>,
    Query(query): Query<HotelSearchQuery>,
) -> Result<Json<Vec<HotelOffer>>, ApiError> {
    let check_out = query
        .check_out_date
        .unwrap_or_else(|| query.check_in_date.clone());

    let offers = state
        .amadeus
        .hotel_offers(&query.city_code, &query.check_in_date, &check_out)
        .await?;
    Ok(Json(offers))
}

/// GET /cost-of-living - compare two places by name.
pub async fn cost_of_living_compare(
    Query(query): Query<CostOfLivingQuery>,
) -> Result<Json<CostOfLivingResult>, ApiError> {
    let result = cost_of_living::difference(&query.origin, &query.destination)?;
    Ok(Json(result))
}

/// POST /booking - submit a booking and dispatch the confirmation.
pub async fn submit_booking(
    State(state): State<AppState>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingConfirmation>), ApiError> {
    let confirmation = state.booking.submit_booking(request).await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

/// The departure date the upstream search accepts: the requested date when
/// it lies in the future, otherwise tomorrow. Unparsable input counts as
/// absent.
#[must_use]
pub fn validate_departure_date(requested: Option<&str>) -> String {
    let today = Utc::now().date_naive();
    let date = requested
        .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .filter(|date| *date > today)
        .unwrap_or_else(|| today + Duration::days(1));
    date.format("%Y-%m-%d").to_string()
}
