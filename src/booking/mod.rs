//! Booking orchestration
//!
//! Combines a selected flight offer, a selected hotel offer and traveler
//! contact details into a confirmation record, enriched with resolved city
//! names and a cost-of-living comparison, and hands it to the notification
//! collaborator. Nothing is persisted: a failed enrichment degrades the
//! confirmation, it never aborts the booking.

use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::airports::{AirportResolver, ResolvedCity};
use crate::cost_of_living::{self, CostOfLivingResult, LookupError};
use crate::email::ConfirmationNotifier;
use crate::models::{BookingConfirmation, FlightOffer, HotelOffer, TravelerInfo};

/// Errors from a booking submission.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BookingError {
    /// A required part of the submission is absent or blank
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    /// The confirmation was assembled but could not be delivered. The
    /// booking itself is still logically valid; nothing is rolled back.
    #[error("confirmation notification failed: {message}")]
    NotificationFailed { message: String },
}

/// A booking submission as the web layer hands it over. Offer and traveler
/// fields are optional here so presence is validated in one place, with a
/// structured error instead of a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub flight: Option<FlightOffer>,
    pub hotel: Option<HotelOffer>,
    pub traveler: Option<TravelerInfo>,
}

/// Orchestrates booking submissions.
pub struct BookingService {
    resolver: Arc<AirportResolver>,
    notifier: Arc<dyn ConfirmationNotifier>,
}

impl BookingService {
    pub fn new(resolver: Arc<AirportResolver>, notifier: Arc<dyn ConfirmationNotifier>) -> Self {
        Self { resolver, notifier }
    }

    /// Submit a booking: validate presence, resolve cities, estimate the
    /// cost-of-living difference, assemble the confirmation and dispatch
    /// exactly one notification.
    pub async fn submit_booking(
        &self,
        request: BookingRequest,
    ) -> Result<BookingConfirmation, BookingError> {
        let flight = request
            .flight
            .ok_or(BookingError::MissingField { field: "flight" })?;
        let hotel = request
            .hotel
            .ok_or(BookingError::MissingField { field: "hotel" })?;
        let traveler = request
            .traveler
            .ok_or(BookingError::MissingField { field: "traveler" })?;
        validate_traveler(&traveler)?;

        info!(
            "Booking submission for {} (flight {}, hotel {})",
            traveler.name, flight.id, hotel.hotel.name
        );

        // Origin is the first segment of the first itinerary; destination
        // the last segment of the last itinerary (the trip's final arrival,
        // which for [outbound, return] round trips is on the return leg).
        let origin_iata = flight.origin_iata().map(str::to_string);
        let destination_iata = flight.final_destination_iata().map(str::to_string);

        // The two resolutions are independent; run them concurrently.
        let (origin, destination) = tokio::join!(
            self.resolve_optional(origin_iata.as_deref()),
            self.resolve_optional(destination_iata.as_deref()),
        );

        let cost_of_living = match (&origin, &destination) {
            (Some(origin), Some(destination)) => estimate_difference(origin, destination),
            _ => None,
        };

        let confirmation = BookingConfirmation {
            flight,
            hotel,
            traveler_name: traveler.name,
            traveler_email: traveler.email,
            traveler_phone: traveler.phone,
            origin_city: origin.map(|city| city.name),
            destination_city: destination.map(|city| city.name),
            cost_of_living,
        };

        self.notifier
            .deliver(&confirmation)
            .await
            .map_err(|e| {
                warn!(
                    "Failed to deliver confirmation for {}: {:#}",
                    confirmation.traveler_email, e
                );
                BookingError::NotificationFailed {
                    message: e.to_string(),
                }
            })?;

        Ok(confirmation)
    }

    /// Resolve an airport code, logging and degrading to `None` on failure.
    async fn resolve_optional(&self, iata: Option<&str>) -> Option<ResolvedCity> {
        let iata = iata?;
        match self.resolver.resolve(iata).await {
            Ok(city) => Some(city),
            Err(e) => {
                warn!("Proceeding without city data for {}: {}", iata, e);
                None
            }
        }
    }
}

fn validate_traveler(traveler: &TravelerInfo) -> Result<(), BookingError> {
    if traveler.name.trim().is_empty() {
        return Err(BookingError::MissingField { field: "name" });
    }
    if traveler.email.trim().is_empty() {
        return Err(BookingError::MissingField { field: "email" });
    }
    if traveler.phone.trim().is_empty() {
        return Err(BookingError::MissingField { field: "phone" });
    }
    Ok(())
}

/// Cost-of-living comparison between two resolved cities. City names are
/// tried first; when either is absent from the dataset the resolved country
/// names are tried instead. Any failure degrades to `None`.
fn estimate_difference(
    origin: &ResolvedCity,
    destination: &ResolvedCity,
) -> Option<CostOfLivingResult> {
    match cost_of_living::difference(&origin.name, &destination.name) {
        Ok(result) => Some(result),
        Err(LookupError::PlaceNotFound { place }) => {
            debug!("No city index for {place}, retrying with countries");
            let (origin_country, destination_country) =
                (origin.country.as_deref()?, destination.country.as_deref()?);
            match cost_of_living::difference(origin_country, destination_country) {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Proceeding without cost-of-living comparison: {}", e);
                    None
                }
            }
        }
        Err(e) => {
            warn!("Proceeding without cost-of-living comparison: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airports::{AirportLookup, AirportRecord};
    use crate::providers::ProviderError;
    use anyhow::anyhow;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider answering from a fixed IATA -> city table.
    struct TableProvider {
        table: HashMap<&'static str, AirportRecord>,
    }

    impl TableProvider {
        fn with_defaults() -> Arc<Self> {
            let mut table = HashMap::new();
            table.insert(
                "BUD",
                AirportRecord {
                    airport_name: "Liszt Ferenc Intl".to_string(),
                    city_name: "Budapest".to_string(),
                    city_code: Some("BUD".to_string()),
                    country: Some("Hungary".to_string()),
                },
            );
            table.insert(
                "LON",
                AirportRecord {
                    airport_name: "Heathrow".to_string(),
                    city_name: "London".to_string(),
                    city_code: Some("LON".to_string()),
                    country: Some("United Kingdom".to_string()),
                },
            );
            table.insert(
                "GYD",
                AirportRecord {
                    airport_name: "Heydar Aliyev Intl".to_string(),
                    city_name: "Baku".to_string(),
                    city_code: Some("BAK".to_string()),
                    country: Some("Azerbaijan".to_string()),
                },
            );
            table.insert(
                "KSC",
                AirportRecord {
                    airport_name: "Kosice Intl".to_string(),
                    city_name: "Kosice".to_string(),
                    city_code: Some("KSC".to_string()),
                    country: Some("Slovakia".to_string()),
                },
            );
            Arc::new(Self { table })
        }

        fn empty() -> Arc<Self> {
            Arc::new(Self {
                table: HashMap::new(),
            })
        }
    }

    #[async_trait::async_trait]
    impl AirportLookup for TableProvider {
        fn provider_name(&self) -> &'static str {
            "table"
        }

        async fn airports_for(&self, iata: &str) -> Result<Vec<AirportRecord>, ProviderError> {
            Ok(self.table.get(iata).cloned().into_iter().collect())
        }
    }

    /// Notifier that counts deliveries and optionally fails.
    struct RecordingNotifier {
        calls: AtomicUsize,
        fail: bool,
    }

    impl RecordingNotifier {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: true,
            })
        }

        fn deliveries(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl ConfirmationNotifier for RecordingNotifier {
        async fn deliver(&self, _confirmation: &BookingConfirmation) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(anyhow!("SMTP relay unreachable"))
            } else {
                Ok(())
            }
        }
    }

    fn service(
        provider: Arc<TableProvider>,
        notifier: Arc<RecordingNotifier>,
    ) -> BookingService {
        let resolver = Arc::new(AirportResolver::new(provider, TableProvider::empty()));
        BookingService::new(resolver, notifier)
    }

    fn flight(from: &str, to: &str) -> FlightOffer {
        serde_json::from_value(serde_json::json!({
            "id": "1",
            "itineraries": [{
                "segments": [{
                    "departure": { "iataCode": from },
                    "arrival": { "iataCode": to }
                }]
            }],
            "price": { "total": "86.20", "currency": "EUR" }
        }))
        .unwrap()
    }

    fn hotel(name: &str) -> HotelOffer {
        serde_json::from_value(serde_json::json!({
            "hotel": { "name": name },
            "offers": [{
                "checkInDate": "2025-03-01",
                "checkOutDate": "2025-03-05",
                "price": { "total": "412.00", "currency": "EUR" }
            }]
        }))
        .unwrap()
    }

    fn traveler() -> TravelerInfo {
        TravelerInfo {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: "123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_hotel_rejected_before_notification() {
        let notifier = RecordingNotifier::new();
        let service = service(TableProvider::with_defaults(), notifier.clone());

        let err = service
            .submit_booking(BookingRequest {
                flight: Some(flight("BUD", "LON")),
                hotel: None,
                traveler: Some(traveler()),
            })
            .await
            .unwrap_err();

        assert_eq!(err, BookingError::MissingField { field: "hotel" });
        assert_eq!(notifier.deliveries(), 0);
    }

    #[tokio::test]
    async fn test_blank_traveler_field_rejected() {
        let notifier = RecordingNotifier::new();
        let service = service(TableProvider::with_defaults(), notifier.clone());

        let err = service
            .submit_booking(BookingRequest {
                flight: Some(flight("BUD", "LON")),
                hotel: Some(hotel("Hotel Astoria")),
                traveler: Some(TravelerInfo {
                    name: "  ".to_string(),
                    ..traveler()
                }),
            })
            .await
            .unwrap_err();

        assert_eq!(err, BookingError::MissingField { field: "name" });
        assert_eq!(notifier.deliveries(), 0);
    }

    #[tokio::test]
    async fn test_happy_path_resolves_and_notifies_once() {
        let notifier = RecordingNotifier::new();
        let service = service(TableProvider::with_defaults(), notifier.clone());

        let confirmation = service
            .submit_booking(BookingRequest {
                flight: Some(flight("BUD", "LON")),
                hotel: Some(hotel("Hotel Astoria")),
                traveler: Some(traveler()),
            })
            .await
            .unwrap();

        assert_eq!(confirmation.origin_city.as_deref(), Some("Budapest"));
        assert_eq!(confirmation.destination_city.as_deref(), Some("London"));
        let comparison = confirmation.cost_of_living.unwrap();
        assert!(comparison.percentage_difference > 0.0);
        assert_eq!(comparison.origin_index, 43.9);
        assert_eq!(comparison.destination_index, 81.9);
        assert_eq!(notifier.deliveries(), 1);
    }

    #[tokio::test]
    async fn test_resolver_failure_degrades_gracefully() {
        let notifier = RecordingNotifier::new();
        // No provider knows any airport: both resolutions fail.
        let service = service(TableProvider::empty(), notifier.clone());

        let confirmation = service
            .submit_booking(BookingRequest {
                flight: Some(flight("BUD", "LON")),
                hotel: Some(hotel("Hotel Astoria")),
                traveler: Some(traveler()),
            })
            .await
            .unwrap();

        assert_eq!(confirmation.origin_city, None);
        assert_eq!(confirmation.destination_city, None);
        assert_eq!(confirmation.cost_of_living, None);
        assert_eq!(notifier.deliveries(), 1);
    }

    #[tokio::test]
    async fn test_unknown_city_falls_back_to_country_indices() {
        let notifier = RecordingNotifier::new();
        let service = service(TableProvider::with_defaults(), notifier.clone());

        // Kosice has no city entry, but Slovakia and Hungary both have
        // country entries, so the comparison comes from those.
        let confirmation = service
            .submit_booking(BookingRequest {
                flight: Some(flight("BUD", "KSC")),
                hotel: Some(hotel("Hotel Slavia")),
                traveler: Some(traveler()),
            })
            .await
            .unwrap();

        assert_eq!(confirmation.destination_city.as_deref(), Some("Kosice"));
        let comparison = confirmation.cost_of_living.unwrap();
        assert_eq!(comparison.origin_index, 41.2);
        assert_eq!(comparison.destination_index, 45.4);
        assert_eq!(notifier.deliveries(), 1);
    }

    #[tokio::test]
    async fn test_place_unknown_everywhere_degrades_to_none() {
        let notifier = RecordingNotifier::new();
        let service = service(TableProvider::with_defaults(), notifier.clone());

        // Baku has no city entry and Azerbaijan no country entry either, so
        // the comparison is absent; the booking still succeeds.
        let confirmation = service
            .submit_booking(BookingRequest {
                flight: Some(flight("BUD", "GYD")),
                hotel: Some(hotel("Sea Breeze")),
                traveler: Some(traveler()),
            })
            .await
            .unwrap();

        assert_eq!(confirmation.destination_city.as_deref(), Some("Baku"));
        assert_eq!(confirmation.cost_of_living, None);
        assert_eq!(notifier.deliveries(), 1);
    }

    #[tokio::test]
    async fn test_round_trip_destination_is_final_arrival() {
        let notifier = RecordingNotifier::new();
        let service = service(TableProvider::with_defaults(), notifier.clone());

        let round_trip: FlightOffer = serde_json::from_value(serde_json::json!({
            "id": "2",
            "itineraries": [
                { "segments": [{ "departure": { "iataCode": "BUD" }, "arrival": { "iataCode": "LON" } }] },
                { "segments": [{ "departure": { "iataCode": "LON" }, "arrival": { "iataCode": "BUD" } }] }
            ],
            "price": { "total": "160.00", "currency": "EUR" }
        }))
        .unwrap();

        let confirmation = service
            .submit_booking(BookingRequest {
                flight: Some(round_trip),
                hotel: Some(hotel("Hotel Astoria")),
                traveler: Some(traveler()),
            })
            .await
            .unwrap();

        // Final arrival of the whole trip, uniformly applied.
        assert_eq!(confirmation.destination_city.as_deref(), Some("Budapest"));
    }

    #[tokio::test]
    async fn test_notification_failure_is_reported() {
        let notifier = RecordingNotifier::failing();
        let service = service(TableProvider::with_defaults(), notifier.clone());

        let err = service
            .submit_booking(BookingRequest {
                flight: Some(flight("BUD", "LON")),
                hotel: Some(hotel("Hotel Astoria")),
                traveler: Some(traveler()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::NotificationFailed { .. }));
        assert_eq!(notifier.deliveries(), 1);
    }
}
