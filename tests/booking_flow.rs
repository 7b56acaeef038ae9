//! End-to-end booking flow over in-memory collaborators
//!
//! Exercises the full orchestration - resolution, cost-of-living
//! enrichment, confirmation assembly, notification dispatch - without
//! touching the network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use packandgo::airports::{AirportLookup, AirportRecord, AirportResolver};
use packandgo::booking::{BookingRequest, BookingService};
use packandgo::email::ConfirmationNotifier;
use packandgo::models::{BookingConfirmation, FlightOffer, HotelOffer, TravelerInfo};
use packandgo::providers::ProviderError;

struct StaticProvider {
    name: &'static str,
    records: Vec<(&'static str, AirportRecord)>,
}

impl StaticProvider {
    fn new(name: &'static str, records: Vec<(&'static str, AirportRecord)>) -> Arc<Self> {
        Arc::new(Self { name, records })
    }
}

#[async_trait::async_trait]
impl AirportLookup for StaticProvider {
    fn provider_name(&self) -> &'static str {
        self.name
    }

    async fn airports_for(&self, iata: &str) -> Result<Vec<AirportRecord>, ProviderError> {
        Ok(self
            .records
            .iter()
            .filter(|(code, _)| *code == iata)
            .map(|(_, record)| record.clone())
            .collect())
    }
}

/// Captures delivered confirmations instead of sending mail.
#[derive(Default)]
struct CapturingNotifier {
    deliveries: AtomicUsize,
    last: Mutex<Option<BookingConfirmation>>,
}

#[async_trait::async_trait]
impl ConfirmationNotifier for CapturingNotifier {
    async fn deliver(&self, confirmation: &BookingConfirmation) -> anyhow::Result<()> {
        self.deliveries.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(confirmation.clone());
        Ok(())
    }
}

fn record(city: &str, code: &str, country: &str) -> AirportRecord {
    AirportRecord {
        airport_name: format!("{city} Intl"),
        city_name: city.to_string(),
        city_code: Some(code.to_string()),
        country: Some(country.to_string()),
    }
}

fn harness(
    primary: Arc<StaticProvider>,
    secondary: Arc<StaticProvider>,
) -> (BookingService, Arc<CapturingNotifier>) {
    let resolver = Arc::new(AirportResolver::new(primary, secondary));
    let notifier = Arc::new(CapturingNotifier::default());
    (
        BookingService::new(resolver, notifier.clone()),
        notifier,
    )
}

fn jane() -> TravelerInfo {
    TravelerInfo {
        name: "Jane".to_string(),
        email: "jane@example.com".to_string(),
        phone: "123".to_string(),
    }
}

fn bud_to_lon_flight() -> FlightOffer {
    serde_json::from_value(serde_json::json!({
        "id": "1",
        "itineraries": [{
            "segments": [{
                "departure": { "iataCode": "BUD" },
                "arrival": { "iataCode": "LON" }
            }]
        }],
        "price": { "total": "86.20", "currency": "EUR" }
    }))
    .unwrap()
}

fn lon_hotel() -> HotelOffer {
    serde_json::from_value(serde_json::json!({
        "hotel": { "name": "The Strand Palace", "cityCode": "LON" },
        "offers": [{
            "checkInDate": "2025-03-01",
            "checkOutDate": "2025-03-05",
            "price": { "total": "640.00", "currency": "GBP" }
        }]
    }))
    .unwrap()
}

#[tokio::test]
async fn booking_resolves_cities_and_dispatches_one_notification() {
    let primary = StaticProvider::new(
        "primary",
        vec![
            ("BUD", record("Budapest", "BUD", "Hungary")),
            ("LON", record("London", "LON", "United Kingdom")),
        ],
    );
    let secondary = StaticProvider::new("secondary", vec![]);
    let (service, notifier) = harness(primary, secondary);

    let confirmation = service
        .submit_booking(BookingRequest {
            flight: Some(bud_to_lon_flight()),
            hotel: Some(lon_hotel()),
            traveler: Some(jane()),
        })
        .await
        .unwrap();

    assert_eq!(confirmation.origin_city.as_deref(), Some("Budapest"));
    assert_eq!(confirmation.destination_city.as_deref(), Some("London"));
    assert_eq!(confirmation.traveler_name, "Jane");

    // London (81.9) vs Budapest (43.9), ratio to origin.
    let comparison = confirmation.cost_of_living.as_ref().unwrap();
    let expected = (81.9 - 43.9) / 43.9 * 100.0;
    assert!((comparison.percentage_difference - expected).abs() < 1e-9);

    assert_eq!(notifier.deliveries.load(Ordering::SeqCst), 1);
    let delivered = notifier.last.lock().unwrap().clone().unwrap();
    assert_eq!(delivered, confirmation);
}

#[tokio::test]
async fn booking_survives_primary_outage_via_secondary_provider() {
    // Primary knows nothing; the secondary feed answers without city codes.
    let primary = StaticProvider::new("primary", vec![]);
    let secondary = StaticProvider::new(
        "secondary",
        vec![
            (
                "BUD",
                AirportRecord {
                    airport_name: "Liszt Ferenc Intl".to_string(),
                    city_name: "Budapest".to_string(),
                    city_code: None,
                    country: Some("Hungary".to_string()),
                },
            ),
            (
                "LON",
                AirportRecord {
                    airport_name: "Heathrow".to_string(),
                    city_name: "London".to_string(),
                    city_code: None,
                    country: Some("United Kingdom".to_string()),
                },
            ),
        ],
    );
    let (service, notifier) = harness(primary, secondary);

    let confirmation = service
        .submit_booking(BookingRequest {
            flight: Some(bud_to_lon_flight()),
            hotel: Some(lon_hotel()),
            traveler: Some(jane()),
        })
        .await
        .unwrap();

    assert_eq!(confirmation.destination_city.as_deref(), Some("London"));
    assert!(confirmation.cost_of_living.is_some());
    assert_eq!(notifier.deliveries.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn booking_without_resolvable_destination_still_confirms() {
    let primary = StaticProvider::new(
        "primary",
        vec![("BUD", record("Budapest", "BUD", "Hungary"))],
    );
    let secondary = StaticProvider::new("secondary", vec![]);
    let (service, notifier) = harness(primary, secondary);

    let confirmation = service
        .submit_booking(BookingRequest {
            flight: Some(bud_to_lon_flight()),
            hotel: Some(lon_hotel()),
            traveler: Some(jane()),
        })
        .await
        .unwrap();

    assert_eq!(confirmation.origin_city.as_deref(), Some("Budapest"));
    assert_eq!(confirmation.destination_city, None);
    assert_eq!(confirmation.cost_of_living, None);
    assert_eq!(notifier.deliveries.load(Ordering::SeqCst), 1);
}
