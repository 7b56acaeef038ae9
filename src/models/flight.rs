//! Flight offer model mirroring the upstream flight-search provider shape

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A flight offer as returned by the flight-search provider.
///
/// Only the fields the booking flow reads are typed; everything else the
/// provider sends is kept in `extra` so an offer passes through the service
/// untouched.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightOffer {
    pub id: String,
    pub itineraries: Vec<Itinerary>,
    pub price: Price,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One directional leg of a trip (outbound or return).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    pub segments: Vec<Segment>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single flight leg within an itinerary.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Departure or arrival point of a segment.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlightEndpoint {
    pub iata_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Price block shared by flight and hotel offers. The provider sends totals
/// as strings ("123.45"), so they stay strings here.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub total: String,
    pub currency: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FlightOffer {
    /// Departure airport of the whole trip: first segment of the first
    /// itinerary.
    #[must_use]
    pub fn origin_iata(&self) -> Option<&str> {
        self.itineraries
            .first()
            .and_then(|itinerary| itinerary.segments.first())
            .map(|segment| segment.departure.iata_code.as_str())
    }

    /// Final arrival airport of the whole trip: last segment of the last
    /// itinerary. For a round trip with itineraries [outbound, return] this
    /// is the return leg's final arrival.
    #[must_use]
    pub fn final_destination_iata(&self) -> Option<&str> {
        self.itineraries
            .last()
            .and_then(|itinerary| itinerary.segments.last())
            .map(|segment| segment.arrival.iata_code.as_str())
    }
}
