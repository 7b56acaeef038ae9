//! Booking confirmation model

use serde::{Deserialize, Serialize};

use super::flight::FlightOffer;
use super::hotel::HotelOffer;
use crate::cost_of_living::CostOfLivingResult;

/// Traveler contact details attached to a booking submission.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TravelerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// The confirmation artifact assembled once a flight and a hotel have been
/// selected. Built per submission, handed to the notification collaborator,
/// then discarded - nothing is persisted.
///
/// City names and the cost-of-living comparison are enrichment: when the
/// resolver or the estimator fails, the confirmation is still valid and the
/// fields stay `None`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmation {
    pub flight: FlightOffer,
    pub hotel: HotelOffer,
    pub traveler_name: String,
    pub traveler_email: String,
    pub traveler_phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_of_living: Option<CostOfLivingResult>,
}
