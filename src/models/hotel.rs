//! Hotel offer model mirroring the upstream hotel-search provider shape

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::flight::Price;

/// A hotel with its bookable offers, as returned by the hotel-search
/// provider. The booking flow reads the hotel name and the first offer's
/// price and stay dates; the rest passes through opaque.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotelOffer {
    pub hotel: Hotel,
    #[serde(default)]
    pub offers: Vec<HotelStay>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One bookable stay: dates plus price.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HotelStay {
    pub check_in_date: String,
    pub check_out_date: String,
    pub price: Price,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl HotelOffer {
    /// The stay the user is booking. Providers list the selected rate first.
    #[must_use]
    pub fn selected_stay(&self) -> Option<&HotelStay> {
        self.offers.first()
    }
}
