//! Clients for the external travel-data providers
//!
//! Each provider gets its own thin HTTP JSON client with a bounded timeout.
//! There is deliberately no retry or backoff: failures are logged with the
//! provider and input and surfaced to the caller.

pub mod amadeus;
pub mod error;
pub mod ninjas;

pub use amadeus::{AmadeusClient, AmadeusClientConfig, FlightSearchParams};
pub use error::ProviderError;
pub use ninjas::{ApiNinjasClient, NinjaAirport, NinjasClientConfig};
