//! `PackAndGo` - travel booking backend
//!
//! This library provides the core functionality for the booking service:
//! airport-to-city resolution, cost-of-living estimation and booking
//! orchestration, plus the provider clients and HTTP surface around them.

pub mod airports;
pub mod api;
pub mod booking;
pub mod config;
pub mod cost_of_living;
pub mod email;
pub mod models;
pub mod providers;
pub mod web;

// Re-export core types for public API
pub use airports::{AirportLookup, AirportRecord, AirportResolver, ResolutionError, ResolvedCity};
pub use booking::{BookingError, BookingRequest, BookingService};
pub use config::PackAndGoConfig;
pub use cost_of_living::{CostOfLivingResult, LookupError};
pub use email::{ConfirmationNotifier, SmtpNotifier};
pub use models::{BookingConfirmation, FlightOffer, HotelOffer, TravelerInfo};
pub use providers::{AmadeusClient, ApiNinjasClient, ProviderError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
