//! Data models for the PackAndGo backend
//!
//! This module contains the core domain models organized by concern:
//! - Flight: offers, itineraries, segments as the provider shapes them
//! - Hotel: hotels and bookable stays
//! - Booking: traveler details and the confirmation artifact

pub mod booking;
pub mod flight;
pub mod hotel;

// Re-export all public types for convenient access
pub use booking::{BookingConfirmation, TravelerInfo};
pub use flight::{FlightEndpoint, FlightOffer, Itinerary, Price, Segment};
pub use hotel::{Hotel, HotelOffer, HotelStay};
