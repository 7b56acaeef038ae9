//! Resolver error types.

/// Errors from airport-to-city resolution.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// Neither provider produced a usable result for the code
    #[error("no city found for airport code {iata}")]
    NotFound { iata: String },
}
