//! Airport/City resolution
//!
//! Maps an airport IATA code to a city name and city code. A primary
//! provider is consulted first; on a network failure, a timeout, or an empty
//! result set the secondary provider is tried with the same first-result
//! rule. Both failing resolves to `ResolutionError::NotFound`.

pub mod error;

use std::sync::Arc;

use tracing::{debug, warn};

pub use error::ResolutionError;

use crate::providers::ProviderError;

/// City-code corrections for airports whose primary-provider city code is
/// known to be wrong. This is a data-quality patch, not business logic:
/// keep it as data so the entries stay auditable.
///
/// EAP is the Basel/Mulhouse metropolitan code; the upstream feed attributes
/// it to the Mulhouse city code while every downstream consumer expects BSL.
const CITY_CODE_OVERRIDES: &[(&str, &str)] = &[("EAP", "BSL")];

fn city_code_override(iata: &str) -> Option<&'static str> {
    CITY_CODE_OVERRIDES
        .iter()
        .find(|(airport, _)| *airport == iata)
        .map(|(_, corrected)| *corrected)
}

/// One airport as a lookup provider reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirportRecord {
    pub airport_name: String,
    pub city_name: String,
    /// Metropolitan city code, when the provider carries one
    pub city_code: Option<String>,
    pub country: Option<String>,
}

/// A provider that can look up airports by IATA code.
#[async_trait::async_trait]
pub trait AirportLookup: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn airports_for(&self, iata: &str) -> Result<Vec<AirportRecord>, ProviderError>;
}

/// The city an airport code resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCity {
    pub name: String,
    pub code: String,
    pub country: Option<String>,
}

/// Selection policy for provider result lists: first result wins. Kept as a
/// named function so a smarter ranking can replace it without touching call
/// sites.
pub fn pick_best_match<T>(results: Vec<T>) -> Option<T> {
    results.into_iter().next()
}

/// Resolves airport codes to cities through a primary and a secondary
/// provider.
pub struct AirportResolver {
    primary: Arc<dyn AirportLookup>,
    secondary: Arc<dyn AirportLookup>,
}

impl AirportResolver {
    pub fn new(primary: Arc<dyn AirportLookup>, secondary: Arc<dyn AirportLookup>) -> Self {
        Self { primary, secondary }
    }

    /// Resolve an airport code to its city.
    pub async fn resolve(&self, iata: &str) -> Result<ResolvedCity, ResolutionError> {
        let iata = iata.trim();
        if iata.is_empty() {
            warn!("City resolution requested for an empty airport code");
            return Err(ResolutionError::NotFound {
                iata: String::new(),
            });
        }

        for provider in [&self.primary, &self.secondary] {
            match provider.airports_for(iata).await {
                Ok(records) => {
                    if let Some(record) = pick_best_match(records) {
                        debug!(
                            "Resolved {} via {}: {}",
                            iata,
                            provider.provider_name(),
                            record.city_name
                        );
                        return Ok(Self::build_city(iata, record));
                    }
                    warn!(
                        "Provider {} returned no airports for {}",
                        provider.provider_name(),
                        iata
                    );
                }
                Err(e) => {
                    warn!(
                        "Provider {} failed to look up {}: {}",
                        provider.provider_name(),
                        iata,
                        e
                    );
                }
            }
        }

        Err(ResolutionError::NotFound {
            iata: iata.to_string(),
        })
    }

    /// Resolve an airport code to its city name.
    pub async fn resolve_city_name(&self, iata: &str) -> Result<String, ResolutionError> {
        Ok(self.resolve(iata).await?.name)
    }

    /// Resolve an airport code to its metropolitan city code.
    pub async fn resolve_city_code(&self, iata: &str) -> Result<String, ResolutionError> {
        Ok(self.resolve(iata).await?.code)
    }

    fn build_city(iata: &str, record: AirportRecord) -> ResolvedCity {
        let code = match city_code_override(iata) {
            Some(corrected) => corrected.to_string(),
            None => record
                .city_code
                .unwrap_or_else(|| iata.to_uppercase()),
        };

        ResolvedCity {
            name: record.city_name,
            code,
            country: record.country,
        }
    }
}
