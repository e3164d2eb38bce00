//! One fetch from trigger target to snapshot.

use std::sync::Arc;

use crate::location::IpLocator;
use crate::provider::WeatherProvider;
use crate::session::FetchTarget;
use crate::types::{WeatherError, WeatherSnapshot};

/// Runs one fetch: resolve the location if needed, then ask the provider.
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    provider: Arc<WeatherProvider>,
    locator: Arc<IpLocator>,
    default_location: String,
}

impl WeatherFetcher {
    pub fn new(
        provider: Arc<WeatherProvider>,
        locator: Arc<IpLocator>,
        default_location: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            locator,
            default_location: default_location.into(),
        }
    }

    /// # Errors
    /// Propagates provider errors. Location detection failures fall back to
    /// the default location and are not errors.
    pub async fn fetch(&self, target: &FetchTarget) -> Result<WeatherSnapshot, WeatherError> {
        match target {
            FetchTarget::City(city) => self.provider.current(city).await,
            FetchTarget::CurrentLocation => {
                let location = self
                    .locator
                    .resolve_or_default(&self.default_location)
                    .await;
                self.provider.current_for(&location).await
            }
        }
    }
}
