//! Centralized application services.
//!
//! Holds the tokio runtime that runs network work off the UI thread, the
//! weather fetcher built from configuration, and the channel that carries
//! finished fetches back to the UI thread.

use std::sync::mpsc;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::{Mutex, RwLock};

use skycast_core::Config;
use skycast_weather::{IpLocator, ReverseGeocoder, WeatherFetcher, WeatherProvider};

/// Message types for the weather service channel
pub use crate::services::WeatherServiceMessage;

/// Global application services container.
pub struct AppServices {
    /// Tokio runtime for async operations
    runtime: tokio::runtime::Runtime,

    /// Configuration the services were built from
    config: RwLock<Config>,

    /// Weather fetcher (provider + location resolver)
    weather_fetcher: RwLock<Option<Arc<WeatherFetcher>>>,

    /// Weather service channel sender
    weather_service_tx: mpsc::Sender<WeatherServiceMessage>,

    /// Weather service channel receiver
    weather_service_rx: Mutex<mpsc::Receiver<WeatherServiceMessage>>,
}

/// Global singleton for application services
static SERVICES: OnceLock<Arc<AppServices>> = OnceLock::new();

impl AppServices {
    /// Initialize the application services from configuration.
    ///
    /// Subsequent calls return the existing instance.
    ///
    /// # Errors
    /// Fails if the runtime or the HTTP clients cannot be created.
    pub fn init(config: Config) -> Result<Arc<Self>> {
        if let Some(existing) = SERVICES.get() {
            return Ok(existing.clone());
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("skycast-tokio")
            .build()
            .context("Failed to create tokio runtime")?;

        let fetcher = build_fetcher(&config)?;
        let (tx, rx) = mpsc::channel();

        let services = Arc::new(Self {
            runtime,
            config: RwLock::new(config),
            weather_fetcher: RwLock::new(Some(Arc::new(fetcher))),
            weather_service_tx: tx,
            weather_service_rx: Mutex::new(rx),
        });

        tracing::info!("Application services initialized");
        Ok(SERVICES.get_or_init(|| services).clone())
    }

    /// Get the services if `init` has run.
    pub fn get() -> Option<Arc<Self>> {
        SERVICES.get().cloned()
    }

    /// Get the tokio runtime handle.
    pub fn runtime(&self) -> tokio::runtime::Handle {
        self.runtime.handle().clone()
    }

    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    pub fn weather_fetcher(&self) -> Option<Arc<WeatherFetcher>> {
        self.weather_fetcher.read().clone()
    }

    /// Get weather service sender.
    pub fn weather_service_tx(&self) -> mpsc::Sender<WeatherServiceMessage> {
        self.weather_service_tx.clone()
    }

    /// Try to receive a message from the weather service channel (non-blocking).
    pub fn try_recv_weather_message(&self) -> Option<WeatherServiceMessage> {
        self.weather_service_rx.lock().try_recv().ok()
    }

    /// Drop the fetcher so no new fetches start. In-flight fetches finish on
    /// their own and their results are ignored.
    pub fn shutdown(&self) {
        tracing::info!("AppServices shutdown initiated");
        *self.weather_fetcher.write() = None;
    }
}

fn build_fetcher(config: &Config) -> Result<WeatherFetcher> {
    let timeout = Duration::from_secs(config.weather.timeout_secs);

    let provider = WeatherProvider::new(
        config.weather.api_key.clone(),
        config.weather.base_url.clone(),
        timeout,
    )
    .context("Failed to create weather provider")?;

    if provider.is_demo() {
        tracing::warn!("No WeatherAPI key configured - demo mode");
    }

    let mut locator = IpLocator::new(config.location.ip_lookup_url.clone(), timeout)
        .context("Failed to create location resolver")?;

    if config.location.reverse_geocode {
        let geocoder = ReverseGeocoder::new(config.location.reverse_geocode_url.clone(), timeout)
            .context("Failed to create reverse geocoder")?;
        locator = locator.with_reverse_geocoder(geocoder);
    }

    Ok(WeatherFetcher::new(
        Arc::new(provider),
        Arc::new(locator),
        config.weather.default_location.clone(),
    ))
}
