pub mod config;
pub mod error;

pub use config::{
    Config, ConfigValidationError, LocationConfig, UiConfig, ValidationResult, WeatherConfig,
    EMBEDDED_API_KEY,
};
pub use error::{AppError, NetworkError, ReqwestErrorExt, WeatherError};

use anyhow::Result;

/// Initialize logging.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
///
/// # Errors
/// Currently infallible; kept fallible so startup can grow checks.
pub fn init() -> Result<()> {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("SkyCast core initialized");
    }
    Ok(())
}
