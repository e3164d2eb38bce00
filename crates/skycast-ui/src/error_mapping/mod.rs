//! Maps service errors to skycast_core::AppError for consistent user-facing messages.

mod weather;

pub use weather::weather_app_error;
