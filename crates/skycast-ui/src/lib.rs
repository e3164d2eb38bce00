pub mod app;
pub mod app_services;
pub mod error_mapping;
pub mod models;
pub mod services;

pub use app::run;

// Re-export cxx-qt generated types
pub use models::weather_model::qobject::WeatherModel;
