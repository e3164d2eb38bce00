//! Weather service for SkyCast
//!
//! Current conditions from WeatherAPI.com, IP-based location detection with
//! optional reverse geocoding, and the fetch session that drives the window.

pub mod display;
pub mod fetch;
pub mod geocode;
pub mod location;
pub mod provider;
pub mod session;
pub mod types;

pub use display::WeatherDisplay;
pub use fetch::WeatherFetcher;
pub use geocode::ReverseGeocoder;
pub use location::IpLocator;
pub use provider::WeatherProvider;
pub use session::{
    Completion, FetchRequest, FetchState, FetchTarget, FetchTicket, FetchTrigger, WeatherSession,
};
pub use types::*;
