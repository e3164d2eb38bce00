use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Temperature unit used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn toggled(self) -> Self {
        match self {
            Self::Celsius => Self::Fahrenheit,
            Self::Fahrenheit => Self::Celsius,
        }
    }

    /// Unit letter shown after the degree sign
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
        }
    }

    /// Convert a Celsius reading into this unit
    pub fn from_celsius(self, celsius: f64) -> f64 {
        match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius_to_fahrenheit(celsius),
        }
    }
}

/// Window color scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub const KM_PER_MILE: f64 = 1.609_344;

pub fn kph_to_mph(kph: f64) -> f64 {
    kph / KM_PER_MILE
}

/// Latitude/longitude pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Parse the `"lat,lon"` form used by ipinfo.io.
    pub fn parse(value: &str) -> Option<Self> {
        let (lat, lon) = value.split_once(',')?;
        let latitude = lat.trim().parse::<f64>().ok()?;
        let longitude = lon.trim().parse::<f64>().ok()?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        Some(Self {
            latitude,
            longitude,
        })
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Where the user is, as far as the resolver could tell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub coordinates: Option<Coordinates>,
    /// True when detection failed and the configured default was used
    pub is_fallback: bool,
}

impl ResolvedLocation {
    /// A location known only by name (the fallback path)
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            city: Some(name.into()),
            region: None,
            country: None,
            coordinates: None,
            is_fallback: true,
        }
    }

    /// Query string for the weather provider: city if known, else `"lat,lon"`.
    pub fn query(&self) -> Option<String> {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .or_else(|| self.coordinates.map(|c| c.to_string()))
    }
}

/// Current conditions for one location at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub region: String,
    pub country: String,
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub humidity: u8,
    pub wind_kph: f64,
    pub uv: f64,
    pub condition: String,
    pub condition_icon: Option<String>,
    pub last_updated: Option<NaiveDateTime>,
}

impl WeatherSnapshot {
    /// Sample data returned when no API key is configured
    pub fn demo() -> Self {
        Self {
            city: "Demo City".to_string(),
            region: "Demo Region".to_string(),
            country: "DC".to_string(),
            temp_c: 22.5,
            feels_like_c: 23.0,
            humidity: 65,
            wind_kph: 15.0,
            uv: 5.0,
            condition: "Partly Cloudy".to_string(),
            condition_icon: Some("//cdn.weatherapi.com/weather/64x64/day/116.png".to_string()),
            last_updated: NaiveDateTime::parse_from_str("2024-01-01 12:00", LAST_UPDATED_FORMAT)
                .ok(),
        }
    }

    pub fn temp_f(&self) -> f64 {
        celsius_to_fahrenheit(self.temp_c)
    }

    pub fn feels_like_f(&self) -> f64 {
        celsius_to_fahrenheit(self.feels_like_c)
    }

    pub fn wind_mph(&self) -> f64 {
        kph_to_mph(self.wind_kph)
    }
}

/// Timestamp format used by WeatherAPI.com for `last_updated`
pub const LAST_UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Location service errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum LocationError {
    #[error("Location lookup failed: {0}")]
    Network(String),
    #[error("Location service unavailable (HTTP {0})")]
    Unavailable(u16),
    #[error("Malformed location response: {0}")]
    Parse(String),
    #[error("Location unknown")]
    Unknown,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Location not found: {0}")]
    NotFound(String),
    #[error("Unauthorized: API key missing or invalid")]
    Unauthorized,
    #[error("Weather service unavailable: {0}")]
    Unavailable(String),
    #[error("Parse error: {0}")]
    Parse(String),
}
