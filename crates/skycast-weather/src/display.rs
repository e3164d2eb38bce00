//! Label text for the weather card.

use crate::types::{TemperatureUnit, WeatherSnapshot, LAST_UPDATED_FORMAT};

const PLACEHOLDER: &str = "--";

/// No decimals; ties round to even
fn whole(value: f64) -> String {
    format!("{:.0}", value)
}

/// Preformatted strings for every label on the weather card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherDisplay {
    pub location: String,
    pub region: String,
    pub temperature: String,
    pub unit: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub uv: String,
    pub condition: String,
    pub updated: String,
}

impl WeatherDisplay {
    /// Labels shown before any data has arrived
    pub fn empty(unit: TemperatureUnit) -> Self {
        Self {
            location: PLACEHOLDER.to_string(),
            region: String::new(),
            temperature: format!("{}°", PLACEHOLDER),
            unit: unit.symbol().to_string(),
            feels_like: format!("{}°{}", PLACEHOLDER, unit.symbol()),
            humidity: format!("{}%", PLACEHOLDER),
            wind: match unit {
                TemperatureUnit::Celsius => format!("{} km/h", PLACEHOLDER),
                TemperatureUnit::Fahrenheit => format!("{} mph", PLACEHOLDER),
            },
            uv: PLACEHOLDER.to_string(),
            condition: PLACEHOLDER.to_string(),
            updated: String::new(),
        }
    }

    pub fn render(snapshot: &WeatherSnapshot, unit: TemperatureUnit) -> Self {
        let region = [snapshot.region.as_str(), snapshot.country.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let wind = match unit {
            TemperatureUnit::Celsius => format!("{} km/h", whole(snapshot.wind_kph)),
            TemperatureUnit::Fahrenheit => format!("{} mph", whole(snapshot.wind_mph())),
        };

        let updated = snapshot
            .last_updated
            .map(|t| format!("Updated: {}", t.format(LAST_UPDATED_FORMAT)))
            .unwrap_or_default();

        Self {
            location: snapshot.city.clone(),
            region,
            temperature: format!("{}°", whole(unit.from_celsius(snapshot.temp_c))),
            unit: unit.symbol().to_string(),
            feels_like: format!(
                "{}°{}",
                whole(unit.from_celsius(snapshot.feels_like_c)),
                unit.symbol()
            ),
            humidity: format!("{}%", snapshot.humidity),
            wind,
            uv: format!("{:?}", snapshot.uv),
            condition: snapshot.condition.clone(),
            updated,
        }
    }
}
