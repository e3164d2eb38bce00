//! WeatherAPI.com client for current conditions.

use crate::types::{ResolvedLocation, WeatherError, WeatherSnapshot, LAST_UPDATED_FORMAT};
use chrono::NaiveDateTime;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com";
const CURRENT_PATH: &str = "/v1/current.json";

/// Keys starting with this prefix have not been filled in; the provider
/// answers with demo data instead of calling the API.
pub const PLACEHOLDER_KEY_PREFIX: &str = "YOUR_";

// WeatherAPI.com error codes
const CODE_KEY_NOT_PROVIDED: i32 = 1002;
const CODE_NO_LOCATION_FOUND: i32 = 1006;
const CODE_KEY_INVALID: i32 = 2006;
const CODE_QUOTA_EXCEEDED: i32 = 2007;
const CODE_KEY_DISABLED: i32 = 2008;

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: ApiLocation,
    current: ApiCurrent,
}

#[derive(Debug, Deserialize)]
struct ApiLocation {
    name: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct ApiCurrent {
    temp_c: f64,
    feelslike_c: f64,
    humidity: u8,
    wind_kph: f64,
    uv: f64,
    last_updated: Option<String>,
    condition: ApiCondition,
}

#[derive(Debug, Deserialize)]
struct ApiCondition {
    text: String,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    code: i32,
    #[serde(default)]
    message: String,
}

impl From<CurrentResponse> for WeatherSnapshot {
    fn from(body: CurrentResponse) -> Self {
        let last_updated = body.current.last_updated.as_deref().and_then(|s| {
            NaiveDateTime::parse_from_str(s, LAST_UPDATED_FORMAT)
                .map_err(|e| tracing::debug!("Unparseable last_updated {:?}: {}", s, e))
                .ok()
        });

        Self {
            city: body.location.name,
            region: body.location.region,
            country: body.location.country,
            temp_c: body.current.temp_c,
            feels_like_c: body.current.feelslike_c,
            humidity: body.current.humidity,
            wind_kph: body.current.wind_kph,
            uv: body.current.uv,
            condition: body.current.condition.text,
            condition_icon: body.current.condition.icon,
            last_updated,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl WeatherProvider {
    /// # Errors
    /// Fails only if the HTTP client cannot be constructed.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// True when no real key is configured and demo data is served
    pub fn is_demo(&self) -> bool {
        self.api_key.starts_with(PLACEHOLDER_KEY_PREFIX)
    }

    /// Fetch current conditions for a city name or `"lat,lon"` string.
    ///
    /// # Errors
    /// `NotFound` for unknown or empty locations, `Unauthorized` for key
    /// problems, `Unavailable` for provider outages, `Network` for transport
    /// failures and `Parse` for unexpected bodies.
    pub async fn current(&self, query: &str) -> Result<WeatherSnapshot, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherError::NotFound(String::new()));
        }

        if self.is_demo() {
            tracing::info!("No API key configured, returning demo weather for {}", query);
            return Ok(WeatherSnapshot::demo());
        }

        let url = format!("{}{}", self.base_url, CURRENT_PATH);
        tracing::debug!("Requesting current weather for {}", query);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", query), ("aqi", "no")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = classify_error(status, &body, query);
            tracing::warn!("Weather request for {} failed: {}", query, err);
            return Err(err);
        }

        let parsed: CurrentResponse =
            serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))?;

        let snapshot = WeatherSnapshot::from(parsed);
        tracing::info!(
            "Weather for {}: {} {:.1}°C",
            snapshot.city,
            snapshot.condition,
            snapshot.temp_c
        );
        Ok(snapshot)
    }

    /// Fetch current conditions for a resolved location.
    ///
    /// # Errors
    /// `NotFound` if the location carries neither a name nor coordinates,
    /// otherwise the same as [`WeatherProvider::current`].
    pub async fn current_for(
        &self,
        location: &ResolvedLocation,
    ) -> Result<WeatherSnapshot, WeatherError> {
        match location.query() {
            Some(query) => self.current(&query).await,
            None => Err(WeatherError::NotFound(String::new())),
        }
    }
}

/// Map a non-success response onto the error taxonomy.
///
/// The provider's own error code wins; the HTTP status decides otherwise.
fn classify_error(status: StatusCode, body: &str, query: &str) -> WeatherError {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .map(|b| b.error);

    match detail {
        Some(d) if d.code == CODE_NO_LOCATION_FOUND => WeatherError::NotFound(query.to_string()),
        Some(d)
            if matches!(
                d.code,
                CODE_KEY_NOT_PROVIDED | CODE_KEY_INVALID | CODE_KEY_DISABLED
            ) =>
        {
            WeatherError::Unauthorized
        }
        Some(d) if d.code == CODE_QUOTA_EXCEEDED => WeatherError::Unavailable(d.message),
        _ => match status {
            StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => {
                WeatherError::NotFound(query.to_string())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => WeatherError::Unauthorized,
            s => WeatherError::Unavailable(format!("HTTP {}", s.as_u16())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_body(code: i32, message: &str) -> String {
        serde_json::json!({ "error": { "code": code, "message": message } }).to_string()
    }

    #[test]
    fn test_classify_unknown_location() {
        let err = classify_error(
            StatusCode::BAD_REQUEST,
            &error_body(1006, "No matching location found."),
            "Atlantis",
        );
        assert!(matches!(err, WeatherError::NotFound(q) if q == "Atlantis"));
    }

    #[test]
    fn test_classify_key_errors() {
        for code in [1002, 2006, 2008] {
            let status = if code == 2008 {
                StatusCode::FORBIDDEN
            } else {
                StatusCode::UNAUTHORIZED
            };
            let err = classify_error(status, &error_body(code, "key"), "Paris");
            assert!(matches!(err, WeatherError::Unauthorized), "code {code}");
        }
    }

    #[test]
    fn test_classify_quota_is_unavailable() {
        let err = classify_error(
            StatusCode::FORBIDDEN,
            &error_body(2007, "API key has exceeded calls per month quota."),
            "Paris",
        );
        assert!(matches!(err, WeatherError::Unavailable(m) if m.contains("quota")));
    }

    #[test]
    fn test_classify_falls_back_to_status() {
        assert!(matches!(
            classify_error(StatusCode::UNAUTHORIZED, "nope", "Paris"),
            WeatherError::Unauthorized
        ));
        assert!(matches!(
            classify_error(StatusCode::BAD_REQUEST, "", "Paris"),
            WeatherError::NotFound(_)
        ));
        assert!(matches!(
            classify_error(StatusCode::BAD_GATEWAY, "<html>", "Paris"),
            WeatherError::Unavailable(m) if m == "HTTP 502"
        ));
    }

    #[test]
    fn test_snapshot_from_response() {
        let body: CurrentResponse = serde_json::from_value(serde_json::json!({
            "location": { "name": "Oslo", "region": "Oslo", "country": "Norway" },
            "current": {
                "temp_c": -3.0,
                "feelslike_c": -8.2,
                "humidity": 80,
                "wind_kph": 20.2,
                "uv": 1.0,
                "last_updated": "2026-01-15 09:45",
                "condition": { "text": "Light snow", "icon": "//cdn/326.png" }
            }
        }))
        .unwrap();

        let snap = WeatherSnapshot::from(body);
        assert_eq!(snap.city, "Oslo");
        assert_eq!(snap.country, "Norway");
        assert_eq!(snap.feels_like_c, -8.2);
        assert_eq!(snap.humidity, 80);
        assert_eq!(snap.condition, "Light snow");
        assert_eq!(
            snap.last_updated.map(|t| t.format(LAST_UPDATED_FORMAT).to_string()),
            Some("2026-01-15 09:45".to_string())
        );
    }

    #[test]
    fn test_bad_timestamp_is_dropped() {
        let body: CurrentResponse = serde_json::from_value(serde_json::json!({
            "location": { "name": "Oslo" },
            "current": {
                "temp_c": 1.0, "feelslike_c": 1.0, "humidity": 1, "wind_kph": 1.0, "uv": 0.0,
                "last_updated": "yesterday",
                "condition": { "text": "Fog" }
            }
        }))
        .unwrap();

        let snap = WeatherSnapshot::from(body);
        assert!(snap.last_updated.is_none());
        assert!(snap.region.is_empty());
        assert!(snap.condition_icon.is_none());
    }

    #[test]
    fn test_placeholder_key_is_demo() {
        let provider =
            WeatherProvider::new("YOUR_WEATHERAPI_KEY", DEFAULT_BASE_URL, Duration::from_secs(1))
                .unwrap();
        assert!(provider.is_demo());

        let provider =
            WeatherProvider::new("real-key", DEFAULT_BASE_URL, Duration::from_secs(1)).unwrap();
        assert!(!provider.is_demo());
    }

    #[tokio::test]
    async fn test_demo_mode_returns_sample() {
        let provider = WeatherProvider::new(
            "YOUR_WEATHERAPI_KEY",
            "http://127.0.0.1:9",
            Duration::from_secs(1),
        )
        .unwrap();
        let snap = provider.current("Anywhere").await.unwrap();
        assert_eq!(snap, WeatherSnapshot::demo());
    }

    #[tokio::test]
    async fn test_empty_query_is_not_found() {
        let provider =
            WeatherProvider::new("real-key", "http://127.0.0.1:9", Duration::from_secs(1))
                .unwrap();
        let err = provider.current("   ").await.unwrap_err();
        assert!(matches!(err, WeatherError::NotFound(_)));
    }
}
