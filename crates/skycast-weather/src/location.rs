//! IP-based location detection (ipinfo.io compatible endpoints).

use crate::geocode::ReverseGeocoder;
use crate::types::{Coordinates, LocationError, ResolvedLocation};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const IPINFO_URL: &str = "https://ipinfo.io/json";

#[derive(Debug, Deserialize)]
struct IpInfoResponse {
    city: Option<String>,
    region: Option<String>,
    country: Option<String>,
    loc: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct IpLocator {
    client: Client,
    url: String,
    geocoder: Option<ReverseGeocoder>,
}

impl IpLocator {
    /// # Errors
    /// Fails only if the HTTP client cannot be constructed.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LocationError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LocationError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
            geocoder: None,
        })
    }

    /// Name coordinate-only results through the given reverse geocoder
    pub fn with_reverse_geocoder(mut self, geocoder: ReverseGeocoder) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    /// Ask the IP geolocation service where the caller is.
    ///
    /// # Errors
    /// `Network` on transport failure, `Unavailable` on a non-success status,
    /// `Parse` on a malformed body and `Unknown` when the answer carries
    /// neither a city nor usable coordinates.
    pub async fn locate(&self) -> Result<ResolvedLocation, LocationError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LocationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LocationError::Unavailable(status.as_u16()));
        }

        let info: IpInfoResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Parse(e.to_string()))?;

        let coordinates = info.loc.as_deref().and_then(Coordinates::parse);
        let mut city = non_empty(info.city);

        if city.is_none() {
            if let (Some(coords), Some(geocoder)) = (coordinates, &self.geocoder) {
                city = geocoder.lookup(coords).await;
            }
        }

        if city.is_none() && coordinates.is_none() {
            return Err(LocationError::Unknown);
        }

        let location = ResolvedLocation {
            city,
            region: non_empty(info.region),
            country: non_empty(info.country),
            coordinates,
            is_fallback: false,
        };
        tracing::info!(
            "Detected location: {}",
            location.query().unwrap_or_default()
        );
        Ok(location)
    }

    /// Like [`IpLocator::locate`], but never fails: any error yields `default`.
    pub async fn resolve_or_default(&self, default: &str) -> ResolvedLocation {
        match self.locate().await {
            Ok(location) => location,
            Err(e) => {
                tracing::warn!("Location detection failed ({}), using {}", e, default);
                ResolvedLocation::named(default)
            }
        }
    }
}
