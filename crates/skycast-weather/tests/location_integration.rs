//! Integration tests for IpLocator and ReverseGeocoder using wiremock.

use std::time::Duration;

use skycast_weather::{IpLocator, LocationError, ReverseGeocoder};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn locator(server: &MockServer) -> IpLocator {
    IpLocator::new(format!("{}/json", server.uri()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_locate_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ip": "203.0.113.7",
            "city": "Toronto",
            "region": "Ontario",
            "country": "CA",
            "loc": "43.7001,-79.4163",
            "timezone": "America/Toronto"
        })))
        .mount(&mock_server)
        .await;

    let location = locator(&mock_server).locate().await.unwrap();

    assert_eq!(location.city.as_deref(), Some("Toronto"));
    assert_eq!(location.region.as_deref(), Some("Ontario"));
    assert_eq!(location.country.as_deref(), Some("CA"));
    let coords = location.coordinates.unwrap();
    assert_eq!(coords.latitude, 43.7001);
    assert_eq!(coords.longitude, -79.4163);
    assert!(!location.is_fallback);
    assert_eq!(location.query().as_deref(), Some("Toronto"));
}

#[tokio::test]
async fn test_coordinates_only_without_geocoder() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": "",
            "loc": "51.5,-0.12"
        })))
        .mount(&mock_server)
        .await;

    let location = locator(&mock_server).locate().await.unwrap();
    assert!(location.city.is_none());
    assert_eq!(location.query().as_deref(), Some("51.5,-0.12"));
}

#[tokio::test]
async fn test_coordinates_refined_by_reverse_geocode() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "loc": "47.6062,-122.3321"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "47.6062"))
        .and(query_param("lon", "-122.3321"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "display_name": "Seattle, King County, Washington, United States",
            "address": {
                "city": "Seattle",
                "county": "King County",
                "state": "Washington",
                "country": "United States"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let geocoder =
        ReverseGeocoder::new(format!("{}/reverse", mock_server.uri()), Duration::from_secs(5))
            .unwrap();
    let location = locator(&mock_server)
        .with_reverse_geocoder(geocoder)
        .locate()
        .await
        .unwrap();

    assert_eq!(location.city.as_deref(), Some("Seattle, Washington"));
}

#[tokio::test]
async fn test_reverse_geocode_failure_keeps_coordinates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "loc": "10.0,20.0"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let geocoder =
        ReverseGeocoder::new(format!("{}/reverse", mock_server.uri()), Duration::from_secs(5))
            .unwrap();
    let location = locator(&mock_server)
        .with_reverse_geocoder(geocoder)
        .locate()
        .await
        .unwrap();

    assert!(location.city.is_none());
    assert_eq!(location.query().as_deref(), Some("10,20"));
}

#[tokio::test]
async fn test_empty_answer_is_unknown() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ip": "10.0.0.1",
            "bogon": true
        })))
        .mount(&mock_server)
        .await;

    let err = locator(&mock_server).locate().await.unwrap_err();
    assert!(matches!(err, LocationError::Unknown));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>rate limited</html>"))
        .mount(&mock_server)
        .await;

    let err = locator(&mock_server).locate().await.unwrap_err();
    assert!(matches!(err, LocationError::Parse(_)));
}

#[tokio::test]
async fn test_status_error_is_unavailable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let err = locator(&mock_server).locate().await.unwrap_err();
    assert!(matches!(err, LocationError::Unavailable(429)));
}

#[tokio::test]
async fn test_failure_falls_back_to_default() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let location = locator(&mock_server).resolve_or_default("Reykjavik").await;
    assert!(location.is_fallback);
    assert_eq!(location.query().as_deref(), Some("Reykjavik"));
}
