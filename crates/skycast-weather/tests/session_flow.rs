//! End-to-end fetch flow: session, fetcher and mocked services.

use std::sync::Arc;
use std::time::Duration;

use skycast_weather::{
    Completion, FetchState, FetchTrigger, IpLocator, TemperatureUnit, Theme, WeatherFetcher,
    WeatherProvider, WeatherSession,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn current_body(city: &str, temp_c: f64, feels_like_c: f64) -> serde_json::Value {
    serde_json::json!({
        "location": { "name": city, "region": "Berlin", "country": "Germany" },
        "current": {
            "last_updated": "2026-10-18 08:15",
            "temp_c": temp_c,
            "feelslike_c": feels_like_c,
            "humidity": 81,
            "wind_kph": 24.1,
            "uv": 2.0,
            "condition": { "text": "Overcast", "icon": "//cdn.weatherapi.com/weather/64x64/day/122.png" }
        }
    })
}

fn fetcher(server: &MockServer) -> WeatherFetcher {
    let provider =
        WeatherProvider::new("test-key", server.uri(), Duration::from_secs(5)).unwrap();
    let locator =
        IpLocator::new(format!("{}/json", server.uri()), Duration::from_secs(5)).unwrap();
    WeatherFetcher::new(Arc::new(provider), Arc::new(locator), "London")
}

/// Message the window would show for a failed fetch
fn user_message(err: &skycast_weather::WeatherError) -> String {
    err.to_string()
}

#[tokio::test]
async fn test_mocked_fields_are_rendered_and_converted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "city": "Berlin", "region": "Berlin", "country": "DE", "loc": "52.52,13.40"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("q", "Berlin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("Berlin", 10.0, 7.0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher(&mock_server);
    let mut session = WeatherSession::new(TemperatureUnit::Celsius, Theme::Dark);

    let request = session.begin(FetchTrigger::AppStart).unwrap();
    let result = fetcher.fetch(&request.target).await.map_err(|e| user_message(&e));
    assert_eq!(session.complete(request.ticket, result), Completion::Rendered);

    let d = session.display();
    assert_eq!(d.location, "Berlin");
    assert_eq!(d.region, "Berlin, Germany");
    assert_eq!(d.temperature, "10°");
    assert_eq!(d.feels_like, "7°C");
    assert_eq!(d.humidity, "81%");
    assert_eq!(d.wind, "24 km/h");
    assert_eq!(d.uv, "2.0");
    assert_eq!(d.condition, "Overcast");
    assert_eq!(d.updated, "Updated: 2026-10-18 08:15");

    // Toggling unit and theme re-renders from memory; the mocks' expect(1)
    // fails the test on drop if any of this hits the network.
    session.toggle_unit();
    session.toggle_theme();
    session.toggle_theme();
    assert_eq!(session.unit(), TemperatureUnit::Fahrenheit);
    assert_eq!(session.theme(), Theme::Dark);
    let d = session.display();
    assert_eq!(d.temperature, "50°");
    assert_eq!(d.feels_like, "45°F");
    assert_eq!(d.wind, "15 mph");
    assert_eq!(session.state(), FetchState::Loaded);
}

#[tokio::test]
async fn test_provider_error_reaches_failed_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 1006, "message": "No matching location found." }
        })))
        .mount(&mock_server)
        .await;

    let fetcher = fetcher(&mock_server);
    let mut session = WeatherSession::default();

    let request = session.begin(FetchTrigger::Search("Atlantis".into())).unwrap();
    let result = fetcher.fetch(&request.target).await.map_err(|e| user_message(&e));
    let outcome = session.complete(request.ticket, result);

    assert!(matches!(outcome, Completion::Failed(ref m) if !m.is_empty()));
    assert_eq!(session.state(), FetchState::Failed);
    assert!(session.error_message().is_some_and(|m| m.contains("Atlantis")));
    assert!(session.snapshot().is_none());
}

#[tokio::test]
async fn test_geolocation_failure_uses_default_location() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London", 12.0, 11.0)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher(&mock_server);
    let mut session = WeatherSession::default();

    let request = session.begin(FetchTrigger::LocationButton).unwrap();
    let result = fetcher.fetch(&request.target).await.map_err(|e| user_message(&e));
    assert_eq!(session.complete(request.ticket, result), Completion::Rendered);
    assert_eq!(session.display().location, "London");
}

#[tokio::test]
async fn test_concurrent_triggers_render_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body("Madrid", 25.0, 26.0))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = fetcher(&mock_server);
    let mut session = WeatherSession::default();

    let request = session.begin(FetchTrigger::Search("Madrid".into())).unwrap();
    // Presses while loading are dropped, so only one request is dispatched.
    assert!(session.begin(FetchTrigger::Search("Rome".into())).is_none());
    assert!(session.begin(FetchTrigger::LocationButton).is_none());

    let worker = {
        let fetcher = fetcher.clone();
        let target = request.target.clone();
        tokio::spawn(async move { fetcher.fetch(&target).await.map_err(|e| e.to_string()) })
    };
    let result = worker.await.unwrap();

    assert_eq!(session.complete(request.ticket, result.clone()), Completion::Rendered);
    assert_eq!(session.complete(request.ticket, result), Completion::Stale);
    assert_eq!(session.display().location, "Madrid");
}
