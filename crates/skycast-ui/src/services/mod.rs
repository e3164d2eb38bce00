pub mod weather_service;

pub use weather_service::{
    report_unavailable as report_weather_unavailable, request_fetch as request_weather_fetch,
    WeatherServiceMessage,
};
