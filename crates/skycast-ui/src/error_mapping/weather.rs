use skycast_core::{AppError, ReqwestErrorExt, WeatherError as CoreWeatherError};
use skycast_weather::WeatherError;

/// Map a weather crate error onto the application taxonomy.
pub fn weather_app_error(e: WeatherError) -> AppError {
    match e {
        WeatherError::Network(err) => AppError::Network(err.into_network_error()),
        WeatherError::NotFound(query) => {
            AppError::Weather(CoreWeatherError::LocationNotFound(query))
        }
        WeatherError::Unauthorized => AppError::Weather(CoreWeatherError::InvalidApiKey),
        WeatherError::Unavailable(_) => AppError::Weather(CoreWeatherError::ServiceUnavailable),
        WeatherError::Parse(msg) => AppError::Weather(CoreWeatherError::InvalidResponse(msg)),
    }
}
