//! Weather model for QML.
//!
//! Owns the fetch session. Invokables start fetches on the shared runtime;
//! a QML Timer calls `poll_channel` to apply results on the UI thread.

use core::pin::Pin;

use cxx_qt::CxxQtType;
use cxx_qt_lib::QString;
use skycast_weather::{
    Completion, FetchTrigger, TemperatureUnit, Theme, WeatherDisplay, WeatherSession,
};

use crate::app_services::AppServices;
use crate::services::{report_weather_unavailable, request_weather_fetch, WeatherServiceMessage};

#[cxx_qt::bridge]
pub mod qobject {
    unsafe extern "C++" {
        include!("cxx-qt-lib/qstring.h");
        type QString = cxx_qt_lib::QString;
    }

    extern "RustQt" {
        #[qobject]
        #[qml_element]
        #[qproperty(bool, loading)]
        #[qproperty(bool, has_data)]
        #[qproperty(bool, dark_mode)]
        #[qproperty(bool, celsius)]
        #[qproperty(i32, window_width)]
        #[qproperty(i32, window_height)]
        #[qproperty(QString, error_message)]
        // Weather card labels
        #[qproperty(QString, location_name)]
        #[qproperty(QString, region)]
        #[qproperty(QString, temperature)]
        #[qproperty(QString, unit_symbol)]
        #[qproperty(QString, feels_like)]
        #[qproperty(QString, humidity)]
        #[qproperty(QString, wind)]
        #[qproperty(QString, uv)]
        #[qproperty(QString, condition)]
        #[qproperty(QString, condition_icon)]
        #[qproperty(QString, updated)]
        type WeatherModel = super::WeatherModelRust;

        /// Fetch for the detected location on app start.
        #[qinvokable]
        fn start(self: Pin<&mut WeatherModel>);

        #[qinvokable]
        fn refresh_location(self: Pin<&mut WeatherModel>);

        #[qinvokable]
        fn retry(self: Pin<&mut WeatherModel>);

        #[qinvokable]
        fn search_city(self: Pin<&mut WeatherModel>, city: &QString);

        #[qinvokable]
        fn toggle_unit(self: Pin<&mut WeatherModel>);

        #[qinvokable]
        fn toggle_theme(self: Pin<&mut WeatherModel>);

        /// Poll for async operation results. Call this from a QML Timer.
        #[qinvokable]
        fn poll_channel(self: Pin<&mut WeatherModel>);

        #[qsignal]
        fn weather_changed(self: Pin<&mut WeatherModel>);
    }
}

pub struct WeatherModelRust {
    loading: bool,
    has_data: bool,
    dark_mode: bool,
    celsius: bool,
    window_width: i32,
    window_height: i32,
    error_message: QString,
    location_name: QString,
    region: QString,
    temperature: QString,
    unit_symbol: QString,
    feels_like: QString,
    humidity: QString,
    wind: QString,
    uv: QString,
    condition: QString,
    condition_icon: QString,
    updated: QString,
    session: WeatherSession,
}

impl Default for WeatherModelRust {
    fn default() -> Self {
        let ui = AppServices::get()
            .map(|services| services.config().ui)
            .unwrap_or_default();

        let unit = if ui.celsius {
            TemperatureUnit::Celsius
        } else {
            TemperatureUnit::Fahrenheit
        };
        let theme = if ui.dark_mode { Theme::Dark } else { Theme::Light };
        let display = WeatherDisplay::empty(unit);

        Self {
            loading: false,
            has_data: false,
            dark_mode: theme.is_dark(),
            celsius: unit == TemperatureUnit::Celsius,
            window_width: i32::try_from(ui.window_width).unwrap_or(i32::MAX),
            window_height: i32::try_from(ui.window_height).unwrap_or(i32::MAX),
            error_message: QString::default(),
            location_name: QString::from(&display.location),
            region: QString::from(&display.region),
            temperature: QString::from(&display.temperature),
            unit_symbol: QString::from(&display.unit),
            feels_like: QString::from(&display.feels_like),
            humidity: QString::from(&display.humidity),
            wind: QString::from(&display.wind),
            uv: QString::from(&display.uv),
            condition: QString::from(&display.condition),
            condition_icon: QString::default(),
            updated: QString::from(&display.updated),
            session: WeatherSession::new(unit, theme),
        }
    }
}

impl qobject::WeatherModel {
    pub fn start(self: Pin<&mut Self>) {
        self.trigger(FetchTrigger::AppStart);
    }

    pub fn refresh_location(self: Pin<&mut Self>) {
        self.trigger(FetchTrigger::LocationButton);
    }

    pub fn retry(self: Pin<&mut Self>) {
        self.trigger(FetchTrigger::Retry);
    }

    pub fn search_city(self: Pin<&mut Self>, city: &QString) {
        self.trigger(FetchTrigger::Search(city.to_string()));
    }

    pub fn toggle_unit(mut self: Pin<&mut Self>) {
        self.as_mut().rust_mut().session.toggle_unit();
        let unit = self.as_ref().rust().session.unit();
        self.as_mut().set_celsius(unit == TemperatureUnit::Celsius);
        self.as_mut().render();
    }

    pub fn toggle_theme(mut self: Pin<&mut Self>) {
        self.as_mut().rust_mut().session.toggle_theme();
        let theme = self.as_ref().rust().session.theme();
        self.as_mut().set_dark_mode(theme.is_dark());
    }

    pub fn poll_channel(mut self: Pin<&mut Self>) {
        let Some(services) = AppServices::get() else {
            return;
        };

        while let Some(msg) = services.try_recv_weather_message() {
            match msg {
                WeatherServiceMessage::FetchDone { ticket, result } => {
                    let outcome = self.as_mut().rust_mut().session.complete(ticket, result);
                    match outcome {
                        Completion::Rendered => {
                            self.as_mut().set_error_message(QString::default());
                            self.as_mut().set_has_data(true);
                            self.as_mut().render();
                            self.as_mut().weather_changed();
                        }
                        Completion::Failed(message) => {
                            self.as_mut().set_error_message(QString::from(&message));
                        }
                        Completion::Stale => continue,
                    }
                    self.as_mut().set_loading(false);
                }
            }
        }
    }

    fn trigger(mut self: Pin<&mut Self>, trigger: FetchTrigger) {
        let Some(request) = self.as_mut().rust_mut().session.begin(trigger) else {
            return;
        };

        self.as_mut().set_loading(true);
        self.as_mut().set_error_message(QString::default());

        let Some(services) = AppServices::get() else {
            tracing::error!("Weather fetch requested before services were initialized");
            let outcome = self
                .as_mut()
                .rust_mut()
                .session
                .complete(request.ticket, Err(String::new()));
            if let Completion::Failed(message) = outcome {
                self.as_mut().set_error_message(QString::from(&message));
            }
            self.as_mut().set_loading(false);
            return;
        };

        match services.weather_fetcher() {
            Some(fetcher) => request_weather_fetch(
                &services.runtime(),
                &services.weather_service_tx(),
                fetcher,
                request,
            ),
            None => report_weather_unavailable(&services.weather_service_tx(), request.ticket),
        }
    }

    /// Push the session's labels into the Qt properties.
    fn render(mut self: Pin<&mut Self>) {
        let display = self.as_ref().rust().session.display();
        let icon = self
            .as_ref()
            .rust()
            .session
            .snapshot()
            .and_then(|s| s.condition_icon.as_deref())
            .map(icon_url)
            .unwrap_or_default();

        self.as_mut().set_location_name(QString::from(&display.location));
        self.as_mut().set_region(QString::from(&display.region));
        self.as_mut().set_temperature(QString::from(&display.temperature));
        self.as_mut().set_unit_symbol(QString::from(&display.unit));
        self.as_mut().set_feels_like(QString::from(&display.feels_like));
        self.as_mut().set_humidity(QString::from(&display.humidity));
        self.as_mut().set_wind(QString::from(&display.wind));
        self.as_mut().set_uv(QString::from(&display.uv));
        self.as_mut().set_condition(QString::from(&display.condition));
        self.as_mut().set_condition_icon(QString::from(&icon));
        self.as_mut().set_updated(QString::from(&display.updated));
    }
}

/// WeatherAPI icons are protocol-relative (`//cdn...`)
fn icon_url(icon: &str) -> String {
    if icon.starts_with("//") {
        format!("https:{}", icon)
    } else {
        icon.to_string()
    }
}
