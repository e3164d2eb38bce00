//! Fetch orchestration for the weather window.
//!
//! Ensures only one fetch runs at a time and that a result is rendered only
//! if it belongs to the outstanding request. Unit and theme toggles never
//! start a fetch.

use crate::display::WeatherDisplay;
use crate::types::{TemperatureUnit, Theme, WeatherSnapshot};

/// Shown when a failure arrives without a message of its own.
pub const DEFAULT_ERROR_MESSAGE: &str =
    "Could not fetch weather data.\nCheck your connection or API key.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

impl FetchState {
    /// True if a new fetch can be started.
    pub fn accepts_trigger(self) -> bool {
        !matches!(self, FetchState::Loading)
    }
}

/// What asked for a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTrigger {
    AppStart,
    LocationButton,
    Retry,
    Search(String),
}

/// What the background worker should fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTarget {
    /// Detect the location, then fetch its weather
    CurrentLocation,
    City(String),
}

/// Identifies one dispatched fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// A fetch the caller must run off the UI thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub ticket: FetchTicket,
    pub target: FetchTarget,
}

/// Outcome of applying a finished fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// New snapshot is on screen
    Rendered,
    /// Error message is on screen
    Failed(String),
    /// Result belonged to a superseded request and was dropped
    Stale,
}

#[derive(Debug, Default)]
pub struct WeatherSession {
    state: FetchState,
    snapshot: Option<WeatherSnapshot>,
    error_message: Option<String>,
    unit: TemperatureUnit,
    theme: Theme,
    outstanding: Option<FetchTicket>,
    next_ticket: u64,
}

impl WeatherSession {
    pub fn new(unit: TemperatureUnit, theme: Theme) -> Self {
        Self {
            unit,
            theme,
            ..Self::default()
        }
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Most recent successful fetch
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    /// Message for the error view, set only in `Failed`
    pub fn error_message(&self) -> Option<&str> {
        match self.state {
            FetchState::Failed => self.error_message.as_deref(),
            _ => None,
        }
    }

    /// Labels for the current snapshot in the current unit
    pub fn display(&self) -> WeatherDisplay {
        match &self.snapshot {
            Some(snapshot) => WeatherDisplay::render(snapshot, self.unit),
            None => WeatherDisplay::empty(self.unit),
        }
    }

    /// Start a fetch. Returns `None` while another fetch is loading or
    /// when a search has nothing to search for.
    pub fn begin(&mut self, trigger: FetchTrigger) -> Option<FetchRequest> {
        if !self.state.accepts_trigger() {
            tracing::debug!("Ignoring {:?}: a fetch is already in flight", trigger);
            return None;
        }

        let target = match trigger {
            FetchTrigger::AppStart | FetchTrigger::LocationButton | FetchTrigger::Retry => {
                FetchTarget::CurrentLocation
            }
            FetchTrigger::Search(city) => {
                let city = city.trim();
                if city.is_empty() {
                    return None;
                }
                FetchTarget::City(city.to_string())
            }
        };

        self.next_ticket += 1;
        let ticket = FetchTicket(self.next_ticket);
        self.outstanding = Some(ticket);
        self.state = FetchState::Loading;
        self.error_message = None;

        Some(FetchRequest { ticket, target })
    }

    /// Apply a finished fetch. `Err` carries the user-visible message.
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: Result<WeatherSnapshot, String>,
    ) -> Completion {
        if self.outstanding != Some(ticket) {
            tracing::debug!("Discarding result for superseded fetch #{}", ticket.id());
            return Completion::Stale;
        }
        self.outstanding = None;

        match result {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.error_message = None;
                self.state = FetchState::Loaded;
                Completion::Rendered
            }
            Err(message) => {
                let message = if message.trim().is_empty() {
                    DEFAULT_ERROR_MESSAGE.to_string()
                } else {
                    message
                };
                self.error_message = Some(message.clone());
                self.state = FetchState::Failed;
                Completion::Failed(message)
            }
        }
    }

    pub fn toggle_unit(&mut self) {
        self.unit = self.unit.toggled();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }
}
