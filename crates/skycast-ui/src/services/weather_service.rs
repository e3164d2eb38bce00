//! Weather backend: async weather fetching.
//! All network work runs off the UI thread; results sent via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use skycast_core::AppError;
use skycast_weather::{FetchRequest, FetchTicket, WeatherFetcher, WeatherSnapshot};

use crate::error_mapping::weather_app_error;

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of one fetch. `Err` holds the message to show the user.
    FetchDone {
        ticket: FetchTicket,
        result: Result<WeatherSnapshot, String>,
    },
}

/// Run `request` on the runtime. Sends `FetchDone` on the channel when complete.
pub fn request_fetch(
    runtime: &tokio::runtime::Handle,
    tx: &Sender<WeatherServiceMessage>,
    fetcher: Arc<WeatherFetcher>,
    request: FetchRequest,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        tracing::info!(
            "Fetch #{} started: {:?}",
            request.ticket.id(),
            request.target
        );

        let result = fetcher.fetch(&request.target).await.map_err(|e| {
            let err = weather_app_error(e);
            tracing::error!("Fetch #{} failed: {}", request.ticket.id(), err);
            err.user_message().to_string()
        });

        if tx
            .send(WeatherServiceMessage::FetchDone {
                ticket: request.ticket,
                result,
            })
            .is_err()
        {
            tracing::debug!("Weather channel closed, dropping fetch result");
        }
    });
}

/// Report a fetch that could not be dispatched at all.
pub fn report_unavailable(tx: &Sender<WeatherServiceMessage>, ticket: FetchTicket) {
    let message = AppError::from(skycast_core::WeatherError::ServiceUnavailable)
        .user_message()
        .to_string();
    if tx
        .send(WeatherServiceMessage::FetchDone {
            ticket,
            result: Err(message),
        })
        .is_err()
    {
        tracing::debug!("Weather channel closed, dropping fetch #{}", ticket.id());
    }
}
