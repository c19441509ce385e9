use thiserror::Error;

pub(crate) mod flight_source;
pub(crate) mod weather;

pub(crate) use flight_source::{AviationStackClient, FlightSource};
pub(crate) use weather::{OpenWeatherClient, Weather, WeatherService, WeatherSource};

#[derive(Debug, Error)]
pub(crate) enum SourceError {
    #[error(transparent)]
    HttpError(#[from] reqwest::Error),
    #[error("Unexpected HTTP status: {0}")]
    StatusError(u16),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("No API token configured")]
    MissingToken,
    #[error("Invalid request timeout")]
    InvalidTimeout(#[from] chrono::OutOfRangeError),
}

/// reqwestクライアントを作成
fn build_client(timeout: chrono::Duration) -> Result<reqwest::Client, SourceError> {
    let client = reqwest::Client::builder()
        .timeout(timeout.to_std()?)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
