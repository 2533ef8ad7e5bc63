use thiserror::Error;

/// Errors surfaced by the backend client and the view controller.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The city input was empty after trimming. No request is made.
    #[error("Please enter a city name")]
    EmptyCity,

    /// The backend answered with `success: false`.
    #[error("{0}")]
    Remote(String),

    #[error("Failed to reach the weather backend: {0}")]
    Network(#[from] reqwest::Error),

    /// The body was not a valid envelope.
    #[error("Unexpected response from the weather backend (status {status}): {body}")]
    Decode { status: u16, body: String },

    #[error("Weather backend reported success but sent no data")]
    MissingData,

    #[error("Invalid weather backend URL '{0}'")]
    InvalidBaseUrl(String),
}

impl WeatherError {
    /// True when the backend itself rejected the request.
    pub fn is_remote(&self) -> bool {
        matches!(self, WeatherError::Remote(_))
    }
}
