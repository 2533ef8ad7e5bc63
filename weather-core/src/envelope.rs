use serde::Deserialize;

use crate::error::WeatherError;

const FALLBACK_MESSAGE: &str = "Request failed";

/// The `{success, message, data, count}` wrapper every backend response uses.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
    pub count: Option<u64>,
}

impl<T> Envelope<T> {
    /// Shared decode step for all backend calls.
    pub fn into_result(self) -> Result<T, WeatherError> {
        if !self.success {
            let message = self
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
            return Err(WeatherError::Remote(message));
        }

        self.data.ok_or(WeatherError::MissingData)
    }

    /// True when the backend explicitly counted zero records.
    pub fn is_counted_empty(&self) -> bool {
        self.count == Some(0)
    }
}

/// Parse a response body into an envelope, keeping a short excerpt of the
/// body for the error when it isn't one.
pub fn decode<T>(status: u16, body: &str) -> Result<Envelope<T>, WeatherError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_str(body).map_err(|_| WeatherError::Decode {
        status,
        body: truncate_body(body),
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
