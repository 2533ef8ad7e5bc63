//! Core library for the `weather` dashboard client.
//!
//! This crate defines:
//! - Configuration handling
//! - The backend client and its `{success, message, data, count}` envelope
//! - Shared domain models and their display cards
//! - The view trait and the controller that drives it
//!
//! It is used by `weather-cli`, but any other surface can implement
//! [`WeatherView`] and reuse the controller.

pub mod backend;
pub mod config;
pub mod controller;
pub mod display;
pub mod envelope;
pub mod error;
pub mod model;
pub mod view;

pub use backend::{HttpBackend, WeatherBackend, backend_from_config};
pub use config::Config;
pub use controller::{ControllerOptions, SearchOutcome, WeatherController};
pub use error::WeatherError;
pub use model::{CurrentWeather, ForecastEntry, HistoryEntry, SavedCitySummary};
pub use view::WeatherView;
