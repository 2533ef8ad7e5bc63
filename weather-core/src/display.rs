//! Display-ready text for each entity: the template step between decoded
//! backend data and a view.

use chrono::{DateTime, Local, Utc};
use std::fmt;

use crate::model::{CurrentWeather, ForecastEntry, HistoryEntry, Reading, SavedCitySummary};

pub const NO_SAVED_CITIES: &str = "No cities saved yet. Search for a city to begin!";
pub const SAVED_CITIES_FAILED: &str = "Failed to load saved cities";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSize {
    /// `@2x`, used on forecast cards.
    Medium,
    /// `@4x`, used for current conditions.
    Large,
}

impl IconSize {
    fn suffix(self) -> &'static str {
        match self {
            IconSize::Medium => "@2x",
            IconSize::Large => "@4x",
        }
    }
}

pub fn icon_url(icon_base: &str, icon: &str, size: IconSize) -> String {
    format!("{}/{icon}{}.png", icon_base.trim_end_matches('/'), size.suffix())
}

/// Round half up, matching how temperatures are shown on cards (-2.5 → -2).
pub fn rounded_temperature(celsius: f64) -> String {
    // Adding 0.5 before flooring rounds 0.49999999999999994 up to 1.
    let floor = celsius.floor();
    let rounded = if celsius - floor >= 0.5 { floor + 1.0 } else { floor };
    format!("{}°C", rounded as i64)
}

/// The temperature as the backend sent it.
pub fn exact_temperature(reading: &Reading) -> String {
    format!("{reading}°C")
}

/// `Fri, Jan 5`. Forecast timestamps are shown as sent, without a zone shift.
pub fn forecast_date(at: DateTime<Utc>) -> String {
    at.format("%a, %b %-d").to_string()
}

pub fn local_date_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn local_date(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeatherCard {
    pub location: String,
    pub temperature: String,
    pub description: String,
    pub humidity: String,
    pub wind_speed: String,
    pub pressure: String,
    pub icon_url: String,
}

impl CurrentWeatherCard {
    pub fn new(current: &CurrentWeather, icon_base: &str) -> Self {
        Self {
            location: format!("{}, {}", current.city, current.country),
            temperature: rounded_temperature(current.temperature),
            description: current.description.clone(),
            humidity: format!("{}%", current.humidity),
            wind_speed: format!("{} m/s", current.wind_speed),
            pressure: format!("{} hPa", current.pressure),
            icon_url: icon_url(icon_base, &current.icon, IconSize::Large),
        }
    }
}

impl fmt::Display for CurrentWeatherCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.location)?;
        writeln!(f, "  {}  {}", self.temperature, self.description)?;
        writeln!(f, "  Humidity:   {}", self.humidity)?;
        writeln!(f, "  Wind speed: {}", self.wind_speed)?;
        writeln!(f, "  Pressure:   {}", self.pressure)?;
        write!(f, "  Icon:       {}", self.icon_url)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    pub date: String,
    pub icon_url: String,
    pub temperature: String,
    pub description: String,
}

impl ForecastCard {
    pub fn new(entry: &ForecastEntry, icon_base: &str) -> Self {
        Self {
            date: forecast_date(entry.datetime),
            icon_url: icon_url(icon_base, &entry.icon, IconSize::Medium),
            temperature: rounded_temperature(entry.temperature),
            description: entry.description.clone(),
        }
    }
}

impl fmt::Display for ForecastCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<12} {:>6}  {}", self.date, self.temperature, self.description)
    }
}

pub const HISTORY_HEADERS: [&str; 5] =
    ["Date & Time", "Temperature", "Humidity", "Wind Speed", "Condition"];

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub date_time: String,
    pub temperature: String,
    pub humidity: String,
    pub wind_speed: String,
    pub description: String,
}

impl HistoryRow {
    pub fn new(entry: &HistoryEntry) -> Self {
        Self {
            date_time: local_date_time(entry.date_time),
            temperature: exact_temperature(&entry.temperature),
            humidity: format!("{}%", entry.humidity),
            wind_speed: format!("{} m/s", entry.wind_speed),
            description: entry.description.clone(),
        }
    }

    pub fn cells(&self) -> [&str; 5] {
        [
            &self.date_time,
            &self.temperature,
            &self.humidity,
            &self.wind_speed,
            &self.description,
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedCityCard {
    pub city: String,
    pub temperature: String,
    pub condition: String,
    pub date: String,
}

impl SavedCityCard {
    pub fn new(summary: &SavedCitySummary) -> Self {
        Self {
            city: summary.city.clone(),
            temperature: rounded_temperature(summary.temperature),
            condition: summary.weather_condition.clone(),
            date: local_date(summary.date_time),
        }
    }
}

impl fmt::Display for SavedCityCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {})",
            self.city, self.temperature, self.condition, self.date
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ICON_BASE;
    use chrono::TimeZone;

    #[test]
    fn temperatures_round_half_up() {
        assert_eq!(rounded_temperature(21.4), "21°C");
        assert_eq!(rounded_temperature(21.5), "22°C");
        assert_eq!(rounded_temperature(-2.5), "-2°C");
        assert_eq!(rounded_temperature(-2.6), "-3°C");
        assert_eq!(rounded_temperature(-0.4), "0°C");
        assert_eq!(rounded_temperature(0.49999999999999994), "0°C");
        assert_eq!(rounded_temperature(-0.5), "0°C");
    }

    #[test]
    fn exact_temperature_is_verbatim() {
        assert_eq!(exact_temperature(&Reading::from(21.5)), "21.5°C");
        assert_eq!(exact_temperature(&Reading::from(18.0)), "18°C");

        let stored: Reading = serde_json::from_str(r#""22.40""#).unwrap();
        assert_eq!(exact_temperature(&stored), "22.40°C");
    }

    #[test]
    fn icon_urls_use_size_suffix() {
        assert_eq!(
            icon_url(DEFAULT_ICON_BASE, "10d", IconSize::Large),
            "https://openweathermap.org/img/wn/10d@4x.png"
        );
        assert_eq!(
            icon_url("https://cdn.example.com/icons/", "10n", IconSize::Medium),
            "https://cdn.example.com/icons/10n@2x.png"
        );
    }

    #[test]
    fn forecast_card_formats_date_and_temperature() {
        let entry = ForecastEntry {
            datetime: Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap(),
            temperature: 25.51,
            description: "light rain".into(),
            icon: "10d".into(),
            condition: Some("Rain".into()),
        };

        let card = ForecastCard::new(&entry, DEFAULT_ICON_BASE);

        assert_eq!(card.date, "Fri, Jan 5");
        assert_eq!(card.temperature, "26°C");
        assert_eq!(card.icon_url, "https://openweathermap.org/img/wn/10d@2x.png");
        assert_eq!(card.description, "light rain");
    }

    #[test]
    fn current_card_copies_fields() {
        let current = CurrentWeather {
            city: "Pretoria".into(),
            country: "ZA".into(),
            temperature: 24.49,
            description: "clear sky".into(),
            humidity: 30,
            wind_speed: 4.1,
            pressure: 1018,
            icon: "01d".into(),
            condition: None,
        };

        let card = CurrentWeatherCard::new(&current, DEFAULT_ICON_BASE);

        assert_eq!(card.location, "Pretoria, ZA");
        assert_eq!(card.temperature, "24°C");
        assert_eq!(card.humidity, "30%");
        assert_eq!(card.wind_speed, "4.1 m/s");
        assert_eq!(card.pressure, "1018 hPa");
        assert_eq!(card.icon_url, "https://openweathermap.org/img/wn/01d@4x.png");
        assert!(card.to_string().starts_with("Pretoria, ZA\n"));
    }

    #[test]
    fn history_row_keeps_exact_values() {
        let entry = HistoryEntry {
            date_time: Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap(),
            temperature: serde_json::from_str(r#""22.40""#).unwrap(),
            humidity: 35,
            wind_speed: serde_json::from_str(r#""2.60""#).unwrap(),
            description: "clear sky".into(),
            weather_condition: None,
            icon: None,
        };

        let row = HistoryRow::new(&entry);

        assert_eq!(row.cells()[1..], ["22.40°C", "35%", "2.60 m/s", "clear sky"]);
        assert_eq!(row.date_time, local_date_time(entry.date_time));
    }
}
