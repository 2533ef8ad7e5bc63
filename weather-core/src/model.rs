use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use std::fmt;

/// Current conditions for one city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub temperature: f64,
    pub description: String,
    #[serde(deserialize_with = "lenient_u8")]
    pub humidity: u8,
    #[serde(deserialize_with = "lenient_f64")]
    pub wind_speed: f64,
    #[serde(deserialize_with = "lenient_u32")]
    pub pressure: u32,
    pub icon: String,
    #[serde(default)]
    pub condition: Option<String>,
}

/// One step of the 3-hourly forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    #[serde(deserialize_with = "lenient_timestamp")]
    pub datetime: DateTime<Utc>,
    #[serde(deserialize_with = "lenient_f64")]
    pub temperature: f64,
    pub description: String,
    pub icon: String,
    #[serde(default)]
    pub condition: Option<String>,
}

/// A stored observation returned by the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(deserialize_with = "lenient_timestamp")]
    pub date_time: DateTime<Utc>,
    pub temperature: Reading,
    #[serde(deserialize_with = "lenient_u8")]
    pub humidity: u8,
    pub wind_speed: Reading,
    pub description: String,
    #[serde(default)]
    pub weather_condition: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

/// Latest stored observation of a city the backend has seen before.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCitySummary {
    pub city: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub temperature: f64,
    pub weather_condition: String,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub date_time: DateTime<Utc>,
}

/// A stored measurement, keeping the text the backend sent (`"22.40"`) next
/// to its numeric value.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    value: f64,
    text: String,
}

impl Reading {
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Self {
            value,
            text: value.to_string(),
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for Reading {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match NumberOrText::deserialize(deserializer)? {
            NumberOrText::Number(n) => Ok(Reading::from(n)),
            NumberOrText::Text(s) => {
                let text = s.trim().to_string();
                let value = parse_number::<D::Error>(&text)?;
                Ok(Reading { value, text })
            }
        }
    }
}

impl Serialize for Reading {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.value)
    }
}

/// Number of forecast entries per day in a 3-hourly series.
pub const FORECAST_STEPS_PER_DAY: usize = 8;
/// Offset of the midday-ish reading inside each day.
pub const FORECAST_MIDDAY_OFFSET: usize = 4;
pub const FORECAST_MAX_DAYS: usize = 5;

/// Pick one reading per day: indices 4, 12, 20, 28, 36.
pub fn sample_daily_forecast(entries: &[ForecastEntry]) -> Vec<&ForecastEntry> {
    entries
        .iter()
        .skip(FORECAST_MIDDAY_OFFSET)
        .step_by(FORECAST_STEPS_PER_DAY)
        .take(FORECAST_MAX_DAYS)
        .collect()
}

/// Parse the timestamp shapes the backend emits: RFC 3339, HTTP-date
/// (`Fri, 05 Jan 2024 12:00:00 GMT`) and naive `YYYY-MM-DD HH:MM:SS`,
/// which is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|ndt| ndt.and_utc())
}

/// DECIMAL columns come through as JSON strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => parse_number(&s),
    }
}

fn parse_number<E: serde::de::Error>(text: &str) -> Result<f64, E> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| E::custom(format!("expected a number, got '{text}'")))
}

fn lenient_u8<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_f64(deserializer).map(|n| n.round().clamp(0.0, u8::MAX as f64) as u8)
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_f64(deserializer).map(|n| n.round().clamp(0.0, u32::MAX as f64) as u32)
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("unrecognized timestamp '{raw}'")))
}
