use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One geocoding match candidate.
///
/// Deserialized field-for-field from an entry of the geocoding `results`
/// array; never merged or edited after that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    /// First-level administrative area (state/region), when the provider knows it.
    pub admin1: Option<String>,
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.admin1 {
            Some(admin1) => write!(f, "{}, {}, {}", self.name, admin1, self.country),
            None => write!(f, "{}, {}", self.name, self.country),
        }
    }
}

/// Current conditions at a coordinate pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCurrent {
    pub temperature: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub weather_code: i32,
    /// Day/night flag as reported upstream: 1 for day, 0 for night.
    pub is_day: u8,
}

impl WeatherCurrent {
    pub fn is_daytime(&self) -> bool {
        self.is_day != 0
    }
}

/// Short daily outlook as parallel arrays: index `i` across all four
/// describes the same calendar day. Equal length is checked when the
/// upstream response is mapped, not assumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDaily {
    pub time: Vec<NaiveDate>,
    pub weather_code: Vec<i32>,
    pub temp_max: Vec<f64>,
    pub temp_min: Vec<f64>,
}

impl WeatherDaily {
    /// Number of forecast days.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// True when all four arrays describe the same number of days.
    pub fn is_aligned(&self) -> bool {
        let n = self.time.len();
        self.weather_code.len() == n && self.temp_max.len() == n && self.temp_min.len() == n
    }
}

/// Normalized weather for one location, replaced wholesale on each
/// successful fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub timezone: String,
    pub current: WeatherCurrent,
    pub daily: WeatherDaily,
}

/// What went wrong during a lookup.
///
/// A closed set so callers can branch on the kind while the underlying
/// cause stays attached for diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse response JSON: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("response shape mismatch: {0}")]
    Shape(String),
}

impl LookupError {
    /// Build a status error, keeping only the start of a long error body.
    pub(crate) fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        const MAX_CHARS: usize = 200;

        let mut snippet: String = body.chars().take(MAX_CHARS).collect();
        if snippet.len() < body.len() {
            snippet.push_str("...");
        }

        LookupError::Status { status, body: snippet }
    }
}

/// Request phase of a lookup component.
///
/// Replaces the (busy, error) pair: a component is never both loading and
/// failed. The result value lives next to the state in each component so
/// that a failed call leaves the previously stored result observable.
#[derive(Debug, Default)]
pub enum LookupState {
    #[default]
    Idle,
    Loading,
    Success,
    Failed(LookupError),
}

impl LookupState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LookupState::Loading)
    }

    /// The underlying failure, when in the failed phase.
    pub fn error(&self) -> Option<&LookupError> {
        match self {
            LookupState::Failed(err) => Some(err),
            _ => None,
        }
    }
}
