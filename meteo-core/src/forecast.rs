//! Current conditions and daily outlook for a coordinate pair.

use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::Config,
    model::{LookupError, LookupState, WeatherCurrent, WeatherDaily, WeatherSnapshot},
};

/// Current-conditions fields requested from the forecast endpoint.
const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,is_day,weather_code,wind_speed_10m";

/// Daily fields requested from the forecast endpoint.
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min";

/// Fixed user-facing message for any failed fetch.
pub const FETCH_FAILED_MSG: &str = "Failed to fetch weather data. Please try again.";

/// Short description for a WMO weather code.
///
/// Total: codes outside the table come back as `"Unknown"`.
pub fn describe_weather_code(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    is_day: u8,
    weather_code: i32,
    wind_speed_10m: f64,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<NaiveDate>,
    weather_code: Vec<i32>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    timezone: String,
    current: OmCurrent,
    daily: OmDaily,
}

/// Rename upstream fields into the normalized snapshot. No unit
/// conversion, no derived values.
fn snapshot_from_response(parsed: OmForecastResponse) -> Result<WeatherSnapshot, LookupError> {
    let daily = WeatherDaily {
        time: parsed.daily.time,
        weather_code: parsed.daily.weather_code,
        temp_max: parsed.daily.temperature_2m_max,
        temp_min: parsed.daily.temperature_2m_min,
    };

    if !daily.is_aligned() {
        return Err(LookupError::Shape(format!(
            "daily arrays differ in length: time={}, weather_code={}, temp_max={}, temp_min={}",
            daily.time.len(),
            daily.weather_code.len(),
            daily.temp_max.len(),
            daily.temp_min.len(),
        )));
    }

    Ok(WeatherSnapshot {
        timezone: parsed.timezone,
        current: WeatherCurrent {
            temperature: parsed.current.temperature_2m,
            humidity: parsed.current.relative_humidity_2m,
            wind_speed: parsed.current.wind_speed_10m,
            weather_code: parsed.current.weather_code,
            is_day: parsed.current.is_day,
        },
        daily,
    })
}

/// Transport wrapper for the forecast endpoint.
#[derive(Debug, Clone)]
pub struct ForecastClient {
    http: Client,
    base_url: String,
}

impl ForecastClient {
    pub fn from_config(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.forecast_url.clone(),
        }
    }

    /// Fetch a normalized weather snapshot for a coordinate pair.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] on transport failure, a non-success status,
    /// an unparseable body, or misaligned daily arrays.
    pub async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot, LookupError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await
            .map_err(LookupError::Network)?;

        let status = res.status();
        let body = res.text().await.map_err(LookupError::Network)?;

        if !status.is_success() {
            return Err(LookupError::from_status(status, &body));
        }

        let parsed: OmForecastResponse =
            serde_json::from_str(&body).map_err(LookupError::Decode)?;

        snapshot_from_response(parsed)
    }
}

impl Default for ForecastClient {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Stateful weather component: holds the most recent snapshot and the
/// phase of the most recent request.
#[derive(Debug, Default)]
pub struct WeatherLookup {
    client: ForecastClient,
    snapshot: Option<WeatherSnapshot>,
    state: LookupState,
}

impl WeatherLookup {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: ForecastClient::from_config(config),
            snapshot: None,
            state: LookupState::Idle,
        }
    }

    /// Fetch weather for a coordinate pair and update the stored snapshot.
    ///
    /// On success the snapshot is replaced wholesale; on failure the prior
    /// snapshot stays untouched and the cause is kept in the failed phase.
    pub async fn fetch(&mut self, latitude: f64, longitude: f64) {
        self.state = LookupState::Loading;

        match self.client.fetch(latitude, longitude).await {
            Ok(snapshot) => {
                self.snapshot = Some(snapshot);
                self.state = LookupState::Success;
            }
            Err(err) => {
                tracing::warn!("Weather fetch for ({latitude}, {longitude}) failed: {err}");
                self.state = LookupState::Failed(err);
            }
        }
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// The underlying failure of the most recent request, if any.
    pub fn error(&self) -> Option<&LookupError> {
        self.state.error()
    }

    /// Fixed user-facing message when the most recent request failed.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error().map(|_| FETCH_FAILED_MSG)
    }
}
