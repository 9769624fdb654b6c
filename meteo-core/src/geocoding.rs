//! Place-name search against the geocoding API.

use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::Config,
    model::{GeoLocation, LookupError, LookupState},
};

/// Queries shorter than this issue no request at all.
pub const MIN_QUERY_CHARS: usize = 2;

/// Fixed user-facing message for any failed search.
pub const SEARCH_FAILED_MSG: &str = "Failed to search location.";

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    /// Absent entirely when the query matched nothing.
    results: Option<Vec<GeoLocation>>,
}

/// Transport wrapper for the geocoding search endpoint.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    http: Client,
    base_url: String,
    result_count: u8,
    language: String,
}

impl GeocodingClient {
    pub fn from_config(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.geocoding_url.clone(),
            result_count: config.result_count,
            language: config.language.clone(),
        }
    }

    /// Look up candidate locations for a free-text place name.
    ///
    /// A well-formed response without a `results` field means "no matches"
    /// and yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] on transport failure, a non-success status,
    /// or an unparseable body.
    pub async fn search(&self, query: &str) -> Result<Vec<GeoLocation>, LookupError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("name", query.to_string()),
                ("count", self.result_count.to_string()),
                ("language", self.language.clone()),
                ("format", "json".to_string()),
            ])
            .send()
            .await
            .map_err(LookupError::Network)?;

        let status = res.status();
        let body = res.text().await.map_err(LookupError::Network)?;

        if !status.is_success() {
            return Err(LookupError::from_status(status, &body));
        }

        let parsed: GeocodingResponse =
            serde_json::from_str(&body).map_err(LookupError::Decode)?;

        Ok(parsed.results.unwrap_or_default())
    }
}

impl Default for GeocodingClient {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Stateful search component: holds the current candidate list and the
/// phase of the most recent request.
#[derive(Debug, Default)]
pub struct LocationSearch {
    client: GeocodingClient,
    locations: Vec<GeoLocation>,
    state: LookupState,
}

impl LocationSearch {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: GeocodingClient::from_config(config),
            locations: Vec::new(),
            state: LookupState::Idle,
        }
    }

    /// Run a search and update the candidate list.
    ///
    /// Queries shorter than [`MIN_QUERY_CHARS`] are a complete no-op: no
    /// request goes out and no state changes, not even the phase. On
    /// success the list is replaced wholesale; on failure it is left
    /// untouched and the cause is kept in the failed phase.
    pub async fn search(&mut self, query: &str) {
        if query.chars().count() < MIN_QUERY_CHARS {
            return;
        }

        self.state = LookupState::Loading;

        match self.client.search(query).await {
            Ok(locations) => {
                self.locations = locations;
                self.state = LookupState::Success;
            }
            Err(err) => {
                tracing::warn!("Location search for {query:?} failed: {err}");
                self.state = LookupState::Failed(err);
            }
        }
    }

    /// Empty the candidate list without touching the request phase.
    pub fn clear(&mut self) {
        self.locations.clear();
    }

    pub fn locations(&self) -> &[GeoLocation] {
        &self.locations
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
        self.error().map(|_| SEARCH_FAILED_MSG)
    }
}
