//! HTTP record source for Socrata-style open data endpoints
//!
//! Fetches JSON record pages using the `$limit`/`$offset` paging parameters,
//! with caller-supplied filter parameters merged into each request.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info};

use super::{RecordSource, TransportError};
use crate::models::Record;

/// Per-request timeout, matching the upstream portal's gateway limit
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Application token header recognised by Socrata portals
const APP_TOKEN_HEADER: &str = "X-App-Token";

/// Blocking HTTP client for one dataset endpoint
///
/// # Example
///
/// ```rust,no_run
/// use soda_ingest::extract::SodaClient;
///
/// let client = SodaClient::new("https://data.cdc.gov/resource/dttw-5yxu.json")?;
/// # Ok::<(), soda_ingest::TransportError>(())
/// ```
pub struct SodaClient {
    endpoint: String,
    filters: HashMap<String, String>,
    app_token: Option<String>,
    client: reqwest::blocking::Client,
}

impl SodaClient {
    /// Create a client for `endpoint`
    pub fn new(endpoint: impl Into<String>) -> Result<Self, TransportError> {
        let endpoint = endpoint.into();
        if endpoint.is_empty() {
            return Err(TransportError::Endpoint(
                "endpoint must not be empty".to_string(),
            ));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| TransportError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            filters: HashMap::new(),
            app_token: None,
            client,
        })
    }

    /// Merge filter parameters (e.g. `$where` clauses) into every request
    pub fn with_filters(mut self, filters: HashMap<String, String>) -> Self {
        self.filters = filters;
        self
    }

    /// Send an application token with every request
    pub fn with_app_token(mut self, app_token: Option<String>) -> Self {
        self.app_token = app_token;
        self
    }

    /// The configured endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RecordSource for SodaClient {
    fn fetch_page(&self, limit: usize, offset: usize) -> Result<Vec<Record>, TransportError> {
        debug!(offset, limit, "Fetching page from source");

        let mut request = self
            .client
            .get(&self.endpoint)
            .query(&[("$limit", limit.to_string()), ("$offset", offset.to_string())]);

        for (name, value) in &self.filters {
            request = request.query(&[(name.as_str(), value.as_str())]);
        }

        if let Some(app_token) = &self.app_token {
            request = request.header(APP_TOKEN_HEADER, app_token);
        }

        let response = request
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: self.endpoint.clone(),
            });
        }

        let records: Vec<Record> = response
            .json()
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        info!(fetched = records.len(), offset, "Successfully fetched page");

        Ok(records)
    }
}
