//! Availability query with primary-then-secondary fallback.
//!
//! A query is always for "tomorrow" relative to the local clock and is never
//! cached. The primary source is the public appointment aggregator; if it
//! fails for any reason the same query goes to the project's own API. Only
//! when both fail does the caller see an error, and that error carries no
//! detail beyond what was logged.

use async_trait::async_trait;
use chrono::NaiveDate;
use covin_core::dates::tomorrow_query_date;
use covin_core::types::{CenterResponse, DistrictId};
use covin_core::vaccine::VaccineType;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ORIGIN, REFERER, USER_AGENT};

use crate::config::{ClientConfig, PrimaryHeaders};
use crate::error::{ClientError, ClientResult};
use crate::http::HttpAccess;

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// One date-stamped availability request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    pub district_id: DistrictId,
    /// `DD-MM-YYYY`.
    pub date: String,
    /// Upstream vaccine name; `None` means no filter.
    pub vaccine: Option<String>,
}

impl AvailabilityQuery {
    /// Query for the day after `today`.
    pub fn for_tomorrow(district_id: DistrictId, vaccine: VaccineType, today: NaiveDate) -> Self {
        Self {
            district_id,
            date: tomorrow_query_date(today),
            vaccine: vaccine.query_value().map(str::to_string),
        }
    }

    /// Query-string pairs. `vaccine` is left out entirely when unfiltered.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("district_id", self.district_id.to_string()),
            ("date", self.date.clone()),
        ];
        if let Some(vaccine) = &self.vaccine {
            params.push(("vaccine", vaccine.clone()));
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// A backend that can answer an [`AvailabilityQuery`].
#[async_trait]
pub trait AvailabilitySource: Send + Sync {
    /// Short label used in log lines.
    fn name(&self) -> &str;

    async fn find(&self, query: &AvailabilityQuery) -> ClientResult<CenterResponse>;
}

/// Availability source reached with a plain GET and query string.
pub struct HttpAvailabilitySource {
    name: &'static str,
    http: HttpAccess,
    url: String,
}

impl HttpAvailabilitySource {
    pub fn new(name: &'static str, http: HttpAccess, url: String) -> Self {
        Self { name, http, url }
    }

    /// The public aggregator, sent the configured browser-like headers.
    pub fn primary(config: &ClientConfig) -> ClientResult<Self> {
        let http = HttpAccess::with_default_headers(primary_header_map(&config.primary_headers))?;
        Ok(Self::new(
            "primary",
            http,
            format!(
                "{}/v2/appointment/sessions/calendarByDistrict",
                config.setu_base_url
            ),
        ))
    }

    /// The project's own `/centers` endpoint.
    pub fn fallback(config: &ClientConfig, http: HttpAccess) -> Self {
        Self::new("secondary", http, format!("{}/centers", config.api_base_url))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AvailabilitySource for HttpAvailabilitySource {
    fn name(&self) -> &str {
        self.name
    }

    async fn find(&self, query: &AvailabilityQuery) -> ClientResult<CenterResponse> {
        let request = self.http.get(&self.url).query(&query.params());
        self.http.fetch_json(request).await
    }
}

/// Header values that fail to parse are skipped with a warning.
fn primary_header_map(headers: &PrimaryHeaders) -> HeaderMap {
    let mut map = HeaderMap::new();
    let pairs: [(HeaderName, &Option<String>); 3] = [
        (USER_AGENT, &headers.user_agent),
        (REFERER, &headers.referer),
        (ORIGIN, &headers.origin),
    ];
    for (name, value) in pairs {
        let Some(value) = value else { continue };
        match HeaderValue::from_str(value) {
            Ok(value) => {
                map.insert(name, value);
            }
            Err(e) => tracing::warn!(header = %name, error = %e, "Skipping invalid header value"),
        }
    }
    map
}

// ---------------------------------------------------------------------------
// Fallback strategy
// ---------------------------------------------------------------------------

/// Availability lookup over a primary and a secondary source.
pub struct Availability {
    primary: Box<dyn AvailabilitySource>,
    secondary: Box<dyn AvailabilitySource>,
}

impl Availability {
    pub fn new(primary: Box<dyn AvailabilitySource>, secondary: Box<dyn AvailabilitySource>) -> Self {
        Self { primary, secondary }
    }

    /// Aggregator first, own API second.
    pub fn from_config(config: &ClientConfig, http: HttpAccess) -> ClientResult<Self> {
        Ok(Self::new(
            Box::new(HttpAvailabilitySource::primary(config)?),
            Box::new(HttpAvailabilitySource::fallback(config, http)),
        ))
    }

    /// Centers with sessions tomorrow, by the local clock.
    pub async fn find_centers(
        &self,
        district_id: DistrictId,
        vaccine: VaccineType,
    ) -> ClientResult<CenterResponse> {
        let today = chrono::Local::now().date_naive();
        self.find_centers_on(&AvailabilityQuery::for_tomorrow(district_id, vaccine, today))
            .await
    }

    /// Run `query` against the primary source, falling back to the
    /// secondary on any failure.
    pub async fn find_centers_on(&self, query: &AvailabilityQuery) -> ClientResult<CenterResponse> {
        let primary_err = match self.primary.find(query).await {
            Ok(response) => {
                tracing::debug!(
                    source = self.primary.name(),
                    district_id = query.district_id,
                    centers = response.centers.len(),
                    "Availability fetched"
                );
                return Ok(response);
            }
            Err(e) => e,
        };

        tracing::warn!(
            source = self.primary.name(),
            district_id = query.district_id,
            date = %query.date,
            vaccine = query.vaccine.as_deref().unwrap_or("any"),
            error = %primary_err,
            "Availability source failed, trying {}",
            self.secondary.name()
        );

        match self.secondary.find(query).await {
            Ok(response) => {
                tracing::debug!(
                    source = self.secondary.name(),
                    district_id = query.district_id,
                    centers = response.centers.len(),
                    "Availability fetched"
                );
                Ok(response)
            }
            Err(e) => {
                tracing::error!(
                    district_id = query.district_id,
                    date = %query.date,
                    primary_error = %primary_err,
                    secondary_error = %e,
                    "All availability sources failed"
                );
                Err(ClientError::Unavailable)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
