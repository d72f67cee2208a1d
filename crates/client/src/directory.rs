//! Directory cache: district and center lists held for the process lifetime.
//!
//! Each list is fetched once on first read, stored unfiltered in a
//! [`Snapshot`], and every later read (including per-district and
//! per-state lookups) filters the stored snapshot without touching the
//! network. There is no expiry; [`DirectoryCache::reset`] drops the
//! snapshots explicitly.
//!
//! Two reads racing before the first fetch resolves may both fetch; the
//! last one to finish wins the slot.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use covin_core::types::{CenterDim, CenterId, District, DistrictId, StateId};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::{ClientError, ClientResult};
use crate::http::HttpAccess;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Single-slot cache of a list, shared by reference once populated.
pub struct Snapshot<T> {
    slot: RwLock<Option<Arc<Vec<T>>>>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }
}

impl<T> Snapshot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached list, if populated.
    pub async fn get(&self) -> Option<Arc<Vec<T>>> {
        self.slot.read().await.clone()
    }

    /// Store `values`, replacing whatever was there.
    pub async fn init(&self, values: Vec<T>) -> Arc<Vec<T>> {
        let values = Arc::new(values);
        *self.slot.write().await = Some(Arc::clone(&values));
        values
    }

    /// Return the cached list, or run `fetch` and cache its result.
    ///
    /// The slot is not locked while `fetch` runs. A failed fetch leaves the
    /// slot empty.
    pub async fn get_or_init<F, Fut, E>(&self, fetch: F) -> Result<Arc<Vec<T>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        if let Some(values) = self.get().await {
            return Ok(values);
        }
        let values = fetch().await?;
        Ok(self.init(values).await)
    }

    pub async fn reset(&self) {
        *self.slot.write().await = None;
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Where the bulk directory documents come from.
#[async_trait]
pub trait DirectorySource: Send + Sync {
    async fn fetch_districts(&self) -> ClientResult<Vec<District>>;
    async fn fetch_centers(&self) -> ClientResult<Vec<CenterDim>>;
}

/// The bulk district document is either a bare array or the upstream
/// `{ "districts": [...] }` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum DistrictDocument {
    Bare(Vec<District>),
    Envelope { districts: Vec<EnvelopeDistrict> },
}

/// Envelope entries come from a per-state document and omit `state_id`.
#[derive(Deserialize)]
struct EnvelopeDistrict {
    district_id: DistrictId,
    district_name: String,
    #[serde(default)]
    state_id: Option<StateId>,
}

impl DistrictDocument {
    /// Envelope entries without a state are stamped with `state_id`.
    fn into_districts(self, state_id: StateId) -> Vec<District> {
        match self {
            Self::Bare(districts) => districts,
            Self::Envelope { districts } => districts
                .into_iter()
                .map(|d| District {
                    district_id: d.district_id,
                    district_name: d.district_name,
                    state_id: d.state_id.unwrap_or(state_id),
                })
                .collect(),
        }
    }
}

/// Fetches both directory documents over unauthenticated HTTP.
///
/// `state_id` is the state an enveloped district document belongs to.
pub struct HttpDirectorySource {
    http: HttpAccess,
    districts_url: String,
    centers_url: String,
    state_id: StateId,
}

impl HttpDirectorySource {
    pub fn new(
        http: HttpAccess,
        districts_url: String,
        centers_url: String,
        state_id: StateId,
    ) -> Self {
        Self {
            http,
            districts_url,
            centers_url,
            state_id,
        }
    }
}

#[async_trait]
impl DirectorySource for HttpDirectorySource {
    async fn fetch_districts(&self) -> ClientResult<Vec<District>> {
        let doc: DistrictDocument = self
            .http
            .fetch_json(self.http.get(&self.districts_url))
            .await?;
        Ok(doc.into_districts(self.state_id))
    }

    async fn fetch_centers(&self) -> ClientResult<Vec<CenterDim>> {
        self.http.fetch_json(self.http.get(&self.centers_url)).await
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

/// Process-wide district and center directory.
///
/// Construct once at startup and pass by reference to consumers.
pub struct DirectoryCache {
    source: Arc<dyn DirectorySource>,
    state_id: StateId,
    districts: Snapshot<District>,
    /// Memoized view of `districts` restricted to `state_id`.
    state_districts: Snapshot<District>,
    centers: Snapshot<CenterDim>,
}

impl DirectoryCache {
    pub fn new(source: Arc<dyn DirectorySource>, state_id: StateId) -> Self {
        Self {
            source,
            state_id,
            districts: Snapshot::new(),
            state_districts: Snapshot::new(),
            centers: Snapshot::new(),
        }
    }

    pub fn state_id(&self) -> StateId {
        self.state_id
    }

    /// Every district in the directory, unfiltered.
    pub async fn all_districts(&self) -> ClientResult<Arc<Vec<District>>> {
        let source = &self.source;
        self.districts
            .get_or_init(|| async move {
                let districts = source.fetch_districts().await.inspect_err(|e| {
                    tracing::error!(error = %e, "Failed to fetch district directory");
                })?;
                tracing::debug!(count = districts.len(), "District directory cached");
                Ok::<_, ClientError>(districts)
            })
            .await
    }

    /// Districts of the configured state, in directory order.
    pub async fn districts(&self) -> ClientResult<Arc<Vec<District>>> {
        if let Some(districts) = self.state_districts.get().await {
            return Ok(districts);
        }
        let all = self.all_districts().await?;
        let filtered = all
            .iter()
            .filter(|d| d.state_id == self.state_id)
            .cloned()
            .collect();
        Ok(self.state_districts.init(filtered).await)
    }

    /// Look up one district of the configured state.
    pub async fn district(&self, district_id: DistrictId) -> ClientResult<Option<District>> {
        Ok(self
            .districts()
            .await?
            .iter()
            .find(|d| d.district_id == district_id)
            .cloned())
    }

    /// Every center in the directory, unfiltered.
    pub async fn all_centers(&self) -> ClientResult<Arc<Vec<CenterDim>>> {
        let source = &self.source;
        self.centers
            .get_or_init(|| async move {
                let centers = source.fetch_centers().await.inspect_err(|e| {
                    tracing::error!(error = %e, "Failed to fetch center directory");
                })?;
                tracing::debug!(count = centers.len(), "Center directory cached");
                Ok::<_, ClientError>(centers)
            })
            .await
    }

    /// Centers in `district_id`, preserving directory order. Unknown
    /// districts yield an empty list.
    pub async fn centers(&self, district_id: DistrictId) -> ClientResult<Vec<CenterDim>> {
        Ok(self
            .all_centers()
            .await?
            .iter()
            .filter(|c| c.district_id == district_id)
            .cloned()
            .collect())
    }

    /// Center id to name, for labelling a selection.
    pub async fn center_names(
        &self,
        district_id: DistrictId,
    ) -> ClientResult<HashMap<CenterId, String>> {
        Ok(self
            .centers(district_id)
            .await?
            .into_iter()
            .map(|c| (c.center_id, c.name))
            .collect())
    }

    /// Drop both snapshots; the next read fetches again.
    pub async fn reset(&self) {
        self.districts.reset().await;
        self.state_districts.reset().await;
        self.centers.reset().await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
