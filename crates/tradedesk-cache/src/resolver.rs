//! Read-through resolution of service request identifiers.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use tradedesk_client::traits::ServiceRequestApi;
use tradedesk_core::config::cache::CacheConfig;
use tradedesk_core::error::AppError;
use tradedesk_core::result::AppResult;
use tradedesk_core::types::{ListPayload, PageRequest};
use tradedesk_entity::offer::OfferRecord;
use tradedesk_entity::raw::RawRecord;
use tradedesk_entity::service_request::ServiceRequestRecord;

use crate::normalize::{normalize_offer, normalize_service_requests};
use crate::provider::build_store;
use crate::store::RecordStore;

/// A service request together with its offer, when that offer is cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedServiceRequest {
    /// The service request.
    pub request: ServiceRequestRecord,
    /// The offer referenced by `request.offer_id`.
    pub offer: Option<OfferRecord>,
}

/// Resolves service request identifiers with at most one listing round
/// trip per unseen identifier.
///
/// Every record returned by a listing is cached, not just the one asked
/// for. Concurrent misses on the same identifier each fetch; reads are
/// idempotent so no request coalescing is done.
#[derive(Debug, Clone)]
pub struct EntityResolutionCache {
    api: Arc<dyn ServiceRequestApi>,
    requests: Arc<dyn RecordStore<ServiceRequestRecord>>,
    offers: Arc<dyn RecordStore<OfferRecord>>,
    default_page: PageRequest,
}

impl EntityResolutionCache {
    /// Create a cache over explicit stores.
    pub fn new(
        api: Arc<dyn ServiceRequestApi>,
        requests: Arc<dyn RecordStore<ServiceRequestRecord>>,
        offers: Arc<dyn RecordStore<OfferRecord>>,
    ) -> Self {
        Self {
            api,
            requests,
            offers,
            default_page: PageRequest::default(),
        }
    }

    /// Create a cache whose stores are chosen by configuration.
    pub fn from_config(api: Arc<dyn ServiceRequestApi>, config: &CacheConfig) -> AppResult<Self> {
        let mut cache = Self::new(api, build_store(config)?, build_store(config)?);
        cache.default_page = PageRequest::new(config.default_page_limit, 0);
        Ok(cache)
    }

    /// Resolve `service_request_id` to its normalized record.
    ///
    /// Order of lookups: local store, the global listing (with `page`, or
    /// the configured default), then the by-offer listing for
    /// `hint_offer_id`. Returns `Ok(None)` when neither listing contains
    /// the identifier. A 401/403 from either listing is returned as an
    /// error instead, since it means the session rather than the data is
    /// the problem; other listing failures are logged and treated as a miss.
    pub async fn resolve_by_id(
        &self,
        service_request_id: &str,
        hint_offer_id: Option<&str>,
        page: Option<PageRequest>,
    ) -> AppResult<Option<ServiceRequestRecord>> {
        if let Some(record) = self.requests.get(service_request_id).await {
            debug!(service_request_id, "service request cache hit");
            return Ok(Some(record));
        }

        let mut auth_failure: Option<AppError> = None;

        let page = page.unwrap_or(self.default_page);
        match self.api.list_available(page).await {
            Ok(payload) => {
                self.upsert_payload(payload).await;
            }
            Err(e) => record_failure(&mut auth_failure, e, "available listing"),
        }
        if let Some(record) = self.requests.get(service_request_id).await {
            return Ok(Some(record));
        }

        if let Some(offer_id) = hint_offer_id.filter(|id| !id.is_empty()) {
            match self.api.list_by_offer(offer_id).await {
                Ok(payload) => {
                    self.upsert_payload(payload).await;
                }
                Err(e) => record_failure(&mut auth_failure, e, "by-offer listing"),
            }
            if let Some(record) = self.requests.get(service_request_id).await {
                return Ok(Some(record));
            }
        }

        match auth_failure {
            Some(err) => Err(err),
            None => {
                debug!(service_request_id, "service request not found in any listing");
                Ok(None)
            }
        }
    }

    /// Resolve a service request and join the cached offer it references.
    pub async fn resolve_with_offer(
        &self,
        service_request_id: &str,
        hint_offer_id: Option<&str>,
        page: Option<PageRequest>,
    ) -> AppResult<Option<ResolvedServiceRequest>> {
        let Some(request) = self
            .resolve_by_id(service_request_id, hint_offer_id, page)
            .await?
        else {
            return Ok(None);
        };
        let offer = self.offer(&request.offer_id).await;
        Ok(Some(ResolvedServiceRequest { request, offer }))
    }

    /// Merge records into the cache; an existing entry with the same
    /// identifier is overwritten.
    pub async fn upsert(&self, records: Vec<ServiceRequestRecord>) -> usize {
        let count = records.len();
        let entries = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        self.requests.insert_many(entries).await;
        count
    }

    /// Seed the cache from a listing a caller already fetched, so that
    /// detail lookups for any of its items are cache hits.
    pub async fn prime_from_list(&self, raws: &[RawRecord]) -> usize {
        let count = self.upsert(normalize_service_requests(raws)).await;
        info!(count, "primed service request cache");
        count
    }

    /// Normalize and cache offers; joined to requests by identifier.
    pub async fn upsert_offers(&self, raws: &[RawRecord]) -> usize {
        let entries: Vec<(String, OfferRecord)> = raws
            .iter()
            .filter_map(normalize_offer)
            .map(|offer| (offer.id.clone(), offer))
            .collect();
        let count = entries.len();
        self.offers.insert_many(entries).await;
        count
    }

    /// Cache-only lookup of a service request.
    pub async fn get(&self, service_request_id: &str) -> Option<ServiceRequestRecord> {
        self.requests.get(service_request_id).await
    }

    /// Cache-only lookup of an offer.
    pub async fn offer(&self, offer_id: &str) -> Option<OfferRecord> {
        if offer_id.is_empty() {
            return None;
        }
        self.offers.get(offer_id).await
    }

    /// Whether a service request is cached.
    pub async fn contains(&self, service_request_id: &str) -> bool {
        self.requests.contains(service_request_id).await
    }

    /// Number of cached service requests.
    pub async fn len(&self) -> u64 {
        self.requests.len().await
    }

    /// Whether no service requests are cached.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop everything (logout).
    pub async fn clear(&self) {
        self.requests.clear().await;
        self.offers.clear().await;
        info!("entity resolution cache cleared");
    }

    async fn upsert_payload(&self, payload: ListPayload<RawRecord>) -> usize {
        let raws = payload.into_items();
        self.upsert(normalize_service_requests(&raws)).await
    }
}

/// Keep the first authorization failure; log everything else as a miss.
fn record_failure(slot: &mut Option<AppError>, err: AppError, source: &str) {
    if err.is_auth_failure() {
        warn!(status = ?err.status, source, "listing rejected by authorization");
        if slot.is_none() {
            *slot = Some(err);
        }
    } else {
        warn!(error = %err, source, "listing failed, treating as miss");
    }
}

/// Convenience for callers holding untyped JSON rows.
pub fn raw_records(values: Vec<Value>) -> Vec<RawRecord> {
    values.into_iter().map(RawRecord::from).collect()
}
