//! Storefront existence resolution.
//!
//! Custom domains are only served a storefront once the backend confirms one
//! is bound to them. Lookups are expensive and the answer changes rarely, so
//! results are cached per hostname for the lifetime of the process: the
//! cache has no TTL and is only ever invalidated explicitly. Concurrent
//! requests for the same hostname coalesce into a single backend lookup.

use moka::future::Cache;
use tracing::{debug, warn};

use nerix_core::{TenantProbe, TenantProbeResult};

use crate::backend::{BackendClient, BackendError, StoreSummary};

/// Upper bound on distinct hostnames kept in the probe cache.
const PROBE_CACHE_CAPACITY: u64 = 10_000;

/// Backend seam for storefront lookups.
///
/// Production uses [`BackendClient`]; tests substitute counting stubs.
pub trait StoreLookup: Send + Sync {
    /// Look up the storefront bound to `hostname`.
    fn lookup_store(
        &self,
        hostname: &str,
    ) -> impl Future<Output = Result<Option<StoreSummary>, BackendError>> + Send;
}

impl StoreLookup for BackendClient {
    fn lookup_store(
        &self,
        hostname: &str,
    ) -> impl Future<Output = Result<Option<StoreSummary>, BackendError>> + Send {
        // Method-call syntax resolves to the inherent client method.
        self.lookup_store(hostname)
    }
}

/// Resolves whether a storefront exists for a hostname, with caching.
///
/// Every failure mode of the underlying lookup (transport error, backend
/// fault, 404) folds into "no storefront"; absence is an answer here, not
/// an error, and it is never retried within the process lifetime.
pub struct TenantResolver<L> {
    lookup: L,
    cache: Cache<String, TenantProbeResult>,
}

impl<L: StoreLookup> TenantResolver<L> {
    /// Create a resolver over the given lookup backend.
    #[must_use]
    pub fn new(lookup: L) -> Self {
        // No time_to_live: entries persist until explicitly invalidated
        // or the process restarts.
        let cache = Cache::builder().max_capacity(PROBE_CACHE_CAPACITY).build();

        Self { lookup, cache }
    }

    /// Resolve the probe for `hostname`, issuing at most one backend lookup
    /// per distinct hostname.
    pub async fn resolve(&self, hostname: &str) -> TenantProbeResult {
        let host = hostname.to_ascii_lowercase();

        self.cache
            .get_with_by_ref(&host, async {
                match self.lookup.lookup_store(&host).await {
                    Ok(Some(store)) => {
                        debug!(host, store_id = %store.id, "storefront bound to host");
                        TenantProbeResult::found(store.id)
                    }
                    Ok(None) => {
                        debug!(host, "no storefront bound to host");
                        TenantProbeResult::not_found()
                    }
                    Err(err) => {
                        // Lookup failures read as absence, never as errors.
                        warn!(host, error = %err, "storefront lookup failed");
                        TenantProbeResult::not_found()
                    }
                }
            })
            .await
    }

    /// The cached probe for `hostname` without triggering a lookup.
    ///
    /// Returns [`TenantProbe::Pending`] while no settled result exists.
    pub async fn peek(&self, hostname: &str) -> TenantProbe {
        self.cache.get(&hostname.to_ascii_lowercase()).await.into()
    }

    /// Drop the cached probe for `hostname`, forcing the next resolve to
    /// hit the backend again.
    pub async fn invalidate(&self, hostname: &str) {
        self.cache.invalidate(&hostname.to_ascii_lowercase()).await;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use nerix_core::StoreId;

    use super::*;

    /// Stub lookup that counts calls and serves a fixed answer.
    #[derive(Clone)]
    struct StubLookup {
        calls: Arc<AtomicUsize>,
        answer: fn() -> Result<Option<StoreSummary>, BackendError>,
    }

    impl StubLookup {
        fn new(answer: fn() -> Result<Option<StoreSummary>, BackendError>) -> Self {
            Self {
                calls: Arc::new(AtomicUsize::new(0)),
                answer,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl StoreLookup for StubLookup {
        async fn lookup_store(
            &self,
            _hostname: &str,
        ) -> Result<Option<StoreSummary>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.answer)()
        }
    }

    fn some_store() -> Result<Option<StoreSummary>, BackendError> {
        Ok(Some(StoreSummary {
            id: StoreId::new("str_1"),
            name: "Aurora Goods".to_owned(),
        }))
    }

    fn no_store() -> Result<Option<StoreSummary>, BackendError> {
        Ok(None)
    }

    fn broken() -> Result<Option<StoreSummary>, BackendError> {
        Err(BackendError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            message: "upstream down".to_owned(),
        })
    }

    #[tokio::test]
    async fn test_found_store() {
        let resolver = TenantResolver::new(StubLookup::new(some_store));
        let probe = resolver.resolve("aurora.example").await;
        assert!(probe.exists);
        assert_eq!(probe.store_id, Some(StoreId::new("str_1")));
    }

    #[tokio::test]
    async fn test_missing_store_and_failure_both_read_as_absence() {
        let resolver = TenantResolver::new(StubLookup::new(no_store));
        assert_eq!(
            resolver.resolve("ghost.example").await,
            TenantProbeResult::not_found()
        );

        let resolver = TenantResolver::new(StubLookup::new(broken));
        assert_eq!(
            resolver.resolve("down.example").await,
            TenantProbeResult::not_found()
        );
    }

    #[tokio::test]
    async fn test_one_lookup_per_hostname() {
        let lookup = StubLookup::new(some_store);
        let resolver = TenantResolver::new(lookup.clone());

        resolver.resolve("aurora.example").await;
        resolver.resolve("aurora.example").await;
        resolver.resolve("aurora.example").await;
        assert_eq!(lookup.calls(), 1);

        resolver.resolve("other.example").await;
        assert_eq!(lookup.calls(), 2);
    }

    #[tokio::test]
    async fn test_failures_are_cached_not_retried() {
        let lookup = StubLookup::new(broken);
        let resolver = TenantResolver::new(lookup.clone());

        resolver.resolve("down.example").await;
        resolver.resolve("down.example").await;
        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test]
    async fn test_hostname_key_is_case_insensitive() {
        let lookup = StubLookup::new(some_store);
        let resolver = TenantResolver::new(lookup.clone());

        resolver.resolve("Aurora.Example").await;
        resolver.resolve("aurora.example").await;
        assert_eq!(lookup.calls(), 1);
    }

    #[tokio::test]
    async fn test_peek_reports_pending_until_settled() {
        let resolver = TenantResolver::new(StubLookup::new(some_store));

        assert_eq!(resolver.peek("aurora.example").await, TenantProbe::Pending);

        resolver.resolve("aurora.example").await;
        assert_eq!(
            resolver.peek("aurora.example").await,
            TenantProbe::Found(Some(StoreId::new("str_1")))
        );
    }

    #[tokio::test]
    async fn test_invalidate_forces_fresh_lookup() {
        let lookup = StubLookup::new(no_store);
        let resolver = TenantResolver::new(lookup.clone());

        resolver.resolve("ghost.example").await;
        resolver.invalidate("ghost.example").await;
        resolver.resolve("ghost.example").await;
        assert_eq!(lookup.calls(), 2);
    }
}
