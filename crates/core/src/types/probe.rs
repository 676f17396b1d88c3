//! Storefront existence probes.
//!
//! A custom domain cannot be served until the backend confirms a storefront
//! is actually bound to it. The probe outcome is modelled in two forms: the
//! settled, cacheable [`TenantProbeResult`], and the three-state
//! [`TenantProbe`] consumed by route selection, which adds the in-flight
//! `Pending` case.

use serde::{Deserialize, Serialize};

use super::id::StoreId;

/// Settled outcome of a storefront lookup for one hostname.
///
/// Valid only for the hostname it was fetched under. Lookup failures fold
/// into `exists: false`; there is no distinct error form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantProbeResult {
    /// Whether a storefront is bound to the probed hostname.
    pub exists: bool,
    /// The store's opaque identifier, when one exists.
    pub store_id: Option<StoreId>,
}

impl TenantProbeResult {
    /// A probe that found a storefront.
    #[must_use]
    pub const fn found(store_id: StoreId) -> Self {
        Self {
            exists: true,
            store_id: Some(store_id),
        }
    }

    /// A probe that found nothing (including every failure mode).
    #[must_use]
    pub const fn not_found() -> Self {
        Self {
            exists: false,
            store_id: None,
        }
    }
}

/// Three-state probe as seen by route selection.
///
/// Route selection must not commit to the no-tenant branch while a probe is
/// still `Pending`; the pending arm renders the storefront optimistically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantProbe {
    /// No settled result for this hostname yet.
    Pending,
    /// A storefront exists for this hostname.
    Found(Option<StoreId>),
    /// No storefront exists for this hostname.
    NotFound,
}

impl From<TenantProbeResult> for TenantProbe {
    fn from(result: TenantProbeResult) -> Self {
        if result.exists {
            Self::Found(result.store_id)
        } else {
            Self::NotFound
        }
    }
}

impl From<Option<TenantProbeResult>> for TenantProbe {
    fn from(result: Option<TenantProbeResult>) -> Self {
        result.map_or(Self::Pending, Into::into)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_found_probe_carries_store_id() {
        let result = TenantProbeResult::found(StoreId::new("str_1"));
        assert!(result.exists);
        assert_eq!(
            TenantProbe::from(result),
            TenantProbe::Found(Some(StoreId::new("str_1")))
        );
    }

    #[test]
    fn test_not_found_probe() {
        let result = TenantProbeResult::not_found();
        assert!(!result.exists);
        assert_eq!(TenantProbe::from(result), TenantProbe::NotFound);
    }

    #[test]
    fn test_missing_result_is_pending() {
        assert_eq!(TenantProbe::from(None), TenantProbe::Pending);
        assert_eq!(
            TenantProbe::from(Some(TenantProbeResult::not_found())),
            TenantProbe::NotFound
        );
    }
}
