//! Shared lead-name lookup.
//!
//! Opportunities, follow-ups and calls show the name of the lead they point
//! at. Rather than every screen fetching `/leads` on its own, they share one
//! [`LeadDirectory`] backed by a `moka` cache with a short TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crm_console_core::{Lead, LeadId, WithLead};
use moka::future::Cache;
use tracing::{debug, instrument};

use crate::api::{ApiClient, ApiError};

/// Lead id to display name, from one snapshot of `/leads`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadNames {
    names: HashMap<LeadId, String>,
}

impl LeadNames {
    /// Index a lead collection.
    #[must_use]
    pub fn from_leads(leads: &[Lead]) -> Self {
        Self {
            names: leads
                .iter()
                .map(|l| (l.id.clone(), l.name.clone()))
                .collect(),
        }
    }

    /// The name of a lead, if it exists.
    #[must_use]
    pub fn get(&self, id: &LeadId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    /// Join each record with the name of its lead.
    pub fn join<R: Clone>(
        &self,
        records: &[R],
        lead_id: impl Fn(&R) -> &LeadId,
    ) -> Vec<WithLead<R>> {
        records
            .iter()
            .map(|r| WithLead::new(r.clone(), self.get(lead_id(r))))
            .collect()
    }
}

/// Cached lead-name lookup shared between screens.
#[derive(Clone)]
pub struct LeadDirectory {
    inner: Arc<LeadDirectoryInner>,
}

struct LeadDirectoryInner {
    client: ApiClient,
    cache: Cache<(), Arc<LeadNames>>,
}

impl std::fmt::Debug for LeadDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadDirectory")
            .field("client", &self.inner.client)
            .finish_non_exhaustive()
    }
}

impl LeadDirectory {
    /// Create a directory whose snapshot lives for `ttl`.
    #[must_use]
    pub fn new(client: ApiClient, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();

        Self {
            inner: Arc::new(LeadDirectoryInner { client, cache }),
        }
    }

    /// Lead names, fetching `/leads` when the cached snapshot has expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the leads cannot be fetched.
    #[instrument(skip(self))]
    pub async fn names(&self) -> Result<Arc<LeadNames>, ApiError> {
        if let Some(names) = self.inner.cache.get(&()).await {
            debug!("Cache hit for lead names");
            return Ok(names);
        }

        let leads = self.inner.client.list::<Lead>().await?;
        Ok(self.prime(&leads).await)
    }

    /// Replace the cached snapshot with a freshly loaded lead collection.
    pub async fn prime(&self, leads: &[Lead]) -> Arc<LeadNames> {
        let names = Arc::new(LeadNames::from_leads(leads));
        self.inner.cache.insert((), Arc::clone(&names)).await;
        names
    }

    /// Drop the cached snapshot (after a lead was created, renamed or deleted).
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate(&()).await;
    }
}
