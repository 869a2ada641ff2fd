//! Console screens.
//!
//! Each screen pairs a [`DataView`](crate::controller::DataView) with its
//! table descriptor and the collaborators it needs (the lead directory, a
//! print bridge). All screens share one [`Console`].

pub mod calls;
pub mod follow_ups;
pub mod leads;
pub mod linked;
pub mod opportunities;
pub mod reports;
pub mod settings;
pub mod users;

use std::sync::Arc;

use crate::api::{ApiClient, ApiError};
use crate::config::ConsoleConfig;
use crate::directory::LeadDirectory;

pub use calls::CallsScreen;
pub use follow_ups::FollowUpsScreen;
pub use leads::LeadsScreen;
pub use linked::{LeadLinked, LinkedScreen};
pub use opportunities::OpportunitiesScreen;
pub use reports::ReportsScreen;
pub use settings::SettingsScreen;
pub use users::UsersScreen;

/// Shared state of one console session.
#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    config: ConsoleConfig,
    client: ApiClient,
    directory: LeadDirectory,
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl Console {
    /// Build the REST client and lead directory for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ConsoleConfig) -> Result<Self, ApiError> {
        let client = ApiClient::new(&config)?;
        let directory = LeadDirectory::new(client.clone(), config.lead_cache_ttl);

        Ok(Self {
            inner: Arc::new(ConsoleInner {
                config,
                client,
                directory,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    #[must_use]
    pub fn directory(&self) -> &LeadDirectory {
        &self.inner.directory
    }

    /// Rows per page for new screens.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.inner.config.page_size
    }
}
