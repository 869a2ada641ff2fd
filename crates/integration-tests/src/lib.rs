//! End-to-end tests for the CRM console.
//!
//! Every test drives the admin library the way the `crm` binary does, against
//! a `mockito` server standing in for the REST backend. Print jobs land in a
//! temporary spool directory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p crm-console-integration-tests
//!
//! # Include the tests that talk to a real backend
//! CRM_API_BASE_URL=http://localhost:4000 cargo test -p crm-console-integration-tests -- --ignored
//! ```

use std::collections::HashMap;
use std::path::Path;

use crm_console_admin::{Console, ConsoleConfig};
use mockito::{Mock, ServerGuard};
use tempfile::TempDir;

/// Print queue the test console uses when none is given.
pub const TEST_PRINTER: &str = "Front Desk";

/// A mock backend plus a console pointed at it.
pub struct TestContext {
    pub server: ServerGuard,
    pub console: Console,
    pub spool: TempDir,
}

impl TestContext {
    /// Start a mock backend and build a console for it.
    ///
    /// # Panics
    ///
    /// Panics if the spool directory or the console cannot be created.
    pub async fn new() -> Self {
        Self::with_vars(&[]).await
    }

    /// Like [`TestContext::new`], with extra environment variables.
    ///
    /// # Panics
    ///
    /// Panics if the spool directory or the console cannot be created.
    #[allow(clippy::unwrap_used)]
    pub async fn with_vars(vars: &[(&str, &str)]) -> Self {
        let server = mockito::Server::new_async().await;
        let spool = tempfile::tempdir().unwrap();

        let mut env: HashMap<String, String> = HashMap::from([
            ("CRM_API_BASE_URL".to_string(), server.url()),
            (
                "CRM_PRINT_SPOOL_DIR".to_string(),
                spool.path().display().to_string(),
            ),
            ("CRM_DEFAULT_PRINTER".to_string(), TEST_PRINTER.to_string()),
        ]);
        for (key, value) in vars {
            env.insert((*key).to_string(), (*value).to_string());
        }

        let config = ConsoleConfig::from_lookup(|key| env.get(key).cloned()).unwrap();
        let console = Console::new(config).unwrap();
        Self {
            server,
            console,
            spool,
        }
    }

    /// Serve `body` for `GET /{path}`, expecting `hits` requests.
    pub async fn serve(&mut self, path: &str, body: &str, hits: usize) -> Mock {
        self.server
            .mock("GET", format!("/{path}").as_str())
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    /// Jobs spooled for `queue`, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the queue directory cannot be read.
    #[allow(clippy::unwrap_used)]
    #[must_use]
    pub fn spooled(&self, queue: &str) -> Vec<Vec<u8>> {
        let dir = self.spool.path().join(queue);
        if !dir.exists() {
            return Vec::new();
        }
        let mut paths: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        paths.sort();
        paths.iter().map(|p| std::fs::read(p).unwrap()).collect()
    }

    #[must_use]
    pub fn spool_root(&self) -> &Path {
        self.spool.path()
    }
}
