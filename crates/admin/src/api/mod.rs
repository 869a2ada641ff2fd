//! REST client for the CRM backend.
//!
//! The backend is a plain JSON resource server (json-server style): every
//! collection lives at `/{resource}` and every record at `/{resource}/{id}`.
//! There is no authentication, no pagination and no server-side filtering;
//! the console always fetches whole collections.
//!
//! # Endpoints
//!
//! - `GET /{resource}` / `POST /{resource}`
//! - `GET /{resource}/{id}` / `PUT /{resource}/{id}` / `DELETE /{resource}/{id}`
//! - `GET /settings/1` / `PUT /settings/1`

mod resource;

pub use resource::*;

use std::sync::Arc;
use std::time::Duration;

use crm_console_core::Settings;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ConsoleConfig;

/// Errors that can occur when talking to the REST backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure: connection refused, timeout, TLS.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("API error: {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    /// The record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The body was not the JSON we expected.
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// A request URL could not be built from the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// REST backend client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client from the console configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &ConsoleConfig) -> Result<Self, ApiError> {
        Self::with_base_url(config.api_base_url.clone(), config.request_timeout)
    }

    /// Create a client for an explicit base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the URL cannot carry a path or the HTTP client fails to build.
    pub fn with_base_url(base_url: Url, timeout: Option<Duration>) -> Result<Self, ApiError> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
        })
    }

    /// The base URL every resource path is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build `{base}/{segments...}` with each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn record_url<R: Resource>(&self, id: &R::Id) -> Result<Url, ApiError> {
        let id = id.to_string();
        self.url(&[R::PATH, id.as_str()])
    }

    // =========================================================================
    // Resource operations
    // =========================================================================

    /// Fetch a whole collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a list of records.
    #[instrument(skip(self), fields(resource = R::PATH))]
    pub async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        let url = self.url(&[R::PATH])?;
        let records: Vec<R> = self.get_json(url).await?;
        debug!(count = records.len(), "Fetched collection");
        Ok(records)
    }

    /// Fetch one record.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the record does not exist.
    #[instrument(skip(self), fields(resource = R::PATH, id = %id))]
    pub async fn get<R: Resource>(&self, id: &R::Id) -> Result<R, ApiError> {
        let url = self.record_url::<R>(id)?;
        self.get_json(url).await
    }

    /// Create a record; the server assigns the id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the record.
    #[instrument(skip(self, draft), fields(resource = R::PATH))]
    pub async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<R, ApiError> {
        let url = self.url(&[R::PATH])?;
        let response = self.inner.client.post(url.clone()).json(draft).send().await?;
        Self::handle_response(url, response).await
    }

    /// Replace a record with the given fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the record does not exist.
    #[instrument(skip(self, draft), fields(resource = R::PATH, id = %id))]
    pub async fn update<R: Resource>(&self, id: &R::Id, draft: &R::Draft) -> Result<R, ApiError> {
        let url = self.record_url::<R>(id)?;
        self.put_json(url, draft).await
    }

    /// Delete a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the record does not exist.
    #[instrument(skip(self), fields(resource = R::PATH, id = %id))]
    pub async fn delete<R: Resource>(&self, id: &R::Id) -> Result<(), ApiError> {
        let url = self.record_url::<R>(id)?;
        let response = self.inner.client.delete(url.clone()).send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(Self::parse_error(url, response).await)
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Fetch the settings singleton.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a settings record.
    #[instrument(skip(self))]
    pub async fn get_settings(&self) -> Result<Settings, ApiError> {
        let url = self.url(&["settings", Settings::singleton_id().as_str()])?;
        self.get_json(url).await
    }

    /// Replace the settings singleton.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects the settings.
    #[instrument(skip(self, settings))]
    pub async fn put_settings(&self, settings: &Settings) -> Result<Settings, ApiError> {
        let url = self.url(&["settings", Settings::singleton_id().as_str()])?;
        self.put_json(url, settings).await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        Self::handle_response(url, response).await
    }

    async fn put_json<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.inner.client.put(url.clone()).json(body).send().await?;
        Self::handle_response(url, response).await
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        url: Url,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        if !response.status().is_success() {
            return Err(Self::parse_error(url, response).await);
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Turn a non-success response into an error.
    async fn parse_error(url: Url, response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        if status == 404 {
            return ApiError::NotFound(url.to_string());
        }

        let body = response.text().await.unwrap_or_default();
        ApiError::Status {
            status,
            url: url.to_string(),
            body,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use crm_console_core::{
        Lead, LeadDraft, LeadId, LeadStatus, Opportunity, OpportunityDraft, OpportunityId, User,
    };
    use mockito::Matcher;

    use super::*;

    fn client(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::with_base_url(Url::parse(&server.url()).unwrap(), None).unwrap()
    }

    #[tokio::test]
    async fn test_list_decodes_mixed_ids() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/leads")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1, "name": "John Doe"}, {"id": "a1b2", "name": "Jane Smith"}]"#)
            .create_async()
            .await;

        let leads = client(&server).list::<Lead>().await.unwrap();
        mock.assert_async().await;
        assert_eq!(leads.len(), 2);
        assert_eq!(leads[1].id, LeadId::from("a1b2"));
    }

    #[tokio::test]
    async fn test_create_posts_camel_case_draft() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/leads")
            .match_body(Matcher::PartialJsonString(
                r#"{"name": "Jane", "email": "jane@x.com", "status": "New"}"#.to_string(),
            ))
            .with_status(201)
            .with_body(r#"{"id": 7, "name": "Jane", "email": "jane@x.com", "status": "New"}"#)
            .create_async()
            .await;

        let lead: Lead = client(&server)
            .create::<Lead>(&LeadDraft::new("Jane", "jane@x.com"))
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(lead.id, LeadId::from(7));
        assert_eq!(lead.status, LeadStatus::New);
    }

    #[tokio::test]
    async fn test_update_and_delete_address_the_record() {
        let mut server = mockito::Server::new_async().await;
        let put = server
            .mock("PUT", "/opportunities/3")
            .with_status(200)
            .with_body(r#"{"id": 3, "name": "Deal", "value": 100, "leadId": 1}"#)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/opportunities/3")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let api = client(&server);
        let id = OpportunityId::from(3);
        let draft = OpportunityDraft {
            name: "Deal".to_string(),
            ..Default::default()
        };
        let updated: Opportunity = api.update::<Opportunity>(&id, &draft).await.unwrap();
        assert_eq!(updated.name, "Deal");
        api.delete::<Opportunity>(&id).await.unwrap();

        put.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_mapping() {
        let mut server = mockito::Server::new_async().await;
        let _missing = server
            .mock("GET", "/leads/99")
            .with_status(404)
            .with_body("{}")
            .create_async()
            .await;
        let _broken = server
            .mock("GET", "/leads")
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;
        let _garbage = server
            .mock("GET", "/users")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let api = client(&server);
        let err = api.get::<Lead>(&LeadId::from(99)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(ref url) if url.ends_with("/leads/99")));

        let err = api.list::<Lead>().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, ref body, .. } if body == "boom"));

        let err = api.list::<User>().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_base_url_path_is_kept() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/settings/1")
            .with_status(200)
            .with_body(r#"{"id": 1, "notifications": false, "defaultRep": "Bob", "timeZone": "EST"}"#)
            .create_async()
            .await;

        let base = Url::parse(&format!("{}/api/", server.url())).unwrap();
        let api = ApiClient::with_base_url(base, Some(Duration::from_secs(5))).unwrap();
        let settings = api.get_settings().await.unwrap();
        mock.assert_async().await;
        assert!(!settings.notifications);
        assert_eq!(settings.default_rep, "Bob");
    }

    #[test]
    fn test_rejects_opaque_base_url() {
        let url = Url::parse("mailto:sales@example.com").unwrap();
        assert!(matches!(
            ApiClient::with_base_url(url, None),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
