//! DigitalOcean API client implementation.
//!
//! API Documentation: <https://docs.digitalocean.com/reference/api/>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::models::{
    Action, ActionListResponse, AssignResourcesRequest, CreateDropletRequest,
    CreateSshKeyRequest, Droplet, DropletListResponse, DropletResponse, Links, Project,
    ProjectListResponse, ProjectResource, ProjectResourceListResponse, ProjectResponse,
    Snapshot, SnapshotListResponse, SshKey, SshKeyListResponse, SshKeyResponse,
};
use super::traits::DoApi;
use crate::error::{Error, Result};

/// Base URL for the DigitalOcean API.
const API_BASE_URL: &str = "https://api.digitalocean.com/v2";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Page size for list requests.
const PAGE_SIZE: u32 = 200;

/// One page of a listing. Implemented by the list envelopes so the
/// pagination walk in [`ApiClient::get_paginated`] can be shared.
trait Page: serde::de::DeserializeOwned {
    type Item;

    /// Take the items out of this page.
    fn take_items(&mut self) -> Vec<Self::Item>;

    /// Absolute URL of the following page, if any.
    fn next_url(&self) -> Option<String>;
}

macro_rules! impl_page {
    ($response:ty, $item:ty, $field:ident) => {
        impl Page for $response {
            type Item = $item;

            fn take_items(&mut self) -> Vec<$item> {
                std::mem::take(&mut self.$field)
            }

            fn next_url(&self) -> Option<String> {
                self.links.as_ref().and_then(Links::next_url)
            }
        }
    };
}

impl_page!(DropletListResponse, Droplet, droplets);
impl_page!(SnapshotListResponse, Snapshot, snapshots);
impl_page!(ActionListResponse, Action, actions);
impl_page!(SshKeyListResponse, SshKey, ssh_keys);
impl_page!(ProjectListResponse, Project, projects);
impl_page!(ProjectResourceListResponse, ProjectResource, resources);

/// HTTP implementation of [`DoApi`].
#[derive(Clone)]
pub struct ApiClient {
    /// HTTP client.
    client: Client,
    /// Base URL requests are made against.
    base_url: String,
    /// API token for authentication.
    token: String,
}

impl ApiClient {
    /// Create a client against the production API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(token, API_BASE_URL)
    }

    /// Create a client against a custom base URL. Used to point the crate
    /// at a mock server in tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_base_url(token: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Make an authenticated GET request to a path under the base URL.
    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        self.get_url(&url).await
    }

    /// Make an authenticated GET request to an absolute URL. Pagination
    /// links come back absolute, so follow-up page requests land here.
    async fn get_url<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url = %url, "GET request");

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// GET every page of a listing, following `links.pages.next` until
    /// the listing is exhausted.
    async fn get_paginated<P: Page>(&self, first_path: &str) -> Result<Vec<P::Item>> {
        let mut items = Vec::new();
        let mut page: P = self.get(first_path).await?;
        loop {
            items.extend(page.take_items());
            match page.next_url() {
                Some(next) => page = self.get_url(&next).await?,
                None => return Ok(items),
            }
        }
    }

    /// Make an authenticated POST request.
    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize,
    {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "POST request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await?;

        Self::handle_response(response).await
    }

    /// Make an authenticated DELETE request. A 404 counts as success, so
    /// deletes are idempotent.
    async fn delete(&self, path: &str) -> Result<()> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "DELETE request");

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(Error::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    /// Handle API response, parsing JSON or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&text).map_err(|e| {
                warn!(error = %e, body = %text, "Failed to parse response");
                Error::Serialization(e)
            })
        } else if status == StatusCode::NOT_FOUND {
            Err(Error::NotFound(text))
        } else {
            Err(Error::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }

    /// First-page path for a paginated listing.
    fn paged(path: &str) -> String {
        format!("{path}?page=1&per_page={PAGE_SIZE}")
    }
}

#[async_trait]
impl DoApi for ApiClient {
    async fn list_droplets(&self) -> Result<Vec<Droplet>> {
        self.get_paginated::<DropletListResponse>(&Self::paged("/droplets"))
            .await
    }

    async fn get_droplet(&self, id: i64) -> Result<Droplet> {
        let response: DropletResponse = self.get(&format!("/droplets/{id}")).await?;
        Ok(response.droplet)
    }

    async fn create_droplet(&self, request: &CreateDropletRequest) -> Result<Droplet> {
        let response: DropletResponse = self.post("/droplets", request).await?;
        Ok(response.droplet)
    }

    async fn delete_droplet(&self, id: i64) -> Result<()> {
        self.delete(&format!("/droplets/{id}")).await
    }

    async fn list_droplet_snapshots(&self, id: i64) -> Result<Vec<Snapshot>> {
        self.get_paginated::<SnapshotListResponse>(&Self::paged(&format!(
            "/droplets/{id}/snapshots"
        )))
        .await
    }

    async fn list_droplet_actions(&self, id: i64) -> Result<Vec<Action>> {
        self.get_paginated::<ActionListResponse>(&Self::paged(&format!(
            "/droplets/{id}/actions"
        )))
        .await
    }

    async fn list_ssh_keys(&self) -> Result<Vec<SshKey>> {
        self.get_paginated::<SshKeyListResponse>(&Self::paged("/account/keys"))
            .await
    }

    async fn get_ssh_key(&self, id: i64) -> Result<SshKey> {
        let response: SshKeyResponse = self.get(&format!("/account/keys/{id}")).await?;
        Ok(response.ssh_key)
    }

    async fn create_ssh_key(&self, request: &CreateSshKeyRequest) -> Result<SshKey> {
        let response: SshKeyResponse = self.post("/account/keys", request).await?;
        Ok(response.ssh_key)
    }

    async fn find_ssh_key_by_public_key(&self, public_key: &str) -> Result<Option<SshKey>> {
        let material = public_key.trim();
        let keys = self.list_ssh_keys().await?;
        Ok(keys.into_iter().find(|key| key.public_key.trim() == material))
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.get_paginated::<ProjectListResponse>(&Self::paged("/projects"))
            .await
    }

    async fn get_project(&self, id: &str) -> Result<Project> {
        let response: ProjectResponse = self.get(&format!("/projects/{id}")).await?;
        Ok(response.project)
    }

    async fn list_project_resources(&self, id: &str) -> Result<Vec<ProjectResource>> {
        self.get_paginated::<ProjectResourceListResponse>(&Self::paged(&format!(
            "/projects/{id}/resources"
        )))
        .await
    }

    async fn assign_project_resources(&self, id: &str, urns: &[String]) -> Result<()> {
        let body = AssignResourcesRequest {
            resources: urns.to_vec(),
        };
        let _: ProjectResourceListResponse = self
            .post(&format!("/projects/{id}/resources"), &body)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client = ApiClient::with_base_url("token", "http://127.0.0.1:8080/").unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:8080");
    }

    #[test]
    fn paged_path_includes_page_size() {
        assert_eq!(
            ApiClient::paged("/droplets"),
            "/droplets?page=1&per_page=200"
        );
    }
}
