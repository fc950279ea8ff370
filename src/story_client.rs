use crate::authentication::{AuthError, Credentials, fetch_bearer_token};
use crate::configuration::Settings;
use crate::domain::{ResponseEnvelope, Story, StoryPayload};
use crate::telemetry::error_chain_fmt;
use reqwest::{Client, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, Secret};

#[derive(thiserror::Error)]
pub enum StoryClientError {
    #[error("Failed to build the HTTP client.")]
    Build(#[source] reqwest::Error),
    #[error("Failed to log in to the Story API.")]
    Authentication(#[from] AuthError),
    #[error("The request to the Story API failed.")]
    Transport(#[source] reqwest::Error),
}

impl std::fmt::Debug for StoryClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// HTTP client for the Story API, carrying the bearer token on every request.
///
/// One instance is shared by the whole suite and released when dropped.
#[derive(Clone, Debug)]
pub struct StoryClient {
    base_url: String,
    http_client: Client,
    bearer_token: Secret<String>,
}

/// Status and raw body of a Story API response.
///
/// Error statuses are not turned into errors here: the suite asserts on them.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn contains(&self, needle: &str) -> bool {
        self.body.contains(needle)
    }

    pub fn envelope(&self) -> Result<ResponseEnvelope, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    pub fn stories(&self) -> Result<Vec<Story>, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

impl StoryClient {
    pub fn new(
        base_url: String,
        bearer_token: Secret<String>,
        timeout: std::time::Duration,
    ) -> Result<Self, StoryClientError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StoryClientError::Build)?;
        Ok(Self {
            base_url,
            http_client,
            bearer_token,
        })
    }

    /// Authenticate with the configured credentials and build the client
    /// that every suite step goes through.
    #[tracing::instrument(name = "Logging in to the Story API", skip_all, fields(base_url = %settings.api.base_url))]
    pub async fn login(settings: &Settings) -> Result<Self, StoryClientError> {
        let timeout = settings.api.timeout();
        let credentials = Credentials {
            username: settings.credentials.username.clone(),
            password: settings.credentials.password.clone(),
        };
        // The login client lives only as long as the token exchange
        let login_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(StoryClientError::Build)?;
        let bearer_token =
            fetch_bearer_token(&login_client, &settings.api.base_url, &credentials).await?;
        Self::new(settings.api.base_url.clone(), bearer_token, timeout)
    }

    #[tracing::instrument(name = "Creating story", skip(self))]
    pub async fn create_story(
        &self,
        payload: &StoryPayload,
    ) -> Result<ApiResponse, StoryClientError> {
        let url = format!("{}/Story/Create", self.base_url);
        self.execute(self.http_client.post(&url).json(payload)).await
    }

    #[tracing::instrument(name = "Editing story", skip(self))]
    pub async fn edit_story(
        &self,
        story_id: &str,
        payload: &StoryPayload,
    ) -> Result<ApiResponse, StoryClientError> {
        let url = format!("{}/Story/Edit/{}", self.base_url, story_id);
        let request = self
            .http_client
            .put(&url)
            .query(&[("storyId", story_id)])
            .json(payload);
        self.execute(request).await
    }

    #[tracing::instrument(name = "Listing stories", skip(self))]
    pub async fn list_stories(&self) -> Result<ApiResponse, StoryClientError> {
        let url = format!("{}/Story/All", self.base_url);
        self.execute(self.http_client.get(&url)).await
    }

    #[tracing::instrument(name = "Deleting story", skip(self))]
    pub async fn delete_story(&self, story_id: &str) -> Result<ApiResponse, StoryClientError> {
        let url = format!("{}/Story/Delete/{}", self.base_url, story_id);
        self.execute(self.http_client.delete(&url)).await
    }

    async fn execute(&self, request: RequestBuilder) -> Result<ApiResponse, StoryClientError> {
        let response = request
            .bearer_auth(self.bearer_token.expose_secret())
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Story API request failed: {:?}", e);
                StoryClientError::Transport(e)
            })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(StoryClientError::Transport)?;
        tracing::debug!(status = status.as_u16(), "Story API responded");
        Ok(ApiResponse { status, body })
    }
}
