use crate::telemetry::error_chain_fmt;
use anyhow::Context;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

#[derive(thiserror::Error)]
pub enum AuthError {
    #[error("Failed to reach the authentication endpoint.")]
    RequestFailed(#[source] reqwest::Error),
    #[error("The authentication endpoint rejected the credentials.")]
    Rejected(#[source] reqwest::Error),
    #[error("The authentication response did not carry an access token.")]
    MissingToken(#[source] anyhow::Error),
}

impl std::fmt::Debug for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(serde::Serialize)]
struct AuthenticationRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(serde::Deserialize)]
struct AuthenticationResponse {
    #[serde(rename = "accessToken")]
    access_token: Option<String>,
}

/// Exchange username and password for a bearer token.
///
/// One attempt only. A missing `accessToken` is an error, an empty one is too.
#[tracing::instrument(
    name = "Fetching bearer token",
    skip(http_client, credentials),
    fields(username = %credentials.username)
)]
pub async fn fetch_bearer_token(
    http_client: &Client,
    base_url: &str,
    credentials: &Credentials,
) -> Result<Secret<String>, AuthError> {
    let url = format!("{}/User/Authentication", base_url);
    let request_body = AuthenticationRequest {
        username: &credentials.username,
        password: credentials.password.expose_secret(),
    };
    let body = http_client
        .post(&url)
        .json(&request_body)
        .send()
        .await
        .map_err(AuthError::RequestFailed)?
        .error_for_status()
        .map_err(|e| {
            tracing::error!("Authentication rejected: {:?}", e);
            AuthError::Rejected(e)
        })?
        .text()
        .await
        .map_err(AuthError::RequestFailed)?;

    let token = serde_json::from_str::<AuthenticationResponse>(&body)
        .context("Failed to parse the authentication response as JSON.")
        .and_then(|response| {
            response
                .access_token
                .filter(|token| !token.is_empty())
                .context("The `accessToken` field is absent or empty.")
        })
        .map_err(AuthError::MissingToken)?;

    tracing::info!("Obtained bearer token");
    Ok(Secret::new(token))
}
