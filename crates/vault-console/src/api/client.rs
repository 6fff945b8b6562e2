//! # API Client
//!
//! HTTP client for communicating with the Vault backend.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::authorizer::Authorizer;
use super::error::{ApiError, ApiResult};
use super::types::{
    AuthResponse, CollectionInfo, Envelope, ErrorEnvelope, PasswordAuthRequest,
};
use crate::config::Config;

/// Path of the password authentication endpoint.
pub const AUTH_WITH_PASSWORD_PATH: &str = "/api/collections/users/auth-with-password";

/// The remote authentication call consumed by the session store.
///
/// Implemented by [`ConsoleClient`]; tests may substitute their own.
#[async_trait]
pub trait AuthEndpoint: Send + Sync {
    /// Exchanges an identity and password for a token and user record.
    async fn auth_with_password(&self, identity: &str, password: &str)
        -> ApiResult<AuthResponse>;
}

/// HTTP client for the Vault backend.
///
/// Every request is built through [`request`](Self::request), which runs
/// the attached [`Authorizer`] (if any). A client without an authorizer
/// sends no `Authorization` header at all; the session store uses such a
/// client for the login call itself.
///
/// The client is cheaply cloneable and can be shared across the console.
///
/// # Examples
///
/// ```rust,ignore
/// let client = ConsoleClient::new("http://127.0.0.1:8090", Duration::from_secs(30))?
///     .with_authorizer(Authorizer::new(session.clone()));
///
/// if client.health().await? {
///     let collections = client.list_collections().await?;
///     println!("Found {} collections", collections.len());
/// }
/// ```
#[derive(Clone)]
pub struct ConsoleClient {
    base_url: String,
    http: Client,
    authorizer: Option<Authorizer>,
}

impl ConsoleClient {
    /// Creates a new client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ApiResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self {
            base_url,
            http: Client::builder().timeout(timeout).build()?,
            authorizer: None,
        })
    }

    /// Creates a client from the console configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        Self::new(
            config.server_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Returns a copy of this client that authorizes every request.
    #[must_use]
    pub fn with_authorizer(mut self, authorizer: Authorizer) -> Self {
        self.authorizer = Some(authorizer);
        self
    }

    /// Returns the configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Starts a request against `path`, relative to the base URL.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.authorizer {
            Some(authorizer) => authorizer.apply(builder),
            None => builder,
        }
    }

    /// Builds, but does not send, a request against `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the URL is invalid.
    pub fn build_request(&self, method: Method, path: &str) -> ApiResult<reqwest::Request> {
        Ok(self.request(method, path).build()?)
    }

    /// Checks if the backend is reachable and healthy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Network`] if the request fails.
    pub async fn health(&self) -> ApiResult<bool> {
        let res = self.request(Method::GET, "/api/health").send().await?;
        Ok(res.status().is_success())
    }

    /// Authenticates with an identity (email or username) and password.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`] - Network request failed
    /// * [`ApiError::Server`] - Invalid credentials (401) or malformed request (400)
    /// * [`ApiError::InvalidResponse`] - Response lacked a token or a user record
    pub async fn auth_with_password(
        &self,
        identity: &str,
        password: &str,
    ) -> ApiResult<AuthResponse> {
        let req = PasswordAuthRequest {
            identity: identity.to_string(),
            password: password.to_string(),
        };

        let res = self
            .request(Method::POST, AUTH_WITH_PASSWORD_PATH)
            .json(&req)
            .send()
            .await?;

        parse_envelope(res).await
    }

    /// Lists collections through the admin API.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`] - Network request failed
    /// * [`ApiError::Server`] - Unauthorized (401) or forbidden (403)
    pub async fn list_collections(&self) -> ApiResult<Vec<CollectionInfo>> {
        let res = self
            .request(Method::GET, "/api/admin/collections")
            .send()
            .await?;
        parse_envelope(res).await
    }

    /// Fetches application settings through the admin API.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`] - Network request failed
    /// * [`ApiError::Server`] - Unauthorized (401) or forbidden (403)
    pub async fn get_settings(&self) -> ApiResult<serde_json::Map<String, serde_json::Value>> {
        let res = self.request(Method::GET, "/api/admin/settings").send().await?;
        parse_envelope(res).await
    }
}

#[async_trait]
impl AuthEndpoint for ConsoleClient {
    async fn auth_with_password(
        &self,
        identity: &str,
        password: &str,
    ) -> ApiResult<AuthResponse> {
        ConsoleClient::auth_with_password(self, identity, password).await
    }
}

/// Checks the status and unwraps the `{ "data": ... }` envelope.
async fn parse_envelope<T: DeserializeOwned>(res: Response) -> ApiResult<T> {
    if !res.status().is_success() {
        return Err(error_from_response(res).await);
    }

    res.json::<Envelope<T>>()
        .await
        .map(|env| env.data)
        .map_err(|e| ApiError::InvalidResponse(e.to_string()))
}

/// Converts a non-success response into [`ApiError::Server`].
///
/// Prefers the backend's `{ "error": { "code", "message" } }` envelope and
/// falls back to the raw body.
async fn error_from_response(res: Response) -> ApiError {
    let status = res.status().as_u16();
    let body = res.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(env) => ApiError::Server {
            status,
            code: Some(env.error.code),
            message: env.error.message,
        },
        Err(_) => ApiError::Server {
            status,
            code: None,
            message: body,
        },
    }
}
