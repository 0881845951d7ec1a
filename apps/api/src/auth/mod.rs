//! Thin wrapper over the external auth collaborator (a GoTrue-style HTTP
//! service). Credential handling is delegated entirely; this module only
//! forwards requests and maps responses.

pub mod handlers;
pub mod provision;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("auth service rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("malformed auth response: {0}")]
    Malformed(String),
}

/// Identity as the auth service reports it. `user_metadata` carries the
/// registration hints (name, instagram, tier) used by lazy provisioning.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthAccount {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub user_metadata: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthAccount,
}

#[derive(Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AuthClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            base_url,
            api_key,
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let response = self
            .client
            .post(format!(
                "{}/auth/v1/token?grant_type=password",
                self.base_url
            ))
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let body = Self::check(response).await?;
        serde_json::from_value(body).map_err(|e| AuthError::Malformed(e.to_string()))
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Value,
    ) -> Result<AuthAccount, AuthError> {
        let response = self
            .client
            .post(format!("{}/auth/v1/signup", self.base_url))
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password, "data": metadata }))
            .send()
            .await?;
        let body = Self::check(response).await?;
        // The service returns either the bare user object or a session
        // wrapping it, depending on email-confirmation settings.
        let user = body.get("user").cloned().unwrap_or(body);
        serde_json::from_value(user).map_err(|e| AuthError::Malformed(e.to_string()))
    }

    pub async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(format!("{}/auth/v1/logout", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    pub async fn recover(&self, email: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(format!("{}/auth/v1/recover", self.base_url))
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email }))
            .send()
            .await?;
        Self::check(response).await.map(|_| ())
    }

    pub async fn user_from_token(&self, token: &str) -> Result<AuthAccount, AuthError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;
        let body = Self::check(response).await?;
        serde_json::from_value(body).map_err(|e| AuthError::Malformed(e.to_string()))
    }

    async fn check(response: reqwest::Response) -> Result<Value, AuthError> {
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        if status.is_success() {
            return Ok(body);
        }
        let message = body
            .get("msg")
            .or_else(|| body.get("error_description"))
            .or_else(|| body.get("message"))
            .and_then(Value::as_str)
            .unwrap_or("authentication failed")
            .to_string();
        Err(AuthError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
