use crate::config::AuthServiceSettings;
use crate::observability::TracedClientExt;
use async_trait::async_trait;
use console_core::access::Role;
use console_core::models::{Credentials, User};
use console_core::session::{AuthBackend, AuthError, Authenticated};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

/// Store backend auth endpoints over HTTP.
pub struct AuthClient {
    client: Client,
    settings: AuthServiceSettings,
}

/// Backends hand out numeric or string identifiers depending on the table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(i64),
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: WireId,
    #[serde(alias = "fullName")]
    name: String,
    email: String,
    role: String,
    #[serde(default)]
    department: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    user: UserPayload,
    token: String,
}

impl TryFrom<UserPayload> for User {
    type Error = AuthError;

    fn try_from(payload: UserPayload) -> Result<Self, Self::Error> {
        // A principal with a role outside the catalog must never become current
        let role: Role = payload
            .role
            .parse()
            .map_err(|_| AuthError::UnknownRole(payload.role.clone()))?;

        let id = match payload.id {
            WireId::Text(id) => id,
            WireId::Number(id) => id.to_string(),
        };

        Ok(User {
            id,
            name: payload.name,
            email: payload.email,
            role,
            department: payload.department,
        })
    }
}

impl AuthClient {
    pub fn new(settings: AuthServiceSettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build auth HTTP client: {}", e))?;

        Ok(Self { client, settings })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.url.trim_end_matches('/'), path)
    }
}

fn transport_error(url: &str, e: reqwest::Error) -> AuthError {
    tracing::error!("Auth request to {} failed: {}", url, e);
    AuthError::Network(e.to_string())
}

async fn server_error(response: reqwest::Response) -> AuthError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    tracing::error!(status, "Auth service returned an error");
    AuthError::Server { status, message }
}

async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, AuthError> {
    response.json::<T>().await.map_err(|e| AuthError::Server {
        status: 502,
        message: format!("Malformed auth response: {}", e),
    })
}

#[async_trait]
impl AuthBackend for AuthClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Authenticated, AuthError> {
        let url = self.url("/auth/login");
        let response = self
            .client
            .traced_post(&url)
            .json(&serde_json::json!({
                "username": credentials.username,
                "password": credentials.password.expose_secret(),
            }))
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        match response.status() {
            status if status.is_success() => {
                let payload: LoginPayload = decode(response).await?;
                Ok(Authenticated {
                    user: payload.user.try_into()?,
                    token: Secret::new(payload.token),
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::BAD_REQUEST => Err(AuthError::InvalidCredentials),
            StatusCode::LOCKED | StatusCode::FORBIDDEN => Err(AuthError::AccountLocked),
            _ => Err(server_error(response).await),
        }
    }

    async fn restore_session(&self, token: &Secret<String>) -> Result<User, AuthError> {
        let url = self.url("/auth/me");
        let response = self
            .client
            .traced_get(&url)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        match response.status() {
            status if status.is_success() => decode::<UserPayload>(response).await?.try_into(),
            StatusCode::UNAUTHORIZED => Err(AuthError::SessionExpired),
            StatusCode::LOCKED | StatusCode::FORBIDDEN => Err(AuthError::AccountLocked),
            _ => Err(server_error(response).await),
        }
    }

    async fn revoke(&self, token: &Secret<String>) -> Result<(), AuthError> {
        let url = self.url("/auth/logout");
        let response = self
            .client
            .traced_post(&url)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        // Already-invalid tokens count as revoked
        if response.status().is_success() || response.status() == StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(server_error(response).await)
        }
    }
}
