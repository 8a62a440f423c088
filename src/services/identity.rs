// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity provider seam and the Firebase Authentication client.
//!
//! Handles:
//! - Email/password sign-in
//! - Account creation
//! - ID token verification (delegated to [`FirebaseTokenVerifier`])

use crate::config::Config;
use crate::services::token_verifier::FirebaseTokenVerifier;
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// User proven by a valid ID token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    /// Firebase user ID (`sub` claim)
    pub uid: String,
    pub email: Option<String>,
}

/// Result of a successful password sign-in or sign-up.
#[derive(Debug, Clone)]
pub struct SignedInUser {
    pub uid: String,
    pub email: String,
    /// Session token to hand to the browser
    pub id_token: String,
}

/// Identity provider failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum IdentityError {
    /// Unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Token is missing, malformed, expired or badly signed.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The provider understood the request and refused it.
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Network fault or provider-side failure.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Operations the app needs from the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignedInUser, IdentityError>;

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignedInUser, IdentityError>;

    async fn verify_token(&self, token: &str) -> Result<VerifiedUser, IdentityError>;
}

/// Firebase Authentication over the Identity Toolkit REST API.
pub struct FirebaseIdentity {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    verifier: FirebaseTokenVerifier,
}

impl FirebaseIdentity {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .context("failed building identity HTTP client")?;

        let verifier = FirebaseTokenVerifier::new(&config.firebase_project_id)?;

        tracing::info!(
            project = %config.firebase_project_id,
            "Initialized Firebase identity client"
        );

        Ok(Self {
            http,
            base_url: IDENTITY_TOOLKIT_URL.to_string(),
            api_key: config.firebase_api_key.clone(),
            verifier,
        })
    }

    /// Shared body of `accounts:signInWithPassword` and `accounts:signUp`.
    async fn password_request(
        &self,
        endpoint: &str,
        email: &str,
        password: &str,
    ) -> Result<SignedInUser, IdentityError> {
        let url = format!("{}/accounts:{}", self.base_url, endpoint);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&PasswordRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await
            .map_err(|e| IdentityError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: Option<ErrorEnvelope> = response.json().await.ok();
            let message = body.map(|b| b.error.message).unwrap_or_default();
            return Err(classify_error(status.as_u16(), &message));
        }

        let body: PasswordResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Unavailable(format!("invalid response JSON: {e}")))?;

        Ok(SignedInUser {
            uid: body.local_id,
            email: body.email,
            id_token: body.id_token,
        })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignedInUser, IdentityError> {
        self.password_request("signInWithPassword", email, password)
            .await
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignedInUser, IdentityError> {
        self.password_request("signUp", email, password).await
    }

    async fn verify_token(&self, token: &str) -> Result<VerifiedUser, IdentityError> {
        self.verifier.verify(token).await
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    local_id: String,
    #[serde(default)]
    email: String,
    id_token: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Map an Identity Toolkit error to our taxonomy.
///
/// Messages look like `EMAIL_NOT_FOUND` or `WEAK_PASSWORD : Password should be ...`.
fn classify_error(status: u16, message: &str) -> IdentityError {
    if status >= 500 || status == 429 {
        return IdentityError::Unavailable(format!("status {status}: {message}"));
    }

    let code = message.split_whitespace().next().unwrap_or_default();
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            IdentityError::InvalidCredentials
        }
        "" => IdentityError::Rejected(format!("status {status}")),
        _ => IdentityError::Rejected(message.to_string()),
    }
}
