// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session-cookie gate for the dashboard.
//!
//! Every request under [`PROTECTED_PREFIX`] must carry an `authToken`
//! cookie whose value the identity provider accepts. Missing cookies and
//! failed verifications end the same way: a redirect to [`SIGN_IN_PATH`].

use crate::services::identity::{IdentityProvider, VerifiedUser};
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "authToken";
/// Requests at or below this path require a session.
pub const PROTECTED_PREFIX: &str = "/dashboard";
/// Where unauthenticated requests are sent.
pub const SIGN_IN_PATH: &str = "/login";

/// Authenticated user for the current request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub uid: String,
    pub email: Option<String>,
    /// Raw session token, forwarded to services that enforce their own rules
    pub id_token: String,
}

/// What the gate decided for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Path is not protected.
    Bypass,
    Authorized(VerifiedUser),
    /// No cookie, or an empty value.
    Unauthenticated,
    /// The identity provider refused the token or could not be reached.
    VerificationFailed(String),
}

impl GateDecision {
    /// Whether the request may continue to its handler.
    pub fn allows(&self) -> bool {
        matches!(self, GateDecision::Bypass | GateDecision::Authorized(_))
    }
}

/// Whether `path` falls under the protected prefix.
pub fn is_protected(path: &str) -> bool {
    path.strip_prefix(PROTECTED_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Decide whether a request may proceed.
pub async fn gate_request(
    path: &str,
    token: Option<&str>,
    identity: &dyn IdentityProvider,
) -> GateDecision {
    if !is_protected(path) {
        return GateDecision::Bypass;
    }

    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return GateDecision::Unauthenticated;
    };

    match identity.verify_token(token).await {
        Ok(user) => GateDecision::Authorized(user),
        Err(err) => GateDecision::VerificationFailed(err.to_string()),
    }
}

/// Middleware that requires a verified session cookie.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let token = jar.get(SESSION_COOKIE).map(|cookie| cookie.value().to_string());

    match gate_request(&path, token.as_deref(), state.identity.as_ref()).await {
        GateDecision::Bypass => next.run(request).await,
        GateDecision::Authorized(user) => {
            request.extensions_mut().insert(AuthUser {
                uid: user.uid.clone(),
                email: user.email.clone(),
                id_token: token.unwrap_or_default(),
            });
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        GateDecision::Unauthenticated => {
            tracing::debug!(path = %path, "No session cookie, redirecting to sign-in");
            Redirect::to(SIGN_IN_PATH).into_response()
        }
        GateDecision::VerificationFailed(reason) => {
            tracing::warn!(path = %path, reason = %reason, "Session verification failed, redirecting to sign-in");
            Redirect::to(SIGN_IN_PATH).into_response()
        }
    }
}
