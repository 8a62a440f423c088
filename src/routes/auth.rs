// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in, account creation and sign-out.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::editor::auth_forms::{LoginForm, RegisterForm, ACCOUNT_CREATED};
use crate::middleware::session_gate::{PROTECTED_PREFIX, SESSION_COOKIE, SIGN_IN_PATH};
use crate::routes::{FormErrorsResponse, RedirectResponse};
use crate::AppState;

pub const REGISTER_PATH: &str = "/register";

/// Session cookie lifetime.
const SESSION_MAX_AGE: time::Duration = time::Duration::days(1);

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route(SIGN_IN_PATH, get(login_page).post(login))
        .route(REGISTER_PATH, get(register_page).post(register))
        .route("/logout", post(logout))
}

/// What the sign-in and create-account pages need to render.
#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthPageResponse {
    pub title: String,
    pub fields: Vec<String>,
    /// Form target
    pub submit_path: String,
    /// Link to the other auth page
    pub alternate_path: String,
}

async fn root() -> Redirect {
    Redirect::to(SIGN_IN_PATH)
}

async fn login_page() -> Json<AuthPageResponse> {
    Json(AuthPageResponse {
        title: "Login".to_string(),
        fields: vec!["email".to_string(), "password".to_string()],
        submit_path: SIGN_IN_PATH.to_string(),
        alternate_path: REGISTER_PATH.to_string(),
    })
}

async fn register_page() -> Json<AuthPageResponse> {
    Json(AuthPageResponse {
        title: "Create Account".to_string(),
        fields: vec![
            "email".to_string(),
            "password".to_string(),
            "confirmPassword".to_string(),
        ],
        submit_path: REGISTER_PATH.to_string(),
        alternate_path: SIGN_IN_PATH.to_string(),
    })
}

/// Sign in and set the session cookie.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(form): Json<LoginForm>,
) -> Response {
    match form.submit(state.identity.as_ref()).await {
        Ok(user) => {
            let cookie = Cookie::build((SESSION_COOKIE, user.id_token))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax)
                .secure(state.config.secure_cookies())
                .max_age(SESSION_MAX_AGE);

            (
                jar.add(cookie),
                Json(RedirectResponse {
                    redirect: PROTECTED_PREFIX.to_string(),
                    message: None,
                }),
            )
                .into_response()
        }
        Err(errors) => FormErrorsResponse { errors }.into_response(),
    }
}

/// Create an account. The user signs in separately afterwards.
async fn register(State(state): State<Arc<AppState>>, Json(form): Json<RegisterForm>) -> Response {
    match form.submit(state.identity.as_ref()).await {
        Ok(_) => Json(RedirectResponse {
            redirect: SIGN_IN_PATH.to_string(),
            message: Some(ACCOUNT_CREATED.to_string()),
        })
        .into_response(),
        Err(errors) => FormErrorsResponse { errors }.into_response(),
    }
}

/// Clear the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        StatusCode::NO_CONTENT,
    )
}
