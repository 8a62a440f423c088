// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard routes: the links and profile editors.
//!
//! The session gate is applied in routes/mod.rs, so every handler here
//! runs with an [`AuthUser`] in the request extensions.

use crate::editor::links::{self, LinkEntry, LinksEditor, SaveLinksOutcome};
use crate::editor::profile::{self, ProfileEditor, ProfileField, SaveProfileOutcome, PICTURE_FIELD};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{platform, Link, PlatformSummary, Profile};
use crate::routes::FormErrorsResponse;
use crate::session::{AuthGuard, GuardedView, SessionContext, SessionUser};
use crate::AppState;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Upload limit for the profile form (picture plus text fields).
const PROFILE_BODY_LIMIT: usize = 10 * 1024 * 1024;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/dashboard/platforms", get(platforms))
        .route("/dashboard/links", post(save_links))
        .route(
            "/dashboard/profile",
            post(save_profile).layer(DefaultBodyLimit::max(PROFILE_BODY_LIMIT)),
        )
        // Unknown dashboard paths still go through the gate before the 404
        .route("/dashboard/{*rest}", any(not_found))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

// ─── Dashboard ───────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub user: SessionUser,
    /// Stored profile for the signed-in email, if one was saved
    pub profile: Option<Profile>,
    pub platforms: Vec<PlatformSummary>,
    pub preview_url: String,
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Json<GuardedView<DashboardView>> {
    let profile = match &user.email {
        Some(email) => state.db.get_profile(email).await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load profile for dashboard");
            None
        }),
        None => None,
    };

    let ctx = SessionContext::signed_in(SessionUser {
        uid: user.uid,
        email: user.email,
    });

    Json(AuthGuard::default().render(&ctx, |user| DashboardView {
        user: user.clone(),
        profile,
        platforms: platform::all().iter().map(|p| p.summary()).collect(),
        preview_url: state.config.preview_url(),
    }))
}

async fn platforms() -> Json<Vec<PlatformSummary>> {
    Json(platform::all().iter().map(|p| p.summary()).collect())
}

// ─── Links ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SaveLinksRequest {
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SaveLinksResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub message: String,
    /// Rows with their validation errors; empty after a successful save
    pub links: Vec<LinkEntry>,
}

async fn save_links(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<SaveLinksRequest>,
) -> Response {
    let mut editor = LinksEditor::from_links(request.links);

    match editor.save(&state.db, user.email.as_deref()).await {
        SaveLinksOutcome::Saved { id } => {
            tracing::info!(uid = %user.uid, id = %id, "Links saved");
            (
                StatusCode::CREATED,
                Json(SaveLinksResponse {
                    id: Some(id),
                    message: links::SAVED.to_string(),
                    links: Vec::new(),
                }),
            )
                .into_response()
        }
        SaveLinksOutcome::Invalid => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(SaveLinksResponse {
                id: None,
                message: String::new(),
                links: editor.entries().to_vec(),
            }),
        )
            .into_response(),
        SaveLinksOutcome::Failed { message } => (
            StatusCode::BAD_GATEWAY,
            Json(SaveLinksResponse {
                id: None,
                message,
                links: editor.entries().to_vec(),
            }),
        )
            .into_response(),
    }
}

// ─── Profile ─────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SaveProfileResponse {
    pub message: String,
    pub profile: Profile,
}

/// Save the profile form.
///
/// Multipart fields: `firstName`, `lastName`, `email`, and an optional
/// `profilePicture` file.
async fn save_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Response> {
    let mut editor = ProfileEditor::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == PICTURE_FIELD {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read picture: {}", e)))?;

            // An empty file input means "no new picture"
            if !bytes.is_empty() {
                editor.attach_image(&file_name, &content_type, bytes.to_vec());
            }
            continue;
        }

        let Some(profile_field) = ProfileField::from_key(&name) else {
            tracing::debug!(field = %name, "Ignoring unknown profile field");
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read {}: {}", name, e)))?;
        editor.set_field(profile_field, &value);
    }

    let form_email = editor.field(ProfileField::Email);
    if !form_email.is_empty()
        && !user
            .email
            .as_deref()
            .is_some_and(|email| email.eq_ignore_ascii_case(form_email))
    {
        tracing::warn!(
            uid = %user.uid,
            session_email = ?user.email,
            form_email = %form_email,
            "Profile saved under an email other than the session's"
        );
    }

    let outcome = editor
        .save(&state.db, &state.storage, Some(&user.id_token))
        .await;

    Ok(match outcome {
        SaveProfileOutcome::Saved(profile) => {
            tracing::info!(uid = %user.uid, email = %profile.email, "Profile saved");
            Json(SaveProfileResponse {
                message: editor
                    .message()
                    .unwrap_or(profile::SAVED)
                    .to_string(),
                profile,
            })
            .into_response()
        }
        SaveProfileOutcome::Invalid => FormErrorsResponse {
            errors: editor.errors().clone(),
        }
        .into_response(),
        SaveProfileOutcome::Failed => (
            StatusCode::BAD_GATEWAY,
            Json(FormErrorsResponse {
                errors: editor.errors().clone(),
            }),
        )
            .into_response(),
    })
}
