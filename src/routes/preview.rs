// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public preview page.

use crate::models::{latest_for_owner, Link, LinkList, Profile};
use crate::services::storage::{ObjectStorage, PROFILE_PICTURES_DIR};
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use futures_util::{stream, StreamExt};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Maximum picture URL lookups in flight at once.
const MAX_CONCURRENT_RESOLVES: usize = 8;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/preview", get(preview))
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct PreviewProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Fetchable picture URL; absent when none was saved or it could not be resolved
    pub image_url: Option<String>,
    pub links: Vec<Link>,
    pub share_url: String,
}

#[derive(Debug, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PreviewResponse {
    pub profiles: Vec<PreviewProfile>,
    /// True while there is nothing to show yet
    pub loading: bool,
}

/// Render every stored profile.
///
/// This lists all profiles, not just the signed-in user's, and is public.
async fn preview(State(state): State<Arc<AppState>>) -> Json<PreviewResponse> {
    let profiles = state.db.list_profiles().await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to load profiles for preview");
        Vec::new()
    });

    let link_lists = if profiles.is_empty() {
        Vec::new()
    } else {
        state.db.list_link_lists().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to load links for preview");
            Vec::new()
        })
    };

    let share_url = state.config.preview_url();
    let storage = &state.storage;
    let link_lists = &link_lists;
    let share_url = share_url.as_str();

    let rendered: Vec<PreviewProfile> = stream::iter(profiles)
        .map(|profile| async move {
            let image_url = resolve_picture(storage, &profile).await;
            build_profile(profile, image_url, link_lists, share_url)
        })
        .buffered(MAX_CONCURRENT_RESOLVES)
        .collect()
        .await;

    Json(PreviewResponse {
        loading: rendered.is_empty(),
        profiles: rendered,
    })
}

/// Turn a stored picture reference into a URL a browser can fetch.
///
/// Full URLs pass through; anything else is a file under the pictures folder.
async fn resolve_picture(storage: &ObjectStorage, profile: &Profile) -> Option<String> {
    if !profile.has_picture() {
        return None;
    }

    let stored = profile.profile_picture_url.trim();
    if stored.starts_with("https://") || stored.starts_with("http://") {
        return Some(stored.to_string());
    }

    let path = picture_object_path(stored);
    match storage.download_url(&path, None).await {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::warn!(error = %e, email = %profile.email, path = %path, "Dropping unresolvable profile picture");
            None
        }
    }
}

fn picture_object_path(stored: &str) -> String {
    let prefix = format!("{}/", PROFILE_PICTURES_DIR);
    if stored.starts_with(&prefix) {
        stored.to_string()
    } else {
        format!("{}{}", prefix, stored)
    }
}

fn build_profile(
    profile: Profile,
    image_url: Option<String>,
    link_lists: &[LinkList],
    share_url: &str,
) -> PreviewProfile {
    let links = latest_for_owner(link_lists, &profile.email)
        .map(|list| list.links.clone())
        .unwrap_or_default();

    PreviewProfile {
        first_name: profile.first_name,
        last_name: profile.last_name,
        email: profile.email,
        image_url,
        links,
        share_url: share_url.to_string(),
    }
}
