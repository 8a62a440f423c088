// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Social link models.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A single `{platform, url}` entry as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Link {
    pub platform: String,
    pub url: String,
}

/// One saved list of links.
///
/// Every save appends a new document to the `links` collection; older
/// lists are never updated or removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkList {
    /// Firestore-generated document ID (not stored in the document body)
    #[serde(alias = "_firestore_id", default, skip_serializing)]
    pub id: Option<String>,
    pub links: Vec<Link>,
    /// Email of the signed-in user who saved the list
    #[serde(default)]
    pub owner: Option<String>,
    /// When the list was saved (RFC 3339)
    #[serde(default)]
    pub created_at: String,
}

impl LinkList {
    pub fn new(links: Vec<Link>, owner: Option<String>, created_at: String) -> Self {
        Self {
            id: None,
            links,
            owner,
            created_at,
        }
    }
}

/// Pick the most recently saved list belonging to `owner`.
pub fn latest_for_owner<'a>(lists: &'a [LinkList], owner: &str) -> Option<&'a LinkList> {
    lists
        .iter()
        .filter(|list| {
            list.owner
                .as_deref()
                .is_some_and(|o| o.eq_ignore_ascii_case(owner))
        })
        .max_by(|a, b| a.created_at.cmp(&b.created_at))
}
