// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Links editor: an ordered list of `{platform, url}` entries.

use crate::db::DocumentStore;
use crate::editor::EditorError;
use crate::models::{platform, Link, LinkList};
use crate::time_utils::now_rfc3339;
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const BLANK_PLATFORM: &str = "Can't be blank";
pub const BAD_URL: &str = "Please check URL";
pub const SAVED: &str = "Links saved successfully!";
pub const SAVE_FAILED: &str = "Error saving links. Please try again.";

/// One row of the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LinkEntry {
    pub platform: String,
    pub url: String,
    /// Set by the last failed save, cleared by any edit to this row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LinkEntry {
    /// Check this row against the platform catalog.
    ///
    /// Names missing from the catalog accept any URL.
    pub fn check(&self) -> Option<&'static str> {
        if self.platform.is_empty() {
            return Some(BLANK_PLATFORM);
        }
        match platform::find(&self.platform) {
            Some(p) if !p.matches(&self.url) => Some(BAD_URL),
            _ => None,
        }
    }

    /// Which input the error belongs next to.
    pub fn error_field(&self) -> Option<&'static str> {
        self.error.as_ref()?;
        Some(if self.platform.is_empty() {
            "platform"
        } else {
            "url"
        })
    }
}

/// Result of [`LinksEditor::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveLinksOutcome {
    /// Written as a new document; the editor is now empty.
    Saved { id: String },
    /// At least one row failed validation; nothing was written.
    Invalid,
    /// The store refused the write.
    Failed { message: String },
}

#[derive(Debug, Clone, Default)]
pub struct LinksEditor {
    entries: Vec<LinkEntry>,
}

impl LinksEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Editor pre-filled with submitted links.
    pub fn from_links(links: Vec<Link>) -> Self {
        Self {
            entries: links
                .into_iter()
                .map(|l| LinkEntry {
                    platform: l.platform,
                    url: l.url,
                    error: None,
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[LinkEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a blank row and return its index.
    pub fn add_link(&mut self) -> usize {
        self.entries.push(LinkEntry::default());
        self.entries.len() - 1
    }

    pub fn set_platform(&mut self, index: usize, platform: &str) -> Result<(), EditorError> {
        let entry = self.entry_mut(index)?;
        entry.platform = platform.to_string();
        entry.error = None;
        Ok(())
    }

    pub fn set_url(&mut self, index: usize, url: &str) -> Result<(), EditorError> {
        let entry = self.entry_mut(index)?;
        entry.url = url.to_string();
        entry.error = None;
        Ok(())
    }

    pub fn remove_link(&mut self, index: usize) -> Result<LinkEntry, EditorError> {
        self.check_index(index)?;
        Ok(self.entries.remove(index))
    }

    /// Recompute every row's error. Returns true when all rows pass.
    pub fn validate(&mut self) -> bool {
        for entry in &mut self.entries {
            entry.error = entry.check().map(String::from);
        }
        self.entries.iter().all(|e| e.error.is_none())
    }

    /// Validate, then append the list to the store as one new document.
    ///
    /// Store failures are logged and reported as [`SAVE_FAILED`]; the rows
    /// stay in place so the user can retry.
    pub async fn save(&mut self, store: &DocumentStore, owner: Option<&str>) -> SaveLinksOutcome {
        if !self.validate() {
            tracing::debug!(
                invalid = self.entries.iter().filter(|e| e.error.is_some()).count(),
                "Link list failed validation"
            );
            return SaveLinksOutcome::Invalid;
        }

        let list = LinkList::new(
            self.entries
                .iter()
                .map(|e| Link {
                    platform: e.platform.clone(),
                    url: e.url.clone(),
                })
                .collect(),
            owner.map(String::from),
            now_rfc3339(),
        );

        match store.add_link_list(&list).await {
            Ok(id) => {
                self.entries.clear();
                SaveLinksOutcome::Saved { id }
            }
            Err(e) => {
                tracing::error!(error = %e, owner = ?owner, "Error saving links");
                SaveLinksOutcome::Failed {
                    message: SAVE_FAILED.to_string(),
                }
            }
        }
    }

    fn check_index(&self, index: usize) -> Result<(), EditorError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(EditorError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
        }
    }

    fn entry_mut(&mut self, index: usize) -> Result<&mut LinkEntry, EditorError> {
        self.check_index(index)?;
        Ok(&mut self.entries[index])
    }
}
