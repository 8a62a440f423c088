// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Form editors: in-memory form state, validation, and the save step.
//!
//! Validation failures stay inside the editor as per-field messages.
//! Store failures are logged and turned into a generic inline message.

pub mod auth_forms;
pub mod links;
pub mod profile;

use serde::Serialize;
use std::collections::BTreeMap;
use validator::ValidationErrors;

pub use auth_forms::{LoginForm, RegisterForm};
pub use links::{LinkEntry, LinksEditor, SaveLinksOutcome};
pub use profile::{ProfileEditor, ProfileField, ProfileImage, SaveProfileOutcome};

/// Field name (camelCase, as the front-end names it) -> message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the first message for each failing field.
    pub fn from_validation(result: Result<(), ValidationErrors>) -> Self {
        let mut out = Self::new();
        if let Err(errors) = result {
            for (field, errs) in errors.field_errors() {
                if let Some(message) = errs.iter().find_map(|e| e.message.as_ref()) {
                    out.set(camel_case(&field), message.to_string());
                }
            }
        }
        out
    }

    pub fn set(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    pub fn clear(&mut self, field: &str) {
        self.0.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Misuse of an editor's API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error("no link at index {index} (editor has {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// `first_name` -> `firstName`
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
