// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Devlinks: link-in-bio profile builder
//!
//! This crate provides the backend API behind the Devlinks front-end:
//! sign-in through Firebase Authentication, a session-gated dashboard for
//! editing social links and profile details, and a public preview page.

pub mod config;
pub mod db;
pub mod editor;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod time_utils;

use config::Config;
use db::DocumentStore;
use services::{IdentityProvider, ObjectStorage};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: DocumentStore,
    pub storage: ObjectStorage,
    pub identity: Arc<dyn IdentityProvider>,
}
