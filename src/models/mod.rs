// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod link;
pub mod platform;
pub mod profile;

pub use link::{latest_for_owner, Link, LinkList};
pub use platform::{Platform, PlatformSummary};
pub use profile::Profile;
