// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running.
//! Start one with `gcloud emulators firestore start` and set
//! FIRESTORE_EMULATOR_HOST before running them.
//!
//! The emulator provides a clean state for each test run.

use devlinks::models::{latest_for_owner, Link, LinkList, Profile};
use devlinks::time_utils::now_rfc3339;

mod common;
use common::test_db;

/// Generate a unique email for test isolation.
fn unique_email() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("user{}@example.com", nanos)
}

fn test_profile(email: &str) -> Profile {
    Profile {
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        profile_picture_url: String::new(),
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PROFILE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_profile_set_and_overwrite() {
    require_emulator!();

    let db = test_db().await;
    let email = unique_email();

    let before = db.get_profile(&email).await.unwrap();
    assert!(before.is_none(), "Profile should not exist before save");

    db.set_profile(&test_profile(&email)).await.unwrap();

    let mut updated = test_profile(&email);
    updated.first_name = "Renamed".to_string();
    updated.profile_picture_url = "https://example.com/pic.png".to_string();
    db.set_profile(&updated).await.unwrap();

    let fetched = db.get_profile(&email).await.unwrap().expect("Profile exists");
    assert_eq!(fetched, updated);

    let all = db.list_profiles().await.unwrap();
    assert!(all.iter().any(|p| p.email == email));
}

// ═══════════════════════════════════════════════════════════════════════════
// LINK TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_link_lists_are_append_only() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_email();

    let mut ids = Vec::new();
    for url in ["https://github.com/first", "https://github.com/second"] {
        let list = LinkList::new(
            vec![Link {
                platform: "GitHub".to_string(),
                url: url.to_string(),
            }],
            Some(owner.clone()),
            now_rfc3339(),
        );
        ids.push(db.add_link_list(&list).await.unwrap());
    }
    assert_ne!(ids[0], ids[1], "Each save gets its own document");

    let lists = db.list_link_lists().await.unwrap();
    let mine: Vec<_> = lists
        .iter()
        .filter(|l| l.owner.as_deref() == Some(owner.as_str()))
        .collect();
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|l| l.id.is_some()));

    let latest = latest_for_owner(&lists, &owner).unwrap();
    assert_eq!(latest.links[0].url, "https://github.com/second");
}
