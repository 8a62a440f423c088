// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Profile model for storage and the preview page.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Profile record stored in Firestore.
///
/// Document ID is the email address. Each save overwrites the whole
/// document; there is no partial update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Download URL of the uploaded picture, empty if none was uploaded
    #[serde(rename = "profilePictureURL", default)]
    pub profile_picture_url: String,
}

impl Profile {
    pub fn has_picture(&self) -> bool {
        !self.profile_picture_url.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_stored_field_names() {
        let profile = Profile {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            profile_picture_url: String::new(),
        };

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["lastName"], "Lovelace");
        assert_eq!(json["profilePictureURL"], "");
        assert!(!profile.has_picture());
    }

    #[test]
    fn test_missing_picture_field_defaults_empty() {
        let profile: Profile = serde_json::from_str(
            r#"{"firstName":"A","lastName":"B","email":"a@b.c"}"#,
        )
        .unwrap();
        assert_eq!(profile.profile_picture_url, "");
    }
}
