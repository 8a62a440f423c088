// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile editor: name, email and an optional picture.

use crate::db::DocumentStore;
use crate::editor::FieldErrors;
use crate::models::Profile;
use crate::services::storage::{profile_picture_path, ObjectStorage};
use image::ImageReader;
use std::io::Cursor;
use validator::Validate;

pub const EMPTY_FIELD: &str = "Can't be empty";
pub const WRONG_FORMAT: &str = "Use PNG or JPG format";
pub const INVALID_IMAGE: &str = "Invalid image";
pub const TOO_LARGE: &str = "Image must be below 1024x1024px";
pub const SAVED: &str = "Your changes have been successfully saved!";
pub const SAVE_FAILED: &str = "Error saving profile. Please try again.";

/// Key under which picture errors are reported.
pub const PICTURE_FIELD: &str = "profilePicture";

pub const MAX_IMAGE_DIMENSION: u32 = 1024;
const ACCEPTED_TYPES: &[&str] = &["image/jpeg", "image/png"];

/// Editable text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    FirstName,
    LastName,
    Email,
}

impl ProfileField {
    pub fn key(self) -> &'static str {
        match self {
            ProfileField::FirstName => "firstName",
            ProfileField::LastName => "lastName",
            ProfileField::Email => "email",
        }
    }

    /// Parse a form field name.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "firstName" => Some(ProfileField::FirstName),
            "lastName" => Some(ProfileField::LastName),
            "email" => Some(ProfileField::Email),
            _ => None,
        }
    }
}

/// A picture that passed the format and size checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl ProfileImage {
    /// Run the picture checks in order: declared type, decodability, size.
    pub fn check(file_name: &str, content_type: &str, bytes: Vec<u8>) -> Result<Self, &'static str> {
        if !ACCEPTED_TYPES.contains(&content_type) {
            return Err(WRONG_FORMAT);
        }

        // Header first so oversized pictures are never fully decoded
        let (width, height) = ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .map_err(|_| INVALID_IMAGE)?
            .into_dimensions()
            .map_err(|_| INVALID_IMAGE)?;

        if width > MAX_IMAGE_DIMENSION || height > MAX_IMAGE_DIMENSION {
            return Err(TOO_LARGE);
        }

        image::load_from_memory(&bytes).map_err(|_| INVALID_IMAGE)?;

        Ok(Self {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
            width,
            height,
        })
    }
}

#[derive(Debug, Clone, Default, Validate)]
struct ProfileFields {
    #[validate(length(min = 1, message = "Can't be empty"))]
    first_name: String,
    #[validate(length(min = 1, message = "Can't be empty"))]
    last_name: String,
    #[validate(length(min = 1, message = "Can't be empty"))]
    email: String,
}

/// Result of [`ProfileEditor::save`]. Details are in the editor's errors and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveProfileOutcome {
    Saved(Profile),
    Invalid,
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileEditor {
    fields: ProfileFields,
    image: Option<ProfileImage>,
    errors: FieldErrors,
    message: Option<String>,
}

impl ProfileEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: ProfileField, value: &str) {
        let slot = match field {
            ProfileField::FirstName => &mut self.fields.first_name,
            ProfileField::LastName => &mut self.fields.last_name,
            ProfileField::Email => &mut self.fields.email,
        };
        *slot = value.to_string();
        self.errors.clear(field.key());
    }

    pub fn field(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::FirstName => &self.fields.first_name,
            ProfileField::LastName => &self.fields.last_name,
            ProfileField::Email => &self.fields.email,
        }
    }

    /// Check and keep a picture. On failure the previous picture stays.
    pub fn attach_image(&mut self, file_name: &str, content_type: &str, bytes: Vec<u8>) -> bool {
        match ProfileImage::check(file_name, content_type, bytes) {
            Ok(image) => {
                tracing::debug!(
                    file_name,
                    width = image.width,
                    height = image.height,
                    "Profile picture accepted"
                );
                self.image = Some(image);
                self.errors.clear(PICTURE_FIELD);
                true
            }
            Err(message) => {
                tracing::debug!(file_name, content_type, reason = message, "Profile picture rejected");
                self.errors.set(PICTURE_FIELD, message);
                false
            }
        }
    }

    pub fn image(&self) -> Option<&ProfileImage> {
        self.image.as_ref()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Validate, upload any picture, then overwrite the profile document.
    ///
    /// A picture error left over from [`attach_image`](Self::attach_image)
    /// blocks the save along with any empty text field.
    pub async fn save(
        &mut self,
        store: &DocumentStore,
        storage: &ObjectStorage,
        id_token: Option<&str>,
    ) -> SaveProfileOutcome {
        let picture_error = self.errors.get(PICTURE_FIELD).map(String::from);
        self.errors = FieldErrors::from_validation(self.fields.validate());
        if let Some(message) = picture_error {
            self.errors.set(PICTURE_FIELD, message);
        }

        if !self.errors.is_empty() {
            self.message = None;
            return SaveProfileOutcome::Invalid;
        }

        match self.write(store, storage, id_token).await {
            Ok(profile) => {
                self.message = Some(SAVED.to_string());
                SaveProfileOutcome::Saved(profile)
            }
            Err(e) => {
                tracing::error!(error = %e, email = %self.fields.email, "Error saving profile");
                self.errors.set(PICTURE_FIELD, SAVE_FAILED);
                SaveProfileOutcome::Failed
            }
        }
    }

    async fn write(
        &self,
        store: &DocumentStore,
        storage: &ObjectStorage,
        id_token: Option<&str>,
    ) -> crate::error::Result<Profile> {
        let profile_picture_url = match &self.image {
            Some(image) => {
                let path = profile_picture_path(&image.file_name);
                storage
                    .upload(&path, &image.content_type, image.bytes.clone(), id_token)
                    .await?;
                storage.download_url(&path, id_token).await?
            }
            None => String::new(),
        };

        let profile = Profile {
            first_name: self.fields.first_name.clone(),
            last_name: self.fields.last_name.clone(),
            email: self.fields.email.clone(),
            profile_picture_url,
        };
        store.set_profile(&profile).await?;
        Ok(profile)
    }
}
