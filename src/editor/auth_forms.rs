// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sign-in and create-account forms.

use crate::editor::FieldErrors;
use crate::services::identity::{IdentityError, IdentityProvider, SignedInUser};
use serde::Deserialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

pub const EMPTY_EMAIL: &str = "Can't be empty";
pub const EMPTY_LOGIN_PASSWORD: &str = "Please check again";
pub const BAD_CREDENTIALS: &str = "Invalid email or password";
pub const SIGN_IN_FAILED: &str = "Something went wrong. Please try again.";

pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORD_TOO_SHORT: &str = "Password must contain at least 8 characters";
pub const PASSWORDS_DIFFER: &str = "Passwords do not match";
pub const SIGN_UP_FAILED: &str = "Failed to create account. Please try again.";
pub const ACCOUNT_CREATED: &str = "Account created successfully!";

pub const MIN_PASSWORD_CHARS: usize = 8;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Can't be empty"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Please check again"))]
    pub password: String,
}

impl LoginForm {
    pub fn check(&self) -> FieldErrors {
        FieldErrors::from_validation(self.validate())
    }

    /// Validate, then sign in with the identity provider.
    pub async fn submit(&self, identity: &dyn IdentityProvider) -> Result<SignedInUser, FieldErrors> {
        let mut errors = self.check();
        if !errors.is_empty() {
            return Err(errors);
        }

        match identity.sign_in_with_password(&self.email, &self.password).await {
            Ok(user) => {
                tracing::info!(uid = %user.uid, "User signed in");
                Ok(user)
            }
            Err(IdentityError::InvalidCredentials) => {
                tracing::debug!("Sign-in rejected: bad credentials");
                errors.set("password", BAD_CREDENTIALS);
                Err(errors)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error logging in");
                errors.set("password", SIGN_IN_FAILED);
                Err(errors)
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Can't be empty"))]
    pub email: String,
    #[serde(default)]
    #[validate(custom(function = "check_password"))]
    pub password: String,
    #[serde(default)]
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn check(&self) -> FieldErrors {
        FieldErrors::from_validation(self.validate())
    }

    /// Validate, then create the account.
    ///
    /// The new account is not signed in; the caller sends the user to the
    /// sign-in page.
    pub async fn submit(&self, identity: &dyn IdentityProvider) -> Result<SignedInUser, FieldErrors> {
        let mut errors = self.check();
        if !errors.is_empty() {
            return Err(errors);
        }

        match identity.create_account(&self.email, &self.password).await {
            Ok(user) => {
                tracing::info!(uid = %user.uid, "Account created");
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create account");
                errors.set("confirmPassword", SIGN_UP_FAILED);
                Err(errors)
            }
        }
    }
}

fn check_password(password: &str) -> Result<(), ValidationError> {
    let message = if password.is_empty() {
        PASSWORD_REQUIRED
    } else if password.chars().count() < MIN_PASSWORD_CHARS {
        PASSWORD_TOO_SHORT
    } else {
        return Ok(());
    };
    Err(ValidationError::new("password").with_message(Cow::Borrowed(message)))
}
