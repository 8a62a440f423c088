// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use dashmap::DashMap;
use devlinks::config::Config;
use devlinks::db::DocumentStore;
use devlinks::routes::create_router;
use devlinks::services::{
    IdentityError, IdentityProvider, ObjectStorage, SignedInUser, VerifiedUser,
};
use devlinks::AppState;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Token the fake identity provider accepts for `ada@example.com`.
#[allow(dead_code)]
pub const VALID_TOKEN: &str = "valid-token-ada";
#[allow(dead_code)]
pub const VALID_EMAIL: &str = "ada@example.com";

/// In-process identity provider.
///
/// Accounts are `email -> password`; tokens are `token -> user`. Signing in
/// mints `token-for-<local part>`, which `verify_token` then accepts.
#[derive(Default)]
pub struct FakeIdentity {
    accounts: DashMap<String, String>,
    tokens: DashMap<String, VerifiedUser>,
    unavailable: AtomicBool,
    verify_calls: AtomicUsize,
}

#[allow(dead_code)]
impl FakeIdentity {
    pub fn new() -> Self {
        let fake = Self::default();
        fake.add_account(VALID_EMAIL, "correct horse");
        fake.tokens.insert(
            VALID_TOKEN.to_string(),
            VerifiedUser {
                uid: "uid-ada".to_string(),
                email: Some(VALID_EMAIL.to_string()),
            },
        );
        fake
    }

    pub fn add_account(&self, email: &str, password: &str) {
        self.accounts.insert(email.to_string(), password.to_string());
    }

    pub fn has_account(&self, email: &str) -> bool {
        self.accounts.contains_key(email)
    }

    /// Make every call fail as if the provider were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<(), IdentityError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(IdentityError::Unavailable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    fn mint(&self, email: &str) -> SignedInUser {
        let local = email.split('@').next().unwrap_or(email);
        let uid = format!("uid-{}", local);
        let id_token = format!("token-for-{}", local);
        self.tokens.insert(
            id_token.clone(),
            VerifiedUser {
                uid: uid.clone(),
                email: Some(email.to_string()),
            },
        );
        SignedInUser {
            uid,
            email: email.to_string(),
            id_token,
        }
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignedInUser, IdentityError> {
        self.check_available()?;
        match self.accounts.get(email) {
            Some(stored) if stored.as_str() == password => Ok(self.mint(email)),
            _ => Err(IdentityError::InvalidCredentials),
        }
    }

    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignedInUser, IdentityError> {
        self.check_available()?;
        if self.accounts.contains_key(email) {
            return Err(IdentityError::Rejected("EMAIL_EXISTS".to_string()));
        }
        self.add_account(email, password);
        Ok(self.mint(email))
    }

    async fn verify_token(&self, token: &str) -> Result<VerifiedUser, IdentityError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        self.tokens
            .get(token)
            .map(|user| user.clone())
            .ok_or_else(|| IdentityError::InvalidToken("token expired".to_string()))
    }
}

/// Everything a route test needs to poke at.
#[allow(dead_code)]
pub struct TestApp {
    pub router: axum::Router,
    pub state: Arc<AppState>,
    pub identity: Arc<FakeIdentity>,
}

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> DocumentStore {
    DocumentStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

fn build_app(db: DocumentStore, storage: ObjectStorage) -> TestApp {
    let identity = Arc::new(FakeIdentity::new());
    let state = Arc::new(AppState {
        config: Config::test_default(),
        db,
        storage,
        identity: identity.clone(),
    });

    TestApp {
        router: create_router(state.clone()),
        state,
        identity,
    }
}

/// Create a test app with in-memory stores and the fake identity provider.
#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    build_app(DocumentStore::new_in_memory(), ObjectStorage::new_in_memory())
}

/// Create a test app whose document store fails every call.
#[allow(dead_code)]
pub fn create_test_app_offline_db() -> TestApp {
    build_app(DocumentStore::new_offline(), ObjectStorage::new_in_memory())
}

/// Create a test app whose object storage fails every call.
#[allow(dead_code)]
pub fn create_test_app_offline_storage() -> TestApp {
    build_app(DocumentStore::new_in_memory(), ObjectStorage::new_offline())
}

/// JSON POST request, optionally with the session cookie.
#[allow(dead_code)]
pub fn json_post(uri: &str, body: serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("authToken={}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// GET request, optionally with the session cookie.
#[allow(dead_code)]
pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("authToken={}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
