// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Document store wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Profiles (one document per email, overwritten on save)
//! - Link lists (append-only, one document per save)
//!
//! Backed by Cloud Firestore in production. An in-memory backend serves
//! tests and local development, and an offline backend fails every call.

use crate::db::collections;
use crate::error::AppError;
use crate::models::{LinkList, Profile};
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Clone)]
enum Backend {
    Firestore(firestore::FirestoreDb),
    Memory(Arc<MemoryCollections>),
    Offline,
}

/// Collection name -> (document ID -> JSON body).
#[derive(Default)]
struct MemoryCollections {
    docs: DashMap<String, BTreeMap<String, serde_json::Value>>,
    next_id: AtomicU64,
}

/// Document store client.
#[derive(Clone)]
pub struct DocumentStore {
    backend: Backend,
}

impl DocumentStore {
    /// Connect to Cloud Firestore.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            backend: Backend::Firestore(client),
        })
    }

    /// Create an in-memory store. Contents live as long as the process.
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryCollections::default())),
        }
    }

    /// Create an offline store for testing failure paths.
    ///
    /// All database operations will return an error if called.
    pub fn new_offline() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    // ─── Profile Operations ──────────────────────────────────────

    /// Create or overwrite the profile stored under its email.
    pub async fn set_profile(&self, profile: &Profile) -> Result<(), AppError> {
        self.set_doc(collections::PROFILES, &profile.email, profile)
            .await?;
        tracing::debug!(email = %profile.email, "Profile stored");
        Ok(())
    }

    /// Get one profile by email.
    pub async fn get_profile(&self, email: &str) -> Result<Option<Profile>, AppError> {
        self.get_doc(collections::PROFILES, email).await
    }

    /// Read every profile in the collection.
    pub async fn list_profiles(&self) -> Result<Vec<Profile>, AppError> {
        self.list_docs(collections::PROFILES).await
    }

    // ─── Link Operations ─────────────────────────────────────────

    /// Append a new link list document and return its generated ID.
    pub async fn add_link_list(&self, list: &LinkList) -> Result<String, AppError> {
        let id = match &self.backend {
            Backend::Firestore(client) => {
                let stored: LinkList = client
                    .fluent()
                    .insert()
                    .into(collections::LINKS)
                    .generate_document_id()
                    .object(list)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;

                stored.id.ok_or_else(|| {
                    AppError::Database("Firestore did not return a document ID".to_string())
                })?
            }
            Backend::Memory(mem) => {
                let seq = mem.next_id.fetch_add(1, Ordering::Relaxed) + 1;
                let id = format!("mem{:017}", seq);
                mem.insert(collections::LINKS, &id, list)?;
                id
            }
            Backend::Offline => return Err(offline_error()),
        };

        tracing::debug!(
            id = %id,
            count = list.links.len(),
            owner = ?list.owner,
            "Link list stored"
        );
        Ok(id)
    }

    /// Read every saved link list.
    pub async fn list_link_lists(&self) -> Result<Vec<LinkList>, AppError> {
        self.list_docs(collections::LINKS).await
    }

    // ─── Helper Methods ────────────────────────────────────────────

    async fn set_doc<T>(&self, collection: &str, id: &str, obj: &T) -> Result<(), AppError>
    where
        T: Serialize + DeserializeOwned + Sync + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => {
                let _: () = client
                    .fluent()
                    .update()
                    .in_col(collection)
                    .document_id(id)
                    .object(obj)
                    .execute()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                Ok(())
            }
            Backend::Memory(mem) => mem.insert(collection, id, obj),
            Backend::Offline => Err(offline_error()),
        }
    }

    async fn get_doc<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .by_id_in(collection)
                .obj()
                .one(id)
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(mem) => mem
                .docs
                .get(collection)
                .and_then(|docs| docs.get(id).map(|body| with_document_id(id, body.clone())))
                .map(from_memory_value)
                .transpose(),
            Backend::Offline => Err(offline_error()),
        }
    }

    async fn list_docs<T>(&self, collection: &str) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Send,
    {
        match &self.backend {
            Backend::Firestore(client) => client
                .fluent()
                .select()
                .from(collection)
                .obj()
                .query()
                .await
                .map_err(|e| AppError::Database(e.to_string())),
            Backend::Memory(mem) => {
                let values: Vec<serde_json::Value> = mem
                    .docs
                    .get(collection)
                    .map(|docs| {
                        docs.iter()
                            .map(|(id, body)| with_document_id(id, body.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                values.into_iter().map(from_memory_value).collect()
            }
            Backend::Offline => Err(offline_error()),
        }
    }
}

impl MemoryCollections {
    fn insert<T: Serialize>(&self, collection: &str, id: &str, obj: &T) -> Result<(), AppError> {
        let body = serde_json::to_value(obj)
            .map_err(|e| AppError::Database(format!("Failed to encode document: {}", e)))?;
        self.docs
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), body);
        Ok(())
    }
}

/// Expose the document ID the same way Firestore does on reads.
fn with_document_id(id: &str, mut body: serde_json::Value) -> serde_json::Value {
    if let Some(map) = body.as_object_mut() {
        map.insert(
            "_firestore_id".to_string(),
            serde_json::Value::String(id.to_string()),
        );
    }
    body
}

fn from_memory_value<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, AppError> {
    serde_json::from_value(value)
        .map_err(|e| AppError::Database(format!("Failed to decode document: {}", e)))
}

fn offline_error() -> AppError {
    AppError::Database("Database not connected (offline mode)".to_string())
}
