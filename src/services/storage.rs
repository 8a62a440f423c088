// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Object storage for profile pictures (Firebase Storage REST API).

use crate::error::AppError;
use anyhow::Context;
use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const STORAGE_BASE_URL: &str = "https://firebasestorage.googleapis.com/v0";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Folder that holds uploaded profile pictures.
pub const PROFILE_PICTURES_DIR: &str = "profilePictures";

/// An object held by the in-memory backend.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
enum Backend {
    Firebase {
        http: reqwest::Client,
        base_url: String,
        bucket: String,
    },
    Memory(Arc<DashMap<String, StoredObject>>),
    Offline,
}

/// Object storage client.
#[derive(Clone)]
pub struct ObjectStorage {
    backend: Backend,
}

impl ObjectStorage {
    pub fn new_firebase(bucket: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .context("failed building storage HTTP client")?;

        tracing::info!(bucket, "Using Firebase Storage");

        Ok(Self {
            backend: Backend::Firebase {
                http,
                base_url: STORAGE_BASE_URL.to_string(),
                bucket: bucket.to_string(),
            },
        })
    }

    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(DashMap::new())),
        }
    }

    /// Storage where every call fails.
    pub fn new_offline() -> Self {
        Self {
            backend: Backend::Offline,
        }
    }

    /// Upload bytes to `path`, replacing any existing object.
    ///
    /// `id_token` is the signed-in user's ID token; Firebase security rules
    /// decide whether the write is allowed.
    pub async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
        id_token: Option<&str>,
    ) -> Result<(), AppError> {
        match &self.backend {
            Backend::Firebase {
                http,
                base_url,
                bucket,
            } => {
                let url = format!("{}/b/{}/o", base_url, bucket);
                let size = bytes.len();

                let mut request = http
                    .post(&url)
                    .query(&[("uploadType", "media"), ("name", path)])
                    .header(reqwest::header::CONTENT_TYPE, content_type)
                    .body(bytes);
                if let Some(token) = id_token {
                    request = request.header(reqwest::header::AUTHORIZATION, format!("Firebase {token}"));
                }

                let response = request
                    .send()
                    .await
                    .map_err(|e| AppError::Storage(format!("Upload request failed: {}", e)))?;

                check_response(response).await?;
                tracing::info!(path, size, "Object uploaded");
                Ok(())
            }
            Backend::Memory(objects) => {
                objects.insert(
                    path.to_string(),
                    StoredObject {
                        content_type: content_type.to_string(),
                        bytes,
                    },
                );
                Ok(())
            }
            Backend::Offline => Err(offline_error()),
        }
    }

    /// Resolve an object path to a URL a browser can fetch.
    pub async fn download_url(&self, path: &str, id_token: Option<&str>) -> Result<String, AppError> {
        match &self.backend {
            Backend::Firebase {
                http,
                base_url,
                bucket,
            } => {
                let object_url = format!("{}/b/{}/o/{}", base_url, bucket, urlencoding::encode(path));

                let mut request = http.get(&object_url);
                if let Some(token) = id_token {
                    request = request.header(reqwest::header::AUTHORIZATION, format!("Firebase {token}"));
                }

                let response = request
                    .send()
                    .await
                    .map_err(|e| AppError::Storage(format!("Metadata request failed: {}", e)))?;

                let response = check_response(response).await?;
                let metadata: ObjectMetadata = response
                    .json()
                    .await
                    .map_err(|e| AppError::Storage(format!("Invalid metadata JSON: {}", e)))?;

                Ok(media_url(&object_url, metadata.download_tokens.as_deref()))
            }
            Backend::Memory(objects) => {
                if objects.contains_key(path) {
                    Ok(format!("memory://{}", path))
                } else {
                    Err(AppError::Storage(format!("Object not found: {}", path)))
                }
            }
            Backend::Offline => Err(offline_error()),
        }
    }

    /// Fetch an object held by the in-memory backend.
    pub fn get_in_memory(&self, path: &str) -> Option<StoredObject> {
        match &self.backend {
            Backend::Memory(objects) => objects.get(path).map(|o| o.clone()),
            _ => None,
        }
    }
}

/// Object path for an uploaded profile picture.
///
/// Only the final component of the client-supplied name is kept.
pub fn profile_picture_path(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or("upload");
    format!("{}/{}", PROFILE_PICTURES_DIR, base)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    download_tokens: Option<String>,
}

fn media_url(object_url: &str, download_tokens: Option<&str>) -> String {
    match download_tokens
        .and_then(|tokens| tokens.split(',').next())
        .filter(|t| !t.is_empty())
    {
        Some(token) => format!("{}?alt=media&token={}", object_url, token),
        None => format!("{}?alt=media", object_url),
    }
}

async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(AppError::Storage(format!("status {}: {}", status, body)))
}

fn offline_error() -> AppError {
    AppError::Storage("Storage not connected (offline mode)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_picture_path_strips_directories() {
        assert_eq!(profile_picture_path("me.png"), "profilePictures/me.png");
        assert_eq!(
            profile_picture_path("../../etc/passwd"),
            "profilePictures/passwd"
        );
        assert_eq!(
            profile_picture_path("C:\\Users\\me\\avatar.jpg"),
            "profilePictures/avatar.jpg"
        );
        assert_eq!(profile_picture_path("dir/"), "profilePictures/upload");
    }

    #[test]
    fn test_media_url_uses_first_token() {
        let base = "https://firebasestorage.googleapis.com/v0/b/b/o/profilePictures%2Fme.png";
        assert_eq!(
            media_url(base, Some("tok1,tok2")),
            format!("{base}?alt=media&token=tok1")
        );
        assert_eq!(media_url(base, None), format!("{base}?alt=media"));
        assert_eq!(media_url(base, Some("")), format!("{base}?alt=media"));
    }

    #[tokio::test]
    async fn test_memory_upload_then_resolve() {
        let storage = ObjectStorage::new_in_memory();
        storage
            .upload("profilePictures/me.png", "image/png", vec![1, 2, 3], None)
            .await
            .unwrap();

        let url = storage
            .download_url("profilePictures/me.png", None)
            .await
            .unwrap();
        assert_eq!(url, "memory://profilePictures/me.png");
        assert_eq!(
            storage.get_in_memory("profilePictures/me.png").unwrap().bytes,
            vec![1, 2, 3]
        );
        assert!(storage.download_url("profilePictures/missing.png", None).await.is_err());
    }

    #[tokio::test]
    async fn test_offline_storage_errors() {
        let storage = ObjectStorage::new_offline();
        assert!(matches!(
            storage.upload("p", "image/png", vec![], None).await,
            Err(AppError::Storage(_))
        ));
    }
}
