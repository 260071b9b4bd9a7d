//! Object storage for product images

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

/// A file picked for upload
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        }
    }

    /// Read from disk, guessing the content type from the extension
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = match path.extension().and_then(|e| e.to_str()) {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("svg") => "image/svg+xml",
            _ => "application/octet-stream",
        };
        Ok(Self::new(&file_name, content_type, bytes))
    }

    /// Text after the last dot; the whole name when there is none
    pub fn extension(&self) -> &str {
        self.file_name.rsplit('.').next().unwrap_or("")
    }
}

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Upload rejected: {0}")]
    Rejected(String),
    #[error("Network error: {0}")]
    Network(String),
}

/// Image storage trait
#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Upload, overwriting any object already at `path`
    async fn upload(&self, bucket: &str, path: &str, file: &ImageFile) -> Result<(), StorageError>;

    fn public_url(&self, bucket: &str, path: &str) -> String;
}

/// Supabase Storage over `/storage/v1`
pub struct SupabaseStorage {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl SupabaseStorage {
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str, access_token: Option<&str>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: access_token.map(str::to_string),
        }
    }
}

#[async_trait]
impl ImageStorage for SupabaseStorage {
    async fn upload(&self, bucket: &str, path: &str, file: &ImageFile) -> Result<(), StorageError> {
        let url = format!("{}/object/{}/{}", self.base_url, bucket, path);
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        tracing::debug!("Uploading {} bytes to {}", file.bytes.len(), url);

        let response = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, &file.content_type)
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(|e| StorageError::Network(e.to_string()))?;

        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(StorageError::Rejected(format!("HTTP {}: {}", status.as_u16(), body)))
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/object/public/{}/{}", self.base_url, bucket, path)
    }
}

/// In-memory storage for tests and local runs
#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, ImageFile>>,
    failing: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every upload from now on
    pub fn fail_uploads(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn get(&self, bucket: &str, path: &str) -> Option<ImageFile> {
        let objects = self.objects.lock().unwrap_or_else(|e| e.into_inner());
        objects.get(&format!("{}/{}", bucket, path)).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ImageStorage for MemoryStorage {
    async fn upload(&self, bucket: &str, path: &str, file: &ImageFile) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Rejected("storage unavailable".to_string()));
        }
        let mut objects = self.objects.lock().unwrap_or_else(|e| e.into_inner());
        objects.insert(format!("{}/{}", bucket, path), file.clone());
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://{}/{}", bucket, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(ImageFile::new("cap.front.png", "image/png", vec![]).extension(), "png");
        assert_eq!(ImageFile::new("README", "text/plain", vec![]).extension(), "README");
    }

    #[test]
    fn test_public_url() {
        let storage = SupabaseStorage::new(
            reqwest::Client::new(),
            "https://abc.supabase.co/storage/v1",
            "anon",
            None,
        );
        assert_eq!(
            storage.public_url("product-images", "Cap_1.png"),
            "https://abc.supabase.co/storage/v1/object/public/product-images/Cap_1.png"
        );
    }

    #[tokio::test]
    async fn test_memory_upload_overwrites() {
        let storage = MemoryStorage::new();
        let first = ImageFile::new("a.png", "image/png", vec![1]);
        let second = ImageFile::new("a.png", "image/png", vec![2]);
        storage.upload("b", "a.png", &first).await.unwrap();
        storage.upload("b", "a.png", &second).await.unwrap();

        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get("b", "a.png").unwrap().bytes, vec![2]);
    }
}
