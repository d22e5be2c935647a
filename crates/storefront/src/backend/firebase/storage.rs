//! Cloud Storage for Firebase uploads.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use super::read_body;
use crate::backend::BackendError;

const STORAGE_API: &str = "https://firebasestorage.googleapis.com/v0/b";

#[derive(Debug, Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    bucket: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectMetadata {
    name: String,
    /// Comma-separated; the first one is used.
    download_tokens: Option<String>,
}

impl StorageClient {
    #[must_use]
    pub const fn new(client: reqwest::Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Public download URL of an object.
    #[must_use]
    pub fn download_url(&self, path: &str, token: &str) -> String {
        format!(
            "{STORAGE_API}/{}/o/{}?alt=media&token={}",
            self.bucket,
            urlencoding::encode(path),
            urlencoding::encode(token)
        )
    }

    /// Upload an object and return its durable download URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected or the response carries
    /// no download token.
    #[instrument(skip(self, bytes, id_token), fields(path = %path, size = bytes.len()))]
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        id_token: Option<&SecretString>,
    ) -> Result<String, BackendError> {
        let mut request = self
            .client
            .post(format!("{STORAGE_API}/{}/o", self.bucket))
            .query(&[("uploadType", "media"), ("name", path)])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        if let Some(token) = id_token {
            request = request.header(
                reqwest::header::AUTHORIZATION,
                format!("Firebase {}", token.expose_secret()),
            );
        }

        let body = read_body(request.send().await?).await?;
        let metadata: ObjectMetadata = serde_json::from_str(&body)?;
        let token = metadata
            .download_tokens
            .as_deref()
            .and_then(|tokens| tokens.split(',').next())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                BackendError::Decode(format!("upload of {} returned no download token", metadata.name))
            })?;
        Ok(self.download_url(&metadata.name, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_url_encodes_path() {
        let storage = StorageClient::new(reqwest::Client::new(), "venus.appspot.com".to_string());
        assert_eq!(
            storage.download_url("geckos/abc_luna 1.jpg", "tok"),
            "https://firebasestorage.googleapis.com/v0/b/venus.appspot.com/o/geckos%2Fabc_luna%201.jpg?alt=media&token=tok"
        );
    }
}
