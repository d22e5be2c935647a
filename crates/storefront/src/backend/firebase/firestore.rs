//! Firestore documents REST API.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::{read_body, value};
use crate::backend::{BackendError, Collection, Document, Fields, Snapshot, WriteMode};

const PAGE_SIZE: usize = 300;

/// Client for one project's default database.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    client: reqwest::Client,
    documents_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    documents: Vec<RawDocument>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    name: String,
    fields: Option<Value>,
}

impl RawDocument {
    fn into_document(self) -> Result<Document, BackendError> {
        let id = self
            .name
            .rsplit('/')
            .next()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| BackendError::Decode(format!("bad document name: {}", self.name)))?
            .to_owned();
        Ok(Document {
            id,
            fields: value::decode_fields(self.fields.as_ref())?,
        })
    }
}

impl FirestoreClient {
    #[must_use]
    pub fn new(client: reqwest::Client, project_id: &str) -> Self {
        Self {
            client,
            documents_url: format!(
                "https://firestore.googleapis.com/v1/projects/{project_id}/databases/(default)/documents"
            ),
        }
    }

    fn collection_url(&self, collection: Collection) -> String {
        format!("{}/{}", self.documents_url, collection.name())
    }

    fn document_url(&self, collection: Collection, id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.documents_url,
            collection.name(),
            urlencoding::encode(id)
        )
    }

    fn authorize(request: reqwest::RequestBuilder, token: Option<&SecretString>) -> reqwest::RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Read every document of a collection, following page tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails or a document is malformed.
    #[instrument(skip(self, token), fields(collection = %collection))]
    pub async fn list(
        &self,
        collection: Collection,
        token: Option<&SecretString>,
    ) -> Result<Snapshot, BackendError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("pageSize", PAGE_SIZE.to_string())];
            if let Some(page) = page_token.take() {
                query.push(("pageToken", page));
            }
            let request = self.client.get(self.collection_url(collection)).query(&query);
            let body = read_body(Self::authorize(request, token).send().await?).await?;
            let page: ListResponse = serde_json::from_str(&body)?;

            for raw in page.documents {
                documents.push(raw.into_document()?);
            }
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => break,
            }
        }

        debug!(count = documents.len(), "listed collection");
        Ok(Snapshot { documents })
    }

    /// Create a document with a server-assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no name.
    #[instrument(skip(self, payload, token), fields(collection = %collection))]
    pub async fn create(
        &self,
        collection: Collection,
        payload: &Fields,
        token: Option<&SecretString>,
    ) -> Result<String, BackendError> {
        let request = self
            .client
            .post(self.collection_url(collection))
            .json(&json!({ "fields": value::encode_fields(payload) }));
        let body = read_body(Self::authorize(request, token).send().await?).await?;
        let raw: RawDocument = serde_json::from_str(&body)?;
        Ok(raw.into_document()?.id)
    }

    /// Write a document at a known id.
    ///
    /// [`WriteMode::Merge`] sends an update mask so only the given fields
    /// change; [`WriteMode::Replace`] sends none so the document becomes
    /// exactly `payload`. Both create the document if missing.
    /// [`WriteMode::Update`] adds an existence precondition, which Firestore
    /// answers with 404 for a missing document.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, payload, token), fields(collection = %collection, id = %id))]
    pub async fn patch(
        &self,
        collection: Collection,
        id: &str,
        payload: &Fields,
        mode: WriteMode,
        token: Option<&SecretString>,
    ) -> Result<(), BackendError> {
        let request = self
            .client
            .patch(self.document_url(collection, id))
            .query(&patch_query(payload, mode))
            .json(&json!({ "fields": value::encode_fields(payload) }));
        read_body(Self::authorize(request, token).send().await?).await?;
        Ok(())
    }

    /// Delete a document. Firestore treats a missing document as deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(collection = %collection, id = %id))]
    pub async fn delete(
        &self,
        collection: Collection,
        id: &str,
        token: Option<&SecretString>,
    ) -> Result<(), BackendError> {
        let request = self.client.delete(self.document_url(collection, id));
        read_body(Self::authorize(request, token).send().await?).await?;
        Ok(())
    }
}

/// Query parameters for a patch in `mode`.
fn patch_query(payload: &Fields, mode: WriteMode) -> Vec<(&'static str, &str)> {
    let mask = payload.keys().map(|key| ("updateMask.fieldPaths", key.as_str()));
    match mode {
        WriteMode::Replace => Vec::new(),
        WriteMode::Merge => mask.collect(),
        WriteMode::Update => mask.chain([("currentDocument.exists", "true")]).collect(),
    }
}
