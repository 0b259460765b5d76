//! Blocking client for the external document API
//!
//! The API stores whole documents: every save sends the complete title,
//! section tree and metadata, and the server's copy becomes exactly that.

use crate::app_config::AppConfig;
use crate::document_model::{Document, Section};
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Errors talking to the document API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to {action}: {source}")]
    Transport {
        action: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to {action}: server responded {status}")]
    Status {
        action: &'static str,
        status: StatusCode,
    },

    #[error("Failed to {action}: invalid response body: {source}")]
    Decode {
        action: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

/// Body of a create or update request
///
/// Unset metadata is sent as `null` so that an update clears it on the
/// server instead of leaving the old value in place.
#[derive(Debug, Serialize)]
pub struct DocumentPayload<'a> {
    pub title: &'a str,
    pub subtitle: Option<&'a str>,
    pub sections: &'a [Section],
    pub client: Option<&'a str>,
    pub authors: Option<&'a [String]>,
    pub classified: Option<bool>,
    pub last_revision: Option<&'a str>,
    pub contacts: Option<&'a str>,
}

impl<'a> From<&'a Document> for DocumentPayload<'a> {
    fn from(doc: &'a Document) -> Self {
        Self {
            title: &doc.title,
            subtitle: doc.subtitle.as_deref(),
            sections: &doc.sections,
            client: doc.client.as_deref(),
            authors: doc.authors.as_deref(),
            classified: doc.classified,
            last_revision: doc.last_revision.as_deref(),
            contacts: doc.contacts.as_deref(),
        }
    }
}

/// Stored document together with the server copy it replaced
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub stored: Document,
    /// `None` when the document was created, or when the previous copy
    /// could not be fetched
    pub replaced: Option<Document>,
}

/// Client for `/documents` on the document API
#[derive(Debug, Clone)]
pub struct DocumentApiClient {
    base_url: Url,
    http: Client,
}

impl DocumentApiClient {
    /// Create a client from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|source| ApiError::Transport {
                action: "build HTTP client",
                source,
            })?;

        Self::with_http_client(&config.api_url, http)
    }

    /// Create a client around an existing HTTP client
    pub fn with_http_client(base_url: &str, http: Client) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            });
        }

        Ok(Self { base_url, http })
    }

    /// URL of the collection, or of one document when `id` is given
    pub fn documents_url(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("documents");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    /// `GET /documents`
    pub fn list_documents(&self) -> Result<Vec<Document>, ApiError> {
        let action = "fetch documents";
        let response = self.http.get(self.documents_url(None)).send();
        decode(action, check(action, response)?)
    }

    /// `GET /documents/{id}`
    pub fn get_document(&self, id: &str) -> Result<Document, ApiError> {
        let action = "fetch document";
        let response = self.http.get(self.documents_url(Some(id))).send();
        decode(action, check(action, response)?)
    }

    /// `POST /documents`, returning the stored document with its new id
    pub fn create_document(&self, doc: &Document) -> Result<Document, ApiError> {
        let action = "create document";
        let response = self
            .http
            .post(self.documents_url(None))
            .json(&DocumentPayload::from(doc))
            .send();
        decode(action, check(action, response)?)
    }

    /// `PUT /documents/{id}` with the whole document
    pub fn update_document(&self, id: &str, doc: &Document) -> Result<Document, ApiError> {
        let action = "update document";
        let response = self
            .http
            .put(self.documents_url(Some(id)))
            .json(&DocumentPayload::from(doc))
            .send();
        decode(action, check(action, response)?)
    }

    /// `DELETE /documents/{id}`
    pub fn delete_document(&self, id: &str) -> Result<(), ApiError> {
        let action = "delete document";
        let response = self.http.delete(self.documents_url(Some(id))).send();
        check(action, response).map(|_| ())
    }

    /// Create the document when it has no id yet, overwrite it otherwise
    pub fn save_document(&self, doc: &Document) -> Result<Document, ApiError> {
        if doc.is_saved() {
            log::info!("Updating document {}", doc.id);
            self.update_document(&doc.id, doc)
        } else {
            log::info!("Creating document '{}'", doc.title);
            self.create_document(doc)
        }
    }

    /// Save a document, also returning the server copy it overwrote
    ///
    /// The previous copy is fetched first so callers can compare image
    /// references. Failing to fetch it only skips that comparison; the save
    /// itself still goes ahead.
    pub fn save_replacing(&self, doc: &Document) -> Result<SaveOutcome, ApiError> {
        let replaced = if doc.is_saved() {
            match self.get_document(&doc.id) {
                Ok(previous) => Some(previous),
                Err(e) => {
                    log::warn!("Could not fetch server copy of {}: {}", doc.id, e);
                    None
                }
            }
        } else {
            None
        };

        let stored = self.save_document(doc)?;
        Ok(SaveOutcome { stored, replaced })
    }
}

fn check(
    action: &'static str,
    response: Result<Response, reqwest::Error>,
) -> Result<Response, ApiError> {
    let response = response.map_err(|source| ApiError::Transport { action, source })?;
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else {
        log::warn!("Document API refused to {}: {}", action, status);
        Err(ApiError::Status { action, status })
    }
}

fn decode<T: serde::de::DeserializeOwned>(
    action: &'static str,
    response: Response,
) -> Result<T, ApiError> {
    response
        .json()
        .map_err(|source| ApiError::Decode { action, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> DocumentApiClient {
        DocumentApiClient::with_http_client(base, Client::new()).unwrap()
    }

    #[test]
    fn test_documents_url() {
        let api = client("http://localhost:8000");
        assert_eq!(api.documents_url(None).as_str(), "http://localhost:8000/documents");
        assert_eq!(
            api.documents_url(Some("doc 1")).as_str(),
            "http://localhost:8000/documents/doc%201"
        );

        let nested = client("https://example.test/api/");
        assert_eq!(
            nested.documents_url(Some("abc")).as_str(),
            "https://example.test/api/documents/abc"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = DocumentApiClient::with_http_client("not a url", Client::new()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));

        let err = DocumentApiClient::with_http_client("mailto:a@b.test", Client::new()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_payload_sends_nulls_and_omits_server_fields() {
        let doc = Document {
            id: "doc-1".to_string(),
            title: "Plan".to_string(),
            classified: Some(true),
            created_at: Some("2024-01-01".to_string()),
            ..Document::default()
        }
        .add_section();

        let value = serde_json::to_value(DocumentPayload::from(&doc)).unwrap();

        assert_eq!(value["title"], "Plan");
        assert_eq!(value["classified"], true);
        assert!(value["client"].is_null());
        assert!(value.get("client").is_some());
        assert!(value.get("subtitle").is_some_and(|v| v.is_null()));
        assert!(value.get("id").is_none());
        assert!(value.get("created_at").is_none());
        assert_eq!(value["sections"].as_array().unwrap().len(), 1);
    }
}
