//! Document metadata edits (client, authors, classification, revision, contacts)

use super::document::Document;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

static REVISION_DATE: OnceLock<Regex> = OnceLock::new();

fn revision_date_pattern() -> &'static Regex {
    REVISION_DATE.get_or_init(|| {
        Regex::new(r"^(\d{4}-\d{2}-\d{2})(?:T\S*)?$").expect("revision date pattern is valid")
    })
}

/// Errors raised while preparing a metadata update
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Last revision must be a date in YYYY-MM-DD form, got '{0}'")]
    InvalidRevisionDate(String),
}

/// Replacement values for the document's metadata fields
///
/// Applying an update overwrites every field; `None` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataUpdate {
    pub client: Option<String>,
    pub authors: Option<Vec<String>>,
    pub classified: bool,
    pub last_revision: Option<String>,
    pub contacts: Option<String>,
}

impl MetadataUpdate {
    /// Build an update from raw form input
    ///
    /// # Parameters
    /// * `client` - Client name, empty clears it
    /// * `authors` - Comma-separated author names
    /// * `classified` - Classification flag
    /// * `last_revision` - `YYYY-MM-DD` date or full timestamp, empty clears it
    /// * `contacts` - Contact text, empty clears it
    ///
    /// # Returns
    /// * `Ok(MetadataUpdate)` - Normalized update
    /// * `Err(MetadataError)` - The revision date is not a date
    pub fn from_form(
        client: &str,
        authors: &str,
        classified: bool,
        last_revision: &str,
        contacts: &str,
    ) -> Result<Self, MetadataError> {
        let last_revision = match last_revision.trim() {
            "" => None,
            raw => Some(normalize_revision_date(raw)?),
        };

        Ok(Self {
            client: non_empty(client),
            authors: parse_authors(authors),
            classified,
            last_revision,
            contacts: non_empty(contacts),
        })
    }

    /// Capture the current metadata of a document
    pub fn from_document(doc: &Document) -> Self {
        Self {
            client: doc.client.clone(),
            authors: doc.authors.clone(),
            classified: doc.classified.unwrap_or(false),
            last_revision: doc.last_revision.clone(),
            contacts: doc.contacts.clone(),
        }
    }
}

impl Document {
    /// Return the document with its metadata replaced by `update`
    pub fn with_metadata(self, update: MetadataUpdate) -> Self {
        Self {
            client: update.client,
            authors: update.authors,
            classified: Some(update.classified),
            last_revision: update.last_revision,
            contacts: update.contacts,
            ..self
        }
    }
}

/// Split a comma-separated author list, dropping blanks
///
/// Returns `None` when no names remain.
pub fn parse_authors(raw: &str) -> Option<Vec<String>> {
    let authors: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    (!authors.is_empty()).then_some(authors)
}

/// Reduce a date or timestamp to its `YYYY-MM-DD` date part
pub fn normalize_revision_date(raw: &str) -> Result<String, MetadataError> {
    revision_date_pattern()
        .captures(raw.trim())
        .and_then(|caps| caps.get(1))
        .map(|date| date.as_str().to_string())
        .ok_or_else(|| MetadataError::InvalidRevisionDate(raw.to_string()))
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_authors() {
        assert_eq!(
            parse_authors(" Ada ,, Grace,  "),
            Some(vec!["Ada".to_string(), "Grace".to_string()])
        );
        assert_eq!(parse_authors(" , "), None);
    }

    #[test]
    fn test_revision_date_accepts_timestamps() {
        assert_eq!(normalize_revision_date("2024-03-01").unwrap(), "2024-03-01");
        assert_eq!(
            normalize_revision_date("2024-03-01T10:20:30.000Z").unwrap(),
            "2024-03-01"
        );
        assert!(matches!(
            normalize_revision_date("March 1st"),
            Err(MetadataError::InvalidRevisionDate(_))
        ));
    }

    #[test]
    fn test_empty_form_fields_clear_metadata() {
        let doc = Document {
            client: Some("ACME".to_string()),
            contacts: Some("ops@acme.test".to_string()),
            ..Document::new("Plan")
        };

        let update = MetadataUpdate::from_form("", "", true, "", "  ").unwrap();
        let doc = doc.with_metadata(update);

        assert_eq!(doc.client, None);
        assert_eq!(doc.contacts, None);
        assert_eq!(doc.authors, None);
        assert_eq!(doc.classified, Some(true));
        assert_eq!(doc.title, "Plan");
    }

    #[test]
    fn test_from_document_round_trips() {
        let doc = Document {
            client: Some("ACME".to_string()),
            authors: Some(vec!["Ada".to_string()]),
            last_revision: Some("2024-01-02".to_string()),
            ..Document::default()
        };

        let update = MetadataUpdate::from_document(&doc);
        let reapplied = doc.clone().with_metadata(update);

        assert_eq!(reapplied.client, doc.client);
        assert_eq!(reapplied.authors, doc.authors);
        assert_eq!(reapplied.last_revision, doc.last_revision);
        assert_eq!(reapplied.classified, Some(false));
    }
}
