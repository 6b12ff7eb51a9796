//! Document records
//!
//! Decoding is lenient about unknown fields and strict about required ones.
//! Alternate wire names are accepted through serde aliases.

use crate::markdown::prosemirror_to_markdown;
use crate::models::Person;
use crate::pagination::Page;
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// A meeting document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(alias = "document_id")]
    pub id: String,

    #[serde(default)]
    pub title: Option<String>,

    /// Must be present on the wire, may be `null`
    #[serde(deserialize_with = "nullable")]
    pub workspace_id: Option<String>,

    pub created_at: String,
    pub updated_at: String,

    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub notes_markdown: Option<String>,

    #[serde(default)]
    pub notes_plain: Option<String>,

    #[serde(default)]
    pub overview: Option<String>,

    /// Panel the owner last viewed; carries the notes of shared documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_viewed_panel: Option<JsonObject>,
}

impl Document {
    /// Notes of the last viewed panel rendered as Markdown, or `""`
    pub fn notes(&self) -> String {
        match self
            .last_viewed_panel
            .as_ref()
            .and_then(|panel| panel.get("content"))
        {
            Some(content @ JsonValue::Object(_)) => prosemirror_to_markdown(content),
            _ => String::new(),
        }
    }
}

/// Deserialize a field that must be present but may be `null`
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// One page of documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentsResponse {
    pub docs: Vec<Document>,
    #[serde(default, alias = "nextCursor")]
    pub next_cursor: Option<String>,
}

impl From<DocumentsResponse> for Page<Document> {
    fn from(response: DocumentsResponse) -> Self {
        Page::new(response.docs, response.next_cursor)
    }
}

/// Creator block of [`DocumentMetadata`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadataCreator {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub document_id: Option<String>,
    pub creator: DocumentMetadataCreator,
    #[serde(default)]
    pub attendees: Option<Vec<Person>>,
}

/// One utterance of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    #[serde(alias = "startTimestamp")]
    pub start_timestamp: String,
    #[serde(alias = "endTimestamp")]
    pub end_timestamp: String,
    pub text: String,
}

/// Notes template offered by the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelTemplate {
    pub id: String,
    pub title: String,
    #[serde(default, alias = "templateType")]
    pub template_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Fields this client does not model
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Lightweight index of every document the user can see
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSetResponse {
    /// Document id to `{updated_at, owner}`
    pub documents: HashMap<String, JsonObject>,
    #[serde(flatten)]
    pub extra: JsonObject,
}
