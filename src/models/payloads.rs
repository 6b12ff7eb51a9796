//! Request payloads and filters
//!
//! Serialized with the API's wire names; absent options are left out of the
//! body entirely.

use crate::types::JsonObject;
use serde::{Deserialize, Serialize};

/// Filters for `get-documents`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetDocumentsFilters {
    #[serde(
        rename = "workspaceId",
        alias = "workspace_id",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub workspace_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cursor: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub limit: Option<u32>,

    /// Passed through verbatim
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl GetDocumentsFilters {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn workspace_id(mut self, id: impl Into<String>) -> Self {
        self.workspace_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }
}

/// `get-documents` filters with shared folder options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhancedGetDocumentsFilters {
    #[serde(flatten)]
    pub base: GetDocumentsFilters,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub include_last_viewed_panel: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub include_shared: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub include_folders: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub expand_folders: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub show_organization: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub document_ids: Option<Vec<String>>,
}

impl EnhancedGetDocumentsFilters {
    /// Fetch the given documents with their notes and folder context
    pub fn for_documents(document_ids: Vec<String>) -> Self {
        Self {
            include_last_viewed_panel: Some(true),
            include_shared: Some(true),
            include_folders: Some(true),
            expand_folders: Some(true),
            show_organization: Some(true),
            document_ids: Some(document_ids),
            ..Self::default()
        }
    }
}

/// Body of `update-document`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDocumentPayload {
    #[serde(rename = "documentId", alias = "document_id")]
    pub document_id: String,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,

    /// ProseMirror document
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notes: Option<JsonObject>,

    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub overview: Option<String>,

    #[serde(
        rename = "notesPlain",
        alias = "notes_plain",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub notes_plain: Option<String>,

    #[serde(
        rename = "notesMarkdown",
        alias = "notes_markdown",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub notes_markdown: Option<String>,

    #[serde(flatten)]
    pub extra: JsonObject,
}

impl UpdateDocumentPayload {
    pub fn new(document_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            title: None,
            notes: None,
            overview: None,
            notes_plain: None,
            notes_markdown: None,
            extra: JsonObject::new(),
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    #[must_use]
    pub fn notes_markdown(mut self, markdown: impl Into<String>) -> Self {
        self.notes_markdown = Some(markdown.into());
        self
    }
}

/// Body of `update-document-panel`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDocumentPanelPayload {
    #[serde(rename = "documentId", alias = "document_id")]
    pub document_id: String,
    #[serde(rename = "panelId", alias = "panel_id")]
    pub panel_id: String,
    pub content: JsonObject,
}
