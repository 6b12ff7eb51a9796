//! Endpoint methods
//!
//! Every endpoint is a POST with a JSON body unless noted. Endpoints differ
//! only in path, payload and response shape; retries, credentials and
//! decoding are handled by the call surface.

use crate::client::GranolaClient;
use crate::error::{Error, Result};
use crate::http::RequestSpec;
use crate::models::{
    Document, DocumentList, DocumentListsResponse, DocumentMetadata, DocumentSetResponse,
    DocumentsResponse, EnhancedGetDocumentsFilters, FeatureFlag, GetDocumentsFilters,
    NotionIntegrationResponse, PanelTemplate, Person, SubscriptionsResponse, TranscriptSegment,
    UpdateDocumentPanelPayload, UpdateDocumentPayload,
};
use crate::types::{JsonObject, JsonValue};
use futures::Stream;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, instrument};

const GET_DOCUMENTS: &str = "/v2/get-documents";

impl GranolaClient {
    // ========================================================================
    // Documents
    // ========================================================================

    /// One page of documents
    pub async fn get_documents(
        &self,
        filters: Option<GetDocumentsFilters>,
    ) -> Result<DocumentsResponse> {
        let body = to_body(&filters.unwrap_or_default())?;
        self.call(RequestSpec::post(GET_DOCUMENTS).json(body)).await
    }

    /// Every document matching `filters`, fetched page by page as consumed
    ///
    /// A cursor set on `filters` is ignored; the walk always starts at the
    /// first page.
    pub fn list_all_documents(
        &self,
        filters: Option<GetDocumentsFilters>,
    ) -> Result<impl Stream<Item = Result<Document>> + Send + 'static> {
        let mut filters = filters.unwrap_or_default();
        filters.cursor = None;

        let body = match to_body(&filters)? {
            JsonValue::Object(map) => map,
            _ => JsonObject::new(),
        };
        Ok(self.stream::<DocumentsResponse, Document>(GET_DOCUMENTS, body))
    }

    /// `get-documents` with shared folder options
    pub async fn get_documents_enhanced(
        &self,
        filters: EnhancedGetDocumentsFilters,
    ) -> Result<DocumentsResponse> {
        let body = to_body(&filters)?;
        self.call(RequestSpec::post(GET_DOCUMENTS).json(body)).await
    }

    pub async fn get_document_metadata(&self, document_id: &str) -> Result<DocumentMetadata> {
        self.call(
            RequestSpec::post("/v1/get-document-metadata")
                .json(json!({ "document_id": document_id })),
        )
        .await
    }

    /// Transcript segments; the endpoint answers with a bare array
    pub async fn get_document_transcript(
        &self,
        document_id: &str,
    ) -> Result<Vec<TranscriptSegment>> {
        self.call_list(
            RequestSpec::post("/v1/get-document-transcript")
                .json(json!({ "document_id": document_id })),
        )
        .await
    }

    pub async fn update_document(&self, payload: &UpdateDocumentPayload) -> Result<()> {
        let body = to_body(payload)?;
        self.call_void(RequestSpec::post("/v1/update-document").json(body))
            .await
    }

    pub async fn update_document_panel(&self, payload: &UpdateDocumentPanelPayload) -> Result<()> {
        let body = to_body(payload)?;
        self.call_void(RequestSpec::post("/v1/update-document-panel").json(body))
            .await
    }

    /// Lightweight index of every accessible document
    pub async fn get_document_set(&self) -> Result<DocumentSetResponse> {
        self.call(RequestSpec::post("/v1/get-document-set")).await
    }

    // ========================================================================
    // Folders
    // ========================================================================

    /// Metadata of every shared folder, including document ids
    pub async fn get_document_lists(&self) -> Result<DocumentListsResponse> {
        self.call(
            RequestSpec::post("/v1/get-document-lists-metadata").json(json!({
                "include_document_ids": true,
                "include_only_joined_lists": false,
            })),
        )
        .await
    }

    /// Documents in the folder with id `folder_id`
    #[instrument(skip(self))]
    pub async fn get_documents_by_folder_id(&self, folder_id: &str) -> Result<Vec<Document>> {
        let lists = self.get_document_lists().await?;
        let folder = lists
            .lists
            .get(folder_id)
            .ok_or_else(|| Error::lookup(format!("Folder with ID '{folder_id}' not found")))?;
        self.documents_in(folder).await
    }

    /// Documents in the only folder titled `folder_name`
    #[instrument(skip(self))]
    pub async fn get_documents_by_folder_name(
        &self,
        folder_name: &str,
        case_sensitive: bool,
    ) -> Result<Vec<Document>> {
        let lists = self.get_document_lists().await?;
        let matches = lists.find_by_name(folder_name, case_sensitive);

        match matches.as_slice() {
            [] => Err(Error::lookup(format!(
                "No folder found with name '{folder_name}'"
            ))),
            [folder] => self.documents_in(folder).await,
            many => {
                let titles: Vec<&str> = many.iter().map(|f| f.title.as_str()).collect();
                Err(Error::lookup(format!(
                    "Multiple folders found with name '{folder_name}': {titles:?}. \
                     Use get_documents_by_folder_id with a specific folder ID instead."
                )))
            }
        }
    }

    async fn documents_in(&self, folder: &DocumentList) -> Result<Vec<Document>> {
        if folder.document_ids.is_empty() {
            debug!(folder = %folder.id, "Folder is empty");
            return Ok(Vec::new());
        }

        let filters = EnhancedGetDocumentsFilters::for_documents(folder.document_ids.clone());
        Ok(self.get_documents_enhanced(filters).await?.docs)
    }

    // ========================================================================
    // Workspace
    // ========================================================================

    pub async fn get_panel_templates(&self) -> Result<Vec<PanelTemplate>> {
        self.call_list(RequestSpec::post("/v1/get-panel-templates"))
            .await
    }

    pub async fn get_people(&self) -> Result<Vec<Person>> {
        self.call_list(RequestSpec::post("/v1/get-people")).await
    }

    pub async fn get_feature_flags(&self) -> Result<Vec<FeatureFlag>> {
        self.call_list(RequestSpec::post("/v1/get-feature-flags"))
            .await
    }

    pub async fn get_notion_integration(&self) -> Result<NotionIntegrationResponse> {
        self.call(RequestSpec::post("/v1/get-notion-integration"))
            .await
    }

    pub async fn get_subscriptions(&self) -> Result<SubscriptionsResponse> {
        self.call(RequestSpec::post("/v1/get-subscriptions")).await
    }

    /// Ask the server to resync calendar events
    pub async fn refresh_google_events(&self) -> Result<()> {
        self.call_void(RequestSpec::post("/v1/refresh-google-events"))
            .await
    }

    /// Update feed for this platform (GET, YAML text)
    pub async fn check_for_update(&self) -> Result<String> {
        self.get_text(&format!("/v1/check-for-update/{}", update_feed()))
            .await
    }
}

/// Update feed file name for the running platform
pub(crate) fn update_feed() -> &'static str {
    match std::env::consts::OS {
        "windows" => "latest.yml",
        "linux" => "latest-linux.yml",
        _ => "latest-mac.yml",
    }
}

fn to_body<S: Serialize>(value: &S) -> Result<JsonValue> {
    Ok(serde_json::to_value(value)?)
}
