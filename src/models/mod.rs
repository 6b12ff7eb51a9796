//! API records
//!
//! Typed request and response bodies for the endpoint layer.

mod account;
mod documents;
mod folders;
mod payloads;

pub use account::{FeatureFlag, NotionIntegrationResponse, Person, SubscriptionsResponse};
pub use documents::{
    Document, DocumentMetadata, DocumentMetadataCreator, DocumentSetResponse, DocumentsResponse,
    PanelTemplate, TranscriptSegment,
};
pub use folders::{
    DocumentList, DocumentListIcon, DocumentListMember, DocumentListsResponse, SlackChannel,
};
pub use payloads::{
    EnhancedGetDocumentsFilters, GetDocumentsFilters, UpdateDocumentPanelPayload,
    UpdateDocumentPayload,
};
