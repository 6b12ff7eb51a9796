//! Shared folder (document list) records

use crate::types::JsonObject;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentListIcon {
    #[serde(rename = "type")]
    pub icon_type: String,
    pub color: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentListMember {
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    pub role: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackChannel {
    pub id: String,
    pub name: String,
}

/// A shared folder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentList {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<DocumentListIcon>,
    pub visibility: String,
    pub workspace_id: String,
    pub is_favourited: bool,
    #[serde(default)]
    pub user_role: Option<String>,
    pub members: Vec<DocumentListMember>,
    pub document_ids: Vec<String>,
    #[serde(default)]
    pub slack_channel: Option<SlackChannel>,
    pub is_shared: bool,
    pub sharing_link_visibility: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Every folder keyed by folder id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentListsResponse {
    pub lists: BTreeMap<String, DocumentList>,
}

impl DocumentListsResponse {
    /// Folders whose title equals `name`, in id order
    pub fn find_by_name(&self, name: &str, case_sensitive: bool) -> Vec<&DocumentList> {
        let wanted = name.to_lowercase();
        self.lists
            .values()
            .filter(|list| {
                if case_sensitive {
                    list.title == name
                } else {
                    list.title.to_lowercase() == wanted
                }
            })
            .collect()
    }
}
