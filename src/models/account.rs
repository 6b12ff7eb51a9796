//! People, feature flags, integrations and subscriptions

use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub details: Option<JsonObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureFlag {
    pub feature: String,
    /// Flag payload; booleans, strings and objects all occur
    #[serde(default)]
    pub value: JsonValue,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl FeatureFlag {
    /// True when the value is `true`, or a non-empty non-`false` payload
    pub fn is_enabled(&self) -> bool {
        match &self.value {
            JsonValue::Null | JsonValue::Bool(false) => false,
            JsonValue::String(s) => !s.is_empty(),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotionIntegrationResponse {
    #[serde(alias = "can_integrate")]
    pub can_integrate: bool,
    #[serde(alias = "is_connected")]
    pub is_connected: bool,
    #[serde(default, alias = "auth_url")]
    pub auth_url: Option<String>,
    #[serde(default)]
    pub integrations: Option<JsonObject>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionsResponse {
    #[serde(default)]
    pub active_plan_id: Option<String>,
    #[serde(default)]
    pub subscription_plans: Option<Vec<JsonValue>>,
}
