//! Document templates as returned by `/templates`.
//!
//! A template is an uploaded `.docx` whose `{{key}}` placeholders the user
//! fills in. Its field definitions are fetched separately from
//! `/templates/{id}/fields` so the list view stays light.

use crate::model::field::FieldDefinitions;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Raw tokens as found in the document, in reading order.
    #[serde(default)]
    pub placeholders: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Payload of `GET`/`PUT /templates/{id}/fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFields {
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub field_definitions: FieldDefinitions,
}

/// Payload of `GET /templates/{id}/html-preview`.
#[derive(Debug, Clone, Deserialize)]
pub struct HtmlPreview {
    pub html: String,
}

/// Body of `POST /templates/{id}/process`.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessRequest {
    pub data: IndexMap<String, String>,
}

/// Generated document returned by `POST /templates/{id}/process`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResult {
    pub document_id: String,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub remaining_quota: Option<i64>,
}

/// Values recognised by `POST /ocr/extract`, keyed by bare placeholder key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcrResult {
    #[serde(default)]
    pub data: IndexMap<String, String>,
}
