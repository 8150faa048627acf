//! Field definitions: the per-placeholder metadata that drives both the
//! form-fill flow and the template editor.
//!
//! A template exposes a set of `{{key}}` placeholders. For every placeholder
//! the API stores a `FieldDefinition` describing what kind of data goes there
//! (`DataType`), which person or role it belongs to (`Entity`), how it should
//! be edited (`InputType`), optional validation rules and the layout metadata
//! used by the editor (`group`, `order`, merge and radio information).
//!
//! The JSON shape mirrors the REST API (camelCase keys). Data and input types
//! are open enums: the admin console can register custom codes, which are kept
//! verbatim in the `Custom` variants so they survive a load/save cycle.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered map of bare placeholder key (`m_prov`, not `{{m_prov}}`) to its
/// definition. Insertion order is the order the API sent the keys in and is
/// used as the tie-breaker when deriving sections.
pub type FieldDefinitions = IndexMap<String, FieldDefinition>;

/// Group tag prefix for members folded into a merged field.
pub const MERGED_HIDDEN_PREFIX: &str = "merged_hidden_";
/// Group tag prefix for non-master options of a radio group.
pub const RADIO_HIDDEN_PREFIX: &str = "radio_hidden_";
/// Group tag prefix for fields shown only when a radio option is selected.
pub const RADIO_CHILD_PREFIX: &str = "radio_child_";

/// Kind of data a placeholder holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    #[default]
    Text,
    IdNumber,
    Date,
    Time,
    Number,
    Address,
    Province,
    District,
    Subdistrict,
    Country,
    NamePrefix,
    Name,
    Weekday,
    Phone,
    Email,
    HouseCode,
    Zodiac,
    LunarMonth,
    OfficerName,
    Age,
    Checkbox,
    /// A code registered through the admin console.
    Custom(String),
}

impl DataType {
    pub fn as_str(&self) -> &str {
        match self {
            DataType::Text => "text",
            DataType::IdNumber => "id_number",
            DataType::Date => "date",
            DataType::Time => "time",
            DataType::Number => "number",
            DataType::Address => "address",
            DataType::Province => "province",
            DataType::District => "district",
            DataType::Subdistrict => "subdistrict",
            DataType::Country => "country",
            DataType::NamePrefix => "name_prefix",
            DataType::Name => "name",
            DataType::Weekday => "weekday",
            DataType::Phone => "phone",
            DataType::Email => "email",
            DataType::HouseCode => "house_code",
            DataType::Zodiac => "zodiac",
            DataType::LunarMonth => "lunar_month",
            DataType::OfficerName => "officer_name",
            DataType::Age => "age",
            DataType::Checkbox => "checkbox",
            DataType::Custom(code) => code,
        }
    }

    /// Built-in data types in the order the editor lists them.
    pub fn builtin() -> &'static [DataType] {
        &[
            DataType::Text,
            DataType::IdNumber,
            DataType::Date,
            DataType::Time,
            DataType::Number,
            DataType::Address,
            DataType::Province,
            DataType::District,
            DataType::Subdistrict,
            DataType::Country,
            DataType::NamePrefix,
            DataType::Name,
            DataType::Weekday,
            DataType::Phone,
            DataType::Email,
            DataType::HouseCode,
            DataType::Zodiac,
            DataType::LunarMonth,
            DataType::OfficerName,
            DataType::Age,
            DataType::Checkbox,
        ]
    }
}

impl From<String> for DataType {
    fn from(code: String) -> Self {
        match code.as_str() {
            "text" => DataType::Text,
            "id_number" => DataType::IdNumber,
            "date" => DataType::Date,
            "time" => DataType::Time,
            "number" => DataType::Number,
            "address" => DataType::Address,
            "province" => DataType::Province,
            "district" => DataType::District,
            "subdistrict" => DataType::Subdistrict,
            "country" => DataType::Country,
            "name_prefix" => DataType::NamePrefix,
            "name" => DataType::Name,
            "weekday" => DataType::Weekday,
            "phone" => DataType::Phone,
            "email" => DataType::Email,
            "house_code" => DataType::HouseCode,
            "zodiac" => DataType::Zodiac,
            "lunar_month" => DataType::LunarMonth,
            "officer_name" => DataType::OfficerName,
            "age" => DataType::Age,
            "checkbox" => DataType::Checkbox,
            _ => DataType::Custom(code),
        }
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        data_type.as_str().to_string()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Widget used to edit a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum InputType {
    #[default]
    Text,
    Select,
    Date,
    Time,
    Number,
    Textarea,
    Checkbox,
    Radio,
    Location,
    Digit,
    Merged,
    Custom(String),
}

impl InputType {
    pub fn as_str(&self) -> &str {
        match self {
            InputType::Text => "text",
            InputType::Select => "select",
            InputType::Date => "date",
            InputType::Time => "time",
            InputType::Number => "number",
            InputType::Textarea => "textarea",
            InputType::Checkbox => "checkbox",
            InputType::Radio => "radio",
            InputType::Location => "location",
            InputType::Digit => "digit",
            InputType::Merged => "merged",
            InputType::Custom(code) => code,
        }
    }

    pub fn builtin() -> &'static [InputType] {
        &[
            InputType::Text,
            InputType::Select,
            InputType::Date,
            InputType::Time,
            InputType::Number,
            InputType::Textarea,
            InputType::Checkbox,
            InputType::Radio,
            InputType::Location,
            InputType::Digit,
            InputType::Merged,
        ]
    }
}

impl From<String> for InputType {
    fn from(code: String) -> Self {
        match code.as_str() {
            "text" => InputType::Text,
            "select" => InputType::Select,
            "date" => InputType::Date,
            "time" => InputType::Time,
            "number" => InputType::Number,
            "textarea" => InputType::Textarea,
            "checkbox" => InputType::Checkbox,
            "radio" => InputType::Radio,
            "location" => InputType::Location,
            "digit" => InputType::Digit,
            "merged" => InputType::Merged,
            _ => InputType::Custom(code),
        }
    }
}

impl From<InputType> for String {
    fn from(input_type: InputType) -> Self {
        input_type.as_str().to_string()
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Person or role a field belongs to on a civil-registration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Child,
    Mother,
    Father,
    Informant,
    Registrar,
    #[default]
    General,
}

impl Entity {
    /// Fixed display order used when sections are derived from entities.
    pub const ORDER: [Entity; 6] = [
        Entity::Child,
        Entity::Mother,
        Entity::Father,
        Entity::Informant,
        Entity::Registrar,
        Entity::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Entity::Child => "child",
            Entity::Mother => "mother",
            Entity::Father => "father",
            Entity::Informant => "informant",
            Entity::Registrar => "registrar",
            Entity::General => "general",
        }
    }

    /// Thai section heading.
    pub fn label(&self) -> &'static str {
        match self {
            Entity::Child => "ข้อมูลเด็ก",
            Entity::Mother => "ข้อมูลมารดา",
            Entity::Father => "ข้อมูลบิดา",
            Entity::Informant => "ข้อมูลผู้แจ้ง",
            Entity::Registrar => "ข้อมูลนายทะเบียน",
            Entity::General => "ข้อมูลทั่วไป",
        }
    }

    pub fn position(&self) -> usize {
        Entity::ORDER
            .iter()
            .position(|e| e == self)
            .unwrap_or(Entity::ORDER.len() - 1)
    }
}

/// Validation rules attached to a field. Every rule is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// One option of a persisted radio group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioOptionDef {
    pub placeholder: String,
    pub label: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child_fields: Option<Vec<String>>,
}

/// Metadata for a single template placeholder.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Raw token as it appears in the document, e.g. `{{m_prov}}`.
    pub placeholder: String,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default)]
    pub entity: Entity,
    #[serde(default)]
    pub input_type: InputType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Section tag, `name` or `name|colorIndex`, or one of the hidden prefixes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Position of the placeholder in the source document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_merged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merged_fields: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_radio_group: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radio_options: Option<Vec<RadioOptionDef>>,
}

impl FieldDefinition {
    /// True when the field is folded into a merge or radio master and must
    /// not be rendered as a top-level input.
    pub fn is_hidden(&self) -> bool {
        self.group.as_deref().is_some_and(is_hidden_group)
    }

    pub fn is_merged_master(&self) -> bool {
        self.is_merged.unwrap_or(false)
    }

    pub fn is_radio_master(&self) -> bool {
        self.is_radio_group.unwrap_or(false)
    }

    pub fn is_required(&self) -> bool {
        self.validation
            .as_ref()
            .and_then(|v| v.required)
            .unwrap_or(false)
    }

    /// Editor label: description when set, bare key otherwise.
    pub fn display_label(&self) -> String {
        match &self.description {
            Some(description) if !description.trim().is_empty() => description.clone(),
            _ => bare_key(&self.placeholder).to_string(),
        }
    }
}

/// Returns true for group tags that mark a field as subsumed by a master.
pub fn is_hidden_group(tag: &str) -> bool {
    tag.starts_with(MERGED_HIDDEN_PREFIX)
        || tag.starts_with(RADIO_HIDDEN_PREFIX)
        || tag.starts_with(RADIO_CHILD_PREFIX)
}

/// Strips surrounding `{{ }}` and whitespace from a placeholder token.
///
/// `"{{ m_prov }}"` and `"m_prov"` both yield `"m_prov"`.
pub fn bare_key(placeholder: &str) -> &str {
    let trimmed = placeholder.trim();
    let inner = trimmed
        .strip_prefix("{{")
        .and_then(|s| s.strip_suffix("}}"))
        .unwrap_or(trimmed);
    inner.trim()
}

/// Wraps a bare key back into a `{{key}}` token.
pub fn placeholder_token(key: &str) -> String {
    format!("{{{{{}}}}}", bare_key(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bare_key_strips_braces_and_spaces() {
        assert_eq!(bare_key("{{m_prov}}"), "m_prov");
        assert_eq!(bare_key("  {{ name }} "), "name");
        assert_eq!(bare_key("plain"), "plain");
        assert_eq!(placeholder_token("{{x}}"), "{{x}}");
        assert_eq!(placeholder_token("x"), "{{x}}");
    }

    #[test]
    fn custom_codes_survive_json() {
        let json = r#"{"placeholder":"{{a}}","dataType":"blood_type","entity":"mother","inputType":"select"}"#;
        let def: FieldDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.data_type, DataType::Custom("blood_type".into()));
        assert_eq!(def.entity, Entity::Mother);
        assert_eq!(def.input_type, InputType::Select);

        let back = serde_json::to_value(&def).unwrap();
        assert_eq!(back["dataType"], "blood_type");
        assert!(back.get("group").is_none());
    }

    #[test]
    fn hidden_tags_are_recognised() {
        assert!(is_hidden_group("merged_hidden_$1"));
        assert!(is_hidden_group("radio_hidden_g1"));
        assert!(is_hidden_group("radio_child_g1_$2"));
        assert!(!is_hidden_group("ข้อมูลมารดา|2"));
    }

    #[test]
    fn missing_attributes_default() {
        let def: FieldDefinition = serde_json::from_str(r#"{"placeholder":"{{x}}"}"#).unwrap();
        assert_eq!(def.data_type, DataType::Text);
        assert_eq!(def.input_type, InputType::Text);
        assert_eq!(def.entity, Entity::General);
        assert!(!def.is_hidden());
        assert_eq!(def.display_label(), "x");
    }
}
