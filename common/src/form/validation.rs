//! Client-side checks run before anything is sent to the API.

use crate::errors::ApiError;
use crate::fields::merge::join_merged_value;
use crate::fields::radio::radio_group_value;
use crate::form::FormData;
use crate::model::field::{DataType, FieldDefinition, FieldDefinitions, InputType};
use indexmap::IndexMap;
use regex::Regex;
use std::fmt;

/// Why a single field value was rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldIssue {
    Required,
    TooShort(usize),
    TooLong(usize),
    PatternMismatch,
    NotANumber,
    BelowMin(f64),
    AboveMax(f64),
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssue::Required => write!(f, "กรุณากรอกข้อมูล"),
            FieldIssue::TooShort(n) => write!(f, "ต้องมีอย่างน้อย {n} ตัวอักษร"),
            FieldIssue::TooLong(n) => write!(f, "ต้องไม่เกิน {n} ตัวอักษร"),
            FieldIssue::PatternMismatch => write!(f, "รูปแบบข้อมูลไม่ถูกต้อง"),
            FieldIssue::NotANumber => write!(f, "ต้องเป็นตัวเลข"),
            FieldIssue::BelowMin(min) => write!(f, "ต้องไม่น้อยกว่า {min}"),
            FieldIssue::AboveMax(max) => write!(f, "ต้องไม่มากกว่า {max}"),
        }
    }
}

fn is_numeric(definition: &FieldDefinition) -> bool {
    matches!(definition.input_type, InputType::Number)
        || (matches!(definition.data_type, DataType::Number | DataType::Age)
            && definition.input_type != InputType::Digit)
}

/// Checks one value against a definition's rules.
pub fn validate_value(definition: &FieldDefinition, value: &str) -> Option<FieldIssue> {
    let value = value.trim();
    if value.is_empty() {
        return definition.is_required().then_some(FieldIssue::Required);
    }
    // A ticked radio group only carries the check mark.
    if definition.is_radio_master() {
        return None;
    }
    let rules = definition.validation.clone().unwrap_or_default();

    let length = value.chars().count();
    if let Some(min) = rules.min_length {
        if length < min {
            return Some(FieldIssue::TooShort(min));
        }
    }
    if let Some(max) = rules.max_length {
        if length > max {
            return Some(FieldIssue::TooLong(max));
        }
    }
    if let Some(pattern) = rules.pattern.as_deref().filter(|p| !p.is_empty()) {
        // An invalid pattern configured in the console must not block the form.
        if let Ok(re) = Regex::new(pattern) {
            if !re.is_match(value) {
                return Some(FieldIssue::PatternMismatch);
            }
        }
    }
    if is_numeric(definition) || rules.min.is_some() || rules.max.is_some() {
        let Ok(number) = value.parse::<f64>() else {
            return Some(FieldIssue::NotANumber);
        };
        if let Some(min) = rules.min.filter(|min| number < *min) {
            return Some(FieldIssue::BelowMin(min));
        }
        if let Some(max) = rules.max.filter(|max| number > *max) {
            return Some(FieldIssue::AboveMax(max));
        }
    }
    None
}

/// Validates every visible field of a form.
///
/// Merged fields are checked on the joined value of their members and radio
/// groups on whether any option is ticked. Hidden members are not checked on
/// their own.
pub fn validate_form(definitions: &FieldDefinitions, data: &FormData) -> IndexMap<String, FieldIssue> {
    definitions
        .iter()
        .filter(|(_, def)| !def.is_hidden())
        .filter_map(|(key, def)| {
            let value = if def.is_merged_master() {
                join_merged_value(def, data.values())
            } else if def.is_radio_master() {
                radio_group_value(def, data.values())
            } else {
                data.get(key).to_string()
            };
            validate_value(def, &value).map(|issue| (key.clone(), issue))
        })
        .collect()
}

/// Parses the amount typed in the quota dialog.
pub fn parse_quota_amount(input: &str) -> Result<i64, ApiError> {
    match input.trim().parse::<i64>() {
        Ok(amount) if amount > 0 => Ok(amount),
        Ok(_) => Err(ApiError::Validation("Quota amount must be greater than zero".to_string())),
        Err(_) => Err(ApiError::Validation("Quota amount must be a whole number".to_string())),
    }
}

/// Only Word documents can become templates.
pub fn validate_template_file(file_name: &str) -> Result<(), ApiError> {
    if file_name.to_lowercase().ends_with(".docx") {
        Ok(())
    } else {
        Err(ApiError::Validation(format!(
            "{file_name} is not a .docx file"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::detect::generate_field_definitions;
    use crate::fields::merge::{apply_merge, split_merged_value};
    use crate::fields::radio::{apply_radio_groups, radio_selection_values, RadioGroupConfig};
    use crate::model::field::FieldValidation;
    use pretty_assertions::assert_eq;

    #[test]
    fn required_and_length_rules() {
        let mut defs = generate_field_definitions(&["m_id", "note"]);
        defs["note"].validation = Some(FieldValidation {
            required: Some(true),
            ..Default::default()
        });
        let mut data = FormData::initialize(&["m_id", "note"]);
        data.set_field("m_id", "12345");

        let issues = validate_form(&defs, &data);
        assert_eq!(issues["m_id"], FieldIssue::TooShort(13));
        assert_eq!(issues["note"], FieldIssue::Required);

        data.set_field("m_id", "1234567890123");
        data.set_field("note", "ok");
        assert!(validate_form(&defs, &data).is_empty());
    }

    #[test]
    fn pattern_and_numbers() {
        let defs = generate_field_definitions(&["m_id", "m_age"]);
        assert_eq!(validate_value(&defs["m_id"], "12345678901ab"), Some(FieldIssue::PatternMismatch));
        assert_eq!(validate_value(&defs["m_age"], "abc"), Some(FieldIssue::NotANumber));
        assert_eq!(validate_value(&defs["m_age"], "200"), Some(FieldIssue::AboveMax(150.0)));
        assert_eq!(validate_value(&defs["m_age"], "32"), None);
    }

    #[test]
    fn merged_fields_validate_the_joined_value() {
        let keys: Vec<String> = (1..=13).map(|n| format!("${n}")).collect();
        let mut defs = generate_field_definitions(&keys);
        apply_merge(&mut defs, &keys, "ID", "").unwrap();
        let mut data = FormData::initialize(&keys);
        for (key, value) in split_merged_value(&defs["$1"], "1234567890123") {
            data.set_field(&key, value);
        }
        assert!(validate_form(&defs, &data).is_empty());
    }

    #[test]
    fn required_radio_group_accepts_any_ticked_option() {
        let mut defs = generate_field_definitions(&["$20", "$21"]);
        let mut group = RadioGroupConfig::new("g1", "สถานภาพ");
        group.add_option("$20", "โสด");
        group.add_option("$21", "สมรส");
        apply_radio_groups(&mut defs, &[group]);
        defs["$20"].validation = Some(FieldValidation {
            required: Some(true),
            ..Default::default()
        });

        let mut data = FormData::initialize(&["$20", "$21"]);
        let issues = validate_form(&defs, &data);
        assert_eq!(issues.get("$20"), Some(&FieldIssue::Required));

        let options = defs["$20"].radio_options.clone().unwrap();
        for (key, value) in radio_selection_values(&options, "$21") {
            data.set_field(&key, value);
        }
        assert_eq!(data.get("$20"), "");
        assert!(validate_form(&defs, &data).is_empty());
    }

    #[test]
    fn quota_and_file_checks() {
        assert_eq!(parse_quota_amount(" 25 "), Ok(25));
        assert!(parse_quota_amount("0").is_err());
        assert!(parse_quota_amount("ten").is_err());
        assert!(validate_template_file("Birth.DOCX").is_ok());
        assert!(validate_template_file("birth.pdf").is_err());
    }
}
