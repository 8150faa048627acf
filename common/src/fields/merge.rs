//! Numeric placeholder sequences and the merged fields built from them.
//!
//! Government forms often print one box per digit, so a 13-digit ID number
//! shows up in a template as thirteen placeholders `{{$1}}` … `{{$13}}`.
//! Filling those one by one is painful, so the editor proposes collapsing
//! each run of consecutive keys into a single composite input.
//!
//! Flow:
//! 1. `detect_mergeable_groups` scans all keys and proposes `MergeableGroup`s.
//! 2. The user accepts one; `apply_merge` turns the first key into the master
//!    and tags the rest with `merged_hidden_<master>`.
//! 3. At fill time `split_merged_value` fans the typed value back out.

use crate::errors::ApiError;
use crate::fields::detect::detect_field_type;
use crate::model::field::{
    bare_key, DataType, FieldDefinition, FieldDefinitions, FieldValidation, InputType,
    MERGED_HIDDEN_PREFIX,
};
use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Minimum run length worth proposing.
pub const MIN_MERGE_RUN: usize = 3;

struct SequencePattern {
    name: &'static str,
    prefix: &'static str,
    regex: Regex,
}

/// Evaluated in this order; the first pattern that matches a key claims it.
static SEQUENCE_PATTERNS: LazyLock<Vec<SequencePattern>> = LazyLock::new(|| {
    [
        ("$N", "$", r"(?i)^\$(\d+)$"),
        ("nN", "n", r"(?i)^n(\d+)$"),
        ("4d_N", "4d_", r"(?i)^4d_(\d+)$"),
        ("dN", "d", r"(?i)^d(\d+)$"),
        ("numN", "num", r"(?i)^num(\d+)$"),
        ("digitN", "digit", r"(?i)^digit(\d+)$"),
    ]
    .into_iter()
    .map(|(name, prefix, re)| SequencePattern {
        name,
        prefix,
        regex: Regex::new(re).unwrap(),
    })
    .collect()
});

/// A run of consecutive numbered keys that could become one input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeableGroup {
    pub pattern: String,
    pub prefix: String,
    pub start_num: u32,
    pub end_num: u32,
    pub fields: Vec<String>,
    pub suggested_label: String,
    pub suggested_separator: String,
}

/// Numeric suffix of a key that belongs to one of the sequence patterns.
pub fn sequence_number(key: &str) -> Option<u32> {
    let key = bare_key(key);
    SEQUENCE_PATTERNS.iter().find_map(|p| {
        p.regex
            .captures(key)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
    })
}

fn suggestion(prefix: &str, start: u32, end: u32, len: usize) -> (String, String) {
    match len {
        13 => ("ID Number (13 digits)".to_string(), String::new()),
        10 => ("Phone Number (10 digits)".to_string(), String::new()),
        _ => (format!("{prefix}{start}-{prefix}{end}"), "-".to_string()),
    }
}

/// Proposes merges for every maximal run of at least three consecutive
/// numbers within a pattern.
pub fn detect_mergeable_groups<S: AsRef<str>>(keys: &[S]) -> Vec<MergeableGroup> {
    let mut groups = Vec::new();

    for pattern in SEQUENCE_PATTERNS.iter() {
        let mut matched: Vec<(u32, String)> = keys
            .iter()
            .map(|k| bare_key(k.as_ref()))
            .filter_map(|key| {
                let num = pattern.regex.captures(key)?.get(1)?.as_str().parse().ok()?;
                Some((num, key.to_string()))
            })
            .collect();
        matched.sort_by_key(|(num, _)| *num);
        matched.dedup_by_key(|(num, _)| *num);

        let mut run: Vec<(u32, String)> = Vec::new();
        for entry in matched {
            let continues = run.last().is_some_and(|(last, _)| last + 1 == entry.0);
            if !continues {
                push_run(&mut groups, pattern, std::mem::take(&mut run));
            }
            run.push(entry);
        }
        push_run(&mut groups, pattern, run);
    }

    groups
}

fn push_run(groups: &mut Vec<MergeableGroup>, pattern: &SequencePattern, run: Vec<(u32, String)>) {
    if run.len() < MIN_MERGE_RUN {
        return;
    }
    let start_num = run[0].0;
    let end_num = run[run.len() - 1].0;
    let (suggested_label, suggested_separator) =
        suggestion(pattern.prefix, start_num, end_num, run.len());
    groups.push(MergeableGroup {
        pattern: pattern.name.to_string(),
        prefix: pattern.prefix.to_string(),
        start_num,
        end_num,
        fields: run.into_iter().map(|(_, key)| key).collect(),
        suggested_label,
        suggested_separator,
    });
}

/// Folds `fields` into a single merged input whose master is the first key.
///
/// # Returns
/// The master key, or a validation error when fewer than two fields are given,
/// a key is unknown or repeated, or a key is already part of another merge or
/// radio group.
pub fn apply_merge(
    definitions: &mut FieldDefinitions,
    fields: &[String],
    label: &str,
    separator: &str,
) -> Result<String, ApiError> {
    if fields.len() < 2 {
        return Err(ApiError::Validation(
            "A merged field needs at least two placeholders".to_string(),
        ));
    }
    for (i, key) in fields.iter().enumerate() {
        if fields[..i].contains(key) {
            return Err(ApiError::Validation(format!("{key} is listed twice")));
        }
        match definitions.get(key) {
            None => return Err(ApiError::Validation(format!("Unknown placeholder: {key}"))),
            Some(def) if def.is_hidden() || def.is_merged_master() || def.is_radio_master() => {
                return Err(ApiError::Validation(format!("{key} is already grouped")));
            }
            Some(_) => {}
        }
    }

    let master = fields[0].clone();
    let hidden_tag = format!("{MERGED_HIDDEN_PREFIX}{master}");
    for key in &fields[1..] {
        if let Some(def) = definitions.get_mut(key) {
            def.group = Some(hidden_tag.clone());
        }
    }

    if let Some(def) = definitions.get_mut(&master) {
        def.input_type = InputType::Merged;
        def.is_merged = Some(true);
        def.merged_fields = Some(fields.to_vec());
        def.separator = Some(separator.to_string());
        if !label.trim().is_empty() {
            def.description = Some(label.trim().to_string());
        }
        match fields.len() {
            13 => def.data_type = DataType::IdNumber,
            10 => def.data_type = DataType::Phone,
            _ => {}
        }
        def.validation = Some(FieldValidation {
            max_length: Some(fields.len()),
            required: def.validation.as_ref().and_then(|v| v.required),
            ..Default::default()
        });
    }

    Ok(master)
}

/// Reverts `apply_merge`. Members get their detected defaults back.
///
/// # Returns
/// `false` when `master` is not a merged field.
pub fn unmerge(definitions: &mut FieldDefinitions, master: &str) -> bool {
    let Some(members) = definitions
        .get(master)
        .filter(|d| d.is_merged_master())
        .and_then(|d| d.merged_fields.clone())
    else {
        return false;
    };

    let hidden_tag = format!("{MERGED_HIDDEN_PREFIX}{master}");
    for key in members.iter().filter(|k| k.as_str() != master) {
        if let Some(def) = definitions.get_mut(key) {
            if def.group.as_deref() == Some(hidden_tag.as_str()) {
                def.group = None;
            }
        }
    }

    if let Some(def) = definitions.get_mut(master) {
        let defaults = detect_field_type(master);
        *def = FieldDefinition {
            placeholder: def.placeholder.clone(),
            group: def.group.clone(),
            order: def.order,
            ..defaults
        };
    }
    true
}

/// Distributes a composite value over the members of a merged field, one
/// character per member after removing the separator. Members past the end
/// of the value receive an empty string.
pub fn split_merged_value(definition: &FieldDefinition, value: &str) -> Vec<(String, String)> {
    let Some(members) = &definition.merged_fields else {
        return Vec::new();
    };
    let separator = definition.separator.as_deref().unwrap_or_default();
    let compact: Vec<char> = if separator.is_empty() {
        value.chars().filter(|c| !c.is_whitespace()).collect()
    } else {
        value
            .replace(separator, "")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect()
    };

    members
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let part = compact.get(i).map(|c| c.to_string()).unwrap_or_default();
            (key.clone(), part)
        })
        .collect()
}

/// Rebuilds the composite value of a merged field from the member values,
/// e.g. to show OCR output in the merged input.
pub fn join_merged_value(definition: &FieldDefinition, values: &IndexMap<String, String>) -> String {
    let Some(members) = &definition.merged_fields else {
        return String::new();
    };
    members
        .iter()
        .map(|key| values.get(key).map(String::as_str).unwrap_or_default())
        .collect::<Vec<_>>()
        .concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::detect::generate_field_definitions;
    use pretty_assertions::assert_eq;

    fn keys(prefix: &str, range: std::ops::RangeInclusive<u32>) -> Vec<String> {
        range.map(|n| format!("{prefix}{n}")).collect()
    }

    #[test]
    fn thirteen_dollar_keys_are_an_id_number() {
        let mut all = keys("{{$", 1..=13);
        for k in all.iter_mut() {
            k.push_str("}}");
        }
        let groups = detect_mergeable_groups(&all);
        assert_eq!(groups.len(), 1);
        let g = &groups[0];
        assert_eq!(g.pattern, "$N");
        assert_eq!((g.start_num, g.end_num), (1, 13));
        assert_eq!(g.fields.len(), 13);
        assert_eq!(g.fields[0], "$1");
        assert_eq!(g.suggested_label, "ID Number (13 digits)");
        assert_eq!(g.suggested_separator, "");
    }

    #[test]
    fn runs_split_on_gaps_and_short_runs_are_dropped() {
        let mut all = keys("n", 1..=4);
        all.extend(keys("n", 6..=7));
        all.extend(keys("n", 9..=11));
        let groups = detect_mergeable_groups(&all);
        let spans: Vec<(u32, u32)> = groups.iter().map(|g| (g.start_num, g.end_num)).collect();
        assert_eq!(spans, vec![(1, 4), (9, 11)]);
        assert_eq!(groups[0].suggested_label, "n1-n4");
        assert_eq!(groups[0].suggested_separator, "-");
    }

    #[test]
    fn unsorted_input_and_patterns_in_fixed_order() {
        let all = vec!["d3", "d1", "d2", "4d_2", "4d_1", "4d_3", "phone", "digit1", "digit2"];
        let groups = detect_mergeable_groups(&all);
        let names: Vec<&str> = groups.iter().map(|g| g.pattern.as_str()).collect();
        assert_eq!(names, vec!["4d_N", "dN"]);
        assert_eq!(groups[1].fields, vec!["d1", "d2", "d3"]);
    }

    #[test]
    fn ten_keys_are_a_phone_number() {
        let groups = detect_mergeable_groups(&keys("num", 0..=9));
        assert_eq!(groups[0].suggested_label, "Phone Number (10 digits)");
    }

    #[test]
    fn merge_hides_members_and_unmerge_restores() {
        let fields = keys("$", 1..=13);
        let mut defs = generate_field_definitions(&fields);
        let master = apply_merge(&mut defs, &fields, "เลขประจำตัว", "").unwrap();
        assert_eq!(master, "$1");
        assert_eq!(defs["$1"].input_type, InputType::Merged);
        assert_eq!(defs["$1"].data_type, DataType::IdNumber);
        assert_eq!(defs["$2"].group.as_deref(), Some("merged_hidden_$1"));
        assert!(defs["$13"].is_hidden());

        assert!(apply_merge(&mut defs, &fields[1..3].to_vec(), "", "").is_err());

        assert!(unmerge(&mut defs, "$1"));
        assert!(!defs["$2"].is_hidden());
        assert_eq!(defs["$1"].input_type, InputType::Digit);
        assert_eq!(defs["$1"].is_merged, None);
        assert!(!unmerge(&mut defs, "$1"));
    }

    #[test]
    fn merge_rejects_single_or_unknown_fields() {
        let mut defs = generate_field_definitions(&["a", "b"]);
        assert!(apply_merge(&mut defs, &["a".to_string()], "", "").is_err());
        assert!(apply_merge(&mut defs, &["a".to_string(), "zz".to_string()], "", "").is_err());
    }

    #[test]
    fn merge_rejects_repeated_fields() {
        let mut defs = generate_field_definitions(&["a", "b"]);
        let err = apply_merge(&mut defs, &["a".to_string(), "a".to_string()], "", "");
        assert!(matches!(err, Err(ApiError::Validation(_))));
        let err = apply_merge(
            &mut defs,
            &["a".to_string(), "b".to_string(), "a".to_string()],
            "",
            "",
        );
        assert!(err.is_err());
        assert!(!defs["a"].is_hidden());
        assert!(!defs["a"].is_merged_master());
        assert!(!defs["b"].is_hidden());
    }

    #[test]
    fn split_strips_separator_and_pads() {
        let fields = keys("d", 1..=4);
        let mut defs = generate_field_definitions(&fields);
        apply_merge(&mut defs, &fields, "", "-").unwrap();
        let parts = split_merged_value(&defs["d1"], "1-2-3");
        assert_eq!(
            parts,
            vec![
                ("d1".to_string(), "1".to_string()),
                ("d2".to_string(), "2".to_string()),
                ("d3".to_string(), "3".to_string()),
                ("d4".to_string(), String::new()),
            ]
        );

        let values: IndexMap<String, String> = parts.into_iter().collect();
        assert_eq!(join_merged_value(&defs["d1"], &values), "123");
    }
}
