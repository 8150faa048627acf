//! Radio groups composed by hand from checkbox-like placeholders.
//!
//! Printed forms mark a choice by ticking one of several boxes, each of which
//! is its own placeholder (`{{$20}}` "single", `{{$21}}` "married", ...). In
//! the editor the user picks such boxes and fuses them into one radio
//! control. The first option becomes the master field that carries the whole
//! group; the remaining options are tagged `radio_hidden_<groupId>` so section
//! rendering skips them. Detail boxes belonging to an option (`$21_D`,
//! `$21_M`, ...) can be attached as children and are tagged
//! `radio_child_<groupId>_<option>`; they only show while that option is
//! selected.

use crate::fields::detect::detect_field_type;
use crate::model::field::{
    bare_key, DataType, FieldDefinition, FieldDefinitions, InputType, RadioOptionDef,
    RADIO_CHILD_PREFIX, RADIO_HIDDEN_PREFIX,
};
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Value written into the chosen option's placeholder.
pub const CHECK_MARK: &str = "✓";

static DOLLAR_KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\$\d+$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioOption {
    pub placeholder: String,
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub child_fields: Vec<String>,
}

/// Editor-side description of one radio group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadioGroupConfig {
    pub id: String,
    pub label: String,
    pub master_placeholder: String,
    pub options: Vec<RadioOption>,
}

impl RadioGroupConfig {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            master_placeholder: String::new(),
            options: Vec::new(),
        }
    }

    /// Appends an option; the first option added becomes the master.
    pub fn add_option(&mut self, placeholder: &str, label: &str) {
        if self.options.iter().any(|o| o.placeholder == placeholder) {
            return;
        }
        if self.options.is_empty() {
            self.master_placeholder = placeholder.to_string();
        }
        self.options.push(RadioOption {
            placeholder: placeholder.to_string(),
            label: label.to_string(),
            value: placeholder.to_string(),
            child_fields: Vec::new(),
        });
    }

    /// Removes an option and promotes the next one to master if needed.
    pub fn remove_option(&mut self, placeholder: &str) {
        self.options.retain(|o| o.placeholder != placeholder);
        self.master_placeholder = self
            .options
            .first()
            .map(|o| o.placeholder.clone())
            .unwrap_or_default();
    }

    /// Every placeholder this group claims: options and their children.
    pub fn claimed(&self) -> impl Iterator<Item = &String> {
        self.options
            .iter()
            .flat_map(|o| std::iter::once(&o.placeholder).chain(o.child_fields.iter()))
    }

    fn child_tag(&self, option: &str) -> String {
        format!("{RADIO_CHILD_PREFIX}{}_{option}", self.id)
    }
}

fn is_checkbox_like(key: &str, definitions: &FieldDefinitions) -> bool {
    definitions.get(key).is_some_and(|def| {
        !def.is_hidden()
            && !def.is_merged_master()
            && (def.input_type == InputType::Checkbox
                || def.data_type == DataType::Checkbox
                || DOLLAR_KEY_RE.is_match(key))
    })
}

/// Fields that may still be added to a radio group, in document order.
///
/// Fields already claimed by one of `groups` are left out.
pub fn available_radio_fields(
    definitions: &FieldDefinitions,
    groups: &[RadioGroupConfig],
) -> Vec<String> {
    let claimed: HashSet<&String> = groups.iter().flat_map(|g| g.claimed()).collect();
    let mut keys: Vec<(i64, usize, &String)> = definitions
        .iter()
        .enumerate()
        .filter(|(_, (key, _))| !claimed.contains(key))
        .filter(|(_, (key, def))| is_checkbox_like(key, definitions) && !def.is_radio_master())
        .map(|(pos, (key, def))| (def.order.unwrap_or(i64::MAX), pos, key))
        .collect();
    keys.sort();
    keys.into_iter().map(|(_, _, key)| key.clone()).collect()
}

/// Detail fields of a `$N` option: every key of the form `$N_<suffix>`.
pub fn detect_child_fields<S: AsRef<str>>(key: &str, keys: &[S]) -> Vec<String> {
    if !DOLLAR_KEY_RE.is_match(key) {
        return Vec::new();
    }
    let prefix = format!("{key}_");
    keys.iter()
        .map(|k| k.as_ref())
        .filter(|k| k.len() > prefix.len() && k.starts_with(&prefix))
        .map(str::to_string)
        .collect()
}

fn clear_radio_state(definitions: &mut FieldDefinitions) {
    for (key, def) in definitions.iter_mut() {
        if def.is_radio_master() {
            let defaults = detect_field_type(key);
            def.is_radio_group = None;
            def.radio_options = None;
            def.input_type = defaults.input_type;
            def.data_type = defaults.data_type;
        }
        let tagged = def.group.as_deref().is_some_and(|g| {
            g.starts_with(RADIO_HIDDEN_PREFIX) || g.starts_with(RADIO_CHILD_PREFIX)
        });
        if tagged {
            def.group = None;
        }
    }
}

/// Writes `groups` into the definitions, replacing any radio state saved
/// before. Groups with fewer than two options, or whose options are not all
/// known keys, are skipped without error.
///
/// # Returns
/// The number of groups that were persisted.
pub fn apply_radio_groups(definitions: &mut FieldDefinitions, groups: &[RadioGroupConfig]) -> usize {
    clear_radio_state(definitions);

    let mut applied = 0;
    for group in groups {
        if group.options.len() < 2
            || group
                .options
                .iter()
                .any(|o| !definitions.contains_key(&o.placeholder))
        {
            continue;
        }

        let master = group.options[0].placeholder.clone();
        let hidden_tag = format!("{RADIO_HIDDEN_PREFIX}{}", group.id);

        for option in &group.options {
            if option.placeholder != master {
                if let Some(def) = definitions.get_mut(&option.placeholder) {
                    def.group = Some(hidden_tag.clone());
                }
            }
            let child_tag = group.child_tag(&option.placeholder);
            for child in &option.child_fields {
                if let Some(def) = definitions.get_mut(child) {
                    def.group = Some(child_tag.clone());
                }
            }
        }

        if let Some(def) = definitions.get_mut(&master) {
            def.input_type = InputType::Radio;
            def.is_radio_group = Some(true);
            if !group.label.trim().is_empty() {
                def.description = Some(group.label.trim().to_string());
            }
            def.radio_options = Some(
                group
                    .options
                    .iter()
                    .map(|o| RadioOptionDef {
                        placeholder: o.placeholder.clone(),
                        label: o.label.clone(),
                        value: o.value.clone(),
                        child_fields: (!o.child_fields.is_empty()).then(|| o.child_fields.clone()),
                    })
                    .collect(),
            );
        }
        applied += 1;
    }
    applied
}

/// Rebuilds the editor configuration from persisted definitions.
pub fn extract_radio_groups(definitions: &FieldDefinitions) -> Vec<RadioGroupConfig> {
    definitions
        .iter()
        .filter(|(_, def)| def.is_radio_master())
        .filter_map(|(master, def)| {
            let options = def.radio_options.as_ref()?;
            let id = options
                .iter()
                .filter(|o| &o.placeholder != master)
                .find_map(|o| {
                    definitions
                        .get(&o.placeholder)?
                        .group
                        .as_deref()?
                        .strip_prefix(RADIO_HIDDEN_PREFIX)
                        .map(str::to_string)
                })
                .unwrap_or_else(|| format!("radio_{master}"));

            Some(RadioGroupConfig {
                id,
                label: def.description.clone().unwrap_or_default(),
                master_placeholder: master.clone(),
                options: options
                    .iter()
                    .map(|o| RadioOption {
                        placeholder: o.placeholder.clone(),
                        label: o.label.clone(),
                        value: o.value.clone(),
                        child_fields: o.child_fields.clone().unwrap_or_default(),
                    })
                    .collect(),
            })
        })
        .collect()
}

/// Group id of a radio master, as persisted on its hidden options.
pub fn radio_group_id(definitions: &FieldDefinitions, master: &str) -> Option<String> {
    extract_radio_groups(definitions)
        .into_iter()
        .find(|g| g.master_placeholder == master)
        .map(|g| g.id)
}

/// Child fields to render while `option` of group `group_id` is selected.
pub fn visible_children(definitions: &FieldDefinitions, group_id: &str, option: &str) -> Vec<String> {
    let tag = format!("{RADIO_CHILD_PREFIX}{group_id}_{option}");
    definitions
        .iter()
        .filter(|(_, def)| def.group.as_deref() == Some(tag.as_str()))
        .map(|(key, _)| key.clone())
        .collect()
}

/// Form values for selecting `selected` (an option placeholder): the chosen
/// box gets a check mark, every other option is cleared.
pub fn radio_selection_values(options: &[RadioOptionDef], selected: &str) -> Vec<(String, String)> {
    options
        .iter()
        .map(|o| {
            let value = if o.placeholder == selected {
                CHECK_MARK.to_string()
            } else {
                String::new()
            };
            (o.placeholder.clone(), value)
        })
        .collect()
}

/// Value a radio master stands for when validating: a check mark as soon as
/// any of its options is ticked, empty otherwise.
pub fn radio_group_value(definition: &FieldDefinition, values: &IndexMap<String, String>) -> String {
    let ticked = definition.radio_options.iter().flatten().any(|o| {
        values
            .get(bare_key(&o.placeholder))
            .is_some_and(|v| !v.trim().is_empty())
    });
    if ticked {
        CHECK_MARK.to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::detect::generate_field_definitions;
    use pretty_assertions::assert_eq;

    fn sample() -> FieldDefinitions {
        generate_field_definitions(&[
            "{{$20}}", "{{$21}}", "{{$21_D}}", "{{$21_M}}", "{{$22}}", "{{m_name}}",
        ])
    }

    fn marital_group() -> RadioGroupConfig {
        let mut group = RadioGroupConfig::new("g1", "สถานภาพ");
        group.add_option("$20", "โสด");
        group.add_option("$21", "สมรส");
        group.options[1].child_fields = vec!["$21_D".into(), "$21_M".into()];
        group
    }

    #[test]
    fn available_fields_exclude_claimed_and_non_checkbox() {
        let defs = sample();
        let group = marital_group();
        assert_eq!(available_radio_fields(&defs, &[]), vec!["$20", "$21", "$22"]);
        assert_eq!(available_radio_fields(&defs, &[group]), vec!["$22"]);
    }

    #[test]
    fn child_fields_follow_naming_convention() {
        let defs = sample();
        let keys: Vec<&String> = defs.keys().collect();
        let keys: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
        assert_eq!(detect_child_fields("$21", &keys), vec!["$21_D", "$21_M"]);
        assert!(detect_child_fields("$20", &keys).is_empty());
        assert!(detect_child_fields("m_name", &keys).is_empty());
    }

    #[test]
    fn apply_tags_master_hidden_and_children() {
        let mut defs = sample();
        assert_eq!(apply_radio_groups(&mut defs, &[marital_group()]), 1);

        let master = &defs["$20"];
        assert_eq!(master.input_type, InputType::Radio);
        assert_eq!(master.is_radio_group, Some(true));
        assert_eq!(master.description.as_deref(), Some("สถานภาพ"));
        assert_eq!(master.radio_options.as_ref().unwrap().len(), 2);
        assert!(!master.is_hidden());

        assert_eq!(defs["$21"].group.as_deref(), Some("radio_hidden_g1"));
        assert_eq!(defs["$21_D"].group.as_deref(), Some("radio_child_g1_$21"));
        assert_eq!(visible_children(&defs, "g1", "$21"), vec!["$21_D", "$21_M"]);
        assert!(visible_children(&defs, "g1", "$20").is_empty());
    }

    #[test]
    fn single_option_groups_are_skipped() {
        let mut defs = sample();
        let mut lonely = RadioGroupConfig::new("g2", "x");
        lonely.add_option("$22", "only");
        assert_eq!(apply_radio_groups(&mut defs, &[lonely]), 0);
        assert_eq!(defs["$22"].is_radio_group, None);
        assert_eq!(defs["$22"].group, None);
    }

    #[test]
    fn extract_round_trips_and_reapply_clears_old_state() {
        let mut defs = sample();
        apply_radio_groups(&mut defs, &[marital_group()]);
        let extracted = extract_radio_groups(&defs);
        assert_eq!(extracted, vec![marital_group()]);
        assert_eq!(radio_group_id(&defs, "$20").as_deref(), Some("g1"));

        apply_radio_groups(&mut defs, &[]);
        assert_eq!(defs["$20"].is_radio_group, None);
        assert_eq!(defs["$20"].input_type, InputType::Digit);
        assert_eq!(defs["$21"].group, None);
        assert_eq!(defs["$21_D"].group, None);
    }

    #[test]
    fn removing_master_promotes_next_option() {
        let mut group = marital_group();
        group.remove_option("$20");
        assert_eq!(group.master_placeholder, "$21");
    }

    #[test]
    fn selection_marks_one_option() {
        let mut defs = sample();
        apply_radio_groups(&mut defs, &[marital_group()]);
        let options = defs["$20"].radio_options.clone().unwrap();
        assert_eq!(
            radio_selection_values(&options, "$21"),
            vec![("$20".to_string(), String::new()), ("$21".to_string(), "✓".to_string())]
        );
    }
}
