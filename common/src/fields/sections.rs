//! Sections: the named clusters of fields the editor and fill form render
//! together.
//!
//! Sections are never stored on their own. They are derived from the
//! `group`, `order` and `entity` attributes of the field definitions every
//! time the definitions change, and written back into those attributes when
//! the editor saves.
//!
//! Two derivations exist:
//! - saved groups, when at least one visible field carries a real `group`
//!   tag (`name` or `name|colorIndex`);
//! - entity fallback otherwise, one section per entity in a fixed order.
//!
//! In both cases a section's position follows document reading order: it is
//! placed by the smallest `order` among its members, ties going to the
//! section whose first member comes first in the original key order.

use crate::model::field::{is_hidden_group, Entity, FieldDefinition, FieldDefinitions};
use serde::{Deserialize, Serialize};

/// Tag the API uses for "no group chosen".
pub const DEFAULT_GROUP: &str = "default";

/// Heading of the bucket collecting fields without a group.
pub const UNGROUPED_LABEL: &str = "ทั่วไป";

/// Number of colours the editor palette cycles through.
pub const SECTION_COLORS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub fields: Vec<String>,
    pub color_index: usize,
}

/// Splits a `name|colorIndex` tag. A missing or unparsable colour is 0.
pub fn parse_group_tag(tag: &str) -> (String, usize) {
    match tag.rsplit_once('|') {
        Some((name, color)) => (name.trim().to_string(), color.trim().parse().unwrap_or(0)),
        None => (tag.trim().to_string(), 0),
    }
}

pub fn format_group_tag(name: &str, color_index: usize) -> String {
    format!("{}|{}", name.trim(), color_index)
}

fn saved_group(def: &FieldDefinition) -> Option<&str> {
    def.group
        .as_deref()
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != DEFAULT_GROUP && !is_hidden_group(g))
}

fn visible(definitions: &FieldDefinitions) -> impl Iterator<Item = (usize, &String, &FieldDefinition)> {
    definitions
        .iter()
        .enumerate()
        .filter(|(_, (_, def))| !def.is_hidden())
        .map(|(pos, (key, def))| (pos, key, def))
}

/// Members collected for one section before sorting.
struct Bucket {
    name: String,
    color_index: usize,
    members: Vec<(i64, usize, String)>,
}

impl Bucket {
    fn new(name: String, color_index: usize) -> Self {
        Self {
            name,
            color_index,
            members: Vec::new(),
        }
    }

    /// (min order, first position) used to place the bucket.
    fn rank(&self) -> (i64, usize) {
        let min_order = self.members.iter().map(|m| m.0).min().unwrap_or(i64::MAX);
        let first_pos = self.members.iter().map(|m| m.1).min().unwrap_or(usize::MAX);
        (min_order, first_pos)
    }

    fn into_fields(mut self) -> Vec<String> {
        self.members.sort();
        self.members.into_iter().map(|(_, _, key)| key).collect()
    }
}

/// Derives sections, choosing saved groups when any exist.
pub fn derive_sections(definitions: &FieldDefinitions) -> Vec<Section> {
    let has_saved = visible(definitions).any(|(_, _, def)| saved_group(def).is_some());
    if has_saved {
        group_fields_by_saved_group(definitions)
    } else {
        group_fields_by_entity(definitions)
    }
}

/// Buckets visible fields by their saved `group` tag.
///
/// Fields without a tag go to the `ทั่วไป` bucket. A bucket keeps the colour
/// of the first tag seen for its name.
pub fn group_fields_by_saved_group(definitions: &FieldDefinitions) -> Vec<Section> {
    let mut buckets: Vec<Bucket> = Vec::new();

    for (pos, key, def) in visible(definitions) {
        let (name, color_index) = match saved_group(def) {
            Some(tag) => parse_group_tag(tag),
            None => (UNGROUPED_LABEL.to_string(), 0),
        };
        let index = match buckets.iter().position(|b| b.name == name) {
            Some(index) => index,
            None => {
                buckets.push(Bucket::new(name, color_index));
                buckets.len() - 1
            }
        };
        buckets[index]
            .members
            .push((def.order.unwrap_or(i64::MAX), pos, key.clone()));
    }

    buckets.sort_by_key(Bucket::rank);
    buckets
        .into_iter()
        .filter(|b| !b.members.is_empty())
        .enumerate()
        .map(|(i, bucket)| Section {
            id: format!("section-{i}"),
            name: bucket.name.clone(),
            color_index: bucket.color_index,
            fields: bucket.into_fields(),
        })
        .collect()
}

/// One section per entity, in the fixed entity order.
pub fn group_fields_by_entity(definitions: &FieldDefinitions) -> Vec<Section> {
    let mut buckets: Vec<Bucket> = Entity::ORDER
        .iter()
        .map(|e| Bucket::new(e.label().to_string(), e.position()))
        .collect();

    for (pos, key, def) in visible(definitions) {
        buckets[def.entity.position()]
            .members
            .push((def.order.unwrap_or(i64::MAX), pos, key.clone()));
    }

    Entity::ORDER
        .iter()
        .zip(buckets)
        .filter(|(_, b)| !b.members.is_empty())
        .map(|(entity, bucket)| Section {
            id: entity.as_str().to_string(),
            name: bucket.name.clone(),
            color_index: bucket.color_index,
            fields: bucket.into_fields(),
        })
        .collect()
}

/// Persists sections into the definitions: each listed field gets
/// `group = "name|colorIndex"` and a dense `order` following section order
/// then member order. Visible fields missing from every section are placed
/// after them with their group cleared. Hidden fields are left alone.
pub fn apply_sections(definitions: &mut FieldDefinitions, sections: &[Section]) {
    let mut next_order = 0i64;
    let mut placed = std::collections::HashSet::new();

    for section in sections {
        let tag = format_group_tag(&section.name, section.color_index);
        for key in &section.fields {
            if let Some(def) = definitions.get_mut(key) {
                if def.is_hidden() || !placed.insert(key.clone()) {
                    continue;
                }
                def.group = Some(tag.clone());
                def.order = Some(next_order);
                next_order += 1;
            }
        }
    }

    let mut rest: Vec<(i64, usize, String)> = visible(definitions)
        .filter(|(_, key, _)| !placed.contains(*key))
        .map(|(pos, key, def)| (def.order.unwrap_or(i64::MAX), pos, key.clone()))
        .collect();
    rest.sort();
    for (_, _, key) in rest {
        if let Some(def) = definitions.get_mut(&key) {
            def.group = None;
            def.order = Some(next_order);
            next_order += 1;
        }
    }
}

/// Moves `key` to the end of the section `target_id`, removing it from
/// wherever it was. Unknown targets leave the sections unchanged.
pub fn move_field_to_section(sections: &mut [Section], key: &str, target_id: &str) {
    if !sections.iter().any(|s| s.id == target_id) {
        return;
    }
    for section in sections.iter_mut() {
        section.fields.retain(|f| f != key);
    }
    if let Some(target) = sections.iter_mut().find(|s| s.id == target_id) {
        target.fields.push(key.to_string());
    }
}

/// Colour for a newly created section: the least used palette slot.
pub fn next_color_index(sections: &[Section]) -> usize {
    (0..SECTION_COLORS)
        .min_by_key(|c| sections.iter().filter(|s| s.color_index == *c).count())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::detect::generate_field_definitions;
    use pretty_assertions::assert_eq;

    fn names(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn group_tag_parsing() {
        assert_eq!(parse_group_tag("ข้อมูลมารดา|3"), ("ข้อมูลมารดา".to_string(), 3));
        assert_eq!(parse_group_tag("Mother"), ("Mother".to_string(), 0));
        assert_eq!(parse_group_tag("Mother|blue"), ("Mother".to_string(), 0));
        assert_eq!(format_group_tag("Mother", 2), "Mother|2");
    }

    #[test]
    fn entity_fallback_uses_fixed_order_and_skips_empty() {
        let defs = generate_field_definitions(&["doc_no", "f_name", "m_name", "name"]);
        let sections = derive_sections(&defs);
        assert_eq!(names(&sections), vec!["ข้อมูลเด็ก", "ข้อมูลมารดา", "ข้อมูลบิดา", "ข้อมูลทั่วไป"]);
        assert_eq!(sections[0].id, "child");
        assert_eq!(sections[2].color_index, 2);
        assert_eq!(sections[3].fields, vec!["doc_no"]);
    }

    #[test]
    fn saved_groups_follow_minimum_order() {
        let mut defs = generate_field_definitions(&["a", "b", "c", "d"]);
        defs["a"].group = Some("Second|1".into());
        defs["a"].order = Some(5);
        defs["b"].group = Some("First|4".into());
        defs["b"].order = Some(9);
        defs["c"].group = Some("First|7".into());
        defs["c"].order = Some(1);
        defs["d"].group = Some("default".into());
        defs["d"].order = Some(7);

        let sections = derive_sections(&defs);
        assert_eq!(names(&sections), vec!["First", "Second", UNGROUPED_LABEL]);
        assert_eq!(sections[0].fields, vec!["c", "b"]);
        assert_eq!(sections[0].color_index, 4);
        assert_eq!(sections[2].fields, vec!["d"]);
    }

    #[test]
    fn ties_fall_back_to_key_order() {
        let mut defs = generate_field_definitions(&["x", "y"]);
        for def in defs.values_mut() {
            def.order = None;
        }
        defs["y"].group = Some("Y".into());
        defs["x"].group = Some("X".into());
        assert_eq!(names(&derive_sections(&defs)), vec!["X", "Y"]);
    }

    #[test]
    fn hidden_fields_are_not_rendered() {
        let mut defs = generate_field_definitions(&["$1", "$2", "$3"]);
        defs["$2"].group = Some("merged_hidden_$1".into());
        defs["$3"].group = Some("radio_child_g_$1".into());
        let sections = derive_sections(&defs);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].fields, vec!["$1"]);
    }

    #[test]
    fn apply_then_derive_is_stable() {
        let mut defs = generate_field_definitions(&["a", "b", "c", "$9"]);
        defs["$9"].group = Some("merged_hidden_x".into());
        let sections = vec![
            Section {
                id: "s1".into(),
                name: "Later".into(),
                fields: vec!["c".into()],
                color_index: 2,
            },
            Section {
                id: "s2".into(),
                name: "Earlier".into(),
                fields: vec!["a".into()],
                color_index: 5,
            },
        ];
        apply_sections(&mut defs, &sections);
        assert_eq!(defs["c"].order, Some(0));
        assert_eq!(defs["a"].group.as_deref(), Some("Earlier|5"));
        assert_eq!(defs["b"].group, None);
        assert_eq!(defs["b"].order, Some(2));
        assert_eq!(defs["$9"].group.as_deref(), Some("merged_hidden_x"));

        let derived = derive_sections(&defs);
        assert_eq!(names(&derived), vec!["Later", "Earlier", UNGROUPED_LABEL]);
    }

    #[test]
    fn moving_fields_between_sections() {
        let defs = generate_field_definitions(&["m_name", "f_name"]);
        let mut sections = derive_sections(&defs);
        move_field_to_section(&mut sections, "m_name", "father");
        assert_eq!(sections[0].fields, Vec::<String>::new());
        assert_eq!(sections[1].fields, vec!["f_name", "m_name"]);
        move_field_to_section(&mut sections, "f_name", "nowhere");
        assert_eq!(sections[1].fields.len(), 2);
        assert_eq!(next_color_index(&sections), 0);
    }
}
