//! Field-definition derivation pipeline.
//!
//! raw placeholders → `detect` (data type, input type, entity) →
//! `sections` (ordered clusters) → optional `merge` / `radio` composition.

pub mod detect;
pub mod merge;
pub mod radio;
pub mod sections;

pub use detect::{complete_field_definitions, detect_entity, detect_field_type, generate_field_definitions};
pub use merge::{detect_mergeable_groups, MergeableGroup};
pub use radio::{RadioGroupConfig, RadioOption};
pub use sections::{derive_sections, Section};
