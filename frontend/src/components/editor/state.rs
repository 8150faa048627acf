//! Runtime state of the field editor.
//!
//! Section edits live in `sections` until they are written back into the
//! definitions. Structural edits (merge, radio) first persist the sections,
//! apply the change, then re-derive the sections so hidden members drop out.

use common::fields::radio::extract_radio_groups;
use common::fields::sections::apply_sections;
use common::fields::{derive_sections, MergeableGroup, RadioGroupConfig, Section};
use common::model::console::DataTypeConfig;
use common::model::field::FieldDefinitions;
use common::model::template::Template;
use yew::NodeRef;

use crate::helpers::{compute_md5, set_window_dirty_flag};

pub struct EditorComponent {
    pub template: Option<Template>,
    pub definitions: FieldDefinitions,
    pub sections: Vec<Section>,
    pub radio_groups: Vec<RadioGroupConfig>,
    /// Codes registered in the console, offered next to the built-in types.
    pub data_types: Vec<DataTypeConfig>,
    pub selected_field: Option<String>,
    /// Either `"fields"` or `"preview"`.
    pub active_tab: String,
    pub preview_html: Option<String>,
    pub preview_loading: bool,
    pub merge_suggestions: Vec<MergeableGroup>,
    pub radio_draft: RadioGroupConfig,
    pub new_section_name: String,
    pub merge_dialog_ref: NodeRef,
    pub radio_dialog_ref: NodeRef,
    pub loading: bool,
    pub load_error: Option<String>,
    pub saving: bool,
    /// MD5 of the serialized definitions at the last load or save.
    pub original_md5: Option<String>,
    pub loaded: bool,
}

impl EditorComponent {
    pub fn new() -> Self {
        Self {
            template: None,
            definitions: FieldDefinitions::new(),
            sections: Vec::new(),
            radio_groups: Vec::new(),
            data_types: Vec::new(),
            selected_field: None,
            active_tab: "fields".to_string(),
            preview_html: None,
            preview_loading: false,
            merge_suggestions: Vec::new(),
            radio_draft: RadioGroupConfig::new(String::new(), String::new()),
            new_section_name: String::new(),
            merge_dialog_ref: NodeRef::default(),
            radio_dialog_ref: NodeRef::default(),
            loading: true,
            load_error: None,
            saving: false,
            original_md5: None,
            loaded: false,
        }
    }

    pub fn install(&mut self, template: Template, definitions: FieldDefinitions) {
        self.sections = derive_sections(&definitions);
        self.radio_groups = extract_radio_groups(&definitions);
        self.definitions = definitions;
        self.template = Some(template);
        self.selected_field = None;
        self.loading = false;
        self.load_error = None;
        self.original_md5 = Some(self.fingerprint());
        set_window_dirty_flag(false);
    }

    /// Definitions as they would be saved right now.
    pub fn persisted_definitions(&self) -> FieldDefinitions {
        let mut definitions = self.definitions.clone();
        apply_sections(&mut definitions, &self.sections);
        definitions
    }

    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(&self.persisted_definitions()).unwrap_or_default();
        compute_md5(&json)
    }

    pub fn is_dirty(&self) -> bool {
        self.original_md5
            .as_ref()
            .is_some_and(|orig| *orig != self.fingerprint())
    }

    pub fn refresh_dirty_flag(&self) {
        set_window_dirty_flag(self.is_dirty());
    }

    /// Runs a structural change against definitions that already carry the
    /// current sections, then re-derives the sections.
    pub fn restructure<R>(&mut self, change: impl FnOnce(&mut FieldDefinitions) -> R) -> R {
        apply_sections(&mut self.definitions, &self.sections);
        let result = change(&mut self.definitions);
        self.sections = derive_sections(&self.definitions);
        result
    }

    /// Visible keys that are not already a merge or radio master.
    pub fn mergeable_keys(&self) -> Vec<String> {
        self.definitions
            .iter()
            .filter(|(_, d)| !d.is_hidden() && !d.is_merged_master() && !d.is_radio_master())
            .map(|(k, _)| k.clone())
            .collect()
    }

    pub fn section_of(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.fields.iter().any(|f| f == key))
    }
}
