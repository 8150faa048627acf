//! Runtime state of the form-fill page.
//!
//! `form` is the single source of truth for values. `merged_inputs` and
//! `radio_selection` only remember what the composite widgets display and
//! are rebuilt from `form` whenever values arrive from elsewhere (OCR).

use common::fields::merge::join_merged_value;
use common::fields::radio::{radio_group_value, CHECK_MARK};
use common::fields::{derive_sections, Section};
use common::form::validation::{validate_form, validate_value, FieldIssue};
use common::form::FormData;
use common::model::field::FieldDefinitions;
use common::model::template::{ProcessResult, Template};
use indexmap::IndexMap;
use yew::NodeRef;

pub struct FillComponent {
    pub template: Option<Template>,
    pub definitions: FieldDefinitions,
    pub sections: Vec<Section>,
    pub form: FormData,
    pub merged_inputs: IndexMap<String, String>,
    /// Radio master key → selected option placeholder.
    pub radio_selection: IndexMap<String, String>,
    pub issues: IndexMap<String, FieldIssue>,
    /// Issues are only shown after the first submit attempt.
    pub submitted: bool,
    pub loading: bool,
    pub load_error: Option<String>,
    pub processing: bool,
    pub ocr_loading: bool,
    pub result: Option<ProcessResult>,
    pub ocr_input_ref: NodeRef,
    pub loaded: bool,
}

impl FillComponent {
    pub fn new() -> Self {
        Self {
            template: None,
            definitions: FieldDefinitions::new(),
            sections: Vec::new(),
            form: FormData::new(),
            merged_inputs: IndexMap::new(),
            radio_selection: IndexMap::new(),
            issues: IndexMap::new(),
            submitted: false,
            loading: true,
            load_error: None,
            processing: false,
            ocr_loading: false,
            result: None,
            ocr_input_ref: NodeRef::default(),
            loaded: false,
        }
    }

    pub fn install(&mut self, template: Template, definitions: FieldDefinitions) {
        self.form = FormData::initialize(&template.placeholders);
        self.sections = derive_sections(&definitions);
        self.definitions = definitions;
        self.template = Some(template);
        self.issues.clear();
        self.submitted = false;
        self.result = None;
        self.loading = false;
        self.load_error = None;
        self.sync_composite_inputs();
    }

    /// Rebuilds what merged and radio widgets show from the form values.
    pub fn sync_composite_inputs(&mut self) {
        self.merged_inputs.clear();
        self.radio_selection.clear();
        for (key, def) in &self.definitions {
            if def.is_merged_master() {
                let joined = join_merged_value(def, self.form.values());
                self.merged_inputs.insert(key.clone(), joined);
            }
            if def.is_radio_master() {
                let selected = def
                    .radio_options
                    .iter()
                    .flatten()
                    .find(|o| self.form.get(&o.placeholder) == CHECK_MARK);
                if let Some(option) = selected {
                    self.radio_selection
                        .insert(key.clone(), option.placeholder.clone());
                }
            }
        }
    }

    /// Re-checks one rendered field after an edit, once issues are visible.
    pub fn revalidate(&mut self, key: &str) {
        if !self.submitted {
            return;
        }
        let Some(def) = self.definitions.get(key) else {
            return;
        };
        let value = if def.is_merged_master() {
            join_merged_value(def, self.form.values())
        } else if def.is_radio_master() {
            radio_group_value(def, self.form.values())
        } else {
            self.form.get(key).to_string()
        };
        match validate_value(def, &value) {
            Some(issue) => {
                self.issues.insert(key.to_string(), issue);
            }
            None => {
                self.issues.shift_remove(key);
            }
        }
    }

    pub fn validate_all(&mut self) -> usize {
        self.issues = validate_form(&self.definitions, &self.form);
        self.submitted = true;
        self.issues.len()
    }
}
