//! Update function for the field editor.
//!
//! Every edit re-fingerprints the definitions so the save button and
//! `window.app_dirty` reflect unsaved work.

use common::errors::handle_api_error;
use common::fields::detect_mergeable_groups;
use common::fields::merge::{apply_merge, unmerge};
use common::fields::radio::{apply_radio_groups, detect_child_fields};
use common::fields::sections::{next_color_index, move_field_to_section};
use common::fields::{RadioGroupConfig, Section};
use common::model::field::{DataType, Entity, FieldValidation, InputType};
use gloo_console::{error, log};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::helpers::{set_window_dirty_flag, show_toast};
use crate::tops_sheet::top_sheet::{close_top_sheet, open_top_sheet};

use super::messages::Msg;
use super::state::EditorComponent;

pub fn update(component: &mut EditorComponent, ctx: &Context<EditorComponent>, msg: Msg) -> bool {
    let render = apply(component, ctx, msg);
    component.refresh_dirty_flag();
    render
}

fn apply(component: &mut EditorComponent, ctx: &Context<EditorComponent>, msg: Msg) -> bool {
    match msg {
        Msg::Loaded {
            template,
            definitions,
        } => {
            component.install(template, definitions);
            true
        }
        Msg::DataTypesLoaded(types) => {
            component.data_types = types;
            true
        }
        Msg::LoadFailed(message) => {
            component.loading = false;
            component.load_error = Some(message);
            true
        }
        Msg::SetTab(tab) => {
            let wants_preview = tab == "preview" && component.preview_html.is_none();
            component.active_tab = tab;
            if wants_preview && !component.preview_loading {
                component.preview_loading = true;
                let api = ctx.props().api.clone();
                let template_id = ctx.props().template_id.to_string();
                let link = ctx.link().clone();
                spawn_local(async move {
                    match api.html_preview(&template_id).await {
                        Ok(html) => link.send_message(Msg::PreviewLoaded(html)),
                        Err(err) => link.send_message(Msg::PreviewFailed(handle_api_error(&err))),
                    }
                });
            }
            true
        }
        Msg::PreviewLoaded(html) => {
            component.preview_loading = false;
            component.preview_html = Some(html);
            true
        }
        Msg::PreviewFailed(message) => {
            component.preview_loading = false;
            show_toast(&message);
            true
        }

        Msg::SelectField(key) => {
            component.selected_field = Some(key);
            true
        }
        Msg::SetDataType(key, code) => {
            let config = component.data_types.iter().find(|d| d.code == code).cloned();
            let Some(def) = component.definitions.get_mut(&key) else {
                return false;
            };
            def.data_type = DataType::from(code);
            if let Some(config) = config {
                if let Some(input_type) = config.input_type {
                    def.input_type = InputType::from(input_type);
                }
                let validation = def.validation.get_or_insert_with(FieldValidation::default);
                if config.pattern.is_some() {
                    validation.pattern = config.pattern;
                }
                if config.options.is_some() {
                    validation.options = config.options;
                }
            }
            true
        }
        Msg::SetInputType(key, code) => {
            if let Some(def) = component.definitions.get_mut(&key) {
                def.input_type = InputType::from(code);
            }
            true
        }
        Msg::SetEntity(key, code) => {
            let entity = Entity::ORDER.iter().copied().find(|e| e.as_str() == code);
            if let (Some(def), Some(entity)) = (component.definitions.get_mut(&key), entity) {
                def.entity = entity;
            }
            true
        }
        Msg::SetDescription(key, text) => {
            if let Some(def) = component.definitions.get_mut(&key) {
                def.description = Some(text).filter(|t| !t.trim().is_empty());
            }
            true
        }
        Msg::SetRequired(key, required) => {
            if let Some(def) = component.definitions.get_mut(&key) {
                def.validation
                    .get_or_insert_with(FieldValidation::default)
                    .required = required.then_some(true);
            }
            true
        }
        Msg::SetOptions(key, text) => {
            if let Some(def) = component.definitions.get_mut(&key) {
                let options: Vec<String> = text
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect();
                def.validation
                    .get_or_insert_with(FieldValidation::default)
                    .options = (!options.is_empty()).then_some(options);
            }
            true
        }

        Msg::SetNewSectionName(name) => {
            component.new_section_name = name;
            true
        }
        Msg::AddSection => {
            let name = component.new_section_name.trim().to_string();
            if name.is_empty() || component.sections.iter().any(|s| s.name == name) {
                show_toast("กรุณาตั้งชื่อกลุ่มที่ไม่ซ้ำ");
                return false;
            }
            let color_index = next_color_index(&component.sections);
            component.sections.push(Section {
                id: format!("custom-{}", uuid::Uuid::new_v4()),
                name,
                fields: Vec::new(),
                color_index,
            });
            component.new_section_name.clear();
            true
        }
        Msg::RenameSection(id, name) => {
            if let Some(section) = component.sections.iter_mut().find(|s| s.id == id) {
                section.name = name;
            }
            true
        }
        Msg::SetSectionColor(id, color_index) => {
            if let Some(section) = component.sections.iter_mut().find(|s| s.id == id) {
                section.color_index = color_index;
            }
            true
        }
        Msg::MoveSectionUp(id) => {
            if let Some(index) = component.sections.iter().position(|s| s.id == id) {
                if index > 0 {
                    component.sections.swap(index - 1, index);
                }
            }
            true
        }
        Msg::RemoveSection(id) => {
            // Members fall back to the ungrouped bucket on the next derive.
            component.sections.retain(|s| s.id != id);
            component.restructure(|_| ());
            true
        }
        Msg::MoveField { key, section_id } => {
            move_field_to_section(&mut component.sections, &key, &section_id);
            true
        }

        Msg::OpenMergeDialog => {
            component.merge_suggestions = detect_mergeable_groups(&component.mergeable_keys());
            open_top_sheet(component.merge_dialog_ref.clone());
            true
        }
        Msg::SetMergeLabel(index, label) => {
            if let Some(group) = component.merge_suggestions.get_mut(index) {
                group.suggested_label = label;
            }
            true
        }
        Msg::SetMergeSeparator(index, separator) => {
            if let Some(group) = component.merge_suggestions.get_mut(index) {
                group.suggested_separator = separator;
            }
            true
        }
        Msg::ApplyMerge(index) => {
            if index >= component.merge_suggestions.len() {
                return false;
            }
            let group = component.merge_suggestions.remove(index);
            let merged = component.restructure(|definitions| {
                apply_merge(
                    definitions,
                    &group.fields,
                    &group.suggested_label,
                    &group.suggested_separator,
                )
            });
            match merged {
                Ok(master) => {
                    log!(format!("Merged {} fields into {master}", group.fields.len()));
                    show_toast(&format!("รวม {} ช่องเป็น {}", group.fields.len(), group.suggested_label));
                    component.selected_field = Some(master);
                }
                Err(err) => show_toast(&handle_api_error(&err)),
            }
            if component.merge_suggestions.is_empty() {
                close_top_sheet(component.merge_dialog_ref.clone());
            }
            true
        }
        Msg::Unmerge(master) => {
            if component.restructure(|definitions| unmerge(definitions, &master)) {
                show_toast("ยกเลิกการรวมช่องแล้ว");
            }
            true
        }

        Msg::OpenRadioDialog => {
            component.radio_draft =
                RadioGroupConfig::new(uuid::Uuid::new_v4().simple().to_string(), String::new());
            open_top_sheet(component.radio_dialog_ref.clone());
            true
        }
        Msg::SetRadioLabel(label) => {
            component.radio_draft.label = label;
            true
        }
        Msg::ToggleRadioOption(key) => {
            let draft = &mut component.radio_draft;
            if draft.options.iter().any(|o| o.placeholder == key) {
                draft.remove_option(&key);
                return true;
            }
            let label = component
                .definitions
                .get(&key)
                .map(|d| d.display_label())
                .unwrap_or_else(|| key.clone());
            let keys: Vec<&String> = component.definitions.keys().collect();
            let children = detect_child_fields(&key, &keys);
            draft.add_option(&key, &label);
            if let Some(option) = draft.options.iter_mut().find(|o| o.placeholder == key) {
                option.child_fields = children;
            }
            true
        }
        Msg::SetRadioOptionLabel(key, label) => {
            if let Some(option) = component
                .radio_draft
                .options
                .iter_mut()
                .find(|o| o.placeholder == key)
            {
                option.label = label;
            }
            true
        }
        Msg::ApplyRadio => {
            if component.radio_draft.options.len() < 2 {
                show_toast("กลุ่มตัวเลือกต้องมีอย่างน้อย 2 ตัวเลือก");
                return false;
            }
            component.radio_groups.push(component.radio_draft.clone());
            let groups = component.radio_groups.clone();
            let applied = component.restructure(|definitions| apply_radio_groups(definitions, &groups));
            log!(format!("{applied} radio groups applied"));
            close_top_sheet(component.radio_dialog_ref.clone());
            true
        }
        Msg::RemoveRadioGroup(id) => {
            component.radio_groups.retain(|g| g.id != id);
            let groups = component.radio_groups.clone();
            component.restructure(|definitions| apply_radio_groups(definitions, &groups));
            true
        }

        Msg::Save => {
            if component.saving {
                return false;
            }
            component.saving = true;
            let definitions = component.persisted_definitions();
            let api = ctx.props().api.clone();
            let template_id = ctx.props().template_id.to_string();
            let link = ctx.link().clone();
            spawn_local(async move {
                match api.save_field_definitions(&template_id, &definitions).await {
                    Ok(()) => link.send_message(Msg::SaveSucceeded),
                    Err(err) => {
                        error!(format!("Saving field definitions failed: {err}"));
                        link.send_message(Msg::SaveFailed(handle_api_error(&err)));
                    }
                }
            });
            true
        }
        Msg::SaveSucceeded => {
            component.saving = false;
            component.definitions = component.persisted_definitions();
            component.original_md5 = Some(component.fingerprint());
            set_window_dirty_flag(false);
            show_toast("บันทึกการตั้งค่าฟิลด์แล้ว");
            true
        }
        Msg::SaveFailed(message) => {
            component.saving = false;
            show_toast(&message);
            true
        }
    }
}
