//! Update function for the form-fill page.
//!
//! Key behaviors
//! - Every edit goes through `FormData`, so progress always reflects it.
//! - Merged inputs are split one character per member placeholder.
//! - Radio groups write a check mark into the chosen option only.
//! - Address picks back-fill empty sibling fields of the same person.
//! - OCR output is merged over the current values.
//! - Submission validates locally first, then asks the API to generate the
//!   document.

use common::errors::handle_api_error;
use common::fields::merge::split_merged_value;
use common::fields::radio::{radio_selection_values, CHECK_MARK};
use common::form::address_part;
use common::model::template::ProcessRequest;
use gloo_console::{error, log};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::helpers::show_toast;

use super::messages::Msg;
use super::state::FillComponent;

pub fn update(component: &mut FillComponent, ctx: &Context<FillComponent>, msg: Msg) -> bool {
    match msg {
        Msg::Loaded {
            template,
            definitions,
        } => {
            log!(format!(
                "Loaded {} with {} fields",
                template.name,
                definitions.len()
            ));
            component.install(template, definitions);
            true
        }
        Msg::LoadFailed(message) => {
            component.loading = false;
            component.load_error = Some(message);
            true
        }
        Msg::SetField(key, value) => {
            component.form.set_field(&key, value);
            component.revalidate(&key);
            true
        }
        Msg::SetMerged(master, value) => {
            if let Some(def) = component.definitions.get(&master) {
                for (key, part) in split_merged_value(def, &value) {
                    component.form.set_field(&key, part);
                }
            }
            component.merged_inputs.insert(master.clone(), value);
            component.revalidate(&master);
            true
        }
        Msg::SelectRadio { master, option } => {
            let Some(options) = component
                .definitions
                .get(&master)
                .and_then(|d| d.radio_options.clone())
            else {
                return false;
            };
            for (key, value) in radio_selection_values(&options, &option) {
                component.form.set_field(&key, value);
            }
            component.radio_selection.insert(master.clone(), option);
            component.revalidate(&master);
            true
        }
        Msg::ToggleCheckbox(key, checked) => {
            let value = if checked { CHECK_MARK } else { "" };
            component.form.set_field(&key, value);
            component.revalidate(&key);
            true
        }
        Msg::AddressSelected { trigger, address } => {
            // The picked part goes into the input the user typed in.
            if let Some(part) = address_part(&trigger, Some(&component.definitions)) {
                component.form.set_field(&trigger, part.value_of(&address));
            }
            let filled =
                component
                    .form
                    .handle_address_select(&trigger, &address, Some(&component.definitions));
            for key in &filled {
                component.revalidate(key);
            }
            component.revalidate(&trigger);
            true
        }
        Msg::OpenOcrDialog => {
            if let Some(input) = component.ocr_input_ref.cast::<web_sys::HtmlInputElement>() {
                input.click();
            }
            false
        }
        Msg::OcrFileSelected(file) => {
            let Some(file) = file else {
                return false;
            };
            component.ocr_loading = true;
            let api = ctx.props().api.clone();
            let template_id = ctx.props().template_id.to_string();
            let link = ctx.link().clone();
            spawn_local(async move {
                match api.extract_ocr(&file, &template_id).await {
                    Ok(result) => link.send_message(Msg::OcrExtracted(result.data)),
                    Err(err) => {
                        error!(format!("OCR failed: {err}"));
                        link.send_message(Msg::OcrFailed(handle_api_error(&err)));
                    }
                }
            });
            true
        }
        Msg::OcrExtracted(data) => {
            component.ocr_loading = false;
            let count = data.len();
            component.form.handle_ocr_data_extracted(&data);
            component.sync_composite_inputs();
            if component.submitted {
                component.validate_all();
            }
            show_toast(&format!("เติมข้อมูลจากเอกสาร {count} ช่อง"));
            true
        }
        Msg::OcrFailed(message) => {
            component.ocr_loading = false;
            show_toast(&message);
            true
        }
        Msg::Submit => {
            let issues = component.validate_all();
            if issues > 0 {
                show_toast(&format!("กรุณาตรวจสอบข้อมูล {issues} รายการ"));
                return true;
            }
            component.processing = true;
            component.result = None;

            let api = ctx.props().api.clone();
            let template_id = ctx.props().template_id.to_string();
            let body = ProcessRequest {
                data: component.form.values().clone(),
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                match api.process_template(&template_id, &body).await {
                    Ok(result) => link.send_message(Msg::Processed(result)),
                    Err(err) => {
                        error!(format!("Document generation failed: {err}"));
                        link.send_message(Msg::ProcessFailed(handle_api_error(&err)));
                    }
                }
            });
            true
        }
        Msg::Processed(result) => {
            component.processing = false;
            show_toast("สร้างเอกสารสำเร็จ");
            component.result = Some(result);
            true
        }
        Msg::ProcessFailed(message) => {
            component.processing = false;
            show_toast(&message);
            true
        }
        Msg::Reset => {
            if let Some(template) = &component.template {
                component.form.reset_form_data(&template.placeholders);
            }
            component.sync_composite_inputs();
            component.issues.clear();
            component.submitted = false;
            component.result = None;
            true
        }
    }
}
