//! View rendering for the form-fill page: a header with progress and
//! actions, then one card per section with a widget per field.

use common::fields::radio::{radio_group_id, visible_children, CHECK_MARK};
use common::fields::sections::SECTION_COLORS;
use common::model::field::{bare_key, FieldDefinition, InputType};
use yew::html::Scope;
use yew::prelude::*;

use crate::components::address::AddressAutocomplete;
use crate::helpers::{checkbox_checked, input_value, select_value, selected_file, textarea_value};

use super::messages::Msg;
use super::state::FillComponent;

pub fn view(component: &FillComponent, ctx: &Context<FillComponent>) -> Html {
    if component.loading {
        return html! { <div class="page"><div class="spinner" /></div> };
    }
    if let Some(error) = &component.load_error {
        return html! { <div class="page"><div class="form-error">{ error.clone() }</div></div> };
    }
    let link = ctx.link();

    html! {
        <div class="page fill-page">
            { build_header(component, link) }
            { for component.sections.iter().map(|section| html! {
                <section class={classes!("section-card", format!("section-color-{}", section.color_index % SECTION_COLORS))}>
                    <h3>{ section.name.clone() }</h3>
                    <div class="field-grid">
                        { for section.fields.iter().map(|key| build_field(component, ctx, key)) }
                    </div>
                </section>
            }) }
            { build_footer(component, link) }
        </div>
    }
}

fn build_header(component: &FillComponent, link: &Scope<FillComponent>) -> Html {
    let name = component
        .template
        .as_ref()
        .map(|t| t.name.clone())
        .unwrap_or_default();
    let percentage = component.form.progress_percentage();

    html! {
        <div class="page-header sticky">
            <div>
                <h2>{ name }</h2>
                <div class="progress">
                    <div class="progress-bar" style={format!("width: {percentage}%;")} />
                </div>
                <span class="muted">
                    { format!(
                        "กรอกแล้ว {} จาก {} ช่อง ({}%)",
                        component.form.filled_fields_count(),
                        component.form.total_fields_count(),
                        percentage
                    ) }
                </span>
            </div>
            <input
                type="file"
                accept="image/*,application/pdf"
                style="display:none"
                ref={component.ocr_input_ref.clone()}
                onchange={link.callback(|e: Event| Msg::OcrFileSelected(selected_file(&e)))}
            />
            <button
                class="btn-outline"
                disabled={component.ocr_loading}
                onclick={link.callback(|_| Msg::OpenOcrDialog)}
            >
                <span class="material-icons">{"document_scanner"}</span>
                { if component.ocr_loading { "กำลังอ่านเอกสาร..." } else { "อ่านจากเอกสาร (OCR)" } }
            </button>
        </div>
    }
}

fn build_footer(component: &FillComponent, link: &Scope<FillComponent>) -> Html {
    html! {
        <div class="form-actions">
            <button class="btn-text" onclick={link.callback(|_| Msg::Reset)}>{"ล้างข้อมูล"}</button>
            <button class="btn-primary" disabled={component.processing} onclick={link.callback(|_| Msg::Submit)}>
                { if component.processing { "กำลังสร้างเอกสาร..." } else { "สร้างเอกสาร" } }
            </button>
            if let Some(result) = &component.result {
                <div class="result-card">
                    if let Some(url) = &result.download_url {
                        <a class="btn-primary" href={url.clone()} target="_blank">{"ดาวน์โหลดเอกสาร"}</a>
                    }
                    if let Some(remaining) = result.remaining_quota {
                        <span class="muted">{ format!("โควตาคงเหลือ {}", crate::helpers::format_quota(remaining)) }</span>
                    }
                </div>
            }
        </div>
    }
}

fn build_field(component: &FillComponent, ctx: &Context<FillComponent>, key: &str) -> Html {
    let Some(def) = component.definitions.get(key) else {
        return html! {};
    };
    let issue = component
        .issues
        .get(key)
        .map(|issue| issue.to_string());
    let widget = if def.is_merged_master() {
        merged_input(component, ctx.link(), key, def, issue.is_some())
    } else if def.is_radio_master() {
        radio_group(component, ctx, key, def)
    } else {
        widget(component, ctx, key, def, issue.is_some())
    };

    html! {
        <@{field_tag(def)} class={classes!("field", issue.is_some().then_some("has-error"))}>
            <span class="field-label">
                { def.display_label() }
                if def.is_required() {
                    <span class="required">{"*"}</span>
                }
            </span>
            { widget }
            if let Some(message) = issue {
                <span class="field-error">{ message }</span>
            }
        </@>
    }
}

/// Wrapper element for a field. Grouped masters hold several controls or
/// nested fields with their own labels, so they cannot sit inside a label.
fn field_tag(def: &FieldDefinition) -> &'static str {
    if def.is_radio_master() || def.is_merged_master() {
        "div"
    } else {
        "label"
    }
}

fn merged_input(
    component: &FillComponent,
    link: &Scope<FillComponent>,
    key: &str,
    def: &FieldDefinition,
    invalid: bool,
) -> Html {
    let master = key.to_string();
    let value = component.merged_inputs.get(key).cloned().unwrap_or_default();
    let members = def.merged_fields.as_ref().map_or(0, Vec::len);
    html! {
        <input
            class={classes!("merged-input", invalid.then_some("invalid"))}
            inputmode="numeric"
            placeholder={format!("{members} หลัก")}
            {value}
            oninput={link.callback(move |e: InputEvent| Msg::SetMerged(master.clone(), input_value(&e)))}
        />
    }
}

fn radio_group(
    component: &FillComponent,
    ctx: &Context<FillComponent>,
    key: &str,
    def: &FieldDefinition,
) -> Html {
    let link = ctx.link();
    let selected = component.radio_selection.get(key).cloned();
    let options = def.radio_options.clone().unwrap_or_default();
    let children = match (&selected, radio_group_id(&component.definitions, key)) {
        (Some(option), Some(group_id)) => {
            visible_children(&component.definitions, &group_id, option)
        }
        _ => Vec::new(),
    };

    html! {
        <div class="radio-group">
            { for options.into_iter().map(|option| {
                let master = key.to_string();
                let placeholder = option.placeholder.clone();
                let checked = selected.as_deref() == Some(option.placeholder.as_str());
                html! {
                    <label class="radio-option">
                        <input
                            type="radio"
                            name={format!("radio-{key}")}
                            {checked}
                            onchange={link.callback(move |_| Msg::SelectRadio {
                                master: master.clone(),
                                option: placeholder.clone(),
                            })}
                        />
                        { option.label.clone() }
                    </label>
                }
            }) }
            if !children.is_empty() {
                <div class="radio-children">
                    { for children.iter().map(|child| build_field(component, ctx, child)) }
                </div>
            }
        </div>
    }
}

fn widget(
    component: &FillComponent,
    ctx: &Context<FillComponent>,
    key: &str,
    def: &FieldDefinition,
    invalid: bool,
) -> Html {
    let link = ctx.link();
    let value = component.form.get(key).to_string();
    let class = classes!(invalid.then_some("invalid"));
    let owned = key.to_string();
    let on_text = {
        let key = owned.clone();
        link.callback(move |e: InputEvent| Msg::SetField(key.clone(), input_value(&e)))
    };
    let max_length = def
        .validation
        .as_ref()
        .and_then(|v| v.max_length)
        .map(|m| m.to_string());
    let options = def
        .validation
        .as_ref()
        .and_then(|v| v.options.clone())
        .unwrap_or_default();

    match &def.input_type {
        InputType::Select if !options.is_empty() => {
            let key = owned.clone();
            html! {
                <select {class} onchange={link.callback(move |e: Event| Msg::SetField(key.clone(), select_value(&e)))}>
                    <option value="" selected={value.is_empty()}>{"-- เลือก --"}</option>
                    { for options.iter().map(|o| html! {
                        <option value={o.clone()} selected={*o == value}>{ o.clone() }</option>
                    }) }
                </select>
            }
        }
        InputType::Textarea => {
            let key = owned.clone();
            html! {
                <textarea
                    {class}
                    rows="2"
                    {value}
                    oninput={link.callback(move |e: InputEvent| Msg::SetField(key.clone(), textarea_value(&e)))}
                />
            }
        }
        InputType::Checkbox => {
            let key = owned.clone();
            html! {
                <input
                    type="checkbox"
                    checked={value == CHECK_MARK}
                    onchange={link.callback(move |e: Event| Msg::ToggleCheckbox(key.clone(), checkbox_checked(&e)))}
                />
            }
        }
        InputType::Location => {
            let trigger = owned.clone();
            let on_select = link.callback(move |address| Msg::AddressSelected {
                trigger: trigger.clone(),
                address,
            });
            let key = owned.clone();
            let on_input = link.callback(move |text: String| Msg::SetField(key.clone(), text));
            html! {
                <AddressAutocomplete
                    api={ctx.props().api.clone()}
                    value={value}
                    placeholder={format!("พิมพ์เพื่อค้นหา {}", bare_key(&def.placeholder))}
                    {invalid}
                    {on_input}
                    {on_select}
                />
            }
        }
        other => {
            let input_type = match other {
                InputType::Date => "date",
                InputType::Time => "time",
                InputType::Number => "number",
                _ => "text",
            };
            let inputmode = matches!(other, InputType::Digit).then_some("numeric");
            html! {
                <input
                    {class}
                    type={input_type}
                    {inputmode}
                    maxlength={max_length}
                    {value}
                    oninput={on_text}
                />
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn grouped_masters_are_not_wrapped_in_labels() {
        let plain = FieldDefinition::default();
        assert_eq!(field_tag(&plain), "label");

        let radio = FieldDefinition {
            is_radio_group: Some(true),
            ..Default::default()
        };
        assert_eq!(field_tag(&radio), "div");

        let merged = FieldDefinition {
            is_merged: Some(true),
            ..Default::default()
        };
        assert_eq!(field_tag(&merged), "div");
    }
}
