//! View rendering for the field editor.
//!
//! Layout: a toolbar (save with unsaved-changes dot, merge, radio, tabs),
//! then either the section board next to the property panel of the selected
//! field, or the server-rendered HTML preview of the document.

use common::fields::sections::SECTION_COLORS;
use common::fields::Section;
use common::model::field::{DataType, Entity, FieldDefinition, InputType};
use yew::html::Scope;
use yew::prelude::*;

use crate::helpers::{checkbox_checked, input_value, select_value, textarea_value};

use super::dialogs::{merge_dialog, radio_dialog};
use super::messages::Msg;
use super::state::EditorComponent;

pub fn view(component: &EditorComponent, ctx: &Context<EditorComponent>) -> Html {
    if component.loading {
        return html! { <div class="page"><div class="spinner" /></div> };
    }
    if let Some(error) = &component.load_error {
        return html! { <div class="page"><div class="form-error">{ error.clone() }</div></div> };
    }
    let link = ctx.link();

    html! {
        <div class="page editor-page">
            { build_toolbar(component, link) }
            if component.active_tab == "preview" {
                { build_preview(component) }
            } else {
                <div class="editor-body">
                    <div class="section-board">
                        { for component.sections.iter().map(|s| build_section(component, link, s)) }
                        { build_new_section(component, link) }
                    </div>
                    { build_property_panel(component, link) }
                </div>
            }
            { merge_dialog(component, link) }
            { radio_dialog(component, link) }
        </div>
    }
}

fn build_toolbar(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    let name = component
        .template
        .as_ref()
        .map(|t| t.name.clone())
        .unwrap_or_default();
    let dirty = component.is_dirty();
    let tab = |id: &'static str, label: &'static str| {
        html! {
            <button
                class={classes!("tab-btn", (component.active_tab == id).then_some("active"))}
                onclick={link.callback(move |_| Msg::SetTab(id.to_string()))}
            >
                { label }
            </button>
        }
    };

    html! {
        <div class="page-header sticky">
            <h2>{ name }</h2>
            <div class="tab-bar">
                { tab("fields", "ฟิลด์") }
                { tab("preview", "ตัวอย่างเอกสาร") }
            </div>
            <div class="icon-toolbar">
                <button class="btn-outline" onclick={link.callback(|_| Msg::OpenMergeDialog)}>
                    <span class="material-icons">{"call_merge"}</span>{"รวมช่อง"}
                </button>
                <button class="btn-outline" onclick={link.callback(|_| Msg::OpenRadioDialog)}>
                    <span class="material-icons">{"radio_button_checked"}</span>{"กลุ่มตัวเลือก"}
                </button>
                <button
                    class="btn-primary"
                    style="position: relative;"
                    disabled={component.saving}
                    onclick={link.callback(|_| Msg::Save)}
                >
                    { if component.saving { "กำลังบันทึก..." } else { "บันทึก" } }
                    if dirty {
                        <span class="dirty-dot" title="มีการแก้ไขที่ยังไม่บันทึก" />
                    }
                </button>
            </div>
        </div>
    }
}

fn build_preview(component: &EditorComponent) -> Html {
    match &component.preview_html {
        Some(html) => html! {
            <div class="document-preview">
                { Html::from_html_unchecked(AttrValue::from(html.clone())) }
            </div>
        },
        None if component.preview_loading => html! { <div class="spinner" /> },
        None => html! { <div class="empty-state">{"ไม่มีตัวอย่างเอกสาร"}</div> },
    }
}

fn build_section(component: &EditorComponent, link: &Scope<EditorComponent>, section: &Section) -> Html {
    let id = section.id.clone();
    let on_rename = {
        let id = id.clone();
        link.callback(move |e: InputEvent| Msg::RenameSection(id.clone(), input_value(&e)))
    };
    let on_color = {
        let id = id.clone();
        link.callback(move |e: Event| {
            Msg::SetSectionColor(id.clone(), select_value(&e).parse().unwrap_or(0))
        })
    };
    let on_up = {
        let id = id.clone();
        link.callback(move |_| Msg::MoveSectionUp(id.clone()))
    };
    let on_remove = link.callback(move |_| Msg::RemoveSection(id.clone()));

    html! {
        <section class={classes!("section-card", format!("section-color-{}", section.color_index % SECTION_COLORS))}>
            <div class="section-header">
                <input class="section-name" value={section.name.clone()} oninput={on_rename} />
                <select class="color-select" onchange={on_color}>
                    { for (0..SECTION_COLORS).map(|c| html! {
                        <option value={c.to_string()} selected={c == section.color_index}>{ format!("สี {}", c + 1) }</option>
                    }) }
                </select>
                <button class="icon-btn" title="เลื่อนขึ้น" onclick={on_up}>
                    <span class="material-icons">{"arrow_upward"}</span>
                </button>
                <button class="icon-btn" title="ลบกลุ่ม" onclick={on_remove}>
                    <span class="material-icons">{"delete"}</span>
                </button>
            </div>
            if section.fields.is_empty() {
                <div class="muted">{"ยังไม่มีฟิลด์ในกลุ่มนี้"}</div>
            }
            { for section.fields.iter().map(|key| build_field_row(component, link, key)) }
        </section>
    }
}

fn build_field_row(component: &EditorComponent, link: &Scope<EditorComponent>, key: &str) -> Html {
    let Some(def) = component.definitions.get(key) else {
        return html! {};
    };
    let selected = component.selected_field.as_deref() == Some(key);
    let on_select = {
        let key = key.to_string();
        link.callback(move |_| Msg::SelectField(key.clone()))
    };
    let badge = if def.is_merged_master() {
        Some("รวมช่อง")
    } else if def.is_radio_master() {
        Some("ตัวเลือก")
    } else {
        None
    };

    html! {
        <div class={classes!("field-row", selected.then_some("selected"))} onclick={on_select}>
            <span class="field-key">{ def.display_label() }</span>
            <span class="chip">{ def.data_type.to_string() }</span>
            if let Some(badge) = badge {
                <span class="chip accent">{ badge }</span>
            }
        </div>
    }
}

fn build_new_section(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    html! {
        <div class="new-section">
            <input
                placeholder="ชื่อกลุ่มใหม่"
                value={component.new_section_name.clone()}
                oninput={link.callback(|e: InputEvent| Msg::SetNewSectionName(input_value(&e)))}
            />
            <button class="btn-outline" onclick={link.callback(|_| Msg::AddSection)}>{"เพิ่มกลุ่ม"}</button>
        </div>
    }
}

fn build_property_panel(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    let Some((key, def)) = component
        .selected_field
        .as_ref()
        .and_then(|k| component.definitions.get(k).map(|d| (k.clone(), d)))
    else {
        return html! {
            <aside class="property-panel empty-state">{"เลือกฟิลด์เพื่อแก้ไข"}</aside>
        };
    };

    html! {
        <aside class="property-panel">
            <h3>{ def.placeholder.clone() }</h3>
            { text_property(link, &key, "คำอธิบาย", def.description.clone().unwrap_or_default(), Msg::SetDescription) }
            { data_type_select(component, link, &key, def) }
            { input_type_select(link, &key, def) }
            { entity_select(link, &key, def) }
            { section_select(component, link, &key) }
            { options_editor(link, &key, def) }
            <label class="checkbox">
                <input
                    type="checkbox"
                    checked={def.is_required()}
                    onchange={{
                        let key = key.clone();
                        link.callback(move |e: Event| Msg::SetRequired(key.clone(), checkbox_checked(&e)))
                    }}
                />
                {"จำเป็นต้องกรอก"}
            </label>
            if def.is_merged_master() {
                <div class="merged-members">
                    <span class="muted">
                        { def.merged_fields.as_ref().map(|m| m.join(", ")).unwrap_or_default() }
                    </span>
                    <button class="btn-text" onclick={{
                        let key = key.clone();
                        link.callback(move |_| Msg::Unmerge(key.clone()))
                    }}>{"ยกเลิกการรวมช่อง"}</button>
                </div>
            }
        </aside>
    }
}

fn text_property(
    link: &Scope<EditorComponent>,
    key: &str,
    label: &str,
    value: String,
    to_msg: fn(String, String) -> Msg,
) -> Html {
    let key = key.to_string();
    html! {
        <label class="field">
            <span class="field-label">{ label.to_string() }</span>
            <input {value} oninput={link.callback(move |e: InputEvent| to_msg(key.clone(), input_value(&e)))} />
        </label>
    }
}

fn data_type_select(
    component: &EditorComponent,
    link: &Scope<EditorComponent>,
    key: &str,
    def: &FieldDefinition,
) -> Html {
    let current = def.data_type.as_str().to_string();
    let mut codes: Vec<(String, String)> = DataType::builtin()
        .iter()
        .map(|d| (d.as_str().to_string(), d.as_str().to_string()))
        .collect();
    for custom in &component.data_types {
        if !codes.iter().any(|(code, _)| *code == custom.code) {
            codes.push((custom.code.clone(), custom.name.clone()));
        }
    }
    if !codes.iter().any(|(code, _)| *code == current) {
        codes.push((current.clone(), current.clone()));
    }
    let key = key.to_string();

    html! {
        <label class="field">
            <span class="field-label">{"ชนิดข้อมูล"}</span>
            <select onchange={link.callback(move |e: Event| Msg::SetDataType(key.clone(), select_value(&e)))}>
                { for codes.into_iter().map(|(code, name)| html! {
                    <option value={code.clone()} selected={code == current}>{ name }</option>
                }) }
            </select>
        </label>
    }
}

fn input_type_select(link: &Scope<EditorComponent>, key: &str, def: &FieldDefinition) -> Html {
    let current = def.input_type.clone();
    let key = key.to_string();
    html! {
        <label class="field">
            <span class="field-label">{"รูปแบบช่องกรอก"}</span>
            <select onchange={link.callback(move |e: Event| Msg::SetInputType(key.clone(), select_value(&e)))}>
                { for InputType::builtin().iter().map(|t| html! {
                    <option value={t.as_str().to_string()} selected={*t == current}>{ t.as_str().to_string() }</option>
                }) }
            </select>
        </label>
    }
}

fn entity_select(link: &Scope<EditorComponent>, key: &str, def: &FieldDefinition) -> Html {
    let current = def.entity;
    let key = key.to_string();
    html! {
        <label class="field">
            <span class="field-label">{"เป็นข้อมูลของ"}</span>
            <select onchange={link.callback(move |e: Event| Msg::SetEntity(key.clone(), select_value(&e)))}>
                { for Entity::ORDER.iter().map(|e| html! {
                    <option value={e.as_str()} selected={*e == current}>{ e.label() }</option>
                }) }
            </select>
        </label>
    }
}

fn section_select(component: &EditorComponent, link: &Scope<EditorComponent>, key: &str) -> Html {
    let current = component.section_of(key).map(|s| s.id.clone());
    let owned = key.to_string();
    html! {
        <label class="field">
            <span class="field-label">{"กลุ่ม"}</span>
            <select onchange={link.callback(move |e: Event| Msg::MoveField {
                key: owned.clone(),
                section_id: select_value(&e),
            })}>
                { for component.sections.iter().map(|s| html! {
                    <option value={s.id.clone()} selected={current.as_deref() == Some(s.id.as_str())}>{ s.name.clone() }</option>
                }) }
            </select>
        </label>
    }
}

fn options_editor(link: &Scope<EditorComponent>, key: &str, def: &FieldDefinition) -> Html {
    if def.input_type != InputType::Select {
        return html! {};
    }
    let value = def
        .validation
        .as_ref()
        .and_then(|v| v.options.clone())
        .unwrap_or_default()
        .join("\n");
    let key = key.to_string();
    html! {
        <label class="field">
            <span class="field-label">{"ตัวเลือก (บรรทัดละหนึ่งค่า)"}</span>
            <textarea
                rows="5"
                {value}
                oninput={link.callback(move |e: InputEvent| Msg::SetOptions(key.clone(), textarea_value(&e)))}
            />
        </label>
    }
}
