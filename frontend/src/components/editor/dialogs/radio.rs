//! Sheet for composing a radio group out of checkbox-like placeholders, and
//! for removing groups composed earlier.

use common::fields::radio::available_radio_fields;
use yew::html::Scope;
use yew::prelude::*;

use crate::components::editor::messages::Msg;
use crate::components::editor::state::EditorComponent;
use crate::helpers::input_value;
use crate::tops_sheet::top_sheet::TopSheet;

pub fn radio_dialog(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    let draft = &component.radio_draft;
    let candidates = available_radio_fields(&component.definitions, &component.radio_groups);

    html! {
        <TopSheet node_ref={component.radio_dialog_ref.clone()} title="กลุ่มตัวเลือก">
            <input
                placeholder="ชื่อกลุ่ม เช่น เพศ"
                value={draft.label.clone()}
                oninput={link.callback(|e: InputEvent| Msg::SetRadioLabel(input_value(&e)))}
            />
            <div class="radio-candidates">
                { for candidates.into_iter().map(|key| {
                    let option = draft.options.iter().find(|o| o.placeholder == key);
                    let toggle = {
                        let key = key.clone();
                        link.callback(move |_| Msg::ToggleRadioOption(key.clone()))
                    };
                    html! {
                        <div class="radio-candidate">
                            <input type="checkbox" checked={option.is_some()} onchange={toggle} />
                            <span class="field-key">{ key.clone() }</span>
                            if let Some(option) = option {
                                <input
                                    value={option.label.clone()}
                                    oninput={{
                                        let key = key.clone();
                                        link.callback(move |e: InputEvent| Msg::SetRadioOptionLabel(key.clone(), input_value(&e)))
                                    }}
                                />
                                if !option.child_fields.is_empty() {
                                    <span class="muted">{ format!("+ {}", option.child_fields.join(", ")) }</span>
                                }
                            }
                        </div>
                    }
                }) }
            </div>
            <button class="btn-primary" onclick={link.callback(|_| Msg::ApplyRadio)}>{"สร้างกลุ่ม"}</button>

            if !component.radio_groups.is_empty() {
                <h4>{"กลุ่มที่มีอยู่"}</h4>
                { for component.radio_groups.iter().map(|group| {
                    let id = group.id.clone();
                    html! {
                        <div class="radio-group-summary">
                            <span>{ if group.label.is_empty() { group.master_placeholder.clone() } else { group.label.clone() } }</span>
                            <span class="muted">
                                { group.options.iter().map(|o| o.label.clone()).collect::<Vec<_>>().join(" / ") }
                            </span>
                            <button class="icon-btn" onclick={link.callback(move |_| Msg::RemoveRadioGroup(id.clone()))}>
                                <span class="material-icons">{"delete"}</span>
                            </button>
                        </div>
                    }
                }) }
            }
        </TopSheet>
    }
}
