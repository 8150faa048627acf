//! Sheet listing detected runs of numbered placeholders that can be folded
//! into one input. Label and separator are editable before applying.

use yew::html::Scope;
use yew::prelude::*;

use crate::components::editor::messages::Msg;
use crate::components::editor::state::EditorComponent;
use crate::helpers::input_value;
use crate::tops_sheet::top_sheet::TopSheet;

pub fn merge_dialog(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    html! {
        <TopSheet node_ref={component.merge_dialog_ref.clone()} title="รวมช่องที่เป็นลำดับ">
            if component.merge_suggestions.is_empty() {
                <div class="empty-state">{"ไม่พบช่องที่รวมได้"}</div>
            }
            { for component.merge_suggestions.iter().enumerate().map(|(index, group)| html! {
                <div class="merge-suggestion">
                    <div class="muted">
                        { format!("{} ({} ช่อง): {}", group.pattern, group.fields.len(), group.fields.join(" ")) }
                    </div>
                    <input
                        value={group.suggested_label.clone()}
                        oninput={link.callback(move |e: InputEvent| Msg::SetMergeLabel(index, input_value(&e)))}
                    />
                    <input
                        class="separator-input"
                        placeholder="ตัวคั่น"
                        value={group.suggested_separator.clone()}
                        oninput={link.callback(move |e: InputEvent| Msg::SetMergeSeparator(index, input_value(&e)))}
                    />
                    <button class="btn-primary" onclick={link.callback(move |_| Msg::ApplyMerge(index))}>
                        {"รวม"}
                    </button>
                </div>
            }) }
        </TopSheet>
    }
}
