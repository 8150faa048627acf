//! Admin console: dashboard counters and the configuration lists the editor
//! and template pages draw from (data types, filters, document types).

use crate::api::Api;
use crate::helpers::{format_count, input_value, show_toast, textarea_value};
use common::errors::{handle_api_error, ApiError};
use common::model::console::{
    DataTypeConfig, DocumentType, DocumentTypeSuggestion, FilterConfig, Stats,
};
use gloo_console::error;
use yew::platform::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ConsoleProps {
    pub api: Api,
}

#[derive(Clone, Copy, PartialEq)]
pub enum Tab {
    DataTypes,
    Filters,
    DocumentTypes,
}

/// Draft of whichever item the active tab creates. `options` is one entry
/// per line.
#[derive(Default)]
struct Draft {
    code: String,
    name: String,
    pattern: String,
    input_type: String,
    field: String,
    category: String,
    options: String,
}

impl Draft {
    fn options(&self) -> Vec<String> {
        self.options
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn data_type(&self) -> Result<DataTypeConfig, ApiError> {
        require(&[&self.code, &self.name])?;
        let options = self.options();
        Ok(DataTypeConfig {
            id: String::new(),
            code: self.code.trim().to_string(),
            name: self.name.trim().to_string(),
            pattern: non_empty(&self.pattern),
            input_type: non_empty(&self.input_type),
            options: (!options.is_empty()).then_some(options),
        })
    }

    fn filter(&self) -> Result<FilterConfig, ApiError> {
        require(&[&self.name, &self.field])?;
        Ok(FilterConfig {
            id: String::new(),
            name: self.name.trim().to_string(),
            field: self.field.trim().to_string(),
            options: self.options(),
        })
    }

    fn document_type(&self) -> Result<DocumentType, ApiError> {
        require(&[&self.code, &self.name])?;
        Ok(DocumentType {
            id: String::new(),
            code: self.code.trim().to_string(),
            name: self.name.trim().to_string(),
            category: non_empty(&self.category),
        })
    }
}

fn require(values: &[&String]) -> Result<(), ApiError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(ApiError::Validation("กรุณากรอกข้อมูลให้ครบ".into()));
    }
    Ok(())
}

fn non_empty(value: &str) -> Option<String> {
    Some(value.trim().to_string()).filter(|v| !v.is_empty())
}

pub enum DraftField {
    Code,
    Name,
    Pattern,
    InputType,
    Field,
    Category,
    Options,
}

pub enum Msg {
    StatsLoaded(Stats),
    DataTypesLoaded(Vec<DataTypeConfig>),
    FiltersLoaded(Vec<FilterConfig>),
    DocumentTypesLoaded(Vec<DocumentType>),
    SuggestionsLoaded(Vec<DocumentTypeSuggestion>),
    LoadFailed(String),
    SelectTab(Tab),
    Edit(DraftField, String),
    Create,
    CreateSuggested(DocumentTypeSuggestion),
    DataTypeCreated(DataTypeConfig),
    FilterCreated(FilterConfig),
    DocumentTypeCreated(DocumentType),
    Delete(Tab, String),
    Deleted(Tab, String),
    RequestFailed(String),
}

pub struct ConsolePage {
    tab: Tab,
    stats: Stats,
    data_types: Vec<DataTypeConfig>,
    filters: Vec<FilterConfig>,
    document_types: Vec<DocumentType>,
    suggestions: Vec<DocumentTypeSuggestion>,
    draft: Draft,
    busy: bool,
    error: Option<String>,
}

fn report(link: &yew::html::Scope<ConsolePage>, what: &str, err: ApiError) {
    error!(format!("{what} failed: {err}"));
    link.send_message(Msg::RequestFailed(handle_api_error(&err)));
}

impl Component for ConsolePage {
    type Message = Msg;
    type Properties = ConsoleProps;

    fn create(ctx: &Context<Self>) -> Self {
        let api = ctx.props().api.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            match api.stats().await {
                Ok(stats) => link.send_message(Msg::StatsLoaded(stats)),
                Err(err) => error!(format!("Loading stats failed: {err}")),
            }
            let lists = async {
                link.send_message(Msg::DataTypesLoaded(api.list_data_types().await?));
                link.send_message(Msg::FiltersLoaded(api.list_filters().await?));
                link.send_message(Msg::DocumentTypesLoaded(api.list_doctypes().await?));
                Ok::<_, ApiError>(())
            };
            if let Err(err) = lists.await {
                error!(format!("Loading console failed: {err}"));
                link.send_message(Msg::LoadFailed(handle_api_error(&err)));
            }
            match api.doctype_suggestions().await {
                Ok(suggestions) => link.send_message(Msg::SuggestionsLoaded(suggestions)),
                Err(err) => error!(format!("Loading suggestions failed: {err}")),
            }
        });

        Self {
            tab: Tab::DataTypes,
            stats: Stats::default(),
            data_types: Vec::new(),
            filters: Vec::new(),
            document_types: Vec::new(),
            suggestions: Vec::new(),
            draft: Draft::default(),
            busy: false,
            error: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::StatsLoaded(stats) => self.stats = stats,
            Msg::DataTypesLoaded(items) => self.data_types = items,
            Msg::FiltersLoaded(items) => self.filters = items,
            Msg::DocumentTypesLoaded(items) => self.document_types = items,
            Msg::SuggestionsLoaded(items) => self.suggestions = items,
            Msg::LoadFailed(message) => self.error = Some(message),
            Msg::SelectTab(tab) => {
                self.tab = tab;
                self.draft = Draft::default();
            }
            Msg::Edit(field, value) => {
                let slot = match field {
                    DraftField::Code => &mut self.draft.code,
                    DraftField::Name => &mut self.draft.name,
                    DraftField::Pattern => &mut self.draft.pattern,
                    DraftField::InputType => &mut self.draft.input_type,
                    DraftField::Field => &mut self.draft.field,
                    DraftField::Category => &mut self.draft.category,
                    DraftField::Options => &mut self.draft.options,
                };
                *slot = value;
            }
            Msg::Create => return self.create_item(ctx),
            Msg::CreateSuggested(suggestion) => {
                self.draft = Draft {
                    code: suggestion.code,
                    name: suggestion.name,
                    ..Draft::default()
                };
                return self.create_item(ctx);
            }
            Msg::DataTypeCreated(item) => {
                self.data_types.push(item);
                self.created();
            }
            Msg::FilterCreated(item) => {
                self.filters.push(item);
                self.created();
            }
            Msg::DocumentTypeCreated(item) => {
                self.suggestions.retain(|s| s.code != item.code);
                self.document_types.push(item);
                self.created();
            }
            Msg::Delete(tab, id) => {
                let api = ctx.props().api.clone();
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = match tab {
                        Tab::DataTypes => api.delete_data_type(&id).await,
                        Tab::Filters => api.delete_filter(&id).await,
                        Tab::DocumentTypes => api.delete_doctype(&id).await,
                    };
                    match result {
                        Ok(()) => link.send_message(Msg::Deleted(tab, id)),
                        Err(err) => report(&link, "Delete", err),
                    }
                });
                return false;
            }
            Msg::Deleted(tab, id) => match tab {
                Tab::DataTypes => self.data_types.retain(|d| d.id != id),
                Tab::Filters => self.filters.retain(|f| f.id != id),
                Tab::DocumentTypes => self.document_types.retain(|d| d.id != id),
            },
            Msg::RequestFailed(message) => {
                self.busy = false;
                show_toast(&message);
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let tab = |target: Tab, label: &'static str| {
            let class = classes!("tab-btn", (self.tab == target).then_some("active"));
            html! {
                <button {class} onclick={link.callback(move |_| Msg::SelectTab(target))}>{ label }</button>
            }
        };

        html! {
            <div class="page">
                <div class="page-header"><h2>{"คอนโซล"}</h2></div>
                <div class="stats-row">
                    { stat_card("เทมเพลต", self.stats.total_templates) }
                    { stat_card("เอกสารที่สร้าง", self.stats.total_documents) }
                    { stat_card("ผู้ใช้", self.stats.total_users) }
                </div>
                if let Some(error) = &self.error {
                    <div class="form-error">{ error.clone() }</div>
                }
                <div class="tab-bar">
                    { tab(Tab::DataTypes, "ประเภทข้อมูล") }
                    { tab(Tab::Filters, "ตัวกรอง") }
                    { tab(Tab::DocumentTypes, "ประเภทเอกสาร") }
                </div>
                { self.create_form(ctx) }
                { self.list(ctx) }
                if self.tab == Tab::DocumentTypes && !self.suggestions.is_empty() {
                    { self.suggestion_list(ctx) }
                }
            </div>
        }
    }
}

fn stat_card(label: &str, value: u64) -> Html {
    html! {
        <div class="stat-card">
            <span class="stat-value">{ format_count(value) }</span>
            <span class="muted">{ label.to_string() }</span>
        </div>
    }
}

impl ConsolePage {
    fn create_item(&mut self, ctx: &Context<Self>) -> bool {
        let api = ctx.props().api.clone();
        let link = ctx.link().clone();
        let prepared = match self.tab {
            Tab::DataTypes => self.draft.data_type().map(|item| {
                spawn_local(async move {
                    match api.create_data_type(&item).await {
                        Ok(created) => link.send_message(Msg::DataTypeCreated(created)),
                        Err(err) => report(&link, "Creating data type", err),
                    }
                })
            }),
            Tab::Filters => self.draft.filter().map(|item| {
                spawn_local(async move {
                    match api.create_filter(&item).await {
                        Ok(created) => link.send_message(Msg::FilterCreated(created)),
                        Err(err) => report(&link, "Creating filter", err),
                    }
                })
            }),
            Tab::DocumentTypes => self.draft.document_type().map(|item| {
                spawn_local(async move {
                    match api.create_doctype(&item).await {
                        Ok(created) => link.send_message(Msg::DocumentTypeCreated(created)),
                        Err(err) => report(&link, "Creating document type", err),
                    }
                })
            }),
        };
        match prepared {
            Ok(()) => self.busy = true,
            Err(err) => show_toast(&handle_api_error(&err)),
        }
        true
    }

    fn created(&mut self) {
        self.busy = false;
        self.draft = Draft::default();
        show_toast("บันทึกแล้ว");
    }

    fn create_form(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let input = |field: fn() -> DraftField, placeholder: &'static str, value: &str| {
            html! {
                <input
                    {placeholder}
                    value={value.to_string()}
                    oninput={link.callback(move |e: InputEvent| Msg::Edit(field(), input_value(&e)))}
                />
            }
        };
        let options = html! {
            <textarea
                placeholder="ตัวเลือก (บรรทัดละหนึ่งรายการ)"
                value={self.draft.options.clone()}
                oninput={link.callback(|e: InputEvent| Msg::Edit(DraftField::Options, textarea_value(&e)))}
            />
        };

        html! {
            <div class="form-grid console-form">
                if self.tab != Tab::Filters {
                    { input(|| DraftField::Code, "รหัส", &self.draft.code) }
                }
                { input(|| DraftField::Name, "ชื่อ", &self.draft.name) }
                if self.tab == Tab::DataTypes {
                    { input(|| DraftField::Pattern, "รูปแบบ (regex)", &self.draft.pattern) }
                    { input(|| DraftField::InputType, "ชนิดอินพุต", &self.draft.input_type) }
                    { options.clone() }
                }
                if self.tab == Tab::Filters {
                    { input(|| DraftField::Field, "ฟิลด์", &self.draft.field) }
                    { options }
                }
                if self.tab == Tab::DocumentTypes {
                    { input(|| DraftField::Category, "หมวดหมู่", &self.draft.category) }
                }
                <button class="btn-primary" disabled={self.busy} onclick={link.callback(|_| Msg::Create)}>
                    {"เพิ่ม"}
                </button>
            </div>
        }
    }

    fn list(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let tab = self.tab;
        let row = |id: &str, title: String, detail: String| {
            let id = id.to_string();
            html! {
                <li class="console-row">
                    <span>{ title }</span>
                    <span class="muted">{ detail }</span>
                    <button class="icon-btn" onclick={link.callback(move |_| Msg::Delete(tab, id.clone()))}>
                        <span class="material-icons">{"delete"}</span>
                    </button>
                </li>
            }
        };
        let rows: Html = match tab {
            Tab::DataTypes => self
                .data_types
                .iter()
                .map(|d| {
                    let detail = d.pattern.clone().or_else(|| d.input_type.clone()).unwrap_or_default();
                    row(&d.id, format!("{} ({})", d.name, d.code), detail)
                })
                .collect(),
            Tab::Filters => self
                .filters
                .iter()
                .map(|f| row(&f.id, f.name.clone(), format!("{}: {}", f.field, f.options.join(", "))))
                .collect(),
            Tab::DocumentTypes => self
                .document_types
                .iter()
                .map(|d| row(&d.id, format!("{} ({})", d.name, d.code), d.category.clone().unwrap_or_default()))
                .collect(),
        };
        html! { <ul class="console-list">{ rows }</ul> }
    }

    fn suggestion_list(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div class="suggestions">
                <h3>{"ประเภทเอกสารที่แนะนำ"}</h3>
                { for self.suggestions.iter().map(|s| {
                    let suggestion = s.clone();
                    html! {
                        <div class="console-row">
                            <span>{ format!("{} ({})", s.name, s.code) }</span>
                            <span class="muted">{ format!("{} เทมเพลต", format_count(s.template_count)) }</span>
                            <button
                                class="btn-outline"
                                disabled={self.busy}
                                onclick={link.callback(move |_| Msg::CreateSuggested(suggestion.clone()))}
                            >{"สร้าง"}</button>
                        </div>
                    }
                }) }
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn data_type_draft_drops_blank_optionals() {
        let draft = Draft {
            code: " phone ".into(),
            name: "เบอร์โทร".into(),
            options: "\n \n".into(),
            ..Draft::default()
        };
        let item = draft.data_type().unwrap();
        assert_eq!(item.code, "phone");
        assert_eq!(item.pattern, None);
        assert_eq!(item.options, None);
    }

    #[test]
    fn filter_draft_splits_options_by_line() {
        let draft = Draft {
            name: "จังหวัด".into(),
            field: "province".into(),
            options: "กรุงเทพ\n  เชียงใหม่ \n".into(),
            ..Draft::default()
        };
        assert_eq!(draft.filter().unwrap().options, vec!["กรุงเทพ", "เชียงใหม่"]);
    }

    #[test]
    fn document_type_draft_requires_code_and_name() {
        let draft = Draft {
            name: "สูติบัตร".into(),
            ..Draft::default()
        };
        assert!(matches!(draft.document_type(), Err(ApiError::Validation(_))));
    }
}
