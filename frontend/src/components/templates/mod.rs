//! Template list with a name filter and, for admins, `.docx` upload.

use crate::api::Api;
use crate::helpers::{input_value, select_value, selected_file, show_toast};
use crate::routes::Route;
use crate::tops_sheet::top_sheet::{close_top_sheet, open_top_sheet, TopSheet};
use common::errors::handle_api_error;
use common::form::validation::validate_template_file;
use common::model::console::DocumentType;
use common::model::template::Template;
use gloo_console::error;
use yew::platform::spawn_local;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TemplateListProps {
    pub api: Api,
    #[prop_or_default]
    pub is_admin: bool,
}

pub enum Msg {
    Loaded(Vec<Template>),
    DocumentTypesLoaded(Vec<DocumentType>),
    LoadFailed(String),
    SetFilter(String),
    OpenUpload,
    FileChosen(Option<web_sys::File>),
    SetUploadName(String),
    SetUploadType(String),
    Upload,
    Uploaded(Template),
    UploadFailed(String),
}

pub struct TemplateListPage {
    templates: Vec<Template>,
    document_types: Vec<DocumentType>,
    filter: String,
    loading: bool,
    error: Option<String>,
    upload_ref: NodeRef,
    upload_file: Option<web_sys::File>,
    upload_name: String,
    upload_type: String,
    uploading: bool,
}

impl TemplateListPage {
    fn visible(&self) -> impl Iterator<Item = &Template> {
        let needle = self.filter.trim().to_lowercase();
        self.templates
            .iter()
            .filter(move |t| needle.is_empty() || t.name.to_lowercase().contains(&needle))
    }

    fn document_type_name(&self, code: &str) -> String {
        self.document_types
            .iter()
            .find(|d| d.code == code)
            .map_or_else(|| code.to_string(), |d| d.name.clone())
    }
}

impl Component for TemplateListPage {
    type Message = Msg;
    type Properties = TemplateListProps;

    fn create(ctx: &Context<Self>) -> Self {
        let api = ctx.props().api.clone();
        let is_admin = ctx.props().is_admin;
        let link = ctx.link().clone();
        spawn_local(async move {
            match api.list_templates().await {
                Ok(templates) => link.send_message(Msg::Loaded(templates)),
                Err(err) => {
                    error!(format!("Loading templates failed: {err}"));
                    link.send_message(Msg::LoadFailed(handle_api_error(&err)));
                }
            }
            if is_admin {
                if let Ok(types) = api.list_doctypes().await {
                    link.send_message(Msg::DocumentTypesLoaded(types));
                }
            }
        });

        Self {
            templates: Vec::new(),
            document_types: Vec::new(),
            filter: String::new(),
            loading: true,
            error: None,
            upload_ref: NodeRef::default(),
            upload_file: None,
            upload_name: String::new(),
            upload_type: String::new(),
            uploading: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Loaded(templates) => {
                self.templates = templates;
                self.loading = false;
            }
            Msg::DocumentTypesLoaded(types) => self.document_types = types,
            Msg::LoadFailed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            Msg::SetFilter(filter) => self.filter = filter,
            Msg::OpenUpload => {
                self.upload_file = None;
                self.upload_name.clear();
                self.upload_type.clear();
                open_top_sheet(self.upload_ref.clone());
            }
            Msg::FileChosen(file) => {
                if let Some(file) = &file {
                    if let Err(err) = validate_template_file(&file.name()) {
                        show_toast(&handle_api_error(&err));
                        return false;
                    }
                    if self.upload_name.trim().is_empty() {
                        self.upload_name = file
                            .name()
                            .trim_end_matches(".docx")
                            .trim_end_matches(".DOCX")
                            .to_string();
                    }
                }
                self.upload_file = file;
            }
            Msg::SetUploadName(name) => self.upload_name = name,
            Msg::SetUploadType(code) => self.upload_type = code,
            Msg::Upload => {
                let Some(file) = self.upload_file.clone() else {
                    show_toast("กรุณาเลือกไฟล์ .docx");
                    return false;
                };
                self.uploading = true;
                let api = ctx.props().api.clone();
                let link = ctx.link().clone();
                let name = self.upload_name.trim().to_string();
                let document_type = Some(self.upload_type.clone()).filter(|c| !c.is_empty());
                spawn_local(async move {
                    match api.upload_template(&file, &name, document_type.as_deref()).await {
                        Ok(template) => link.send_message(Msg::Uploaded(template)),
                        Err(err) => {
                            error!(format!("Upload failed: {err}"));
                            link.send_message(Msg::UploadFailed(handle_api_error(&err)));
                        }
                    }
                });
            }
            Msg::Uploaded(template) => {
                self.uploading = false;
                show_toast(&format!("อัปโหลด {} สำเร็จ", template.name));
                self.templates.insert(0, template);
                close_top_sheet(self.upload_ref.clone());
            }
            Msg::UploadFailed(message) => {
                self.uploading = false;
                show_toast(&message);
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let is_admin = ctx.props().is_admin;

        html! {
            <div class="page">
                <div class="page-header">
                    <h2>{"เอกสาร"}</h2>
                    <input
                        class="search"
                        placeholder="ค้นหาเอกสาร"
                        value={self.filter.clone()}
                        oninput={link.callback(|e: InputEvent| Msg::SetFilter(input_value(&e)))}
                    />
                    if is_admin {
                        <button class="btn-primary" onclick={link.callback(|_| Msg::OpenUpload)}>
                            <span class="material-icons">{"upload_file"}</span>{"อัปโหลดเทมเพลต"}
                        </button>
                    }
                </div>
                { self.body(is_admin) }
                if is_admin {
                    { self.upload_sheet(ctx) }
                }
            </div>
        }
    }
}

impl TemplateListPage {
    fn body(&self, is_admin: bool) -> Html {
        if self.loading {
            return html! { <div class="spinner" /> };
        }
        if let Some(error) = &self.error {
            return html! { <div class="form-error">{ error.clone() }</div> };
        }
        html! {
            <div class="template-grid">
                { for self.visible().map(|t| self.card(t, is_admin)) }
            </div>
        }
    }

    fn card(&self, template: &Template, is_admin: bool) -> Html {
        html! {
            <div class="template-card">
                <h3>{ template.name.clone() }</h3>
                if let Some(code) = &template.document_type {
                    <span class="chip">{ self.document_type_name(code) }</span>
                }
                if let Some(description) = &template.description {
                    <p>{ description.clone() }</p>
                }
                <span class="muted">{ format!("{} ช่องข้อมูล", template.placeholders.len()) }</span>
                <div class="card-actions">
                    <a class="btn-primary" href={Route::Fill(template.id.clone()).to_hash()}>{"กรอกข้อมูล"}</a>
                    if is_admin {
                        <a class="btn-outline" href={Route::Editor(template.id.clone()).to_hash()}>{"ตั้งค่าฟิลด์"}</a>
                    }
                </div>
            </div>
        }
    }

    fn upload_sheet(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <TopSheet node_ref={self.upload_ref.clone()} title="อัปโหลดเทมเพลต">
                <div class="form-grid">
                    <input
                        type="file"
                        accept=".docx"
                        onchange={link.callback(|e: Event| Msg::FileChosen(selected_file(&e)))}
                    />
                    if let Some(file) = &self.upload_file {
                        <span class="muted">{ file.name() }</span>
                    }
                    <input
                        placeholder="ชื่อเทมเพลต"
                        value={self.upload_name.clone()}
                        oninput={link.callback(|e: InputEvent| Msg::SetUploadName(input_value(&e)))}
                    />
                    <select onchange={link.callback(|e: Event| Msg::SetUploadType(select_value(&e)))}>
                        <option value="" selected={self.upload_type.is_empty()}>{"ประเภทเอกสาร (ไม่ระบุ)"}</option>
                        { for self.document_types.iter().map(|d| html! {
                            <option value={d.code.clone()} selected={d.code == self.upload_type}>{ d.name.clone() }</option>
                        }) }
                    </select>
                    <button class="btn-primary" disabled={self.uploading} onclick={link.callback(|_| Msg::Upload)}>
                        { if self.uploading { "กำลังอัปโหลด..." } else { "อัปโหลด" } }
                    </button>
                </div>
            </TopSheet>
        }
    }
}
