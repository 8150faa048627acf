//! Typed client for the Dooform REST API.
//!
//! Every call attaches the bearer token when there is one, maps transport
//! failures to `ApiError::Network`, non-2xx answers to `ApiError::Http` with
//! the server's message, and undecodable bodies to `ApiError::Decode`.
//! Nothing is retried.

use common::address::normalize_query;
use common::auth::bearer;
use common::errors::{extract_error_message, ApiError};
use common::fields::{complete_field_definitions, generate_field_definitions};
use common::model::address::AddressResult;
use common::model::console::{
    DataTypeConfig, DocumentType, DocumentTypeSuggestion, FilterConfig, Stats,
};
use common::model::field::FieldDefinitions;
use common::model::template::{
    HtmlPreview, OcrResult, ProcessRequest, ProcessResult, Template, TemplateFields,
};
use common::model::user::{
    AuthResponse, GoogleLoginRequest, LoginRequest, ProfileUpdate, QuotaInfo, QuotaRequest,
    RegisterRequest, RoleRequest, User, UserListItem,
};
use common::requests::{self as paths, join_url, resolve_api_url, RuntimeConfig};
use gloo_console::log;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use web_sys::{AbortSignal, File, FormData};

/// Where the API lives: `/config.json` from the host, then the build-time
/// `DOOFORM_API_URL`, then the local default.
pub async fn load_base_url() -> String {
    let runtime = match Request::get("/config.json").send().await {
        Ok(resp) if resp.ok() => resp.json::<RuntimeConfig>().await.ok().map(|c| c.api_url),
        _ => None,
    };
    let base = resolve_api_url(&[runtime.as_deref(), option_env!("DOOFORM_API_URL")]);
    log!(format!("API base URL: {base}"));
    base
}

#[derive(Debug, Clone, PartialEq)]
pub struct Api {
    base_url: String,
    token: Option<String>,
}

async fn read_json<T: DeserializeOwned>(
    response: Result<Response, gloo_net::Error>,
) -> Result<T, ApiError> {
    let response = check(response).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

async fn read_empty(response: Result<Response, gloo_net::Error>) -> Result<(), ApiError> {
    check(response).await.map(|_| ())
}

async fn check(response: Result<Response, gloo_net::Error>) -> Result<Response, ApiError> {
    let response = response.map_err(|e| ApiError::Network(e.to_string()))?;
    if response.ok() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Http {
        status: response.status(),
        message: extract_error_message(&body),
    })
}

fn encode<T: Serialize + ?Sized>(builder: RequestBuilder, body: &T) -> Result<Request, ApiError> {
    builder
        .json(body)
        .map_err(|e| ApiError::Validation(e.to_string()))
}

fn multipart(builder: RequestBuilder, form: FormData) -> Result<Request, ApiError> {
    builder
        .body(form)
        .map_err(|e| ApiError::Validation(e.to_string()))
}

fn form_with_file(file: &File) -> Result<FormData, ApiError> {
    let form = FormData::new().map_err(|_| ApiError::Validation("FormData unavailable".into()))?;
    form.append_with_blob_and_filename("file", file, &file.name())
        .map_err(|_| ApiError::Validation("Unable to attach file".into()))?;
    Ok(form)
}

fn attached<E>(result: Result<(), E>, key: &str) -> Result<(), ApiError> {
    result.map_err(|_| ApiError::Validation(format!("Unable to attach {key}")))
}

fn append_text(form: &FormData, key: &str, value: &str) -> Result<(), ApiError> {
    attached(form.append_with_str(key, value), key)
}

impl Api {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token,
        }
    }

    pub fn with_token(&self, token: Option<String>) -> Self {
        Self::new(self.base_url.clone(), token)
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.header("Authorization", &bearer(token)),
            None => builder,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.authorize(Request::get(&self.url(path)))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.authorize(Request::post(&self.url(path)))
    }

    fn put(&self, path: &str) -> RequestBuilder {
        self.authorize(Request::put(&self.url(path)))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.authorize(Request::delete(&self.url(path)))
    }

    // Templates

    pub async fn list_templates(&self) -> Result<Vec<Template>, ApiError> {
        read_json(self.get(&paths::templates()).send().await).await
    }

    pub async fn get_template(&self, id: &str) -> Result<Template, ApiError> {
        read_json(self.get(&paths::template(id)).send().await).await
    }

    /// `Ok(None)` when the template has no saved definitions yet.
    pub async fn get_field_definitions(&self, id: &str) -> Result<Option<FieldDefinitions>, ApiError> {
        match read_json::<TemplateFields>(self.get(&paths::template_fields(id)).send().await).await {
            Ok(fields) if fields.field_definitions.is_empty() => Ok(None),
            Ok(fields) => Ok(Some(fields.field_definitions)),
            Err(err) if err.status() == Some(404) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// A template with definitions for every placeholder: saved ones
    /// completed with detected defaults, or all detected when none are saved.
    pub async fn load_template_with_fields(
        &self,
        id: &str,
    ) -> Result<(Template, FieldDefinitions), ApiError> {
        let template = self.get_template(id).await?;
        let definitions = match self.get_field_definitions(id).await? {
            Some(saved) => complete_field_definitions(saved, &template.placeholders),
            None => generate_field_definitions(&template.placeholders),
        };
        Ok((template, definitions))
    }

    pub async fn save_field_definitions(
        &self,
        id: &str,
        definitions: &FieldDefinitions,
    ) -> Result<(), ApiError> {
        let body = TemplateFields {
            template_id: id.to_string(),
            field_definitions: definitions.clone(),
        };
        let request = encode(self.put(&paths::template_fields(id)), &body)?;
        read_empty(request.send().await).await
    }

    pub async fn html_preview(&self, id: &str) -> Result<String, ApiError> {
        read_json::<HtmlPreview>(self.get(&paths::template_html_preview(id)).send().await)
            .await
            .map(|p| p.html)
    }

    pub async fn upload_template(
        &self,
        file: &File,
        name: &str,
        document_type: Option<&str>,
    ) -> Result<Template, ApiError> {
        let form = form_with_file(file)?;
        append_text(&form, "name", name)?;
        if let Some(code) = document_type {
            append_text(&form, "documentType", code)?;
        }
        let request = multipart(self.post(&paths::template_upload()), form)?;
        read_json(request.send().await).await
    }

    pub async fn process_template(
        &self,
        id: &str,
        body: &ProcessRequest,
    ) -> Result<ProcessResult, ApiError> {
        let request = encode(self.post(&paths::template_process(id)), body)?;
        read_json(request.send().await).await
    }

    pub async fn extract_ocr(&self, file: &File, template_id: &str) -> Result<OcrResult, ApiError> {
        let form = form_with_file(file)?;
        append_text(&form, "templateId", template_id)?;
        let request = multipart(self.post(&paths::ocr_extract()), form)?;
        read_json(request.send().await).await
    }

    pub async fn search_address(
        &self,
        query: &str,
        signal: Option<&AbortSignal>,
    ) -> Result<Vec<AddressResult>, ApiError> {
        let query = normalize_query(query);
        let response = self
            .get(&paths::address_search())
            .query([("q", query.as_str())])
            .abort_signal(signal)
            .send()
            .await;
        read_json(response).await
    }

    // Console

    pub async fn list_data_types(&self) -> Result<Vec<DataTypeConfig>, ApiError> {
        read_json(self.get(&paths::console_data_types()).send().await).await
    }

    pub async fn create_data_type(&self, body: &DataTypeConfig) -> Result<DataTypeConfig, ApiError> {
        let request = encode(self.post(&paths::console_data_types()), body)?;
        read_json(request.send().await).await
    }

    pub async fn delete_data_type(&self, id: &str) -> Result<(), ApiError> {
        read_empty(self.delete(&paths::console_data_type(id)).send().await).await
    }

    pub async fn list_filters(&self) -> Result<Vec<FilterConfig>, ApiError> {
        read_json(self.get(&paths::console_filters()).send().await).await
    }

    pub async fn create_filter(&self, body: &FilterConfig) -> Result<FilterConfig, ApiError> {
        let request = encode(self.post(&paths::console_filters()), body)?;
        read_json(request.send().await).await
    }

    pub async fn delete_filter(&self, id: &str) -> Result<(), ApiError> {
        read_empty(self.delete(&paths::console_filter(id)).send().await).await
    }

    pub async fn list_doctypes(&self) -> Result<Vec<DocumentType>, ApiError> {
        read_json(self.get(&paths::console_doctypes()).send().await).await
    }

    pub async fn create_doctype(&self, body: &DocumentType) -> Result<DocumentType, ApiError> {
        let request = encode(self.post(&paths::console_doctypes()), body)?;
        read_json(request.send().await).await
    }

    pub async fn delete_doctype(&self, id: &str) -> Result<(), ApiError> {
        read_empty(self.delete(&paths::console_doctype(id)).send().await).await
    }

    pub async fn doctype_suggestions(&self) -> Result<Vec<DocumentTypeSuggestion>, ApiError> {
        read_json(self.get(&paths::console_doctype_suggestions()).send().await).await
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        read_json(self.get(&paths::stats()).send().await).await
    }

    // Auth

    pub async fn register(&self, body: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let request = encode(self.post(&paths::auth_register()), body)?;
        read_json(request.send().await).await
    }

    pub async fn login(&self, body: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let request = encode(self.post(&paths::auth_login()), body)?;
        read_json(request.send().await).await
    }

    pub async fn google_login(&self, id_token: &str) -> Result<AuthResponse, ApiError> {
        let body = GoogleLoginRequest {
            id_token: id_token.to_string(),
        };
        let request = encode(self.post(&paths::auth_google_login()), &body)?;
        read_json(request.send().await).await
    }

    pub async fn me(&self) -> Result<User, ApiError> {
        read_json(self.get(&paths::auth_me()).send().await).await
    }

    pub async fn update_profile(&self, body: &ProfileUpdate) -> Result<User, ApiError> {
        let request = encode(self.put(&paths::auth_profile()), body)?;
        read_json(request.send().await).await
    }

    pub async fn delete_profile_picture(&self) -> Result<(), ApiError> {
        read_empty(self.delete(&paths::auth_profile_picture()).send().await).await
    }

    // Admin

    pub async fn list_users(&self) -> Result<Vec<UserListItem>, ApiError> {
        read_json(self.get(&paths::admin_users()).send().await).await
    }

    pub async fn user_quota(&self, user_id: &str) -> Result<QuotaInfo, ApiError> {
        read_json(self.get(&paths::admin_user_quota(user_id)).send().await).await
    }

    pub async fn add_quota(&self, user_id: &str, body: &QuotaRequest) -> Result<QuotaInfo, ApiError> {
        let request = encode(self.post(&paths::admin_user_quota(user_id)), body)?;
        read_json(request.send().await).await
    }

    pub async fn add_role(&self, user_id: &str, role: &str) -> Result<(), ApiError> {
        let body = RoleRequest {
            role: role.to_string(),
        };
        let request = encode(self.post(&paths::admin_user_roles(user_id)), &body)?;
        read_empty(request.send().await).await
    }

    pub async fn remove_role(&self, user_id: &str, role: &str) -> Result<(), ApiError> {
        let body = RoleRequest {
            role: role.to_string(),
        };
        let request = encode(self.delete(&paths::admin_user_roles(user_id)), &body)?;
        read_empty(request.send().await).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn failed_form_fields_become_validation_errors() {
        assert_eq!(attached::<()>(Ok(()), "name"), Ok(()));
        assert_eq!(
            attached(Err(()), "templateId"),
            Err(ApiError::Validation("Unable to attach templateId".into()))
        );
    }
}
