//! # Runtime configuration endpoint
//!
//! The compiled SPA is the same for every deployment; the API base URL is
//! decided by the host's environment and handed to the browser here.

use actix_web::web::{self, get, resource};
use actix_web::{HttpResponse, Resource};
use common::requests::RuntimeConfig;

pub const PATH: &str = "/config.json";

pub fn configure_route() -> Resource {
    resource(PATH).route(get().to(process))
}

/// Handler for `GET /config.json`. Never cached so a redeploy with a new
/// API URL takes effect on the next page load.
pub async fn process(config: web::Data<RuntimeConfig>) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header(("Cache-Control", "no-store"))
        .json(config.get_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn returns_the_configured_api_url() {
        let config = RuntimeConfig {
            api_url: "https://api.example.test/api/v1".to_string(),
        };
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config.clone()))
                .service(configure_route()),
        )
        .await;

        let req = test::TestRequest::get().uri(PATH).to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert_eq!(resp.headers().get("Cache-Control").unwrap(), "no-store");

        let body: RuntimeConfig = test::read_body_json(resp).await;
        assert_eq!(body, config);
    }
}
