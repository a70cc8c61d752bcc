//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod items;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::{Scope, web};

use validation::{FieldName, malformed_payload_error};

/// JSON, query and path extractor settings whose rejections use the domain
/// error payload instead of Actix's plain-text bodies.
pub fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        malformed_payload_error(FieldName::new("body"), err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        malformed_payload_error(FieldName::new("query"), err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        malformed_payload_error(FieldName::new("path"), err.to_string()).into()
    }));
}

/// Every `/api/v1` route.
///
/// Callers register [`state::HttpState`] as application data.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use warden::inbound::http::api_scope;
///
/// let _app = App::new().service(api_scope());
/// ```
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .configure(extractor_config)
        .service(users::register)
        .service(users::login)
        .service(users::current_user)
        .service(users::list_users)
        .service(items::create_item)
        .service(items::list_items)
        .service(items::get_item)
        .service(items::update_item)
        .service(items::delete_item)
}
