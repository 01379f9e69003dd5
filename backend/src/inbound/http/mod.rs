//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod listing;
pub mod notes;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod studies;
pub mod tags;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register every `/api/v1` resource on `cfg`.
///
/// Literal segments such as `/studies/search` and `/users/profile` are
/// registered before the `{id}` routes that would otherwise capture them.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(notes::list_notes)
        .service(studies::create_study)
        .service(studies::list_studies)
        .service(studies::search_studies)
        .service(studies::get_study)
        .service(studies::update_study)
        .service(tags::create_tag)
        .service(tags::list_tags)
        .service(tags::search_tags)
        .service(tags::get_tag)
        .service(tags::update_tag)
        .service(users::list_users)
        .service(users::update_account)
        .service(users::get_profile)
        .service(users::update_profile)
        .service(users::check_availability)
        .service(users::toggle_follow)
        .service(users::get_user);
}
