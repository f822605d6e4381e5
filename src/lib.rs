//! HTTP/JSON service managing users, groups and the membership relation between them.
//!
//! Groups named in a user's group list are created on the fly, while a group's member list
//! only accepts users that already exist.

use actix_web::web;

pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod model;

pub const APP_NAME: &str = "userapi";
/// Log target for application events.
pub const APP_TARGET: &str = "userapi::app";
/// Log target for the HTTP access log.
pub const ACCESS_TARGET: &str = "userapi::access";

/// Mount `/users` and `/groups`. Handlers expect a `web::Data<model::Store>` in app data.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(controller::user::configure_user_api)
        .configure(controller::group::configure_group_api);
}
