use actix_web::web;

use crate::error;

pub mod changes;
pub mod group;
pub mod group_user;
pub mod quotas;
pub mod vacation;

/// Full route table plus the extractor error handlers, shared by the server
/// and the test harness.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .app_data(error::query_config())
        .app_data(error::path_config())
        .configure(vacation::configure)
        .configure(group::configure)
        .configure(group_user::configure)
        .configure(quotas::configure)
        .configure(changes::configure);
}
