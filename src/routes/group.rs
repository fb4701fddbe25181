use actix_web::web;

use crate::handlers::group;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/group")
            .route("", web::post().to(group::create_group))
            .route("", web::get().to(group::list_groups))
            .route(
                "/{group_id}/approvers",
                web::get().to(group::get_approvers),
            )
            .route(
                "/{group_id}/approvers",
                web::put().to(group::update_approvers),
            )
            .route(
                "/{group_id}/quotas",
                web::put().to(group::update_quota_defaults),
            )
            .route("/{group_id}", web::delete().to(group::delete_group)),
    );
}
