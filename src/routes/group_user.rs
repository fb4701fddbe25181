use actix_web::web;

use crate::handlers::group_user;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/group-user")
            .route("", web::put().to(group_user::update_members))
            .route(
                "/code/{validation_code}",
                web::post().to(group_user::redeem_code),
            )
            .route(
                "/invite/{group_id}",
                web::post().to(group_user::issue_invite),
            )
            .route(
                "/invite/{group_id}",
                web::get().to(group_user::list_invites),
            )
            .route("/{group_id}", web::get().to(group_user::list_members))
            .route(
                "/{group_id}/{user_id}",
                web::delete().to(group_user::remove_member),
            ),
    );
}
