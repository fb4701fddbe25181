use actix_web::web;

use crate::handlers::quotas;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/quotas")
            .route("/{group_id}", web::get().to(quotas::get_quotas))
            .route("/{group_id}", web::post().to(quotas::init_quotas))
            .route(
                "/{group_id}/{quota_id}",
                web::put().to(quotas::set_quota),
            ),
    );
}
