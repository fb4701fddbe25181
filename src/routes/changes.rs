use actix_web::web;

use crate::handlers::changes;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/changes").route("/{group_id}", web::get().to(changes::get_changes)),
    );
}
