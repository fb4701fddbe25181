use actix_web::web;

use crate::handlers::vacation;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/vacation")
            .route("", web::get().to(vacation::list_vacations))
            .route(
                "/create-vacation",
                web::post().to(vacation::create_vacation),
            )
            .route("/approve/{id}", web::post().to(vacation::approve_vacation))
            .route("/reject/{id}", web::post().to(vacation::reject_vacation))
            .route("/{id}", web::delete().to(vacation::delete_vacation)),
    );
}
