use actix_web::web;
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/generate-message", web::post().to(handlers::generate_message))
    )
    .route("/health", web::get().to(handlers::health_check));
}
