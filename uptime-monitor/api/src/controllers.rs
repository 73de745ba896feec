pub mod monitor;

use actix_web::error::InternalError;
use actix_web::http::{Method, header};
use actix_web::middleware::DefaultHeaders;
use actix_web::{HttpResponse, web};

use crate::models::monitor::MessageResponse;
use crate::services::health;

/// Headers letting browser dashboards on any origin call the API
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
}

// Answers CORS preflight requests
async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Register every route of the service
pub fn routes(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(MessageResponse::new(format!(
            "Invalid request body: {}",
            err
        )));
        InternalError::from_response(err, response).into()
    });

    cfg.app_data(json_config)
        .route("/", web::get().to(health::liveness))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/api")
                .service(
                    web::resource("/monitor")
                        .route(web::post().to(monitor::register_monitor))
                        .route(web::method(Method::OPTIONS).to(preflight)),
                )
                .service(
                    web::resource("/monitors")
                        .route(web::get().to(monitor::list_monitors))
                        .route(web::method(Method::OPTIONS).to(preflight)),
                )
                .service(
                    web::resource("/monitors/{name}")
                        .route(web::get().to(monitor::get_monitor))
                        .route(web::method(Method::OPTIONS).to(preflight)),
                ),
        );
}
