use actix_web::{web, Scope};

use crate::error::AppError;
use crate::handlers;

pub fn config() -> Scope {
    web::scope("/api")
        .route("/health", web::get().to(handlers::health_check))
        .service(
            web::resource("/search")
                .route(web::post().to(handlers::search))
                .default_service(web::route().to(handlers::method_not_allowed)),
        )
        .route("/go/{product_id}", web::get().to(handlers::go))
        .route("/subscribe", web::post().to(handlers::subscribe))
        .route("/watch/add", web::post().to(handlers::add_watch))
        .route("/watch/remove", web::delete().to(handlers::remove_watch))
        .route("/digest/weekly", web::get().to(handlers::weekly_digest))
        .route(
            "/cron/check-price-drops",
            web::get().to(handlers::check_price_drops),
        )
}

/// Malformed JSON bodies answer with the same `{ok:false, error}` shape as
/// every other failure.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| AppError::Validation(format!("Invalid request body: {}", err)).into())
}
