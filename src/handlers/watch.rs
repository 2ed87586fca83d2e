use actix_web::{web, HttpResponse};
use tracing::info;
use validator::Validate;

use crate::error::AppError;
use crate::handlers::subscribe::validation_error;
use crate::models::{OkResponse, RemoveWatchQuery, WatchRequest};
use crate::AppState;

pub async fn add_watch(
    state: web::Data<AppState>,
    req: web::Json<WatchRequest>,
) -> Result<HttpResponse, AppError> {
    if req.product_id.trim().is_empty() {
        return Err(AppError::Validation("missing email/product_id".to_string()));
    }
    req.validate().map_err(validation_error)?;
    let store = state.require_store()?;

    store
        .upsert_watch(
            &req.email,
            req.product_id.trim(),
            req.threshold,
            req.last_price,
        )
        .await?;
    info!(product_id = %req.product_id, "watch saved");

    Ok(HttpResponse::Ok().json(OkResponse::new()))
}

pub async fn remove_watch(
    state: web::Data<AppState>,
    query: web::Query<RemoveWatchQuery>,
) -> Result<HttpResponse, AppError> {
    let email = query.email.as_deref().map(str::trim).unwrap_or("");
    let product_id = query.product_id.as_deref().map(str::trim).unwrap_or("");
    if email.is_empty() || product_id.is_empty() {
        return Err(AppError::Validation("missing email/product_id".to_string()));
    }
    let store = state.require_store()?;

    let removed = store.delete_watch(email, product_id).await?;
    info!(product_id, removed, "watch removal");

    Ok(HttpResponse::Ok().json(OkResponse::new()))
}
