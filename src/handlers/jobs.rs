use actix_web::{web, HttpResponse};
use tracing::error;

use crate::error::AppError;
use crate::AppState;

/// Trigger for the weekly digest. Scheduling lives outside the service.
pub async fn weekly_digest(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let store = state.require_store()?;
    let summary = state.digest.run(store).await.map_err(|e| {
        error!("weekly digest failed: {}", e);
        e
    })?;
    Ok(HttpResponse::Ok().json(summary))
}

pub async fn check_price_drops(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let store = state.require_store()?;
    let summary = state.watches.run(store).await.map_err(|e| {
        error!("price watch check failed: {}", e);
        e
    })?;
    Ok(HttpResponse::Ok().json(summary))
}
