use actix_web::{web, HttpResponse};
use tracing::error;

use crate::error::AppError;
use crate::models::SearchRequest;
use crate::AppState;

pub async fn search(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    // A missing body is the all-defaults search.
    let req: SearchRequest = if body.iter().all(u8::is_ascii_whitespace) {
        SearchRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))?
    };

    match state.search.search(&req).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => {
            error!("/api/search failed: {}", e);
            Err(e)
        }
    }
}

pub async fn method_not_allowed() -> Result<HttpResponse, AppError> {
    Err(AppError::MethodNotAllowed)
}
