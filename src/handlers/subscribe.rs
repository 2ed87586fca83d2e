use actix_web::{web, HttpResponse};
use tracing::info;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;
use crate::models::{OkResponse, SubscribeRequest, DEFAULT_TOPIC};
use crate::services::Topic;
use crate::AppState;

pub(crate) fn validation_error(errors: ValidationErrors) -> AppError {
    if errors.field_errors().contains_key("email") {
        AppError::Validation("Invalid email".to_string())
    } else {
        AppError::Validation(format!("Validation error: {}", errors))
    }
}

pub async fn subscribe(
    state: web::Data<AppState>,
    req: web::Json<SubscribeRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(validation_error)?;
    let store = state.require_store()?;

    let topic = Topic::parse(req.topic.as_deref().unwrap_or(DEFAULT_TOPIC));
    store
        .upsert_subscriber(&req.email, topic.as_str(), req.max_price)
        .await?;
    info!(topic = topic.as_str(), "subscriber saved");

    Ok(HttpResponse::Ok().json(OkResponse::new()))
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{app, memory_store, state};
    use crate::repositories::Store;
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn invalid_email_is_400() {
        let store = memory_store();
        let app = test::init_service(app(state("http://127.0.0.1:9", "", Some(store)))).await;
        let req = test::TestRequest::post()
            .uri("/api/subscribe")
            .set_json(json!({"email": "not-an-email"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({"ok": false, "error": "Invalid email"}));
    }

    #[actix_web::test]
    async fn missing_email_is_400() {
        let app = test::init_service(app(state("http://127.0.0.1:9", "", Some(memory_store())))).await;
        let req = test::TestRequest::post()
            .uri("/api/subscribe")
            .set_json(json!({"topic": "hubs"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn subscribes_once_per_email_and_topic() {
        let store = memory_store();
        let app = test::init_service(app(state("http://127.0.0.1:9", "", Some(store.clone())))).await;
        for max_price in [400, 650] {
            let req = test::TestRequest::post()
                .uri("/api/subscribe")
                .set_json(json!({"email": "a@uni.edu", "topic": "Monitors", "max_price": max_price}))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body, json!({"ok": true}));
        }

        let subs = store.list_subscribers(10).await.unwrap();
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].topic, "monitors");
        assert_eq!(subs[0].max_price, Some(650.0));
    }

    #[actix_web::test]
    async fn without_store_is_500() {
        let app = test::init_service(app(state("http://127.0.0.1:9", "", None))).await;
        let req = test::TestRequest::post()
            .uri("/api/subscribe")
            .set_json(json!({"email": "a@uni.edu"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Server not configured");
    }

    #[actix_web::test]
    async fn get_is_not_routed_to_subscribe() {
        let app = test::init_service(app(state("http://127.0.0.1:9", "", None))).await;
        let req = test::TestRequest::get().uri("/api/subscribe").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_client_error());
    }
}
