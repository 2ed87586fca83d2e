use actix_web::{http::header, web, HttpRequest, HttpResponse};
use chrono::Utc;
use reqwest::Url;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Click, ClickQuery};
use crate::AppState;

/// Logs an outbound click, then redirects to the product deeplink. Logging
/// is best-effort and never blocks the redirect.
pub async fn go(
    state: web::Data<AppState>,
    product_id: web::Path<String>,
    query: web::Query<ClickQuery>,
    http_req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let url = query
        .url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Validation("missing url".to_string()))?;
    let scheme_ok = Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https"))
        .unwrap_or(false);
    if !scheme_ok {
        return Err(AppError::Validation("url must be http(s)".to_string()));
    }

    let header_value = |name: header::HeaderName| {
        http_req
            .headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string()
    };

    if let Some(store) = &state.store {
        let click = Click {
            id: Uuid::new_v4(),
            product_id: product_id.into_inner(),
            query: query.query.clone().unwrap_or_default(),
            rank: query.rank(),
            user_agent: header_value(header::USER_AGENT),
            referrer: header_value(header::REFERER),
            outbound_url: url.to_string(),
            created_at: Utc::now(),
        };
        if let Err(e) = store.insert_click(click).await {
            warn!("click log failed: {}", e);
        }
    } else {
        debug!("no store configured; click not logged");
    }

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, url))
        .finish())
}

#[cfg(test)]
mod tests {
    use crate::handlers::test_support::{app, memory_store, state};
    use actix_web::{http::header, http::StatusCode, test};

    #[actix_web::test]
    async fn missing_url_is_400() {
        let app = test::init_service(app(state("http://127.0.0.1:9", "", None))).await;
        let req = test::TestRequest::get().uri("/api/go/p1?rank=1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn logs_click_and_redirects() {
        let store = memory_store();
        let app = test::init_service(app(state("http://127.0.0.1:9", "", Some(store.clone())))).await;
        let req = test::TestRequest::get()
            .uri("/api/go/p1?url=https%3A%2F%2Fshop.test%2Fp1&rank=3&query=student%20laptop")
            .insert_header((header::USER_AGENT, "test-agent"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "https://shop.test/p1"
        );

        let clicks = store.recent_clicks(10).await.unwrap();
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0].product_id, "p1");
        assert_eq!(clicks[0].rank, 3);
        assert_eq!(clicks[0].query, "student laptop");
        assert_eq!(clicks[0].user_agent, "test-agent");
    }

    #[actix_web::test]
    async fn redirects_even_without_store() {
        let app = test::init_service(app(state("http://127.0.0.1:9", "", None))).await;
        let req = test::TestRequest::get()
            .uri("/api/go/p1?url=https%3A%2F%2Fshop.test%2Fp1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
    }

    #[actix_web::test]
    async fn scheme_check_ignores_case() {
        let app = test::init_service(app(state("http://127.0.0.1:9", "", None))).await;
        let req = test::TestRequest::get()
            .uri("/api/go/p1?url=HTTPS%3A%2F%2Fshop.test%2Fp1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "HTTPS://shop.test/p1"
        );
    }

    #[actix_web::test]
    async fn rejects_non_http_targets() {
        let app = test::init_service(app(state("http://127.0.0.1:9", "", None))).await;
        let req = test::TestRequest::get()
            .uri("/api/go/p1?url=javascript%3Aalert(1)")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
