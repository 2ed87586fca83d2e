use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::SearchSettings;
use crate::error::{AppError, AppResult};
use crate::services::PriceBand;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSearch {
    pub query: String,
    pub limit: u32,
    pub filters: ProviderFilters,
    pub config: ProviderOptions,
}

/// Only the price band goes upstream. The brand allow list is applied
/// locally so facets can still list every brand in the result set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderFilters {
    pub price: PriceFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceFilter {
    pub min_price: f64,
    pub max_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProviderOptions {
    pub enrich_query: bool,
    pub semantic_search: bool,
}

impl ProviderSearch {
    pub fn new(query: String, limit: u32, band: PriceBand) -> Self {
        let band = band.sanitized();
        Self {
            query,
            limit,
            filters: ProviderFilters {
                price: PriceFilter {
                    min_price: band.min,
                    max_price: band.max,
                },
            },
            config: ProviderOptions {
                enrich_query: true,
                semantic_search: true,
            },
        }
    }
}

/// What a search call produced. `Degraded` is a soft failure that the
/// caller reports as an empty, successful result.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Records(Vec<Value>),
    Degraded { note: String },
}

/// The provider has no offset parameter, so deeper pages (and broadened
/// searches) ask for more records from the start.
pub fn fetch_limit(page: u32, page_size: u32, broaden: bool, cap: u32) -> u32 {
    let needed = (u64::from(page) + 1) * u64::from(page_size);
    let wanted = if broaden { needed * 2 } else { needed };
    wanted.clamp(1, u64::from(cap.max(1))) as u32
}

#[derive(Clone)]
pub struct ProviderClient {
    client: Client,
    settings: SearchSettings,
}

impl ProviderClient {
    pub fn new(settings: SearchSettings) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { client, settings })
    }

    pub fn is_configured(&self) -> bool {
        !self.settings.api_key.trim().is_empty()
    }

    pub fn max_limit(&self) -> u32 {
        self.settings.max_limit
    }

    pub async fn search(&self, body: &ProviderSearch) -> AppResult<SearchOutcome> {
        if !self.is_configured() {
            warn!("search provider key not configured; answering with no results");
            return Ok(SearchOutcome::Degraded {
                note: "search provider key not configured".to_string(),
            });
        }

        let url = format!("{}/search", self.settings.base_url.trim_end_matches('/'));
        debug!(query = %body.query, limit = body.limit, "provider search");
        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.settings.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(status = status.as_u16(), "search provider rejected credentials");
            return Ok(SearchOutcome::Degraded {
                note: format!("search provider rejected credentials ({})", status.as_u16()),
            });
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("").to_string());
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        match response.json::<Value>().await {
            Ok(payload) => Ok(SearchOutcome::Records(records_from(payload))),
            Err(e) => {
                warn!("search provider returned an unreadable body: {}", e);
                Ok(SearchOutcome::Degraded {
                    note: "search provider returned an unreadable body".to_string(),
                })
            }
        }
    }

    /// Looks a single product up by id: `/products/{id}`, then
    /// `/product/{id}`, then a one-result search for the id.
    pub async fn product_detail(&self, product_id: &str) -> AppResult<Value> {
        if !self.is_configured() {
            return Err(AppError::Configuration(
                "search provider key not configured".to_string(),
            ));
        }

        for segment in ["products", "product"] {
            let url = self.detail_url(segment, product_id)?;
            let response = self
                .client
                .get(url)
                .header("x-api-key", &self.settings.api_key)
                .send()
                .await?;
            if response.status().is_success() {
                if let Ok(detail) = response.json::<Value>().await {
                    return Ok(detail);
                }
            } else {
                debug!(product_id, segment, status = response.status().as_u16(), "detail lookup missed");
            }
        }

        let url = format!("{}/search", self.settings.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.settings.api_key)
            .json(&json!({ "query": product_id, "limit": 1 }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream {
                status: status.as_u16(),
                body,
            });
        }
        let payload = response.json::<Value>().await?;
        records_from(payload)
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("product {} not found", product_id)))
    }

    fn detail_url(&self, segment: &str, product_id: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.settings.base_url)
            .map_err(|e| AppError::Configuration(format!("invalid search base url: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Configuration("search base url cannot hold a path".to_string()))?
            .pop_if_empty()
            .push(segment)
            .push(product_id);
        Ok(url)
    }
}

/// Accepts either a bare array or `{ "results": [...] }`.
fn records_from(payload: Value) -> Vec<Value> {
    match payload {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
