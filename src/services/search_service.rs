use serde_json::Value;
use tracing::info;

use crate::config::SearchSettings;
use crate::error::AppResult;
use crate::models::{Product, SearchRequest, SearchResponse};
use crate::services::{
    build_query, fetch_limit, is_relevant, Normalizer, ProviderClient, ProviderSearch,
    QueryInputs, QueryPlan, SearchOutcome, Topic,
};
use crate::utils::{brand_facets, dedupe_products, filter_brands, infer_why, paginate, Page};

/// The search pipeline: derive query and price band, fetch once, normalize,
/// keep relevant products, dedupe, build facets, apply the brand allow list
/// and slice the requested page.
#[derive(Clone)]
pub struct SearchService {
    provider: ProviderClient,
    normalizer: Normalizer,
    max_page_size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Refined {
    pub page: Page<Product>,
    pub brands: Vec<String>,
}

impl SearchService {
    pub fn new(provider: ProviderClient, normalizer: Normalizer, max_page_size: u32) -> Self {
        Self {
            provider,
            normalizer,
            max_page_size,
        }
    }

    pub fn from_settings(settings: &SearchSettings) -> AppResult<Self> {
        let provider = ProviderClient::new(settings.clone())?;
        let normalizer = Normalizer::new(settings.default_currency.clone(), infer_why);
        Ok(Self::new(provider, normalizer, settings.max_page_size))
    }

    pub fn provider(&self) -> &ProviderClient {
        &self.provider
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Query plus the effective band (label band with explicit overrides).
    pub fn plan(&self, req: &SearchRequest) -> QueryPlan {
        let mut plan = build_query(QueryInputs {
            topic: Topic::parse(req.topic()),
            budget: req.budget(),
            screen: req.screen(),
            os: req.os(),
            broaden: req.broaden(),
        });
        plan.band = plan.band.with_overrides(req.min_price, req.max_price);
        plan
    }

    pub async fn search(&self, req: &SearchRequest) -> AppResult<SearchResponse> {
        let plan = self.plan(req);
        let page = req.page();
        let page_size = req.page_size(self.max_page_size);
        let broaden = req.broaden();
        let brands = req.brand_filter();

        let body = ProviderSearch::new(
            plan.query.clone(),
            fetch_limit(page, page_size, broaden, self.provider.max_limit()),
            plan.band,
        );

        let records = match self.provider.search(&body).await? {
            SearchOutcome::Records(records) => records,
            SearchOutcome::Degraded { note } => {
                return Ok(SearchResponse {
                    ok: true,
                    query: plan.query,
                    total: 0,
                    page,
                    page_size,
                    brands: Vec::new(),
                    results: Vec::new(),
                    debug: Some(note),
                });
            }
        };

        let fetched = records.len();
        let products = self.normalize_all(&records);
        let refined = refine(products, plan.topic, broaden, brands, page, page_size);
        info!(
            query = %plan.query,
            fetched,
            total = refined.page.total,
            "search complete"
        );

        Ok(SearchResponse {
            ok: true,
            query: plan.query,
            total: refined.page.total,
            page,
            page_size,
            brands: refined.brands,
            results: refined.page.items,
            debug: None,
        })
    }

    pub fn normalize_all(&self, records: &[Value]) -> Vec<Product> {
        records.iter().map(|r| self.normalizer.normalize(r)).collect()
    }
}

/// Everything after the fetch. Facets come from the relevant, deduplicated
/// set before the brand allow list narrows it.
pub fn refine(
    products: Vec<Product>,
    topic: Topic,
    broaden: bool,
    brands: Option<&[String]>,
    page: u32,
    page_size: u32,
) -> Refined {
    let relevant: Vec<Product> = products
        .into_iter()
        .filter(|p| is_relevant(topic, p, broaden))
        .collect();
    let unique = dedupe_products(relevant);
    let facets = brand_facets(&unique);
    let selected = match brands {
        Some(allowed) => filter_brands(unique, allowed),
        None => unique,
    };
    Refined {
        page: paginate(selected, page, page_size),
        brands: facets,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SearchService;
    use crate::services::provider_client::test_support::search_settings;

    pub fn search_service(base_url: &str, api_key: &str) -> SearchService {
        SearchService::from_settings(&search_settings(base_url, api_key)).unwrap()
    }
}
