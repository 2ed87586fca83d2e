use serde::{Deserialize, Serialize};

pub const DEFAULT_TOPIC: &str = "laptop";
pub const DEFAULT_BUDGET: &str = "$500–$900";
pub const DEFAULT_SCREEN: &str = "14";
pub const DEFAULT_OS: &str = "Windows";
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Inbound `/api/search` body. Every field is optional; an empty body is the
/// all-defaults search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub topic: Option<String>,
    pub budget: Option<String>,
    pub screen: Option<String>,
    pub os: Option<String>,
    pub brands: Option<Vec<String>>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub broaden: Option<bool>,
}

impl SearchRequest {
    pub fn topic(&self) -> &str {
        self.topic.as_deref().unwrap_or(DEFAULT_TOPIC)
    }

    pub fn budget(&self) -> &str {
        self.budget.as_deref().unwrap_or(DEFAULT_BUDGET)
    }

    pub fn screen(&self) -> &str {
        self.screen.as_deref().unwrap_or(DEFAULT_SCREEN)
    }

    pub fn os(&self) -> &str {
        self.os.as_deref().unwrap_or(DEFAULT_OS)
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn page_size(&self, max: u32) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, max.max(1))
    }

    pub fn broaden(&self) -> bool {
        self.broaden.unwrap_or(false)
    }

    /// Non-empty brand allow list, if any.
    pub fn brand_filter(&self) -> Option<&[String]> {
        self.brands
            .as_deref()
            .filter(|brands| brands.iter().any(|b| !b.is_empty()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub currency: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Specs {
    pub screen: String,
    pub os: String,
    #[serde(rename = "weightKg", skip_serializing_if = "Option::is_none", default)]
    pub weight_kg: Option<f64>,
}

/// Uniform product shape returned to the UI regardless of how the provider
/// spelled its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub brand: String,
    pub price: Price,
    pub image: String,
    pub url: String,
    pub specs: Specs,
    pub why: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub ok: bool,
    pub query: String,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
    pub brands: Vec<String>,
    pub results: Vec<Product>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub debug: Option<String>,
}
