use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

pub static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SubscribeRequest {
    #[serde(default)]
    #[validate(regex = "EMAIL_RE")]
    pub email: String,
    pub topic: Option<String>,
    #[validate(range(min = 0.0))]
    pub max_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscriber {
    pub email: String,
    pub topic: String,
    pub max_price: Option<f64>,
    pub created_at: DateTime<Utc>,
}
