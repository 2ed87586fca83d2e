use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::subscription::EMAIL_RE;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct WatchRequest {
    #[serde(default)]
    #[validate(regex = "EMAIL_RE")]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub product_id: String,
    #[validate(range(min = 0.0))]
    pub threshold: Option<f64>,
    #[validate(range(min = 0.0))]
    pub last_price: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoveWatchQuery {
    pub email: Option<String>,
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watch {
    pub id: i64,
    pub email: String,
    pub product_id: String,
    pub threshold: Option<f64>,
    pub last_price: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Watch {
    /// Price at or below which the owner wants to hear about it.
    pub fn alert_threshold(&self) -> Option<f64> {
        self.threshold.or(self.last_price)
    }
}
