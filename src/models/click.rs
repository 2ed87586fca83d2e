use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Query string of `/api/go/{product_id}`. `rank` is kept as text so a
/// malformed value degrades to 0 instead of rejecting the redirect.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClickQuery {
    pub url: Option<String>,
    pub rank: Option<String>,
    pub query: Option<String>,
}

impl ClickQuery {
    pub fn rank(&self) -> i64 {
        self.rank
            .as_deref()
            .and_then(|r| r.trim().parse::<f64>().ok())
            .filter(|r| r.is_finite())
            .map(|r| r as i64)
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Click {
    pub id: Uuid,
    pub product_id: String,
    pub query: String,
    pub rank: i64,
    pub user_agent: String,
    pub referrer: String,
    pub outbound_url: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_parses_leniently() {
        let mut q = ClickQuery::default();
        assert_eq!(q.rank(), 0);
        q.rank = Some("3".to_string());
        assert_eq!(q.rank(), 3);
        q.rank = Some("abc".to_string());
        assert_eq!(q.rank(), 0);
    }
}
