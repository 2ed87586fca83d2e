use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Click, Subscriber, Watch};

/// Row store behind subscriptions, click logging and price watches.
/// Upserts resolve key conflicts with last-write-wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    /// Keyed on `(email, topic)`.
    async fn upsert_subscriber(
        &self,
        email: &str,
        topic: &str,
        max_price: Option<f64>,
    ) -> AppResult<()>;

    async fn list_subscribers(&self, limit: usize) -> AppResult<Vec<Subscriber>>;

    async fn insert_click(&self, click: Click) -> AppResult<()>;

    /// Keyed on `(email, product_id)`.
    async fn upsert_watch(
        &self,
        email: &str,
        product_id: &str,
        threshold: Option<f64>,
        last_price: Option<f64>,
    ) -> AppResult<()>;

    /// Returns whether a row was removed.
    async fn delete_watch(&self, email: &str, product_id: &str) -> AppResult<bool>;

    async fn list_watches(&self, limit: usize) -> AppResult<Vec<Watch>>;

    /// Records the latest observed price. The threshold is left as is.
    async fn update_watch_price(&self, id: i64, last_price: f64) -> AppResult<()>;
}
