use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::error::{AppError, AppResult};
use crate::models::{Click, Subscriber, Watch};
use crate::repositories::Store;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS subscribers (
        email TEXT NOT NULL,
        topic TEXT NOT NULL,
        max_price REAL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        PRIMARY KEY (email, topic)
    );
    CREATE TABLE IF NOT EXISTS clicks (
        id TEXT PRIMARY KEY,
        product_id TEXT NOT NULL,
        query TEXT NOT NULL,
        rank INTEGER NOT NULL,
        user_agent TEXT NOT NULL,
        referrer TEXT NOT NULL,
        outbound_url TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_clicks_product ON clicks(product_id);
    CREATE TABLE IF NOT EXISTS watches (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT NOT NULL,
        product_id TEXT NOT NULL,
        threshold REAL,
        last_price REAL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (email, product_id)
    );";

fn connect(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory: {}", parent.display())
            })?;
        }
    }
    Connection::open(path).with_context(|| format!("Failed to open store: {}", path.display()))
}

/// SQLite-backed [`Store`]. One connection guarded by a mutex; statements run
/// on the blocking pool.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let conn = connect(path.as_ref())?;
        Ok(Self::init(conn)?)
    }

    pub fn in_memory() -> AppResult<Self> {
        Ok(Self::init(Connection::open_in_memory()?)?)
    }

    fn init(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| AppError::Store("store connection poisoned".to_string()))?;
            f(&*guard).map_err(AppError::from)
        })
        .await?
    }
}

fn subscriber_from_row(row: &Row<'_>) -> rusqlite::Result<Subscriber> {
    Ok(Subscriber {
        email: row.get(0)?,
        topic: row.get(1)?,
        max_price: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn watch_from_row(row: &Row<'_>) -> rusqlite::Result<Watch> {
    Ok(Watch {
        id: row.get(0)?,
        email: row.get(1)?,
        product_id: row.get(2)?,
        threshold: row.get(3)?,
        last_price: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

#[async_trait]
impl Store for SqliteStore {
    async fn upsert_subscriber(
        &self,
        email: &str,
        topic: &str,
        max_price: Option<f64>,
    ) -> AppResult<()> {
        let (email, topic) = (email.to_string(), topic.to_string());
        let now: DateTime<Utc> = Utc::now();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO subscribers (email, topic, max_price, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 ON CONFLICT(email, topic) DO UPDATE SET
                    max_price = excluded.max_price,
                    updated_at = excluded.updated_at",
                params![email, topic, max_price, now],
            )
            .map(|_| ())
        })
        .await
    }

    async fn list_subscribers(&self, limit: usize) -> AppResult<Vec<Subscriber>> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT email, topic, max_price, created_at
                 FROM subscribers
                 ORDER BY created_at ASC, email ASC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit as i64], subscriber_from_row)?;
            rows.collect()
        })
        .await
    }

    async fn insert_click(&self, click: Click) -> AppResult<()> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO clicks
                    (id, product_id, query, rank, user_agent, referrer, outbound_url, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    click.id.to_string(),
                    click.product_id,
                    click.query,
                    click.rank,
                    click.user_agent,
                    click.referrer,
                    click.outbound_url,
                    click.created_at
                ],
            )
            .map(|_| ())
        })
        .await
    }

    async fn upsert_watch(
        &self,
        email: &str,
        product_id: &str,
        threshold: Option<f64>,
        last_price: Option<f64>,
    ) -> AppResult<()> {
        let (email, product_id) = (email.to_string(), product_id.to_string());
        let now = Utc::now();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO watches (email, product_id, threshold, last_price, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                 ON CONFLICT(email, product_id) DO UPDATE SET
                    threshold = excluded.threshold,
                    last_price = excluded.last_price,
                    updated_at = excluded.updated_at",
                params![email, product_id, threshold, last_price, now],
            )
            .map(|_| ())
        })
        .await
    }

    async fn delete_watch(&self, email: &str, product_id: &str) -> AppResult<bool> {
        let (email, product_id) = (email.to_string(), product_id.to_string());
        self.with_conn(move |conn| {
            conn.execute(
                "DELETE FROM watches WHERE email = ?1 AND product_id = ?2",
                params![email, product_id],
            )
            .map(|rows| rows > 0)
        })
        .await
    }

    async fn list_watches(&self, limit: usize) -> AppResult<Vec<Watch>> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, email, product_id, threshold, last_price, created_at, updated_at
                 FROM watches
                 ORDER BY id ASC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit as i64], watch_from_row)?;
            rows.collect()
        })
        .await
    }

    async fn update_watch_price(&self, id: i64, last_price: f64) -> AppResult<()> {
        let now = Utc::now();
        self.with_conn(move |conn| {
            conn.execute(
                "UPDATE watches SET last_price = ?2, updated_at = ?3 WHERE id = ?1",
                params![id, last_price, now],
            )
            .map(|_| ())
        })
        .await
    }
}

#[cfg(test)]
impl SqliteStore {
    pub(crate) async fn recent_clicks(&self, limit: usize) -> AppResult<Vec<Click>> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, product_id, query, rank, user_agent, referrer, outbound_url, created_at
                 FROM clicks
                 ORDER BY created_at DESC
                 LIMIT ?1",
            )?;
            let rows = stmt.query_map(params![limit as i64], click_from_row)?;
            rows.collect()
        })
        .await
    }
}

#[cfg(test)]
fn click_from_row(row: &Row<'_>) -> rusqlite::Result<Click> {
    let id: String = row.get(0)?;
    Ok(Click {
        id: uuid::Uuid::parse_str(&id).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        product_id: row.get(1)?,
        query: row.get(2)?,
        rank: row.get(3)?,
        user_agent: row.get(4)?,
        referrer: row.get(5)?,
        outbound_url: row.get(6)?,
        created_at: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn click(product_id: &str) -> Click {
        Click {
            id: Uuid::new_v4(),
            product_id: product_id.to_string(),
            query: "student laptop".to_string(),
            rank: 2,
            user_agent: "test-agent".to_string(),
            referrer: String::new(),
            outbound_url: "https://shop.test/p".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn subscriber_upsert_is_keyed_on_email_and_topic() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_subscriber("a@b.co", "laptop", Some(500.0)).await.unwrap();
        store.upsert_subscriber("a@b.co", "laptop", Some(700.0)).await.unwrap();
        store.upsert_subscriber("a@b.co", "hubs", None).await.unwrap();

        let subs = store.list_subscribers(10).await.unwrap();
        assert_eq!(subs.len(), 2);
        let laptop = subs.iter().find(|s| s.topic == "laptop").unwrap();
        assert_eq!(laptop.max_price, Some(700.0));
    }

    #[tokio::test]
    async fn subscriber_listing_honours_limit() {
        let store = SqliteStore::in_memory().unwrap();
        for i in 0..5 {
            store
                .upsert_subscriber(&format!("s{i}@uni.edu"), "laptop", None)
                .await
                .unwrap();
        }
        assert_eq!(store.list_subscribers(3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn clicks_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let original = click("p1");
        store.insert_click(original.clone()).await.unwrap();

        let clicks = store.recent_clicks(5).await.unwrap();
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0].id, original.id);
        assert_eq!(clicks[0].rank, 2);
        assert_eq!(clicks[0].outbound_url, "https://shop.test/p");
    }

    #[tokio::test]
    async fn watch_upsert_delete_and_price_update() {
        let store = SqliteStore::in_memory().unwrap();
        store.upsert_watch("a@b.co", "p1", Some(400.0), None).await.unwrap();
        store.upsert_watch("a@b.co", "p1", Some(350.0), Some(420.0)).await.unwrap();
        store.upsert_watch("c@d.co", "p1", None, None).await.unwrap();

        let watches = store.list_watches(10).await.unwrap();
        assert_eq!(watches.len(), 2);
        let first = &watches[0];
        assert_eq!(first.threshold, Some(350.0));
        assert_eq!(first.last_price, Some(420.0));

        store.update_watch_price(first.id, 399.0).await.unwrap();
        let updated = store.list_watches(10).await.unwrap();
        assert_eq!(updated[0].last_price, Some(399.0));
        assert_eq!(updated[0].threshold, Some(350.0));

        assert!(store.delete_watch("a@b.co", "p1").await.unwrap());
        assert!(!store.delete_watch("a@b.co", "p1").await.unwrap());
        assert_eq!(store.list_watches(10).await.unwrap().len(), 1);
    }

    #[test]
    fn open_creates_parent_directory() {
        let dir = std::env::temp_dir().join(format!("campus-deals-{}", Uuid::new_v4()));
        let path = dir.join("nested").join("store.db");
        assert!(SqliteStore::open(&path).is_ok());
        assert!(path.exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn open_under_a_file_is_an_internal_error() {
        let file = std::env::temp_dir().join(format!("campus-deals-{}", Uuid::new_v4()));
        fs::write(&file, b"not a directory").unwrap();
        let result = SqliteStore::open(file.join("store.db"));
        assert!(matches!(result, Err(AppError::Internal(_))));
        let _ = fs::remove_file(file);
    }
}
