use tracing::{debug, info, warn};

use crate::config::JobSettings;
use crate::error::AppResult;
use crate::models::{Watch, WatchCheckSummary};
use crate::repositories::Store;
use crate::services::{extract_price, Delivery, EmailService, Normalizer, ProviderClient};
use crate::utils::{price_drop_body, PRICE_DROP_SUBJECT};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WatchOutcome {
    /// The provider had no usable price for the product.
    NoPrice,
    Updated { price: f64 },
    Alerted { price: f64 },
    /// An alert was due but no email went out; the price is left unrecorded
    /// so the next run tries again.
    Unsent { price: f64 },
}

/// Alert when the price is at or below the watch threshold (or the last
/// seen price when no threshold was set) and is a new low, so the same
/// price is announced once.
pub fn should_alert(watch: &Watch, price: f64) -> bool {
    let Some(threshold) = watch.alert_threshold() else {
        return false;
    };
    price <= threshold && watch.last_price.map_or(true, |last| price < last)
}

#[derive(Clone)]
pub struct PriceWatchService {
    provider: ProviderClient,
    normalizer: Normalizer,
    email: EmailService,
    settings: JobSettings,
}

impl PriceWatchService {
    pub fn new(
        provider: ProviderClient,
        normalizer: Normalizer,
        email: EmailService,
        settings: JobSettings,
    ) -> Self {
        Self {
            provider,
            normalizer,
            email,
            settings,
        }
    }

    pub async fn run(&self, store: &dyn Store) -> AppResult<WatchCheckSummary> {
        let watches = store.list_watches(self.settings.watch_max_rows).await?;
        info!(watches = watches.len(), "price watch check started");

        let mut summary = WatchCheckSummary {
            ok: true,
            checked: watches.len(),
            ..Default::default()
        };
        for watch in &watches {
            match self.check(store, watch).await {
                Ok(WatchOutcome::Alerted { .. }) => summary.alerts += 1,
                Ok(_) => {}
                Err(e) => {
                    warn!(watch_id = watch.id, product_id = %watch.product_id, "watch check failed: {}", e);
                    summary.failures += 1;
                }
            }
        }

        info!(
            alerts = summary.alerts,
            failures = summary.failures,
            "price watch check finished"
        );
        Ok(summary)
    }

    pub async fn check(&self, store: &dyn Store, watch: &Watch) -> AppResult<WatchOutcome> {
        let detail = self.provider.product_detail(&watch.product_id).await?;
        let Some(price) = extract_price(&detail) else {
            debug!(product_id = %watch.product_id, "no price in product detail");
            return Ok(WatchOutcome::NoPrice);
        };

        if !should_alert(watch, price) {
            store.update_watch_price(watch.id, price).await?;
            return Ok(WatchOutcome::Updated { price });
        }

        let product = self.normalizer.normalize(&detail);
        let body = price_drop_body(&product.title, price, &product.price.currency, &product.url);
        let message = self
            .email
            .message(vec![watch.email.clone()], PRICE_DROP_SUBJECT, body);
        if self.email.send(&message).await? == Delivery::Skipped {
            info!(watch_id = watch.id, "price drop alert not sent; will retry next run");
            return Ok(WatchOutcome::Unsent { price });
        }
        store.update_watch_price(watch.id, price).await?;
        Ok(WatchOutcome::Alerted { price })
    }
}
