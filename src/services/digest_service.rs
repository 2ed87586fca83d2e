use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::config::JobSettings;
use crate::error::AppResult;
use crate::models::{DigestSummary, Product, SearchRequest, Subscriber};
use crate::repositories::Store;
use crate::services::{EmailService, SearchService, Topic, ANY_OS, ANY_SCREEN};
use crate::utils::{digest_body, DIGEST_SUBJECT};

/// Subscribers sharing a topic and a $100 max-price bucket get one digest.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DigestGroup {
    pub topic: Topic,
    pub bucket: i64,
}

impl DigestGroup {
    pub fn for_subscriber(sub: &Subscriber) -> Self {
        let max_price = sub.max_price.filter(|p| p.is_finite() && *p > 0.0).unwrap_or(0.0);
        Self {
            topic: Topic::parse(&sub.topic),
            bucket: ((max_price / 100.0).floor() * 100.0) as i64,
        }
    }

    pub fn search_request(&self, picks: u32) -> SearchRequest {
        SearchRequest {
            topic: Some(self.topic.as_str().to_string()),
            budget: Some("Any".to_string()),
            screen: Some(ANY_SCREEN.to_string()),
            os: Some(ANY_OS.to_string()),
            page: Some(0),
            page_size: Some(picks),
            max_price: (self.bucket > 0).then_some(self.bucket as f64),
            ..Default::default()
        }
    }
}

pub fn group_subscribers(subscribers: &[Subscriber]) -> BTreeMap<DigestGroup, Vec<String>> {
    let mut groups: BTreeMap<DigestGroup, Vec<String>> = BTreeMap::new();
    for sub in subscribers {
        groups
            .entry(DigestGroup::for_subscriber(sub))
            .or_default()
            .push(sub.email.clone());
    }
    groups
}

#[derive(Clone)]
pub struct DigestService {
    search: SearchService,
    email: EmailService,
    settings: JobSettings,
}

impl DigestService {
    pub fn new(search: SearchService, email: EmailService, settings: JobSettings) -> Self {
        Self {
            search,
            email,
            settings,
        }
    }

    pub async fn run(&self, store: &dyn Store) -> AppResult<DigestSummary> {
        let subscribers = store
            .list_subscribers(self.settings.digest_max_subscribers)
            .await?;
        let groups = group_subscribers(&subscribers);
        info!(subscribers = subscribers.len(), groups = groups.len(), "weekly digest started");

        let mut summary = DigestSummary {
            ok: true,
            groups: groups.len(),
            ..Default::default()
        };
        for (group, recipients) in &groups {
            match self.send_group(group, recipients).await {
                Ok(sent) => summary.emails_sent += sent,
                Err(e) => {
                    warn!(topic = group.topic.as_str(), bucket = group.bucket, "digest group failed: {}", e);
                    summary.failures += 1;
                }
            }
        }

        info!(
            emails_sent = summary.emails_sent,
            failures = summary.failures,
            "weekly digest finished"
        );
        Ok(summary)
    }

    async fn send_group(&self, group: &DigestGroup, recipients: &[String]) -> AppResult<usize> {
        let picks = self.top_picks(group).await?;
        if picks.is_empty() {
            return Ok(0);
        }
        self.email
            .send_batched(recipients, DIGEST_SUBJECT, &digest_body(&picks))
            .await
    }

    async fn top_picks(&self, group: &DigestGroup) -> AppResult<Vec<Product>> {
        let picks = self.settings.digest_picks;
        let response = self.search.search(&group.search_request(picks)).await?;
        Ok(response.results.into_iter().take(picks as usize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::AppError;
    use crate::repositories::MockStore;
    use crate::services::email_service::test_support::email_settings;
    use crate::services::search_service::test_support::search_service;
    use chrono::Utc;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sub(email: &str, topic: &str, max_price: Option<f64>) -> Subscriber {
        Subscriber {
            email: email.to_string(),
            topic: topic.to_string(),
            max_price,
            created_at: Utc::now(),
        }
    }

    fn service(search_base: &str, email_base: &str) -> DigestService {
        DigestService::new(
            search_service(search_base, "k"),
            EmailService::new(email_settings(email_base, "re_key")).unwrap(),
            Config::default().jobs,
        )
    }

    #[test]
    fn groups_by_topic_and_hundred_dollar_bucket() {
        let subs = vec![
            sub("a@u.edu", "laptop", Some(450.0)),
            sub("b@u.edu", "laptop", Some(499.99)),
            sub("c@u.edu", "laptop", Some(500.0)),
            sub("d@u.edu", "hubs", None),
            sub("e@u.edu", "toasters", None),
        ];
        let groups = group_subscribers(&subs);
        assert_eq!(groups.len(), 4);
        assert_eq!(
            groups[&DigestGroup { topic: Topic::Laptop, bucket: 400 }],
            vec!["a@u.edu", "b@u.edu"]
        );
        assert_eq!(
            groups[&DigestGroup { topic: Topic::Laptop, bucket: 0 }],
            vec!["e@u.edu"]
        );
    }

    #[test]
    fn group_search_is_broad_and_capped_by_bucket() {
        let req = DigestGroup { topic: Topic::Monitors, bucket: 300 }.search_request(6);
        assert_eq!(req.topic(), "monitors");
        assert_eq!(req.budget(), "Any");
        assert_eq!(req.os(), ANY_OS);
        assert_eq!(req.max_price, Some(300.0));

        let open = DigestGroup { topic: Topic::Hubs, bucket: 0 }.search_request(6);
        assert_eq!(open.max_price, None);
    }

    #[tokio::test]
    async fn store_failure_aborts_the_run() {
        let mut store = MockStore::new();
        store
            .expect_list_subscribers()
            .returning(|_| Err(AppError::Store("offline".to_string())));

        let digest = service("http://127.0.0.1:9", "http://127.0.0.1:9");
        assert!(digest.run(&store).await.is_err());
    }

    #[tokio::test]
    async fn sends_one_digest_per_group_and_counts_failures() {
        let provider = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "title": "Dell 24 inch monitor", "brand": "Dell", "price": 129},
                {"id": "2", "title": "Anker USB-C hub", "brand": "Anker", "price": 35}
            ])))
            .mount(&provider)
            .await;

        let mailer = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&mailer)
            .await;

        let mut store = MockStore::new();
        store.expect_list_subscribers().returning(|limit| {
            assert_eq!(limit, 1000);
            Ok(vec![
                sub("a@u.edu", "monitors", None),
                sub("b@u.edu", "hubs", Some(80.0)),
                sub("c@u.edu", "backpacks", None),
            ])
        });

        let digest = service(&provider.uri(), &mailer.uri());
        let summary = digest.run(&store).await.unwrap();
        assert_eq!(summary.groups, 3);
        // backpacks has no relevant picks, so nothing is sent for it
        assert_eq!(summary.emails_sent, 2);
        assert_eq!(summary.failures, 0);
    }

    #[tokio::test]
    async fn failing_group_does_not_stop_the_others() {
        let provider = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": "1", "title": "Dell 24 inch monitor", "brand": "Dell", "price": 129}
            ])))
            .mount(&provider)
            .await;

        let mailer = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mailer)
            .await;

        let mut store = MockStore::new();
        store
            .expect_list_subscribers()
            .returning(|_| Ok(vec![sub("a@u.edu", "monitors", None), sub("b@u.edu", "laptop", None)]));

        let digest = service(&provider.uri(), &mailer.uri());
        let summary = digest.run(&store).await.unwrap();
        assert_eq!(summary.groups, 2);
        assert_eq!(summary.failures, 1);
        assert_eq!(summary.emails_sent, 0);
    }
}
