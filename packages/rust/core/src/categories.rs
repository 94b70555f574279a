//! Category registration: one concurrent create request per derived name.

use std::collections::HashMap;

use catalogsync_shared::{CatalogError, CategoryName, StoreId};
use catalogsync_store::{StoreClient, slugify};
use futures::future::join_all;
use tracing::{info, instrument, warn};

use crate::observer::{ImportEvent, ImportObserver};

/// Category name → store identifier, built once and read-only afterwards.
pub type CategoryMap = HashMap<CategoryName, StoreId>;

/// Result of registering a batch of categories.
#[derive(Debug, Default)]
pub struct CategoryOutcome {
    /// Successfully created categories.
    pub mapping: CategoryMap,
    /// Names whose creation failed, with the reason.
    pub failures: Vec<(CategoryName, CatalogError)>,
}

impl CategoryOutcome {
    /// Every request failed without reaching the store.
    pub fn store_unreachable(&self) -> bool {
        self.mapping.is_empty()
            && !self.failures.is_empty()
            && self.failures.iter().all(|(_, e)| e.is_transport())
    }
}

/// Create every category in `names` concurrently.
///
/// All requests settle before this returns. Each response is attributed to
/// the name that produced it; a failed name is logged, reported, and left
/// out of the mapping without affecting its siblings.
#[instrument(skip_all, fields(categories = names.len(), slugs = with_slugs))]
pub async fn register_categories(
    store: &StoreClient,
    names: &[CategoryName],
    with_slugs: bool,
    observer: &dyn ImportObserver,
) -> CategoryOutcome {
    let requests = names.iter().map(|name| {
        let slug = with_slugs
            .then(|| slugify(name))
            .filter(|s| !s.is_empty());
        async move { store.create_category(name, slug.as_deref()).await }
    });

    let results = join_all(requests).await;

    let mut outcome = CategoryOutcome::default();

    for (name, result) in names.iter().zip(results) {
        match result {
            Ok(category) => {
                info!(name = %category.name, id = %category.id, "category created");
                observer.on_event(&ImportEvent::CategoryCreated {
                    name: category.name.clone(),
                    id: category.id.clone(),
                });
                outcome.mapping.insert(category.name, category.id);
            }
            Err(e) => {
                warn!(name = %name, error = %e, "category creation failed");
                observer.on_event(&ImportEvent::CategoryFailed {
                    name: name.clone(),
                    error: e.to_string(),
                });
                outcome.failures.push((name.clone(), e));
            }
        }
    }

    info!(
        created = outcome.mapping.len(),
        failed = outcome.failures.len(),
        "category registration settled"
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::observer::RecordingObserver;
    use crate::testutil::{closed_port_config, config_for};

    fn names(list: &[&str]) -> Vec<CategoryName> {
        list.iter().map(|s| s.to_string()).collect()
    }

    async fn mount_category(server: &MockServer, name: &str, reply: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/api/categories"))
            .and(body_partial_json(json!({"data": {"name": name}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn every_shape_resolves_to_its_name() {
        let server = MockServer::start().await;
        mount_category(&server, "flat", json!({"id": 1, "name": "flat"})).await;
        mount_category(&server, "wrapped", json!({"data": {"id": 2, "name": "wrapped"}})).await;
        mount_category(
            &server,
            "attributed",
            json!({"id": 3, "attributes": {"name": "attributed"}}),
        )
        .await;
        mount_category(
            &server,
            "document",
            json!({"data": {"documentId": "d4", "attributes": {"name": "document"}}}),
        )
        .await;

        let store = StoreClient::new(&config_for(&server)).unwrap();
        let outcome = register_categories(
            &store,
            &names(&["flat", "wrapped", "attributed", "document"]),
            false,
            &RecordingObserver::new(),
        )
        .await;

        assert!(outcome.failures.is_empty());
        assert_eq!(outcome.mapping["flat"], StoreId::Numeric(1));
        assert_eq!(outcome.mapping["wrapped"], StoreId::Numeric(2));
        assert_eq!(outcome.mapping["attributed"], StoreId::Numeric(3));
        assert_eq!(outcome.mapping["document"], StoreId::Document("d4".into()));
    }

    #[tokio::test]
    async fn responses_are_zipped_by_request_not_arrival() {
        let server = MockServer::start().await;

        // "slow" answers last; it must still map to its own id.
        Mock::given(method("POST"))
            .and(path("/api/categories"))
            .and(body_partial_json(json!({"data": {"name": "slow"}})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": {"id": 10}}))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;
        mount_category(&server, "fast", json!({"data": {"id": 20}})).await;

        let store = StoreClient::new(&config_for(&server)).unwrap();
        let outcome = register_categories(
            &store,
            &names(&["slow", "fast"]),
            false,
            &RecordingObserver::new(),
        )
        .await;

        assert_eq!(outcome.mapping["slow"], StoreId::Numeric(10));
        assert_eq!(outcome.mapping["fast"], StoreId::Numeric(20));
    }

    #[tokio::test]
    async fn requests_are_in_flight_together() {
        let server = MockServer::start().await;
        for (name, id) in [("first", 1), ("second", 2)] {
            Mock::given(method("POST"))
                .and(path("/api/categories"))
                .and(body_partial_json(json!({"data": {"name": name}})))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(json!({"data": {"id": id}}))
                        .set_delay(Duration::from_millis(300)),
                )
                .mount(&server)
                .await;
        }

        let store = StoreClient::new(&config_for(&server)).unwrap();
        let started = Instant::now();
        let outcome = register_categories(
            &store,
            &names(&["first", "second"]),
            false,
            &RecordingObserver::new(),
        )
        .await;
        let elapsed = started.elapsed();

        assert_eq!(outcome.mapping.len(), 2);
        // Sequential requests would need at least 600ms.
        assert!(elapsed < Duration::from_millis(550), "took {elapsed:?}");
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_siblings() {
        let server = MockServer::start().await;
        mount_category(&server, "A", json!({"data": {"id": 1}})).await;
        mount_category(&server, "C", json!({"data": {"id": 3}})).await;
        Mock::given(method("POST"))
            .and(path("/api/categories"))
            .and(body_partial_json(json!({"data": {"name": "B"}})))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let store = StoreClient::new(&config_for(&server)).unwrap();
        let observer = RecordingObserver::new();
        let outcome =
            register_categories(&store, &names(&["A", "B", "C"]), false, &observer).await;

        assert_eq!(outcome.mapping.len(), 2);
        assert!(!outcome.mapping.contains_key("B"));
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, "B");
        assert!(!outcome.store_unreachable());

        assert!(observer.events().iter().any(|e| matches!(
            e,
            ImportEvent::CategoryFailed { name, .. } if name == "B"
        )));
    }

    #[tokio::test]
    async fn shapeless_record_is_a_failure_not_a_missing_id() {
        let server = MockServer::start().await;
        mount_category(&server, "A", json!({"data": {"name": "A"}})).await;

        let store = StoreClient::new(&config_for(&server)).unwrap();
        let outcome =
            register_categories(&store, &names(&["A"]), false, &RecordingObserver::new()).await;

        assert!(outcome.mapping.is_empty());
        assert!(matches!(outcome.failures[0].1, CatalogError::Shape { .. }));
    }

    #[tokio::test]
    async fn slugs_are_sent_when_enabled() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/categories"))
            .and(body_partial_json(
                json!({"data": {"name": "women's clothing", "slug": "women-s-clothing"}}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": 5}})))
            .expect(1)
            .mount(&server)
            .await;

        let store = StoreClient::new(&config_for(&server)).unwrap();
        let outcome = register_categories(
            &store,
            &names(&["women's clothing"]),
            true,
            &RecordingObserver::new(),
        )
        .await;

        assert_eq!(outcome.mapping["women's clothing"], StoreId::Numeric(5));
    }

    #[tokio::test]
    async fn unreachable_store_is_detected() {
        let store = StoreClient::new(&closed_port_config()).unwrap();
        let outcome =
            register_categories(&store, &names(&["A", "B"]), false, &RecordingObserver::new())
                .await;

        assert!(outcome.mapping.is_empty());
        assert!(outcome.store_unreachable());
    }

    #[tokio::test]
    async fn empty_input_issues_no_requests() {
        let server = MockServer::start().await;
        let store = StoreClient::new(&config_for(&server)).unwrap();
        let outcome = register_categories(&store, &[], false, &RecordingObserver::new()).await;

        assert!(outcome.mapping.is_empty());
        assert!(!outcome.store_unreachable());
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
