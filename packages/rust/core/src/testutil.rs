//! Helpers shared by the pipeline tests.

use catalogsync_shared::ImportConfig;
use serde_json::{Value, json};
use url::Url;
use wiremock::MockServer;

/// Config with both the catalog and the store served by `server`.
pub(crate) fn config_for(server: &MockServer) -> ImportConfig {
    ImportConfig {
        source_url: Url::parse(&format!("{}/products", server.uri())).unwrap(),
        source_timeout_secs: 5,
        store_url: Url::parse(&server.uri()).unwrap(),
        api_prefix: "/api".into(),
        category_slugs: false,
        store_timeout_secs: 5,
    }
}

/// Config whose store points at a port nothing listens on.
pub(crate) fn closed_port_config() -> ImportConfig {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    ImportConfig {
        source_url: Url::parse(&format!("http://127.0.0.1:{port}/products")).unwrap(),
        source_timeout_secs: 5,
        store_url: Url::parse(&format!("http://127.0.0.1:{port}")).unwrap(),
        api_prefix: "/api".into(),
        category_slugs: false,
        store_timeout_secs: 5,
    }
}

/// A catalog entry whose image is served by `server` under `/img/<id>.jpg`.
pub(crate) fn catalog_item(server: &MockServer, id: u64, title: &str, category: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": 10.5 + id as f64,
        "description": format!("{title} description"),
        "category": category,
        "image": format!("{}/img/{id}.jpg", server.uri()),
        "rating": {"rate": 4.2, "count": 10 * id},
    })
}
