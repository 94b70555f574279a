//! Source catalog retrieval and category derivation.
//!
//! The catalog is a single unauthenticated endpoint returning every product
//! as one JSON array. There is no pagination; a failed fetch leaves the
//! import with nothing to do, so every error here is fatal to the run.

mod derive;

use std::time::Duration;

use catalogsync_shared::{CatalogError, Result, SourceProduct};
use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

pub use derive::derive_categories;

/// Default timeout in seconds for the catalog request.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User-Agent string for catalog requests.
const USER_AGENT: &str = concat!("catalogsync/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Fetch options
// ---------------------------------------------------------------------------

/// Configuration for the catalog fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Timeout for the HTTP request in seconds.
    pub timeout_secs: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Fetch and decode the full product list from `url`.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_catalog(url: &Url, opts: &FetchOptions) -> Result<Vec<SourceProduct>> {
    let client = build_client(opts)?;

    info!("fetching catalog");

    let response = client
        .get(url.as_str())
        .send()
        .await
        .map_err(|e| CatalogError::Network(format!("{url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| CatalogError::Network(format!("{url}: body read failed: {e}")))?;

    debug!(bytes = body.len(), "catalog body received");

    let products: Vec<SourceProduct> = serde_json::from_slice(&body)
        .map_err(|e| CatalogError::parse(format!("{url}: invalid catalog JSON: {e}")))?;

    info!(products = products.len(), "catalog fetched");

    Ok(products)
}

/// Build an HTTP client with the configured timeout.
fn build_client(opts: &FetchOptions) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(opts.timeout_secs))
        .build()
        .map_err(|e| CatalogError::Network(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CATALOG: &str = r#"[
        {"id":1,"title":"Backpack","price":109.95,"description":"d","category":"men's clothing",
         "image":"https://cdn.example.com/img/backpack.jpg","rating":{"rate":3.9,"count":120}},
        {"id":2,"title":"Bracelet","price":695,"description":"d","category":"jewelery",
         "image":"https://cdn.example.com/img/bracelet.jpg","rating":{"rate":4.6,"count":400}}
    ]"#;

    #[tokio::test]
    async fn fetches_and_decodes_catalog() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/products"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_string(CATALOG),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/products", server.uri())).unwrap();
        let products = fetch_catalog(&url, &FetchOptions::default()).await.unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].title, "Backpack");
        assert_eq!(products[1].price, 695.0);
        assert_eq!(products[1].rating.count, 400);
    }

    #[tokio::test]
    async fn empty_catalog_is_not_an_error() {
        let server = MockServer::start().await;

        Mock::given(path("/products"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/products", server.uri())).unwrap();
        let products = fetch_catalog(&url, &FetchOptions::default()).await.unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn server_error_is_fatal() {
        let server = MockServer::start().await;

        Mock::given(path("/products"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/products", server.uri())).unwrap();
        let err = fetch_catalog(&url, &FetchOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Http { status: 503, .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(path("/products"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"products":[]}"#),
            )
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/products", server.uri())).unwrap();
        let err = fetch_catalog(&url, &FetchOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        // Bind-and-drop to get a port nothing listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let url = Url::parse(&format!("http://127.0.0.1:{port}/products")).unwrap();
        let err = fetch_catalog(&url, &FetchOptions::default())
            .await
            .unwrap_err();

        assert!(err.is_transport());
    }
}
