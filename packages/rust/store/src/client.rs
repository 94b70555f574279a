//! HTTP client for the target store's REST API.
//!
//! Every create call goes through [`StoreClient::post_json`], which sorts the
//! outcome into the error taxonomy the pipeline relies on: transport failures
//! ([`CatalogError::Network`]), store-reported errors in the body
//! ([`CatalogError::Rejected`]), bare HTTP failures ([`CatalogError::Http`]),
//! and undecodable bodies ([`CatalogError::Parse`]).

use std::time::Duration;

use catalogsync_shared::{
    CatalogError, CategoryRef, ImportConfig, ProductPayload, RelationDescriptor, Result, StoreId,
};
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::extract::{ExtractorRegistry, record_name};
use crate::media::MediaFile;

/// User-Agent string for store requests.
const USER_AGENT: &str = concat!("catalogsync/", env!("CARGO_PKG_VERSION"));

/// Client bound to one store instance.
pub struct StoreClient {
    client: Client,
    /// Base URL joined with the API prefix, without trailing slash.
    api_base: String,
    registry: ExtractorRegistry,
}

impl StoreClient {
    /// Create a client for the store described by `config`.
    pub fn new(config: &ImportConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.store_timeout_secs))
            .build()
            .map_err(|e| CatalogError::Network(format!("failed to build HTTP client: {e}")))?;

        let api_base = join_api_base(config.store_url.as_str(), &config.api_prefix);

        Ok(Self {
            client,
            api_base,
            registry: ExtractorRegistry::new(),
        })
    }

    /// Replace the identifier strategies (e.g. to support a new record shape).
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Create one category and normalize the returned record.
    ///
    /// The returned [`CategoryRef`] always carries `name` as requested; a
    /// different name reported by the store is logged and ignored.
    pub async fn create_category(&self, name: &str, slug: Option<&str>) -> Result<CategoryRef> {
        let mut data = json!({ "name": name });
        if let Some(slug) = slug {
            data["slug"] = Value::String(slug.to_string());
        }

        let record = self
            .post_json("categories", &json!({ "data": data }))
            .await?;

        let id = self.registry.extract_id(&record)?;

        if let Some(reported) = record_name(&record) {
            if reported != name {
                warn!(requested = name, reported, %id, "store reported a different category name");
            }
        }

        Ok(CategoryRef {
            name: name.to_string(),
            id,
        })
    }

    /// Create one product and return its store identifier.
    pub async fn create_product(&self, payload: &ProductPayload) -> Result<StoreId> {
        let body = json!({ "data": payload });
        let record = self.post_json("products", &body).await?;
        self.registry.extract_id(&record)
    }

    /// Upload `file` and bind it to the record and field named by `relation`.
    pub async fn upload(&self, file: MediaFile, relation: &RelationDescriptor) -> Result<()> {
        let url = self.endpoint("upload");

        let mut part = Part::bytes(file.bytes).file_name(file.filename.clone());
        if let Some(content_type) = file.content_type.as_deref() {
            part = part
                .mime_str(content_type)
                .map_err(|e| CatalogError::validation(format!("bad content type: {e}")))?;
        }

        let form = Form::new()
            .part("files", part)
            .text("ref", relation.reference_uid())
            .text("refId", relation.reference_id.to_string())
            .text("field", relation.field_name.clone());

        debug!(%url, filename = %file.filename, ref_id = %relation.reference_id, "uploading media");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| CatalogError::Network(format!("{url}: {e}")))?;

        // Any 2xx counts as attached; the reply body is optional.
        settle_response(&url, response).await.map(|_| ())
    }

    /// POST a JSON body to `path` under the API base and return the decoded reply.
    async fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.endpoint(path);
        debug!(%url, "store request");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| CatalogError::Network(format!("{url}: {e}")))?;

        interpret_response(&url, response).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

/// Read a store response and decode its JSON record.
async fn interpret_response(url: &str, response: reqwest::Response) -> Result<Value> {
    settle_response(url, response)
        .await?
        .map_err(|e| CatalogError::parse(format!("{url}: invalid JSON response: {e}")))
}

/// Classify a store response, handing back the body decode attempt.
///
/// A non-null `error` member wins over the status code: the store answers
/// validation failures with a 4xx and a structured error body.
async fn settle_response(
    url: &str,
    response: reqwest::Response,
) -> Result<serde_json::Result<Value>> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| CatalogError::Network(format!("{url}: body read failed: {e}")))?;

    let parsed = serde_json::from_slice::<Value>(&bytes);

    if let Ok(value) = &parsed {
        if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(String::from)
                .unwrap_or_else(|| error.to_string());
            return Err(CatalogError::rejected(message));
        }
    }

    if !status.is_success() {
        return Err(CatalogError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(parsed)
}

/// Join the store base URL and API prefix into one slash-normalized base.
fn join_api_base(base_url: &str, api_prefix: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let prefix = api_prefix.trim_matches('/');
    if prefix.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{prefix}")
    }
}
