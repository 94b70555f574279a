//! Remote image download and attachment.

use std::time::Duration;

use catalogsync_shared::{CatalogError, RelationDescriptor, Result, StoreId};
use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use crate::client::StoreClient;

/// User-Agent string for image downloads.
const USER_AGENT: &str = concat!("catalogsync/", env!("CARGO_PKG_VERSION"));

/// Filename used when the image URL has no usable last path segment.
const FALLBACK_FILENAME: &str = "image";

/// A downloaded file ready for upload.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// `Content-Type` reported by the origin, if any.
    pub content_type: Option<String>,
}

/// Downloads remote images and attaches them to store records.
pub struct MediaUploader {
    client: Client,
}

impl MediaUploader {
    /// Create an uploader whose downloads time out after `timeout_secs`.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| CatalogError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Download `image_url` and bind it to the `image` field of `product_id`.
    ///
    /// Returns the uploaded filename.
    #[instrument(skip_all, fields(image = %image_url, product_id = %product_id))]
    pub async fn attach(
        &self,
        store: &StoreClient,
        image_url: &str,
        product_id: &StoreId,
    ) -> Result<String> {
        let url = Url::parse(image_url)
            .map_err(|e| CatalogError::validation(format!("invalid image URL '{image_url}': {e}")))?;

        let file = self.download(&url).await?;
        let filename = file.filename.clone();

        let relation = RelationDescriptor::product_image(product_id.clone());
        store.upload(file, &relation).await?;

        Ok(filename)
    }

    /// Fetch the bytes behind `url`.
    pub async fn download(&self, url: &Url) -> Result<MediaFile> {
        let response = self
            .client
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

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Network(format!("{url}: body read failed: {e}")))?;

        debug!(%url, bytes = bytes.len(), "image downloaded");

        Ok(MediaFile {
            filename: filename_from_url(url),
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}

/// Last non-empty path segment of `url`, still percent-encoded.
pub fn filename_from_url(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(String::from)
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}
