//! Product registration: sequential create-then-attach per product.

use catalogsync_shared::{CatalogError, ProductPayload, SourceProduct};
use catalogsync_store::{MediaUploader, StoreClient};
use tracing::{debug, info, instrument, warn};

use crate::categories::CategoryMap;
use crate::observer::{ImportEvent, ImportObserver};

/// Per-outcome counters for one product batch.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProductOutcome {
    pub created: usize,
    /// Category not present in the mapping.
    pub skipped: usize,
    /// Store reported an application-level error.
    pub rejected: usize,
    /// Any other create failure.
    pub failed: usize,
    pub images_attached: usize,
    pub images_failed: usize,
    /// Create requests that never reached the store.
    pub transport_failures: usize,
}

impl ProductOutcome {
    /// Create requests issued (skipped products never issue one).
    pub fn attempted(&self) -> usize {
        self.created + self.rejected + self.failed
    }

    /// Every issued create request failed without reaching the store.
    pub fn store_unreachable(&self) -> bool {
        self.attempted() > 0 && self.transport_failures == self.attempted()
    }
}

/// Register `products` one at a time.
///
/// Each product's image upload is awaited before the next product starts.
/// Failures are contained to the product they belong to; a failed image
/// leaves the created product in place.
#[instrument(skip_all, fields(products = products.len(), categories = mapping.len()))]
pub async fn register_products(
    store: &StoreClient,
    uploader: &MediaUploader,
    products: &[SourceProduct],
    mapping: &CategoryMap,
    observer: &dyn ImportObserver,
) -> ProductOutcome {
    let mut outcome = ProductOutcome::default();

    for product in products {
        let title = product.title.as_str();

        let Some(category_id) = mapping.get(&product.category) else {
            warn!(title, category = %product.category, "no registered category, skipping product");
            observer.on_event(&ImportEvent::ProductSkipped {
                title: title.to_string(),
                category: product.category.clone(),
            });
            outcome.skipped += 1;
            continue;
        };

        debug!(title, category = %product.category, category_id = %category_id, "importing product");

        let payload = ProductPayload::from_source(product, category_id.clone());

        let product_id = match store.create_product(&payload).await {
            Ok(id) => id,
            Err(CatalogError::Rejected { message }) => {
                warn!(title, error = %message, "store rejected product");
                observer.on_event(&ImportEvent::ProductRejected {
                    title: title.to_string(),
                    error: message,
                });
                outcome.rejected += 1;
                continue;
            }
            Err(e) => {
                warn!(title, error = %e, "product creation failed");
                if e.is_transport() {
                    outcome.transport_failures += 1;
                }
                observer.on_event(&ImportEvent::ProductFailed {
                    title: title.to_string(),
                    error: e.to_string(),
                });
                outcome.failed += 1;
                continue;
            }
        };

        outcome.created += 1;
        observer.on_event(&ImportEvent::ProductCreated {
            title: title.to_string(),
            id: product_id.clone(),
        });

        match uploader.attach(store, &product.image, &product_id).await {
            Ok(filename) => {
                info!(title, id = %product_id, %filename, "product imported");
                observer.on_event(&ImportEvent::ImageAttached {
                    title: title.to_string(),
                    filename,
                });
                outcome.images_attached += 1;
            }
            Err(e) => {
                warn!(title, id = %product_id, error = %e, "product created without image");
                observer.on_event(&ImportEvent::ImageFailed {
                    title: title.to_string(),
                    error: e.to_string(),
                });
                outcome.images_failed += 1;
            }
        }
    }

    info!(
        created = outcome.created,
        skipped = outcome.skipped,
        rejected = outcome.rejected,
        failed = outcome.failed,
        images_failed = outcome.images_failed,
        "product registration settled"
    );

    outcome
}
