//! End-to-end import pipeline: catalog → categories → products → images.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, instrument};

use catalogsync_catalog::FetchOptions;
use catalogsync_shared::{CatalogError, CategoryName, ImportConfig, Result, RunId};
use catalogsync_store::{MediaUploader, StoreClient};

use crate::categories::{self, CategoryOutcome};
use crate::observer::{ImportEvent, ImportObserver, ImportStage};
use crate::products::{self, ProductOutcome};

/// Summary of a completed import run.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    /// Products in the source catalog.
    pub catalog_size: usize,
    /// Distinct category names in the catalog.
    pub categories_derived: usize,
    pub categories_created: usize,
    pub categories_failed: usize,
    pub products_created: usize,
    /// Products whose category was not registered.
    pub products_skipped: usize,
    pub products_rejected: usize,
    pub products_failed: usize,
    pub images_attached: usize,
    pub images_failed: usize,
}

impl ImportReport {
    /// Whether any item failed or was skipped.
    pub fn has_failures(&self) -> bool {
        self.categories_failed > 0
            || self.products_skipped > 0
            || self.products_rejected > 0
            || self.products_failed > 0
            || self.images_failed > 0
    }
}

/// Run the full import described by `config`.
///
/// 1. Fetch the catalog (fatal on failure)
/// 2. Derive the category set
/// 3. Register categories concurrently
/// 4. Register products sequentially, attaching each image
///
/// Each stage settles before the next begins. Per-item failures are
/// reported to `observer` and counted in the returned report; the run only
/// fails when the catalog cannot be loaded or the store is unreachable for
/// every request of a stage.
#[instrument(skip_all, fields(source = %config.source_url, store = %config.store_url))]
pub async fn run_import(
    config: &ImportConfig,
    observer: &dyn ImportObserver,
) -> Result<ImportReport> {
    let run_id = RunId::new();
    let started_at = Utc::now();
    let start = Instant::now();

    info!(%run_id, "starting import");

    let store = StoreClient::new(config)?;
    let uploader = MediaUploader::new(config.source_timeout_secs)?;

    // --- Stage 1: Fetch catalog ---
    enter(observer, ImportStage::Fetching);
    let fetch_opts = FetchOptions {
        timeout_secs: config.source_timeout_secs,
    };
    let catalog = match catalogsync_catalog::fetch_catalog(&config.source_url, &fetch_opts).await {
        Ok(catalog) => catalog,
        Err(e) => return Err(fail(observer, e)),
    };
    observer.on_event(&ImportEvent::CatalogFetched {
        products: catalog.len(),
    });

    // --- Stage 2: Derive categories ---
    enter(observer, ImportStage::Deriving);
    let names = catalogsync_catalog::derive_categories(&catalog);
    info!(categories = names.len(), "categories derived");
    observer.on_event(&ImportEvent::CategoriesDerived {
        categories: names.len(),
    });

    // --- Stage 3: Register categories ---
    enter(observer, ImportStage::RegisteringCategories);
    let category_outcome =
        categories::register_categories(&store, &names, config.category_slugs, observer).await;

    if category_outcome.store_unreachable() {
        return Err(fail(
            observer,
            CatalogError::Network(format!(
                "store unreachable: all {} category requests failed",
                category_outcome.failures.len()
            )),
        ));
    }

    // --- Stage 4: Register products ---
    enter(observer, ImportStage::RegisteringProducts);
    let product_outcome = products::register_products(
        &store,
        &uploader,
        &catalog,
        &category_outcome.mapping,
        observer,
    )
    .await;

    if product_outcome.store_unreachable() {
        return Err(fail(
            observer,
            CatalogError::Network(format!(
                "store unreachable: all {} product requests failed",
                product_outcome.attempted()
            )),
        ));
    }

    enter(observer, ImportStage::Done);

    let report = build_report(
        run_id,
        started_at,
        start,
        catalog.len(),
        names.len(),
        &category_outcome,
        &product_outcome,
    );

    info!(
        run_id = %report.run_id,
        categories_created = report.categories_created,
        products_created = report.products_created,
        images_attached = report.images_attached,
        elapsed_ms = report.elapsed_ms,
        "import complete"
    );

    Ok(report)
}

/// Fetch the catalog and derive its categories without touching the store.
pub async fn preview_categories(config: &ImportConfig) -> Result<(usize, Vec<CategoryName>)> {
    let fetch_opts = FetchOptions {
        timeout_secs: config.source_timeout_secs,
    };
    let catalog = catalogsync_catalog::fetch_catalog(&config.source_url, &fetch_opts).await?;
    let names = catalogsync_catalog::derive_categories(&catalog);
    Ok((catalog.len(), names))
}

fn enter(observer: &dyn ImportObserver, stage: ImportStage) {
    info!(%stage, "entering stage");
    observer.on_event(&ImportEvent::StageEntered(stage));
}

/// Move to `Failed` and hand the error back for propagation.
fn fail(observer: &dyn ImportObserver, err: CatalogError) -> CatalogError {
    error!(error = %err, "import failed");
    observer.on_event(&ImportEvent::StageEntered(ImportStage::Failed));
    err
}

fn build_report(
    run_id: RunId,
    started_at: DateTime<Utc>,
    start: Instant,
    catalog_size: usize,
    categories_derived: usize,
    categories: &CategoryOutcome,
    products: &ProductOutcome,
) -> ImportReport {
    ImportReport {
        run_id,
        started_at,
        elapsed_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        catalog_size,
        categories_derived,
        categories_created: categories.mapping.len(),
        categories_failed: categories.failures.len(),
        products_created: products.created,
        products_skipped: products.skipped,
        products_rejected: products.rejected,
        products_failed: products.failed,
        images_attached: products.images_attached,
        images_failed: products.images_failed,
    }
}
