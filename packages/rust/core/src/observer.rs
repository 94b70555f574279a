//! Import progress events and the observer interface that receives them.
//!
//! The pipeline logs through `tracing` and, in parallel, reports typed
//! [`ImportEvent`]s to an injected [`ImportObserver`]. The CLI renders them
//! as a spinner; tests record them and assert on what happened.

use std::sync::Mutex;

use catalogsync_shared::{CategoryName, StoreId};
use serde::Serialize;

/// Linear stages of an import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStage {
    Idle,
    Fetching,
    Deriving,
    RegisteringCategories,
    RegisteringProducts,
    Done,
    Failed,
}

impl std::fmt::Display for ImportStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching catalog",
            Self::Deriving => "deriving categories",
            Self::RegisteringCategories => "registering categories",
            Self::RegisteringProducts => "registering products",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Something that happened during an import.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportEvent {
    StageEntered(ImportStage),
    CatalogFetched { products: usize },
    CategoriesDerived { categories: usize },
    CategoryCreated { name: CategoryName, id: StoreId },
    CategoryFailed { name: CategoryName, error: String },
    /// The product's category has no entry in the mapping.
    ProductSkipped { title: String, category: CategoryName },
    ProductCreated { title: String, id: StoreId },
    /// The store answered with an application-level error.
    ProductRejected { title: String, error: String },
    ProductFailed { title: String, error: String },
    ImageAttached { title: String, filename: String },
    /// The product exists but its image could not be attached.
    ImageFailed { title: String, error: String },
}

/// Receiver for [`ImportEvent`]s.
pub trait ImportObserver: Send + Sync {
    fn on_event(&self, event: &ImportEvent);
}

/// No-op observer for headless usage.
pub struct SilentObserver;

impl ImportObserver for SilentObserver {
    fn on_event(&self, _event: &ImportEvent) {}
}

/// Observer that keeps every event in memory.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ImportEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far, in order.
    pub fn events(&self) -> Vec<ImportEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Stages entered so far, in order.
    pub fn stages(&self) -> Vec<ImportStage> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ImportEvent::StageEntered(stage) => Some(stage),
                _ => None,
            })
            .collect()
    }
}

impl ImportObserver for RecordingObserver {
    fn on_event(&self, event: &ImportEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
