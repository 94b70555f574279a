//! Category set derivation.

use std::collections::HashSet;

use catalogsync_shared::{CategoryName, SourceProduct};

/// Collect the distinct category names referenced by `products`.
///
/// Each name appears exactly once, in first-seen order. Names are compared
/// verbatim; `"Electronics"` and `"electronics"` are two categories.
pub fn derive_categories(products: &[SourceProduct]) -> Vec<CategoryName> {
    let mut seen = HashSet::new();
    products
        .iter()
        .filter(|p| seen.insert(p.category.as_str()))
        .map(|p| p.category.clone())
        .collect()
}
