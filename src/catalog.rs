//! Catalog loading.
//!
//! A catalog file is a JSON object keyed by entity id:
//!
//! ```json
//! {
//!   "amenity/fast_food|Burger King~(USA)": { "countryCodes": ["us"] },
//!   "shop/bakery|Acme": { "matchNames": ["acme bread"], "tags": { "alt_name": "Acme Co" } }
//! }
//! ```

use crate::model::Catalog;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

pub fn catalog_from_json_str(raw: &str) -> Result<Catalog> {
    serde_json::from_str(raw).context("parsing catalog")
}

/// Load one catalog file.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading catalog from {}", path.display()))?;
    let catalog = catalog_from_json_str(&raw)
        .with_context(|| format!("in {}", path.display()))?;
    info!(path = %path.display(), entities = catalog.len(), "loaded catalog");
    Ok(catalog)
}

/// Load several catalog files into one, in the order given. An id that
/// appears in more than one file keeps its first position and takes the
/// last definition.
pub fn load_catalogs<P: AsRef<Path>>(paths: &[P]) -> Result<Catalog> {
    let mut merged = Catalog::new();
    for path in paths {
        let catalog = load_catalog(path)?;
        for (id, entity) in catalog.iter() {
            merged.insert(id, entity.clone());
        }
    }
    Ok(merged)
}
