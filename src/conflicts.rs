//! # Conflicts Module
//!
//! Diagnostics collected while building the match index. Nothing here is
//! consulted during resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Two primary names that normalize to the same unambiguous slot.
///
/// The existing entity keeps the slot; the incoming one is dropped for that
/// `(kv, name)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameConflict {
    /// Id of the entity that already owns the slot
    pub existing: String,
    /// Id of the entity whose name collided
    pub incoming: String,
    /// The `key/value` the collision happened under
    pub kv: String,
    /// The normalized name both entities share
    pub nsimple: String,
}

impl NameConflict {
    pub fn new(existing: String, incoming: String, kv: String, nsimple: String) -> Self {
        Self {
            existing,
            incoming,
            kv,
            nsimple,
        }
    }

    /// The `(existing, incoming)` pair.
    pub fn pair(&self) -> (&str, &str) {
        (&self.existing, &self.incoming)
    }
}

impl fmt::Display for NameConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} (\"{}\")", self.existing, self.incoming, self.nsimple)
    }
}

/// A disambiguated entity replaced by a later one sharing its ambiguous slot.
///
/// Later catalog entries win. These are tracked apart from [`NameConflict`]s
/// so reports can tell accepted overwrites from real data problems.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AmbiguousOverwrite {
    pub replaced: String,
    pub replacement: String,
    pub kv: String,
    pub nsimple: String,
}

impl fmt::Display for AmbiguousOverwrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} replaced by {} at {}|{}",
            self.replaced, self.replacement, self.kv, self.nsimple
        )
    }
}

/// Render conflicts one per line, in detection order.
pub fn summarize(conflicts: &[NameConflict]) -> String {
    let mut summary = String::new();
    for conflict in conflicts {
        summary.push_str(&conflict.to_string());
        summary.push('\n');
    }
    summary
}
