//! # Brandmatch
//!
//! Resolves free-form `key/value` + name tag triples to canonical brand
//! records.
//!
//! A [`Catalog`] of canonical entities is indexed once by [`MatchIndex::build`];
//! a [`Matcher`] then answers lookups against that index, read-only, falling
//! back across configured [`MatchGroups`] when the exact category misses.
//!
//! ```
//! use brandmatch::{Catalog, Entity, MatchGroup, MatchGroups, Matcher};
//!
//! let catalog: Catalog = vec![
//!     ("shop/pastry|Acme", Entity::new()),
//!     ("amenity/fast_food|Burger King~(USA)", Entity::new().with_country_codes(["us"])),
//! ]
//! .into_iter()
//! .collect();
//! let groups = MatchGroups::new(vec![MatchGroup::new("bakery", ["shop/bakery", "shop/pastry"])]);
//!
//! let matcher = Matcher::build(&catalog, groups);
//! let hit = matcher.match_kvn("shop", "bakery", "ACME", None).unwrap();
//! assert_eq!(hit.kvnd, "shop/pastry|Acme");
//! assert!(matcher.match_kvn("amenity", "fast_food", "Burger King", Some("fr")).is_none());
//! ```

pub mod catalog;
pub mod config;
pub mod conflicts;
pub mod groups;
pub mod index;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod parts;

// Re-export main types for convenience
pub use config::MatcherConfig;
pub use conflicts::{AmbiguousOverwrite, NameConflict};
pub use groups::{MatchGroup, MatchGroups};
pub use index::{IndexStats, MatchIndex};
pub use matcher::Matcher;
pub use model::{Catalog, Entity, IndexKey, Parts, Tags};
pub use normalize::{simplify, Normalizer, SimpleNormalizer};
pub use parts::to_parts;
