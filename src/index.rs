//! # Indexing Module
//!
//! Builds the lookup tables the resolver reads from:
//!
//! - the *unambiguous* index, for entities without a disambiguation qualifier,
//!   where the first insertion owns a `(kv, name)` slot;
//! - the *ambiguous* index, for qualified entities, where later insertions
//!   overwrite earlier ones;
//! - the list of primary-name conflicts found along the way.
//!
//! An index is built once from a full catalog and is immutable afterwards.

use crate::conflicts::{AmbiguousOverwrite, NameConflict};
use crate::model::{Catalog, Entity, IndexKey, Parts};
use crate::normalize::Normalizer;
use crate::parts::to_parts;
use hashbrown::{Equivalent, HashMap};
use rustc_hash::FxHashSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::{debug, instrument};

type SlotMap = HashMap<IndexKey, Arc<Parts>>;

/// Borrowed form of [`IndexKey`] so lookups don't allocate.
struct IndexKeyRef<'a> {
    kv: &'a str,
    nsimple: &'a str,
}

impl<'a> Hash for IndexKeyRef<'a> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kv.hash(state);
        self.nsimple.hash(state);
    }
}

impl<'a> Equivalent<IndexKey> for IndexKeyRef<'a> {
    fn equivalent(&self, key: &IndexKey) -> bool {
        self.kv == key.kv && self.nsimple == key.nsimple
    }
}

/// Which of the two build passes is inserting names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Own name, `matchNames`, `official_name`
    Primary,
    /// `alt_name`, `short_name`; advisory only
    Secondary,
}

/// Counters gathered during the build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub entities: usize,
    pub unambiguous_entries: usize,
    pub ambiguous_entries: usize,
    pub exclusion_hits: usize,
    pub conflicts: usize,
    pub ambiguous_overwrites: usize,
}

/// The built match index.
#[derive(Debug, Clone, Default)]
pub struct MatchIndex {
    unambiguous: SlotMap,
    ambiguous: SlotMap,
    warnings: Vec<NameConflict>,
    overwrites: Vec<AmbiguousOverwrite>,
    exclusion_hits: usize,
    entities: usize,
}

impl MatchIndex {
    /// Build the index from a catalog.
    ///
    /// Runs a primary pass over every entity, then a secondary pass, both in
    /// catalog order. Never fails: incomplete entities contribute what they
    /// can and conflicts end up in [`MatchIndex::warnings`].
    #[instrument(skip(catalog, normalizer), fields(entities = catalog.len()), level = "debug")]
    pub fn build(catalog: &Catalog, normalizer: &dyn Normalizer) -> Self {
        let mut index = MatchIndex {
            entities: catalog.len(),
            ..Default::default()
        };

        for (kvnd, entity) in catalog.iter() {
            index.insert_names(kvnd, entity, Pass::Primary, normalizer);
        }
        for (kvnd, entity) in catalog.iter() {
            index.insert_names(kvnd, entity, Pass::Secondary, normalizer);
        }

        debug!(
            unambiguous = index.unambiguous.len(),
            ambiguous = index.ambiguous.len(),
            conflicts = index.warnings.len(),
            "built match index"
        );
        index
    }

    fn insert_names(&mut self, kvnd: &str, entity: &Entity, pass: Pass, normalizer: &dyn Normalizer) {
        let mut parts = to_parts(kvnd, normalizer);

        // qualified entities had every name indexed under their qualifier already
        if pass == Pass::Secondary && parts.is_ambiguous() {
            return;
        }

        if let Some(codes) = &entity.country_codes {
            parts.country_codes = Some(codes.clone());
        }

        let names: Vec<String> = match pass {
            Pass::Primary => std::iter::once(parts.n.as_str())
                .chain(entity.match_names.iter().map(String::as_str))
                .chain(entity.tags.official_names())
                .map(|name| normalizer.normalize(name))
                .collect(),
            Pass::Secondary => entity
                .tags
                .alt_names()
                .chain(entity.tags.short_names())
                .map(|name| normalizer.normalize(name))
                .collect(),
        };
        if names.is_empty() {
            return;
        }

        let kvs: Vec<String> = std::iter::once(parts.kv.clone())
            .chain(entity.match_tags.iter().map(|kv| kv.to_lowercase()))
            .collect();

        let nomatches: FxHashSet<IndexKey> = entity
            .nomatch
            .iter()
            .map(|id| to_parts(id, normalizer).kvnsimple())
            .collect();

        let parts = Arc::new(parts);
        for kv in &kvs {
            for nsimple in &names {
                let key = IndexKey::new(kv.as_str(), nsimple.as_str());
                if nomatches.contains(&key) {
                    self.exclusion_hits += 1;
                    debug!(entity = kvnd, key = %key, "skipping name excluded by nomatch");
                    continue;
                }

                if parts.is_ambiguous() {
                    self.insert_ambiguous(key, &parts);
                } else {
                    self.insert_unambiguous(key, &parts, pass);
                }
            }
        }
    }

    fn insert_ambiguous(&mut self, key: IndexKey, parts: &Arc<Parts>) {
        if let Some(previous) = self.ambiguous.get(&key) {
            if previous.kvnd != parts.kvnd {
                debug!(
                    replaced = %previous.kvnd,
                    replacement = %parts.kvnd,
                    key = %key,
                    "ambiguous slot overwritten"
                );
                self.overwrites.push(AmbiguousOverwrite {
                    replaced: previous.kvnd.clone(),
                    replacement: parts.kvnd.clone(),
                    kv: key.kv.clone(),
                    nsimple: key.nsimple.clone(),
                });
            }
        }
        self.ambiguous.insert(key, Arc::clone(parts));
    }

    fn insert_unambiguous(&mut self, key: IndexKey, parts: &Arc<Parts>, pass: Pass) {
        if let Some(existing) = self.unambiguous.get(&key) {
            if pass == Pass::Primary {
                debug!(
                    existing = %existing.kvnd,
                    incoming = %parts.kvnd,
                    key = %key,
                    "primary name conflict"
                );
                self.warnings.push(NameConflict::new(
                    existing.kvnd.clone(),
                    parts.kvnd.clone(),
                    key.kv,
                    key.nsimple,
                ));
            }
            return;
        }
        self.unambiguous.insert(key, Arc::clone(parts));
    }

    /// Look up a qualified entity.
    pub fn get_ambiguous(&self, kv: &str, nsimple: &str) -> Option<&Parts> {
        self.ambiguous
            .get(&IndexKeyRef { kv, nsimple })
            .map(|parts| parts.as_ref())
    }

    /// Look up an unqualified entity.
    pub fn get_unambiguous(&self, kv: &str, nsimple: &str) -> Option<&Parts> {
        self.unambiguous
            .get(&IndexKeyRef { kv, nsimple })
            .map(|parts| parts.as_ref())
    }

    /// Primary-name conflicts in detection order.
    pub fn warnings(&self) -> &[NameConflict] {
        &self.warnings
    }

    /// Ambiguous slots taken over by a later entity, in build order.
    pub fn ambiguous_overwrites(&self) -> &[AmbiguousOverwrite] {
        &self.overwrites
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            entities: self.entities,
            unambiguous_entries: self.unambiguous.len(),
            ambiguous_entries: self.ambiguous.len(),
            exclusion_hits: self.exclusion_hits,
            conflicts: self.warnings.len(),
            ambiguous_overwrites: self.overwrites.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::SimpleNormalizer;

    fn build(entries: Vec<(&str, Entity)>) -> MatchIndex {
        let catalog: Catalog = entries.into_iter().collect();
        MatchIndex::build(&catalog, &SimpleNormalizer)
    }

    #[test]
    fn primary_names_and_aliases_are_indexed() {
        let index = build(vec![(
            "shop/bakery|Acme",
            Entity::new()
                .with_match_names(["Acme Bread"])
                .with_match_tags(["Shop/Pastry"])
                .with_official_name("Acme Baking Company"),
        )]);

        for kv in ["shop/bakery", "shop/pastry"] {
            for name in ["acme", "acme bread", "acme baking company"] {
                let hit = index.get_unambiguous(kv, name).expect("indexed");
                assert_eq!(hit.kvnd, "shop/bakery|Acme");
            }
        }
        assert_eq!(index.stats().unambiguous_entries, 6);
        assert!(index.warnings().is_empty());
    }

    #[test]
    fn first_primary_insertion_wins_and_warns() {
        let index = build(vec![
            ("shop/bakery|Acme", Entity::new()),
            ("shop/bakery|ACME", Entity::new()),
            ("shop/bakery|Other", Entity::new().with_match_names(["acme"])),
        ]);

        let hit = index.get_unambiguous("shop/bakery", "acme").unwrap();
        assert_eq!(hit.kvnd, "shop/bakery|Acme");
        let pairs: Vec<(&str, &str)> = index.warnings().iter().map(|w| w.pair()).collect();
        assert_eq!(
            pairs,
            vec![
                ("shop/bakery|Acme", "shop/bakery|ACME"),
                ("shop/bakery|Acme", "shop/bakery|Other"),
            ]
        );
    }

    #[test]
    fn secondary_names_never_warn_or_overwrite() {
        let index = build(vec![
            ("shop/bakery|Other", Entity::new().with_alt_name("Acme")),
            ("shop/bakery|Acme", Entity::new()),
            ("shop/bakery|Third", Entity::new().with_short_name("Acme")),
        ]);

        // primary pass of Acme ran before Other's alt names
        let hit = index.get_unambiguous("shop/bakery", "acme").unwrap();
        assert_eq!(hit.kvnd, "shop/bakery|Acme");
        assert!(index.warnings().is_empty());
    }

    #[test]
    fn secondary_names_fill_empty_slots() {
        let index = build(vec![(
            "amenity/fast_food|Kentucky Fried Chicken",
            Entity::new().with_short_name("KFC").with_alt_name("Kentucky;KFChicken"),
        )]);
        for name in ["kfc", "kentucky", "kfchicken"] {
            assert!(index.get_unambiguous("amenity/fast_food", name).is_some());
        }
    }

    #[test]
    fn disambiguated_entities_go_to_ambiguous_index_only() {
        let index = build(vec![(
            "amenity/fast_food|Burger King~(USA)",
            Entity::new().with_alt_name("BK").with_match_names(["Burger King USA"]),
        )]);

        assert!(index.get_unambiguous("amenity/fast_food", "burger king").is_none());
        let hit = index.get_ambiguous("amenity/fast_food", "burger king").unwrap();
        assert_eq!(hit.d.as_deref(), Some("(USA)"));
        assert!(index.get_ambiguous("amenity/fast_food", "burger king usa").is_some());
        // alt names of qualified entities are skipped entirely
        assert!(index.get_ambiguous("amenity/fast_food", "bk").is_none());
        assert!(index.get_unambiguous("amenity/fast_food", "bk").is_none());
    }

    #[test]
    fn later_ambiguous_entries_overwrite() {
        let index = build(vec![
            ("shop/supermarket|Extra~(Germany)", Entity::new()),
            ("shop/supermarket|Extra~(Norway)", Entity::new()),
        ]);

        let hit = index.get_ambiguous("shop/supermarket", "extra").unwrap();
        assert_eq!(hit.kvnd, "shop/supermarket|Extra~(Norway)");
        assert!(index.warnings().is_empty());
        assert_eq!(index.ambiguous_overwrites().len(), 1);
        assert_eq!(
            index.ambiguous_overwrites()[0].replaced,
            "shop/supermarket|Extra~(Germany)"
        );
    }

    #[test]
    fn nomatch_excludes_pair_from_every_alias() {
        let index = build(vec![(
            "shop/bakery|Acme",
            Entity::new()
                .with_match_tags(["shop/pastry"])
                .with_match_names(["Acmé"])
                .with_alt_name("ACME")
                .with_nomatch(["shop/pastry|Acme"]),
        )]);

        assert!(index.get_unambiguous("shop/bakery", "acme").is_some());
        assert!(index.get_unambiguous("shop/pastry", "acme").is_none());
        assert!(index.get_ambiguous("shop/pastry", "acme").is_none());
        // primary: name + match name both hit, secondary: alt name hits
        assert_eq!(index.stats().exclusion_hits, 3);
        // "Acme" and "Acmé" collide under shop/bakery
        assert_eq!(index.warnings().len(), 1);
    }

    #[test]
    fn entity_colliding_with_itself_warns() {
        let index = build(vec![(
            "shop/bakery|Acme",
            Entity::new().with_match_names(["Acmé"]),
        )]);
        let pairs: Vec<(&str, &str)> = index.warnings().iter().map(|w| w.pair()).collect();
        assert_eq!(pairs, vec![("shop/bakery|Acme", "shop/bakery|Acme")]);

        let index = build(vec![(
            "shop/bakery|Acme",
            Entity::new().with_match_tags(["Shop/Bakery"]),
        )]);
        assert_eq!(index.warnings().len(), 1);
        assert_eq!(index.warnings()[0].kv, "shop/bakery");
        assert_eq!(index.warnings()[0].nsimple, "acme");
    }

    #[test]
    fn country_codes_are_copied_as_given() {
        let index = build(vec![(
            "shop/bakery|Acme",
            Entity::new().with_country_codes(["US", "ca"]),
        )]);
        let hit = index.get_unambiguous("shop/bakery", "acme").unwrap();
        assert_eq!(
            hit.country_codes.as_deref(),
            Some(&["US".to_string(), "ca".to_string()][..])
        );
        assert!(hit.matches_country_code(Some("us")));
        assert!(hit.matches_country_code(Some("CA")));
    }

    #[test]
    fn names_normalizing_to_empty_are_indexed() {
        let index = build(vec![("shop/bakery|!!!", Entity::new())]);
        let hit = index.get_unambiguous("shop/bakery", "").expect("indexed");
        assert_eq!(hit.kvnd, "shop/bakery|!!!");
        assert_eq!(index.stats().unambiguous_entries, 1);
        assert!(index.warnings().is_empty());
    }
}
