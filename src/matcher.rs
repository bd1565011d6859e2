//! # Matcher
//!
//! Resolves a parsed tag triple to at most one canonical entity.
//!
//! Lookup order, stopping at the first hit that passes the country filter:
//!
//! 1. ambiguous index at `(kv, nsimple)`
//! 2. unambiguous index at `(kv, nsimple)`
//! 3. match-group fallback (see [`Matcher::match_parts`])
//!
//! "No match" is a normal outcome and comes back as `None`.

use crate::conflicts::{AmbiguousOverwrite, NameConflict};
use crate::groups::{MatchGroup, MatchGroups};
use crate::index::{IndexStats, MatchIndex};
use crate::model::{Catalog, Parts};
use crate::normalize::{Normalizer, SimpleNormalizer};
use crate::parts::{kvn_compound, to_parts};
use tracing::trace;

/// Read-only resolver over a built [`MatchIndex`].
pub struct Matcher<N: Normalizer = SimpleNormalizer> {
    index: MatchIndex,
    groups: MatchGroups,
    normalizer: N,
}

impl Matcher<SimpleNormalizer> {
    /// Build an index over `catalog` with the default normalizer.
    pub fn build(catalog: &Catalog, groups: MatchGroups) -> Self {
        Self::build_with_normalizer(catalog, groups, SimpleNormalizer)
    }
}

impl<N: Normalizer> Matcher<N> {
    pub fn build_with_normalizer(catalog: &Catalog, groups: MatchGroups, normalizer: N) -> Self {
        let index = MatchIndex::build(catalog, &normalizer);
        Self {
            index,
            groups,
            normalizer,
        }
    }

    /// Wrap an index built elsewhere. `normalizer` must be the one the index
    /// was built with.
    pub fn from_index(index: MatchIndex, groups: MatchGroups, normalizer: N) -> Self {
        Self {
            index,
            groups,
            normalizer,
        }
    }

    /// Resolve a `key`, `value`, `name` triple.
    pub fn match_kvn(
        &self,
        key: &str,
        value: &str,
        name: &str,
        country_code: Option<&str>,
    ) -> Option<&Parts> {
        let parts = to_parts(&kvn_compound(key, value, name), &self.normalizer);
        self.match_parts(&parts, country_code)
    }

    /// Resolve a parsed record.
    ///
    /// The group fallback walks each group in configured order. Within a
    /// group, the first member with a usable hit becomes the pending match;
    /// it is returned as soon as the walk has reached `parts.kv`. A hit found
    /// before `parts.kv` is therefore returned once `parts.kv` is reached, and
    /// a group that does not contain `parts.kv` never returns anything.
    pub fn match_parts(&self, parts: &Parts, country_code: Option<&str>) -> Option<&Parts> {
        let nsimple = parts.nsimple.as_str();
        let passes = |m: &&Parts| m.matches_country_code(country_code);

        if let Some(hit) = self.index.get_ambiguous(&parts.kv, nsimple).filter(passes) {
            return Some(hit);
        }
        if let Some(hit) = self.index.get_unambiguous(&parts.kv, nsimple).filter(passes) {
            return Some(hit);
        }

        self.groups
            .iter()
            .find_map(|group| self.match_in_group(group, &parts.kv, nsimple, country_code))
    }

    fn match_in_group(
        &self,
        group: &MatchGroup,
        kv: &str,
        nsimple: &str,
        country_code: Option<&str>,
    ) -> Option<&Parts> {
        let mut pending: Option<&Parts> = None;
        let mut entered = false;

        for member in group.members() {
            entered = entered || member == kv;
            if pending.is_none() {
                pending = self
                    .index
                    .get_ambiguous(member, nsimple)
                    .or_else(|| self.index.get_unambiguous(member, nsimple))
                    .filter(|m| m.matches_country_code(country_code));
            }
            if entered {
                if let Some(hit) = pending {
                    trace!(group = %group.name, member = %member, hit = %hit.kvnd, "group fallback match");
                    return Some(hit);
                }
            }
        }
        None
    }

    /// Primary-name conflicts found while building, in detection order.
    pub fn warnings(&self) -> &[NameConflict] {
        self.index.warnings()
    }

    pub fn ambiguous_overwrites(&self) -> &[AmbiguousOverwrite] {
        self.index.ambiguous_overwrites()
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }

    pub fn index(&self) -> &MatchIndex {
        &self.index
    }

    pub fn groups(&self) -> &MatchGroups {
        &self.groups
    }

    pub fn normalizer(&self) -> &N {
        &self.normalizer
    }
}
