//! # Data Model
//!
//! Catalog entities, parsed parts records and the composite keys used by the
//! match index.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Composite `(kv, normalized name)` key used by both indexes and by
/// `nomatch` exclusion sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexKey {
    /// Lowercased `key/value` compound
    pub kv: String,
    /// Normalized name
    pub nsimple: String,
}

impl IndexKey {
    pub fn new(kv: impl Into<String>, nsimple: impl Into<String>) -> Self {
        Self {
            kv: kv.into(),
            nsimple: nsimple.into(),
        }
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.kv, self.nsimple)
    }
}

/// A raw `key/value|name~(disambiguation)` string broken into its fields.
///
/// Produced by [`crate::parts::to_parts`]. The same record is shared by every
/// index slot its entity occupies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parts {
    /// The raw compound string (the entity id when built from a catalog)
    pub kvnd: String,
    /// Lowercased `key/value`
    pub kv: String,
    /// Tag key
    pub k: String,
    /// Tag value
    pub v: String,
    /// Raw name
    pub n: String,
    /// Normalized name
    pub nsimple: String,
    /// Disambiguation qualifier, e.g. `(USA)`
    pub d: Option<String>,
    /// Countries this entity is restricted to, as listed in the catalog
    pub country_codes: Option<Vec<String>>,
}

impl Parts {
    /// Composite `(kv, nsimple)` key for this record.
    pub fn kvnsimple(&self) -> IndexKey {
        IndexKey::new(self.kv.clone(), self.nsimple.clone())
    }

    pub fn is_ambiguous(&self) -> bool {
        self.d.is_some()
    }

    /// Whether this record may be returned for a lookup carrying `country_code`.
    pub fn matches_country_code(&self, country_code: Option<&str>) -> bool {
        let Some(code) = country_code else {
            return true;
        };
        match &self.country_codes {
            None => true,
            Some(codes) => codes.iter().any(|c| c.eq_ignore_ascii_case(code)),
        }
    }
}

impl fmt::Display for Parts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kvnd)
    }
}

/// OSM-style tags carried by a catalog entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tags {
    pub name: Option<String>,
    pub official_name: Option<String>,
    pub alt_name: Option<String>,
    pub short_name: Option<String>,
    /// Everything else (`brand`, `brand:wikidata`, ...)
    #[serde(flatten)]
    pub other: BTreeMap<String, String>,
}

impl Tags {
    pub fn official_names(&self) -> impl Iterator<Item = &str> {
        split_tag_values(self.official_name.as_deref())
    }

    pub fn alt_names(&self) -> impl Iterator<Item = &str> {
        split_tag_values(self.alt_name.as_deref())
    }

    pub fn short_names(&self) -> impl Iterator<Item = &str> {
        split_tag_values(self.short_name.as_deref())
    }
}

/// Multi-valued tags use `;` as a separator.
fn split_tag_values(value: Option<&str>) -> impl Iterator<Item = &str> {
    value
        .into_iter()
        .flat_map(|v| v.split(';'))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// A canonical catalog record. Its identity (the `kvnd` string) is the key it
/// is stored under in the [`Catalog`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Entity {
    /// Extra names this entity should match on the primary pass
    pub match_names: Vec<String>,
    /// Extra `key/value` strings this entity is also known by
    pub match_tags: Vec<String>,
    /// `kvnd` strings that must never match this entity
    pub nomatch: Vec<String>,
    /// Restrict matches to these countries
    pub country_codes: Option<Vec<String>>,
    pub tags: Tags,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_match_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.match_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_match_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.match_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_nomatch<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nomatch.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_country_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.country_codes = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_official_name(mut self, name: impl Into<String>) -> Self {
        self.tags.official_name = Some(name.into());
        self
    }

    pub fn with_alt_name(mut self, name: impl Into<String>) -> Self {
        self.tags.alt_name = Some(name.into());
        self
    }

    pub fn with_short_name(mut self, name: impl Into<String>) -> Self {
        self.tags.short_name = Some(name.into());
        self
    }
}

/// Ordered mapping from entity id (`kvnd`) to [`Entity`].
///
/// Iteration follows insertion order. Re-inserting an existing id replaces the
/// entity in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<(String, Entity)>,
    positions: hashbrown::HashMap<String, usize>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entity, returning the one it replaced, if any.
    pub fn insert(&mut self, id: impl Into<String>, entity: Entity) -> Option<Entity> {
        let id = id.into();
        if let Some(&pos) = self.positions.get(&id) {
            return Some(std::mem::replace(&mut self.entries[pos].1, entity));
        }
        self.positions.insert(id.clone(), self.entries.len());
        self.entries.push((id, entity));
        None
    }

    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.positions.get(id).map(|&pos| &self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entity)> {
        self.entries.iter().map(|(id, entity)| (id.as_str(), entity))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Entity)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (S, Entity)>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for (id, entity) in iter {
            catalog.insert(id, entity);
        }
        catalog
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CatalogVisitor;

        impl<'de> Visitor<'de> for CatalogVisitor {
            type Value = Catalog;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of entity ids to entity records")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Catalog, A::Error> {
                let mut catalog = Catalog::new();
                while let Some((id, entity)) = map.next_entry::<String, Entity>()? {
                    catalog.insert(id, entity);
                }
                Ok(catalog)
            }
        }

        deserializer.deserialize_map(CatalogVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_preserves_insertion_order() {
        let json = r#"{
            "shop/bakery|Zeta": {},
            "shop/bakery|Alpha": {"matchNames": ["alfa"]},
            "amenity/cafe|Mid": {"countryCodes": ["us"]}
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = catalog.iter().map(|(id, _)| id).collect();
        assert_eq!(
            ids,
            vec!["shop/bakery|Zeta", "shop/bakery|Alpha", "amenity/cafe|Mid"]
        );
        assert_eq!(
            catalog.get("shop/bakery|Alpha").unwrap().match_names,
            vec!["alfa".to_string()]
        );
    }

    #[test]
    fn reinsert_replaces_in_place() {
        let mut catalog = Catalog::new();
        catalog.insert("a/b|One", Entity::new());
        catalog.insert("a/b|Two", Entity::new());
        let old = catalog.insert("a/b|One", Entity::new().with_match_names(["uno"]));
        assert!(old.is_some());
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.iter().next().unwrap().1.match_names.len(), 1);
    }

    #[test]
    fn entity_tags_deserialize_with_extras() {
        let json = r#"{
            "tags": {"name": "Acme", "alt_name": "Acme Co;ACME", "brand:wikidata": "Q1"},
            "nomatch": ["shop/pastry|Acme"]
        }"#;
        let entity: Entity = serde_json::from_str(json).unwrap();
        let alts: Vec<&str> = entity.tags.alt_names().collect();
        assert_eq!(alts, vec!["Acme Co", "ACME"]);
        assert_eq!(entity.tags.other.get("brand:wikidata").unwrap(), "Q1");
        assert_eq!(entity.nomatch.len(), 1);
        assert!(entity.country_codes.is_none());
    }

    #[test]
    fn country_code_filter() {
        let parts = Parts {
            kvnd: "shop/bakery|Acme".to_string(),
            kv: "shop/bakery".to_string(),
            k: "shop".to_string(),
            v: "bakery".to_string(),
            n: "Acme".to_string(),
            nsimple: "acme".to_string(),
            d: None,
            country_codes: Some(vec!["us".to_string(), "ca".to_string()]),
        };
        assert!(parts.matches_country_code(None));
        assert!(parts.matches_country_code(Some("US")));
        assert!(parts.matches_country_code(Some("ca")));
        assert!(!parts.matches_country_code(Some("FR")));

        let unrestricted = Parts {
            country_codes: None,
            ..parts
        };
        assert!(unrestricted.matches_country_code(Some("FR")));
    }
}
