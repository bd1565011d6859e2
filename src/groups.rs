//! # Match Groups
//!
//! Sets of `key/value` categories that are interchangeable for fallback
//! matching. A bakery tagged as a pastry shop should still resolve.
//!
//! Loaded from JSON shaped like:
//!
//! ```json
//! { "matchGroups": { "bakery": ["shop/bakery", "shop/pastry"] } }
//! ```
//!
//! Group order and member order are preserved; the resolver depends on both.

use anyhow::{Context, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;

/// One named group of substitutable `key/value` strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    pub name: String,
    members: Vec<String>,
}

impl MatchGroup {
    /// Members are lowercased on construction.
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            members: members
                .into_iter()
                .map(|kv| kv.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn members(&self) -> &[String] {
        &self.members
    }

    pub fn contains(&self, kv: &str) -> bool {
        self.members.iter().any(|member| member == kv)
    }
}

/// Ordered match-group configuration. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchGroups {
    groups: Vec<MatchGroup>,
}

impl MatchGroups {
    pub fn new(groups: Vec<MatchGroup>) -> Self {
        Self { groups }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let file: MatchGroupsFile = serde_json::from_str(raw).context("parsing match groups")?;
        Ok(file.match_groups)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading match groups from {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MatchGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl FromIterator<MatchGroup> for MatchGroups {
    fn from_iter<I: IntoIterator<Item = MatchGroup>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchGroupsFile {
    match_groups: MatchGroups,
}

impl<'de> Deserialize<'de> for MatchGroups {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = MatchGroups;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of group names to key/value lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<MatchGroups, A::Error> {
                let mut groups = Vec::new();
                while let Some((name, members)) = map.next_entry::<String, Vec<String>>()? {
                    groups.push(MatchGroup::new(name, members));
                }
                Ok(MatchGroups::new(groups))
            }
        }

        deserializer.deserialize_map(GroupsVisitor)
    }
}
