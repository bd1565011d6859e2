//! Parsing of `key/value|name~(disambiguation)` compounds.

use crate::model::Parts;
use crate::normalize::Normalizer;

/// Split a raw compound into a [`Parts`] record.
///
/// Missing pieces degrade to empty strings: `"shop/bakery"` has no name,
/// `"shop|Acme"` has an empty value. An empty disambiguation suffix is
/// treated as absent. Country codes are never set here; they belong to the
/// catalog entity, not the compound string.
pub fn to_parts(raw: &str, normalizer: &dyn Normalizer) -> Parts {
    let (kv_raw, nd) = raw.split_once('|').unwrap_or((raw, ""));
    let kv = kv_raw.trim().to_lowercase();
    let (k, v) = match kv.split_once('/') {
        Some((k, v)) => (k.to_string(), v.to_string()),
        None => (kv.clone(), String::new()),
    };
    let (n, d) = match nd.split_once('~') {
        Some((n, d)) => (n, Some(d.trim()).filter(|d| !d.is_empty())),
        None => (nd, None),
    };

    Parts {
        kvnd: raw.to_string(),
        kv,
        k,
        v,
        n: n.to_string(),
        nsimple: normalizer.normalize(n),
        d: d.map(str::to_string),
        country_codes: None,
    }
}

/// Build the raw compound for a tag triple.
pub fn kvn_compound(key: &str, value: &str, name: &str) -> String {
    format!("{key}/{value}|{name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::SimpleNormalizer;

    #[test]
    fn parses_full_compound() {
        let parts = to_parts("Amenity/Fast_Food|Burger King~(USA)", &SimpleNormalizer);
        assert_eq!(parts.kvnd, "Amenity/Fast_Food|Burger King~(USA)");
        assert_eq!(parts.kv, "amenity/fast_food");
        assert_eq!(parts.k, "amenity");
        assert_eq!(parts.v, "fast_food");
        assert_eq!(parts.n, "Burger King");
        assert_eq!(parts.nsimple, "burger king");
        assert_eq!(parts.d.as_deref(), Some("(USA)"));
        assert!(parts.country_codes.is_none());
    }

    #[test]
    fn missing_pieces_are_empty() {
        let parts = to_parts("shop/bakery", &SimpleNormalizer);
        assert_eq!(parts.kv, "shop/bakery");
        assert_eq!(parts.n, "");
        assert_eq!(parts.nsimple, "");
        assert!(parts.d.is_none());

        let parts = to_parts("shop|Acme~", &SimpleNormalizer);
        assert_eq!(parts.k, "shop");
        assert_eq!(parts.v, "");
        assert_eq!(parts.n, "Acme");
        assert!(parts.d.is_none());
    }

    #[test]
    fn compound_round_trips_through_parser() {
        let raw = kvn_compound("shop", "bakery", "Acme");
        assert_eq!(raw, "shop/bakery|Acme");
        let parts = to_parts(&raw, &SimpleNormalizer);
        assert_eq!(parts.kvnsimple().to_string(), "shop/bakery|acme");
    }
}
