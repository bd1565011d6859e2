use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use brandmatch::groups::{MatchGroup, MatchGroups};
use brandmatch::model::{Catalog, Entity};

const CATEGORIES: [&str; 6] = [
    "shop/bakery",
    "shop/pastry",
    "amenity/cafe",
    "amenity/fast_food",
    "shop/supermarket",
    "shop/convenience",
];

const SYLLABLES: [&str; 12] = [
    "ka", "lo", "mi", "ra", "ven", "tor", "zi", "bel", "qua", "dor", "sen", "ul",
];

#[derive(Debug, Clone)]
pub struct GeneratedCatalog {
    pub catalog: Catalog,
    /// `(key, value, name)` of every entity, in catalog order
    #[allow(dead_code)]
    pub triples: Vec<(String, String, String)>,
}

/// A small hand-written catalog covering every indexing rule.
#[allow(dead_code)]
pub fn sample_catalog() -> Catalog {
    vec![
        ("shop/bakery|Acme", Entity::new().with_match_names(["Acme Bread"])),
        ("shop/bakery|ACME", Entity::new()),
        ("shop/pastry|Patisserie Lune", Entity::new().with_short_name("Lune")),
        (
            "amenity/fast_food|Burger King~(USA)",
            Entity::new().with_country_codes(["us"]),
        ),
        (
            "amenity/fast_food|Burger King~(Australia)",
            Entity::new()
                .with_country_codes(["au"])
                .with_match_names(["Hungry Jack's"]),
        ),
        (
            "amenity/cafe|Bean There",
            Entity::new()
                .with_match_tags(["shop/coffee"])
                .with_nomatch(["shop/coffee|Bean There"])
                .with_alt_name("Bean"),
        ),
        (
            "shop/supermarket|Corner Market",
            Entity::new()
                .with_country_codes(["US", "CA"])
                .with_official_name("Corner Market Incorporated"),
        ),
        ("shop/convenience|Quick Stop", Entity::new().with_alt_name("Acme")),
    ]
    .into_iter()
    .collect()
}

#[allow(dead_code)]
pub fn sample_groups() -> MatchGroups {
    MatchGroups::new(vec![
        MatchGroup::new("bakery", ["shop/bakery", "shop/pastry"]),
        MatchGroup::new("coffee", ["amenity/cafe", "shop/coffee"]),
        MatchGroup::new("grocery", ["shop/convenience", "shop/supermarket"]),
    ])
}

/// Generate `count` entities with unique names spread over a few categories.
#[allow(dead_code)]
pub fn generate_catalog(count: usize, seed: u64) -> GeneratedCatalog {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut catalog = Catalog::new();
    let mut triples = Vec::with_capacity(count);

    for i in 0..count {
        let kv = CATEGORIES[rng.random_range(0..CATEGORIES.len())];
        let syllables = rng.random_range(2..4);
        let mut stem = String::new();
        for _ in 0..syllables {
            stem.push_str(SYLLABLES[rng.random_range(0..SYLLABLES.len())]);
        }
        // index suffix keeps names unique
        let name = format!("{} {}", capitalize(&stem), i);
        let (key, value) = kv.split_once('/').expect("category has a slash");

        let mut entity = Entity::new();
        if rng.random_bool(0.3) {
            entity = entity.with_match_names([format!("{name} Store")]);
        }
        if rng.random_bool(0.2) {
            entity = entity.with_country_codes(["us"]);
        }

        catalog.insert(format!("{kv}|{name}"), entity);
        triples.push((key.to_string(), value.to_string(), name));
    }

    GeneratedCatalog { catalog, triples }
}

#[allow(dead_code)]
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
