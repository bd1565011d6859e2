use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use brandmatch::config::{CatalogOverrides, ConfigOverrides, MatcherConfig, ResolveOverrides};
use brandmatch::{to_parts, Matcher};

fn parse_arg(flag: &str) -> Option<String> {
    let mut args = std::env::args();
    while let Some(arg) = args.next() {
        if arg == flag {
            return args.next();
        }
    }
    None
}

fn has_flag(flag: &str) -> bool {
    std::env::args().any(|arg| arg == flag)
}

const VALUE_FLAGS: &[&str] = &["-c", "--config", "--catalog", "-g", "--groups", "--country", "--log-level"];

/// Positional arguments are the queries.
fn queries() -> Vec<String> {
    let mut out = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            args.next();
        } else if !arg.starts_with('-') {
            out.push(arg);
        }
    }
    out
}

fn print_help() {
    eprintln!(
        r#"brandmatch - resolve key/value|name tags to canonical brands

USAGE:
    brandmatch [OPTIONS] [QUERY...]

    Each QUERY is "key/value|name". With no queries, reads one per line from stdin.

OPTIONS:
    -c, --config <FILE>     Path to config file (TOML)
        --catalog <FILES>   Catalog JSON files (comma-separated)
    -g, --groups <FILE>     Match-group JSON file
        --country <CC>      Country code applied to every query
        --log-level <LVL>   trace, debug, info, warn, error [default: info]
        --warnings          Print name conflicts found while indexing
    -h, --help              Print help

ENVIRONMENT:
    BRANDMATCH_CONFIG              Path to config file
    BRANDMATCH_LOG_LEVEL           Log level
    BRANDMATCH_RESOLVE__GROUPS     Match-group file
    BRANDMATCH_RESOLVE__COUNTRY    Default country code

CONFIG FILE (brandmatch.toml):
    [catalog]
    paths = ["brands.json"]
    [resolve]
    groups = "match_groups.json"
"#
    );
}

fn resolve_line(matcher: &Matcher, query: &str, country: Option<&str>, out: &mut impl Write) -> io::Result<()> {
    let parts = to_parts(query, matcher.normalizer());
    match matcher.match_parts(&parts, country) {
        Some(hit) => writeln!(out, "{query} => {}", hit.kvnd),
        None => writeln!(out, "{query} => (no match)"),
    }
}

fn main() -> anyhow::Result<()> {
    if has_flag("-h") || has_flag("--help") {
        print_help();
        return Ok(());
    }

    // Build CLI overrides
    let mut overrides = ConfigOverrides::default();
    let mut resolve_overrides = ResolveOverrides::default();

    if let Some(catalogs) = parse_arg("--catalog") {
        let paths: Vec<PathBuf> = catalogs
            .split(',')
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
        overrides.catalog = Some(CatalogOverrides { paths: Some(paths) });
    }
    if let Some(groups) = parse_arg("--groups").or_else(|| parse_arg("-g")) {
        resolve_overrides.groups = Some(PathBuf::from(groups));
    }
    if let Some(country) = parse_arg("--country") {
        resolve_overrides.country = Some(country);
    }
    if resolve_overrides.groups.is_some() || resolve_overrides.country.is_some() {
        overrides.resolve = Some(resolve_overrides);
    }
    overrides.log_level = parse_arg("--log-level");

    let config_path = parse_arg("--config").or_else(|| parse_arg("-c"));
    let config = MatcherConfig::load(config_path.as_deref(), overrides)?;

    let level = tracing::Level::from_str(&config.log_level).unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let matcher = config.build_matcher()?;
    let stats = matcher.stats();
    tracing::info!(
        entities = stats.entities,
        unambiguous = stats.unambiguous_entries,
        ambiguous = stats.ambiguous_entries,
        conflicts = stats.conflicts,
        "matcher ready"
    );

    let country = config.resolve.country.as_deref();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if has_flag("--warnings") {
        for warning in matcher.warnings() {
            writeln!(out, "conflict: {warning}")?;
        }
    }

    let queries = queries();
    if queries.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line?;
            let query = line.trim();
            if !query.is_empty() {
                resolve_line(&matcher, query, country, &mut out)?;
            }
        }
    } else {
        for query in &queries {
            resolve_line(&matcher, query, country, &mut out)?;
        }
    }

    Ok(())
}
