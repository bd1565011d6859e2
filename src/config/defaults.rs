//! Default constants for brandmatch configuration.

/// Environment variable prefix; nested keys use `__`, e.g. `BRANDMATCH_RESOLVE__GROUPS`
pub const ENV_PREFIX: &str = "BRANDMATCH_";

/// Environment variable naming a config file
pub const CONFIG_PATH_ENV: &str = "BRANDMATCH_CONFIG";

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "brandmatch.toml";

/// Default log filter for the CLI
pub const DEFAULT_LOG_LEVEL: &str = "info";
