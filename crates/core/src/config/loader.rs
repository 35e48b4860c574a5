use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};

use super::{types::Config, ConfigError};

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "ANIMEDEX_";

/// Separates section from field in override names, so that field names
/// keep their own underscores: `ANIMEDEX_CATALOG__LATEST_LIMIT=25`.
pub const ENV_SECTION_SEPARATOR: &str = "__";

/// Environment overrides layered over whatever the file provides.
fn env_overrides() -> Env {
    Env::prefixed(ENV_PREFIX).split(ENV_SECTION_SEPARATOR)
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Read `path` and apply `ANIMEDEX_*` overrides on top.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(Figment::from(Toml::file(path)).merge(env_overrides()))
}

/// Parse TOML text only, ignoring the environment.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    extract(Figment::from(Toml::string(toml_str)))
}
