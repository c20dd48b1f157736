//! Lightweight configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys separated by `__`, e.g. `APP_SEARCH__MAX_RESULTS=20`).
//! Provides helpers to expand `~` and `${VAR}` and to resolve relative paths
//! against a known base directory.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use crate::category::Category;
use crate::error::{Error, Result};
use crate::routes::{RouteTable, GLOBAL_DEFAULT_ROUTE};

pub const DEFAULT_MIN_QUERY_CHARS: usize = 2;
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Query policy and routing, read from the `[search]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Trimmed terms shorter than this (in chars) return nothing.
    pub min_query_chars: usize,
    /// Cap on the combined hit list across all categories.
    pub max_results: usize,
    pub default_route: String,
    /// Per-category route overrides keyed by category wire name.
    pub routes: BTreeMap<String, String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            max_results: DEFAULT_MAX_RESULTS,
            default_route: GLOBAL_DEFAULT_ROUTE.to_string(),
            routes: BTreeMap::new(),
        }
    }
}

impl SearchSettings {
    pub fn validate(&self) -> Result<()> {
        if self.min_query_chars == 0 {
            return Err(Error::InvalidConfig("search.min_query_chars must be at least 1".into()));
        }
        if self.max_results == 0 {
            return Err(Error::InvalidConfig("search.max_results must be at least 1".into()));
        }
        Ok(())
    }

    /// The built-in route table with this configuration's overrides applied.
    pub fn route_table(&self) -> Result<RouteTable> {
        let mut table = RouteTable::default().with_default_route(self.default_route.clone());
        for (name, route) in &self.routes {
            let category: Category = name
                .parse()
                .map_err(|_| Error::InvalidConfig(format!("search.routes: unknown category '{name}'")))?;
            table = table.with_route(category, route.clone());
        }
        Ok(table)
    }
}

pub struct Config {
    figment: Figment,
    env_name: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(Path::new("."), &env_name)
    }

    /// Load `config.toml` and the environment overlay from `base`.
    pub fn load_from(base: &Path, env_name: &str) -> Result<Self> {
        let mut figment = Figment::new().merge(Toml::file(base.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, env_name: env_name.to_string() };
        config.validate()?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config = Self { figment, env_name: "custom".to_string() };
        config.validate()?;
        Ok(config)
    }

    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{key}': {e}")))
    }

    /// `[search]` settings, defaulted when the table is absent.
    pub fn search_settings(&self) -> Result<SearchSettings> {
        if !self.figment.contains("search") {
            return Ok(SearchSettings::default());
        }
        let settings: SearchSettings = self.get("search")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn snapshot_dir(&self) -> Option<String> {
        self.get::<String>("data.snapshot_dir").ok()
    }

    fn validate(&self) -> Result<()> {
        self.search_settings()?.route_table().map(|_| ())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(s: &str) -> Result<Config> {
        Config::from_figment(Figment::new().merge(Toml::string(s)))
    }

    #[test]
    fn missing_search_table_uses_defaults() {
        let config = from_toml("[data]\nsnapshot_dir = \"snapshots\"").unwrap();
        assert_eq!(config.search_settings().unwrap(), SearchSettings::default());
        assert_eq!(config.snapshot_dir().as_deref(), Some("snapshots"));
    }

    #[test]
    fn partial_search_table_keeps_other_defaults() {
        let config = from_toml("[search]\nmax_results = 25").unwrap();
        let settings = config.search_settings().unwrap();
        assert_eq!(settings.max_results, 25);
        assert_eq!(settings.min_query_chars, DEFAULT_MIN_QUERY_CHARS);
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(matches!(from_toml("[search]\nmax_results = 0"), Err(Error::InvalidConfig(_))));
        assert!(matches!(from_toml("[search]\nmin_query_chars = 0"), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn route_overrides_are_parsed() {
        let config = from_toml("[search]\ndefault_route = \"/home\"\n[search.routes]\nevents = \"/events\"").unwrap();
        let table = config.search_settings().unwrap().route_table().unwrap();
        assert_eq!(table.resolve(Category::Events, None), "/events");
        assert_eq!(table.resolve(Category::Navigation, None), "/home");
    }

    #[test]
    fn unknown_route_category_is_rejected() {
        assert!(from_toml("[search.routes]\npayroll = \"/pay\"").is_err());
    }

    #[test]
    fn resolve_with_base_keeps_absolute_paths() {
        let base = Path::new("/srv/opsdesk");
        assert_eq!(resolve_with_base(base, "snapshots"), PathBuf::from("/srv/opsdesk/snapshots"));
        assert_eq!(resolve_with_base(base, "/data/snap"), PathBuf::from("/data/snap"));
    }
}
