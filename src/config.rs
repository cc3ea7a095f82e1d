// src/config.rs

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use url::Url;

/// Path of an optional YAML config file.
pub const CONFIG_ENV: &str = "PAINEL_CONFIG";
/// Overrides `base_url` from any other source.
pub const BASE_URL_ENV: &str = "PAINEL_BASE_URL";

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/";
const DEFAULT_LOG_FILTER: &str = "info,painel=info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server that answers the `/api/...` endpoints.
    pub base_url: Url,
    pub user_agent: String,
    /// Used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL should parse"),
            user_agent: format!("painel/{}", env!("CARGO_PKG_VERSION")),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Which sources a loaded [`Config`] was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOrigin {
    pub file: Option<PathBuf>,
    pub base_url_from_env: bool,
}

impl ConfigOrigin {
    pub fn of(file: Option<&Path>, base_url: Option<&str>) -> Self {
        ConfigOrigin {
            file: file.map(Path::to_path_buf),
            base_url_from_env: base_url.is_some_and(|raw| !raw.trim().is_empty()),
        }
    }
}

impl Config {
    /// Defaults, then the file named by `PAINEL_CONFIG`, then `PAINEL_BASE_URL`.
    pub fn load() -> Result<(Self, ConfigOrigin)> {
        let raw_file = env::var_os(CONFIG_ENV);
        let base_url = env::var(BASE_URL_ENV).ok();
        let file = raw_file.as_deref().map(Path::new);
        let config = Self::from_sources(file, base_url.as_deref())?;
        Ok((config, ConfigOrigin::of(file, base_url.as_deref())))
    }

    pub fn from_sources(file: Option<&Path>, base_url: Option<&str>) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::from_yaml_file(path)?,
            None => Config::default(),
        };
        if let Some(raw) = base_url.map(str::trim).filter(|raw| !raw.is_empty()) {
            config.base_url =
                Url::parse(raw).with_context(|| format!("parsing {BASE_URL_ENV}={raw}"))?;
        }
        config.base_url = as_base(config.base_url)?;
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }
}

/// Endpoint paths are joined relative to the base, so its path must end in
/// a slash or the last segment would be replaced.
fn as_base(mut url: Url) -> Result<Url> {
    if !matches!(url.scheme(), "http" | "https") {
        bail!("base URL {url} must use http or https");
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn yaml_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_sources(None, None).expect("defaults are valid");
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.log_filter, "info,painel=info");
        assert!(config.user_agent.starts_with("painel/"));
    }

    #[test]
    fn test_yaml_file_partial_override() {
        let file = yaml_file("base_url: http://dash.local:8080/painel\nlog_filter: debug\n");
        let config = Config::from_sources(Some(file.path()), None).expect("valid file");
        assert_eq!(config.base_url.as_str(), "http://dash.local:8080/painel/");
        assert_eq!(config.log_filter, "debug");
        assert!(config.user_agent.starts_with("painel/"));
    }

    #[test]
    fn test_env_base_url_wins_over_file() {
        let file = yaml_file("base_url: http://dash.local:8080/\n");
        let config = Config::from_sources(Some(file.path()), Some(" https://bi.example.com "))
            .expect("valid sources");
        assert_eq!(config.base_url.as_str(), "https://bi.example.com/");
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let config = Config::from_sources(None, Some("  ")).expect("defaults");
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:5000/");
    }

    #[test]
    fn test_origin_records_sources() {
        let file = yaml_file("log_filter: debug\n");
        let origin = ConfigOrigin::of(Some(file.path()), Some("http://dash.local/"));
        assert_eq!(origin.file.as_deref(), Some(file.path()));
        assert!(origin.base_url_from_env);

        assert_eq!(ConfigOrigin::of(None, Some("  ")), ConfigOrigin::default());
    }

    #[test]
    fn test_rejects_bad_sources() {
        assert!(Config::from_sources(None, Some("not a url")).is_err());
        assert!(Config::from_sources(None, Some("ftp://files.local/")).is_err());

        let file = yaml_file("base_url: [1, 2]\n");
        let err = Config::from_sources(Some(file.path()), None).expect_err("bad yaml");
        assert!(err.to_string().contains("parsing config file"));

        let missing = Path::new("/nonexistent/painel.yaml");
        assert!(Config::from_sources(Some(missing), None).is_err());
    }
}
