use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use tracing::{debug, info};

use crate::{
    error::ConfigLoadError,
    models::{ClientConfig, FileConfig},
};

pub const CONFIG_PATH_VAR: &str = "SUNNY_CONFIG_PATH";
pub const API_URL_VAR: &str = "SUNNY_API_URL";
pub const HTTP_TIMEOUT_VAR: &str = "SUNNY_HTTP_TIMEOUT";

const DEFAULT_ENV_FILE: &str = ".env";
const CANDIDATES: &[&str] = &[
    "sunny.toml",
    "sunny.json",
    "config/sunny.toml",
    "config/sunny.json",
];

/// Where the config file came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    /// No file; built-in defaults plus environment.
    #[default]
    Default,
    /// Path named by `SUNNY_CONFIG_PATH`.
    EnvPath(PathBuf),
    /// First default candidate found under the root.
    File(PathBuf),
}

/// Result of [`ConfigLoader::load`].
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: ClientConfig,
    pub source: ConfigSource,
    /// `.env` file that contributed values, if one was read.
    pub env_file: Option<PathBuf>,
    /// Environment variables that overrode file or default values.
    pub env_overrides: Vec<&'static str>,
}

/// Resolves [`ClientConfig`] against a snapshot of the environment.
///
/// The loader never writes to the process environment; `.env` entries are
/// merged into its own snapshot, below variables that are already set.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    root: PathBuf,
    env: HashMap<String, String>,
    env_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader over the current process environment and working directory.
    pub fn new() -> Self {
        let vars = env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
        Self::with_env(vars)
    }

    pub fn with_env<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            root: PathBuf::from("."),
            env: vars
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            env_file: Some(PathBuf::from(DEFAULT_ENV_FILE)),
        }
    }

    /// Directory relative paths are resolved against.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// `.env` file to merge, or `None` to skip it.
    pub fn env_file(mut self, path: Option<PathBuf>) -> Self {
        self.env_file = path;
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (env, env_file) = self.effective_env()?;
        let mut config = ClientConfig::default();

        let source = self.locate(&env);
        if let ConfigSource::EnvPath(path) | ConfigSource::File(path) = &source {
            let file = load_file(path)?;
            apply_file(&mut config, file)?;
        }

        let mut env_overrides = Vec::new();
        if let Some(url) = non_empty(&env, API_URL_VAR) {
            config.api.base_url = url.to_string();
            env_overrides.push(API_URL_VAR);
        }
        if let Some(raw) = non_empty(&env, HTTP_TIMEOUT_VAR) {
            config.api.timeout = parse_duration(HTTP_TIMEOUT_VAR, raw)?;
            env_overrides.push(HTTP_TIMEOUT_VAR);
        }

        info!(
            source = ?source,
            base_url = %config.api.base_url,
            timeout = %humantime::format_duration(config.api.timeout),
            pages = config.pages.len(),
            "client configuration loaded"
        );

        Ok(ConfigLoad {
            config,
            source,
            env_file,
            env_overrides,
        })
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn effective_env(&self) -> Result<(HashMap<String, String>, Option<PathBuf>), ConfigLoadError> {
        let mut env = self.env.clone();
        let Some(path) = self.env_file.as_deref().map(|path| self.resolve(path)) else {
            return Ok((env, None));
        };
        if !path.is_file() {
            return Ok((env, None));
        }

        let dotenv_error = |source| ConfigLoadError::Dotenv {
            path: path.clone(),
            source,
        };
        for item in dotenvy::from_path_iter(&path).map_err(dotenv_error)? {
            let (key, value) = item.map_err(dotenv_error)?;
            env.entry(key).or_insert(value);
        }
        debug!(path = %path.display(), "merged env file");
        Ok((env, Some(path)))
    }

    fn locate(&self, env: &HashMap<String, String>) -> ConfigSource {
        if let Some(raw) = non_empty(env, CONFIG_PATH_VAR) {
            return ConfigSource::EnvPath(self.resolve(Path::new(raw)));
        }

        CANDIDATES
            .iter()
            .map(|candidate| self.root.join(candidate))
            .find(|path| path.is_file())
            .map_or(ConfigSource::Default, ConfigSource::File)
    }
}

fn non_empty<'a>(env: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    env.get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn parse_duration(key: &str, raw: &str) -> Result<Duration, ConfigLoadError> {
    humantime::parse_duration(raw).map_err(|source| ConfigLoadError::InvalidDuration {
        key: key.to_string(),
        value: raw.to_string(),
        source,
    })
}

/// Reads a config file, choosing the format by extension and falling back
/// to TOML then JSON for anything else.
pub fn load_file(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&contents).map_err(|source| ConfigLoadError::Json {
            path: path.to_path_buf(),
            source,
        }),
        Some("toml") => toml::from_str(&contents).map_err(|source| ConfigLoadError::Toml {
            path: path.to_path_buf(),
            source,
        }),
        _ => toml::from_str(&contents).or_else(|toml_err| {
            serde_json::from_str(&contents).map_err(|json_err| ConfigLoadError::UnknownFormat {
                path: path.to_path_buf(),
                toml: toml_err.to_string(),
                json: json_err.to_string(),
            })
        }),
    }
}

fn apply_file(config: &mut ClientConfig, file: FileConfig) -> Result<(), ConfigLoadError> {
    if let Some(url) = file.api.base_url.filter(|url| !url.trim().is_empty()) {
        config.api.base_url = url;
    }
    if let Some(raw) = file.api.timeout {
        config.api.timeout = parse_duration("api.timeout", &raw)?;
    }
    config.merge_pages(file.pages)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::models::{DEFAULT_API_URL, DEFAULT_TIMEOUT};

    fn loader(dir: &TempDir, vars: &[(&str, &str)]) -> ConfigLoader {
        ConfigLoader::with_env(vars.iter().copied()).root(dir.path())
    }

    #[test]
    fn defaults_without_file_or_env() {
        let dir = TempDir::new().unwrap();
        let load = loader(&dir, &[]).load().unwrap();

        assert_eq!(load.source, ConfigSource::Default);
        assert_eq!(load.config.api.base_url, DEFAULT_API_URL);
        assert_eq!(load.config.api.timeout, DEFAULT_TIMEOUT);
        assert_eq!(load.config.pages.len(), 2);
        assert!(load.env_overrides.is_empty());
        assert!(load.env_file.is_none());
    }

    #[test]
    fn finds_default_toml_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("config")).unwrap();
        fs::write(
            dir.path().join("config/sunny.toml"),
            r##"
[api]
base_url = "https://sunnyyummy.example"
timeout = "5s"

[[pages]]
container_selector = "#promo-banner-carousel"
page_id = "promo"
fallback_alt_text = "SunnyYummy 活動"
"##,
        )
        .unwrap();

        let load = loader(&dir, &[]).load().unwrap();

        assert_eq!(load.source, ConfigSource::File(dir.path().join("config/sunny.toml")));
        assert_eq!(load.config.api.base_url, "https://sunnyyummy.example");
        assert_eq!(load.config.api.timeout, Duration::from_secs(5));
        assert_eq!(load.config.page("promo").unwrap().anchor_id(), "promo-banner-carousel");
    }

    #[test]
    fn env_path_wins_and_accepts_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sunny.toml"), "[api]\nbase_url = \"http://ignored\"\n").unwrap();
        fs::write(
            dir.path().join("staging.json"),
            r#"{"api": {"base_url": "http://staging:8080"}}"#,
        )
        .unwrap();

        let load = loader(&dir, &[(CONFIG_PATH_VAR, "staging.json")]).load().unwrap();

        assert_eq!(load.source, ConfigSource::EnvPath(dir.path().join("staging.json")));
        assert_eq!(load.config.api.base_url, "http://staging:8080");
    }

    #[test]
    fn env_overrides_file_values() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("sunny.toml"),
            "[api]\nbase_url = \"http://file\"\ntimeout = \"1m\"\n",
        )
        .unwrap();

        let load = loader(&dir, &[(API_URL_VAR, "http://env:3000"), (HTTP_TIMEOUT_VAR, "750ms")])
            .load()
            .unwrap();

        assert_eq!(load.config.api.base_url, "http://env:3000");
        assert_eq!(load.config.api.timeout, Duration::from_millis(750));
        assert_eq!(load.env_overrides, vec![API_URL_VAR, HTTP_TIMEOUT_VAR]);
    }

    #[test]
    fn env_file_fills_unset_variables_only() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".env"),
            "SUNNY_API_URL=http://from-dotenv\nSUNNY_HTTP_TIMEOUT=2s\n",
        )
        .unwrap();

        let load = loader(&dir, &[(HTTP_TIMEOUT_VAR, "9s")]).load().unwrap();

        assert_eq!(load.env_file, Some(dir.path().join(".env")));
        assert_eq!(load.config.api.base_url, "http://from-dotenv");
        assert_eq!(load.config.api.timeout, Duration::from_secs(9));
    }

    #[test]
    fn env_file_can_be_disabled() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".env"), "SUNNY_API_URL=http://from-dotenv\n").unwrap();

        let load = loader(&dir, &[]).env_file(None).load().unwrap();
        assert_eq!(load.config.api.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn invalid_timeout_is_reported_with_key() {
        let dir = TempDir::new().unwrap();
        let err = loader(&dir, &[(HTTP_TIMEOUT_VAR, "soon")]).load().unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::InvalidDuration { ref key, ref value, .. }
                if key == HTTP_TIMEOUT_VAR && value == "soon"
        ));
    }

    #[test]
    fn missing_env_path_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let err = loader(&dir, &[(CONFIG_PATH_VAR, "nope.toml")]).load().unwrap_err();
        assert!(matches!(err, ConfigLoadError::Read { .. }));
    }

    #[test]
    fn unknown_extension_tries_both_formats() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sunny.conf");
        fs::write(&path, r#"{"api": {"timeout": "3s"}}"#).unwrap();
        assert_eq!(load_file(&path).unwrap().api.timeout.as_deref(), Some("3s"));

        fs::write(&path, "this is neither").unwrap();
        assert!(matches!(load_file(&path), Err(ConfigLoadError::UnknownFormat { .. })));
    }
}
