use crate::error::Result;
use api::HttpConfig;
use config::constants::{NOTEHUB_TOKEN_ENV, TMDB_TOKEN_ENV};
use config::{default_config_path, token_from_env};
use serde::{Deserialize, Serialize};
use session::SessionPolicy;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    pub session: SessionConfig,
    pub http: HttpSettings,
    pub notes: NotesConfig,
    pub movies: MoviesConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Quiet period before a typed term is searched; 0 searches every keystroke
    pub debounce_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: session::DEFAULT_DEBOUNCE.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: api::client::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct NotesConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub per_page: u32,
    pub keep_previous_data: bool,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            base_url: api::notes::DEFAULT_BASE_URL.to_string(),
            token: None,
            per_page: api::notes::DEFAULT_PER_PAGE,
            keep_previous_data: SessionPolicy::notes().keep_previous_data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct MoviesConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub language: String,
    pub include_adult: bool,
    pub keep_previous_data: bool,
}

impl Default for MoviesConfig {
    fn default() -> Self {
        Self {
            base_url: api::movies::DEFAULT_BASE_URL.to_string(),
            token: None,
            language: api::movies::DEFAULT_LANGUAGE.to_string(),
            include_adult: false,
            keep_previous_data: SessionPolicy::movies().keep_previous_data,
        }
    }
}

const EXAMPLE_CONFIG: &str = r#"# pagesearch configuration
#
# Created on first run. Every key is optional.

[session]
# Quiet period in milliseconds before a typed search term is sent
# debounce-ms = 500

[http]
# timeout-secs = 30

[notes]
# base-url = "https://notehub-public.goit.study/api"
# Bearer token; the NOTEHUB_TOKEN environment variable takes precedence
# token = ""
# per-page = 12
# Keep showing the previous page while the next one loads
# keep-previous-data = true

[movies]
# base-url = "https://api.themoviedb.org/3"
# TMDB read access token; the TMDB_TOKEN environment variable takes precedence
# token = ""
# language = "en-US"
# include-adult = false
# keep-previous-data = false
"#;

impl Config {
    pub fn load_str(config_str: &str) -> Result<Config> {
        let config: Config = toml::from_str(config_str)?;
        Ok(config)
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file at the default location is created from the example
    /// template; a missing explicit path is an error.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let mut config = match path {
            Some(path) => Self::load_str(&std::fs::read_to_string(path)?)?,
            None => {
                let config_path = default_config_path()?;
                match std::fs::read_to_string(&config_path) {
                    Ok(content) => Self::load_str(&content)?,
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        Self::create_example_config(&config_path)?;
                        Config::default()
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        };
        config.apply_env_overrides(token_from_env);
        Ok(config)
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup(NOTEHUB_TOKEN_ENV) {
            self.notes.token = Some(token);
        }
        if let Some(token) = lookup(TMDB_TOKEN_ENV) {
            self.movies.token = Some(token);
        }
    }

    fn create_example_config(config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, EXAMPLE_CONFIG)?;
        eprintln!("Created configuration file: {}", config_path.display());
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.session.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs.max(1))
    }

    pub fn notes_http(&self) -> HttpConfig {
        HttpConfig::new(&self.notes.base_url)
            .with_token(self.notes.token.clone())
            .with_timeout(self.timeout())
    }

    pub fn movies_http(&self) -> HttpConfig {
        HttpConfig::new(&self.movies.base_url)
            .with_token(self.movies.token.clone())
            .with_timeout(self.timeout())
    }

    pub fn notes_policy(&self) -> SessionPolicy {
        SessionPolicy::notes()
            .with_debounce(self.debounce())
            .with_keep_previous_data(self.notes.keep_previous_data)
    }

    pub fn movies_policy(&self) -> SessionPolicy {
        SessionPolicy::movies()
            .with_debounce(self.debounce())
            .with_keep_previous_data(self.movies.keep_previous_data)
    }
}
