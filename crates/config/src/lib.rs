pub mod constants;

pub use etcetera::AppStrategy;
use etcetera::{AppStrategyArgs, choose_app_strategy};

use std::path::PathBuf;
use std::env;


pub fn create_strategy() -> std::result::Result<impl AppStrategy, etcetera::HomeDirError> {
    choose_app_strategy(AppStrategyArgs {
        top_level_domain: constants::TOP_LEVEL_DOMAIN.to_string(),
        author: constants::AUTHOR.to_string(),
        app_name: constants::APP_NAME.to_string(),
    })
}

/// Prefer the environment variable, then the platform strategy, then a
/// directory under the system temp dir.
pub fn resolve_dir<S, F>(env_key: &str, strategy: &S, strategy_fn: F) -> PathBuf
where
    S: AppStrategy,
    F: FnOnce(&S) -> Option<PathBuf>,
{
    env::var_os(env_key)
        .map(PathBuf::from)
        .or_else(|| strategy_fn(strategy))
        .unwrap_or_else(|| env::temp_dir().join(constants::APP_NAME))
}

/// Location of `pagesearch.toml`, honouring `CONFIG_DIRECTORY`.
pub fn default_config_path() -> std::result::Result<PathBuf, etcetera::HomeDirError> {
    let strategy = create_strategy()?;
    Ok(resolve_dir("CONFIG_DIRECTORY", &strategy, |s| Some(s.config_dir()))
        .join(constants::CONFIG_FILE_NAME))
}

/// Read a token from the environment, ignoring empty values.
pub fn token_from_env(env_key: &str) -> Option<String> {
    env::var(env_key).ok().filter(|v| !v.trim().is_empty())
}
