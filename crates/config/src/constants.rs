pub const TOP_LEVEL_DOMAIN: &str = "io.github";
pub const AUTHOR: &str = "pagesearch";
pub const APP_NAME: &str = "pagesearch";

pub const CONFIG_FILE_NAME: &str = "pagesearch.toml";

pub const NOTEHUB_TOKEN_ENV: &str = "NOTEHUB_TOKEN";
pub const TMDB_TOKEN_ENV: &str = "TMDB_TOKEN";
