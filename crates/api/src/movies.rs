//! TMDB movie search.

use crate::client::{ApiClient, HttpConfig};
use crate::error::{ApiError, Result};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use session::{FetchKey, FetchResult, Fetcher, ResultPage};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/original";
pub const DEFAULT_LANGUAGE: &str = "en-US";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f64,
}

impl Movie {
    pub fn backdrop_url(&self) -> Option<String> {
        self.backdrop_path
            .as_deref()
            .map(|path| format!("{IMAGE_BASE_URL}{path}"))
    }

    /// Rating as shown in the detail view, e.g. `7.3/10`.
    pub fn rating_label(&self) -> String {
        format!("{:.1}/10", self.vote_average)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoviesResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

impl From<MoviesResponse> for ResultPage<Movie> {
    fn from(response: MoviesResponse) -> Self {
        ResultPage::new(response.results, response.total_pages)
            .with_total_results(response.total_results)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieSearchParams {
    pub query: String,
    pub page: u32,
    pub language: String,
    pub include_adult: bool,
}

#[derive(Debug, Clone)]
pub struct MovieService {
    client: ApiClient,
    language: String,
    include_adult: bool,
}

impl MovieService {
    pub fn new(config: HttpConfig) -> Result<Self> {
        if config.token.is_none() {
            return Err(ApiError::MissingToken { service: "TMDB" });
        }
        Ok(Self {
            client: ApiClient::new(config)?,
            language: DEFAULT_LANGUAGE.to_string(),
            include_adult: false,
        })
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_include_adult(mut self, include_adult: bool) -> Self {
        self.include_adult = include_adult;
        self
    }

    pub fn params_for(&self, key: &FetchKey) -> MovieSearchParams {
        MovieSearchParams {
            query: key.term.clone(),
            page: key.page.max(1),
            language: self.language.clone(),
            include_adult: self.include_adult,
        }
    }

    pub fn search_request(&self, params: &MovieSearchParams) -> Result<reqwest::Request> {
        let page = params.page.to_string();
        let include_adult = params.include_adult.to_string();
        Ok(self
            .client
            .request(Method::GET, "search/movie")?
            .query(&[
                ("query", params.query.as_str()),
                ("include_adult", include_adult.as_str()),
                ("language", params.language.as_str()),
                ("page", page.as_str()),
            ])
            .build()?)
    }

    pub async fn search(&self, params: &MovieSearchParams) -> Result<MoviesResponse> {
        let request = self.search_request(params)?;
        self.client.execute_json(request).await
    }
}

#[async_trait::async_trait]
impl Fetcher for MovieService {
    type Record = Movie;

    async fn fetch(&self, key: &FetchKey) -> FetchResult<Movie> {
        let response = self.search(&self.params_for(key)).await?;
        Ok(response.into())
    }
}
