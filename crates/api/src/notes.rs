//! NoteHub notes: paged search, create, delete.

use crate::client::{ApiClient, HttpConfig};
use crate::error::{ApiError, Result};
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use session::{FetchKey, FetchResult, Fetcher, ResultPage};
use tracing::info;

pub const DEFAULT_BASE_URL: &str = "https://notehub-public.goit.study/api";
pub const DEFAULT_PER_PAGE: u32 = 12;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 50;
pub const CONTENT_MAX_CHARS: usize = 500;

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum NoteTag {
    #[default]
    Todo,
    Work,
    Personal,
    Meeting,
    Shopping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub tag: NoteTag,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body of `POST /notes`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tag: NoteTag,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, tag: NoteTag) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tag,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let title_len = self.title.trim().chars().count();
        if title_len == 0 {
            return Err(ApiError::Validation("title is required".into()));
        }
        if title_len < TITLE_MIN_CHARS {
            return Err(ApiError::Validation(format!(
                "title must be at least {TITLE_MIN_CHARS} characters"
            )));
        }
        if title_len > TITLE_MAX_CHARS {
            return Err(ApiError::Validation(format!(
                "title must be at most {TITLE_MAX_CHARS} characters"
            )));
        }
        if self.content.chars().count() > CONTENT_MAX_CHARS {
            return Err(ApiError::Validation(format!(
                "content must be at most {CONTENT_MAX_CHARS} characters"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchNotesParams {
    pub page: u32,
    pub search: String,
    pub per_page: u32,
}

impl Default for FetchNotesParams {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchNotesResponse {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_docs: Option<u64>,
}

impl From<FetchNotesResponse> for ResultPage<Note> {
    fn from(response: FetchNotesResponse) -> Self {
        let page = ResultPage::new(response.notes, response.total_pages);
        match response.total_docs {
            Some(total) => page.with_total_results(total),
            None => page,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NoteService {
    client: ApiClient,
    per_page: u32,
}

impl NoteService {
    pub fn new(config: HttpConfig) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(config)?,
            per_page: DEFAULT_PER_PAGE,
        })
    }

    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn params_for(&self, key: &FetchKey) -> FetchNotesParams {
        FetchNotesParams {
            page: key.page.max(1),
            search: key.term.clone(),
            per_page: self.per_page,
        }
    }

    pub fn list_request(&self, params: &FetchNotesParams) -> Result<reqwest::Request> {
        let page = params.page.to_string();
        let per_page = params.per_page.to_string();
        let mut query: Vec<(&str, &str)> = vec![("page", page.as_str()), ("perPage", per_page.as_str())];
        // Omitted when empty so the backend lists every note
        if !params.search.is_empty() {
            query.push(("search", params.search.as_str()));
        }
        Ok(self
            .client
            .request(Method::GET, "notes")?
            .query(&query)
            .build()?)
    }

    pub fn create_request(&self, draft: &NoteDraft) -> Result<reqwest::Request> {
        Ok(self.client.request(Method::POST, "notes")?.json(draft).build()?)
    }

    pub fn delete_request(&self, id: &str) -> Result<reqwest::Request> {
        if id.trim().is_empty() {
            return Err(ApiError::Validation("note id is required".into()));
        }
        let mut url = self.client.endpoint("notes")?;
        let base = url.to_string();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                url: base,
                reason: "cannot be a base".into(),
            })?
            .push(id);
        Ok(self.client.request_url(Method::DELETE, url).build()?)
    }

    pub async fn list(&self, params: &FetchNotesParams) -> Result<FetchNotesResponse> {
        let request = self.list_request(params)?;
        self.client.execute_json(request).await
    }

    pub async fn create(&self, draft: &NoteDraft) -> Result<Note> {
        draft.validate()?;
        let request = self.create_request(draft)?;
        let note: Note = self.client.execute_json(request).await?;
        info!(id = %note.id, title = %note.title, "note created");
        Ok(note)
    }

    pub async fn delete(&self, id: &str) -> Result<Note> {
        let request = self.delete_request(id)?;
        let note: Note = self.client.execute_json(request).await?;
        info!(id = %note.id, "note deleted");
        Ok(note)
    }
}

#[async_trait::async_trait]
impl Fetcher for NoteService {
    type Record = Note;

    async fn fetch(&self, key: &FetchKey) -> FetchResult<Note> {
        let response = self.list(&self.params_for(key)).await?;
        Ok(response.into())
    }
}
