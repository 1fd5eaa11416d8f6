use super::Command;
use crate::config::Config;
use crate::error::{Result, WrapErr, error};
use crate::render::{Record, render_view};
use api::{MovieService, NoteService};
use session::{FetchKey, FetchStatus, Fetcher, ResultPage, SessionView, ViewState};

/// Fetch a single page and print it.
async fn print_page<F>(fetcher: &F, key: FetchKey) -> Result<()>
where
    F: Fetcher,
    F::Record: Record,
{
    let page = fetcher.fetch(&key).await?;
    print!("{}", render_view(&one_shot_view(key, page)));
    Ok(())
}

fn one_shot_view<R>(key: FetchKey, page: ResultPage<R>) -> SessionView<R> {
    let total_pages = page.total_pages;
    let (status, state) = if page.is_empty() {
        (FetchStatus::Empty, ViewState::NoResults)
    } else {
        (
            FetchStatus::Success,
            ViewState::Results {
                page,
                refreshing: false,
            },
        )
    };
    SessionView {
        raw_term: key.term.clone(),
        term: key.term.clone(),
        page: key.page,
        total_pages,
        fetch_key: Some(key),
        status,
        state,
    }
}

pub struct MoviesCommand {
    cfg: Config,
    query: String,
    page: u32,
}

impl MoviesCommand {
    pub fn new(cfg: Config, query: String, page: u32) -> Self {
        Self { cfg, query, page }
    }
}

#[async_trait::async_trait]
impl Command for MoviesCommand {
    async fn execute(&self) -> Result<()> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(error!("Please enter your search query."));
        }
        let service = MovieService::new(self.cfg.movies_http())?
            .with_language(&self.cfg.movies.language)
            .with_include_adult(self.cfg.movies.include_adult);

        print_page(&service, FetchKey::new(query, self.page.max(1)))
            .await
            .wrap_err("Movie search failed")
    }
}

pub struct NotesCommand {
    cfg: Config,
    search: String,
    page: u32,
}

impl NotesCommand {
    pub fn new(cfg: Config, search: String, page: u32) -> Self {
        Self { cfg, search, page }
    }
}

#[async_trait::async_trait]
impl Command for NotesCommand {
    async fn execute(&self) -> Result<()> {
        let service = NoteService::new(self.cfg.notes_http())?.with_per_page(self.cfg.notes.per_page);

        print_page(&service, FetchKey::new(self.search.trim(), self.page.max(1)))
            .await
            .wrap_err("Loading notes failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::Note;

    #[test]
    fn test_one_shot_empty_page() {
        let view = one_shot_view::<Note>(FetchKey::new("zzz", 1), ResultPage::default());
        assert_eq!(view.status, FetchStatus::Empty);
        assert_eq!(view.state, ViewState::NoResults);
        assert_eq!(view.fetch_key, Some(FetchKey::new("zzz", 1)));
    }

    #[test]
    fn test_one_shot_results_keep_total_pages() {
        let view = one_shot_view(FetchKey::new("a", 2), ResultPage::new(vec![1, 2], 4));
        assert_eq!(view.total_pages, 4);
        assert_eq!(view.items(), &[1, 2]);
        assert!(view.shows_pager());
    }
}
