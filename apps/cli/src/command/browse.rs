//! Interactive search session on stdin.
//!
//! Every plain line replaces the search term, so pasting or typing several
//! lines quickly exercises the debounce exactly like keystrokes in a search
//! box. Lines starting with `:` are commands.

use super::Command;
use crate::cli::Source;
use crate::config::Config;
use crate::error::Result;
use crate::render::{Record, render_view};
use api::{MovieService, NoteDraft, NoteService, NoteTag};
use session::{Fetcher, SessionEvent, SessionHandle, SessionPolicy, SessionView, spawn_session};
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{debug, warn};

const HELP: &str = "\
Type to search. Commands:
  :page N                     go to page N
  :next / :prev               move one page
  :show N                     details of item N on this page
  :create title|content|tag   create a note
  :delete N                   delete item N on this page
  :help                       this text
  :quit                       leave";

#[derive(Debug, Clone, PartialEq)]
enum Input {
    Term(String),
    Page(u32),
    Next,
    Prev,
    Show(usize),
    Create(NoteDraft),
    Delete(usize),
    Help,
    Quit,
}

fn parse_index(arg: &str) -> std::result::Result<usize, String> {
    arg.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| format!("expected an item number, got {arg:?}"))
}

fn parse_draft(arg: &str) -> std::result::Result<NoteDraft, String> {
    let mut parts = arg.splitn(3, '|');
    let title = parts.next().unwrap_or_default().trim();
    let content = parts.next().unwrap_or_default().trim();
    let tag = match parts.next().map(str::trim) {
        None | Some("") => NoteTag::default(),
        Some(tag) => NoteTag::from_str(tag).map_err(|_| format!("unknown tag {tag:?}"))?,
    };
    Ok(NoteDraft::new(title, content, tag))
}

fn parse_input(line: &str) -> std::result::Result<Input, String> {
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Input::Term(line.to_string()));
    };
    let (name, arg) = command
        .trim()
        .split_once(char::is_whitespace)
        .unwrap_or((command.trim(), ""));

    match name {
        "page" | "p" => arg
            .trim()
            .parse::<u32>()
            .map(Input::Page)
            .map_err(|_| format!("expected a page number, got {arg:?}")),
        "next" | "n" => Ok(Input::Next),
        "prev" => Ok(Input::Prev),
        "show" | "s" => parse_index(arg).map(Input::Show),
        "create" => parse_draft(arg).map(Input::Create),
        "delete" | "d" => parse_index(arg).map(Input::Delete),
        "help" | "h" => Ok(Input::Help),
        "quit" | "q" => Ok(Input::Quit),
        other => Err(format!("unknown command :{other}, try :help")),
    }
}

/// Only redraw when something visible changed; typing alone does not.
fn needs_render<R: PartialEq>(previous: Option<&SessionView<R>>, next: &SessionView<R>) -> bool {
    previous.is_none_or(|prev| {
        prev.state != next.state || prev.page != next.page || prev.term != next.term
    })
}

pub struct BrowseCommand {
    cfg: Config,
    source: Source,
}

impl BrowseCommand {
    pub fn new(cfg: Config, source: Source) -> Self {
        Self { cfg, source }
    }
}

#[async_trait::async_trait]
impl Command for BrowseCommand {
    async fn execute(&self) -> Result<()> {
        match self.source {
            Source::Notes => {
                let service = Arc::new(
                    NoteService::new(self.cfg.notes_http())?.with_per_page(self.cfg.notes.per_page),
                );
                browse(service.clone(), self.cfg.notes_policy(), Some(service)).await
            }
            Source::Movies => {
                let service = MovieService::new(self.cfg.movies_http())?
                    .with_language(&self.cfg.movies.language)
                    .with_include_adult(self.cfg.movies.include_adult);
                browse(Arc::new(service), self.cfg.movies_policy(), None).await
            }
        }
    }
}

async fn browse<F>(fetcher: Arc<F>, policy: SessionPolicy, notes: Option<Arc<NoteService>>) -> Result<()>
where
    F: Fetcher,
    F::Record: Record + PartialEq,
{
    let (handle, task) = spawn_session(fetcher, policy);
    let mut views = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut rendered: Option<SessionView<F::Record>> = None;
    let mut mutations: JoinSet<Result<()>> = JoinSet::new();
    let mut quit = false;

    println!("{HELP}\n");

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                let view = views.borrow_and_update().clone();
                if needs_render(rendered.as_ref(), &view) {
                    print!("{}", render_view(&view));
                    rendered = Some(view);
                }
            }
            Some(joined) = mutations.join_next() => joined??,
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_input(&line) {
                    Ok(Input::Quit) => {
                        quit = true;
                        break;
                    }
                    Ok(input) => {
                        if let Some(mutation) = apply(&handle, notes.is_some(), input).await?
                            && let Some(notes) = &notes
                        {
                            mutations.spawn(mutate(handle.clone(), notes.clone(), mutation));
                        }
                    }
                    Err(message) => eprintln!("{message}"),
                }
            }
        }
    }

    while let Some(joined) = mutations.join_next().await {
        joined??;
    }
    // Input ran out rather than the user quitting: show where the last
    // search ended up before leaving.
    if !quit
        && let Ok(view) = handle.settled().await
        && needs_render(rendered.as_ref(), &view)
    {
        print!("{}", render_view(&view));
    }

    // The task may already be gone if the view channel closed.
    let _ = handle.shutdown().await;
    task.await?;
    Ok(())
}

/// A change to the notes collection, run off the input loop.
#[derive(Debug, Clone, PartialEq)]
enum Mutation {
    Create(NoteDraft),
    Delete(String),
}

/// Forward navigation to the session; returns a mutation for the caller to run.
async fn apply<R>(handle: &SessionHandle<R>, writable: bool, input: Input) -> Result<Option<Mutation>>
where
    R: Record + Clone,
{
    debug!(?input, "browse input");
    match input {
        Input::Term(term) => handle.set_term(term).await?,
        Input::Page(page) => handle.set_page(page).await?,
        Input::Next => handle.send(SessionEvent::NextPage).await?,
        Input::Prev => handle.send(SessionEvent::PrevPage).await?,
        Input::Show(index) => match handle.current().items().get(index - 1) {
            Some(item) => println!("\n{}", item.details()),
            None => eprintln!("No item {index} on this page."),
        },
        Input::Create(_) | Input::Delete(_) if !writable => {
            eprintln!("This collection is read-only.");
        }
        Input::Create(draft) => return Ok(Some(Mutation::Create(draft))),
        Input::Delete(index) => match handle.current().items().get(index - 1) {
            Some(item) => return Ok(Some(Mutation::Delete(item.id()))),
            None => eprintln!("No item {index} on this page."),
        },
        Input::Help => println!("{HELP}"),
        Input::Quit => {}
    }
    Ok(None)
}

/// Run `mutation` and refetch on success. A failure is reported on its own
/// and leaves the session as it was.
async fn mutate<R>(handle: SessionHandle<R>, notes: Arc<NoteService>, mutation: Mutation) -> Result<()>
where
    R: Clone,
{
    let outcome = match &mutation {
        Mutation::Create(draft) => notes
            .create(draft)
            .await
            .map(|note| format!("Created note \"{}\"", note.title)),
        Mutation::Delete(id) => notes
            .delete(id)
            .await
            .map(|note| format!("Deleted note \"{}\"", note.title)),
    };
    match outcome {
        Ok(message) => {
            println!("{message}");
            handle.invalidate().await?;
        }
        Err(e) => {
            warn!(?mutation, error = %e, "note mutation failed");
            eprintln!("Could not save the change: {e}");
        }
    }
    Ok(())
}
