//! Plain-text rendering of session views.

use api::{Movie, Note};
use session::{PagerItem, SessionView, ViewState, pager_items};
use std::fmt::Write;

/// A record that can be listed and inspected in the terminal.
pub trait Record {
    const NO_RESULTS: &'static str;

    fn id(&self) -> String;
    /// One line in the result list.
    fn summary(&self) -> String;
    /// Detail view for `:show`.
    fn details(&self) -> String;
}

impl Record for Note {
    const NO_RESULTS: &'static str = "No notes found.";

    fn id(&self) -> String {
        self.id.clone()
    }

    fn summary(&self) -> String {
        format!("{} [{}]", self.title, self.tag)
    }

    fn details(&self) -> String {
        let mut out = format!("{}\nTag: {}\n", self.title, self.tag);
        if let Some(created_at) = self.created_at {
            let _ = writeln!(out, "Created: {}", created_at.format("%Y-%m-%d %H:%M"));
        }
        if !self.content.is_empty() {
            let _ = writeln!(out, "\n{}", self.content);
        }
        out
    }
}

impl Record for Movie {
    const NO_RESULTS: &'static str = "No movies found for your request.";

    fn id(&self) -> String {
        self.id.to_string()
    }

    fn summary(&self) -> String {
        match self.release_date.get(..4) {
            Some(year) => format!("{} ({year}) {}", self.title, self.rating_label()),
            None => format!("{} {}", self.title, self.rating_label()),
        }
    }

    fn details(&self) -> String {
        let mut out = format!("{}\n", self.title);
        if let Some(url) = self.backdrop_url() {
            let _ = writeln!(out, "{url}");
        }
        if !self.overview.is_empty() {
            let _ = writeln!(out, "\n{}\n", self.overview);
        }
        if !self.release_date.is_empty() {
            let _ = writeln!(out, "Release date: {}", self.release_date);
        }
        let _ = writeln!(out, "Rating: {}", self.rating_label());
        out
    }
}

/// Pager line such as `< 1 ... 9 [10] 11 ... 20 >`; `None` for a single page.
pub fn pager_line(current: u32, total: u32) -> Option<String> {
    let items = pager_items(current, total);
    if items.is_empty() {
        return None;
    }
    let parts: Vec<String> = items
        .into_iter()
        .filter_map(|item| match item {
            PagerItem::Previous { enabled } => enabled.then(|| "<".to_string()),
            PagerItem::Next { enabled } => enabled.then(|| ">".to_string()),
            PagerItem::Page { number, current: true } => Some(format!("[{number}]")),
            PagerItem::Page { number, .. } => Some(number.to_string()),
            PagerItem::Break => Some("...".to_string()),
        })
        .collect();
    Some(parts.join(" "))
}

pub fn render_view<R: Record>(view: &SessionView<R>) -> String {
    let mut out = String::new();
    match &view.state {
        ViewState::Idle => out.push_str("Type something to search.\n"),
        ViewState::Loading => out.push_str("Loading...\n"),
        ViewState::NoResults => {
            let _ = writeln!(out, "{}", R::NO_RESULTS);
        }
        ViewState::Error(e) => {
            let _ = writeln!(out, "{}", e.user_message());
        }
        ViewState::Results { page, refreshing } => {
            for (index, item) in page.items.iter().enumerate() {
                let _ = writeln!(out, "{:>3}. {}", index + 1, item.summary());
            }
            if let Some(line) = pager_line(view.page, view.total_pages) {
                let _ = writeln!(out, "\n{line}");
            }
            if *refreshing {
                out.push_str("Loading...\n");
            }
        }
    }
    out
}
