//! Runs a [`SearchSession`] on a tokio task.
//!
//! The task is the only owner of the session. It waits on three sources at
//! once: user events, the debounce deadline and finished fetches. Each
//! fetch runs on its own task and reports back with its ticket; in-flight
//! fetches are never cancelled, the session simply ignores stale ones.
//! After every step the task publishes a fresh [`SessionView`].

use crate::controller::{SearchSession, SessionPolicy};
use crate::fetcher::{FetchResult, Fetcher};
use crate::key::FetchTicket;
use crate::status::SessionView;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

const EVENT_QUEUE_SIZE: usize = 64;

#[derive(Debug)]
pub enum SessionEvent {
    SetTerm(String),
    SetPage(u32),
    NextPage,
    PrevPage,
    /// Records changed on the server; drop cached pages and refetch
    Invalidate,
    /// Answered once every earlier event is applied and published
    Barrier(oneshot::Sender<()>),
    Shutdown,
}

/// Client side of a running session.
pub struct SessionHandle<R> {
    tx: mpsc::Sender<SessionEvent>,
    views: watch::Receiver<SessionView<R>>,
}

impl<R> Clone for SessionHandle<R> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            views: self.views.clone(),
        }
    }
}

/// The session task has stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("search session has shut down")]
pub struct SessionClosed;

impl<R: Clone> SessionHandle<R> {
    pub async fn send(&self, event: SessionEvent) -> Result<(), SessionClosed> {
        self.tx.send(event).await.map_err(|_| SessionClosed)
    }

    pub async fn set_term(&self, term: impl Into<String>) -> Result<(), SessionClosed> {
        self.send(SessionEvent::SetTerm(term.into())).await
    }

    pub async fn set_page(&self, page: u32) -> Result<(), SessionClosed> {
        self.send(SessionEvent::SetPage(page)).await
    }

    pub async fn invalidate(&self) -> Result<(), SessionClosed> {
        self.send(SessionEvent::Invalidate).await
    }

    pub async fn shutdown(&self) -> Result<(), SessionClosed> {
        self.send(SessionEvent::Shutdown).await
    }

    /// Wait until the session has caught up with everything sent so far:
    /// no term waiting on the debounce and no fetch in flight.
    pub async fn settled(&self) -> Result<SessionView<R>, SessionClosed> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionEvent::Barrier(tx)).await?;
        rx.await.map_err(|_| SessionClosed)?;
        self.wait_for(|view| view.is_settled() && view.raw_term == view.term)
            .await
    }

    /// Latest published view.
    pub fn current(&self) -> SessionView<R> {
        self.views.borrow().clone()
    }

    /// A receiver that is notified whenever a new view is published.
    pub fn subscribe(&self) -> watch::Receiver<SessionView<R>> {
        self.views.clone()
    }

    /// Wait until a published view satisfies `predicate`.
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&SessionView<R>) -> bool,
    ) -> Result<SessionView<R>, SessionClosed> {
        let mut views = self.views.clone();
        let view = views
            .wait_for(|view| predicate(view))
            .await
            .map_err(|_| SessionClosed)?;
        Ok(view.clone())
    }
}

/// Start a session task for `fetcher`.
pub fn spawn_session<F: Fetcher>(
    fetcher: Arc<F>,
    policy: SessionPolicy,
) -> (SessionHandle<F::Record>, JoinHandle<()>) {
    let (tx, events) = mpsc::channel(EVENT_QUEUE_SIZE);
    let session = SearchSession::new(policy);
    let (views_tx, views) = watch::channel(session.view());

    let driver = SessionDriver {
        fetcher,
        session,
        events,
        views: views_tx,
    };
    let handle = tokio::spawn(driver.run());

    (SessionHandle { tx, views }, handle)
}

type Completion<R> = (FetchTicket, FetchResult<R>);

struct SessionDriver<F: Fetcher> {
    fetcher: Arc<F>,
    session: SearchSession<F::Record>,
    events: mpsc::Receiver<SessionEvent>,
    views: watch::Sender<SessionView<F::Record>>,
}

impl<F: Fetcher> SessionDriver<F> {
    async fn run(mut self) {
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion<F::Record>>();

        if let Some(ticket) = self.session.start() {
            self.dispatch(ticket, &done_tx);
        }
        self.publish();

        loop {
            let deadline = self.session.debounce_deadline();

            let ticket = tokio::select! {
                event = self.events.recv() => match event {
                    None | Some(SessionEvent::Shutdown) => break,
                    Some(SessionEvent::Barrier(done)) => {
                        self.publish();
                        let _ = done.send(());
                        None
                    }
                    Some(event) => self.apply(event),
                },
                Some((ticket, result)) = done_rx.recv() => {
                    self.session.resolve(ticket, result);
                    None
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.session.poll_debounce(Instant::now())
                }
            };

            if let Some(ticket) = ticket {
                self.dispatch(ticket, &done_tx);
            }
            self.publish();
        }

        info!("search session stopped");
    }

    fn apply(&mut self, event: SessionEvent) -> Option<FetchTicket> {
        debug!(?event, "session event");
        match event {
            SessionEvent::SetTerm(term) => self.session.set_search_term(term, Instant::now()),
            SessionEvent::SetPage(page) => self.session.set_page(page),
            SessionEvent::NextPage => self.session.next_page(),
            SessionEvent::PrevPage => self.session.prev_page(),
            SessionEvent::Invalidate => self.session.invalidate(),
            SessionEvent::Barrier(_) | SessionEvent::Shutdown => None,
        }
    }

    fn dispatch(&self, ticket: FetchTicket, done_tx: &mpsc::UnboundedSender<Completion<F::Record>>) {
        let fetcher = self.fetcher.clone();
        let done_tx = done_tx.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch(&ticket.key).await;
            // Receiver is gone only when the session stopped
            let _ = done_tx.send((ticket, result));
        });
    }

    fn publish(&self) {
        self.views.send_replace(self.session.view());
    }
}
