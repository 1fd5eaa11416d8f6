//! HTTP clients for the two record backends.
//!
//! - [`NoteService`]: NoteHub notes, searchable, with create and delete
//! - [`MovieService`]: TMDB movie search
//!
//! Both implement [`session::Fetcher`] so they can drive a search session
//! directly.

pub mod client;
pub mod error;
pub mod movies;
pub mod notes;

pub use client::{ApiClient, HttpConfig};
pub use error::{ApiError, Result};
pub use movies::{Movie, MovieSearchParams, MovieService, MoviesResponse};
pub use notes::{FetchNotesParams, FetchNotesResponse, Note, NoteDraft, NoteService, NoteTag};
