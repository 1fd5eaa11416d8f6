use api::NoteTag;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase verbosity. Can be used multiple times (e.g., -v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search movies on TMDB
    Movies {
        query: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// List notes, optionally filtered by a search term
    Notes {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Create a note
    CreateNote {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        /// One of Todo, Work, Personal, Meeting, Shopping
        #[arg(long, default_value_t = NoteTag::Todo)]
        tag: NoteTag,
    },
    /// Delete a note by id
    DeleteNote { id: String },
    /// Interactive search session
    Browse {
        #[arg(value_enum)]
        source: Source,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Notes,
    Movies,
}
