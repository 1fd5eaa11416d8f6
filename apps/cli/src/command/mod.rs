pub mod browse;
pub mod notes;
pub mod search;

use crate::error::Result;

pub use browse::BrowseCommand;
pub use notes::{CreateNoteCommand, DeleteNoteCommand};
pub use search::{MoviesCommand, NotesCommand};

#[async_trait::async_trait]
pub trait Command {
    async fn execute(&self) -> Result<()>;
}
