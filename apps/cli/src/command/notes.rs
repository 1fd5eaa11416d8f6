use super::Command;
use crate::config::Config;
use crate::error::{Result, WrapErr};
use crate::render::Record;
use api::{NoteDraft, NoteService};

pub struct CreateNoteCommand {
    cfg: Config,
    draft: NoteDraft,
}

impl CreateNoteCommand {
    pub fn new(cfg: Config, draft: NoteDraft) -> Self {
        Self { cfg, draft }
    }
}

#[async_trait::async_trait]
impl Command for CreateNoteCommand {
    async fn execute(&self) -> Result<()> {
        let service = NoteService::new(self.cfg.notes_http())?;
        let note = service
            .create(&self.draft)
            .await
            .wrap_err("Creating note failed")?;
        println!("Created note {}", note.id);
        print!("{}", note.details());
        Ok(())
    }
}

pub struct DeleteNoteCommand {
    cfg: Config,
    id: String,
}

impl DeleteNoteCommand {
    pub fn new(cfg: Config, id: String) -> Self {
        Self { cfg, id }
    }
}

#[async_trait::async_trait]
impl Command for DeleteNoteCommand {
    async fn execute(&self) -> Result<()> {
        let service = NoteService::new(self.cfg.notes_http())?;
        let note = service
            .delete(self.id.trim())
            .await
            .wrap_err_with(|| format!("Deleting note {} failed", self.id))?;
        println!("Deleted note \"{}\"", note.title);
        Ok(())
    }
}
