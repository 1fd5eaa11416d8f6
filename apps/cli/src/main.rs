mod cli;
mod command;
mod config;
mod error;
mod render;

use error::WrapErr;

use clap::CommandFactory;
use clap::Parser;
use tracing::Level;

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> error::Result<()> {
    color_eyre::install()?;
    let command_line = cli::Cli::parse();
    init_tracing(command_line.verbose);

    let Some(command) = command_line.command else {
        cli::Cli::command().print_help()?;
        return Ok(());
    };

    let cfg = config::Config::load(command_line.config.as_deref())
        .context("Load configuration error")?;

    let cmd: Box<dyn command::Command> = match command {
        cli::Commands::Movies { query, page } => {
            Box::new(command::MoviesCommand::new(cfg, query, page))
        }
        cli::Commands::Notes { search, page } => {
            Box::new(command::NotesCommand::new(cfg, search, page))
        }
        cli::Commands::CreateNote { title, content, tag } => Box::new(
            command::CreateNoteCommand::new(cfg, api::NoteDraft::new(title, content, tag)),
        ),
        cli::Commands::DeleteNote { id } => Box::new(command::DeleteNoteCommand::new(cfg, id)),
        cli::Commands::Browse { source } => Box::new(command::BrowseCommand::new(cfg, source)),
    };
    cmd.execute().await?;

    Ok(())
}
