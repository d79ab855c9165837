//! Terminal front-end for the notepad.
//!
//! # Responsibility
//! - Drive the note repository from the shell, one operation per process.
//! - Default every note operation to the persisted current note.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use notepad_core::{init_logging, LogTarget, NoteRepository, SqliteNoteStore};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "notepad", version, about = "Local notes with tags, folders, templates and export")]
#[command(propagate_version = true)]
struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, env = "NOTEPAD_DB", default_value = "notepad.db")]
    db: PathBuf,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true, env = "NOTEPAD_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Absolute directory for rotating log files. Logs go to stderr when unset.
    #[arg(long, global = true, env = "NOTEPAD_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Picks a note by id prefix; the current note when omitted.
#[derive(Args, Debug, Clone, Default)]
struct NoteArg {
    /// Note id or unique id prefix.
    #[arg(long = "note", short = 'n')]
    note: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Create an empty note and select it
    New,
    /// List notes, optionally filtered
    List {
        /// Case-insensitive text in title or content
        #[arg(long, short)]
        query: Option<String>,
        /// Exact tag
        #[arg(long, short)]
        tag: Option<String>,
        /// Exact folder
        #[arg(long, short)]
        folder: Option<String>,
    },
    /// Print a note
    Show {
        /// Note id or unique id prefix
        id: Option<String>,
    },
    /// Make a note current
    Select {
        /// Note id or unique id prefix
        id: String,
    },
    /// Rename a note
    Title {
        text: String,
        #[command(flatten)]
        target: NoteArg,
    },
    /// Replace a note's content markup
    Edit {
        #[command(flatten)]
        source: EditSource,
        #[command(flatten)]
        target: NoteArg,
    },
    /// Replace a note's tags (no tags clears them)
    Tag {
        tags: Vec<String>,
        #[command(flatten)]
        target: NoteArg,
    },
    /// Move a note into a folder (no name clears it)
    Folder {
        name: Option<String>,
        #[command(flatten)]
        target: NoteArg,
    },
    /// Delete a note
    Delete {
        /// Note id or unique id prefix
        id: Option<String>,
    },
    /// Clear a note back to an untitled empty note
    Reset {
        #[command(flatten)]
        target: NoteArg,
    },
    /// Browse or apply templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },
    /// Export a note as text, HTML or PDF
    Export {
        #[arg(value_enum)]
        format: ExportKind,
        /// Output path; defaults to a name derived from the title
        #[arg(long, short)]
        out: Option<PathBuf>,
        #[command(flatten)]
        target: NoteArg,
    },
    /// Word, character and paragraph counts
    Stats {
        #[command(flatten)]
        target: NoteArg,
    },
    /// All tags in use
    Tags,
    /// All folders in use
    Folders,
}

impl Command {
    /// Subcommand name for log lines.
    fn name(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::List { .. } => "list",
            Self::Show { .. } => "show",
            Self::Select { .. } => "select",
            Self::Title { .. } => "title",
            Self::Edit { .. } => "edit",
            Self::Tag { .. } => "tag",
            Self::Folder { .. } => "folder",
            Self::Delete { .. } => "delete",
            Self::Reset { .. } => "reset",
            Self::Template { .. } => "template",
            Self::Export { .. } => "export",
            Self::Stats { .. } => "stats",
            Self::Tags => "tags",
            Self::Folders => "folders",
        }
    }
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct EditSource {
    /// Read markup from a file
    #[arg(long)]
    file: Option<PathBuf>,
    /// Markup given inline
    #[arg(long)]
    content: Option<String>,
}

#[derive(Subcommand)]
enum TemplateAction {
    /// Show builtin templates
    List,
    /// Apply a template to a note
    Apply {
        /// Template id, e.g. meeting-notes
        id: String,
        #[command(flatten)]
        target: NoteArg,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExportKind {
    Txt,
    Html,
    Pdf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let target = match &cli.log_dir {
        Some(dir) => LogTarget::File(dir.clone()),
        None => LogTarget::Stderr,
    };
    init_logging(&cli.log_level, target).map_err(anyhow::Error::msg)?;

    let store = SqliteNoteStore::open(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let mut repo = NoteRepository::new(store);
    repo.load().context("failed to load notes")?;

    let name = cli.command.name();
    info!(
        "event=cli_command module=cli status=start command={name} notes={}",
        repo.len()
    );
    commands::run(&mut repo, cli.command)?;
    info!(
        "event=cli_command module=cli status=ok command={name} notes={} unsynced={}",
        repo.len(),
        repo.unsynced_ids().len()
    );
    Ok(())
}
