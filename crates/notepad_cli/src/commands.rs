//! Subcommand handlers.

use crate::{Command, EditSource, ExportKind, NoteArg, TemplateAction};
use anyhow::{anyhow, bail, Context, Result};
use chrono::Local;
use notepad_core::model::note::format_timestamp;
use notepad_core::template::find_builtin;
use notepad_core::{
    builtin_templates, export_filename, export_html, export_pdf, export_plaintext,
    markup_to_plaintext, preview_text, Clock, DocumentStats, ExportFormat, NoteFilter, NoteId,
    NotePatch, NoteRepository, NoteStore,
};
use std::path::PathBuf;

const LIST_PREVIEW_CHARS: usize = 60;
const SHORT_ID_CHARS: usize = 8;

pub(crate) fn run<S: NoteStore, C: Clock>(
    repo: &mut NoteRepository<S, C>,
    command: Command,
) -> Result<()> {
    match command {
        Command::New => {
            let note = repo.create_note()?;
            println!("{}", note.id);
        }
        Command::List { query, tag, folder } => {
            let filter = NoteFilter { query, tag, folder };
            list(repo, &filter);
        }
        Command::Show { id } => show(repo, id.as_deref())?,
        Command::Select { id } => {
            let id = resolve(repo, Some(&id))?;
            repo.select_note(id);
            println!("{id}");
        }
        Command::Title { text, target } => {
            let id = target.resolve(repo)?;
            repo.update_note(id, NotePatch::title(text))?;
        }
        Command::Edit { source, target } => {
            let id = target.resolve(repo)?;
            let markup = read_source(source)?;
            repo.update_note(id, NotePatch::content(markup))?;
        }
        Command::Tag { tags, target } => {
            let id = target.resolve(repo)?;
            let note = repo.update_note(id, NotePatch::tags(tags))?;
            println!("{}", note.tags.join(", "));
        }
        Command::Folder { name, target } => {
            let id = target.resolve(repo)?;
            repo.update_note(id, NotePatch::folder(name))?;
        }
        Command::Delete { id } => {
            let id = resolve(repo, id.as_deref())?;
            repo.delete_note(id)?;
            match repo.current_id() {
                Some(current) => println!("deleted {id}; current {current}"),
                None => println!("deleted {id}; no notes left"),
            }
        }
        Command::Reset { target } => {
            let id = target.resolve(repo)?;
            repo.reset_note(id)?;
        }
        Command::Template { action } => match action {
            TemplateAction::List => {
                for template in builtin_templates() {
                    println!(
                        "{:<14} {:<14} {}",
                        template.id,
                        template.name,
                        template.tags.join(", ")
                    );
                }
            }
            TemplateAction::Apply { id, target } => {
                let template =
                    find_builtin(&id).ok_or_else(|| anyhow!("unknown template `{id}`"))?;
                let note_id = target.resolve(repo)?;
                let note = repo.apply_template(note_id, &template)?;
                println!("{}", note.title);
            }
        },
        Command::Export {
            format,
            out,
            target,
        } => {
            let id = target.resolve(repo)?;
            let path = export(repo, id, format, out)?;
            println!("{}", path.display());
        }
        Command::Stats { target } => {
            let id = target.resolve(repo)?;
            let note = repo.get(id).ok_or_else(|| anyhow!("note {id} not found"))?;
            let stats = DocumentStats::from_markup(&note.content);
            println!("words: {}", stats.words);
            println!("characters: {}", stats.characters);
            println!("characters (no spaces): {}", stats.characters_no_spaces);
            println!("paragraphs: {}", stats.paragraphs);
            println!("reading time: {} min", stats.reading_minutes);
        }
        Command::Tags => {
            for tag in repo.all_tags() {
                println!("{tag}");
            }
        }
        Command::Folders => {
            for folder in repo.all_folders() {
                println!("{folder}");
            }
        }
    }
    Ok(())
}

impl NoteArg {
    fn resolve<S: NoteStore, C: Clock>(&self, repo: &NoteRepository<S, C>) -> Result<NoteId> {
        resolve(repo, self.note.as_deref())
    }
}

/// Resolves an id prefix, or the current note when `prefix` is `None`.
fn resolve<S: NoteStore, C: Clock>(
    repo: &NoteRepository<S, C>,
    prefix: Option<&str>,
) -> Result<NoteId> {
    let Some(prefix) = prefix else {
        return repo
            .current_note()
            .map(|note| note.id)
            .ok_or_else(|| anyhow!("no current note; run `notepad new` or pass a note id"));
    };

    let needle = prefix.trim().to_ascii_lowercase();
    if needle.is_empty() {
        bail!("note id cannot be empty");
    }
    let matches: Vec<NoteId> = repo
        .notes()
        .iter()
        .filter(|note| note.id.to_string().starts_with(&needle))
        .map(|note| note.id)
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => bail!("no note matches `{prefix}`"),
        _ => bail!("`{prefix}` matches {} notes; use a longer prefix", matches.len()),
    }
}

fn list<S: NoteStore, C: Clock>(repo: &NoteRepository<S, C>, filter: &NoteFilter) {
    let current = repo.current_id();
    for note in repo.filter(filter) {
        let marker = if Some(note.id) == current { '*' } else { ' ' };
        let short: String = note.id.to_string().chars().take(SHORT_ID_CHARS).collect();
        let tags = if note.tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", note.tags.join(", "))
        };
        println!(
            "{marker} {short}  {}{tags}  {}",
            note.title,
            preview_text(&note.content, LIST_PREVIEW_CHARS)
        );
    }
}

fn show<S: NoteStore, C: Clock>(repo: &NoteRepository<S, C>, id: Option<&str>) -> Result<()> {
    let id = resolve(repo, id)?;
    let note = repo.get(id).ok_or_else(|| anyhow!("note {id} not found"))?;
    println!("{}", note.title);
    println!("id: {}", note.id);
    if !note.tags.is_empty() {
        println!("tags: {}", note.tags.join(", "));
    }
    if let Some(folder) = &note.folder {
        println!("folder: {folder}");
    }
    println!("created: {}", format_timestamp(&note.created_at));
    println!("updated: {}", format_timestamp(&note.updated_at));
    println!();
    println!("{}", markup_to_plaintext(&note.content));
    Ok(())
}

fn read_source(source: EditSource) -> Result<String> {
    match (source.file, source.content) {
        (Some(path), _) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read `{}`", path.display())),
        (None, Some(content)) => Ok(content),
        (None, None) => bail!("pass --file or --content"),
    }
}

fn export<S: NoteStore, C: Clock>(
    repo: &NoteRepository<S, C>,
    id: NoteId,
    kind: ExportKind,
    out: Option<PathBuf>,
) -> Result<PathBuf> {
    let note = repo.get(id).ok_or_else(|| anyhow!("note {id} not found"))?;
    let format = match kind {
        ExportKind::Txt => ExportFormat::Text,
        ExportKind::Html => ExportFormat::Html,
        ExportKind::Pdf => ExportFormat::Pdf,
    };
    let bytes = match format {
        ExportFormat::Text => export_plaintext(&note.title, &note.content).into_bytes(),
        ExportFormat::Html => {
            export_html(&note.title, &note.content, Local::now().date_naive()).into_bytes()
        }
        ExportFormat::Pdf => export_pdf(&note.title, &note.content)?,
    };
    let path = out.unwrap_or_else(|| PathBuf::from(export_filename(&note.title, format)));
    std::fs::write(&path, bytes)
        .with_context(|| format!("failed to write `{}`", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use notepad_core::{NoteRepository, SqliteNoteStore};

    #[test]
    fn resolve_accepts_unique_prefix_and_defaults_to_current() {
        let mut repo = NoteRepository::new(SqliteNoteStore::in_memory().unwrap());
        repo.load().unwrap();
        assert!(resolve(&repo, None).is_err());

        let first = repo.create_note().unwrap();
        let second = repo.create_note().unwrap();
        assert_eq!(resolve(&repo, None).unwrap(), second.id);

        let full = first.id.to_string();
        assert_eq!(resolve(&repo, Some(&full)).unwrap(), first.id);
        assert_eq!(resolve(&repo, Some(&full.to_uppercase())).unwrap(), first.id);
        assert!(resolve(&repo, Some("zzzz")).is_err());
        assert!(resolve(&repo, Some("")).is_err());
    }
}
