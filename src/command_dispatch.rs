//! Purpose: Hold top-level CLI command dispatch for `bookshelf`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: The catalog is opened at most once per command, after argument parsing.
//! Invariants: A missing book on delete/status surfaces as `NotFound` (exit 3).

use super::*;
use crate::book_json::{book_json, books_json};
use bookshelf::api::Catalog;
use bookshelf::shell::run_shell;
use std::path::Path;

pub(super) fn dispatch_command(
    command: Command,
    catalog_path: PathBuf,
    color_mode: ColorMode,
) -> Result<RunOutcome, Error> {
    let cmd = command.name();
    match command {
        Command::Completion { shell } => {
            print_completion(shell);
            Ok(RunOutcome::ok())
        }
        Command::Version => {
            emit_version_output();
            Ok(RunOutcome::ok())
        }
        Command::Add {
            title,
            author,
            year,
        } => {
            let mut catalog = open_catalog(&catalog_path, cmd, color_mode);
            let book = catalog.add(title, author, year)?;
            emit_json(json!({ "added": book_json(book)? }));
            Ok(RunOutcome::ok())
        }
        Command::Delete { id } => {
            let mut catalog = open_catalog(&catalog_path, cmd, color_mode);
            let Some(book) = catalog.get(id).cloned() else {
                return Err(book_not_found(id, &catalog_path));
            };
            if !catalog.delete(id)? {
                return Err(book_not_found(id, &catalog_path));
            }
            emit_json(json!({ "deleted": book_json(&book)? }));
            Ok(RunOutcome::ok())
        }
        Command::Search { field, value } => {
            let catalog = open_catalog(&catalog_path, cmd, color_mode);
            let matches = catalog.search(field.into(), &value);
            emit_json(books_json(matches)?);
            Ok(RunOutcome::ok())
        }
        Command::List => {
            let catalog = open_catalog(&catalog_path, cmd, color_mode);
            emit_json(books_json(catalog.list())?);
            Ok(RunOutcome::ok())
        }
        Command::Status { id, status } => {
            let mut catalog = open_catalog(&catalog_path, cmd, color_mode);
            if !catalog.update_status(id, status.into())? {
                return Err(book_not_found(id, &catalog_path));
            }
            let book = catalog.get(id).ok_or_else(|| book_not_found(id, &catalog_path))?;
            emit_json(json!({ "updated": book_json(book)? }));
            Ok(RunOutcome::ok())
        }
        Command::Shell => {
            let mut catalog = open_catalog(&catalog_path, cmd, color_mode);
            let stdin = io::stdin();
            run_shell(&mut catalog, stdin.lock(), io::stdout().lock())?;
            Ok(RunOutcome::ok())
        }
    }
}

fn open_catalog(path: &Path, cmd: &str, color_mode: ColorMode) -> Catalog {
    let catalog = Catalog::open(path);
    let label = path.display().to_string();
    if let Some(notice) =
        Notice::from_load_outcome(catalog.load_outcome(), cmd, &label, notice_time_now())
    {
        emit_notice(&notice, color_mode);
    }
    catalog
}

fn book_not_found(id: u64, path: &Path) -> Error {
    Error::new(ErrorKind::NotFound)
        .with_message("book not found")
        .with_path(path)
        .with_id(id)
        .with_hint("Run `bookshelf list` to see existing ids.")
}
