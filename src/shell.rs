//! Purpose: Interactive numbered-menu front end over `Catalog`.
//! Exports: `run_shell`.
//! Role: Validates raw text input and calls catalog operations with typed values.
//! Invariants: Catalog operations only ever see validated ids, years, and statuses.
//! Invariants: End of input exits cleanly; save failures end the session with an error.
use std::fmt::Display;
use std::io::{self, BufRead, Write};

use crate::api::{ApiResult, Book, BookStatus, Catalog, Error, ErrorKind, SearchField};

const MENU: &str = "\
Menu:
1. Add a book
2. Delete a book
3. Search books
4. List all books
5. Change book status
6. Exit";

pub fn run_shell<R: BufRead, W: Write>(
    catalog: &mut Catalog,
    input: R,
    output: W,
) -> ApiResult<()> {
    let mut session = Session { input, output };
    loop {
        session.say("")?;
        session.say(MENU)?;
        let Some(choice) = session.ask("Choose an action: ")? else {
            return Ok(());
        };
        let keep_going = match choice.trim() {
            "1" => add_book(catalog, &mut session)?,
            "2" => delete_book(catalog, &mut session)?,
            "3" => search_books(catalog, &mut session)?,
            "4" => list_books(catalog, &mut session)?,
            "5" => change_status(catalog, &mut session)?,
            "6" => {
                session.say("Goodbye.")?;
                return Ok(());
            }
            _ => {
                session.say("Unknown choice, try again.")?;
                true
            }
        };
        if !keep_going {
            return Ok(());
        }
    }
}

pub fn format_book(book: &Book) -> String {
    format!(
        "#{} {} by {} ({}) [{}]",
        book.id, book.title, book.author, book.year, book.status
    )
}

struct Session<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    fn say(&mut self, text: impl Display) -> ApiResult<()> {
        writeln!(self.output, "{text}").map_err(write_failed)
    }

    /// Prompt and read one line; `None` at end of input.
    fn ask(&mut self, label: &str) -> ApiResult<Option<String>> {
        write!(self.output, "{label}").map_err(write_failed)?;
        self.output.flush().map_err(write_failed)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message("failed to read input")
                .with_source(err)
        })?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

fn write_failed(err: io::Error) -> Error {
    Error::new(ErrorKind::Io)
        .with_message("failed to write output")
        .with_source(err)
}

fn parse_digits<T: std::str::FromStr>(text: &str) -> Option<T> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

// Each handler returns `Ok(false)` when input ran out mid-prompt.

fn add_book<R: BufRead, W: Write>(
    catalog: &mut Catalog,
    session: &mut Session<R, W>,
) -> ApiResult<bool> {
    let Some(title) = session.ask("Title: ")? else {
        return Ok(false);
    };
    let Some(author) = session.ask("Author: ")? else {
        return Ok(false);
    };
    let Some(year) = session.ask("Publication year: ")? else {
        return Ok(false);
    };
    match parse_digits::<i32>(&year) {
        Some(year) => {
            let book = catalog.add(title, author, year)?;
            let message = format!("Book added with id {}.", book.id);
            session.say(message)?;
        }
        None => session.say("Invalid publication year.")?,
    }
    Ok(true)
}

fn delete_book<R: BufRead, W: Write>(
    catalog: &mut Catalog,
    session: &mut Session<R, W>,
) -> ApiResult<bool> {
    let Some(id) = session.ask("Id of the book to delete: ")? else {
        return Ok(false);
    };
    let deleted = match parse_digits::<u64>(&id) {
        Some(id) => catalog.delete(id)?,
        None => false,
    };
    if deleted {
        session.say("Book deleted.")?;
    } else {
        session.say("No book with that id.")?;
    }
    Ok(true)
}

fn search_books<R: BufRead, W: Write>(
    catalog: &mut Catalog,
    session: &mut Session<R, W>,
) -> ApiResult<bool> {
    let Some(field) = session.ask("Field to search (id, title, author, year, status): ")? else {
        return Ok(false);
    };
    let Some(value) = session.ask("Value to search for: ")? else {
        return Ok(false);
    };
    let Some(field) = SearchField::from_name(&field) else {
        let names: Vec<_> = SearchField::ALL.iter().map(|field| field.name()).collect();
        session.say(format!("Unknown field. Use one of: {}.", names.join(", ")))?;
        return Ok(true);
    };

    let results = catalog.search(field, &value);
    if results.is_empty() {
        session.say("No books match.")?;
    } else {
        session.say(format!("Found {} book(s):", results.len()))?;
        for book in results {
            session.say(format_book(book))?;
        }
    }
    Ok(true)
}

fn list_books<R: BufRead, W: Write>(
    catalog: &mut Catalog,
    session: &mut Session<R, W>,
) -> ApiResult<bool> {
    let books = catalog.list();
    if books.is_empty() {
        session.say("The catalog is empty.")?;
        return Ok(true);
    }
    session.say("All books:")?;
    for book in books {
        session.say(format_book(book))?;
    }
    Ok(true)
}

fn change_status<R: BufRead, W: Write>(
    catalog: &mut Catalog,
    session: &mut Session<R, W>,
) -> ApiResult<bool> {
    let Some(id) = session.ask("Id of the book: ")? else {
        return Ok(false);
    };
    let Some(status) = session.ask("New status (available/checked out): ")? else {
        return Ok(false);
    };
    let (Some(id), Ok(status)) = (parse_digits::<u64>(&id), status.parse::<BookStatus>()) else {
        session.say("Invalid input.")?;
        return Ok(true);
    };
    if catalog.update_status(id, status)? {
        session.say("Status updated.")?;
    } else {
        session.say("No book with that id.")?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::{format_book, parse_digits, run_shell};
    use crate::api::{Book, BookStatus, Catalog};
    use std::io::Cursor;

    fn run(catalog: &mut Catalog, script: &str) -> String {
        let mut out = Vec::new();
        run_shell(catalog, Cursor::new(script.as_bytes()), &mut out).expect("shell");
        String::from_utf8(out).expect("utf8")
    }

    fn temp_catalog() -> (tempfile::TempDir, Catalog) {
        let temp = tempfile::tempdir().expect("tempdir");
        let catalog = Catalog::open(temp.path().join("library.json"));
        (temp, catalog)
    }

    #[test]
    fn add_list_and_exit() {
        let (_temp, mut catalog) = temp_catalog();
        let out = run(&mut catalog, "1\nProcess\nF. Kafka\n1925\n4\n6\n");

        assert!(out.contains("Book added with id 1."));
        assert!(out.contains("#1 Process by F. Kafka (1925) [available]"));
        assert!(out.trim_end().ends_with("Goodbye."));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn invalid_year_is_rejected_without_adding() {
        let (_temp, mut catalog) = temp_catalog();
        let out = run(&mut catalog, "1\nProcess\nF. Kafka\nnineteen\n6\n");
        assert!(out.contains("Invalid publication year."));
        assert!(catalog.is_empty());
        assert!(!catalog.path().exists());
    }

    #[test]
    fn status_change_and_delete_report_outcomes() {
        let (_temp, mut catalog) = temp_catalog();
        catalog.add("Process", "F. Kafka", 1925).expect("add");

        let out = run(
            &mut catalog,
            "5\n1\nchecked out\n5\n9\navailable\n5\n1\nlost\n2\nx\n2\n1\n",
        );
        assert!(out.contains("Status updated."));
        assert_eq!(out.matches("No book with that id.").count(), 2);
        assert!(out.contains("Invalid input."));
        assert!(out.contains("Book deleted."));
        assert!(catalog.is_empty());
    }

    #[test]
    fn search_prints_matches_and_rejects_unknown_fields() {
        let (_temp, mut catalog) = temp_catalog();
        catalog.add("Process", "F. Kafka", 1925).expect("add");
        catalog.add("Lolita", "V. Nabokov", 1955).expect("add");

        let out = run(&mut catalog, "3\nAuthor\nv. nabokov\n3\nisbn\n123\n3\nyear\n2000\n");
        assert!(out.contains("Found 1 book(s):"));
        assert!(out.contains("#2 Lolita by V. Nabokov (1955) [available]"));
        assert!(out.contains("Unknown field. Use one of: id, title, author, year, status."));
        assert!(out.contains("No books match."));
    }

    #[test]
    fn unknown_choice_and_empty_catalog_messages() {
        let (_temp, mut catalog) = temp_catalog();
        let out = run(&mut catalog, "9\n4\n");
        assert!(out.contains("Unknown choice, try again."));
        assert!(out.contains("The catalog is empty."));
    }

    #[test]
    fn eof_mid_prompt_exits_cleanly() {
        let (_temp, mut catalog) = temp_catalog();
        let out = run(&mut catalog, "1\nProcess\n");
        assert!(out.contains("Author: "));
        assert!(catalog.is_empty());
    }

    #[test]
    fn digit_parsing_is_strict() {
        assert_eq!(parse_digits::<u64>(" 12 "), Some(12));
        assert_eq!(parse_digits::<u64>("-1"), None);
        assert_eq!(parse_digits::<u64>("+1"), None);
        assert_eq!(parse_digits::<i32>(""), None);
        assert_eq!(parse_digits::<i32>("99999999999"), None);
    }

    #[test]
    fn format_book_shows_status_text() {
        let mut book = Book::new(4, "Dune", "F. Herbert", 1965);
        book.status = BookStatus::CheckedOut;
        assert_eq!(format_book(&book), "#4 Dune by F. Herbert (1965) [checked out]");
    }
}
