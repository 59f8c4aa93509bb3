//! Purpose: JSON envelopes for books printed by the CLI.
//! Exports: `book_json` and `books_json`.
//! Role: Keep stdout payload shapes consistent across commands.
//! Invariants: Book objects are the catalog file's serde encoding of `Book`.

use bookshelf::api::{Book, Error, ErrorKind};
use serde_json::{Value, json};

pub(crate) fn book_json(book: &Book) -> Result<Value, Error> {
    serde_json::to_value(book).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode book")
            .with_id(book.id)
            .with_source(err)
    })
}

pub(crate) fn books_json<'a>(books: impl IntoIterator<Item = &'a Book>) -> Result<Value, Error> {
    let items = books
        .into_iter()
        .map(book_json)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(json!({
        "count": items.len(),
        "books": items,
    }))
}
