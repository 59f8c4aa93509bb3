// Catalog operations over a `RecordStore`; every mutation rewrites the file before returning.
use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::book::{Book, BookStatus, SearchField};
use crate::core::error::{Error, ErrorKind};
use crate::core::store::{LoadOutcome, RecordStore};

#[derive(Debug)]
pub struct Catalog {
    store: RecordStore,
    load_outcome: LoadOutcome,
}

impl Catalog {
    /// Open the catalog backed by `path`, starting empty if the file is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::from_store(RecordStore::new(path))
    }

    pub fn from_store(mut store: RecordStore) -> Self {
        let load_outcome = store.load();
        Self {
            store,
            load_outcome,
        }
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.load_outcome
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Max existing id + 1, or 1 for an empty catalog.
    pub fn next_id(&self) -> Result<u64, Error> {
        let Some(max) = self.store.books().iter().map(|book| book.id).max() else {
            return Ok(1);
        };
        max.checked_add(1).ok_or_else(|| {
            Error::new(ErrorKind::Corrupt)
                .with_message("no book ids left above the current maximum")
                .with_path(self.path())
                .with_id(max)
        })
    }

    pub fn add(
        &mut self,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
    ) -> Result<&Book, Error> {
        let id = self.next_id()?;
        let book = Book::new(id, title, author, year);
        self.store.books_mut().push(book);
        if let Err(err) = self.store.save() {
            self.store.books_mut().pop();
            return Err(err);
        }
        info!(id, "added book");

        self.store.books().last().ok_or_else(|| {
            Error::new(ErrorKind::Internal)
                .with_message("added book missing from store")
                .with_id(id)
        })
    }

    /// Returns `Ok(false)` and leaves the file untouched when no book has `id`.
    pub fn delete(&mut self, id: u64) -> Result<bool, Error> {
        let books = self.store.books_mut();
        let Some(index) = books.iter().position(|book| book.id == id) else {
            return Ok(false);
        };
        let removed = books.remove(index);
        if let Err(err) = self.store.save() {
            self.store.books_mut().insert(index, removed);
            return Err(err);
        }
        info!(id, "deleted book");
        Ok(true)
    }

    pub fn search(&self, field: SearchField, value: &str) -> Vec<&Book> {
        self.store
            .books()
            .iter()
            .filter(|book| book.matches(field, value))
            .collect()
    }

    /// Like `search`, but with the field chosen by name; unknown names match nothing,
    /// even when `value` is empty.
    pub fn search_by_name(&self, field: &str, value: &str) -> Vec<&Book> {
        match SearchField::from_name(field) {
            Some(field) => self.search(field, value),
            None => Vec::new(),
        }
    }

    pub fn list(&self) -> &[Book] {
        self.store.books()
    }

    pub fn get(&self, id: u64) -> Option<&Book> {
        self.store.books().iter().find(|book| book.id == id)
    }

    pub fn update_status(&mut self, id: u64, status: BookStatus) -> Result<bool, Error> {
        let Some(book) = self.store.books_mut().iter_mut().find(|book| book.id == id) else {
            return Ok(false);
        };
        let previous = std::mem::replace(&mut book.status, status);
        if let Err(err) = self.store.save() {
            if let Some(book) = self.store.books_mut().iter_mut().find(|book| book.id == id) {
                book.status = previous;
            }
            return Err(err);
        }
        info!(id, %status, "updated book status");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::Catalog;
    use crate::core::book::{BookStatus, SearchField};
    use crate::core::error::ErrorKind;
    use crate::core::store::LoadOutcome;
    use std::path::Path;

    // A directory where the temp file should go makes every later save fail.
    fn block_saves(catalog_path: &Path) {
        let mut name = catalog_path.file_name().expect("file name").to_os_string();
        name.push(".tmp");
        std::fs::create_dir(catalog_path.with_file_name(name)).expect("create blocker dir");
    }

    fn temp_catalog() -> (tempfile::TempDir, Catalog) {
        let temp = tempfile::tempdir().expect("tempdir");
        let catalog = Catalog::open(temp.path().join("library.json"));
        (temp, catalog)
    }

    #[test]
    fn add_assigns_sequential_ids_and_persists() {
        let (_temp, mut catalog) = temp_catalog();
        assert_eq!(catalog.load_outcome(), &LoadOutcome::Missing);

        let first = catalog.add("Процесс", "Ф.Кафка", 1925).expect("add").id;
        let second = catalog.add("Лолита", "В.Набоков", 1955).expect("add").id;
        assert_eq!((first, second), (1, 2));
        assert_eq!(catalog.len(), 2);

        let reopened = Catalog::open(catalog.path());
        assert_eq!(reopened.load_outcome(), &LoadOutcome::Loaded { count: 2 });
        assert_eq!(reopened.list(), catalog.list());
    }

    #[test]
    fn add_uses_max_id_not_length() {
        let (_temp, mut catalog) = temp_catalog();
        catalog.add("A", "a", 2001).expect("add");
        catalog.add("B", "b", 2002).expect("add");
        catalog.add("C", "c", 2003).expect("add");
        assert!(catalog.delete(1).expect("delete"));

        let book = catalog.add("D", "d", 2004).expect("add");
        assert_eq!(book.id, 4);
        assert_eq!(book.status, BookStatus::Available);
    }

    #[test]
    fn delete_existing_removes_exactly_one() {
        let (_temp, mut catalog) = temp_catalog();
        catalog.add("Процесс", "Ф.Кафка", 1925).expect("add");
        catalog.add("Лолита", "В.Набоков", 1955).expect("add");

        assert!(catalog.delete(1).expect("delete"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.list()[0].title, "Лолита");

        let reopened = Catalog::open(catalog.path());
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn delete_missing_returns_false_without_writing() {
        let (_temp, mut catalog) = temp_catalog();
        assert!(!catalog.delete(42).expect("delete"));
        assert!(!catalog.path().exists());

        catalog.add("Процесс", "Ф.Кафка", 1925).expect("add");
        let before = std::fs::read(catalog.path()).expect("read");
        assert!(!catalog.delete(42).expect("delete"));
        assert_eq!(catalog.len(), 1);
        assert_eq!(std::fs::read(catalog.path()).expect("read"), before);
    }

    #[test]
    fn search_matches_exact_value_case_insensitively() {
        let (_temp, mut catalog) = temp_catalog();
        catalog.add("Process", "F. Kafka", 1925).expect("add");
        catalog.add("Lolita", "V. Nabokov", 1955).expect("add");
        catalog.add("The Castle", "F. Kafka", 1926).expect("add");

        let results = catalog.search(SearchField::Title, "process");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].author, "F. Kafka");

        let by_author = catalog.search(SearchField::Author, "f. kafka");
        let titles: Vec<_> = by_author.iter().map(|book| book.title.as_str()).collect();
        assert_eq!(titles, ["Process", "The Castle"]);

        assert_eq!(catalog.search(SearchField::Year, "1955").len(), 1);
        assert!(catalog.search(SearchField::Title, "Proc").is_empty());
    }

    #[test]
    fn search_by_unknown_field_matches_nothing() {
        let (_temp, mut catalog) = temp_catalog();
        catalog.add("Process", "F. Kafka", 1925).expect("add");
        assert!(catalog.search_by_name("isbn", "").is_empty());
        assert!(catalog.search_by_name("publisher", "Process").is_empty());
        assert_eq!(catalog.search_by_name("TITLE", "process").len(), 1);
    }

    #[test]
    fn update_status_changes_only_status() {
        let (_temp, mut catalog) = temp_catalog();
        catalog.add("Process", "F. Kafka", 1925).expect("add");
        catalog.add("Lolita", "V. Nabokov", 1955).expect("add");
        let before = catalog.list().to_vec();

        assert!(catalog.update_status(2, BookStatus::CheckedOut).expect("update"));
        let after = catalog.list();
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1].status, BookStatus::CheckedOut);
        assert_eq!(after[1].title, before[1].title);
        assert_eq!(after[1].year, before[1].year);

        let reopened = Catalog::open(catalog.path());
        assert_eq!(reopened.get(2).map(|book| book.status), Some(BookStatus::CheckedOut));
        assert_eq!(
            reopened.search(SearchField::Status, "checked out").len(),
            1
        );
    }

    #[test]
    fn update_status_missing_returns_false() {
        let (_temp, mut catalog) = temp_catalog();
        catalog.add("Process", "F. Kafka", 1925).expect("add");
        assert!(!catalog.update_status(7, BookStatus::CheckedOut).expect("update"));
        assert_eq!(catalog.list()[0].status, BookStatus::Available);
    }

    #[test]
    fn corrupt_file_opens_empty_and_is_overwritten_on_add() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("library.json");
        std::fs::write(&path, "garbage").expect("write");

        let mut catalog = Catalog::open(&path);
        assert!(matches!(catalog.load_outcome(), LoadOutcome::Reset { .. }));
        assert!(catalog.is_empty());

        assert_eq!(catalog.add("Process", "F. Kafka", 1925).expect("add").id, 1);
        let reopened = Catalog::open(&path);
        assert_eq!(reopened.len(), 1);
    }

    #[test]
    fn add_at_max_id_is_an_error_not_an_overflow() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("library.json");
        let body = format!(
            r#"[{{"id": {}, "title": "Last", "author": "A", "year": 2000, "status": "available"}}]"#,
            u64::MAX
        );
        std::fs::write(&path, body).expect("write");

        let mut catalog = Catalog::open(&path);
        assert_eq!(catalog.load_outcome(), &LoadOutcome::Loaded { count: 1 });
        let err = catalog.add("X", "Y", 2000).expect_err("add should fail");
        assert_eq!(err.kind(), ErrorKind::Corrupt);
        assert_eq!(err.id(), Some(u64::MAX));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn failed_save_rolls_back_add() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("library.json");
        let mut catalog = Catalog::open(&path);
        block_saves(&path);

        assert!(catalog.add("Process", "F. Kafka", 1925).is_err());
        assert!(catalog.is_empty());
        assert_eq!(catalog.next_id().expect("next id"), 1);
    }

    #[test]
    fn failed_save_rolls_back_delete_and_status() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("library.json");
        let mut catalog = Catalog::open(&path);
        catalog.add("Process", "F. Kafka", 1925).expect("add");
        catalog.add("Lolita", "V. Nabokov", 1955).expect("add");
        let before = catalog.list().to_vec();
        block_saves(&path);

        assert!(catalog.delete(1).is_err());
        assert!(catalog.update_status(2, BookStatus::CheckedOut).is_err());
        assert_eq!(catalog.list(), before.as_slice());
    }
}
