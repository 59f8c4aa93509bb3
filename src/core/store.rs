// Catalog file persistence: whole-file load on open, whole-file replace on save.
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::book::Book;
use crate::core::error::{Error, ErrorKind, map_io_error_kind};

const INDENT: &[u8] = b"    ";

/// What `RecordStore::load` found on disk.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LoadOutcome {
    Loaded { count: usize },
    Missing,
    /// The file existed but could not be read or decoded; the store starts empty.
    Reset { reason: String },
}

#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    books: Vec<Book>,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            books: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub(crate) fn books_mut(&mut self) -> &mut Vec<Book> {
        &mut self.books
    }

    pub fn load(&mut self) -> LoadOutcome {
        let outcome = match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Vec<Book>>(&bytes) {
                Ok(books) => {
                    let count = books.len();
                    self.books = books;
                    LoadOutcome::Loaded { count }
                }
                Err(err) => {
                    self.books.clear();
                    LoadOutcome::Reset {
                        reason: format!("invalid catalog data: {err}"),
                    }
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                self.books.clear();
                LoadOutcome::Missing
            }
            Err(err) => {
                self.books.clear();
                LoadOutcome::Reset {
                    reason: format!("failed to read catalog: {err}"),
                }
            }
        };

        match &outcome {
            LoadOutcome::Loaded { count } => {
                debug!(path = %self.path.display(), count, "loaded catalog");
            }
            LoadOutcome::Missing => {
                debug!(path = %self.path.display(), "catalog file missing; starting empty");
            }
            LoadOutcome::Reset { reason } => {
                warn!(path = %self.path.display(), %reason, "catalog unreadable; starting empty");
            }
        }
        outcome
    }

    pub fn save(&self) -> Result<(), Error> {
        let payload = self.encode()?;

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|err| {
                Error::new(map_io_error_kind(&err))
                    .with_message("failed to create catalog directory")
                    .with_path(dir)
                    .with_source(err)
            })?;
        }

        let tmp_path = temp_path(&self.path);
        if let Err(err) = write_synced(&tmp_path, &payload) {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::new(map_io_error_kind(&err))
                .with_message("failed to write catalog")
                .with_path(&tmp_path)
                .with_source(err));
        }
        fs::rename(&tmp_path, &self.path).map_err(|err| {
            let _ = fs::remove_file(&tmp_path);
            Error::new(map_io_error_kind(&err))
                .with_message("failed to replace catalog file")
                .with_path(&self.path)
                .with_source(err)
        })?;

        debug!(path = %self.path.display(), count = self.books.len(), "saved catalog");
        Ok(())
    }

    fn encode(&self) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.books.serialize(&mut ser).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to encode catalog")
                .with_source(err)
        })?;
        buf.push(b'\n');
        Ok(buf)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("catalog"));
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_synced(path: &Path, payload: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(payload)?;
    file.sync_all()
}
