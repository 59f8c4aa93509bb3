//! Purpose: Resolve the catalog file location for the CLI.
//! Exports: `default_catalog_path`.
//! Role: The only place that knows the default location; the library takes explicit paths.
//! Invariants: Default catalog file remains `~/.bookshelf/library.json`.

use std::path::PathBuf;

pub(crate) const CATALOG_FILE_NAME: &str = "library.json";

pub(crate) fn default_catalog_path() -> PathBuf {
    let home = std::env::var_os("HOME").unwrap_or_default();
    PathBuf::from(home)
        .join(".bookshelf")
        .join(CATALOG_FILE_NAME)
}
