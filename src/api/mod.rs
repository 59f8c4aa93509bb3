//! Purpose: Define the public Rust API boundary for bookshelf.
//! Exports: Catalog operations, record types, and the error model.
//! Role: Public, additive-only surface; hides internal module layout.
//! Invariants: This module is the only public path to the core types.

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::book::{Book, BookStatus, SearchField};
pub use crate::core::catalog::Catalog;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::store::{LoadOutcome, RecordStore};

pub type ApiResult<T> = Result<T, Error>;
