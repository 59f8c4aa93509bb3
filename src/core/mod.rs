// Core modules implementing the book record, file persistence, catalog operations, and errors.
pub mod book;
pub mod catalog;
pub mod error;
pub mod store;
