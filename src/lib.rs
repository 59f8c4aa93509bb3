//! Purpose: Shared library crate used by the `bookshelf` CLI and tests.
//! Exports: `api` (public catalog surface), `notice` (stderr notice schema), `shell` (menu UI).
//! Role: Holds all catalog logic; the binary is a thin argument/output layer.
//! Invariants: The catalog file path is always passed in explicitly.
//! Invariants: Every mutating operation rewrites the whole file before returning.
pub mod api;
mod core;
pub mod notice;
pub mod shell;
