//! Library half of the `calor` binary.
//!
//! Split out of `main.rs` so the argument rules, settings layering, and
//! dump format can be tested without spawning a process.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod app;
pub mod args;
pub mod dump;
pub mod init;
pub mod settings;
