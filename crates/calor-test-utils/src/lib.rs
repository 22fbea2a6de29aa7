//! Test fixtures and comparison helpers for Calor development.
//!
//! - [`fixtures`]: deterministic initial fields
//! - [`compare`]: field comparisons with readable failure messages

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod compare;
pub mod fixtures;
