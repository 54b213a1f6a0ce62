//! Read-only, file-backed data layer for election information.
//!
//! Election data lives as YAML and Markdown files in a separate Git
//! repository (the "meta repository"). This crate parses those files into
//! in-memory records, keeps a full-refresh snapshot store over them, and
//! exposes the read API consumed by the web layer. Fetching the repository
//! and reconciling snapshots into durable storage are injected capabilities
//! (`meta::MetaFetcher`, `meta::SnapshotReconciler`) implemented by the
//! satellite crates.

pub mod content;
pub mod elections;
pub mod errors;
pub mod meta;
pub mod records;

pub use errors::{Error, Result};
pub use records::Record;
