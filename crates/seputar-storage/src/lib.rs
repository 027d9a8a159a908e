//! Content storage abstraction for Seputar.
//!
//! This crate provides a [`Storage`] trait for looking up the documents of one
//! documentation topic by identifier. The site model only ever asks whether a
//! document exists, which file it resolves to, and what it contains; it never
//! writes through this interface.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `scan()`, `resolve()`, `exists()` and `read()` methods
//! - [`FsStorage`] implementation rooted at a topic's content directory
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use seputar_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("vite"));
//! assert!(storage.exists("intro"));
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{
    DOC_EXTENSIONS, Document, Storage, StorageError, StorageErrorKind, doc_id_from_path,
};
