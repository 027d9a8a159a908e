//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::path::{Path, PathBuf};

use crate::storage::{
    Document, Storage, StorageError, StorageErrorKind, candidate_paths, doc_id_from_path,
    validate_id,
};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores files in memory, in insertion order. Use the builder methods
/// to configure the mock with test data.
///
/// # Example
///
/// ```ignore
/// use seputar_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_doc("intro", "# Intro")
///     .with_file("setup.mdx", "# Setup");
///
/// assert!(storage.exists("intro"));
/// assert!(storage.exists("setup"));
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    files: Vec<(PathBuf, String)>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file at a path relative to the content directory.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.push((path.into(), content.into()));
        self
    }

    /// Add a markdown document for an identifier (stored as `<id>.md`).
    #[must_use]
    pub fn with_doc(self, id: &str, content: impl Into<String>) -> Self {
        self.with_file(format!("{id}.md"), content)
    }

    fn content(&self, path: &Path) -> Option<&String> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, content)| content)
    }
}

impl Storage for MockStorage {
    fn scan(&self) -> Result<Vec<Document>, StorageError> {
        Ok(self
            .files
            .iter()
            .filter_map(|(path, _)| {
                doc_id_from_path(path).map(|id| Document {
                    id,
                    path: path.clone(),
                })
            })
            .collect())
    }

    fn resolve(&self, id: &str) -> Result<PathBuf, StorageError> {
        validate_id(id, BACKEND)?;

        let matches: Vec<_> = candidate_paths(id)
            .filter(|p| self.content(p).is_some())
            .collect();
        match matches.as_slice() {
            [path] => Ok(path.clone()),
            [] => Err(StorageError::not_found(id).with_backend(BACKEND)),
            _ => Err(StorageError::new(StorageErrorKind::Ambiguous)
                .with_path(id)
                .with_backend(BACKEND)),
        }
    }

    fn read(&self, id: &str) -> Result<String, StorageError> {
        let path = self.resolve(id)?;
        self.content(&path)
            .cloned()
            .ok_or_else(|| StorageError::not_found(path).with_backend(BACKEND))
    }
}
