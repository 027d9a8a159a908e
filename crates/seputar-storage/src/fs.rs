//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for resolving documents inside a topic's content
//! directory on the local filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::{
    Document, Storage, StorageError, StorageErrorKind, candidate_paths, doc_id_from_path,
    is_excluded_entry, validate_id,
};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// Resolves identifiers against `<content_dir>/<id>.md` and
/// `<content_dir>/<id>.mdx`. Scanning walks the directory recursively,
/// skipping hidden and underscore-prefixed entries.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use seputar_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("vite"));
/// let docs = storage.scan()?;
/// ```
pub struct FsStorage {
    /// Topic content directory.
    content_dir: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `content_dir`.
    #[must_use]
    pub fn new(content_dir: PathBuf) -> Self {
        Self { content_dir }
    }

    /// Content directory this storage reads from.
    #[must_use]
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// Scan directory recursively and collect documents.
    fn scan_directory(dir_path: &Path, base_path: &Path) -> Vec<Document> {
        let entries = match fs::read_dir(dir_path) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(path = %dir_path.display(), error = %err, "Cannot read content directory");
                return Vec::new();
            }
        };

        let mut documents = Vec::new();

        // Collect entries with cached file_type to avoid repeated stat calls in sort.
        let mut entries: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|e| {
                let is_dir = e.file_type().is_ok_and(|t| t.is_dir());
                let name_lower = e.file_name().to_string_lossy().to_lowercase();
                (e, is_dir, name_lower)
            })
            .collect();

        // Sort: files first, then directories, alphabetical within each group
        entries.sort_by(|(_, a_is_dir, a_name), (_, b_is_dir, b_name)| {
            a_is_dir.cmp(b_is_dir).then_with(|| a_name.cmp(b_name))
        });

        for (entry, is_dir, name_lower) in entries {
            if is_excluded_entry(&name_lower, is_dir) {
                continue;
            }

            let rel_path = base_path.join(entry.file_name());
            if is_dir {
                documents.extend(Self::scan_directory(&entry.path(), &rel_path));
            } else if let Some(id) = doc_id_from_path(&rel_path) {
                documents.push(Document { id, path: rel_path });
            }
        }

        documents
    }
}

impl Storage for FsStorage {
    fn scan(&self) -> Result<Vec<Document>, StorageError> {
        if !self.content_dir.exists() {
            return Ok(Vec::new());
        }

        let documents = Self::scan_directory(&self.content_dir, Path::new(""));
        tracing::debug!(
            dir = %self.content_dir.display(),
            documents = documents.len(),
            "Scanned content directory"
        );
        Ok(documents)
    }

    fn resolve(&self, id: &str) -> Result<PathBuf, StorageError> {
        validate_id(id, BACKEND)?;

        let mut matches = candidate_paths(id).filter(|p| self.content_dir.join(p).is_file());
        match (matches.next(), matches.next()) {
            (Some(path), None) => Ok(path),
            (Some(_), Some(_)) => Err(StorageError::new(StorageErrorKind::Ambiguous)
                .with_path(self.content_dir.join(id))
                .with_backend(BACKEND)),
            (None, _) => Err(StorageError::not_found(self.content_dir.join(id)).with_backend(BACKEND)),
        }
    }

    fn read(&self, id: &str) -> Result<String, StorageError> {
        let full_path = self.content_dir.join(self.resolve(id)?);
        fs::read_to_string(&full_path)
            .map_err(|e| StorageError::io(e, Some(full_path.clone())).with_backend(BACKEND))
    }
}
