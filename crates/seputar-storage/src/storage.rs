//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for resolving document identifiers,
//! along with [`StorageError`] for unified error handling across backends.
//!
//! # Document Identifiers
//!
//! All lookups take a **document identifier**, not a file path:
//! - `"intro"` - maps to `intro.md` or `intro.mdx`
//! - `"guides/setup"` - maps to `guides/setup.md` or `guides/setup.mdx`
//!
//! An identifier must match exactly one file. Two matching files (for example
//! both `intro.md` and `intro.mdx`) make the identifier ambiguous.

use std::path::{Component, Path, PathBuf};

/// File extensions recognized as documents, in lookup order.
pub const DOC_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Document found by a storage scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Document identifier (e.g., "intro", "guides/setup").
    pub id: String,
    /// File path relative to the content directory.
    pub path: PathBuf,
}

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// No file matches the identifier.
    NotFound,
    /// More than one file matches the identifier.
    Ambiguous,
    /// Identifier is empty, absolute or escapes the content directory.
    InvalidPath,
    /// Permission denied.
    PermissionDenied,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    kind: StorageErrorKind,
    path: Option<PathBuf>,
    backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Semantic error category.
    #[must_use]
    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    /// Path context, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Backend identifier, if any.
    #[must_use]
    pub fn backend(&self) -> Option<&'static str> {
        self.backend
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::Ambiguous => "Ambiguous document",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Content store for one documentation topic.
///
/// Implementations map document identifiers to files inside the topic's
/// content directory. The store is read-only from the site model's point of
/// view.
pub trait Storage: Send + Sync {
    /// Scan and return all documents, in a stable order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if scanning fails.
    fn scan(&self) -> Result<Vec<Document>, StorageError>;

    /// Resolve an identifier to the single file it names.
    ///
    /// Returns the file path relative to the content directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::NotFound`] when no file matches,
    /// [`StorageErrorKind::Ambiguous`] when several do, and
    /// [`StorageErrorKind::InvalidPath`] for malformed identifiers.
    fn resolve(&self, id: &str) -> Result<PathBuf, StorageError>;

    /// Check if an identifier resolves to exactly one document.
    fn exists(&self, id: &str) -> bool {
        self.resolve(id).is_ok()
    }

    /// Read document content.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the identifier doesn't resolve or the file
    /// can't be read.
    fn read(&self, id: &str) -> Result<String, StorageError>;
}

/// Reject identifiers that are empty, absolute, or contain `.`/`..` segments.
pub(crate) fn validate_id(id: &str, backend: &'static str) -> Result<(), StorageError> {
    let path = Path::new(id);
    let malformed = id.is_empty()
        || id.ends_with('/')
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));

    if malformed {
        return Err(StorageError::new(StorageErrorKind::InvalidPath)
            .with_path(id)
            .with_backend(backend));
    }
    // Ids inside skipped entries never name a document, even if the file exists.
    if is_excluded_path(id.split('/')) {
        return Err(StorageError::not_found(id).with_backend(backend));
    }
    Ok(())
}

/// Whether a directory entry is skipped when looking for documents.
///
/// Hidden entries, `_`-prefixed partials and `node_modules` directories are
/// never documents.
pub(crate) fn is_excluded_entry(name: &str, is_dir: bool) -> bool {
    name.starts_with('.')
        || name.starts_with('_')
        || (is_dir && name.eq_ignore_ascii_case("node_modules"))
}

/// Whether any segment of a relative document path is excluded.
///
/// Every segment but the last is a directory.
fn is_excluded_path<'a>(segments: impl Iterator<Item = &'a str>) -> bool {
    let mut segments = segments.peekable();
    while let Some(name) = segments.next() {
        if is_excluded_entry(name, segments.peek().is_some()) {
            return true;
        }
    }
    false
}

/// Candidate file paths for an identifier, one per document extension.
pub(crate) fn candidate_paths(id: &str) -> impl Iterator<Item = PathBuf> + '_ {
    DOC_EXTENSIONS
        .iter()
        .map(move |ext| PathBuf::from(format!("{id}.{ext}")))
}

/// Derive a document identifier from a relative file path.
///
/// Returns `None` for files without a document extension and for files
/// inside skipped entries (hidden, `_`-prefixed or `node_modules`).
#[must_use]
pub fn doc_id_from_path(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if !DOC_EXTENSIONS.contains(&ext) {
        return None;
    }
    let stem = path.with_extension("");
    let segments: Vec<_> = stem
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    if is_excluded_path(segments.iter().map(AsRef::as_ref)) {
        return None;
    }
    Some(segments.join("/"))
}
