//! Sidebar validation.
//!
//! Checks that every document leaf of a sidebar tree names exactly one file
//! of the topic's content. Problems are collected, never short-circuited, so
//! one run reports every broken reference in navigation order.

use std::collections::HashSet;
use std::fmt;

use seputar_config::OnBrokenLinks;
use seputar_storage::{Document, Storage, StorageErrorKind};

use crate::error::UnresolvedReferenceError;
use crate::sidebar::{SidebarNode, SidebarTree, Sidebars};

/// How unresolved references affect the build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValidationMode {
    /// Unresolved references fail the build.
    #[default]
    Strict,
    /// Unresolved references are logged as warnings.
    Permissive,
}

impl From<OnBrokenLinks> for ValidationMode {
    fn from(value: OnBrokenLinks) -> Self {
        match value {
            OnBrokenLinks::Throw => Self::Strict,
            OnBrokenLinks::Warn => Self::Permissive,
        }
    }
}

/// Why a reference did not resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// No content file matches.
    Missing,
    /// Several content files match.
    Ambiguous,
    /// The identifier is not a valid document path.
    InvalidId,
    /// The content file exists but can't be accessed.
    Unreadable,
    /// No mounted route serves the link.
    NotRouted,
}

impl From<StorageErrorKind> for UnresolvedReason {
    fn from(kind: StorageErrorKind) -> Self {
        match kind {
            StorageErrorKind::NotFound => Self::Missing,
            StorageErrorKind::Ambiguous => Self::Ambiguous,
            StorageErrorKind::InvalidPath => Self::InvalidId,
            _ => Self::Unreadable,
        }
    }
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Missing => "no such document",
            Self::Ambiguous => "several files match",
            Self::InvalidId => "invalid document id",
            Self::Unreadable => "document can't be accessed",
            Self::NotRouted => "no route serves this path",
        })
    }
}

/// Where an unresolved reference was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReferenceSource {
    /// A sidebar leaf. Topic and sidebar are filled in by the site build.
    Sidebar {
        topic: Option<String>,
        sidebar: Option<String>,
    },
    /// An internal link of a navbar, footer or card entry.
    Link { context: String },
}

impl fmt::Display for ReferenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sidebar {
                topic: Some(topic),
                sidebar: Some(sidebar),
            } => write!(f, "sidebar '{sidebar}' of topic '{topic}'"),
            Self::Sidebar {
                topic: Some(topic),
                sidebar: None,
            } => write!(f, "sidebar of topic '{topic}'"),
            Self::Sidebar { .. } => f.write_str("sidebar"),
            Self::Link { context } => f.write_str(context),
        }
    }
}

/// Reference that does not resolve to a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// Document identifier or link path.
    pub id: String,
    pub reason: UnresolvedReason,
    pub source: ReferenceSource,
}

impl UnresolvedReference {
    /// Attach the topic and sidebar the reference belongs to.
    #[must_use]
    pub fn in_sidebar(mut self, topic: &str, sidebar: &str) -> Self {
        self.source = ReferenceSource::Sidebar {
            topic: Some(topic.to_owned()),
            sidebar: Some(sidebar.to_owned()),
        };
        self
    }
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' in {}: {}", self.id, self.source, self.reason)
    }
}

/// Outcome of validating one sidebar tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Validation {
    checked: Vec<String>,
    unresolved: Vec<UnresolvedReference>,
}

impl Validation {
    /// Whether every reference resolved.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Every checked identifier in walk order, duplicates included.
    #[must_use]
    pub fn checked(&self) -> &[String] {
        &self.checked
    }

    /// Unresolved references in walk order.
    #[must_use]
    pub fn unresolved(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }

    /// Identifiers of the unresolved references in walk order.
    pub fn unresolved_ids(&self) -> impl Iterator<Item = &str> {
        self.unresolved.iter().map(|r| r.id.as_str())
    }

    /// Consume the validation, keeping only the unresolved references.
    #[must_use]
    pub fn into_unresolved(self) -> Vec<UnresolvedReference> {
        self.unresolved
    }

    /// Apply a validation mode.
    ///
    /// Permissive mode returns the references it downgraded to warnings.
    ///
    /// # Errors
    ///
    /// Returns [`UnresolvedReferenceError`] in strict mode when any reference
    /// is unresolved.
    pub fn into_result(
        self,
        mode: ValidationMode,
    ) -> Result<Vec<UnresolvedReference>, UnresolvedReferenceError> {
        apply_mode(self.unresolved, mode)
    }
}

/// Check every document leaf of `tree` against `storage`, in walk order.
///
/// Pure with respect to the tree and the storage contents: calling it twice
/// yields the same result.
#[must_use]
pub fn validate(tree: &SidebarTree, storage: &dyn Storage) -> Validation {
    let mut validation = Validation::default();
    for id in tree.doc_ids() {
        if let Err(err) = storage.resolve(id) {
            validation.unresolved.push(UnresolvedReference {
                id: id.to_owned(),
                reason: err.kind().into(),
                source: ReferenceSource::Sidebar {
                    topic: None,
                    sidebar: None,
                },
            });
        }
        validation.checked.push(id.to_owned());
    }
    validation
}

/// Fail on unresolved references in strict mode, warn about them otherwise.
///
/// # Errors
///
/// Returns [`UnresolvedReferenceError`] in strict mode when `references` is
/// not empty.
pub fn apply_mode(
    references: Vec<UnresolvedReference>,
    mode: ValidationMode,
) -> Result<Vec<UnresolvedReference>, UnresolvedReferenceError> {
    if references.is_empty() {
        return Ok(references);
    }
    match mode {
        ValidationMode::Strict => Err(UnresolvedReferenceError { references }),
        ValidationMode::Permissive => {
            for reference in &references {
                tracing::warn!(
                    id = %reference.id,
                    source = %reference.source,
                    reason = %reference.reason,
                    "Unresolved reference"
                );
            }
            Ok(references)
        }
    }
}

/// Documents no sidebar of the topic references, in scan order.
#[must_use]
pub fn orphans<'a>(documents: &'a [Document], sidebars: &Sidebars) -> Vec<&'a Document> {
    let referenced: HashSet<&str> = sidebars
        .iter()
        .flat_map(|(_, tree)| tree.walk())
        .filter_map(|visit| match visit.node {
            SidebarNode::Doc { id, .. } => Some(id.as_str()),
            SidebarNode::Category { .. } => None,
        })
        .collect();
    documents
        .iter()
        .filter(|doc| !referenced.contains(doc.id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use seputar_storage::MockStorage;

    use super::*;
    use crate::navigation::render;

    fn scenario_c_tree() -> SidebarTree {
        SidebarTree::new(vec![
            SidebarNode::category("Intro", vec![SidebarNode::doc("intro")]),
            SidebarNode::doc("missing-doc"),
        ])
    }

    #[test]
    fn test_strict_mode_reports_missing_doc() {
        let storage = MockStorage::new().with_doc("intro", "# Intro");
        let tree = scenario_c_tree();

        let validation = validate(&tree, &storage);

        assert_eq!(validation.unresolved_ids().collect::<Vec<_>>(), vec!["missing-doc"]);
        let err = validation.into_result(ValidationMode::Strict).unwrap_err();
        assert_eq!(err.references.len(), 1);
        assert_eq!(err.references[0].id, "missing-doc");
        assert_eq!(err.references[0].reason, UnresolvedReason::Missing);
        // Rendering is unaffected by broken references.
        assert_eq!(render(&tree, "/vite").filter(|e| e.depth == 0).count(), 2);
    }

    #[test]
    fn test_permissive_mode_returns_warnings() {
        let storage = MockStorage::new().with_doc("intro", "# Intro");

        let warnings = validate(&scenario_c_tree(), &storage)
            .into_result(ValidationMode::Permissive)
            .unwrap();

        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].id, "missing-doc");
    }

    #[test]
    fn test_empty_tree_validates() {
        let storage = MockStorage::new();

        let validation = validate(&SidebarTree::default(), &storage);

        assert!(validation.is_ok());
        assert!(validation.checked().is_empty());
        assert!(validation.into_result(ValidationMode::Strict).unwrap().is_empty());
    }

    #[test]
    fn test_checked_ids_match_rendered_leaves() {
        let storage = MockStorage::new().with_doc("a", "").with_doc("c", "");
        let tree = SidebarTree::new(vec![
            SidebarNode::category(
                "One",
                vec![
                    SidebarNode::doc("a"),
                    SidebarNode::category("Two", vec![SidebarNode::doc("b")]),
                ],
            ),
            SidebarNode::doc("c"),
            SidebarNode::doc("a"),
        ]);

        let validation = validate(&tree, &storage);
        let rendered: Vec<_> = render(&tree, "/")
            .filter_map(|e| e.target)
            .map(|t| t.trim_start_matches('/').to_owned())
            .collect();

        assert_eq!(validation.checked(), rendered.as_slice());
        assert_eq!(validation.checked(), ["a", "b", "c", "a"]);
    }

    #[test]
    fn test_duplicate_leaves_checked_independently() {
        let storage = MockStorage::new();
        let tree = SidebarTree::new(vec![SidebarNode::doc("gone"), SidebarNode::doc("gone")]);

        let validation = validate(&tree, &storage);

        assert_eq!(validation.unresolved_ids().collect::<Vec<_>>(), vec!["gone", "gone"]);
    }

    #[test]
    fn test_skipped_files_do_not_satisfy_references() {
        let storage = MockStorage::new()
            .with_doc("intro", "# Intro")
            .with_file("_partial.md", "Partial")
            .with_file("node_modules/pkg.md", "# Pkg");
        let tree = SidebarTree::new(vec![
            SidebarNode::doc("intro"),
            SidebarNode::doc("_partial"),
            SidebarNode::doc("node_modules/pkg"),
        ]);

        let validation = validate(&tree, &storage);

        assert_eq!(
            validation.unresolved_ids().collect::<Vec<_>>(),
            vec!["_partial", "node_modules/pkg"]
        );
        assert!(
            validation
                .unresolved()
                .iter()
                .all(|r| r.reason == UnresolvedReason::Missing)
        );
        let documents = storage.scan().unwrap();
        let sidebars = Sidebars::new(vec![("docs".to_owned(), tree)]);
        assert!(orphans(&documents, &sidebars).is_empty());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let storage = MockStorage::new().with_doc("intro", "# Intro");
        let tree = scenario_c_tree();

        assert_eq!(validate(&tree, &storage), validate(&tree, &storage));
    }

    #[test]
    fn test_ambiguous_and_invalid_ids() {
        let storage = MockStorage::new()
            .with_file("intro.md", "# A")
            .with_file("intro.mdx", "# B");
        let tree = SidebarTree::new(vec![SidebarNode::doc("intro"), SidebarNode::doc("../etc")]);

        let reasons: Vec<_> = validate(&tree, &storage)
            .unresolved()
            .iter()
            .map(|r| r.reason)
            .collect();

        assert_eq!(
            reasons,
            vec![UnresolvedReason::Ambiguous, UnresolvedReason::InvalidId]
        );
    }

    #[test]
    fn test_reference_display_names_sidebar() {
        let reference = UnresolvedReference {
            id: "missing-doc".to_owned(),
            reason: UnresolvedReason::Missing,
            source: ReferenceSource::Sidebar {
                topic: None,
                sidebar: None,
            },
        }
        .in_sidebar("vite", "viteSitebar");

        assert_eq!(
            reference.to_string(),
            "'missing-doc' in sidebar 'viteSitebar' of topic 'vite': no such document"
        );
    }

    #[test]
    fn test_mode_from_config() {
        assert_eq!(ValidationMode::from(OnBrokenLinks::Throw), ValidationMode::Strict);
        assert_eq!(ValidationMode::from(OnBrokenLinks::Warn), ValidationMode::Permissive);
    }

    #[test]
    fn test_orphans() {
        let documents = vec![
            Document {
                id: "intro".to_owned(),
                path: PathBuf::from("intro.md"),
            },
            Document {
                id: "draft".to_owned(),
                path: PathBuf::from("draft.md"),
            },
        ];
        let sidebars = Sidebars::new(vec![(
            "docs".to_owned(),
            SidebarTree::new(vec![SidebarNode::category(
                "Intro",
                vec![SidebarNode::doc("intro")],
            )]),
        )]);

        let ids: Vec<_> = orphans(&documents, &sidebars)
            .into_iter()
            .map(|d| d.id.as_str())
            .collect();

        assert_eq!(ids, vec!["draft"]);
    }
}
