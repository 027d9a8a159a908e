//! Sidebar trees.
//!
//! A sidebar is an ordered, possibly nested list of document references
//! grouped under category labels. Sibling order is the rendered navigation
//! order.
//!
//! # File Format
//!
//! Sidebar files are YAML mappings from sidebar identifier to a list of
//! nodes. Nodes carry an explicit `type`; a bare string is shorthand for a
//! `doc` node.
//!
//! ```yaml
//! viteSitebar:
//!   - type: category
//!     label: Vite
//!     collapsed: false
//!     items:
//!       - intro
//!       - type: doc
//!         id: config
//!         label: Configuration
//! ```
//!
//! # Traversal
//!
//! [`SidebarTree::walk`] is the one traversal rule: depth-first,
//! left-to-right. Validation and rendering are both built on it, so the
//! order of reported problems always matches the navigation order.

use std::fmt;
use std::path::Path;

use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use seputar_storage::Document;

use crate::error::SidebarError;

/// Name of the sidebar generated for topics without a sidebar file.
pub const AUTOGENERATED_SIDEBAR: &str = "default";

/// Sidebar node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SidebarNode {
    /// Reference to one document of the owning topic.
    Doc {
        /// Document identifier.
        id: String,
        /// Navigation label. Defaults to the identifier.
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    /// Labelled group of nodes.
    Category {
        /// Category label.
        label: String,
        /// Whether the category starts collapsed.
        collapsed: bool,
        /// Child nodes in display order.
        items: Vec<SidebarNode>,
    },
}

impl SidebarNode {
    /// Document leaf without an explicit label.
    #[must_use]
    pub fn doc(id: impl Into<String>) -> Self {
        Self::Doc {
            id: id.into(),
            label: None,
        }
    }

    /// Document leaf with a navigation label.
    #[must_use]
    pub fn labelled_doc(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Doc {
            id: id.into(),
            label: Some(label.into()),
        }
    }

    /// Category, collapsed by default.
    #[must_use]
    pub fn category(label: impl Into<String>, items: Vec<SidebarNode>) -> Self {
        Self::Category {
            label: label.into(),
            collapsed: true,
            items,
        }
    }

    /// Category that starts expanded.
    #[must_use]
    pub fn expanded_category(label: impl Into<String>, items: Vec<SidebarNode>) -> Self {
        Self::Category {
            label: label.into(),
            collapsed: false,
            items,
        }
    }
}

/// Sidebar node as written in a sidebar file.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNode {
    Shorthand(String),
    Tagged(TaggedNode),
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TaggedNode {
    Doc {
        id: String,
        #[serde(default)]
        label: Option<String>,
    },
    Category {
        label: String,
        #[serde(default = "default_collapsed")]
        collapsed: bool,
        #[serde(default)]
        items: Vec<RawNode>,
    },
}

fn default_collapsed() -> bool {
    true
}

impl From<RawNode> for SidebarNode {
    fn from(raw: RawNode) -> Self {
        match raw {
            RawNode::Shorthand(id) => Self::doc(id),
            RawNode::Tagged(TaggedNode::Doc { id, label }) => Self::Doc { id, label },
            RawNode::Tagged(TaggedNode::Category {
                label,
                collapsed,
                items,
            }) => Self::Category {
                label,
                collapsed,
                items: items.into_iter().map(Into::into).collect(),
            },
        }
    }
}

impl<'de> Deserialize<'de> for SidebarNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawNode::deserialize(deserializer).map(Into::into)
    }
}

/// One visited node with its nesting depth (0 for top-level nodes).
#[derive(Clone, Copy, Debug)]
pub struct Visit<'a> {
    pub node: &'a SidebarNode,
    pub depth: usize,
}

/// Depth-first, left-to-right walk over a sidebar tree.
///
/// Lazy; cloning the iterator or calling [`SidebarTree::walk`] again starts
/// an independent walk.
#[derive(Clone, Debug)]
pub struct Walk<'a> {
    stack: Vec<(std::slice::Iter<'a, SidebarNode>, usize)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = Visit<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (siblings, depth) = self.stack.last_mut()?;
            let depth = *depth;
            match siblings.next() {
                Some(node) => {
                    if let SidebarNode::Category { items, .. } = node {
                        self.stack.push((items.iter(), depth + 1));
                    }
                    return Some(Visit { node, depth });
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Ordered navigation tree of one sidebar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SidebarTree {
    nodes: Vec<SidebarNode>,
}

impl SidebarTree {
    /// Create a tree from top-level nodes.
    #[must_use]
    pub fn new(nodes: Vec<SidebarNode>) -> Self {
        Self { nodes }
    }

    /// Top-level nodes.
    #[must_use]
    pub fn nodes(&self) -> &[SidebarNode] {
        &self.nodes
    }

    /// Whether the tree has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Walk every node depth-first, left-to-right.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(self.nodes.iter(), 0)],
        }
    }

    /// Document identifiers in walk order, duplicates included.
    pub fn doc_ids(&self) -> impl Iterator<Item = &str> + Clone {
        self.walk().filter_map(|visit| match visit.node {
            SidebarNode::Doc { id, .. } => Some(id.as_str()),
            SidebarNode::Category { .. } => None,
        })
    }

    /// First document in walk order, used as the sidebar's landing page.
    #[must_use]
    pub fn first_doc(&self) -> Option<&str> {
        self.doc_ids().next()
    }
}

/// Named sidebar trees of one topic, in definition order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sidebars {
    entries: Vec<(String, SidebarTree)>,
}

impl Sidebars {
    /// Create from named trees.
    ///
    /// Names are unique: the first tree of a name is kept and later ones are
    /// dropped, so [`get`](Self::get) and [`iter`](Self::iter) always agree.
    /// Deserialization rejects duplicates instead.
    #[must_use]
    pub fn new(entries: Vec<(String, SidebarTree)>) -> Self {
        let mut unique: Vec<(String, SidebarTree)> = Vec::with_capacity(entries.len());
        for (name, tree) in entries {
            if unique.iter().any(|(existing, _)| *existing == name) {
                tracing::warn!(sidebar = %name, "Dropping duplicate sidebar");
                continue;
            }
            unique.push((name, tree));
        }
        Self { entries: unique }
    }

    /// Single sidebar listing every scanned document in scan order.
    #[must_use]
    pub fn autogenerated(documents: &[Document]) -> Self {
        let nodes = documents.iter().map(|d| SidebarNode::doc(d.id.clone())).collect();
        Self::new(vec![(
            AUTOGENERATED_SIDEBAR.to_owned(),
            SidebarTree::new(nodes),
        )])
    }

    /// Parse a YAML sidebar definition.
    ///
    /// # Errors
    ///
    /// Returns [`SidebarError::Syntax`] on malformed YAML, unknown node types
    /// or duplicate sidebar identifiers.
    pub fn from_yaml(content: &str) -> Result<Self, SidebarError> {
        // An empty file defines no sidebars.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a YAML sidebar file.
    ///
    /// # Errors
    ///
    /// Returns [`SidebarError::Io`] if the file can't be read and
    /// [`SidebarError::Parse`] if it is not a valid definition.
    pub fn load(path: &Path) -> Result<Self, SidebarError> {
        let content = std::fs::read_to_string(path).map_err(|source| SidebarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let sidebars = Self::from_yaml(&content).map_err(|err| match err {
            SidebarError::Syntax(source) => SidebarError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), sidebars = sidebars.len(), "Loaded sidebar file");
        Ok(sidebars)
    }

    /// Tree by sidebar identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SidebarTree> {
        self.entries
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, tree)| tree)
    }

    /// Named trees in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SidebarTree)> {
        self.entries.iter().map(|(name, tree)| (name.as_str(), tree))
    }

    /// Number of sidebars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sidebar is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for Sidebars {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SidebarsVisitor;

        impl<'de> Visitor<'de> for SidebarsVisitor {
            type Value = Sidebars;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping from sidebar id to a list of sidebar items")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Sidebars, A::Error> {
                let mut entries: Vec<(String, SidebarTree)> = Vec::new();
                while let Some((name, tree)) = map.next_entry::<String, SidebarTree>()? {
                    if entries.iter().any(|(existing, _)| *existing == name) {
                        return Err(de::Error::custom(format!("duplicate sidebar id '{name}'")));
                    }
                    entries.push((name, tree));
                }
                Ok(Sidebars { entries })
            }
        }

        deserializer.deserialize_map(SidebarsVisitor)
    }
}
