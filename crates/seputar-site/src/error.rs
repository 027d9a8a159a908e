//! Build error types.
//!
//! Every check in the site model collects all of its findings before
//! failing, so one build reports every problem at once. [`BuildError`] is the
//! complete report.

use std::fmt;
use std::path::PathBuf;

use seputar_storage::StorageError;

/// A single configuration problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigurationIssue {
    /// Two topics share an identifier.
    DuplicateTopicId { id: String },
    /// Two topics share a route base path.
    DuplicateRoute {
        route: String,
        existing: String,
        topic: String,
    },
    /// The default locale is not part of the locale set.
    DefaultLocaleMissing { locale: String },
    /// A locale is listed more than once.
    DuplicateLocale { locale: String },
    /// A locale code cannot be used as a URL segment.
    InvalidLocale { locale: String },
    /// A navbar item references a topic that is not registered.
    UnknownNavbarTopic { label: String, topic: String },
    /// A navbar item references a sidebar the topic does not define.
    UnknownNavbarSidebar {
        label: String,
        topic: String,
        sidebar: String,
    },
    /// A navbar item references a sidebar without any document.
    EmptyNavbarSidebar {
        label: String,
        topic: String,
        sidebar: String,
    },
    /// A footer link sets both or neither of `to` and `href`.
    AmbiguousFooterLink { label: String },
    /// A link is neither a site path nor an http(s) URL.
    MalformedLink { context: String, link: String },
}

impl fmt::Display for ConfigurationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTopicId { id } => write!(f, "duplicate topic id '{id}'"),
            Self::DuplicateRoute {
                route,
                existing,
                topic,
            } => write!(
                f,
                "topic '{topic}' reuses route '{route}' already registered by '{existing}'"
            ),
            Self::DefaultLocaleMissing { locale } => {
                write!(f, "default locale '{locale}' is not listed in i18n.locales")
            }
            Self::DuplicateLocale { locale } => write!(f, "locale '{locale}' is listed twice"),
            Self::InvalidLocale { locale } => {
                write!(f, "locale '{locale}' is not a valid URL segment")
            }
            Self::UnknownNavbarTopic { label, topic } => {
                write!(f, "navbar item '{label}' references unknown topic '{topic}'")
            }
            Self::UnknownNavbarSidebar {
                label,
                topic,
                sidebar,
            } => write!(
                f,
                "navbar item '{label}' references unknown sidebar '{sidebar}' of topic '{topic}'"
            ),
            Self::EmptyNavbarSidebar {
                label,
                topic,
                sidebar,
            } => write!(
                f,
                "navbar item '{label}' links to sidebar '{sidebar}' of topic '{topic}', which has no documents"
            ),
            Self::AmbiguousFooterLink { label } => {
                write!(f, "footer link '{label}' must set exactly one of `to` and `href`")
            }
            Self::MalformedLink { context, link } => {
                write!(f, "{context}: malformed link '{link}'")
            }
        }
    }
}

/// Configuration error: identifier or route collisions and bad references.
///
/// Always fatal, whatever the broken link mode.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_lines(.issues))]
pub struct ConfigurationError {
    /// Every issue found.
    pub issues: Vec<ConfigurationIssue>,
}

impl ConfigurationError {
    pub(crate) fn new(issues: Vec<ConfigurationIssue>) -> Self {
        Self { issues }
    }
}

/// Owner of a route prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteOwner {
    /// A documentation topic.
    Topic(String),
    /// A non-default locale area.
    Locale(String),
}

impl fmt::Display for RouteOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topic(id) => write!(f, "topic '{id}'"),
            Self::Locale(code) => write!(f, "locale '{code}'"),
        }
    }
}

/// Two route prefixes that overlap.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteConflict {
    pub first: RouteOwner,
    pub first_prefix: String,
    pub second: RouteOwner,
    pub second_prefix: String,
}

impl fmt::Display for RouteConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at '{}' overlaps {} at '{}'",
            self.first, self.first_prefix, self.second, self.second_prefix
        )
    }
}

/// Overlapping route prefixes. Always fatal.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_lines(.conflicts))]
pub struct RoutingConflictError {
    /// Every overlapping pair, in registry order.
    pub conflicts: Vec<RouteConflict>,
}

/// Error loading a sidebar definition.
#[derive(Debug, thiserror::Error)]
pub enum SidebarError {
    /// Sidebar file could not be read.
    #[error("cannot read sidebar file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Sidebar file is not valid.
    #[error("invalid sidebar file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    /// Sidebar definition is not valid.
    #[error("invalid sidebar definition: {0}")]
    Syntax(#[from] serde_yaml::Error),
    /// Content directory could not be scanned for an autogenerated sidebar.
    #[error("cannot scan content: {0}")]
    Storage(#[from] StorageError),
}

/// Sidebar references or links that do not resolve to a document.
///
/// Fatal in strict mode only.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_lines(.references))]
pub struct UnresolvedReferenceError {
    /// Every unresolved reference, in traversal order.
    pub references: Vec<crate::UnresolvedReference>,
}

/// One failed check of a site build.
#[derive(Debug, thiserror::Error)]
pub enum SiteError {
    #[error("configuration error:\n{0}")]
    Configuration(#[from] ConfigurationError),
    #[error("routing conflict:\n{0}")]
    RoutingConflict(#[from] RoutingConflictError),
    #[error("unresolved references:\n{0}")]
    UnresolvedReference(#[from] UnresolvedReferenceError),
    #[error("topic '{topic}': {source}")]
    Sidebar {
        topic: String,
        #[source]
        source: SidebarError,
    },
}

/// Complete report of a failed build.
#[derive(Debug, thiserror::Error)]
#[error("{}", join_blocks(.errors))]
pub struct BuildError {
    /// Every failed check, grouped by kind.
    pub errors: Vec<SiteError>,
}

impl BuildError {
    /// Configuration errors in the report.
    pub fn configuration(&self) -> impl Iterator<Item = &ConfigurationError> {
        self.errors.iter().filter_map(|e| match e {
            SiteError::Configuration(err) => Some(err),
            _ => None,
        })
    }

    /// Routing conflicts in the report.
    pub fn routing_conflicts(&self) -> impl Iterator<Item = &RoutingConflictError> {
        self.errors.iter().filter_map(|e| match e {
            SiteError::RoutingConflict(err) => Some(err),
            _ => None,
        })
    }

    /// Unresolved references in the report.
    pub fn unresolved(&self) -> impl Iterator<Item = &UnresolvedReferenceError> {
        self.errors.iter().filter_map(|e| match e {
            SiteError::UnresolvedReference(err) => Some(err),
            _ => None,
        })
    }
}

impl From<SiteError> for BuildError {
    fn from(error: SiteError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

fn join_blocks(errors: &[SiteError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn join_lines<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| format!("  - {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
