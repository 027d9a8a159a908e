//! Topic registry.
//!
//! A [`Topic`] is one independently routed documentation area. The
//! [`TopicRegistry`] owns the ordered list of topics for a site; registration
//! order is navbar order. Identifiers and route base paths are unique.

use std::path::PathBuf;

use seputar_config::TopicConfig;
use serde::Serialize;

use crate::error::{ConfigurationError, ConfigurationIssue};

/// One documentation area.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Topic {
    /// Unique identifier.
    pub id: String,
    /// Normalized URL prefix (leading slash, no trailing slash, `/` for root).
    pub route_base_path: String,
    /// Directory holding the topic's documents.
    pub content_dir: PathBuf,
    /// Sidebar definition file. `None` means the sidebar is autogenerated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_path: Option<PathBuf>,
}

impl Topic {
    /// Create a topic, normalizing its route base path.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        route_base_path: &str,
        content_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            route_base_path: normalize_route(route_base_path),
            content_dir: content_dir.into(),
            sidebar_path: None,
        }
    }

    /// Set the sidebar definition file.
    #[must_use]
    pub fn with_sidebar_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.sidebar_path = Some(path.into());
        self
    }

    /// Create a topic from its resolved configuration.
    #[must_use]
    pub fn from_config(config: &TopicConfig) -> Self {
        Self {
            id: config.id.clone(),
            route_base_path: normalize_route(&config.route_base_path),
            content_dir: config.content_dir.clone(),
            sidebar_path: config.sidebar_path.clone(),
        }
    }
}

/// Normalize a route to a leading slash and no trailing or repeated slashes.
///
/// `""` and `"/"` both normalize to `"/"`.
#[must_use]
pub fn normalize_route(route: &str) -> String {
    let segments: Vec<_> = route.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Append a relative path to a normalized route.
#[must_use]
pub fn join_route(base: &str, rest: &str) -> String {
    let rest = rest.trim_matches('/');
    match (base, rest) {
        (base, "") => base.to_owned(),
        ("/", rest) => format!("/{rest}"),
        (base, rest) => format!("{base}/{rest}"),
    }
}

/// Ordered set of documentation topics.
///
/// Registration happens once while the configuration is loaded; afterwards
/// the registry is only read.
#[derive(Clone, Debug, Default)]
pub struct TopicRegistry {
    topics: Vec<Topic>,
}

impl TopicRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a topic after the ones already present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the identifier or the route base path
    /// is already taken. The registry is left unchanged.
    pub fn register(&mut self, topic: Topic) -> Result<(), ConfigurationError> {
        let issues = self.collisions(&topic);
        if !issues.is_empty() {
            return Err(ConfigurationError::new(issues));
        }
        tracing::debug!(topic = %topic.id, route = %topic.route_base_path, "Registered topic");
        self.topics.push(topic);
        Ok(())
    }

    /// Build a registry from topics in order, reporting every collision.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] listing every colliding topic.
    pub fn from_topics(topics: impl IntoIterator<Item = Topic>) -> Result<Self, ConfigurationError> {
        let (registry, issues) = Self::collect(topics);
        if issues.is_empty() {
            Ok(registry)
        } else {
            Err(ConfigurationError::new(issues))
        }
    }

    /// Register topics in order, skipping colliding ones and returning the issues.
    pub(crate) fn collect(topics: impl IntoIterator<Item = Topic>) -> (Self, Vec<ConfigurationIssue>) {
        let mut registry = Self::new();
        let mut issues = Vec::new();
        for topic in topics {
            if let Err(err) = registry.register(topic) {
                issues.extend(err.issues);
            }
        }
        (registry, issues)
    }

    /// All topics in registration order.
    #[must_use]
    pub fn resolve_all(&self) -> &[Topic] {
        &self.topics
    }

    /// Topic by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    /// Number of registered topics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Whether no topic is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    fn collisions(&self, topic: &Topic) -> Vec<ConfigurationIssue> {
        let mut issues = Vec::new();
        if self.get(&topic.id).is_some() {
            issues.push(ConfigurationIssue::DuplicateTopicId {
                id: topic.id.clone(),
            });
        }
        if let Some(existing) = self
            .topics
            .iter()
            .find(|t| t.route_base_path == topic.route_base_path)
        {
            issues.push(ConfigurationIssue::DuplicateRoute {
                route: topic.route_base_path.clone(),
                existing: existing.id.clone(),
                topic: topic.id.clone(),
            });
        }
        issues
    }
}
