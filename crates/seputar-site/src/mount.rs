//! Route-mount composition.
//!
//! Binds every registered topic to its route prefix, its content storage
//! and its sidebars. Non-default locales mount each topic again under
//! `/<locale><route_base_path>`. Every prefix sits below the site's base
//! URL. Overlapping prefixes are routing conflicts.
//!
//! # Overlap
//!
//! Prefixes are compared segment by segment: `/vite` overlaps `/vite` and
//! `/vite/plugins` but not `/vitest`. The root prefix `/` overlaps every
//! other topic prefix. A root topic does not conflict with locale areas
//! because the locale prefix is matched first.

use std::fmt;
use std::sync::Arc;

use seputar_config::I18nConfig;
use seputar_storage::{FsStorage, Storage, StorageError};

use crate::error::{
    BuildError, ConfigurationError, ConfigurationIssue, RouteConflict, RouteOwner,
    RoutingConflictError, SidebarError, SiteError,
};
use crate::navigation::{NavItem, Render, nest, render};
use crate::sidebar::Sidebars;
use crate::topic::{Topic, TopicRegistry, join_route, normalize_route};

/// Source of a topic's content and sidebars.
pub trait ContentProvider {
    /// Storage holding the topic's documents.
    fn storage(&self, topic: &Topic) -> Arc<dyn Storage>;

    /// Sidebars of the topic.
    ///
    /// # Errors
    ///
    /// Returns [`SidebarError`] if the sidebar definition can't be loaded.
    fn sidebars(&self, topic: &Topic, storage: &dyn Storage) -> Result<Sidebars, SidebarError>;
}

/// Content read from each topic's directory on the local filesystem.
///
/// Topics without a sidebar file get an autogenerated sidebar listing every
/// scanned document.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsContent;

impl ContentProvider for FsContent {
    fn storage(&self, topic: &Topic) -> Arc<dyn Storage> {
        Arc::new(FsStorage::new(topic.content_dir.clone()))
    }

    fn sidebars(&self, topic: &Topic, storage: &dyn Storage) -> Result<Sidebars, SidebarError> {
        match &topic.sidebar_path {
            Some(path) => Sidebars::load(path),
            None => Ok(Sidebars::autogenerated(&storage.scan()?)),
        }
    }
}

/// Locale set of a site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locales {
    default: String,
    others: Vec<String>,
}

impl Locales {
    /// Site with a single locale.
    #[must_use]
    pub fn single(code: impl Into<String>) -> Self {
        Self {
            default: code.into(),
            others: Vec::new(),
        }
    }

    /// Validate the configured locale set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the default locale is not listed,
    /// a locale is listed twice or a locale is not a valid URL segment.
    pub fn from_config(config: &I18nConfig) -> Result<Self, ConfigurationError> {
        let mut issues = Vec::new();
        let mut seen: Vec<&str> = Vec::new();
        for code in &config.locales {
            if seen.contains(&code.as_str()) {
                issues.push(ConfigurationIssue::DuplicateLocale {
                    locale: code.clone(),
                });
                continue;
            }
            if !is_url_segment(code) {
                issues.push(ConfigurationIssue::InvalidLocale {
                    locale: code.clone(),
                });
            }
            seen.push(code);
        }
        if !seen.contains(&config.default_locale.as_str()) {
            issues.push(ConfigurationIssue::DefaultLocaleMissing {
                locale: config.default_locale.clone(),
            });
        }
        if !issues.is_empty() {
            return Err(ConfigurationError::new(issues));
        }

        Ok(Self {
            default: config.default_locale.clone(),
            others: seen
                .into_iter()
                .filter(|code| *code != config.default_locale)
                .map(ToOwned::to_owned)
                .collect(),
        })
    }

    /// Default locale, served without a prefix.
    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default
    }

    /// Non-default locales in configuration order.
    #[must_use]
    pub fn others(&self) -> &[String] {
        &self.others
    }
}

fn is_url_segment(code: &str) -> bool {
    !code.is_empty()
        && code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// A topic bound to a route prefix.
#[derive(Clone)]
pub struct Mount {
    topic: Topic,
    locale: Option<String>,
    prefix: String,
    storage: Arc<dyn Storage>,
    sidebars: Arc<Sidebars>,
}

impl Mount {
    /// Mounted topic.
    #[must_use]
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Locale of the mount. `None` for the default locale.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Normalized route prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Sidebars of the topic.
    #[must_use]
    pub fn sidebars(&self) -> &Sidebars {
        &self.sidebars
    }

    /// Content storage of the topic.
    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Navigation descriptors of one sidebar, routed under this mount.
    #[must_use]
    pub fn navigation(&self, sidebar: &str) -> Option<Render<'_>> {
        self.sidebars
            .get(sidebar)
            .map(|tree| render(tree, &self.prefix))
    }

    /// Nested navigation items of one sidebar.
    #[must_use]
    pub fn nav_items(&self, sidebar: &str) -> Option<Vec<NavItem>> {
        self.navigation(sidebar).map(nest)
    }

    /// Route of a document under this mount.
    #[must_use]
    pub fn doc_route(&self, doc_id: &str) -> String {
        join_route(&self.prefix, doc_id)
    }

    /// Read a document served by this mount.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the identifier doesn't resolve or the
    /// content can't be read.
    pub fn serve(&self, doc_id: &str) -> Result<String, StorageError> {
        self.storage.read(doc_id)
    }
}

impl fmt::Debug for Mount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mount")
            .field("topic", &self.topic.id)
            .field("locale", &self.locale)
            .field("prefix", &self.prefix)
            .field("sidebars", &self.sidebars.len())
            .finish_non_exhaustive()
    }
}

/// A URL matched against the route table.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub mount: &'a Mount,
    /// Document identifier below the mount prefix. Empty for the prefix itself.
    pub doc_id: String,
}

/// Ordered route mounts of a site.
#[derive(Clone, Debug)]
pub struct RouteTable {
    base_url: String,
    mounts: Vec<Mount>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            base_url: "/".to_owned(),
            mounts: Vec::new(),
        }
    }
}

impl RouteTable {
    /// Normalized base URL every mount prefix starts with.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Mounts in registry order, default locale first.
    #[must_use]
    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    /// Mount of a topic for a locale. `None` selects the default locale.
    #[must_use]
    pub fn get(&self, topic: &str, locale: Option<&str>) -> Option<&Mount> {
        self.mounts
            .iter()
            .find(|m| m.topic.id == topic && m.locale.as_deref() == locale)
    }

    /// Find the mount serving `url`. The longest matching prefix wins.
    ///
    /// Query strings and fragments are ignored.
    #[must_use]
    pub fn resolve(&self, url: &str) -> Option<RouteMatch<'_>> {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let path = normalize_route(path);
        let segments = route_segments(&path);

        self.mounts
            .iter()
            .filter_map(|mount| {
                let prefix = route_segments(&mount.prefix);
                segments
                    .strip_prefix(prefix.as_slice())
                    .map(|rest| (prefix.len(), mount, rest.join("/")))
            })
            .max_by_key(|(depth, _, _)| *depth)
            .map(|(_, mount, doc_id)| RouteMatch { mount, doc_id })
    }
}

fn route_segments(route: &str) -> Vec<&str> {
    route.split('/').filter(|s| !s.is_empty()).collect()
}

/// Whether two normalized prefixes overlap segment-wise.
fn overlaps(a: &str, b: &str) -> bool {
    let a = route_segments(a);
    let b = route_segments(b);
    a.starts_with(&b) || b.starts_with(&a)
}

/// Mount every registered topic at the site root.
///
/// # Errors
///
/// Returns [`BuildError`] listing every routing conflict and every sidebar
/// that failed to load.
pub fn mount(
    registry: &TopicRegistry,
    locales: &Locales,
    content: &dyn ContentProvider,
) -> Result<RouteTable, BuildError> {
    mount_at("/", registry, locales, content)
}

/// Mount every registered topic below `base_url`.
///
/// # Errors
///
/// Same as [`mount`].
pub fn mount_at(
    base_url: &str,
    registry: &TopicRegistry,
    locales: &Locales,
    content: &dyn ContentProvider,
) -> Result<RouteTable, BuildError> {
    let (table, errors) = compose(base_url, registry.resolve_all(), locales, content);
    if errors.is_empty() {
        Ok(table)
    } else {
        Err(BuildError { errors })
    }
}

/// Mount topics in order, returning the table with every problem found.
///
/// Conflicts are detected on the topic prefixes alone since the base URL
/// is shared by every mount.
pub(crate) fn compose(
    base_url: &str,
    topics: &[Topic],
    locales: &Locales,
    content: &dyn ContentProvider,
) -> (RouteTable, Vec<SiteError>) {
    let base_url = normalize_route(base_url);
    let mut errors = Vec::new();

    let conflicts = find_conflicts(topics, locales);
    if !conflicts.is_empty() {
        errors.push(SiteError::RoutingConflict(RoutingConflictError { conflicts }));
    }

    let mut defaults = Vec::with_capacity(topics.len());
    for topic in topics {
        let storage = content.storage(topic);
        let sidebars = match content.sidebars(topic, storage.as_ref()) {
            Ok(sidebars) => sidebars,
            Err(source) => {
                errors.push(SiteError::Sidebar {
                    topic: topic.id.clone(),
                    source,
                });
                Sidebars::default()
            }
        };
        let prefix = join_route(&base_url, &topic.route_base_path);
        tracing::debug!(topic = %topic.id, %prefix, sidebars = sidebars.len(), "Mounted topic");
        defaults.push(Mount {
            topic: topic.clone(),
            locale: None,
            prefix,
            storage,
            sidebars: Arc::new(sidebars),
        });
    }

    let mut mounts = defaults.clone();
    for locale in locales.others() {
        for base in &defaults {
            mounts.push(Mount {
                locale: Some(locale.clone()),
                prefix: join_route(&base_url, &format!("{locale}{}", base.topic.route_base_path)),
                ..base.clone()
            });
        }
    }

    (RouteTable { base_url, mounts }, errors)
}

fn find_conflicts(topics: &[Topic], locales: &Locales) -> Vec<RouteConflict> {
    let mut conflicts = Vec::new();
    for (i, first) in topics.iter().enumerate() {
        for second in &topics[i + 1..] {
            if overlaps(&first.route_base_path, &second.route_base_path) {
                conflicts.push(RouteConflict {
                    first: RouteOwner::Topic(first.id.clone()),
                    first_prefix: first.route_base_path.clone(),
                    second: RouteOwner::Topic(second.id.clone()),
                    second_prefix: second.route_base_path.clone(),
                });
            }
        }
        let head = route_segments(&first.route_base_path).first().copied();
        for locale in locales.others() {
            if head == Some(locale.as_str()) {
                conflicts.push(RouteConflict {
                    first: RouteOwner::Topic(first.id.clone()),
                    first_prefix: first.route_base_path.clone(),
                    second: RouteOwner::Locale(locale.clone()),
                    second_prefix: format!("/{locale}"),
                });
            }
        }
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use seputar_storage::MockStorage;

    use super::*;
    use crate::sidebar::{SidebarNode, SidebarTree};

    /// In-memory content keyed by topic id.
    #[derive(Default)]
    struct MemoryContent {
        docs: HashMap<String, Vec<&'static str>>,
        sidebars: HashMap<String, Sidebars>,
    }

    impl MemoryContent {
        fn with_topic(mut self, topic: &str, docs: Vec<&'static str>, tree: SidebarTree) -> Self {
            self.docs.insert(topic.to_owned(), docs);
            self.sidebars.insert(
                topic.to_owned(),
                Sidebars::new(vec![(format!("{topic}Sidebar"), tree)]),
            );
            self
        }
    }

    impl ContentProvider for MemoryContent {
        fn storage(&self, topic: &Topic) -> Arc<dyn Storage> {
            let storage = self
                .docs
                .get(&topic.id)
                .into_iter()
                .flatten()
                .fold(MockStorage::new(), |storage, id| {
                    storage.with_doc(id, format!("# {id}"))
                });
            Arc::new(storage)
        }

        fn sidebars(&self, topic: &Topic, _: &dyn Storage) -> Result<Sidebars, SidebarError> {
            Ok(self.sidebars.get(&topic.id).cloned().unwrap_or_default())
        }
    }

    fn two_topics() -> (TopicRegistry, MemoryContent) {
        let registry = TopicRegistry::from_topics([
            Topic::new("vite", "vite", "/site/vite"),
            Topic::new("docusaurus", "docusaurus", "/site/docusaurus"),
        ])
        .unwrap();
        let content = MemoryContent::default()
            .with_topic(
                "vite",
                vec!["intro"],
                SidebarTree::new(vec![SidebarNode::doc("intro")]),
            )
            .with_topic(
                "docusaurus",
                vec!["intro", "tutorial-basics/create-a-page"],
                SidebarTree::new(vec![SidebarNode::category(
                    "Tutorial",
                    vec![
                        SidebarNode::doc("intro"),
                        SidebarNode::doc("tutorial-basics/create-a-page"),
                    ],
                )]),
            );
        (registry, content)
    }

    #[test]
    fn test_two_topics_mount_disjoint_areas() {
        let (registry, content) = two_topics();

        let table = mount(&registry, &Locales::single("id"), &content).unwrap();

        let prefixes: Vec<_> = table.mounts().iter().map(Mount::prefix).collect();
        assert_eq!(prefixes, vec!["/vite", "/docusaurus"]);

        let hit = table.resolve("/vite/intro").unwrap();
        assert_eq!(hit.mount.topic().id, "vite");
        assert_eq!(hit.doc_id, "intro");

        let hit = table.resolve("/docusaurus/tutorial-basics/create-a-page").unwrap();
        assert_eq!(hit.mount.topic().id, "docusaurus");
        assert_eq!(hit.doc_id, "tutorial-basics/create-a-page");

        assert!(table.resolve("/vitest/intro").is_none());
    }

    #[test]
    fn test_base_url_prefixes_every_mount() {
        let (registry, content) = two_topics();
        let locales = Locales::from_config(&I18nConfig {
            default_locale: "id".to_owned(),
            locales: vec!["id".to_owned(), "en".to_owned()],
        })
        .unwrap();

        let table = mount_at("/seputar/", &registry, &locales, &content).unwrap();

        assert_eq!(table.base_url(), "/seputar");
        let prefixes: Vec<_> = table.mounts().iter().map(Mount::prefix).collect();
        assert_eq!(
            prefixes,
            vec![
                "/seputar/vite",
                "/seputar/docusaurus",
                "/seputar/en/vite",
                "/seputar/en/docusaurus",
            ]
        );

        let hit = table.resolve("/seputar/vite/intro").unwrap();
        assert_eq!(hit.mount.topic().id, "vite");
        assert_eq!(hit.doc_id, "intro");
        let hit = table.resolve("/seputar/en/docusaurus/intro").unwrap();
        assert_eq!(hit.mount.locale(), Some("en"));
        assert!(table.resolve("/vite/intro").is_none());
        assert_eq!(
            table.get("vite", None).unwrap().doc_route("intro"),
            "/seputar/vite/intro"
        );
    }

    #[test]
    fn test_root_topic_under_base_url() {
        let registry = TopicRegistry::from_topics([Topic::new("home", "/", "/site/home")]).unwrap();
        let content = MemoryContent::default().with_topic(
            "home",
            vec!["intro"],
            SidebarTree::new(vec![SidebarNode::doc("intro")]),
        );

        let table = mount_at("/docs/", &registry, &Locales::single("en"), &content).unwrap();

        assert_eq!(table.mounts()[0].prefix(), "/docs");
        assert_eq!(table.resolve("/docs/intro").unwrap().doc_id, "intro");
        assert!(table.resolve("/intro").is_none());
    }

    #[test]
    fn test_serve_reads_through_storage() {
        let (registry, content) = two_topics();
        let table = mount(&registry, &Locales::single("en"), &content).unwrap();

        let hit = table.resolve("/vite/intro?tab=1#top").unwrap();

        assert_eq!(hit.mount.serve(&hit.doc_id).unwrap(), "# intro");
        assert!(hit.mount.serve("missing-doc").is_err());
    }

    #[test]
    fn test_bypassing_registry_reports_routing_conflict() {
        let topics = vec![
            Topic::new("vite", "/vite", "/site/vite"),
            Topic::new("docusaurus", "/docusaurus", "/site/docusaurus"),
            Topic::new("vite-copy", "vite", "/site/vite-copy"),
        ];

        let (_, errors) = compose(
            "/",
            &topics,
            &Locales::single("en"),
            &MemoryContent::default(),
        );

        assert_eq!(errors.len(), 1);
        let SiteError::RoutingConflict(err) = &errors[0] else {
            panic!("expected routing conflict, got {:?}", errors[0]);
        };
        assert_eq!(
            err.conflicts,
            vec![RouteConflict {
                first: RouteOwner::Topic("vite".to_owned()),
                first_prefix: "/vite".to_owned(),
                second: RouteOwner::Topic("vite-copy".to_owned()),
                second_prefix: "/vite".to_owned(),
            }]
        );
    }

    #[test]
    fn test_nested_prefix_conflicts_but_sibling_name_does_not() {
        let registry = TopicRegistry::from_topics([
            Topic::new("vite", "vite", "/site/vite"),
            Topic::new("plugins", "vite/plugins", "/site/plugins"),
            Topic::new("vitest", "vitest", "/site/vitest"),
        ])
        .unwrap();

        let err = mount(&registry, &Locales::single("en"), &MemoryContent::default()).unwrap_err();

        let conflicts: Vec<_> = err.routing_conflicts().flat_map(|e| &e.conflicts).collect();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(
            conflicts[0].to_string(),
            "topic 'vite' at '/vite' overlaps topic 'plugins' at '/vite/plugins'"
        );
    }

    #[test]
    fn test_root_prefix_overlaps_every_topic() {
        let topics = vec![
            Topic::new("home", "/", "/site/home"),
            Topic::new("vite", "vite", "/site/vite"),
            Topic::new("astro", "astro", "/site/astro"),
        ];

        let conflicts = find_conflicts(&topics, &Locales::single("en"));

        assert_eq!(conflicts.len(), 2);
    }

    #[test]
    fn test_localized_mounts() {
        let (registry, content) = two_topics();
        let locales = Locales::from_config(&I18nConfig {
            default_locale: "id".to_owned(),
            locales: vec!["en".to_owned(), "id".to_owned()],
        })
        .unwrap();

        let table = mount(&registry, &locales, &content).unwrap();

        let prefixes: Vec<_> = table.mounts().iter().map(Mount::prefix).collect();
        assert_eq!(prefixes, vec!["/vite", "/docusaurus", "/en/vite", "/en/docusaurus"]);

        let hit = table.resolve("/en/vite/intro").unwrap();
        assert_eq!(hit.mount.locale(), Some("en"));
        assert_eq!(hit.doc_id, "intro");
        assert_eq!(table.get("vite", Some("en")).unwrap().prefix(), "/en/vite");
        assert!(table.get("vite", Some("fr")).is_none());
    }

    #[test]
    fn test_topic_prefix_colliding_with_locale() {
        let topics = vec![Topic::new("english", "en/guides", "/site/english")];
        let locales = Locales::from_config(&I18nConfig {
            default_locale: "id".to_owned(),
            locales: vec!["id".to_owned(), "en".to_owned()],
        })
        .unwrap();

        let conflicts = find_conflicts(&topics, &locales);

        assert_eq!(
            conflicts,
            vec![RouteConflict {
                first: RouteOwner::Topic("english".to_owned()),
                first_prefix: "/en/guides".to_owned(),
                second: RouteOwner::Locale("en".to_owned()),
                second_prefix: "/en".to_owned(),
            }]
        );
    }

    #[test]
    fn test_root_topic_yields_to_locale_prefix() {
        let registry = TopicRegistry::from_topics([Topic::new("home", "/", "/site/home")]).unwrap();
        let content = MemoryContent::default().with_topic(
            "home",
            vec!["intro"],
            SidebarTree::new(vec![SidebarNode::doc("intro")]),
        );
        let locales = Locales::from_config(&I18nConfig {
            default_locale: "id".to_owned(),
            locales: vec!["id".to_owned(), "en".to_owned()],
        })
        .unwrap();

        let table = mount(&registry, &locales, &content).unwrap();

        let hit = table.resolve("/en/intro").unwrap();
        assert_eq!(hit.mount.locale(), Some("en"));
        let hit = table.resolve("/intro").unwrap();
        assert_eq!(hit.mount.locale(), None);
    }

    #[test]
    fn test_locales_from_config_collects_issues() {
        let err = Locales::from_config(&I18nConfig {
            default_locale: "fr".to_owned(),
            locales: vec!["en".to_owned(), "en".to_owned(), "pt BR".to_owned()],
        })
        .unwrap_err();

        assert_eq!(
            err.issues,
            vec![
                ConfigurationIssue::DuplicateLocale {
                    locale: "en".to_owned()
                },
                ConfigurationIssue::InvalidLocale {
                    locale: "pt BR".to_owned()
                },
                ConfigurationIssue::DefaultLocaleMissing {
                    locale: "fr".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_mount_navigation() {
        let (registry, content) = two_topics();
        let table = mount(&registry, &Locales::single("en"), &content).unwrap();
        let docs = table.get("docusaurus", None).unwrap();

        let targets: Vec<_> = docs
            .navigation("docusaurusSidebar")
            .unwrap()
            .filter_map(|e| e.target)
            .collect();

        assert_eq!(
            targets,
            vec!["/docusaurus/intro", "/docusaurus/tutorial-basics/create-a-page"]
        );
        assert!(docs.navigation("unknown").is_none());
        assert_eq!(docs.nav_items("docusaurusSidebar").unwrap().len(), 1);
        assert_eq!(docs.doc_route("intro"), "/docusaurus/intro");
    }

    #[test]
    fn test_sidebar_failure_is_reported_and_mount_continues() {
        struct Broken;

        impl ContentProvider for Broken {
            fn storage(&self, _: &Topic) -> Arc<dyn Storage> {
                Arc::new(MockStorage::new())
            }

            fn sidebars(&self, _: &Topic, _: &dyn Storage) -> Result<Sidebars, SidebarError> {
                Sidebars::from_yaml("docs: 42")
            }
        }

        let (registry, _) = two_topics();

        let err = mount(&registry, &Locales::single("en"), &Broken).unwrap_err();

        assert_eq!(err.errors.len(), 2);
        assert!(
            err.errors
                .iter()
                .all(|e| matches!(e, SiteError::Sidebar { .. }))
        );
    }

    #[test]
    fn test_fs_content_autogenerates_sidebar() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("intro.md"), "# Intro").unwrap();
        std::fs::write(dir.path().join("setup.mdx"), "# Setup").unwrap();
        let topic = Topic::new("vite", "vite", dir.path());

        let storage = FsContent.storage(&topic);
        let sidebars = FsContent.sidebars(&topic, storage.as_ref()).unwrap();

        let tree = sidebars.get(crate::sidebar::AUTOGENERATED_SIDEBAR).unwrap();
        assert_eq!(tree.doc_ids().collect::<Vec<_>>(), vec!["intro", "setup"]);
    }
}
