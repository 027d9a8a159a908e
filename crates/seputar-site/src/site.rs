//! Site build.
//!
//! [`Site::build`] runs every check of the site model over a loaded
//! [`Config`] and either returns the immutable site or one [`BuildError`]
//! listing every problem found.
//!
//! # Order
//!
//! 1. Locales and the topic registry (configuration errors)
//! 2. Route mounts and sidebars (routing conflicts, sidebar errors)
//! 3. Sidebar references of every default-locale mount, in registry order
//! 4. Navbar items, footer links and documentation cards
//!
//! Unresolved references are fatal in strict mode and become
//! [`BuildWarning`]s in permissive mode. Orphan documents are always
//! warnings.
//!
//! Every route lives below the configured `base_url`. Internal footer and
//! card links are written relative to it, so `/vite/intro` on a site with
//! base URL `/seputar/` is checked as `/seputar/vite/intro`.
//!
//! # Example
//!
//! ```ignore
//! use seputar_config::Config;
//! use seputar_site::{FsContent, Site};
//!
//! let config = Config::load(None, None)?;
//! let site = Site::build(&config, &FsContent)?;
//! for mount in site.routes().mounts() {
//!     println!("{} -> {}", mount.prefix(), mount.topic().id);
//! }
//! ```

use std::collections::HashSet;
use std::fmt;

use seputar_config::Config;

use crate::card::{DocumentationCard, Footer, FooterColumn, FooterLink, LinkKind};
use crate::error::{BuildError, ConfigurationError, ConfigurationIssue, SiteError};
use crate::mount::{ContentProvider, Locales, RouteTable, compose};
use crate::navigation::NavbarLink;
use crate::topic::{Topic, TopicRegistry, join_route, normalize_route};
use crate::validate::{
    ReferenceSource, UnresolvedReason, UnresolvedReference, ValidationMode, apply_mode, orphans,
    validate,
};

/// Non-fatal finding of a site build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildWarning {
    /// Reference downgraded by permissive mode.
    Unresolved(UnresolvedReference),
    /// Document no sidebar of its topic references.
    Orphan { topic: String, id: String },
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved(reference) => write!(f, "unresolved {reference}"),
            Self::Orphan { topic, id } => {
                write!(f, "document '{id}' of topic '{topic}' is not in any sidebar")
            }
        }
    }
}

/// Built documentation site.
#[derive(Debug)]
pub struct Site {
    title: String,
    tagline: Option<String>,
    url: Option<String>,
    mode: ValidationMode,
    locales: Locales,
    registry: TopicRegistry,
    routes: RouteTable,
    navbar_title: Option<String>,
    navbar: Vec<NavbarLink>,
    footer: Footer,
    cards: Vec<DocumentationCard>,
    warnings: Vec<BuildWarning>,
}

impl Site {
    /// Build the site described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] with every configuration error, routing
    /// conflict and sidebar error found, plus unresolved references in
    /// strict mode.
    pub fn build(config: &Config, content: &dyn ContentProvider) -> Result<Self, BuildError> {
        let mode = ValidationMode::from(config.on_broken_links);
        let mut issues = Vec::new();

        let locales = Locales::from_config(&config.i18n).unwrap_or_else(|err| {
            issues.extend(err.issues);
            Locales::single(config.i18n.default_locale.clone())
        });

        let (registry, registry_issues) =
            TopicRegistry::collect(config.topics_resolved.iter().map(Topic::from_config));
        issues.extend(registry_issues);

        let (routes, mount_errors) =
            compose(&config.base_url, registry.resolve_all(), &locales, content);
        let failed_sidebars: HashSet<&str> = mount_errors
            .iter()
            .filter_map(|e| match e {
                SiteError::Sidebar { topic, .. } => Some(topic.as_str()),
                _ => None,
            })
            .collect();

        let mut warnings = Vec::new();
        let mut unresolved = check_sidebars(&routes, &failed_sidebars, &mut warnings);

        let navbar = resolve_navbar(config, &registry, &routes, &failed_sidebars, &mut issues);
        let footer = resolve_footer(config, &routes, &mut issues, &mut unresolved);
        let cards = resolve_cards(config, &routes, &mut issues, &mut unresolved);

        let mut errors = Vec::new();
        if !issues.is_empty() {
            errors.push(SiteError::Configuration(ConfigurationError::new(issues)));
        }
        errors.extend(mount_errors);
        match apply_mode(unresolved, mode) {
            Ok(downgraded) => warnings.extend(downgraded.into_iter().map(BuildWarning::Unresolved)),
            Err(err) => errors.push(SiteError::UnresolvedReference(err)),
        }

        if !errors.is_empty() {
            return Err(BuildError { errors });
        }

        for warning in &warnings {
            if let BuildWarning::Orphan { topic, id } = warning {
                tracing::info!(%topic, %id, "Document is not referenced by any sidebar");
            }
        }
        tracing::debug!(
            topics = registry.len(),
            mounts = routes.mounts().len(),
            warnings = warnings.len(),
            "Site built"
        );

        Ok(Self {
            title: config.title.clone(),
            tagline: config.tagline.clone(),
            url: config.url.clone(),
            mode,
            locales,
            registry,
            routes,
            navbar_title: config.navbar.title.clone(),
            navbar,
            footer,
            cards,
            warnings,
        })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn tagline(&self) -> Option<&str> {
        self.tagline.as_deref()
    }

    /// Production origin of the site, if configured.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Normalized base URL of every route.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.routes.base_url()
    }

    /// Absolute URL of a route, or `None` without a configured origin.
    ///
    /// `route` is taken as served, base URL included.
    #[must_use]
    pub fn absolute_url(&self, route: &str) -> Option<String> {
        let origin = self.url.as_deref()?.trim_end_matches('/');
        Some(format!("{origin}{}", normalize_route(route)))
    }

    /// Mode unresolved references were handled with.
    #[must_use]
    pub fn mode(&self) -> ValidationMode {
        self.mode
    }

    #[must_use]
    pub fn locales(&self) -> &Locales {
        &self.locales
    }

    /// Topic registry.
    #[must_use]
    pub fn registry(&self) -> &TopicRegistry {
        &self.registry
    }

    /// Route table.
    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[must_use]
    pub fn navbar_title(&self) -> Option<&str> {
        self.navbar_title.as_deref()
    }

    /// Resolved navbar links in configuration order.
    #[must_use]
    pub fn navbar(&self) -> &[NavbarLink] {
        &self.navbar
    }

    #[must_use]
    pub fn footer(&self) -> &Footer {
        &self.footer
    }

    /// Documentation cards in configuration order.
    #[must_use]
    pub fn cards(&self) -> &[DocumentationCard] {
        &self.cards
    }

    /// Non-fatal findings.
    #[must_use]
    pub fn warnings(&self) -> &[BuildWarning] {
        &self.warnings
    }
}

/// Validate every sidebar of every default-locale mount and collect orphans.
fn check_sidebars(
    routes: &RouteTable,
    failed_sidebars: &HashSet<&str>,
    warnings: &mut Vec<BuildWarning>,
) -> Vec<UnresolvedReference> {
    let mut unresolved = Vec::new();
    for mount in routes.mounts().iter().filter(|m| m.locale().is_none()) {
        let topic = &mount.topic().id;
        if failed_sidebars.contains(topic.as_str()) {
            continue;
        }
        for (name, tree) in mount.sidebars().iter() {
            unresolved.extend(
                validate(tree, mount.storage())
                    .into_unresolved()
                    .into_iter()
                    .map(|r| r.in_sidebar(topic, name)),
            );
        }
        match mount.storage().scan() {
            Ok(documents) => warnings.extend(orphans(&documents, mount.sidebars()).into_iter().map(
                |doc| BuildWarning::Orphan {
                    topic: topic.clone(),
                    id: doc.id.clone(),
                },
            )),
            Err(err) => tracing::warn!(%topic, error = %err, "Cannot scan content for orphans"),
        }
    }
    unresolved
}

fn resolve_navbar(
    config: &Config,
    registry: &TopicRegistry,
    routes: &RouteTable,
    failed_sidebars: &HashSet<&str>,
    issues: &mut Vec<ConfigurationIssue>,
) -> Vec<NavbarLink> {
    let mut links = Vec::new();
    for item in &config.navbar.items {
        let Some(mount) = registry
            .get(&item.topic)
            .and_then(|topic| routes.get(&topic.id, None))
        else {
            issues.push(ConfigurationIssue::UnknownNavbarTopic {
                label: item.label.clone(),
                topic: item.topic.clone(),
            });
            continue;
        };
        if failed_sidebars.contains(item.topic.as_str()) {
            continue;
        }
        let Some(tree) = mount.sidebars().get(&item.sidebar) else {
            issues.push(ConfigurationIssue::UnknownNavbarSidebar {
                label: item.label.clone(),
                topic: item.topic.clone(),
                sidebar: item.sidebar.clone(),
            });
            continue;
        };
        let Some(first) = tree.first_doc() else {
            issues.push(ConfigurationIssue::EmptyNavbarSidebar {
                label: item.label.clone(),
                topic: item.topic.clone(),
                sidebar: item.sidebar.clone(),
            });
            continue;
        };
        links.push(NavbarLink {
            label: item.label.clone(),
            to: mount.doc_route(first),
            position: item.position,
        });
    }
    links
}

fn resolve_footer(
    config: &Config,
    routes: &RouteTable,
    issues: &mut Vec<ConfigurationIssue>,
    unresolved: &mut Vec<UnresolvedReference>,
) -> Footer {
    let mut columns = Vec::with_capacity(config.footer.links.len());
    for column in &config.footer.links {
        let mut items = Vec::with_capacity(column.items.len());
        for item in &column.items {
            let Some(link) = FooterLink::from_config(item) else {
                issues.push(ConfigurationIssue::AmbiguousFooterLink {
                    label: item.label.clone(),
                });
                continue;
            };
            let context = format!("footer link '{}'", link.label());
            let expected = match link {
                FooterLink::Internal { .. } => LinkKind::Internal,
                FooterLink::External { .. } => LinkKind::External,
            };
            if LinkKind::classify(link.target()) == Some(expected) {
                if expected == LinkKind::Internal {
                    unresolved.extend(check_link(routes, link.target(), context));
                }
                items.push(link);
            } else {
                issues.push(ConfigurationIssue::MalformedLink {
                    context,
                    link: link.target().to_owned(),
                });
            }
        }
        columns.push(FooterColumn {
            title: column.title.clone(),
            items,
        });
    }
    Footer {
        style: config.footer.style.clone(),
        columns,
        copyright: config.footer.copyright.clone(),
    }
}

fn resolve_cards(
    config: &Config,
    routes: &RouteTable,
    issues: &mut Vec<ConfigurationIssue>,
    unresolved: &mut Vec<UnresolvedReference>,
) -> Vec<DocumentationCard> {
    let mut cards = Vec::with_capacity(config.cards.len());
    for card in &config.cards {
        let context = format!("card '{}'", card.title);
        match LinkKind::classify(&card.link) {
            Some(LinkKind::Internal) => {
                unresolved.extend(check_link(routes, &card.link, context));
            }
            Some(LinkKind::External) => {}
            None => {
                issues.push(ConfigurationIssue::MalformedLink {
                    context,
                    link: card.link.clone(),
                });
                continue;
            }
        }
        cards.push(DocumentationCard::from(card));
    }
    cards
}

/// Check that an internal link names a document served by the route table.
///
/// Links are relative to the base URL.
fn check_link(routes: &RouteTable, link: &str, context: String) -> Option<UnresolvedReference> {
    let reason = match routes.resolve(&join_route(routes.base_url(), link)) {
        Some(hit) if !hit.doc_id.is_empty() => match hit.mount.storage().resolve(&hit.doc_id) {
            Ok(_) => return None,
            Err(err) => UnresolvedReason::from(err.kind()),
        },
        _ => UnresolvedReason::NotRouted,
    };
    Some(UnresolvedReference {
        id: link.to_owned(),
        reason,
        source: ReferenceSource::Link { context },
    })
}
