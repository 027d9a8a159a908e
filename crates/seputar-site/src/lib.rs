//! Documentation site model for Seputar.
//!
//! This crate provides:
//! - [`TopicRegistry`]: ordered, independently routed documentation areas
//! - [`SidebarTree`]: navigation trees with a single depth-first [`walk`](SidebarTree::walk)
//! - [`validate`] and [`render`]: reference checks and navigation descriptors
//!   built on that walk
//! - [`mount`] and [`RouteTable`]: route prefixes bound to content storage
//! - [`Site`]: the complete build over a loaded configuration
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use seputar_config::Config;
//! use seputar_site::{FsContent, Site};
//!
//! let config = Config::load(None, None)?;
//! let site = Site::build(&config, &FsContent)?;
//!
//! if let Some(hit) = site.routes().resolve("/vite/intro") {
//!     let markdown = hit.mount.serve(&hit.doc_id)?;
//!     assert!(!markdown.is_empty());
//! }
//! # Ok(())
//! # }
//! ```

mod card;
mod error;
mod mount;
mod navigation;
mod sidebar;
mod site;
mod topic;
mod validate;

pub use card::{DocumentationCard, Footer, FooterColumn, FooterLink, LinkKind};
pub use error::{
    BuildError, ConfigurationError, ConfigurationIssue, RouteConflict, RouteOwner,
    RoutingConflictError, SidebarError, SiteError, UnresolvedReferenceError,
};
pub use mount::{
    ContentProvider, FsContent, Locales, Mount, RouteMatch, RouteTable, mount, mount_at,
};
pub use navigation::{NavEntry, NavItem, NavKind, NavbarLink, Render, nest, render};
pub use sidebar::{AUTOGENERATED_SIDEBAR, SidebarNode, SidebarTree, Sidebars, Visit, Walk};
pub use site::{BuildWarning, Site};
pub use topic::{Topic, TopicRegistry, join_route, normalize_route};
pub use validate::{
    ReferenceSource, UnresolvedReason, UnresolvedReference, Validation, ValidationMode,
    apply_mode, orphans, validate,
};
