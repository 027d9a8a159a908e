//! Navigation rendering.
//!
//! Turns a [`SidebarTree`] into the descriptors a UI runtime needs to draw
//! the sidebar: a flat, lazily produced sequence of [`NavEntry`] values in
//! walk order, and the nested [`NavItem`] form built from it.

use seputar_config::NavbarPosition;
use serde::Serialize;

use crate::sidebar::{SidebarNode, SidebarTree, Walk};
use crate::topic::join_route;

/// Kind of navigation entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavKind {
    Doc,
    Category,
}

/// Flat navigation descriptor for one sidebar node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub kind: NavKind,
    /// Display label.
    pub label: String,
    /// Route of the document. `None` for categories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Initial collapsed state. Always `false` for documents.
    pub collapsed: bool,
    /// Nesting depth, 0 for top-level nodes.
    pub depth: usize,
}

/// Lazy rendering of a sidebar tree.
///
/// Produced by [`render`]. Clone it to render again from the start.
#[derive(Clone, Debug)]
pub struct Render<'a> {
    walk: Walk<'a>,
    route_base: &'a str,
}

impl Iterator for Render<'_> {
    type Item = NavEntry;

    fn next(&mut self) -> Option<Self::Item> {
        let visit = self.walk.next()?;
        let entry = match visit.node {
            SidebarNode::Doc { id, label } => NavEntry {
                kind: NavKind::Doc,
                label: label.clone().unwrap_or_else(|| id.clone()),
                target: Some(join_route(self.route_base, id)),
                collapsed: false,
                depth: visit.depth,
            },
            SidebarNode::Category {
                label, collapsed, ..
            } => NavEntry {
                kind: NavKind::Category,
                label: label.clone(),
                target: None,
                collapsed: *collapsed,
                depth: visit.depth,
            },
        };
        Some(entry)
    }
}

/// Render a sidebar tree into navigation descriptors in walk order.
///
/// `route_base` is the normalized route prefix documents are served under.
#[must_use]
pub fn render<'a>(tree: &'a SidebarTree, route_base: &'a str) -> Render<'a> {
    Render {
        walk: tree.walk(),
        route_base,
    }
}

/// Nested navigation item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display title.
    pub title: String,
    /// Link target. `None` for categories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub collapsed: bool,
    /// Child navigation items.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

impl From<NavEntry> for NavItem {
    fn from(entry: NavEntry) -> Self {
        Self {
            title: entry.label,
            path: entry.target,
            collapsed: entry.collapsed,
            children: Vec::new(),
        }
    }
}

/// Rebuild the nested item tree from flat entries in walk order.
#[must_use]
pub fn nest(entries: impl IntoIterator<Item = NavEntry>) -> Vec<NavItem> {
    let mut roots: Vec<NavItem> = Vec::new();
    // Open categories; an entry at depth `d` has exactly `d` open ancestors.
    let mut open: Vec<NavItem> = Vec::new();

    for entry in entries {
        while open.len() > entry.depth {
            close(&mut open, &mut roots);
        }
        let kind = entry.kind;
        let item = NavItem::from(entry);
        match kind {
            NavKind::Category => open.push(item),
            NavKind::Doc => match open.last_mut() {
                Some(parent) => parent.children.push(item),
                None => roots.push(item),
            },
        }
    }
    while !open.is_empty() {
        close(&mut open, &mut roots);
    }
    roots
}

fn close(open: &mut Vec<NavItem>, roots: &mut Vec<NavItem>) {
    if let Some(done) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}

/// Resolved navbar entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavbarLink {
    pub label: String,
    /// Route of the first document of the referenced sidebar.
    pub to: String,
    pub position: NavbarPosition,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn entry(kind: NavKind, label: &str, target: Option<&str>, depth: usize) -> NavEntry {
        NavEntry {
            kind,
            label: label.to_owned(),
            target: target.map(ToOwned::to_owned),
            collapsed: kind == NavKind::Category,
            depth,
        }
    }

    #[test]
    fn test_render_follows_walk_order() {
        let tree = SidebarTree::new(vec![
            SidebarNode::category(
                "Intro",
                vec![
                    SidebarNode::doc("intro"),
                    SidebarNode::labelled_doc("guides/setup", "Setup"),
                ],
            ),
            SidebarNode::doc("missing-doc"),
        ]);

        let entries: Vec<_> = render(&tree, "/vite").collect();

        assert_eq!(
            entries,
            vec![
                entry(NavKind::Category, "Intro", None, 0),
                entry(NavKind::Doc, "intro", Some("/vite/intro"), 1),
                entry(NavKind::Doc, "Setup", Some("/vite/guides/setup"), 1),
                entry(NavKind::Doc, "missing-doc", Some("/vite/missing-doc"), 0),
            ]
        );
    }

    #[test]
    fn test_render_keeps_collapsed_state() {
        let tree = SidebarTree::new(vec![
            SidebarNode::expanded_category("Open", Vec::new()),
            SidebarNode::category("Closed", Vec::new()),
        ]);

        let collapsed: Vec<_> = render(&tree, "/").map(|e| e.collapsed).collect();

        assert_eq!(collapsed, vec![false, true]);
    }

    #[test]
    fn test_render_under_root_route() {
        let tree = SidebarTree::new(vec![SidebarNode::doc("intro")]);

        let targets: Vec<_> = render(&tree, "/").filter_map(|e| e.target).collect();

        assert_eq!(targets, vec!["/intro"]);
    }

    #[test]
    fn test_render_is_restartable() {
        let tree = SidebarTree::new(vec![SidebarNode::category(
            "A",
            vec![SidebarNode::doc("a")],
        )]);
        let rendering = render(&tree, "/docs");

        let first: Vec<_> = rendering.clone().collect();
        let second: Vec<_> = rendering.collect();

        assert_eq!(first, second);
        assert_eq!(first, render(&tree, "/docs").collect::<Vec<_>>());
    }

    #[test]
    fn test_render_empty_tree() {
        let tree = SidebarTree::default();
        assert_eq!(render(&tree, "/vite").count(), 0);
    }

    #[test]
    fn test_nest_rebuilds_tree() {
        let tree = SidebarTree::new(vec![
            SidebarNode::category(
                "Astro JS",
                vec![
                    SidebarNode::doc("intro"),
                    SidebarNode::expanded_category("Sesi 1", vec![SidebarNode::doc("setup")]),
                ],
            ),
            SidebarNode::doc("deploy"),
        ]);

        let items = nest(render(&tree, "/astro"));

        assert_eq!(
            items,
            vec![
                NavItem {
                    title: "Astro JS".to_owned(),
                    path: None,
                    collapsed: true,
                    children: vec![
                        NavItem {
                            title: "intro".to_owned(),
                            path: Some("/astro/intro".to_owned()),
                            collapsed: false,
                            children: Vec::new(),
                        },
                        NavItem {
                            title: "Sesi 1".to_owned(),
                            path: None,
                            collapsed: false,
                            children: vec![NavItem {
                                title: "setup".to_owned(),
                                path: Some("/astro/setup".to_owned()),
                                collapsed: false,
                                children: Vec::new(),
                            }],
                        },
                    ],
                },
                NavItem {
                    title: "deploy".to_owned(),
                    path: Some("/astro/deploy".to_owned()),
                    collapsed: false,
                    children: Vec::new(),
                },
            ]
        );
    }

    #[test]
    fn test_nest_keeps_empty_categories() {
        let tree = SidebarTree::new(vec![
            SidebarNode::category("Empty", Vec::new()),
            SidebarNode::doc("intro"),
        ]);

        let items = nest(render(&tree, "/"));

        assert_eq!(items.len(), 2);
        assert!(items[0].children.is_empty());
        assert_eq!(items[1].path.as_deref(), Some("/intro"));
    }

    #[test]
    fn test_nav_entry_serializes_kind() {
        let json = serde_json::to_value(entry(NavKind::Doc, "intro", Some("/intro"), 0)).unwrap();

        assert_eq!(json["kind"], "doc");
        assert_eq!(json["target"], "/intro");
    }
}
