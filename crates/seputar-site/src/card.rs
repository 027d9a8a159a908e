//! Documentation cards and footer links.

use seputar_config::{CardConfig, FooterLinkConfig};
use serde::Serialize;

/// Kind of a well-formed link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    /// Site-absolute path, checked against the route table.
    Internal,
    /// `http(s)://` URL, never checked.
    External,
}

impl LinkKind {
    /// Classify a link. `None` means the link is malformed.
    #[must_use]
    pub fn classify(link: &str) -> Option<Self> {
        if link.starts_with('/') && !link.starts_with("//") {
            return Some(Self::Internal);
        }
        let rest = link
            .strip_prefix("https://")
            .or_else(|| link.strip_prefix("http://"))?;
        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        (!host.is_empty() && !host.contains(char::is_whitespace)).then_some(Self::External)
    }
}

/// Entry of the documentation card grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DocumentationCard {
    pub title: String,
    pub link: String,
    /// Icon name. Artwork is up to the UI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub description: String,
}

impl From<&CardConfig> for DocumentationCard {
    fn from(card: &CardConfig) -> Self {
        Self {
            title: card.title.clone(),
            link: card.link.clone(),
            icon: card.icon.clone(),
            description: card.description.clone(),
        }
    }
}

/// Resolved footer link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FooterLink {
    /// Route inside the site.
    Internal { label: String, to: String },
    /// External URL.
    External { label: String, href: String },
}

impl FooterLink {
    /// Build from configuration. `None` unless exactly one of `to` and `href` is set.
    #[must_use]
    pub fn from_config(link: &FooterLinkConfig) -> Option<Self> {
        match (&link.to, &link.href) {
            (Some(to), None) => Some(Self::Internal {
                label: link.label.clone(),
                to: to.clone(),
            }),
            (None, Some(href)) => Some(Self::External {
                label: link.label.clone(),
                href: href.clone(),
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Internal { label, .. } | Self::External { label, .. } => label,
        }
    }

    /// Link target.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Internal { to, .. } => to,
            Self::External { href, .. } => href,
        }
    }
}

/// Titled column of footer links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FooterColumn {
    pub title: String,
    pub items: Vec<FooterLink>,
}

/// Resolved site footer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Footer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    pub columns: Vec<FooterColumn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}
