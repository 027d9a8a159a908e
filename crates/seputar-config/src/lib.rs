//! Site configuration for Seputar.
//!
//! Parses `seputar.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! Unknown keys are ignored so that a configuration written for a newer
//! version still loads.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `url`
//! - `base_url`

mod expand;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override broken reference handling.
    pub on_broken_links: Option<OnBrokenLinks>,
    /// Override the deployed site URL.
    pub url: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "seputar.toml";

/// How unresolved sidebar references are handled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnBrokenLinks {
    /// Fail the build (strict mode).
    #[default]
    Throw,
    /// Log a warning per reference and continue (permissive mode).
    Warn,
}

/// Site configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site title.
    pub title: String,
    /// Short site description.
    pub tagline: Option<String>,
    /// Production URL of the deployed site.
    pub url: Option<String>,
    /// Pathname under which the site is served.
    pub base_url: String,
    /// Broken sidebar reference handling.
    pub on_broken_links: OnBrokenLinks,
    /// Locale configuration.
    pub i18n: I18nConfig,
    /// Documentation topics (paths are relative strings from TOML).
    topics: Vec<TopicConfigRaw>,
    /// Navbar configuration.
    pub navbar: NavbarConfig,
    /// Footer configuration.
    pub footer: FooterConfig,
    /// Documentation cards shown on the landing page.
    pub cards: Vec<CardConfig>,

    /// Resolved topics (set after loading).
    #[serde(skip)]
    pub topics_resolved: Vec<TopicConfig>,
    /// Directory containing the config file (or the working directory).
    #[serde(skip)]
    pub site_dir: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Locale configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Locale served without a URL prefix.
    pub default_locale: String,
    /// Every supported locale, including the default one.
    pub locales: Vec<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "en".to_owned(),
            locales: vec!["en".to_owned()],
        }
    }
}

/// Raw topic configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize)]
struct TopicConfigRaw {
    id: String,
    path: Option<String>,
    route_base_path: Option<String>,
    sidebar_path: Option<String>,
}

/// Resolved topic configuration with absolute paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicConfig {
    /// Unique topic identifier.
    pub id: String,
    /// URL prefix as written in the config (normalized by the registry).
    pub route_base_path: String,
    /// Directory holding the topic's documents.
    pub content_dir: PathBuf,
    /// Sidebar definition file. `None` means the sidebar is autogenerated.
    pub sidebar_path: Option<PathBuf>,
}

/// Navbar configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NavbarConfig {
    /// Title shown next to the logo.
    pub title: Option<String>,
    /// Ordered navbar items.
    pub items: Vec<NavbarItemConfig>,
}

/// Navbar item linking to a topic sidebar.
#[derive(Clone, Debug, Deserialize)]
pub struct NavbarItemConfig {
    /// Display label.
    pub label: String,
    /// Topic identifier.
    pub topic: String,
    /// Sidebar identifier within the topic's sidebar file.
    pub sidebar: String,
    /// Navbar side.
    #[serde(default)]
    pub position: NavbarPosition,
}

/// Navbar side an item is placed on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavbarPosition {
    #[default]
    Left,
    Right,
}

/// Footer configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FooterConfig {
    /// Footer style (e.g., "dark").
    pub style: Option<String>,
    /// Grouped link columns.
    pub links: Vec<FooterColumnConfig>,
    /// Copyright line.
    pub copyright: Option<String>,
}

/// A titled column of footer links.
#[derive(Clone, Debug, Deserialize)]
pub struct FooterColumnConfig {
    /// Column title.
    pub title: String,
    /// Ordered links.
    #[serde(default)]
    pub items: Vec<FooterLinkConfig>,
}

/// A footer link. Exactly one of `to` and `href` is expected.
#[derive(Clone, Debug, Deserialize)]
pub struct FooterLinkConfig {
    /// Display label.
    pub label: String,
    /// Internal route.
    pub to: Option<String>,
    /// External URL.
    pub href: Option<String>,
}

/// Documentation card on the landing page.
#[derive(Clone, Debug, Deserialize)]
pub struct CardConfig {
    /// Card title.
    pub title: String,
    /// Link target (internal route or external URL).
    pub link: String,
    /// Icon renderer key.
    #[serde(default)]
    pub icon: Option<String>,
    /// Card text.
    #[serde(default)]
    pub description: String,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "url").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `seputar.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values. The result is
    /// validated again once they are applied.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// a CLI setting is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Parse configuration from a TOML string, resolving paths against `site_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str, site_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        config.resolve_paths(site_dir);
        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(mode) = settings.on_broken_links {
            self.on_broken_links = mode;
        }
        if let Some(url) = &settings.url {
            self.url = Some(url.clone());
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            title: "Documentation".to_owned(),
            tagline: None,
            url: None,
            base_url: "/".to_owned(),
            on_broken_links: OnBrokenLinks::default(),
            i18n: I18nConfig::default(),
            topics: Vec::new(),
            navbar: NavbarConfig::default(),
            footer: FooterConfig::default(),
            cards: Vec::new(),
            topics_resolved: Vec::new(),
            site_dir: base.to_path_buf(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml_str(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Checks field shapes only. Cross references between topics, navbar
    /// items and links are checked when the site is built, so that every
    /// problem is reported at once.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.title, "title")?;
        self.validate_urls()?;
        self.validate_i18n()?;

        for (i, topic) in self.topics_resolved.iter().enumerate() {
            require_non_empty(&topic.id, &format!("topics[{i}].id"))?;
        }
        Ok(())
    }

    fn validate_urls(&self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.url {
            require_non_empty(url, "url")?;
            require_http_url(url, "url")?;
        }

        if !self.base_url.starts_with('/') || !self.base_url.ends_with('/') {
            return Err(ConfigError::Validation(
                "base_url must start and end with /".to_owned(),
            ));
        }

        Ok(())
    }

    fn validate_i18n(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.i18n.default_locale, "i18n.default_locale")?;
        if self.i18n.locales.is_empty() {
            return Err(ConfigError::Validation(
                "i18n.locales cannot be empty".to_owned(),
            ));
        }
        for locale in &self.i18n.locales {
            require_non_empty(locale, "i18n.locales")?;
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.url {
            self.url = Some(expand::expand_env(url, "url")?);
        }
        self.base_url = expand::expand_env(&self.base_url, "base_url")?;
        Ok(())
    }

    /// Resolve relative topic paths to absolute paths based on config directory.
    ///
    /// Topic content defaults to a directory named after the topic, and the
    /// route base path defaults to the topic identifier.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.site_dir = config_dir.to_path_buf();
        self.topics_resolved = self
            .topics
            .iter()
            .map(|raw| TopicConfig {
                id: raw.id.clone(),
                route_base_path: raw.route_base_path.clone().unwrap_or_else(|| raw.id.clone()),
                content_dir: config_dir.join(raw.path.as_deref().unwrap_or(&raw.id)),
                sidebar_path: raw.sidebar_path.as_deref().map(|p| config_dir.join(p)),
            })
            .collect();
    }
}
