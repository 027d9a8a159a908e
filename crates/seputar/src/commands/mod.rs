//! CLI command implementations.

mod check;
mod nav;
mod routes;

use std::path::PathBuf;

use clap::Args;
use seputar_config::{CliSettings, Config, OnBrokenLinks};
use seputar_site::{FsContent, Site};

pub(crate) use check::CheckArgs;
pub(crate) use nav::NavArgs;
pub(crate) use routes::RoutesArgs;

use crate::error::CliError;

/// Options shared by every command that builds the site.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover seputar.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail on unresolved references (overrides config).
    #[arg(long)]
    strict: bool,

    /// Only warn about unresolved references (overrides config).
    #[arg(long, conflicts_with = "strict")]
    permissive: bool,

    /// Production URL of the site (overrides config).
    #[arg(long, env = "SEPUTAR_URL")]
    url: Option<String>,
}

impl SiteArgs {
    fn cli_settings(&self) -> CliSettings {
        let on_broken_links = if self.strict {
            Some(OnBrokenLinks::Throw)
        } else if self.permissive {
            Some(OnBrokenLinks::Warn)
        } else {
            None
        };
        CliSettings {
            on_broken_links,
            url: self.url.clone(),
        }
    }

    /// Load the configuration and build the site from the filesystem.
    pub(crate) fn build(&self) -> Result<Site, CliError> {
        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        tracing::info!(
            config = ?config.config_path,
            topics = config.topics_resolved.len(),
            "Loaded configuration"
        );
        Ok(Site::build(&config, &FsContent)?)
    }
}
