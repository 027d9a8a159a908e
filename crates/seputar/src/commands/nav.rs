//! `seputar nav` command implementation.

use clap::Args;
use seputar_site::nest;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the nav command.
#[derive(Args)]
pub(crate) struct NavArgs {
    /// Topic identifier.
    topic: String,

    /// Sidebar identifier (default: the topic's first sidebar).
    #[arg(short, long)]
    sidebar: Option<String>,

    /// Locale to route links under (default: the default locale).
    #[arg(short, long)]
    locale: Option<String>,

    /// Print nested items instead of flat descriptors.
    #[arg(long)]
    nested: bool,

    #[command(flatten)]
    site: SiteArgs,
}

impl NavArgs {
    /// Execute the nav command.
    ///
    /// # Errors
    ///
    /// Returns an error if the site build fails, the topic, locale or sidebar
    /// is unknown, or stdout can't be written.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let site = self.site.build()?;

        let locale = self
            .locale
            .as_deref()
            .filter(|code| *code != site.locales().default_locale());
        let mount = site.routes().get(&self.topic, locale).ok_or_else(|| {
            CliError::Validation(match locale {
                Some(code) => format!("topic '{}' is not mounted for locale '{code}'", self.topic),
                None => format!("unknown topic '{}'", self.topic),
            })
        })?;

        let sidebar = match &self.sidebar {
            Some(name) => name.as_str(),
            None => mount
                .sidebars()
                .iter()
                .next()
                .map(|(name, _)| name)
                .ok_or_else(|| {
                    CliError::Validation(format!("topic '{}' has no sidebar", self.topic))
                })?,
        };
        let entries = mount.navigation(sidebar).ok_or_else(|| {
            CliError::Validation(format!(
                "topic '{}' has no sidebar '{sidebar}'",
                self.topic
            ))
        })?;

        let json = if self.nested {
            serde_json::to_string_pretty(&nest(entries))?
        } else {
            serde_json::to_string_pretty(&entries.collect::<Vec<_>>())?
        };
        output.print(&json)?;
        Ok(())
    }
}
