//! `seputar routes` command implementation.

use clap::Args;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the routes command.
#[derive(Args)]
pub(crate) struct RoutesArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Print the route table as JSON.
    #[arg(long)]
    json: bool,
}

impl RoutesArgs {
    /// Execute the routes command.
    ///
    /// # Errors
    ///
    /// Returns an error if the site build fails or stdout can't be written.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let site = self.site.build()?;
        let mounts = site.routes().mounts();

        if self.json {
            let rows: Vec<_> = mounts
                .iter()
                .map(|m| {
                    serde_json::json!({
                        "prefix": m.prefix(),
                        "url": site.absolute_url(m.prefix()),
                        "topic": m.topic().id,
                        "locale": m.locale(),
                        "content_dir": m.topic().content_dir,
                    })
                })
                .collect();
            output.print(&serde_json::to_string_pretty(&rows)?)?;
            return Ok(());
        }

        let width = mounts.iter().map(|m| m.prefix().len()).max().unwrap_or(0);
        for mount in mounts {
            let locale = mount.locale().unwrap_or("-");
            output.print(&format!(
                "{:<width$}  {:<6}  {}",
                mount.prefix(),
                locale,
                mount.topic().id
            ))?;
        }
        for link in site.navbar() {
            let target = site.absolute_url(&link.to).unwrap_or_else(|| link.to.clone());
            output.info(&format!("navbar: {} -> {target}", link.label));
        }
        Ok(())
    }
}
