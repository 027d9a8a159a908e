//! `seputar check` command implementation.

use clap::Args;
use seputar_site::ValidationMode;

use super::SiteArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Treat warnings as errors.
    #[arg(long)]
    deny_warnings: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration can't be loaded, the site build
    /// fails or `--deny-warnings` is set and warnings were found.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let site = self.site.build()?;

        output.heading(site.title());
        for mount in site.routes().mounts() {
            if mount.locale().is_none() {
                output.info(&format!(
                    "  {} -> {} ({} sidebars)",
                    mount.topic().id,
                    mount.prefix(),
                    mount.sidebars().len()
                ));
            }
        }

        for warning in site.warnings() {
            output.warning(&format!("warning: {warning}"));
        }

        let warnings = site.warnings().len();
        if self.deny_warnings && warnings > 0 {
            return Err(CliError::Validation(format!(
                "{warnings} warning(s) found and --deny-warnings is set"
            )));
        }

        let mode = match site.mode() {
            ValidationMode::Strict => "strict",
            ValidationMode::Permissive => "permissive",
        };
        output.success(&format!(
            "Site OK: {} topic(s), {} route(s), {warnings} warning(s) [{mode}]",
            site.registry().len(),
            site.routes().mounts().len(),
        ));
        Ok(())
    }
}
