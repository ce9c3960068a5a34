use crate::args;
use crate::error::*;

/// Validate the site configuration
#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub(crate) struct CheckArgs {
    #[command(flatten, next_help_heading = "CONFIG")]
    pub(crate) config: args::ConfigArgs,
}

impl CheckArgs {
    pub(crate) fn run(&self) -> Result<()> {
        let config = self.config.load_config()?;

        for missing in docconf_core::missing_dirs(&config) {
            log::warn!(
                "`{}` entry `{}` is not a directory",
                missing.field,
                missing.path
            );
        }
        // Surfaces broken exclude patterns the same way a build would.
        docconf_core::Source::from_config(&config)?;

        log::info!("Config for `{}` is valid", config.project());
        Ok(())
    }
}
