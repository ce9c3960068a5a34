use crate::args;
use crate::error::*;

/// Print site debug information
#[derive(Clone, Debug, PartialEq, Eq, clap::Subcommand)]
pub(crate) enum DebugCommands {
    /// Prints the validated config
    Config {
        #[command(flatten, next_help_heading = "CONFIG")]
        config: args::ConfigArgs,
    },

    /// Prints source files left after `exclude_patterns`
    Files {
        #[command(flatten, next_help_heading = "CONFIG")]
        config: args::ConfigArgs,
    },

    /// Prints supported `html_theme` values
    Themes,
}

impl DebugCommands {
    pub(crate) fn run(&self) -> Result<()> {
        match self {
            Self::Config { config } => {
                let config = config.load_config()?;
                print!("{config}");
            }
            Self::Files { config } => {
                let config = config.load_config()?;
                let source = docconf_core::Source::from_config(&config)?;
                for path in source.iter() {
                    println!("{}", path.rel_path);
                }
            }
            Self::Themes => {
                for theme in docconf_config::Theme::ALL {
                    println!("{theme}");
                }
            }
        }

        Ok(())
    }
}
