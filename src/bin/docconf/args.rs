use std::io::Write;
use std::path;

use crate::error::*;

#[derive(Clone, Debug, PartialEq, Eq, clap::Args)]
pub(crate) struct ConfigArgs {
    /// Config file to use [default: nearest `_docconf.yml`]
    #[arg(short, long, value_name = "FILE")]
    config: Option<path::PathBuf>,
}

impl ConfigArgs {
    pub(crate) fn load_config(&self) -> Result<docconf_config::SiteConfig> {
        let config = if let Some(config_path) = self.config.as_deref() {
            docconf_config::SiteConfig::from_file(config_path)
                .with_context(|| format!("invalid config `{}`", config_path.display()))?
        } else {
            let cwd = std::env::current_dir().context("cannot read the current directory")?;
            docconf_config::SiteConfig::from_cwd(cwd).context("invalid config")?
        };
        log::debug!("Loaded config for `{}`", config.project());
        Ok(config)
    }
}

pub(crate) fn help_styles() -> clap::builder::Styles {
    use clap::builder::styling::AnsiColor;

    clap::builder::Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default())
}

pub(crate) fn init_logging(
    level: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,
    colored: bool,
) {
    if let Some(level) = level.log_level() {
        let palette = if colored {
            Palette::colored()
        } else {
            Palette::plain()
        };

        let mut builder = env_logger::Builder::new();
        builder.write_style(if colored {
            env_logger::WriteStyle::Always
        } else {
            env_logger::WriteStyle::Never
        });
        builder.filter(None, level.to_level_filter());

        if level == log::Level::Trace || level == log::Level::Debug {
            builder.format_timestamp_secs();
        } else {
            builder.format(move |f, record| match record.level() {
                log::Level::Error => writeln!(
                    f,
                    "{}error:{} {}",
                    palette.error.render(),
                    palette.error.render_reset(),
                    record.args()
                ),
                log::Level::Warn => writeln!(
                    f,
                    "{}warning:{} {}",
                    palette.warn.render(),
                    palette.warn.render_reset(),
                    record.args()
                ),
                _ => writeln!(f, "{}", record.args()),
            });
        }

        builder.init();
    }
}

#[derive(Copy, Clone, Default, Debug)]
struct Palette {
    error: anstyle::Style,
    warn: anstyle::Style,
}

impl Palette {
    fn colored() -> Self {
        Self {
            error: anstyle::AnsiColor::Red.on_default() | anstyle::Effects::BOLD,
            warn: anstyle::AnsiColor::Yellow.on_default() | anstyle::Effects::BOLD,
        }
    }

    fn plain() -> Self {
        Self::default()
    }
}
