#![warn(warnings)]

mod args;
mod check;
mod debug;
mod error;

use clap::Parser;

use crate::error::*;

fn main() {
    human_panic::setup_panic!();
    let result = run();
    proc_exit::exit(result);
}

fn run() -> proc_exit::ExitResult {
    let cli = Cli::parse();

    cli.color.write_global();
    let colored_stderr =
        anstream::AutoStream::choice(&std::io::stderr()) != anstream::ColorChoice::Never;
    args::init_logging(cli.logging.clone(), colored_stderr);

    cli.command
        .run()
        .map_err(|e| proc_exit::Code::FAILURE.with_message(format!("{e:#}")))?;

    Ok(())
}

/// Validate and inspect documentation site configuration
#[derive(Clone, Debug, clap::Parser)]
#[command(name = "docconf", version, styles = args::help_styles())]
struct Cli {
    #[command(flatten)]
    logging: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,

    #[command(flatten)]
    color: colorchoice_clap::Color,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, PartialEq, Eq, clap::Subcommand)]
enum Command {
    Check(check::CheckArgs),

    #[command(subcommand)]
    Debug(debug::DebugCommands),
}

impl Command {
    fn run(&self) -> Result<()> {
        match self {
            Self::Check(cmd) => cmd.run(),
            Self::Debug(cmd) => cmd.run(),
        }
    }
}

#[test]
fn verify_app() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
}
