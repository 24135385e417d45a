use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use jumpmark_installer::ConfigOverrides;

mod dispatch;
mod prompt;
mod render;

use dispatch::run_cli;
use render::TerminalRenderer;

#[derive(Parser, Debug)]
#[command(name = "jumpmark-install", version)]
#[command(
    about = "Install, update or remove the jumpmark shell integration",
    long_about = None
)]
struct Cli {
    /// Answer yes to every confirmation prompt
    #[arg(short, long, global = true)]
    yes: bool,
    /// Download the script from this url instead of the default
    #[arg(long, global = true, value_name = "URL")]
    url: Option<String>,
    /// Directory that receives jumpmark.sh
    #[arg(long, global = true, value_name = "DIR")]
    bin_dir: Option<PathBuf>,
    /// Shell startup file to edit
    #[arg(long, global = true, value_name = "FILE")]
    rc_file: Option<PathBuf>,
    /// Expected SHA-256 of the downloaded script
    #[arg(long, global = true, value_name = "HEX")]
    sha256: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Download jumpmark.sh and wire it into the shell startup file (default)
    Install,
    /// Remove jumpmark.sh and its block from the shell startup file
    #[command(alias = "remove")]
    Uninstall,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            script_url: self.url.clone(),
            bin_dir: self.bin_dir.clone(),
            startup_file: self.rc_file.clone(),
            expected_sha256: self.sha256.clone(),
        }
    }
}

fn main() -> ExitCode {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return report_parse_error(err),
    };

    match run_cli(cli) {
        Ok(code) => code,
        Err(err) => {
            TerminalRenderer::current().print_error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("JUMPMARK_LOG", "warn"))
        .format_timestamp(None)
        .init();
}

fn report_parse_error(err: clap::Error) -> ExitCode {
    let code = parse_error_exit_code(err.kind());
    let _ = err.print();
    if code != 0 {
        eprintln!();
        eprintln!("{}", Cli::command().render_help());
    }
    ExitCode::from(code)
}

fn parse_error_exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => 1,
    }
}
