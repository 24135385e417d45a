use std::process::ExitCode;

use anyhow::Result;
use jumpmark_installer::{
    detect_transport, install_with_hooks, list_backups, uninstall, InstallResult,
    InstallerConfig, RunContext, UninstallResult,
};

use crate::prompt::Prompter;
use crate::render::{
    format_install_report_lines, format_uninstall_report_lines, Status, TerminalRenderer,
};
use crate::{Cli, Commands};

pub(crate) fn run_cli(cli: Cli) -> Result<ExitCode> {
    let renderer = TerminalRenderer::current();
    let config = InstallerConfig::from_env(cli.overrides())?;
    let mut prompter = Prompter::new(renderer, cli.yes);

    match cli.command.unwrap_or(Commands::Install) {
        Commands::Install => run_install(&config, renderer, &mut prompter),
        Commands::Uninstall => run_uninstall(&config, renderer, &mut prompter),
    }
}

fn run_install(
    config: &InstallerConfig,
    renderer: TerminalRenderer,
    prompter: &mut Prompter,
) -> Result<ExitCode> {
    renderer.print_section("install");
    let transport = detect_transport()?;
    renderer.print_status(
        Status::Info,
        &format!("using {} to fetch {}", transport.program(), config.script_url),
    );

    let result = install_with_hooks(
        config,
        &RunContext::current(),
        |question| prompter.confirm(&question),
        |url, path| {
            let spinner = renderer.start_spinner("download");
            let result = transport.fetch(url, path);
            match &result {
                Ok(()) => spinner.finish_success(),
                Err(_) => spinner.finish_abandon(),
            }
            result
        },
    )?;

    match &result {
        InstallResult::Cancelled => {
            renderer.print_status(Status::Warn, "installation cancelled; nothing was changed");
        }
        InstallResult::Completed(report) => {
            let mut backups = list_backups(&report.script_path)?;
            backups.extend(list_backups(&report.startup_file)?);
            renderer.print_lines(&format_install_report_lines(
                report,
                renderer.style(),
                &backups,
            ));
        }
    }
    Ok(ExitCode::from(install_exit_code(&result)))
}

/// A declined install is a failure to the calling shell; a declined
/// uninstall is not.
pub(crate) fn install_exit_code(result: &InstallResult) -> u8 {
    match result {
        InstallResult::Completed(_) => 0,
        InstallResult::Cancelled => 1,
    }
}

fn run_uninstall(
    config: &InstallerConfig,
    renderer: TerminalRenderer,
    prompter: &mut Prompter,
) -> Result<ExitCode> {
    renderer.print_section("uninstall");
    let result = uninstall(config, |question| prompter.confirm(&question))?;

    match result {
        UninstallResult::Cancelled => {
            renderer.print_status(Status::Info, "uninstall cancelled; nothing was changed");
        }
        UninstallResult::Completed(report) => {
            renderer.print_lines(&format_uninstall_report_lines(&report, renderer.style()));
        }
    }
    Ok(ExitCode::SUCCESS)
}
