use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anstyle::{AnsiColor, Effects, Style};
use indicatif::{ProgressBar, ProgressStyle};
use jumpmark_installer::{
    InstallReport, ScriptAction, StartupAction, UninstallReport,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Status {
    Ok,
    Info,
    Warn,
    Error,
}

impl Status {
    fn glyph(self) -> &'static str {
        match self {
            Self::Ok => "✔",
            Self::Info => "ℹ",
            Self::Warn => "⚠",
            Self::Error => "✖",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    fn style(self) -> Style {
        let color = match self {
            Self::Ok => AnsiColor::BrightGreen,
            Self::Info => AnsiColor::BrightBlue,
            Self::Warn => AnsiColor::BrightYellow,
            Self::Error => AnsiColor::BrightRed,
        };
        Style::new().fg_color(Some(color.into())).effects(Effects::BOLD)
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct TerminalRenderer {
    style: OutputStyle,
}

pub(crate) struct TerminalSpinner {
    style: OutputStyle,
    label: String,
    progress_bar: Option<ProgressBar>,
    started_at: Instant,
}

impl TerminalRenderer {
    pub(crate) fn from_style(style: OutputStyle) -> Self {
        Self { style }
    }

    pub(crate) fn current() -> Self {
        Self::from_style(current_output_style())
    }

    pub(crate) fn style(self) -> OutputStyle {
        self.style
    }

    pub(crate) fn print_status(self, status: Status, message: &str) {
        println!("{}", render_status_line(self.style, status, message));
    }

    pub(crate) fn print_error(self, message: &str) {
        eprintln!("{}", render_status_line(self.style, Status::Error, message));
    }

    pub(crate) fn print_section(self, title: &str) {
        if self.style == OutputStyle::Rich {
            println!();
            println!("{}", colorize(section_style(), &format!("== {title} ==")));
        }
    }

    pub(crate) fn print_lines(self, lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
    }

    pub(crate) fn start_spinner(self, label: &str) -> TerminalSpinner {
        let progress_bar = if self.style == OutputStyle::Rich {
            let progress_bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan.bold} {msg} {elapsed}")
            {
                progress_bar.set_style(style.tick_chars(".oO@* "));
            }
            progress_bar.set_message(label.to_string());
            progress_bar.enable_steady_tick(Duration::from_millis(80));
            Some(progress_bar)
        } else {
            None
        };

        TerminalSpinner {
            style: self.style,
            label: label.to_string(),
            progress_bar,
            started_at: Instant::now(),
        }
    }
}

impl TerminalSpinner {
    pub(crate) fn finish_success(mut self) {
        let Some(progress_bar) = self.progress_bar.take() else {
            return;
        };
        progress_bar.finish_and_clear();
        println!(
            "{}",
            render_status_line(
                self.style,
                Status::Ok,
                &format!(
                    "{} complete in {}",
                    self.label,
                    format_elapsed(self.started_at.elapsed())
                )
            )
        );
    }

    pub(crate) fn finish_abandon(mut self) {
        if let Some(progress_bar) = self.progress_bar.take() {
            progress_bar.finish_and_clear();
        }
    }
}

pub(crate) fn current_output_style() -> OutputStyle {
    output_style_for(
        std::io::stdout().is_terminal(),
        std::env::var_os("NO_COLOR").is_some(),
    )
}

fn output_style_for(is_terminal: bool, no_color: bool) -> OutputStyle {
    if is_terminal && !no_color {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

pub(crate) fn render_status_line(style: OutputStyle, status: Status, message: &str) -> String {
    match style {
        OutputStyle::Plain => format!("[{}] {message}", status.label()),
        OutputStyle::Rich => format!("{} {message}", colorize(status.style(), status.glyph())),
    }
}

pub(crate) fn format_install_report_lines(
    report: &InstallReport,
    style: OutputStyle,
    backups: &[PathBuf],
) -> Vec<String> {
    let mut lines = Vec::new();
    let script = report.script_path.display();
    lines.push(match report.script_action {
        ScriptAction::Installed => {
            render_status_line(style, Status::Ok, &format!("installed {script}"))
        }
        ScriptAction::Replaced => render_status_line(
            style,
            Status::Ok,
            &format!("replaced {script} with the latest version"),
        ),
        ScriptAction::KeptExisting => {
            render_status_line(style, Status::Info, &format!("kept existing {script}"))
        }
    });
    lines.push(render_status_line(
        style,
        Status::Info,
        &format!("sha256 {}", report.script_sha256),
    ));
    if let Some(warning) = &report.chmod_warning {
        lines.push(render_status_line(
            style,
            Status::Warn,
            &format!("could not mark script executable: {warning}"),
        ));
    }

    let startup = report.startup_file.display();
    lines.push(match report.startup_action {
        StartupAction::Appended => render_status_line(
            style,
            Status::Ok,
            &format!("added jumpmark block to {startup}"),
        ),
        StartupAction::Updated => render_status_line(
            style,
            Status::Ok,
            &format!("updated jumpmark block in {startup}"),
        ),
        StartupAction::KeptExisting => render_status_line(
            style,
            Status::Info,
            &format!("kept existing jumpmark block in {startup}"),
        ),
    });

    for path in report.script_backup.iter().chain(&report.startup_backup) {
        lines.push(render_status_line(
            style,
            Status::Info,
            &format!("backup written: {}", path.display()),
        ));
    }
    if !backups.is_empty() {
        lines.push(render_status_line(
            style,
            Status::Info,
            &format!("{} backup file(s) on disk:", backups.len()),
        ));
        for path in backups {
            lines.push(format!("    {}", path.display()));
        }
    }

    lines.push(String::new());
    lines.push("Next steps:".to_string());
    lines.push(format!(
        "    restart your shell or run: source {}",
        shell_quote(&report.startup_file)
    ));
    lines.push("    then run: jumpmark --help".to_string());
    lines
}

pub(crate) fn format_uninstall_report_lines(
    report: &UninstallReport,
    style: OutputStyle,
) -> Vec<String> {
    let mut lines = Vec::new();
    let script = report.script_path.display();
    lines.push(if report.script_removed {
        render_status_line(style, Status::Ok, &format!("removed {script}"))
    } else {
        render_status_line(style, Status::Info, &format!("{script} was not installed"))
    });

    let startup = report.startup_file.display();
    lines.push(match (&report.startup_backup, report.block_removed) {
        (None, _) => render_status_line(
            style,
            Status::Info,
            &format!("{startup} does not exist; nothing to clean up"),
        ),
        (Some(_), true) => render_status_line(
            style,
            Status::Ok,
            &format!("removed jumpmark block from {startup}"),
        ),
        (Some(_), false) => render_status_line(
            style,
            Status::Info,
            &format!("no jumpmark block found in {startup}"),
        ),
    });
    if let Some(backup) = &report.startup_backup {
        lines.push(render_status_line(
            style,
            Status::Info,
            &format!("backup written: {}", backup.display()),
        ));
    }

    if let Some(data_dir) = &report.data_dir {
        lines.push(render_status_line(
            style,
            Status::Warn,
            &format!("left jumpmark data in {}", data_dir.display()),
        ));
        lines.push(format!(
            "    remove it manually with: rm -rf {}",
            shell_quote(data_dir)
        ));
    }
    lines
}

fn shell_quote(path: &Path) -> String {
    let value = path.display().to_string();
    if value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "/._-~".contains(c))
    {
        return value;
    }
    format!("'{}'", value.replace('\'', "'\"'\"'"))
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let millis = elapsed.subsec_millis();
    format!("{secs}.{millis:03}s")
}

fn section_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightBlue.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}
