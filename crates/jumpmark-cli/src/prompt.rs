use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use jumpmark_installer::Question;

use crate::render::{render_status_line, Status, TerminalRenderer};

/// Interactive `[y/N]` confirmation on stdin. End of input counts as "no".
pub(crate) struct Prompter {
    renderer: TerminalRenderer,
    assume_yes: bool,
}

impl Prompter {
    pub(crate) fn new(renderer: TerminalRenderer, assume_yes: bool) -> Self {
        Self {
            renderer,
            assume_yes,
        }
    }

    pub(crate) fn confirm(&mut self, question: &Question) -> Result<bool> {
        let text = question_text(question);
        if self.assume_yes {
            log::debug!("auto-confirmed: {text}");
            return Ok(true);
        }

        let mut stdout = io::stdout().lock();
        write!(
            stdout,
            "{} [y/N] ",
            render_status_line(self.renderer.style(), Status::Warn, &text)
        )
        .and_then(|()| stdout.flush())
        .context("failed to write prompt")?;

        let mut answer = String::new();
        io::stdin()
            .lock()
            .read_line(&mut answer)
            .context("failed to read answer from stdin")?;
        if answer.is_empty() {
            writeln!(stdout).context("failed to write prompt")?;
        }
        Ok(parse_answer(&answer))
    }
}

pub(crate) fn question_text(question: &Question) -> String {
    match question {
        Question::ProceedAsRoot => {
            "running as root installs jumpmark for the root user only; continue?".to_string()
        }
        Question::OverwriteScript { path } => format!(
            "{} already exists (a backup was made); download the latest version over it?",
            path.display()
        ),
        Question::UpdateStartupBlock { path } => format!(
            "{} already contains a jumpmark block; replace it with the current one?",
            path.display()
        ),
        Question::ConfirmUninstall {
            script,
            startup_file,
        } => format!(
            "remove {} and the jumpmark block from {}?",
            script.display(),
            startup_file.display()
        ),
    }
}

pub(crate) fn parse_answer(answer: &str) -> bool {
    matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    )
}
