use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::block::escape_double_quoted;

pub const SCRIPT_FILE_NAME: &str = "jumpmark.sh";
pub const DATA_DIR_NAME: &str = ".jumpmark";

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StartupShell {
    Bash,
    Zsh,
}

impl StartupShell {
    pub fn rc_file_name(self) -> &'static str {
        match self {
            Self::Bash => ".bashrc",
            Self::Zsh => ".zshrc",
        }
    }
}

/// On-disk locations touched by the installer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    home: PathBuf,
    bin_dir: PathBuf,
    startup_file: PathBuf,
}

impl InstallLayout {
    pub fn new(home: impl Into<PathBuf>, shell: StartupShell) -> Self {
        let home = home.into();
        Self {
            bin_dir: home.join(".local").join("bin"),
            startup_file: home.join(shell.rc_file_name()),
            home,
        }
    }

    pub fn with_bin_dir(mut self, bin_dir: impl Into<PathBuf>) -> Self {
        self.bin_dir = bin_dir.into();
        self
    }

    pub fn with_startup_file(mut self, startup_file: impl Into<PathBuf>) -> Self {
        self.startup_file = startup_file.into();
        self
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn startup_file(&self) -> &Path {
        &self.startup_file
    }

    pub fn script_path(&self) -> PathBuf {
        self.bin_dir.join(SCRIPT_FILE_NAME)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.home.join(DATA_DIR_NAME)
    }

    /// Path as it should be spelled inside a double-quoted word in the startup
    /// file. Paths under the home directory are written relative to `$HOME`.
    pub fn script_path_for_shell(&self) -> String {
        let script = self.script_path();
        match script.strip_prefix(&self.home) {
            Ok(rel) => format!("$HOME/{}", escape_double_quoted(&rel.display().to_string())),
            Err(_) => escape_double_quoted(&script.display().to_string()),
        }
    }

    pub fn ensure_bin_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.bin_dir)
            .with_context(|| format!("failed to create {}", self.bin_dir.display()))
    }
}

pub fn default_user_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set; cannot resolve install paths")?;
    if home.trim().is_empty() {
        anyhow::bail!("HOME is empty; cannot resolve install paths");
    }
    Ok(PathBuf::from(home))
}

pub fn detect_shell_from_env(shell_env: Option<&str>) -> StartupShell {
    let Some(shell_value) = shell_env else {
        return StartupShell::Bash;
    };
    let shell_token = Path::new(shell_value)
        .file_name()
        .and_then(|value| value.to_str())
        .unwrap_or(shell_value)
        .to_ascii_lowercase();
    match shell_token.as_str() {
        "zsh" => StartupShell::Zsh,
        _ => StartupShell::Bash,
    }
}
