use chrono::Local;
use std::path::PathBuf;

use crate::backup::backup_stamp;
use crate::privilege::running_elevated;

/// A yes/no decision the flows need from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Question {
    ProceedAsRoot,
    OverwriteScript { path: PathBuf },
    UpdateStartupBlock { path: PathBuf },
    ConfirmUninstall { script: PathBuf, startup_file: PathBuf },
}

/// Process facts a flow run depends on, captured once so tests can pin them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub elevated: bool,
    pub backup_stamp: String,
}

impl RunContext {
    pub fn current() -> Self {
        Self {
            elevated: running_elevated(),
            backup_stamp: backup_stamp(&Local::now()),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScriptAction {
    Installed,
    Replaced,
    KeptExisting,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StartupAction {
    Appended,
    Updated,
    KeptExisting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub script_path: PathBuf,
    pub script_action: ScriptAction,
    pub script_backup: Option<PathBuf>,
    pub script_sha256: String,
    pub chmod_warning: Option<String>,
    pub startup_file: PathBuf,
    pub startup_action: StartupAction,
    pub startup_backup: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallResult {
    Completed(InstallReport),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UninstallReport {
    pub script_path: PathBuf,
    pub script_removed: bool,
    pub startup_file: PathBuf,
    pub startup_backup: Option<PathBuf>,
    pub block_removed: bool,
    /// Set when the companion script's data directory exists and was left in
    /// place.
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallResult {
    Completed(UninstallReport),
    Cancelled,
}
