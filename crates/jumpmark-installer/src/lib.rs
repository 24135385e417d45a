mod backup;
mod block;
mod checksum;
mod config;
mod error;
mod fs_utils;
mod install;
mod layout;
mod privilege;
mod transport;
mod types;
mod uninstall;

pub use backup::{backup_file, backup_stamp, list_backups};
pub use block::{
    append_snippet, contains_marker, render_snippet, replace_marked_block, strip_marked_blocks,
    BLOCK_CLOSING, BLOCK_MARKER,
};
pub use checksum::{sha256_file, sha256_hex};
pub use config::{
    ConfigOverrides, InstallerConfig, DEFAULT_SCRIPT_URL, ENV_BIN_DIR, ENV_RC_FILE,
    ENV_SCRIPT_URL, ENV_SHA256,
};
pub use error::InstallerError;
pub use install::install_with_hooks;
pub use layout::{
    default_user_home, detect_shell_from_env, InstallLayout, StartupShell, DATA_DIR_NAME,
    SCRIPT_FILE_NAME,
};
pub use privilege::running_elevated;
pub use transport::{detect_transport, Transport};
pub use types::{
    InstallReport, InstallResult, Question, RunContext, ScriptAction, StartupAction,
    UninstallReport, UninstallResult,
};
pub use uninstall::{uninstall, uninstall_with_hooks};
