use anyhow::{Context, Result};

use crate::backup::backup_file;
use crate::block::{contains_marker, strip_marked_blocks};
use crate::config::InstallerConfig;
use crate::fs_utils::remove_file_if_exists;
use crate::install::{read_startup_file, write_startup_file};
use crate::{Question, RunContext, UninstallReport, UninstallResult};

pub fn uninstall<Confirm>(config: &InstallerConfig, confirm: Confirm) -> Result<UninstallResult>
where
    Confirm: FnMut(Question) -> Result<bool>,
{
    uninstall_with_hooks(config, &RunContext::current(), confirm)
}

pub fn uninstall_with_hooks<Confirm>(
    config: &InstallerConfig,
    context: &RunContext,
    mut confirm: Confirm,
) -> Result<UninstallResult>
where
    Confirm: FnMut(Question) -> Result<bool>,
{
    let layout = &config.layout;
    let script_path = layout.script_path();
    let startup_file = layout.startup_file().to_path_buf();

    if !confirm(Question::ConfirmUninstall {
        script: script_path.clone(),
        startup_file: startup_file.clone(),
    })? {
        log::debug!("uninstall cancelled");
        return Ok(UninstallResult::Cancelled);
    }

    // Read first so an unreadable startup file fails before anything is removed.
    let content = if startup_file.exists() {
        Some(read_startup_file(&startup_file)?)
    } else {
        None
    };

    let script_removed = remove_file_if_exists(&script_path)
        .with_context(|| format!("failed to remove {}", script_path.display()))?;

    let mut startup_backup = None;
    let mut block_removed = false;
    if let Some(content) = content {
        startup_backup = backup_file(&startup_file, &context.backup_stamp)?;
        block_removed = contains_marker(&content);
        let stripped = strip_marked_blocks(&content);
        if stripped != content {
            write_startup_file(&startup_file, &stripped)?;
        }
    }

    let data_dir = Some(layout.data_dir()).filter(|dir| dir.exists());

    Ok(UninstallResult::Completed(UninstallReport {
        script_path,
        script_removed,
        startup_file,
        startup_backup,
        block_removed,
        data_dir,
    }))
}
