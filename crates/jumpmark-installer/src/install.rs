use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::backup::backup_file;
use crate::block::{append_snippet, contains_marker, render_snippet, replace_marked_block};
use crate::checksum::sha256_file;
use crate::config::InstallerConfig;
use crate::error::InstallerError;
use crate::transport::fetch_atomically;
use crate::{
    InstallReport, InstallResult, Question, RunContext, ScriptAction, StartupAction,
};

/// Install flow with every process-level effect supplied by the caller:
/// `confirm` answers prompts and `fetch` writes the body of a url to a path.
pub fn install_with_hooks<Confirm, Fetch>(
    config: &InstallerConfig,
    context: &RunContext,
    mut confirm: Confirm,
    mut fetch: Fetch,
) -> Result<InstallResult>
where
    Confirm: FnMut(Question) -> Result<bool>,
    Fetch: FnMut(&str, &Path) -> Result<()>,
{
    let layout = &config.layout;

    if context.elevated && !confirm(Question::ProceedAsRoot)? {
        log::debug!("install cancelled at root confirmation");
        return Ok(InstallResult::Cancelled);
    }

    // Read before touching the script so an unreadable startup file leaves
    // the install untouched.
    let startup_file = layout.startup_file().to_path_buf();
    let content = read_startup_file(&startup_file)?;

    layout.ensure_bin_dir()?;

    let script_path = layout.script_path();
    let mut script_backup = None;
    let script_action = if script_path.exists() {
        script_backup = backup_file(&script_path, &context.backup_stamp)?;
        if confirm(Question::OverwriteScript {
            path: script_path.clone(),
        })? {
            download_script(config, &mut fetch)?;
            ScriptAction::Replaced
        } else {
            ScriptAction::KeptExisting
        }
    } else {
        download_script(config, &mut fetch)?;
        ScriptAction::Installed
    };

    let chmod_warning = match mark_executable(&script_path) {
        Ok(()) => None,
        Err(err) => {
            log::warn!("could not mark {} executable: {err:#}", script_path.display());
            Some(format!("{err:#}"))
        }
    };
    let script_sha256 = sha256_file(&script_path)?;

    let snippet = render_snippet(layout);
    let (startup_action, startup_backup) = if contains_marker(&content) {
        if confirm(Question::UpdateStartupBlock {
            path: startup_file.clone(),
        })? {
            let backup = backup_file(&startup_file, &context.backup_stamp)?;
            write_startup_file(&startup_file, &replace_marked_block(&content, &snippet))?;
            (StartupAction::Updated, backup)
        } else {
            (StartupAction::KeptExisting, None)
        }
    } else {
        let backup = match backup_file(&startup_file, &context.backup_stamp) {
            Ok(backup) => backup,
            Err(err) => {
                log::warn!("startup file backup skipped: {err:#}");
                None
            }
        };
        write_startup_file(&startup_file, &append_snippet(&content, &snippet))?;
        (StartupAction::Appended, backup)
    };

    Ok(InstallResult::Completed(InstallReport {
        script_path,
        script_action,
        script_backup,
        script_sha256,
        chmod_warning,
        startup_file,
        startup_action,
        startup_backup,
    }))
}

fn download_script<Fetch>(config: &InstallerConfig, fetch: &mut Fetch) -> Result<()>
where
    Fetch: FnMut(&str, &Path) -> Result<()>,
{
    let script_path = config.layout.script_path();
    let url = config.script_url.as_str();
    fetch_atomically(url, &script_path, fetch, |staged| {
        let Some(expected) = config.expected_sha256.as_deref() else {
            return Ok(());
        };
        let actual = sha256_file(staged)?;
        if actual != expected {
            return Err(InstallerError::ChecksumMismatch {
                url: url.to_string(),
                expected: expected.to_string(),
                actual,
            }
            .into());
        }
        Ok(())
    })?;
    log::debug!("downloaded {url} to {}", script_path.display());
    Ok(())
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)
        .with_context(|| format!("failed to stat {}", path.display()))?
        .permissions();
    permissions.set_mode(permissions.mode() | 0o755);
    fs::set_permissions(path, permissions)
        .with_context(|| format!("failed to chmod {}", path.display()))
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}

pub(crate) fn read_startup_file(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    fs::read(path)
        .with_context(|| format!("failed to read startup file: {}", path.display()))
}

pub(crate) fn write_startup_file(path: &Path, content: &[u8]) -> Result<()> {
    fs::write(path, content)
        .with_context(|| format!("failed to write startup file: {}", path.display()))
}
