use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};

const BACKUP_INFIX: &str = ".backup.";

pub fn backup_stamp<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// Copies `path` next to itself as `<name>.backup.<stamp>`. Returns `None`
/// when there is nothing to back up.
pub fn backup_file(path: &Path, stamp: &str) -> Result<Option<PathBuf>> {
    if !path.is_file() {
        return Ok(None);
    }

    let backup_path = next_backup_path(path, stamp)?;
    fs::copy(path, &backup_path).with_context(|| {
        format!(
            "failed to back up {} to {}",
            path.display(),
            backup_path.display()
        )
    })?;
    log::debug!(
        "backed up {} to {}",
        path.display(),
        backup_path.display()
    );
    Ok(Some(backup_path))
}

/// Existing backups of `path`, oldest stamp first.
pub fn list_backups(path: &Path) -> Result<Vec<PathBuf>> {
    let Some(parent) = path.parent() else {
        return Ok(Vec::new());
    };
    if !parent.is_dir() {
        return Ok(Vec::new());
    }
    let prefix = format!("{}{BACKUP_INFIX}", file_name(path)?);

    let mut backups = Vec::new();
    for entry in fs::read_dir(parent)
        .with_context(|| format!("failed to read directory: {}", parent.display()))?
    {
        let entry = entry
            .with_context(|| format!("failed to read directory entry in {}", parent.display()))?;
        let name = entry.file_name();
        if name.to_string_lossy().starts_with(&prefix) {
            backups.push(entry.path());
        }
    }
    backups.sort();
    Ok(backups)
}

fn next_backup_path(path: &Path, stamp: &str) -> Result<PathBuf> {
    let base = format!("{}{BACKUP_INFIX}{stamp}", file_name(path)?);
    let candidate = path.with_file_name(&base);
    if !candidate.exists() {
        return Ok(candidate);
    }
    for counter in 1..1000_u32 {
        let candidate = path.with_file_name(format!("{base}-{counter}"));
        if !candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(anyhow!(
        "too many backups of {} share stamp {stamp}",
        path.display()
    ))
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("path has no file name: {}", path.display()))
}
