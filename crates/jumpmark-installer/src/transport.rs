use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::InstallerError;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Transport {
    Curl,
    Wget,
}

impl Transport {
    pub fn program(self) -> &'static str {
        match self {
            Self::Curl => "curl",
            Self::Wget => "wget",
        }
    }

    pub fn build_command(self, url: &str, out_path: &Path) -> Command {
        let mut command = Command::new(self.program());
        match self {
            Self::Curl => {
                command
                    .arg("-fsSL")
                    .arg("--retry")
                    .arg("2")
                    .arg("-o")
                    .arg(out_path)
                    .arg(url);
            }
            Self::Wget => {
                command.arg("-q").arg("-O").arg(out_path).arg(url);
            }
        }
        command
    }

    /// Writes the full response body of `url` to `out_path`.
    pub fn fetch(self, url: &str, out_path: &Path) -> Result<()> {
        let mut command = self.build_command(url, out_path);
        log::debug!("fetching {url} with {}", self.program());
        let output = command.output().map_err(|err| InstallerError::DownloadFailure {
            transport: self.program(),
            url: url.to_string(),
            detail: format!("command failed to start: {err}"),
        })?;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        Err(InstallerError::DownloadFailure {
            transport: self.program(),
            url: url.to_string(),
            detail: format!(
                "status={} stdout='{}' stderr='{}'",
                output.status,
                stdout.trim(),
                stderr.trim()
            ),
        }
        .into())
    }
}

pub fn detect_transport() -> Result<Transport> {
    detect_transport_with(|program| which::which(program).is_ok())
}

pub(crate) fn detect_transport_with<Probe>(mut available: Probe) -> Result<Transport>
where
    Probe: FnMut(&str) -> bool,
{
    for transport in [Transport::Curl, Transport::Wget] {
        if available(transport.program()) {
            return Ok(transport);
        }
    }
    Err(InstallerError::MissingDependency.into())
}

pub(crate) fn staging_path(dest: &Path) -> PathBuf {
    dest.with_file_name(format!(
        "{}.part",
        dest.file_name()
            .and_then(|v| v.to_str())
            .unwrap_or("download")
    ))
}

/// Fetches into a `.part` sibling, runs `verify` on it, then moves it over
/// `dest`. The staging file is removed on any failure so `dest` is either the
/// old content or the complete new one.
pub(crate) fn fetch_atomically<Fetch, Verify>(
    url: &str,
    dest: &Path,
    mut fetch: Fetch,
    verify: Verify,
) -> Result<()>
where
    Fetch: FnMut(&str, &Path) -> Result<()>,
    Verify: FnOnce(&Path) -> Result<()>,
{
    let part_path = staging_path(dest);
    let result = fetch(url, &part_path).and_then(|()| verify(&part_path));
    if let Err(err) = result {
        let _ = fs::remove_file(&part_path);
        return Err(err);
    }

    if let Err(err) = fs::rename(&part_path, dest) {
        let _ = fs::remove_file(&part_path);
        return Err(err).with_context(|| {
            format!(
                "failed to move downloaded script into place: {}",
                dest.display()
            )
        });
    }
    Ok(())
}
