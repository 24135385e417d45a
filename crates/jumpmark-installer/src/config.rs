use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use crate::layout::{default_user_home, detect_shell_from_env, InstallLayout};

pub const DEFAULT_SCRIPT_URL: &str =
    "https://raw.githubusercontent.com/jumpmark/jumpmark/main/jumpmark.sh";

pub const ENV_SCRIPT_URL: &str = "JUMPMARK_SCRIPT_URL";
pub const ENV_BIN_DIR: &str = "JUMPMARK_BIN_DIR";
pub const ENV_RC_FILE: &str = "JUMPMARK_RC_FILE";
pub const ENV_SHA256: &str = "JUMPMARK_SHA256";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerConfig {
    pub script_url: String,
    pub layout: InstallLayout,
    pub expected_sha256: Option<String>,
}

/// Values that take precedence over the environment. The CLI fills these
/// from its flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub script_url: Option<String>,
    pub bin_dir: Option<PathBuf>,
    pub startup_file: Option<PathBuf>,
    pub expected_sha256: Option<String>,
}

impl InstallerConfig {
    pub fn new(layout: InstallLayout) -> Self {
        Self {
            script_url: DEFAULT_SCRIPT_URL.to_string(),
            layout,
            expected_sha256: None,
        }
    }

    pub fn from_env(overrides: ConfigOverrides) -> Result<Self> {
        let home = default_user_home()?;
        let shell = std::env::var("SHELL").ok();
        let cwd = std::env::current_dir().context("failed to resolve current directory")?;
        Self::resolve(home, &cwd, shell.as_deref(), overrides, |key| {
            std::env::var(key).ok()
        })
    }

    pub(crate) fn resolve<EnvLookup>(
        home: PathBuf,
        cwd: &Path,
        shell_env: Option<&str>,
        overrides: ConfigOverrides,
        env: EnvLookup,
    ) -> Result<Self>
    where
        EnvLookup: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        // Relative overrides are taken from the invoking directory; the snippet
        // is sourced from wherever the shell starts.
        let mut layout = InstallLayout::new(home, detect_shell_from_env(shell_env));
        if let Some(bin_dir) = overrides
            .bin_dir
            .or_else(|| non_empty(ENV_BIN_DIR).map(PathBuf::from))
        {
            layout = layout.with_bin_dir(cwd.join(bin_dir));
        }
        if let Some(startup_file) = overrides
            .startup_file
            .or_else(|| non_empty(ENV_RC_FILE).map(PathBuf::from))
        {
            layout = layout.with_startup_file(cwd.join(startup_file));
        }

        let script_url = overrides
            .script_url
            .or_else(|| non_empty(ENV_SCRIPT_URL))
            .unwrap_or_else(|| DEFAULT_SCRIPT_URL.to_string());
        if !script_url.starts_with("https://") && !script_url.starts_with("http://") {
            return Err(anyhow!(
                "invalid script url '{script_url}': expected an http(s) url"
            ));
        }

        let expected_sha256 = match overrides.expected_sha256.or_else(|| non_empty(ENV_SHA256)) {
            Some(value) => Some(normalize_sha256(&value)?),
            None => None,
        };

        Ok(Self {
            script_url,
            layout,
            expected_sha256,
        })
    }
}

fn normalize_sha256(value: &str) -> Result<String> {
    let normalized = value.trim().to_ascii_lowercase();
    if normalized.len() != 64 || !normalized.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(anyhow!(
            "invalid sha256 '{value}': expected 64 hexadecimal characters"
        ));
    }
    Ok(normalized)
}
