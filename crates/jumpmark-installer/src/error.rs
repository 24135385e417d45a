use thiserror::Error;

/// Failures the CLI reports with a dedicated message. Everything else travels
/// as a plain `anyhow` context chain.
#[derive(Debug, Error)]
pub enum InstallerError {
    #[error("missing dependency: neither 'curl' nor 'wget' was found on PATH; install one of them and retry")]
    MissingDependency,
    #[error("download failed ({transport}): {url}: {detail}")]
    DownloadFailure {
        transport: &'static str,
        url: String,
        detail: String,
    },
    #[error("checksum mismatch for {url}: expected sha256 {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },
}
