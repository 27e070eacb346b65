//! Startup asset loading.
//!
//! # Invariants
//! - An unreadable required asset is a startup failure: callers propagate
//!   [`AssetError`] and abort before the loop starts. Nothing here
//!   retries.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Errors from asset loading.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("asset not readable: {path}")]
    Missing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Read a text asset in full. Absence (or any read failure) is reported
/// as [`AssetError::Missing`] carrying the path.
pub fn read_text(path: impl AsRef<Path>) -> Result<String, AssetError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| AssetError::Missing {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "asset loaded");
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_existing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "@vertex fn vs_main() {{}}").unwrap();
        let text = read_text(file.path()).unwrap();
        assert!(text.starts_with("@vertex"));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = read_text("does/not/exist.wgsl").unwrap_err();
        let AssetError::Missing { path, .. } = err;
        assert_eq!(path, PathBuf::from("does/not/exist.wgsl"));
    }
}
