//! Distribution release detection
//!
//! Checks that only apply to one OS family look for a marker string in the
//! snapshot's release identifier file (e.g. etc/redhat-release).

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

use crate::error::Result;

/// Outcome of matching a release file against a marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseSupport {
    Supported,
    /// The release file does not exist or is not a regular file
    Missing,
    /// The file exists but the marker is absent; holds the first line read
    Unsupported(String),
}

/// Read `path` and look for `marker` as a substring
pub fn detect_release(path: &Path, marker: &str) -> Result<ReleaseSupport> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            debug!("Release path {} is not a regular file", path.display());
            return Ok(ReleaseSupport::Missing);
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Release file {} not found", path.display());
            return Ok(ReleaseSupport::Missing);
        }
        Err(e) => return Err(e.into()),
    }
    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    if content.contains(marker) {
        Ok(ReleaseSupport::Supported)
    } else {
        let first = content.lines().next().unwrap_or("").trim().to_string();
        debug!("Release '{}' does not match '{}'", first, marker);
        Ok(ReleaseSupport::Unsupported(first))
    }
}
