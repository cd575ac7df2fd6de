//! Target list loading.
//!
//! Input files hold one URL per line. Blank lines and lines that are not an
//! absolute URL with a host are skipped before anything is scheduled.

use crate::error::{Result, ScanError};
use crate::model::ScanTarget;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Returns true if `raw` has a scheme and a non-empty host.
pub fn is_valid_url(raw: &str) -> bool {
    ScanTarget::parse(raw).is_ok()
}

/// Extracts the valid targets from newline-delimited text, in file order.
pub fn parse_targets(content: &str) -> Vec<ScanTarget> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            let valid = is_valid_url(line);
            if !valid {
                debug!(line, "skipping invalid URL");
            }
            valid
        })
        .map(|line| ScanTarget::unchecked(line))
        .collect()
}

/// Reads and validates a target file.
///
/// # Errors
///
/// Returns [`ScanError::InputFile`] if the file cannot be read and
/// [`ScanError::NoValidUrls`] if it contains no usable URL.
pub fn load_targets(path: &Path) -> Result<Vec<ScanTarget>> {
    let content = fs::read_to_string(path).map_err(|source| ScanError::InputFile {
        path: path.to_path_buf(),
        source,
    })?;

    let targets = parse_targets(&content);
    if targets.is_empty() {
        return Err(ScanError::NoValidUrls {
            path: path.to_path_buf(),
        });
    }

    debug!(path = %path.display(), count = targets.len(), "loaded targets");
    Ok(targets)
}
