//! Output Path Utilities
//!
//! Card file names come partly from data embedded in the scene (PlayHome
//! character names), so they are sanitized before touching the file system.
//! Output files are created exclusively so an existing card is never
//! overwritten.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{CardError, Result};

/// Upper bound on `name-N` suffixes tried before giving up
const MAX_COLLISION_SUFFIX: u32 = 100_000;

/// Characters Windows refuses in file names
const RESERVED: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Turn a character name into a single path component.
///
/// Separators become `_`, control and reserved characters are dropped, and
/// surrounding dots and spaces are trimmed, so the result can never climb
/// out of the output directory.
pub fn sanitize_filename(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| !c.is_control() && !RESERVED.contains(c))
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    kept.trim_matches(|c| c == '.' || c == ' ').to_string()
}

/// Candidate path for the `attempt`-th try: `stem.ext`, `stem-1.ext`, ...
fn candidate_path(dir: &Path, stem: &str, ext: &str, attempt: u32) -> PathBuf {
    if attempt == 0 {
        dir.join(format!("{stem}.{ext}"))
    } else {
        dir.join(format!("{stem}-{attempt}.{ext}"))
    }
}

/// Create a new file named after `stem` in `dir` without clobbering anything.
///
/// Tries `stem.ext`, then `stem-1.ext`, `stem-2.ext` and so on, using
/// exclusive create so a concurrent writer can't race us into an overwrite.
pub fn create_unique_file(dir: &Path, stem: &str, ext: &str) -> Result<(PathBuf, File)> {
    let clean = sanitize_filename(stem);
    if clean.is_empty() {
        warn!(stem, "Output file name is empty after sanitizing");
        return Err(CardError::InvalidData(format!("unusable output file name '{stem}'")));
    }

    for attempt in 0..MAX_COLLISION_SUFFIX {
        let path = candidate_path(dir, &clean, ext, attempt);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => {
                debug!(path = %path.display(), attempt, "Created output file");
                return Ok((path, file));
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(CardError::Io(e)),
        }
    }

    Err(CardError::InvalidData(format!(
        "no free file name for '{clean}' after {MAX_COLLISION_SUFFIX} attempts"
    )))
}
