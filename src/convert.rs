use std::{fs, io::Write, path::Path};

use anyhow::{Context as _, Result, anyhow};
use log::debug;

use crate::{atomic_write::write_atomic, config::Config, file_matching::match_set};

/// Counts for a single target.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Files in the match set.
    pub matched: usize,
    /// Files that contained tabs and were rewritten.
    pub modified: usize,
}

/// Replace every tab in `contents` with `spaces` spaces. Returns `None` if
/// there are no tabs. Only tabs change so line endings (including a missing
/// final newline) are preserved exactly. Fails if the result wouldn't fit in
/// memory.
pub fn expand_tabs(contents: &[u8], spaces: usize) -> Result<Option<Vec<u8>>> {
    let tab_count = memchr::memchr_iter(b'\t', contents).count();
    if tab_count == 0 {
        return Ok(None);
    }

    let expanded_len = tab_count
        .checked_mul(spaces)
        .and_then(|n| n.checked_add(contents.len() - tab_count))
        .ok_or_else(|| {
            anyhow!("Replacing {tab_count} tabs with {spaces} spaces each is too large")
        })?;

    let mut expanded = Vec::new();
    expanded
        .try_reserve_exact(expanded_len)
        .with_context(|| anyhow!("allocating {expanded_len} bytes"))?;

    let mut start = 0;
    for tab in memchr::memchr_iter(b'\t', contents) {
        expanded.extend_from_slice(&contents[start..tab]);
        expanded.resize(expanded.len() + spaces, b' ');
        start = tab + 1;
    }
    expanded.extend_from_slice(&contents[start..]);

    Ok(Some(expanded))
}

/// Convert tabs in a single file. Files without tabs are not written.
/// Returns whether the file was modified.
pub fn convert_file(path: &Path, spaces: usize) -> Result<bool> {
    let contents = fs::read(path).with_context(|| anyhow!("reading {}", path.display()))?;

    let expanded =
        expand_tabs(&contents, spaces).with_context(|| anyhow!("converting {}", path.display()))?;

    match expanded {
        Some(expanded) => {
            write_atomic(path, &expanded)
                .with_context(|| anyhow!("replacing {}", path.display()))?;
            Ok(true)
        }
        None => {
            debug!("No tabs in {}", path.display());
            Ok(false)
        }
    }
}

/// Convert every file in the match set of `target`, writing a
/// `Converting <path>` line to `out` before each one. The first error aborts
/// the remaining files; files already converted stay converted.
pub fn convert(target: &Path, config: &Config, out: &mut impl Write) -> Result<Summary> {
    let matches = match_set(target, &config.pattern);

    let mut summary = Summary {
        matched: matches.len(),
        modified: 0,
    };

    for path in &matches {
        writeln!(out, "Converting {}", path.display())?;
        if convert_file(path, config.spaces)? {
            summary.modified += 1;
        }
    }

    debug!(
        "{}: {} of {} matching files modified",
        target.display(),
        summary.modified,
        summary.matched
    );

    Ok(summary)
}
