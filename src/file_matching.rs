use std::path::{Path, PathBuf};

use glob::Pattern;
use log::warn;
use walkdir::{DirEntry, WalkDir};

/// Returns true if the base name of `entry` matches `pattern`. Bytes that
/// aren't UTF-8 are replaced with U+FFFD first, so they still match wildcards.
fn file_name_matches(entry: &DirEntry, pattern: &Pattern) -> bool {
    pattern.matches(&entry.file_name().to_string_lossy())
}

/// True for anything we'd list as a file: regular files, symlinks to files
/// and dangling symlinks. Symlinks to directories are not followed or matched.
fn is_file_like(entry: &DirEntry) -> bool {
    let ty = entry.file_type();
    if ty.is_dir() {
        return false;
    }
    !(ty.is_symlink() && entry.path().is_dir())
}

/// Get the files to convert for `target`. If it is a directory this is every
/// file below it whose name matches `pattern`, otherwise it is just `target`
/// itself (whether or not it exists).
///
/// Siblings are visited in file name order. Entries that can't be read
/// are skipped with a warning.
pub fn match_set(target: &Path, pattern: &Pattern) -> Vec<PathBuf> {
    if !target.is_dir() {
        return vec![target.to_owned()];
    }

    let mut matches = Vec::new();

    for entry in WalkDir::new(target)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping: {err}");
                continue;
            }
        };
        if is_file_like(&entry) && file_name_matches(&entry, pattern) {
            matches.push(entry.into_path());
        }
    }

    matches
}
