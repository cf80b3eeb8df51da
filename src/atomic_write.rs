use std::{
    ffi::OsString,
    fs::{self, File, Permissions},
    io::Write as _,
    path::{Path, PathBuf},
    time::SystemTime,
};

use anyhow::{Context as _, Result, anyhow};

/// Path for a temporary file next to `path`, with a name that's unique on
/// this computer (among names created by this function). It must be in the
/// same directory so the final rename doesn't cross filesystems.
fn temp_path_for(path: &Path) -> Result<PathBuf> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("Path has no file name: {path:?}"))?;

    let mut temp_name = OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(format!(
        ".{}-{}.tmp",
        std::process::id(),
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ));
    Ok(path.with_file_name(temp_name))
}

fn write_and_rename(
    temp_path: &Path,
    path: &Path,
    contents: &[u8],
    permissions: Permissions,
) -> Result<()> {
    let mut file = File::create_new(temp_path)
        .with_context(|| anyhow!("creating temporary file {}", temp_path.display()))?;
    file.write_all(contents)?;
    file.sync_all()?;
    drop(file);

    fs::set_permissions(temp_path, permissions)?;
    fs::rename(temp_path, path)?;
    Ok(())
}

/// Replace the contents of the existing file at `path`. The new contents are
/// written to a temporary file which is then renamed over the original, so
/// `path` holds either the old or the new contents, never a mixture. The
/// original permissions are kept.
///
/// If `path` is a symlink the file it points to is replaced and the link is
/// left alone.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let path = if fs::symlink_metadata(path)?.file_type().is_symlink() {
        fs::canonicalize(path)?
    } else {
        path.to_owned()
    };

    let permissions = fs::metadata(&path)?.permissions();
    let temp_path = temp_path_for(&path)?;

    let result = write_and_rename(&temp_path, &path, contents, permissions);
    if result.is_err() {
        // Ignore errors; it may never have been created.
        let _ = fs::remove_file(&temp_path);
    }
    result
}
