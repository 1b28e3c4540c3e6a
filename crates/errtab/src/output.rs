use crate::family::Family;
use crate::ErrtabError;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Write `contents` to `<out_dir>/<family>.rs` and return that path.
///
/// The file is staged next to its destination and renamed into place, so an
/// existing table is either fully replaced or left untouched.
pub fn write_generated(
    out_dir: &Path,
    family: Family,
    contents: &str,
) -> Result<PathBuf, ErrtabError> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(family.output_file_name());

    let mut staged = NamedTempFile::new_in(out_dir)?;
    debug!("staging {} at {}", path.display(), staged.path().display());
    staged.write_all(contents.as_bytes())?;
    staged.as_file().sync_all()?;
    staged.persist(&path)?;

    Ok(path)
}
