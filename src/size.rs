// Local size estimation used as the denominator of the upload bar.

use crate::error::{CliError, CliResult};
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Sum the byte sizes of every regular file under `root`.
///
/// `root` may itself be a file. Symlinks and special files count as zero and
/// are not followed. The walk is iterative, so depth is bounded by open
/// directory handles rather than the call stack. Any unreadable entry fails
/// the whole estimate.
pub fn estimate_size(root: &Path) -> CliResult<u64> {
    let mut total: u64 = 0;
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|err| walk_error(root, err))?;
        if entry.file_type().is_file() {
            let meta = entry.metadata().map_err(|err| walk_error(root, err))?;
            total = total.saturating_add(meta.len());
        }
    }
    log::debug!("estimated {} bytes under {}", total, root.display());
    Ok(total)
}

fn walk_error(root: &Path, err: walkdir::Error) -> CliError {
    let path = err.path().unwrap_or(root).to_path_buf();
    CliError::local_io(path, io::Error::from(err))
}
