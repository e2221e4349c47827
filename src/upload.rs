// Upload of a local file or directory tree, with a live progress line.

use crate::error::{CliError, CliResult};
use crate::progress::{TerminalWidth, UploadProgress};
use crate::prompt::Operator;
use crate::size::estimate_size;
use crate::store::{AddContent, AddEntry, AddEvent, AddOptions, AddStream, AddedEntry, ContentStore};
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// What one upload produced.
#[derive(Debug)]
pub struct UploadReport {
    pub total_bytes: u64,
    pub uploaded_bytes: u64,
    pub added: Vec<AddedEntry>,
}

/// Upload `path` and report every stored object as it is confirmed.
///
/// Directories are sent in one `add_all` call, wrapped in a directory.
/// A single file is sent unwrapped so its own CID is the one reported.
/// Store errors abort the upload; nothing already stored is rolled back.
pub fn upload(
    store: &dyn ContentStore,
    operator: &mut dyn Operator,
    path: &Path,
    options: &AddOptions,
    width: &TerminalWidth,
) -> CliResult<UploadReport> {
    let meta = path
        .metadata()
        .map_err(|err| CliError::local_io(path, err))?;
    let total_bytes = estimate_size(path)?;
    let mut progress = UploadProgress::new(total_bytes, width.clone());
    progress.reset();
    log::info!(
        "uploading {} ({} bytes estimated)",
        path.display(),
        total_bytes
    );

    let is_dir = meta.is_dir();
    let stream = if is_dir {
        let entries = collect_entries(path)?;
        log::debug!("{} entries under {}", entries.len(), path.display());
        store.add_all(entries, options)?
    } else {
        let entry = AddEntry {
            path: file_name(path),
            content: AddContent::File(path.to_path_buf()),
        };
        let options = AddOptions {
            wrap_with_directory: false,
            ..options.clone()
        };
        store.add(entry, &options)?
    };

    let added = match drain(stream, operator, &mut progress, width, path, is_dir) {
        Ok(added) => added,
        Err(err) => {
            operator.finish_progress();
            log::warn!("upload of {} aborted: {}", path.display(), err);
            return Err(err);
        }
    };
    operator.finish_progress();
    operator.success(&progress.completion_message());

    Ok(UploadReport {
        total_bytes,
        uploaded_bytes: progress.uploaded_bytes(),
        added,
    })
}

fn drain(
    stream: AddStream<'_>,
    operator: &mut dyn Operator,
    progress: &mut UploadProgress,
    width: &TerminalWidth,
    root: &Path,
    is_dir: bool,
) -> CliResult<Vec<AddedEntry>> {
    let mut added = Vec::new();
    for event in stream {
        match event? {
            AddEvent::Progress(event) => {
                progress.on_progress(&event);
                width.refresh();
                operator.progress(&progress.render());
            }
            AddEvent::Added(entry) => {
                operator.info(&describe_added(root, &entry, is_dir));
                log::info!("added {:?} as {}", entry.path, entry.cid);
                added.push(entry);
            }
        }
    }
    Ok(added)
}

fn describe_added(root: &Path, entry: &AddedEntry, is_dir: bool) -> String {
    if !is_dir {
        format!("File {} added with CID {}", root.display(), entry.cid)
    } else if entry.path.trim().is_empty() {
        format!(
            "Root directory {} added with CID {}",
            root.display(),
            entry.cid
        )
    } else {
        format!("{}/{} added with CID {}", root.display(), entry.path, entry.cid)
    }
}

/// Depth-first listing of everything below `root`, hidden entries
/// included, parents before children. Paths are relative and `/`-joined.
/// Symlinks and special files are skipped.
pub fn collect_entries(root: &Path) -> CliResult<Vec<AddEntry>> {
    let mut entries = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(root).to_path_buf();
            CliError::local_io(path, io::Error::from(err))
        })?;
        let content = if entry.file_type().is_dir() {
            AddContent::Directory
        } else if entry.file_type().is_file() {
            AddContent::File(entry.path().to_path_buf())
        } else {
            continue;
        };
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| {
                CliError::local_io(
                    entry.path(),
                    io::Error::new(io::ErrorKind::InvalidInput, "entry outside upload root"),
                )
            })?;
        let path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        entries.push(AddEntry { path, content });
    }
    Ok(entries)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
