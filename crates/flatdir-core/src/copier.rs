use crate::error::Error;
use crate::flatten::{FlattenPlan, PlannedCopy};
use crate::progress::ProgressReporter;
use filetime::{set_file_times, FileTime};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::debug;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopySummary {
    pub files_copied: usize,
    pub bytes_copied: u64,
}

/// Create `path` and any missing parents. Existing directories are fine.
pub fn ensure_dir(path: &Path) -> Result<(), Error> {
    fs::create_dir_all(path).map_err(|source| Error::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy contents and permissions, then carry over access and modification times.
pub fn copy_preserving_metadata(src: &Path, dst: &Path) -> io::Result<u64> {
    let bytes = fs::copy(src, dst)?;
    let metadata = fs::metadata(src)?;
    set_file_times(
        dst,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )?;
    Ok(bytes)
}

/// Copy every planned file under `output_root`.
///
/// The first failure stops the run and is returned; files copied before it
/// stay in place. With `workers > 1` copies run on a dedicated rayon pool,
/// which is safe because the plan's destinations are already distinct.
pub fn execute_plan(
    plan: &FlattenPlan,
    output_root: &Path,
    workers: usize,
    reporter: &dyn ProgressReporter,
) -> Result<CopySummary, Error> {
    let total = plan.len();
    let files_copied = AtomicUsize::new(0);
    let bytes_copied = AtomicU64::new(0);

    let copy_entry = |entry: &PlannedCopy| -> Result<(), Error> {
        let bytes = copy_one(entry, output_root)?;
        bytes_copied.fetch_add(bytes, Ordering::Relaxed);
        let done = files_copied.fetch_add(1, Ordering::Relaxed) + 1;
        reporter.on_copy_progress(done, total);
        Ok(())
    };

    if workers > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| Error::Io(io::Error::other(e)))?;
        pool.install(|| plan.entries.par_iter().try_for_each(copy_entry))?;
    } else {
        plan.entries.iter().try_for_each(copy_entry)?;
    }

    Ok(CopySummary {
        files_copied: files_copied.into_inner(),
        bytes_copied: bytes_copied.into_inner(),
    })
}

fn copy_one(entry: &PlannedCopy, output_root: &Path) -> Result<u64, Error> {
    let destination = output_root.join(&entry.destination.relative_output_path);
    if let Some(parent) = destination.parent() {
        ensure_dir(parent)?;
    }
    debug!(
        "Copying {} -> {}",
        entry.source.absolute_path.display(),
        destination.display()
    );
    copy_preserving_metadata(&entry.source.absolute_path, &destination).map_err(|source| {
        Error::Copy {
            source_path: entry.source.absolute_path.clone(),
            destination,
            source,
        }
    })
}
