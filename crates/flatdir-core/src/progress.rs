/// Trait for reporting flatten progress.
///
/// CLI implements with indicatif, tests use [`SilentReporter`].
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn on_scan_start(&self) {}
    fn on_scan_complete(&self, _total_files: usize, _duration_secs: f64) {}
    fn on_plan_complete(&self, _groups: usize, _renamed: usize) {}
    fn on_copy_start(&self, _total_files: usize) {}
    fn on_copy_progress(&self, _files_copied: usize, _total_files: usize) {}
    fn on_copy_complete(&self, _files_copied: usize, _duration_secs: f64) {}
}

/// No-op progress reporter for silent operation.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
