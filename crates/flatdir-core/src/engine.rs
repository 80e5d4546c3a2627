use crate::config::AppConfig;
use crate::copier::{self, CopySummary};
use crate::error::Error;
use crate::flatten::{build_plan, FlattenPlan, MaxDepth};
use crate::progress::ProgressReporter;
use crate::scanner::{scan_tree, ScanOptions};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct FlattenEngine {
    config: AppConfig,
    max_depth: MaxDepth,
    dry_run: bool,
}

#[derive(Debug)]
pub struct FlattenResult {
    pub scan_duration: Duration,
    pub plan_duration: Duration,
    pub copy_duration: Duration,
    pub total_files_scanned: usize,
    pub skipped_entries: usize,
    pub groups: usize,
    pub renamed_files: usize,
    pub files_copied: usize,
    pub bytes_copied: u64,
    pub plan: FlattenPlan,
}

impl FlattenEngine {
    pub fn new(config: AppConfig) -> Self {
        let max_depth = MaxDepth::from(config.max_depth);
        Self {
            config,
            max_depth,
            dry_run: false,
        }
    }

    /// `None` or `Some(0)` flattens completely.
    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = MaxDepth::from(max_depth);
        self
    }

    /// Plan only; the output directory is neither created nor written.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run the full pipeline:
    /// 1. Scan the input tree
    /// 2. Group by effective depth and resolve names
    /// 3. Copy into the output root
    pub fn run(
        &self,
        input: &Path,
        output: &Path,
        reporter: &dyn ProgressReporter,
    ) -> Result<FlattenResult, Error> {
        if !input.is_dir() {
            return Err(Error::NotADirectory(input.to_path_buf()));
        }
        if !self.dry_run {
            copier::ensure_dir(output)?;
        }

        let input = fs::canonicalize(input)?;
        let options = ScanOptions {
            follow_links: self.config.follow_links,
            ignore_patterns: self.config.ignore_patterns.clone(),
            exclude: nested_output(&input, output)?,
        };

        // Phase 1: Scan
        info!("Scanning {}...", input.display());
        reporter.on_scan_start();
        let scan_start = Instant::now();
        let scan = scan_tree(&input, &options)?;
        let scan_duration = scan_start.elapsed();
        let total_files_scanned = scan.files.len();
        let skipped_entries = scan.skipped;
        reporter.on_scan_complete(total_files_scanned, scan_duration.as_secs_f64());
        debug!(
            "Scan completed in {:.2}s: {} files, {} skipped",
            scan_duration.as_secs_f64(),
            total_files_scanned,
            skipped_entries,
        );

        // Phase 2: Plan
        info!("Resolving destinations ({:?})...", self.max_depth);
        let plan_start = Instant::now();
        let plan = build_plan(scan.files, self.max_depth)?;
        let plan_duration = plan_start.elapsed();
        reporter.on_plan_complete(plan.groups, plan.renamed);
        debug!(
            "Plan completed in {:.2}s: {} groups, {} renamed",
            plan_duration.as_secs_f64(),
            plan.groups,
            plan.renamed,
        );

        // Phase 3: Copy
        let (summary, copy_duration) = if self.dry_run {
            (CopySummary::default(), Duration::ZERO)
        } else {
            info!("Copying {} files to {}...", plan.len(), output.display());
            reporter.on_copy_start(plan.len());
            let copy_start = Instant::now();
            let summary =
                copier::execute_plan(&plan, output, self.config.copy_workers, reporter)?;
            let copy_duration = copy_start.elapsed();
            reporter.on_copy_complete(summary.files_copied, copy_duration.as_secs_f64());
            (summary, copy_duration)
        };

        Ok(FlattenResult {
            scan_duration,
            plan_duration,
            copy_duration,
            total_files_scanned,
            skipped_entries,
            groups: plan.groups,
            renamed_files: plan.renamed,
            files_copied: summary.files_copied,
            bytes_copied: summary.bytes_copied,
            plan,
        })
    }
}

/// The output directory, canonicalized, when it lies inside `input`.
///
/// An output equal to or containing `input` is refused: truncated
/// destinations can land on the source files themselves.
fn nested_output(input: &Path, output: &Path) -> Result<Option<PathBuf>, Error> {
    let Ok(output) = fs::canonicalize(output) else {
        return Ok(None);
    };
    if input.starts_with(&output) {
        return Err(Error::SourceDestinationOverlap {
            input: input.to_path_buf(),
            output,
        });
    }
    Ok(output.starts_with(input).then_some(output))
}
