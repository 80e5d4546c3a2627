use super::{FileRecord, ScanOptions, ScanReport};
use crate::error::Error;
use glob::Pattern;
use std::path::Path;
use tracing::{debug, error, warn};
use walkdir::{DirEntry, WalkDir};

/// Recursive walk of `root` collecting every regular file.
///
/// Unreadable entries are logged and counted in [`ScanReport::skipped`]
/// instead of failing the scan. Fails only when `root` is not a directory.
pub fn scan_tree(root: &Path, options: &ScanOptions) -> Result<ScanReport, Error> {
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }

    let ignore_patterns: Vec<Pattern> = options
        .ignore_patterns
        .iter()
        .filter_map(|glob| match Pattern::new(glob) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!("Invalid glob pattern '{}': {}", glob, e);
                None
            }
        })
        .collect();

    let mut report = ScanReport::default();

    let walker = WalkDir::new(root)
        .follow_links(options.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| keep_entry(entry, options.exclude.as_deref(), &ignore_patterns));

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                error!("Skipping unreadable entry {}: {}", path, err);
                report.skipped += 1;
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match FileRecord::new(root, entry.into_path()) {
            Some(record) => report.files.push(record),
            None => report.skipped += 1,
        }
    }

    report
        .files
        .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    debug!(
        "Scanned {}: {} files, {} skipped",
        root.display(),
        report.files.len(),
        report.skipped
    );

    Ok(report)
}

fn keep_entry(entry: &DirEntry, exclude: Option<&Path>, ignore_patterns: &[Pattern]) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    if exclude.is_some_and(|excluded| entry.path() == excluded) {
        return false;
    }
    !ignore_patterns
        .iter()
        .any(|pattern| pattern.matches_path(entry.path()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    fn relative_paths(report: &ScanReport) -> Vec<PathBuf> {
        report.files.iter().map(|f| f.relative_path.clone()).collect()
    }

    #[test]
    fn test_scan_missing_root() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("nope");
        let err = scan_tree(&missing, &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, Error::NotADirectory(p) if p == missing));
    }

    #[test]
    fn test_scan_root_is_a_file() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("file.txt");
        touch(&file);
        let err = scan_tree(&file, &ScanOptions::default()).unwrap_err();
        assert!(matches!(err, Error::NotADirectory(_)));
    }

    #[test]
    fn test_scan_yields_files_only_with_depths() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("a.txt"));
        touch(&root.join("sub/b.txt"));
        touch(&root.join("sub/deeper/c.txt"));
        fs::create_dir_all(root.join("empty/dir")).unwrap();

        let report = scan_tree(root, &ScanOptions::default()).unwrap();
        assert_eq!(
            relative_paths(&report),
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("sub/b.txt"),
                PathBuf::from("sub/deeper/c.txt"),
            ]
        );
        let depths: Vec<usize> = report.files.iter().map(|f| f.depth).collect();
        assert_eq!(depths, vec![0, 1, 2]);
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn test_scan_ignore_patterns_prune_directories() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("keep.txt"));
        touch(&root.join("drop.tmp"));
        touch(&root.join(".git/objects/abc"));

        let options = ScanOptions {
            ignore_patterns: vec!["**/.git".to_string(), "*.tmp".to_string(), "[".to_string()],
            ..ScanOptions::default()
        };
        let report = scan_tree(root, &options).unwrap();
        assert_eq!(relative_paths(&report), vec![PathBuf::from("keep.txt")]);
    }

    #[test]
    fn test_scan_excluded_subtree() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        touch(&root.join("a.txt"));
        touch(&root.join("out/a.txt"));

        let options = ScanOptions {
            exclude: Some(root.join("out")),
            ..ScanOptions::default()
        };
        let report = scan_tree(root, &options).unwrap();
        assert_eq!(relative_paths(&report), vec![PathBuf::from("a.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_does_not_follow_symlinks_by_default() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("root");
        touch(&root.join("real.txt"));
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("link.txt")).unwrap();

        let report = scan_tree(&root, &ScanOptions::default()).unwrap();
        assert_eq!(relative_paths(&report), vec![PathBuf::from("real.txt")]);

        let options = ScanOptions {
            follow_links: true,
            ..ScanOptions::default()
        };
        let report = scan_tree(&root, &options).unwrap();
        assert_eq!(report.files.len(), 2);
    }
}
