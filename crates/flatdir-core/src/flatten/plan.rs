use super::depth::{group_by_depth, MaxDepth};
use super::namer::resolve_group;
use crate::error::Error;
use crate::scanner::FileRecord;
use ahash::{AHashMap, AHashSet};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a file ends up, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Destination {
    pub relative_output_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct PlannedCopy {
    pub source: FileRecord,
    pub destination: Destination,
}

impl PlannedCopy {
    pub fn is_renamed(&self) -> bool {
        self.source.relative_path.file_name() != self.destination.relative_output_path.file_name()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FlattenPlan {
    pub entries: Vec<PlannedCopy>,
    pub groups: usize,
    pub renamed: usize,
}

impl FlattenPlan {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group, name and check: every destination in the result is distinct.
pub fn build_plan(files: Vec<FileRecord>, max_depth: MaxDepth) -> Result<FlattenPlan, Error> {
    let groups = group_by_depth(files, max_depth);
    let subdirs = subdirectory_names(groups.iter().map(|g| g.directory.as_path()));
    let no_subdirs = AHashSet::new();

    let mut plan = FlattenPlan {
        entries: Vec::new(),
        groups: groups.len(),
        renamed: 0,
    };
    let mut seen: AHashSet<PathBuf> = AHashSet::new();

    for group in groups {
        let blocked = subdirs.get(&group.directory).unwrap_or(&no_subdirs);
        let names = resolve_group(&group, blocked);

        for (source, name) in group.members.into_iter().zip(names) {
            let relative_output_path = group.directory.join(&name);
            if !seen.insert(relative_output_path.clone()) {
                return Err(Error::DuplicateDestination(relative_output_path));
            }
            let entry = PlannedCopy {
                source,
                destination: Destination {
                    relative_output_path,
                },
            };
            if entry.is_renamed() {
                debug!(
                    "{} renamed to {}",
                    entry.source.relative_path.display(),
                    entry.destination.relative_output_path.display()
                );
                plan.renamed += 1;
            }
            plan.entries.push(entry);
        }
    }

    Ok(plan)
}

/// For every directory the output will contain, the names of its immediate
/// subdirectories.
fn subdirectory_names<'a>(
    directories: impl Iterator<Item = &'a Path>,
) -> AHashMap<PathBuf, AHashSet<OsString>> {
    let mut children: AHashMap<PathBuf, AHashSet<OsString>> = AHashMap::new();
    for directory in directories {
        for ancestor in directory.ancestors() {
            let (Some(parent), Some(name)) = (ancestor.parent(), ancestor.file_name()) else {
                continue;
            };
            children
                .entry(parent.to_path_buf())
                .or_default()
                .insert(OsStr::to_os_string(name));
        }
    }
    children
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(paths: &[&str]) -> Vec<FileRecord> {
        paths
            .iter()
            .map(|p| FileRecord::new(Path::new("/in"), Path::new("/in").join(p)).unwrap())
            .collect()
    }

    fn destinations(plan: &FlattenPlan) -> Vec<PathBuf> {
        plan.entries
            .iter()
            .map(|e| e.destination.relative_output_path.clone())
            .collect()
    }

    #[test]
    fn test_flat_plan_example() {
        let plan = build_plan(records(&["a.txt", "sub/a.txt"]), MaxDepth::Flat).unwrap();
        assert_eq!(
            destinations(&plan),
            vec![PathBuf::from("a.txt"), PathBuf::from("a2.txt")]
        );
        assert_eq!(plan.groups, 1);
        assert_eq!(plan.renamed, 1);
    }

    #[test]
    fn test_bounded_plan_keeps_last_components() {
        let plan = build_plan(records(&["x/y/z/f.txt"]), MaxDepth::Bounded(2)).unwrap();
        assert_eq!(destinations(&plan), vec![PathBuf::from("y/z/f.txt")]);
        assert_eq!(plan.renamed, 0);
    }

    #[test]
    fn test_empty_plan() {
        let plan = build_plan(Vec::new(), MaxDepth::Flat).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.groups, 0);
    }

    #[test]
    fn test_file_does_not_shadow_directory() {
        // `y` is a file at the root, but truncation also needs a `y/` directory.
        let plan = build_plan(records(&["y", "x/y/z/f.txt"]), MaxDepth::Bounded(2)).unwrap();
        assert_eq!(
            destinations(&plan),
            vec![PathBuf::from("y2"), PathBuf::from("y/z/f.txt")]
        );
    }

    #[test]
    fn test_subdirectory_names() {
        let dirs = [PathBuf::from("a/b"), PathBuf::from("a/c"), PathBuf::new()];
        let children = subdirectory_names(dirs.iter().map(|d| d.as_path()));
        let root: AHashSet<OsString> = [OsString::from("a")].into_iter().collect();
        let under_a: AHashSet<OsString> =
            [OsString::from("b"), OsString::from("c")].into_iter().collect();
        assert_eq!(children.get(Path::new("")), Some(&root));
        assert_eq!(children.get(Path::new("a")), Some(&under_a));
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_plan_destinations_unique() {
        let plan = build_plan(
            records(&["a", "a2", "b/a", "c/a", "c/a2", "d/e/a", "d/e/a2"]),
            MaxDepth::Flat,
        )
        .unwrap();
        let unique: AHashSet<_> = destinations(&plan).into_iter().collect();
        assert_eq!(unique.len(), plan.len());
    }
}
