use crate::scanner::FileRecord;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Effective depth of every file in fully flat mode: no directory
/// components survive, everything lands in the output root.
pub const FLAT_DEPTH: usize = 0;

/// Upper bound on how many directory levels survive in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaxDepth {
    #[default]
    Flat,
    Bounded(usize),
}

impl From<Option<usize>> for MaxDepth {
    fn from(value: Option<usize>) -> Self {
        match value {
            None | Some(0) => MaxDepth::Flat,
            Some(n) => MaxDepth::Bounded(n),
        }
    }
}

impl MaxDepth {
    /// Number of trailing directory components a file at `depth` keeps.
    pub fn effective_depth(self, depth: usize) -> usize {
        match self {
            MaxDepth::Flat => FLAT_DEPTH,
            MaxDepth::Bounded(n) => depth.min(n),
        }
    }
}

/// Files sharing one output directory. Collisions are only ever resolved
/// inside a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthGroup {
    pub effective_depth: usize,
    /// Output directory relative to the output root; empty for the root itself.
    pub directory: PathBuf,
    /// Sorted by `relative_path`.
    pub members: Vec<FileRecord>,
}

/// Keep the last `keep` components of `dir`.
pub fn truncate_directory(dir: &Path, keep: usize) -> PathBuf {
    let components: Vec<_> = dir.components().collect();
    let skip = components.len().saturating_sub(keep);
    components[skip..].iter().collect()
}

/// Partition `files` by effective depth and truncated directory chain.
///
/// Every record ends up in exactly one group. Groups come back ordered by
/// directory; the directory alone identifies a group since it has exactly
/// `effective_depth` components.
pub fn group_by_depth(files: Vec<FileRecord>, max_depth: MaxDepth) -> Vec<DepthGroup> {
    let mut groups: BTreeMap<PathBuf, DepthGroup> = BTreeMap::new();

    for record in files {
        let effective_depth = max_depth.effective_depth(record.depth);
        let directory = truncate_directory(record.relative_dir(), effective_depth);
        groups
            .entry(directory.clone())
            .or_insert_with(|| DepthGroup {
                effective_depth,
                directory,
                members: Vec::new(),
            })
            .members
            .push(record);
    }

    groups
        .into_values()
        .map(|mut group| {
            group
                .members
                .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
            group
        })
        .collect()
}
