use super::depth::DepthGroup;
use ahash::{AHashMap, AHashSet};
use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Split a file name into stem and extension on the last `.`.
///
/// Follows [`Path::file_stem`]: a leading dot does not start an extension,
/// so `.bashrc` has none.
pub fn split_name(name: &OsStr) -> (OsString, Option<OsString>) {
    let path = Path::new(name);
    let stem = path
        .file_stem()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| name.to_os_string());
    let extension = path.extension().map(OsStr::to_os_string);
    (stem, extension)
}

/// `<stem><k>.<ext>`, or `<stem><k>` when there is no extension.
pub fn suffixed_name(name: &OsStr, k: usize) -> OsString {
    let (mut stem, extension) = split_name(name);
    stem.push(k.to_string());
    if let Some(extension) = extension {
        stem.push(".");
        stem.push(extension);
    }
    stem
}

/// Occurrence counts and assigned names for one output directory.
///
/// The first occurrence of a name keeps it; the k-th becomes
/// `suffixed_name(name, k)`. Literal names of the group and names blocked by
/// subdirectories are never handed out as suffixed names, so a real `a2.txt`
/// next to two `a.txt` pushes the second `a.txt` on to `a3.txt`.
#[derive(Debug, Default)]
pub struct NameCounter {
    counts: AHashMap<OsString, usize>,
    literals: AHashSet<OsString>,
    blocked: AHashSet<OsString>,
    taken: AHashSet<OsString>,
}

impl NameCounter {
    pub fn new<L, B>(literals: L, blocked: B) -> Self
    where
        L: IntoIterator<Item = OsString>,
        B: IntoIterator<Item = OsString>,
    {
        Self {
            counts: AHashMap::new(),
            literals: literals.into_iter().collect(),
            blocked: blocked.into_iter().collect(),
            taken: AHashSet::new(),
        }
    }

    /// Occurrences of `name` seen so far.
    #[cfg(test)]
    fn count(&self, name: &OsStr) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }

    pub fn assign(&mut self, name: &OsStr) -> OsString {
        let count = self.counts.entry(name.to_os_string()).or_insert(0);
        *count += 1;
        let occurrence = *count;

        if occurrence == 1 && !self.blocked.contains(name) && !self.taken.contains(name) {
            self.taken.insert(name.to_os_string());
            return name.to_os_string();
        }

        let mut k = occurrence.max(2);
        loop {
            let candidate = suffixed_name(name, k);
            if !self.literals.contains(&candidate)
                && !self.blocked.contains(&candidate)
                && !self.taken.contains(&candidate)
            {
                self.taken.insert(candidate.clone());
                return candidate;
            }
            k += 1;
        }
    }
}

/// Final file names for every member of `group`, in member order.
///
/// `blocked` holds names that already exist as directories inside the
/// group's output directory.
pub fn resolve_group(group: &DepthGroup, blocked: &AHashSet<OsString>) -> Vec<OsString> {
    let names: Vec<OsString> = group
        .members
        .iter()
        .map(|m| {
            m.relative_path
                .file_name()
                .map(OsStr::to_os_string)
                .unwrap_or_default()
        })
        .collect();

    let mut counter = NameCounter::new(names.iter().cloned(), blocked.iter().cloned());
    names.iter().map(|name| counter.assign(name)).collect()
}
