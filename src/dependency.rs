//! Per-package change records and the ecosystem-agnostic differ.

use std::collections::BTreeSet;
use std::fmt;

use crate::manifest::ManifestSnapshot;

/// How a package's recorded version moved between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Present only in the newer snapshot.
    Added,
    /// Present only in the older snapshot.
    Removed,
    /// Present in both with different version strings.
    Updated,
    /// Present in both with the same version string.
    Unchanged,
}

/// One package's before/after state within a single manifest file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    /// Package name as recorded in the manifest.
    pub package: String,
    /// Manifest path the package was read from.
    pub file: String,
    /// Version at the base revision.
    pub previous: Option<String>,
    /// Version at the target revision.
    pub current: Option<String>,
}

impl DependencyRecord {
    /// Derives the change kind from the two recorded versions.
    #[must_use]
    pub fn change(&self) -> ChangeKind {
        match (&self.previous, &self.current) {
            (_, None) => ChangeKind::Removed,
            (None, Some(_)) => ChangeKind::Added,
            (Some(previous), Some(current)) if previous != current => ChangeKind::Updated,
            _ => ChangeKind::Unchanged,
        }
    }
}

impl fmt::Display for DependencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (package, file) = (&self.package, &self.file);
        let previous = self.previous.as_deref().unwrap_or_default();
        let current = self.current.as_deref().unwrap_or_default();
        match self.change() {
            ChangeKind::Added => write!(f, "Added {package}: {current} ({file})"),
            ChangeKind::Removed => write!(f, "Removed {package}: {previous} ({file})"),
            ChangeKind::Updated => write!(f, "Updated {package}: {previous} -> {current} ({file})"),
            ChangeKind::Unchanged => write!(f, "Unchanged {package} ({file})"),
        }
    }
}

/// Diff two snapshots of the same manifest file.
///
/// Records come back sorted by package name, with unchanged packages
/// filtered out.
#[must_use]
pub fn diff(old: &ManifestSnapshot, new: &ManifestSnapshot, file: &str) -> Vec<DependencyRecord> {
    let names: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

    names
        .into_iter()
        .map(|name| DependencyRecord {
            package: name.clone(),
            file: file.to_string(),
            previous: old.get(name).cloned(),
            current: new.get(name).cloned(),
        })
        .filter(|record| record.change() != ChangeKind::Unchanged)
        .collect()
}
