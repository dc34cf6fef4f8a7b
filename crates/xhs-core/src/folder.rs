use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

/// What happened to a single directory during a prune pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PruneOutcome {
    Removed,
    NotEmpty,
    Failed(io::ErrorKind),
}

#[derive(Debug, Default, Clone)]
pub struct PruneReport {
    /// Directories in the order they were visited (children before parents).
    pub visited: Vec<(PathBuf, PruneOutcome)>,
}

impl PruneReport {
    pub fn removed(&self) -> impl Iterator<Item = &Path> {
        self.visited
            .iter()
            .filter(|(_, outcome)| *outcome == PruneOutcome::Removed)
            .map(|(path, _)| path.as_path())
    }

    pub fn removed_count(&self) -> usize {
        self.removed().count()
    }
}

/// True for names such as `.git` or `__pycache__`.
fn is_excluded_name(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') || name.starts_with('_')
}

/// Whether `path` has an excluded component below `root`. Components of
/// `root` itself are not considered.
pub fn is_excluded(root: &Path, path: &Path) -> bool {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative.components().any(|c| match c {
        Component::Normal(name) => is_excluded_name(name),
        _ => false,
    })
}

fn is_empty_dir(path: &Path) -> io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}

fn prune_dir(path: &Path) -> PruneOutcome {
    match is_empty_dir(path) {
        Ok(false) => return PruneOutcome::NotEmpty,
        Ok(true) => {}
        Err(e) => return PruneOutcome::Failed(e.kind()),
    }
    match fs::remove_dir(path) {
        Ok(()) => PruneOutcome::Removed,
        Err(e) => PruneOutcome::Failed(e.kind()),
    }
}

/// Remove every empty directory below `root`, deepest first.
///
/// Directories starting with `.` or `_` are neither entered nor removed, and
/// `root` itself is always kept. Emptiness is checked when a directory is
/// visited, so a parent whose only children were just removed goes too.
/// Errors never stop the walk; they show up as [`PruneOutcome::Failed`].
pub fn prune_empty_directories(root: &Path) -> PruneReport {
    // Pre-order walk, reversed below: every directory comes after all of
    // its descendants.
    let mut dirs = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !e.file_type().is_dir() || !is_excluded(root, e.path()))
    {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => dirs.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => debug!(error = %e, "skipping unreadable entry during prune"),
        }
    }

    let mut report = PruneReport::default();
    for path in dirs.into_iter().rev() {
        let outcome = prune_dir(&path);
        debug!(path = %path.display(), outcome = ?outcome, "prune");
        report.visited.push((path, outcome));
    }
    report
}

/// Best-effort cleanup of empty directories left after downloads.
pub fn remove_empty_directories(root: &Path) {
    let report = prune_empty_directories(root);
    debug!(
        root = %root.display(),
        removed = report.removed_count(),
        "removed empty directories"
    );
}

/// Delete `path` if it exists, otherwise create it empty. Returns whether
/// the file exists afterwards.
pub fn toggle_file(path: &Path) -> io::Result<bool> {
    if path.exists() {
        fs::remove_file(path)?;
        Ok(false)
    } else {
        fs::File::create(path)?;
        Ok(true)
    }
}
