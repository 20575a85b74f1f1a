//! Batched git-status collaborator.
//!
//! The uncommitted-changes check needs to know which of a destructive
//! command's targets have uncommitted changes. The naive approach — one
//! `git status` per file — does not scale past a handful of targets; this
//! module exposes a trait so the real, batched implementation can be
//! swapped for a test double with no process spawning at all, mirroring the
//! external-process collaborator shape the base crate uses for its
//! `gitleaks` scanner.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Reports which of a set of candidate paths have uncommitted changes.
pub trait GitStatus {
    /// Returns the subset of `paths` that `git status --porcelain` reports
    /// as modified, staged, or untracked. Paths not inside a git working
    /// copy (or if git itself is unavailable) are simply absent from the
    /// result — this is advisory, not authoritative.
    fn is_dirty(&self, paths: &[PathBuf]) -> HashSet<PathBuf>;
}

/// Spawns exactly one `git status --porcelain -- <paths>…` per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealGitStatus;

impl GitStatus for RealGitStatus {
    fn is_dirty(&self, paths: &[PathBuf]) -> HashSet<PathBuf> {
        if paths.is_empty() {
            return HashSet::new();
        }

        let output = Command::new("git")
            .arg("status")
            .arg("--porcelain")
            .arg("--")
            .args(paths)
            .output();

        let Ok(output) = output else {
            return HashSet::new();
        };
        if !output.status.success() {
            return HashSet::new();
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .filter_map(|line| {
                // Porcelain format: "XY <path>" (optionally "XY orig -> new").
                let path_part = line.get(3..)?;
                let path_part = path_part.split(" -> ").last().unwrap_or(path_part);
                Some(PathBuf::from(path_part.trim()))
            })
            .collect()
    }
}

/// Always reports every path as clean — used in tests that exercise
/// `CoreAst` without a real git repository, the reason this collaborator
/// is trait-abstracted in the first place.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGitStatus;

impl GitStatus for NullGitStatus {
    fn is_dirty(&self, _paths: &[PathBuf]) -> HashSet<PathBuf> {
        HashSet::new()
    }
}

/// A test double that reports a fixed, pre-seeded set of dirty paths
/// without spawning any process at all.
#[derive(Debug, Default, Clone)]
pub struct FixedGitStatus {
    pub dirty: HashSet<PathBuf>,
}

impl GitStatus for FixedGitStatus {
    fn is_dirty(&self, paths: &[PathBuf]) -> HashSet<PathBuf> {
        paths
            .iter()
            .filter(|p| self.dirty.contains(p.as_path()))
            .cloned()
            .collect()
    }
}

impl FixedGitStatus {
    pub fn with_dirty<I: IntoIterator<Item = P>, P: AsRef<Path>>(paths: I) -> Self {
        FixedGitStatus {
            dirty: paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
        }
    }
}
