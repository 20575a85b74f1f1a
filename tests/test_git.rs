use shellshield::git::{FixedGitStatus, GitStatus, NullGitStatus, RealGitStatus};
use std::path::PathBuf;

#[test]
fn null_git_status_reports_nothing_dirty() {
    let git = NullGitStatus;
    let dirty = git.is_dirty(&[PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
    assert!(dirty.is_empty());
}

#[test]
fn fixed_git_status_reports_seeded_paths_only() {
    let git = FixedGitStatus::with_dirty(["a.txt"]);
    let dirty = git.is_dirty(&[PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
    assert_eq!(dirty.len(), 1);
    assert!(dirty.contains(&PathBuf::from("a.txt")));
}

#[test]
fn real_git_status_on_empty_paths_spawns_nothing() {
    let git = RealGitStatus;
    assert!(git.is_dirty(&[]).is_empty());
}
