//! Critical-path and sensitive-path classification.
//!
//! Both checks operate on normalized string forms rather than `std::path`
//! traversal — the inputs are shell-argument text, not necessarily paths
//! that exist on this machine, and Windows-style candidates must be
//! classifiable even when this process itself runs on Unix.

use crate::patterns::{CRITICAL_PATHS_UNIX, CRITICAL_PATHS_WINDOWS, SENSITIVE_PATH_PATTERNS};

/// Normalizes separators to `/`, lowercases, and strips a trailing slash
/// (but not a lone root `/`).
fn normalize(p: &str) -> String {
    let slashed = p.replace('\\', "/").to_ascii_lowercase();
    if slashed.len() > 1 {
        slashed.trim_end_matches('/').to_string()
    } else {
        slashed
    }
}

/// `true` iff `p` names a filesystem location whose deletion or
/// modification would damage the OS install or a project's VCS root:
/// empty, root, any Unix/Windows critical-path entry, or a path ending in
/// (or consisting of) `.git`.
pub fn is_critical_path(p: &str) -> bool {
    let n = normalize(p);
    if n.is_empty() || n == "/" {
        return true;
    }
    if CRITICAL_PATHS_UNIX.iter().any(|c| n == *c) {
        return true;
    }
    if CRITICAL_PATHS_WINDOWS.iter().any(|c| n == *c || n.contains(c)) {
        return true;
    }
    if n == ".git" || n.ends_with("/.git") {
        return true;
    }
    false
}

/// Expands a leading `~` to `$HOME` (falling back to the literal `~` if
/// `HOME` is unset, so the function remains pure with respect to a caller
/// that has no home directory configured).
fn expand_tilde(p: &str) -> String {
    if let Some(rest) = p.strip_prefix('~') {
        let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());
        format!("{home}{rest}")
    } else {
        p.to_string()
    }
}

/// `true` iff `p` (after `~` expansion) matches one of the per-user
/// sensitive-path patterns: `~/.ssh/*`, `~/.bashrc`, `~/.zshrc`,
/// `~/.profile`, `~/.gitconfig`.
pub fn is_sensitive_path(p: &str) -> bool {
    let expanded = expand_tilde(p).replace('\\', "/");
    let home = std::env::var("HOME").unwrap_or_else(|_| "~".to_string());

    for pattern in SENSITIVE_PATH_PATTERNS {
        let resolved = pattern.replacen('~', &home, 1);
        if let Some(dir) = resolved.strip_suffix('/') {
            if expanded == dir || expanded.starts_with(&resolved) {
                return true;
            }
        } else if expanded == resolved {
            return true;
        }
    }
    false
}
