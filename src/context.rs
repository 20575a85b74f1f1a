//! Shell-context snapshot lookup.
//!
//! The analyzer never shells out to produce `type <cmd>` output itself —
//! it only reads a snapshot file an external collaborator wrote, the same
//! "read an optional sidecar, degrade silently" shape the base crate uses
//! for its suppression file (`config::load_suppressions`).

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// What kind of shell entity a [`ShellContextEntry`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextKind {
    Alias,
    Function,
    Builtin,
    File,
}

/// One row of a shell-context snapshot: what `type <name>` reported for a
/// single command name.
#[derive(Debug, Clone, Deserialize)]
pub struct ShellContextEntry {
    pub name: String,
    pub kind: ContextKind,
    #[serde(default)]
    pub body: String,
    #[serde(default, rename = "referencedTokens")]
    pub referenced_tokens: HashSet<String>,
}

/// A loaded snapshot, keyed by command name for O(1) lookup during the
/// `CoreAst` walk.
#[derive(Debug, Clone, Default)]
pub struct ShellContext {
    entries: std::collections::HashMap<String, ShellContextEntry>,
}

impl ShellContext {
    /// Loads a snapshot from `path`. Any I/O or parse failure yields an
    /// empty context (a missing snapshot just skips the override check) —
    /// this function never fails the caller.
    pub fn load(path: &Path) -> ShellContext {
        let Ok(text) = std::fs::read_to_string(path) else {
            return ShellContext::default();
        };
        let Ok(entries) = serde_json::from_str::<Vec<ShellContextEntry>>(&text) else {
            if std::env::var("DEBUG").is_ok() {
                eprintln!("shellshield: failed to parse shell-context snapshot at {path:?}");
            }
            return ShellContext::default();
        };
        let map = entries.into_iter().map(|e| (e.name.clone(), e)).collect();
        ShellContext { entries: map }
    }

    pub fn get(&self, name: &str) -> Option<&ShellContextEntry> {
        self.entries.get(name)
    }

    /// `true` iff `name` is not already in `blocked`, resolves to an alias
    /// or function entry, and that entry's `referencedTokens` intersect
    /// `blocked` — i.e. a benign-looking name secretly runs a blocked
    /// program.
    pub fn overrides_blocked(&self, name: &str, blocked: &HashSet<String>) -> bool {
        if blocked.contains(name) {
            return false;
        }
        match self.get(name) {
            Some(entry)
                if matches!(entry.kind, ContextKind::Alias | ContextKind::Function) =>
            {
                entry.referenced_tokens.iter().any(|t| blocked.contains(t))
            }
            _ => false,
        }
    }
}
