//! Append-only JSONL audit log.

use crate::config::Mode;
use crate::decision::Decision;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// What ultimately happened to a command after mode mapping, distinct from
/// `Decision.blocked` itself (a `blocked=true` decision under `permissive`
/// mode is logged as `warn`, not `blocked`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Allowed,
    Warn,
    Approved,
    Blocked,
}

/// Where the command came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Check,
    Paste,
    Stdin,
    Run,
}

#[derive(Debug, Serialize)]
struct AuditEntry<'a> {
    timestamp: String,
    command: &'a str,
    blocked: bool,
    decision: Outcome,
    mode: &'a str,
    source: Source,
    rule: &'a str,
    reason: &'a str,
    suggestion: &'a str,
    cwd: String,
}

fn mode_label(mode: Mode) -> &'static str {
    match mode {
        Mode::Enforce => "enforce",
        Mode::Permissive => "permissive",
        Mode::Interactive => "interactive",
    }
}

fn audit_log_path() -> PathBuf {
    if let Ok(path) = std::env::var("SHELLSHIELD_AUDIT_PATH") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".shellshield").join("audit.log")
}

/// Appends one JSON object line describing this analysis. Write failures
/// are swallowed — the gate must not fail open just because logging
/// failed — with a diagnostic to stderr gated on `DEBUG`.
pub fn record(command: &str, decision: &Decision, outcome: Outcome, mode: Mode, source: Source) {
    let path = audit_log_path();
    if let Err(err) = append_entry(&path, command, decision, outcome, mode, source) {
        if std::env::var("DEBUG").is_ok() {
            eprintln!("shellshield: failed to write audit log at {path:?}: {err}");
        }
    }
}

fn append_entry(
    path: &std::path::Path,
    command: &str,
    decision: &Decision,
    outcome: Outcome,
    mode: Mode,
    source: Source,
) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let entry = AuditEntry {
        timestamp: chrono::Utc::now().to_rfc3339(),
        command,
        blocked: decision.blocked,
        decision: outcome,
        mode: mode_label(mode),
        source,
        rule: &decision.rule,
        reason: &decision.reason,
        suggestion: &decision.suggestion,
        cwd: std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
    };

    let line = serde_json::to_string(&entry).map_err(std::io::Error::other)?;

    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;
    writeln!(file, "{line}")
}
