//! # shellshield
//!
//! A pre-execution gate for shell commands. Given a candidate command line —
//! from a coding-agent tool hook, a shell `preexec` trap, or a bracketed-paste
//! event — [`analyzer::analyze`] decides whether to allow or block it,
//! returning a [`decision::Decision`] with a reason and a safer suggestion.
//! The guarantee is advisory: ShellShield is a defense-in-depth layer, not a
//! sandbox, and the caller makes the final call based on the exit code.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use shellshield::{analyzer, config::Config, git::NullGitStatus};
//!
//! let config = Config::default();
//! let decision = analyzer::analyze("rm -rf /", &config, None, &NullGitStatus);
//! assert!(decision.blocked);
//! println!("{}: {}", decision.reason, decision.suggestion);
//! ```
//!
//! ## Architecture
//!
//! The crate is organized bottom-up, leaves first:
//!
//! 1. **[`patterns`]** — compiled constants and shared regexes.
//! 2. **[`validators`]** — homograph detection, terminal-injection detection,
//!    trusted-domain matching, URL risk scoring.
//! 3. **[`paths`]** — critical-path and sensitive-path classification.
//! 4. **[`context`]** — optional shell alias/function snapshot lookup.
//! 5. **[`tokenizer`]** — converts a raw command string into a token stream.
//! 6. **[`rules`]** — the fixed, ordered rule list (`Homograph`,
//!    `TerminalInjection`, `RawThreat`, `Custom`, `CoreAst`).
//! 7. **[`analyzer`]** — the façade that runs the rules in order and returns
//!    the first blocking decision.
//!
//! Peripheral collaborators the analyzer consumes or produces, but which are
//! not themselves part of the core detection logic above:
//!
//! | Module | Purpose |
//! |---|---|
//! | [`config`] | `.shellshield.json` loading, search path, env overrides |
//! | [`decision`] | the `Decision` type returned by every rule |
//! | [`git`] | batched `git status --porcelain` collaborator |
//! | [`audit_log`] | append-only JSONL audit log writer |
//!
//! The clap CLI surface (`cli.rs`) lives alongside `main.rs` and is not part
//! of this library.

pub mod analyzer;
pub mod audit_log;
pub mod config;
pub mod context;
pub mod decision;
pub mod git;
pub mod paths;
pub mod patterns;
pub mod rules;
pub mod tokenizer;
pub mod validators;
