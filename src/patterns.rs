//! Compiled constants shared by the validators, path checks, and rules.
//!
//! Everything here is either a plain constant or a [`regex::Regex`] built
//! once behind a [`std::sync::LazyLock`] — the same idiom the rule tables in
//! [`crate::rules`] use for their own per-pattern statics.

use std::sync::LazyLock;

/// Hard ceiling on the size of a command `ShellShield` will analyze.
///
/// Anything longer is rejected before tokenization and before any regex is
/// run against it (regexes are gated on this bound too, so a 10 MB input
/// cannot be used to force worst-case matching time).
pub const MAX_INPUT_LENGTH: usize = 10_000;

/// Default `Config.threshold` — the maximum number of file targets a
/// destructive command may touch before `VOLUME THRESHOLD EXCEEDED` fires.
pub const DEFAULT_THRESHOLD: u32 = 50;

/// Default `Config.max_subshell_depth` — how many nested `shell -c` bodies
/// the analyzer will recurse into before giving up.
pub const DEFAULT_MAX_SUBSHELL_DEPTH: u32 = 5;

/// Conservative default for `Config.blocked`.
///
/// Chosen as the commonly-destructive command set and recorded in
/// `DESIGN.md` so the choice is visible and overridable via config.
pub const DEFAULT_BLOCKED_COMMANDS: &[&str] = &[
    "rm",
    "rmdir",
    "dd",
    "shred",
    "mkfs",
    "chmod",
    "chown",
    "chgrp",
    "mv",
    "cp",
    "kill",
    "killall",
    "pkill",
    "shutdown",
    "reboot",
    "poweroff",
    "systemctl",
    "fdisk",
    "parted",
];

/// Default `Config.trusted_domains` for the pipe-to-shell trusted-domain
/// invariant and the URL risk scorer.
pub const DEFAULT_TRUSTED_DOMAINS: &[&str] = &[
    "github.com",
    "githubusercontent.com",
    "raw.githubusercontent.com",
    "pypi.org",
    "npmjs.org",
    "registry.npmjs.org",
];

/// Unix critical system directories. Matched after separator normalization
/// and lowercasing — see [`crate::paths::is_critical_path`].
pub const CRITICAL_PATHS_UNIX: &[&str] = &[
    "/", "/bin", "/sbin", "/usr", "/etc", "/boot", "/lib", "/lib64", "/var", "/root", "/sys",
    "/proc", "/dev",
];

/// Windows critical paths, both slash-separated and concatenated forms, all
/// lowercase (matched against a lowercased, slash-normalized candidate).
pub const CRITICAL_PATHS_WINDOWS: &[&str] = &[
    "c:/windows",
    "c:windows",
    "system32",
    "program files",
    "users",
];

/// Per-user sensitive path globs (after `~` expansion to `$HOME`).
pub const SENSITIVE_PATH_PATTERNS: &[&str] = &[
    "~/.ssh/",
    "~/.bashrc",
    "~/.zshrc",
    "~/.profile",
    "~/.gitconfig",
];

/// Shell interpreters recognized for the subshell `-c` recursion and for
/// pipe-to-shell / process-substitution detection.
pub const SHELL_INTERPRETERS: &[&str] = &["bash", "sh", "zsh", "fish", "ksh", "dash"];

/// Non-shell interpreters used by the download-and-exec and
/// download-to-interpreter checks.
pub const NON_SHELL_INTERPRETERS: &[&str] =
    &["python", "python3", "perl", "ruby", "node", "bun", "php"];

/// Destructive subcommands for the `systemctl` special case in
/// [`crate::rules::core_ast`].
pub const SYSTEMCTL_DESTRUCTIVE_SUBCOMMANDS: &[&str] =
    &["stop", "disable", "mask", "reset-failed", "isolate", "kill"];

/// Additional always-destructive commands consulted by the `find -exec`
/// check, beyond whatever is in `Config.blocked`.
pub const FIND_EXEC_DESTRUCTIVE: &[&str] = &["rm", "shred", "dd", "mkfs"];

/// Prefix words that never count as the effective command themselves.
pub const COMMAND_PREFIXES: &[&str] = &["sudo", "xargs", "command", "env"];

/// Extracts a hostname from an `http(s)://` URL: strips optional userinfo
/// (`user:pass@`) and stops at the first `/`, `?`, `#`, `:`, or whitespace,
/// so a path or fragment cannot spoof a trusted host.
pub static RE_URL_HOST: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?i)^https?://(?:[^@/?#\s]+@)?([^/?#:\s]+)").unwrap());

/// Finds every `http(s)://` URL occurrence anywhere in a larger string
/// (used by validators/rules that need to scan a whole command line rather
/// than a single already-isolated URL argument).
pub static RE_URL_FIND: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?i)https?://(?:[^@/?#\s]+@)?[^/?#:\s]+\S*").unwrap());

/// Finds bare, scheme-less dotted-host candidates anywhere in a larger
/// string — `user@host.tld` (ssh, `git clone user@host:path`) and
/// `host.tld:/path` (scp) forms. Capture group 1 is the host itself, with
/// any userinfo prefix and trailing `:port`/`:path` excluded.
pub static RE_DOTTED_HOST_FIND: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"(?:[\w.+-]+@)?([\w-]+(?:\.[\w-]+)+)").unwrap());

/// Matches a shell variable assignment word: `NAME=value` with a valid
/// identifier on the left.
pub static RE_ASSIGNMENT: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*=").unwrap());
