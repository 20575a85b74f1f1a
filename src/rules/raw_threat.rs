//! `RawThreat` rule (phase `pre`).
//!
//! A fixed, ordered table of ReDoS-bounded regexes run against the raw
//! command string, the same `&'static LazyLock<Regex>` table-of-constants
//! idiom as the base crate's `scanners/bash_patterns.rs`. Every pattern uses
//! bounded repetition (`{0,N}`) so worst-case match time stays linear in the
//! (already length-capped) input.

use crate::decision::Decision;
use crate::patterns::MAX_INPUT_LENGTH;
use regex::Regex;
use std::sync::LazyLock;

pub const ID: &str = "RawThreat";

struct RawPattern {
    id: &'static str,
    regex: &'static LazyLock<Regex>,
    reason: &'static str,
    suggestion: &'static str,
}

static RE_POWERSHELL_ENCODED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)powershell(?:\.exe)?\b[^|;&]{0,200}-e(?:nc(?:odedcommand)?)?\b").unwrap()
});

static RE_EVAL_DOWNLOADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)eval\s+[\x60$][(\x60][^)\x60]{0,500}\b(?:curl|wget)\b").unwrap()
});

static RE_SUBST_DOWNLOADER_TO_INTERPRETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:python3?|perl|ruby|node|bun|php)\b[^|;&]{0,200}\$\([^)]{0,500}\b(?:curl|wget)\b[^)]{0,500}\)").unwrap()
});

static RE_BASE64_TO_SHELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)base64\s+-d(?:ecode)?\b[^|]{0,200}\|\s*(?:sudo\s+)?(?:sh|bash|zsh)\b").unwrap()
});

static RE_XXD_TO_SHELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)xxd\s+-r\s+-p\b[^|]{0,200}\|\s*(?:sudo\s+)?sh\b").unwrap());

static RE_DOWNLOAD_TO_NON_SHELL_INTERPRETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:curl|wget)\b[^|]{0,500}\|\s*(?:sudo\s+)?(?:python3?|perl|ruby|node|bun|php)\b").unwrap()
});

static RE_TOOL_TO_SHELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:sed|awk|openssl|tar)\b[^|]{0,500}\|\s*(?:sudo\s+)?(?:sh|bash|zsh)\b").unwrap()
});

static RE_PROCESS_SUBST_DOWNLOADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<\(\s*(?:curl|wget)\b").unwrap());

static PATTERNS: &[RawPattern] = &[
    RawPattern {
        id: "RT-01",
        regex: &RE_POWERSHELL_ENCODED,
        reason: "ENCODED POWERSHELL COMMAND DETECTED",
        suggestion: "avoid -EncodedCommand; pass the script in plain text so it can be reviewed",
    },
    RawPattern {
        id: "RT-02",
        regex: &RE_EVAL_DOWNLOADER,
        reason: "EVAL OF DOWNLOADED CONTENT DETECTED",
        suggestion: "download to a file, inspect it, then run it explicitly instead of eval",
    },
    RawPattern {
        id: "RT-03",
        regex: &RE_SUBST_DOWNLOADER_TO_INTERPRETER,
        reason: "DOWNLOAD-AND-EXEC DETECTED",
        suggestion: "download to a file, inspect it, then run it explicitly",
    },
    RawPattern {
        id: "RT-04",
        regex: &RE_BASE64_TO_SHELL,
        reason: "OBFUSCATED PAYLOAD DETECTED",
        suggestion: "decode to a file and inspect it before running",
    },
    RawPattern {
        id: "RT-05",
        regex: &RE_XXD_TO_SHELL,
        reason: "OBFUSCATED PAYLOAD DETECTED",
        suggestion: "decode to a file and inspect it before running",
    },
    RawPattern {
        id: "RT-06",
        regex: &RE_DOWNLOAD_TO_NON_SHELL_INTERPRETER,
        reason: "DOWNLOAD-AND-EXEC DETECTED",
        suggestion: "download to a file, inspect it, then run it explicitly",
    },
    RawPattern {
        id: "RT-07",
        regex: &RE_TOOL_TO_SHELL,
        reason: "PIPE-TO-SHELL DETECTED",
        suggestion: "write the output to a file and review it before executing",
    },
    RawPattern {
        id: "RT-08",
        regex: &RE_PROCESS_SUBST_DOWNLOADER,
        reason: "PROCESS SUBSTITUTION DETECTED",
        suggestion: "download to a file and inspect it before referencing it",
    },
];

/// Counts nested `shell -c` invocations heuristically (each occurrence of a
/// shell name immediately followed by `-c` in the raw text).
fn nested_subshell_count(raw: &str) -> usize {
    static RE_NESTED_C: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)\b(?:bash|sh|zsh|ksh|dash)\s+-c\b").unwrap());
    RE_NESTED_C.find_iter(raw).count()
}

/// One bounded, case-insensitive whole-word regex per `DEFAULT_BLOCKED_COMMANDS`
/// entry, compiled once rather than per `contains_destructive_verb` call.
static RE_DESTRUCTIVE_VERBS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    crate::patterns::DEFAULT_BLOCKED_COMMANDS
        .iter()
        .map(|cmd| Regex::new(&format!(r"(?i)\b{}\b", regex::escape(cmd))).unwrap())
        .collect()
});

fn contains_destructive_verb(raw: &str) -> bool {
    RE_DESTRUCTIVE_VERBS.iter().any(|re| re.is_match(raw))
}

/// Runs the fixed pattern table against `raw`, then the deep-subshell
/// heuristic. Over-length input is rejected here too, failing closed, even
/// though the tokenizer already enforces the same bound — `RawThreat` runs
/// before tokenization and must not rely on it.
pub fn check(raw: &str) -> Option<Decision> {
    if raw.chars().count() > MAX_INPUT_LENGTH {
        return Some(Decision::block(
            ID,
            "COMMAND TOO LONG",
            "shorten the command below the configured length limit",
        ));
    }

    for pattern in PATTERNS {
        if pattern.regex.is_match(raw) {
            return Some(Decision::block(ID, pattern.reason, pattern.suggestion));
        }
    }

    if nested_subshell_count(raw) >= 4 && contains_destructive_verb(raw) {
        return Some(Decision::block(
            ID,
            "DEEP SUBSHELL DETECTED",
            "flatten nested subshells into a single reviewable command",
        ));
    }

    None
}

/// Rule catalogue entries for `list-rules`/`explain`.
pub fn catalog() -> Vec<(&'static str, &'static str)> {
    PATTERNS.iter().map(|p| (p.id, p.reason)).collect()
}
