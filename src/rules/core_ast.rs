//! `CoreAst` rule (phase `post`) — every token-aware check.
//!
//! This is the largest rule: it walks the token stream as a sequence of
//! command segments separated by boundary operators, resolves each
//! segment's effective command name through the `VarMap`/environment, and
//! runs the blocklist, path-protection, pipe-to-shell, download-and-exec,
//! subshell-recursion, and sensitive-path checks against it.

use crate::config::Config;
use crate::context::ShellContext;
use crate::decision::Decision;
use crate::git::GitStatus;
use crate::patterns::{
    COMMAND_PREFIXES, FIND_EXEC_DESTRUCTIVE, NON_SHELL_INTERPRETERS, SHELL_INTERPRETERS,
    SYSTEMCTL_DESTRUCTIVE_SUBCOMMANDS,
};
use crate::paths::{is_critical_path, is_sensitive_path};
use crate::tokenizer::{OperatorKind, Token};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::LazyLock;

pub const ID: &str = "CoreAst";

type VarMap = HashMap<String, String>;

static RE_VAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]{0,200}))?\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .unwrap()
});

static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z][a-z0-9+.-]{0,20}://([^@/?#\s]+@)?[^/?#\s]+").unwrap());

/// Expands `$NAME`, `${NAME}`, and `${NAME:-default}` using `vars` first,
/// then the process environment; unresolved references are left as their
/// original literal text.
fn resolve_vars(word: &str, vars: &VarMap) -> String {
    RE_VAR
        .replace_all(word, |caps: &regex::Captures| {
            let (name, default) = if let Some(n) = caps.get(1) {
                (n.as_str(), caps.get(3).map(|m| m.as_str()))
            } else {
                (caps.get(4).map(|m| m.as_str()).unwrap_or(""), None)
            };
            if let Some(v) = vars.get(name) {
                v.clone()
            } else if let Ok(v) = std::env::var(name) {
                v
            } else if let Some(d) = default {
                d.to_string()
            } else {
                caps.get(0).unwrap().as_str().to_string()
            }
        })
        .to_string()
}

fn basename(s: &str) -> &str {
    s.rsplit(['/', '\\']).next().unwrap_or(s)
}

/// Resolves a word into the canonical lowercase command name `CoreAst`
/// matches against `Config.blocked`/`Config.allowed`/shell-context.
fn resolve_name(word: &str, vars: &VarMap) -> String {
    let expanded = resolve_vars(word, vars);
    let stripped = expanded.strip_prefix('\\').unwrap_or(&expanded);
    basename(stripped).to_ascii_lowercase()
}

fn is_assignment(word: &str) -> bool {
    crate::patterns::RE_ASSIGNMENT.is_match(word)
}

fn is_recursive_flag(words: &[String]) -> bool {
    words.iter().any(|w| {
        w == "-R" || w == "--recursive" || (w.starts_with('-') && !w.starts_with("--") && w.contains('R'))
    })
}

/// One command segment: the tokens between two boundary operators, already
/// split into leading words, redirection targets, and the operator that
/// connects it to the previous segment.
struct Segment {
    connector_before: Option<OperatorKind>,
    words: Vec<String>,
    redirection_targets: Vec<(OperatorKind, String)>,
}

fn segment_tokens(tokens: &[Token]) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut words = Vec::new();
    let mut redirection_targets = Vec::new();
    let mut connector_before = None;
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            Token::Word(w) => {
                words.push(w.clone());
                i += 1;
            }
            Token::Operator(op) if op.is_boundary() => {
                segments.push(Segment {
                    connector_before,
                    words: std::mem::take(&mut words),
                    redirection_targets: std::mem::take(&mut redirection_targets),
                });
                connector_before = Some(*op);
                i += 1;
            }
            Token::Operator(op) if op.is_redirection() => {
                if let Some(Token::Word(target)) = tokens.get(i + 1) {
                    redirection_targets.push((*op, target.clone()));
                    i += 2;
                } else {
                    i += 1;
                }
            }
            Token::Operator(_) => {
                // ProcessIn/ProcessOut: the following opaque word is handled
                // by the standalone process-substitution scan, not folded
                // into this segment's word list.
                i += 1;
            }
        }
    }
    segments.push(Segment {
        connector_before,
        words,
        redirection_targets,
    });

    segments
}

/// `<(` or `>(` immediately followed by `curl`/`wget` anywhere in the token
/// stream.
fn scan_process_substitution(tokens: &[Token]) -> bool {
    for window in tokens.windows(2) {
        if let (Token::Operator(OperatorKind::ProcessIn), Token::Word(body)) =
            (&window[0], &window[1])
        {
            let lower = body.to_ascii_lowercase();
            if lower.trim_start().starts_with("curl") || lower.trim_start().starts_with("wget") {
                return true;
            }
        }
    }
    false
}

fn contains_inline_process_substitution(words: &[String], vars: &VarMap) -> bool {
    words.iter().any(|w| {
        let resolved = resolve_vars(w, vars).to_ascii_lowercase();
        resolved.contains("<(curl") || resolved.contains("<(wget")
    })
}

fn find_first_url<'a>(words: &'a [String], vars: &VarMap) -> Option<(usize, String)> {
    for (idx, w) in words.iter().enumerate() {
        let resolved = resolve_vars(w, vars);
        if RE_URL.is_match(&resolved) {
            return Some((idx, resolved));
        }
    }
    None
}

fn url_has_userinfo(url: &str) -> bool {
    static RE_USERINFO: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)^[a-z][a-z0-9+.-]{0,20}://[^@/?#\s]+@").unwrap());
    RE_USERINFO.is_match(url)
}

fn is_insecure_transport(url: &str, flags: &[String]) -> bool {
    if url.to_ascii_lowercase().starts_with("http://") {
        return true;
    }
    flags.iter().any(|f| matches!(f.as_str(), "-k" | "--insecure" | "--no-check-certificate"))
}

/// Determines the filesystem target(s) a downloader will write to, for the
/// download-and-exec check. Returns normalized paths/basenames.
fn download_output_targets(resolved_cmd: &str, words: &[String], vars: &VarMap, url: &str) -> Vec<String> {
    let url_basename = basename(url.trim_end_matches('/')).to_string();
    let mut targets = Vec::new();

    let mut i = 0;
    while i < words.len() {
        let w = &words[i];
        match resolved_cmd {
            "curl" => {
                if let Some(path) = w.strip_prefix("--output=") {
                    targets.push(resolve_vars(path, vars));
                } else if w == "--output" {
                    if let Some(next) = words.get(i + 1) {
                        targets.push(resolve_vars(next, vars));
                    }
                } else if let Some(path) = w.strip_prefix("-o") {
                    if !path.is_empty() {
                        targets.push(resolve_vars(path, vars));
                    } else if let Some(next) = words.get(i + 1) {
                        targets.push(resolve_vars(next, vars));
                    }
                } else if w.starts_with('-') && !w.starts_with("--") && w.contains('O') {
                    targets.push(url_basename.clone());
                }
            }
            "wget" => {
                if let Some(path) = w.strip_prefix("--output-document=") {
                    targets.push(resolve_vars(path, vars));
                } else if w == "--output-document" || w == "-O" {
                    if let Some(next) = words.get(i + 1) {
                        targets.push(resolve_vars(next, vars));
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }

    if targets.is_empty() && resolved_cmd == "wget" {
        targets.push(url_basename);
    }

    targets
}

fn path_matches_target(candidate: &str, targets: &[String]) -> bool {
    let candidate_base = basename(candidate);
    targets.iter().any(|t| t == candidate || basename(t) == candidate_base)
}

/// A control operator — as opposed to a pipe — for the purposes of the
/// download-and-exec check.
fn is_control_operator(op: OperatorKind) -> bool {
    matches!(
        op,
        OperatorKind::AndAnd | OperatorKind::OrOr | OperatorKind::Semi | OperatorKind::Amp
    )
}

fn is_pipe_operator(op: OperatorKind) -> bool {
    matches!(op, OperatorKind::Pipe | OperatorKind::PipeAmp)
}

fn is_executor_name(name: &str) -> bool {
    SHELL_INTERPRETERS.contains(&name)
        || NON_SHELL_INTERPRETERS.contains(&name)
        || name == "."
        || name == "source"
        || name == "exec"
        || name == "chmod"
}

/// Everything a single `CoreAst::check` call needs, threaded through from
/// the analyzer so this rule stays a free function rather than a struct
/// with hidden state.
pub struct CoreAstInput<'a> {
    pub config: &'a Config,
    pub shell_context: Option<&'a ShellContext>,
    pub git: &'a dyn GitStatus,
    pub depth: u32,
}

pub fn check(tokens: &[Token], input: &CoreAstInput) -> Option<Decision> {
    if scan_process_substitution(tokens) {
        return Some(process_substitution_decision());
    }

    let segments = segment_tokens(tokens);
    let mut vars: VarMap = HashMap::new();

    for (idx, segment) in segments.iter().enumerate() {
        if let Some(decision) = check_segment(&segments, idx, segment, &mut vars, input) {
            return Some(decision);
        }
    }

    None
}

fn process_substitution_decision() -> Decision {
    Decision::block(
        ID,
        "PROCESS SUBSTITUTION DETECTED",
        "download to a file and inspect it before referencing it",
    )
}

fn check_segment(
    segments: &[Segment],
    idx: usize,
    segment: &Segment,
    vars: &mut VarMap,
    input: &CoreAstInput,
) -> Option<Decision> {
    let mut cursor = 0usize;
    let raw_words = &segment.words;

    // Leading assignments.
    while let Some(w) = raw_words.get(cursor) {
        if is_assignment(w) {
            let (name, value) = w.split_once('=').unwrap();
            vars.insert(name.to_string(), resolve_vars(value, vars));
            cursor += 1;
        } else {
            break;
        }
    }

    // Prefixes that don't count as the effective command. A prefix may carry
    // its own flags (`xargs -I{}`, `sudo -E`) that aren't the effective
    // command either, so skip flag-shaped words before re-testing for a
    // further prefix or landing on the command itself.
    while let Some(w) = raw_words.get(cursor) {
        let resolved = resolve_name(w, vars);
        if COMMAND_PREFIXES.contains(&resolved.as_str()) {
            cursor += 1;
            while let Some(flag) = raw_words.get(cursor) {
                if flag.starts_with('-') {
                    cursor += 1;
                } else {
                    break;
                }
            }
        } else {
            break;
        }
    }

    let Some(command_word) = raw_words.get(cursor) else {
        return None;
    };
    let args: &[String] = &raw_words[cursor + 1..];

    // git rm exemption.
    let resolved_literal = resolve_name(command_word, vars);
    if resolved_literal == "git" {
        if let Some(first_arg) = args.first() {
            if resolve_name(first_arg, vars) == "rm" {
                return None;
            }
        }
    }

    let resolved_cmd = resolved_literal;

    if input.config.allowed.contains(&resolved_cmd) {
        return None;
    }

    if let Some(ctx) = input.shell_context {
        if ctx.overrides_blocked(&resolved_cmd, &input.config.blocked) {
            return Some(Decision::block(
                ID,
                "SHELL CONTEXT OVERRIDE DETECTED",
                format!("inspect with `type {resolved_cmd}`; bypass with \\{resolved_cmd} or command {resolved_cmd}"),
            ));
        }
    }

    if resolved_cmd == "find" {
        if let Some(decision) = check_find(args, input.config) {
            return Some(decision);
        }
    }

    if let Some(decision) = check_blocked_command(&resolved_cmd, args, input.config, input.git) {
        return Some(decision);
    }

    if SHELL_INTERPRETERS.contains(&resolved_cmd.as_str()) {
        if let Some(pos) = args.iter().position(|a| a == "-c") {
            if let Some(inner) = args.get(pos + 1) {
                let inner_resolved = resolve_vars(inner, vars);
                let decision = crate::analyzer::analyze_with_depth(
                    &inner_resolved,
                    input.config,
                    input.shell_context,
                    input.git,
                    input.depth + 1,
                );
                if decision.blocked {
                    return Some(decision);
                }
            }
        }
    }

    if matches!(resolved_cmd.as_str(), "bash" | "sh" | "zsh") && contains_inline_process_substitution(args, vars) {
        return Some(process_substitution_decision());
    }

    if matches!(resolved_cmd.as_str(), "curl" | "wget") {
        if let Some(decision) = check_downloader(segments, idx, &resolved_cmd, args, vars, input.config) {
            return Some(decision);
        }
    }

    if let Some(decision) = check_sensitive_targets(segment, args, vars) {
        return Some(decision);
    }

    None
}

fn check_find(args: &[String], config: &Config) -> Option<Decision> {
    if args.iter().any(|a| a == "-delete") {
        return Some(Decision::block(
            ID,
            "DESTRUCTIVE FIND OPERATION DETECTED (-delete)",
            "run find without -delete first to review matches, then delete explicitly",
        ));
    }

    let executors: HashSet<&str> = SHELL_INTERPRETERS
        .iter()
        .chain(NON_SHELL_INTERPRETERS.iter())
        .chain([".", "source"].iter())
        .copied()
        .collect();

    for (i, a) in args.iter().enumerate() {
        if matches!(a.as_str(), "-exec" | "-execdir" | "-ok") {
            if let Some(next) = args.get(i + 1) {
                let base = basename(next).to_ascii_lowercase();
                if config.blocked.contains(&base)
                    || FIND_EXEC_DESTRUCTIVE.contains(&base.as_str())
                    || executors.contains(base.as_str())
                {
                    return Some(Decision::block(
                        ID,
                        "DESTRUCTIVE FIND OPERATION DETECTED (-exec)",
                        "review matches before invoking a destructive program via -exec",
                    ));
                }
            }
        }
    }
    None
}

fn check_blocked_command(
    resolved_cmd: &str,
    args: &[String],
    config: &Config,
    git: &dyn GitStatus,
) -> Option<Decision> {
    let targets: Vec<&String> = args.iter().filter(|a| !a.starts_with('-')).collect();

    match resolved_cmd {
        "dd" => {
            if args.iter().any(|a| a.starts_with("of=")) {
                return Some(Decision::block(
                    ID,
                    "Destructive command 'dd' detected",
                    "trash the target file instead of overwriting it with dd",
                ));
            }
            None
        }
        "mv" | "cp" => {
            if targets.iter().any(|t| is_critical_path(t)) {
                return Some(Decision::block(
                    ID,
                    "CRITICAL PATH PROTECTED",
                    format!("avoid targeting a critical system path with {resolved_cmd}"),
                ));
            }
            None
        }
        "chmod" | "chown" | "chgrp" => {
            if is_recursive_flag(args) && targets.iter().any(|t| is_critical_path(t)) {
                return Some(Decision::block(
                    ID,
                    "CRITICAL PATH PROTECTED",
                    format!("avoid a recursive {resolved_cmd} on a critical system path"),
                ));
            }
            None
        }
        "systemctl" => {
            let subcommand = targets.first().map(|s| s.as_str()).unwrap_or("");
            if SYSTEMCTL_DESTRUCTIVE_SUBCOMMANDS.contains(&subcommand) {
                return Some(Decision::block(
                    ID,
                    "DESTRUCTIVE SERVICE OPERATION DETECTED",
                    format!("confirm `systemctl {subcommand}` is intentional on this host"),
                ));
            }
            None
        }
        _ => {
            if !config.blocked.contains(resolved_cmd) {
                return None;
            }

            if let Some(critical) = targets.iter().find(|t| is_critical_path(t)) {
                return Some(Decision::block(
                    ID,
                    "CRITICAL PATH PROTECTED",
                    format!("avoid targeting '{critical}' with {resolved_cmd}"),
                ));
            }

            if targets.len() as u32 > config.threshold {
                return Some(Decision::block(
                    ID,
                    "VOLUME THRESHOLD EXCEEDED",
                    format!(
                        "review the {} targets individually or raise Config.threshold if intentional",
                        targets.len()
                    ),
                ));
            }

            let candidate_paths: Vec<PathBuf> = targets.iter().map(|t| PathBuf::from(t.as_str())).collect();
            let dirty = git.is_dirty(&candidate_paths);
            if !dirty.is_empty() {
                let mut names: Vec<String> = dirty.iter().map(|p| p.display().to_string()).collect();
                names.sort();
                return Some(Decision::block(
                    ID,
                    format!("UNCOMMITTED CHANGES DETECTED: {}", names.join(", ")),
                    "commit or stash your changes before running a destructive command on them",
                ));
            }

            let target_list = if targets.is_empty() {
                "<files>".to_string()
            } else {
                targets.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(" ")
            };
            Some(Decision::block(
                ID,
                format!("Destructive command '{resolved_cmd}' detected"),
                format!("trash {target_list}"),
            ))
        }
    }
}

fn check_downloader(
    segments: &[Segment],
    idx: usize,
    resolved_cmd: &str,
    args: &[String],
    vars: &VarMap,
    config: &Config,
) -> Option<Decision> {
    // Credentials.
    for a in args {
        let resolved = resolve_vars(a, vars);
        if RE_URL.is_match(&resolved) && url_has_userinfo(&resolved) {
            return Some(Decision::block(
                ID,
                "CREDENTIAL EXPOSURE DETECTED",
                "pass credentials via a netrc file or auth header instead of the URL",
            ));
        }
    }

    let flags: Vec<String> = args.iter().filter(|a| a.starts_with('-')).cloned().collect();

    // Pipe-to-shell: walk forward through consecutive pipe-connected segments.
    let mut pipe_stages = 0usize;
    let mut j = idx + 1;
    let mut terminal_is_shell = false;
    while let Some(next) = segments.get(j) {
        match next.connector_before {
            Some(op) if is_pipe_operator(op) => {
                pipe_stages += 1;
                let next_cmd = next.words.first().map(|w| resolve_name(w, vars));
                if let Some(cmd) = &next_cmd {
                    if SHELL_INTERPRETERS.contains(&cmd.as_str()) {
                        terminal_is_shell = true;
                        break;
                    }
                }
                j += 1;
            }
            _ => break,
        }
    }

    if pipe_stages > 0 && terminal_is_shell {
        if let Some((_, url)) = find_first_url(args, vars) {
            if is_insecure_transport(&url, &flags) {
                return Some(Decision::block(
                    ID,
                    "INSECURE TRANSPORT DETECTED",
                    "use https and drop certificate-bypass flags before piping to a shell",
                ));
            }
            if pipe_stages == 1
                && crate::validators::url_is_trusted(&url, &config.trusted_domains)
            {
                // Trusted single-hop pipe to shell: allowed.
            } else {
                return Some(Decision::block(
                    ID,
                    "PIPE-TO-SHELL DETECTED",
                    "download to a file, review it, then run it explicitly instead of piping to a shell",
                ));
            }
        } else {
            return Some(Decision::block(
                ID,
                "PIPE-TO-SHELL DETECTED",
                "download to a file, review it, then run it explicitly instead of piping to a shell",
            ));
        }
    }

    // Download-and-exec: only the immediately following control-operator segment.
    if let Some((_, url)) = find_first_url(args, vars) {
        let targets = download_output_targets(resolved_cmd, args, vars, &url);
        if !targets.is_empty() {
            if let Some(next) = segments.get(idx + 1) {
                if matches!(next.connector_before, Some(op) if is_control_operator(op)) {
                    let next_cmd = next.words.first().map(|w| resolve_name(w, vars));
                    let references_target = next
                        .words
                        .iter()
                        .skip(1)
                        .any(|w| path_matches_target(&resolve_vars(w, vars), &targets));
                    if references_target {
                        if let Some(cmd) = next_cmd {
                            if is_executor_name(&cmd) {
                                return Some(Decision::block(
                                    ID,
                                    "DOWNLOAD-AND-EXEC DETECTED",
                                    "review the downloaded file before executing it",
                                ));
                            }
                        }
                    }
                }
            }
        }
    }

    None
}

fn check_sensitive_targets(segment: &Segment, args: &[String], vars: &VarMap) -> Option<Decision> {
    for (_, target) in &segment.redirection_targets {
        let resolved = resolve_vars(target, vars);
        if is_sensitive_path(&resolved) {
            return Some(sensitive_path_decision());
        }
    }

    let mut i = 0;
    while i < args.len() {
        let w = &args[i];
        let candidate = if let Some(path) = w.strip_prefix("--output=") {
            Some(path.to_string())
        } else if let Some(path) = w.strip_prefix("--output-document=") {
            Some(path.to_string())
        } else if matches!(w.as_str(), "-o" | "-O" | "--output" | "--output-document") {
            args.get(i + 1).cloned()
        } else if let Some(path) = w.strip_prefix("-o") {
            if !path.is_empty() {
                Some(path.to_string())
            } else {
                None
            }
        } else {
            None
        };

        if let Some(path) = candidate {
            let resolved = resolve_vars(&path, vars);
            if is_sensitive_path(&resolved) {
                return Some(sensitive_path_decision());
            }
        }
        i += 1;
    }

    None
}

fn sensitive_path_decision() -> Decision {
    Decision::block(
        ID,
        "SENSITIVE PATH TARGETED",
        "write the download to a non-sensitive path and review it before use",
    )
}
