//! The fixed, ordered rule list.
//!
//! Rules are expressed as a closed enum rather than a trait object: the set
//! is fixed and known at compile time (unlike the base crate's genuinely
//! open-ended `Scanner` trait, which exists because external scanners like
//! shellcheck/semgrep/gitleaks can be added independently), so a tagged sum
//! type is the better fit here.

pub mod core_ast;
pub mod custom;
pub mod homograph;
pub mod raw_threat;
pub mod terminal;

/// When a rule runs relative to tokenization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Runs on the raw command string before tokenization.
    Pre,
    /// Runs on the token stream after tokenization.
    Post,
}

/// The fixed, declaration-ordered rule list the analyzer façade runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Homograph,
    TerminalInjection,
    RawThreat,
    Custom,
    CoreAst,
}

impl Rule {
    pub const PRE_PHASE: [Rule; 3] = [Rule::Homograph, Rule::TerminalInjection, Rule::RawThreat];
    pub const POST_PHASE: [Rule; 2] = [Rule::Custom, Rule::CoreAst];

    pub fn id(self) -> &'static str {
        match self {
            Rule::Homograph => homograph::ID,
            Rule::TerminalInjection => terminal::ID,
            Rule::RawThreat => raw_threat::ID,
            Rule::Custom => custom::ID,
            Rule::CoreAst => core_ast::ID,
        }
    }

    pub fn phase(self) -> Phase {
        match self {
            Rule::Homograph | Rule::TerminalInjection | Rule::RawThreat => Phase::Pre,
            Rule::Custom | Rule::CoreAst => Phase::Post,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Rule::Homograph => "Flags hostnames that mix Unicode scripts to spoof a trusted domain.",
            Rule::TerminalInjection => "Flags ANSI escape sequences and hidden zero-width characters.",
            Rule::RawThreat => "Flags known download-and-exec, obfuscation, and deep-subshell patterns in the raw command text.",
            Rule::Custom => "Runs user-configured regex rules against the raw command text.",
            Rule::CoreAst => "Walks the token stream: blocklist, critical paths, pipe-to-shell, download-and-exec, subshells, sensitive paths.",
        }
    }
}

/// One row of the `list-rules`/`explain` catalogue.
#[derive(Debug, Clone)]
pub struct RuleInfo {
    pub id: &'static str,
    pub phase: Phase,
    pub description: &'static str,
    /// Representative reason strings this rule can emit, for `explain`.
    pub reasons: Vec<&'static str>,
}

/// Aggregates every rule (and, for `RawThreat`, its sub-pattern catalogue)
/// into a flat list for the CLI's `list-rules`/`explain` subcommands,
/// mirroring the base crate's `scanners::all_rules()`.
pub fn all_rule_info() -> Vec<RuleInfo> {
    vec![
        RuleInfo {
            id: Rule::Homograph.id(),
            phase: Rule::Homograph.phase(),
            description: Rule::Homograph.description(),
            reasons: vec!["HOMOGRAPH ATTACK DETECTED"],
        },
        RuleInfo {
            id: Rule::TerminalInjection.id(),
            phase: Rule::TerminalInjection.phase(),
            description: Rule::TerminalInjection.description(),
            reasons: vec!["TERMINAL INJECTION DETECTED", "HIDDEN CHARACTERS DETECTED"],
        },
        RuleInfo {
            id: Rule::RawThreat.id(),
            phase: Rule::RawThreat.phase(),
            description: Rule::RawThreat.description(),
            reasons: raw_threat::catalog()
                .into_iter()
                .map(|(_, reason)| reason)
                .chain(["COMMAND TOO LONG", "DEEP SUBSHELL DETECTED"])
                .collect(),
        },
        RuleInfo {
            id: Rule::Custom.id(),
            phase: Rule::Custom.phase(),
            description: Rule::Custom.description(),
            reasons: vec!["CUSTOM RULE VIOLATION"],
        },
        RuleInfo {
            id: Rule::CoreAst.id(),
            phase: Rule::CoreAst.phase(),
            description: Rule::CoreAst.description(),
            reasons: vec![
                "SHELL CONTEXT OVERRIDE DETECTED",
                "CRITICAL PATH PROTECTED",
                "VOLUME THRESHOLD EXCEEDED",
                "UNCOMMITTED CHANGES DETECTED",
                "SENSITIVE PATH TARGETED",
                "PROCESS SUBSTITUTION DETECTED",
                "CREDENTIAL EXPOSURE DETECTED",
                "INSECURE TRANSPORT DETECTED",
                "PIPE-TO-SHELL DETECTED",
                "DOWNLOAD-AND-EXEC DETECTED",
                "SUBSHELL DEPTH LIMIT EXCEEDED",
            ],
        },
    ]
}
