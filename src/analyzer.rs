//! The analyzer façade: orchestrates depth check, pre-phase
//! rules, tokenization, and post-phase rules, returning the first blocking
//! [`Decision`] or `Decision::allow()`.

use crate::config::Config;
use crate::context::ShellContext;
use crate::decision::Decision;
use crate::git::GitStatus;
use crate::rules::core_ast::{self, CoreAstInput};
use crate::rules::{custom, homograph, raw_threat, terminal};
use crate::tokenizer::tokenize;

/// Analyzes `command` against `config`, the optional shell-context
/// snapshot, and a [`GitStatus`] collaborator for the uncommitted-changes
/// check. This is the crate's public entry point; it always starts at
/// recursion depth 0.
pub fn analyze(
    command: &str,
    config: &Config,
    shell_context: Option<&ShellContext>,
    git: &dyn GitStatus,
) -> Decision {
    analyze_with_depth(command, config, shell_context, git, 0)
}

/// Same as [`analyze`] but at an explicit recursion depth, used both by the
/// public entry point (depth 0) and by `CoreAst`'s subshell `-c` recursion.
pub fn analyze_with_depth(
    command: &str,
    config: &Config,
    shell_context: Option<&ShellContext>,
    git: &dyn GitStatus,
    depth: u32,
) -> Decision {
    if depth > config.max_subshell_depth {
        return Decision::block(
            "Analyzer",
            "SUBSHELL DEPTH LIMIT EXCEEDED",
            "flatten nested subshells into a single reviewable command",
        );
    }

    if let Some(decision) = homograph::check(command) {
        return decision;
    }
    if let Some(decision) = terminal::check(command) {
        return decision;
    }
    if let Some(decision) = raw_threat::check(command) {
        return decision;
    }

    let tokens = match tokenize(command) {
        Ok(tokens) => tokens,
        Err(_) => {
            return Decision::block(
                "Analyzer",
                "MALFORMED COMMAND SYNTAX",
                "fix unbalanced quotes or substitutions before running this command",
            );
        }
    };

    if let Some(decision) = custom::check(command, config) {
        return decision;
    }

    let core_ast_input = CoreAstInput {
        config,
        shell_context,
        git,
        depth,
    };
    if let Some(decision) = core_ast::check(&tokens, &core_ast_input) {
        return decision;
    }

    Decision::allow()
}
