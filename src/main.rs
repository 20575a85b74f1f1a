mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use shellshield::audit_log::{self, Outcome, Source};
use shellshield::config::{Config, Mode};
use shellshield::context::ShellContext;
use shellshield::decision::Decision;
use shellshield::git::RealGitStatus;
use shellshield::analyzer;
use shellshield::rules::all_rule_info;
use std::io::{IsTerminal, Read};

fn main() {
    if is_bypassed() {
        std::process::exit(0);
    }

    let cli = Cli::parse();

    if let Some(command) = cli.command {
        run_catalogue_command(command);
        return;
    }

    let config = Config::load(std::env::args().next().map(std::path::PathBuf::from).as_deref());
    let shell_context = config
        .context_path
        .as_deref()
        .map(ShellContext::load)
        .unwrap_or_default();
    let git = RealGitStatus;

    if let Some(cmd) = cli.check {
        let decision = analyzer::analyze(&cmd, &config, Some(&shell_context), &git);
        let exit_code = dispatch(&cmd, decision, &config, Source::Check);
        std::process::exit(exit_code);
    }

    if cli.paste {
        let mut input = String::new();
        if std::io::stdin().read_to_string(&mut input).is_err() {
            std::process::exit(0);
        }
        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let decision = analyzer::analyze(line, &config, Some(&shell_context), &git);
            let exit_code = dispatch(line, decision, &config, Source::Paste);
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        std::process::exit(0);
    }

    // Tool-hook mode: read stdin; empty stdin means nothing to check.
    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() || input.trim().is_empty() {
        std::process::exit(0);
    }

    let Some(command) = extract_hook_command(&input) else {
        std::process::exit(0);
    };

    let decision = analyzer::analyze(&command, &config, Some(&shell_context), &git);
    let exit_code = dispatch(&command, decision, &config, Source::Stdin);
    std::process::exit(exit_code);
}

/// `SHELLSHIELD_SKIP ∈ {1, true, yes, on, enable, enabled}` (case-insensitive)
/// bypasses analysis entirely, checked before config load.
fn is_bypassed() -> bool {
    std::env::var("SHELLSHIELD_SKIP")
        .map(|v| {
            matches!(
                v.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on" | "enable" | "enabled"
            )
        })
        .unwrap_or(false)
}

/// Parses `{"tool_input": {"command": "..."}}` or `{"command": "..."}` from
/// tool-hook stdin.
fn extract_hook_command(input: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(input).ok()?;
    value
        .get("tool_input")
        .and_then(|v| v.get("command"))
        .or_else(|| value.get("command"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Applies the caller-side mode mapping and writes the audit log entry,
/// returning the process exit code.
fn dispatch(command: &str, decision: Decision, config: &Config, source: Source) -> i32 {
    let (exit_code, outcome) = match config.mode {
        Mode::Enforce => {
            if decision.blocked {
                eprintln!("{}", "BLOCKED".red().bold());
                eprintln!("  reason:     {}", decision.reason);
                eprintln!("  suggestion: {}", decision.suggestion);
                (2, Outcome::Blocked)
            } else {
                (0, Outcome::Allowed)
            }
        }
        Mode::Permissive => {
            if decision.blocked {
                eprintln!(
                    "{}",
                    format!(
                        "shellshield: would block ({}): {}",
                        decision.reason, decision.suggestion
                    )
                    .dimmed()
                );
                (0, Outcome::Warn)
            } else {
                (0, Outcome::Allowed)
            }
        }
        Mode::Interactive => {
            if decision.blocked {
                eprintln!("{}", "BLOCKED".red().bold());
                eprintln!("  reason:     {}", decision.reason);
                eprintln!("  suggestion: {}", decision.suggestion);
                if std::io::stdin().is_terminal() && prompt_allow() {
                    (0, Outcome::Approved)
                } else {
                    (2, Outcome::Blocked)
                }
            } else {
                (0, Outcome::Allowed)
            }
        }
    };

    audit_log::record(command, &decision, outcome, config.mode, source);
    exit_code
}

fn prompt_allow() -> bool {
    eprint!("Allow this command? [y/N] ");
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn run_catalogue_command(command: Commands) {
    match command {
        Commands::ListRules => {
            println!("{}", "Rules".bold().underline());
            println!();
            for rule in all_rule_info() {
                let phase = match rule.phase {
                    shellshield::rules::Phase::Pre => " pre".cyan(),
                    shellshield::rules::Phase::Post => "post".magenta(),
                };
                println!("  [{phase}] {id:<18} {desc}", id = rule.id, desc = rule.description);
            }
            println!();
            println!("  Total: {} rules", all_rule_info().len());
        }
        Commands::Explain { rule_id } => {
            let rules = all_rule_info();
            match rules.iter().find(|r| r.id == rule_id) {
                Some(rule) => {
                    println!("{}", rule.id.bold());
                    println!();
                    println!("  Phase:       {:?}", rule.phase);
                    println!("  Description: {}", rule.description);
                    println!("  Reasons:");
                    for reason in &rule.reasons {
                        println!("    - {reason}");
                    }
                }
                None => {
                    eprintln!("Unknown rule: {rule_id}");
                    eprintln!("Use 'shellshield list-rules' to see all available rules.");
                    std::process::exit(2);
                }
            }
        }
    }
}
