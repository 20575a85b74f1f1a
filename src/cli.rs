//! Command-line interface definition.
//!
//! Uses [clap] derive macros to parse arguments.

use clap::{Parser, Subcommand};

/// Pre-execution gate for shell commands.
#[derive(Parser)]
#[command(name = "shellshield", version, about = "Pre-execution gate for shell commands")]
pub struct Cli {
    /// Analyze a single command given on the command line.
    #[arg(long)]
    pub check: Option<String>,

    /// Read stdin, split on CR/LF, and analyze each non-empty line in
    /// order; stop at the first block.
    #[arg(long)]
    pub paste: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Read-only subcommands that expose the rule catalogue.
#[derive(Subcommand)]
pub enum Commands {
    /// List every rule with its phase and the reasons it can emit.
    #[command(name = "list-rules")]
    ListRules,

    /// Show the full description and reason catalogue for one rule.
    Explain {
        /// Rule ID to look up (e.g. `"CoreAst"`, `"RawThreat"`).
        rule_id: String,
    },
}
