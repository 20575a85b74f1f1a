//! `TerminalInjection` rule (phase `pre`).

use crate::decision::Decision;
use crate::validators::{check_terminal_injection, TerminalThreat};

pub const ID: &str = "TerminalInjection";

/// Blocks commands whose raw text carries an ANSI CSI escape sequence or a
/// zero-width/BOM character that could hide or spoof what the operator sees
/// in their terminal.
pub fn check(raw: &str) -> Option<Decision> {
    match check_terminal_injection(raw) {
        Some(TerminalThreat::EscapeSequence) => Some(Decision::block(
            ID,
            "TERMINAL INJECTION DETECTED",
            "strip ANSI escape sequences before running this command",
        )),
        Some(TerminalThreat::HiddenCharacters) => Some(Decision::block(
            ID,
            "HIDDEN CHARACTERS DETECTED",
            "remove zero-width or byte-order-mark characters before running this command",
        )),
        None => None,
    }
}
