//! `Homograph` rule (phase `pre`).

use crate::decision::Decision;
use crate::validators::has_homograph;

pub const ID: &str = "Homograph";

/// Blocks commands whose raw text contains a URL-like hostname that mixes
/// Unicode scripts in a way that suggests a spoofed lookalike domain.
pub fn check(raw: &str) -> Option<Decision> {
    if has_homograph(raw) {
        return Some(Decision::block(
            ID,
            "HOMOGRAPH ATTACK DETECTED",
            "verify the hostname is spelled in a single script you recognize before running this",
        ));
    }
    None
}
