//! `Custom` rule (phase `post`, before `CoreAst`).

use crate::config::Config;
use crate::decision::Decision;
use regex::Regex;

pub const ID: &str = "Custom";

/// Compiles each `Config.custom_rules` pattern on the fly and tests it
/// against the raw command text; the first match blocks with the
/// configured suggestion. An invalid pattern is silently ignored, not
/// surfaced as an error — custom rules are user-supplied and must not be
/// able to crash the gate.
pub fn check(raw: &str, config: &Config) -> Option<Decision> {
    for rule in &config.custom_rules {
        let Ok(re) = Regex::new(&rule.pattern) else {
            continue;
        };
        if re.is_match(raw) {
            return Some(Decision::block(
                ID,
                "CUSTOM RULE VIOLATION",
                rule.suggestion.clone(),
            ));
        }
    }
    None
}
