//! The analyzer's uniform return type.

use serde::Serialize;

/// The verdict returned by every rule and by [`crate::analyzer::analyze`].
///
/// When `blocked` is `false`, `reason`, `suggestion`, and `rule` are empty —
/// there is deliberately no separate "allowed" variant, matching the base
/// crate's `ScanResult::skipped` convenience-constructor style rather than
/// a richer enum, since `Decision` is defined as one flat struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub blocked: bool,
    pub reason: String,
    pub suggestion: String,
    pub rule: String,
}

impl Decision {
    /// The non-blocking decision every rule returns implicitly (`None`) and
    /// the façade returns explicitly when no rule fired.
    pub fn allow() -> Decision {
        Decision {
            blocked: false,
            reason: String::new(),
            suggestion: String::new(),
            rule: String::new(),
        }
    }

    /// A blocking decision naming the rule that fired, its reason, and a
    /// suggested safer alternative.
    pub fn block(
        rule: impl Into<String>,
        reason: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Decision {
        Decision {
            blocked: true,
            reason: reason.into(),
            suggestion: suggestion.into(),
            rule: rule.into(),
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }
}
