//! Diagnostic error types for the khet engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text. Note that a failed proof or
//! an unreached goal is *not* an error: the chainers report non-success as
//! data in their results, explained by the accompanying trace. Only malformed
//! input (bad rule structure, unknown ids, unparseable text) is surfaced here.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the khet engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum KhetError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Kb(#[from] KbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Seed(#[from] SeedError),
}

// ---------------------------------------------------------------------------
// Knowledge-base errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum KbError {
    #[error("invalid rule: {reason}")]
    #[diagnostic(
        code(khet::kb::invalid_rule),
        help(
            "A rule needs at least one premise atom and a single non-empty \
             conclusion atom. Atoms are whitespace-normalized; a premise list \
             that normalizes to nothing is rejected."
        )
    )]
    InvalidRule { reason: String },

    #[error("unknown rule id: R{id}")]
    #[diagnostic(
        code(khet::kb::unknown_rule_id),
        help(
            "No rule with this id exists in the knowledge base. Ids are \
             assigned sequentially on insertion and are never reused after \
             deletion; list current rules to see which ids are live."
        )
    )]
    UnknownRuleId { id: u32 },
}

// ---------------------------------------------------------------------------
// Rule-text parse errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("rule text is empty")]
    #[diagnostic(code(khet::parse::empty), help("Provide a rule like `a ^ b -> c`."))]
    Empty,

    #[error("rule has no arrow: {text:?}")]
    #[diagnostic(
        code(khet::parse::missing_arrow),
        help(
            "A rule must contain an arrow separating premises from the \
             conclusion, e.g. `a & b -> c`. The variants `=>`, `→` and `:>` \
             are also accepted."
        )
    )]
    MissingArrow { text: String },

    #[error("rule is missing premises: {text:?}")]
    #[diagnostic(
        code(khet::parse::missing_premises),
        help("Write at least one atom left of the arrow, e.g. `a -> b`.")
    )]
    MissingPremises { text: String },

    #[error("rule is missing a conclusion: {text:?}")]
    #[diagnostic(
        code(khet::parse::missing_conclusion),
        help("Write exactly one atom right of the arrow, e.g. `a -> b`.")
    )]
    MissingConclusion { text: String },
}

// ---------------------------------------------------------------------------
// Seed pack errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum SeedError {
    #[error("seed pack not found: \"{id}\"")]
    #[diagnostic(
        code(khet::seed::not_found),
        help("List available packs with `khet seed list`.")
    )]
    NotFound { id: String },

    #[error("failed to parse seed pack \"{id}\": {message}")]
    #[diagnostic(
        code(khet::seed::parse),
        help(
            "Check the seed.toml syntax: a [seed] table plus `rules`, `facts` \
             and `goals` arrays."
        )
    )]
    Parse { id: String, message: String },
}

/// Convenience alias for functions returning khet results.
pub type KhetResult<T> = std::result::Result<T, KhetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kb_error_converts_to_khet_error() {
        let err = KbError::UnknownRuleId { id: 7 };
        let khet: KhetError = err.into();
        assert!(matches!(khet, KhetError::Kb(KbError::UnknownRuleId { id: 7 })));
    }

    #[test]
    fn parse_error_converts_to_khet_error() {
        let err = ParseError::MissingArrow {
            text: "a b c".into(),
        };
        let khet: KhetError = err.into();
        assert!(matches!(khet, KhetError::Parse(ParseError::MissingArrow { .. })));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = KbError::UnknownRuleId { id: 42 };
        assert_eq!(format!("{err}"), "unknown rule id: R42");

        let err = SeedError::NotFound {
            id: "triangle".into(),
        };
        assert!(format!("{err}").contains("triangle"));
    }
}
