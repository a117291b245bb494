//! Rule-text parsing.
//!
//! Turns free-form rule lines like `a ^ b -> c` into structured
//! `(premises, conclusion)` tuples before they reach the knowledge base.
//! The core never sees raw text: this module is the boundary where arrow
//! variants are normalized and premise lists are split.

use std::sync::LazyLock;

use regex::Regex;

use crate::atom::Atom;
use crate::error::{KhetResult, ParseError};

/// Premise separators: `,`, `&`, `^` and the word `and` (any case).
static ATOM_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*(?:,|&|\^|\band\b)\s*").unwrap());

/// Control characters that occasionally survive copy-paste from editors.
static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x1F\x7F]").unwrap());

/// Split a premise list into atoms, dropping empty fragments.
pub fn split_atoms(raw: &str) -> Vec<Atom> {
    ATOM_SPLIT
        .split(raw.trim())
        .filter_map(Atom::new)
        .collect()
}

/// Parse one rule line into `(premises, conclusion)`.
///
/// Accepted arrows: `->`, `=>`, `→`, `:>`. Premises split on `,`, `&`, `^`
/// or `and`. Everything right of the first arrow is the conclusion.
pub fn parse_rule(raw: &str) -> KhetResult<(Vec<Atom>, Atom)> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ParseError::Empty.into());
    }

    let cleaned = CONTROL_CHARS.replace_all(text, "");
    let normalized = cleaned
        .replace("=>", "->")
        .replace('→', "->")
        .replace(":>", "->");

    let Some((left, right)) = normalized.split_once("->") else {
        return Err(ParseError::MissingArrow { text: text.into() }.into());
    };

    let premises = split_atoms(left);
    if premises.is_empty() {
        return Err(ParseError::MissingPremises { text: text.into() }.into());
    }
    let Some(conclusion) = Atom::new(right) else {
        return Err(ParseError::MissingConclusion { text: text.into() }.into());
    };

    Ok((premises, conclusion))
}

/// Parse multi-line rule text. Blank lines and `#` comments are skipped.
pub fn parse_rules(text: &str) -> KhetResult<Vec<(Vec<Atom>, Atom)>> {
    let mut rules = Vec::new();
    for line in text.lines() {
        let stripped = line.trim();
        if stripped.is_empty() || stripped.starts_with('#') {
            continue;
        }
        rules.push(parse_rule(stripped)?);
    }
    Ok(rules)
}
