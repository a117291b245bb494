//! Rules: premises-set → conclusion-atom productions.
//!
//! Every rule is identified by a [`RuleId`], assigned sequentially by the
//! owning [`KnowledgeBase`](crate::kb::KnowledgeBase) starting at 1. Ids are
//! stable for the lifetime of a knowledge base and never reused after
//! deletion.

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::atom::Atom;

/// Unique, niche-optimized identifier for a rule.
///
/// Uses `NonZeroU32` so that `Option<RuleId>` is the same size as `RuleId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct RuleId(NonZeroU32);

impl RuleId {
    /// Create a `RuleId` from a raw `u32`. Returns `None` if `raw` is zero.
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(RuleId)
    }

    /// Get the underlying `u32` value.
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// An inference rule: if every premise is known, the conclusion follows.
///
/// Premises keep their insertion order (duplicates are dropped). A rule whose
/// conclusion also appears among its premises is legal data: it can never
/// produce new knowledge, and both chainers tolerate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub premises: Vec<Atom>,
    pub conclusion: Atom,
}

impl Rule {
    /// Build a rule, deduplicating premises while preserving order.
    pub fn new(id: RuleId, premises: impl IntoIterator<Item = Atom>, conclusion: Atom) -> Self {
        let mut seen = BTreeSet::new();
        let premises = premises
            .into_iter()
            .filter(|p| seen.insert(p.clone()))
            .collect();
        Self {
            id,
            premises,
            conclusion,
        }
    }

    /// Whether every premise is contained in `known`.
    pub fn is_fireable(&self, known: &BTreeSet<Atom>) -> bool {
        self.premises.iter().all(|p| known.contains(p))
    }

    /// Render as rule text, e.g. `a ^ b -> c`.
    pub fn to_text(&self) -> String {
        let left = self
            .premises
            .iter()
            .map(Atom::as_str)
            .collect::<Vec<_>>()
            .join(" ^ ");
        format!("{left} -> {}", self.conclusion)
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.id, self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(s: &str) -> Atom {
        Atom::new(s).unwrap()
    }

    #[test]
    fn rule_id_niche_optimization() {
        assert_eq!(
            std::mem::size_of::<Option<RuleId>>(),
            std::mem::size_of::<RuleId>()
        );
    }

    #[test]
    fn rule_id_display() {
        assert_eq!(RuleId::new(3).unwrap().to_string(), "R3");
    }

    #[test]
    fn premises_are_deduped_in_order() {
        let rule = Rule::new(
            RuleId::new(1).unwrap(),
            [atom("b"), atom("a"), atom("b")],
            atom("c"),
        );
        assert_eq!(rule.premises, vec![atom("b"), atom("a")]);
    }

    #[test]
    fn to_text_round_trips_shape() {
        let rule = Rule::new(RuleId::new(2).unwrap(), [atom("a"), atom("b")], atom("C"));
        assert_eq!(rule.to_text(), "a ^ b -> C");
    }

    #[test]
    fn fireable_requires_all_premises() {
        let rule = Rule::new(RuleId::new(1).unwrap(), [atom("a"), atom("b")], atom("c"));
        let mut known = BTreeSet::from([atom("a")]);
        assert!(!rule.is_fireable(&known));
        known.insert(atom("b"));
        assert!(rule.is_fireable(&known));
    }
}
