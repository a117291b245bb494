//! Knowledge base: rule set plus the working fact set.
//!
//! A [`KnowledgeBase`] owns an ordered rule collection and a mutable set of
//! known atoms. Rule ids come from a monotonically increasing counter owned
//! by the instance, so independent knowledge bases never interfere. A
//! knowledge base is exclusively owned by one inference run; callers that
//! want to reuse one across runs clone it.

use std::collections::BTreeSet;

use crate::atom::Atom;
use crate::error::{KbError, KhetResult};
use crate::parse;
use crate::rule::{Rule, RuleId};

/// In-memory storage for rules and known facts.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    name: String,
    /// Rules in insertion order. Ids only ever grow, so this is also
    /// ascending id order.
    rules: Vec<Rule>,
    facts: BTreeSet<Atom>,
    next_id: u32,
}

impl KnowledgeBase {
    /// Create an empty knowledge base.
    pub fn new() -> Self {
        Self::named("knowledge-base")
    }

    /// Create an empty knowledge base with a display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
            facts: BTreeSet::new(),
            next_id: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // ------------------------------------------------------------------
    // Rule management
    // ------------------------------------------------------------------

    /// Add a rule, assigning the next sequential id.
    ///
    /// Premises are deduplicated; an empty premise list is rejected with
    /// [`KbError::InvalidRule`].
    pub fn add_rule(
        &mut self,
        premises: impl IntoIterator<Item = Atom>,
        conclusion: Atom,
    ) -> KhetResult<RuleId> {
        let premises: Vec<Atom> = premises.into_iter().collect();
        if premises.is_empty() {
            return Err(KbError::InvalidRule {
                reason: "premises must not be empty".into(),
            }
            .into());
        }
        let id = self.allocate_id();
        self.rules.push(Rule::new(id, premises, conclusion));
        Ok(id)
    }

    /// Parse one line of rule text and add it.
    pub fn add_rule_from_text(&mut self, text: &str) -> KhetResult<RuleId> {
        let (premises, conclusion) = parse::parse_rule(text)?;
        self.add_rule(premises, conclusion)
    }

    /// Replace the premises and conclusion of an existing rule, keeping its id.
    pub fn update_rule(
        &mut self,
        id: RuleId,
        premises: impl IntoIterator<Item = Atom>,
        conclusion: Atom,
    ) -> KhetResult<()> {
        let premises: Vec<Atom> = premises.into_iter().collect();
        if premises.is_empty() {
            return Err(KbError::InvalidRule {
                reason: "premises must not be empty".into(),
            }
            .into());
        }
        let index = self.index_of(id)?;
        self.rules[index] = Rule::new(id, premises, conclusion);
        Ok(())
    }

    /// Remove a rule by id, returning it. The id is never handed out again.
    pub fn remove_rule(&mut self, id: RuleId) -> KhetResult<Rule> {
        let index = self.index_of(id)?;
        Ok(self.rules.remove(index))
    }

    /// Look up a rule by id.
    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.index_of(id).ok().map(|i| &self.rules[i])
    }

    /// All rules in ascending id order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Drop every rule and restart the id counter. This is the one "full
    /// reset" after which ids may be handed out again.
    pub fn clear_rules(&mut self) {
        self.rules.clear();
        self.next_id = 1;
    }

    /// Parse multi-line rule text (blank lines and `#` comments skipped) and
    /// add every rule, returning the assigned ids.
    pub fn load_rules_from_text(&mut self, text: &str) -> KhetResult<Vec<RuleId>> {
        let parsed = parse::parse_rules(text)?;
        let mut ids = Vec::with_capacity(parsed.len());
        for (premises, conclusion) in parsed {
            ids.push(self.add_rule(premises, conclusion)?);
        }
        Ok(ids)
    }

    /// Render all rules as importable rule text, one per line.
    pub fn export_rules_text(&self) -> String {
        self.rules
            .iter()
            .map(Rule::to_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn allocate_id(&mut self) -> RuleId {
        let id = RuleId::new(self.next_id).expect("rule id counter starts at 1");
        self.next_id += 1;
        id
    }

    fn index_of(&self, id: RuleId) -> Result<usize, KbError> {
        self.rules
            .binary_search_by_key(&id, |rule| rule.id)
            .map_err(|_| KbError::UnknownRuleId { id: id.get() })
    }

    // ------------------------------------------------------------------
    // Fact management
    // ------------------------------------------------------------------

    /// The current fact set.
    pub fn facts(&self) -> &BTreeSet<Atom> {
        &self.facts
    }

    pub fn add_fact(&mut self, atom: Atom) {
        self.facts.insert(atom);
    }

    /// Remove a fact. Returns whether it was present.
    pub fn remove_fact(&mut self, atom: &Atom) -> bool {
        self.facts.remove(atom)
    }

    /// Replace the fact set wholesale.
    pub fn set_facts(&mut self, facts: impl IntoIterator<Item = Atom>) {
        self.facts = facts.into_iter().collect();
    }

    pub fn clear_facts(&mut self) {
        self.facts.clear();
    }

    // ------------------------------------------------------------------
    // Convenience
    // ------------------------------------------------------------------

    /// One-line description, e.g. `triangle: 16 rule(s), 3 fact(s)`.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} rule(s), {} fact(s)",
            self.name,
            self.rules.len(),
            self.facts.len()
        )
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KhetError;

    fn atom(s: &str) -> Atom {
        Atom::new(s).unwrap()
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let mut kb = KnowledgeBase::new();
        let a = kb.add_rule([atom("a")], atom("b")).unwrap();
        let b = kb.add_rule([atom("b")], atom("c")).unwrap();
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut kb = KnowledgeBase::new();
        let first = kb.add_rule([atom("a")], atom("b")).unwrap();
        kb.remove_rule(first).unwrap();
        let second = kb.add_rule([atom("b")], atom("c")).unwrap();
        assert_eq!(second.get(), 2);
        assert!(kb.rule(first).is_none());
    }

    #[test]
    fn clear_rules_resets_the_counter() {
        let mut kb = KnowledgeBase::new();
        kb.add_rule([atom("a")], atom("b")).unwrap();
        kb.clear_rules();
        let id = kb.add_rule([atom("x")], atom("y")).unwrap();
        assert_eq!(id.get(), 1);
    }

    #[test]
    fn empty_premises_are_rejected() {
        let mut kb = KnowledgeBase::new();
        let err = kb.add_rule([], atom("c")).unwrap_err();
        assert!(matches!(err, KhetError::Kb(KbError::InvalidRule { .. })));
    }

    #[test]
    fn update_keeps_id_and_position() {
        let mut kb = KnowledgeBase::new();
        let id = kb.add_rule([atom("a")], atom("b")).unwrap();
        kb.add_rule([atom("b")], atom("c")).unwrap();
        kb.update_rule(id, [atom("x"), atom("y")], atom("z")).unwrap();
        let rule = kb.rule(id).unwrap();
        assert_eq!(rule.to_text(), "x ^ y -> z");
        assert_eq!(kb.rules().next().unwrap().id, id);
    }

    #[test]
    fn update_unknown_id_errors() {
        let mut kb = KnowledgeBase::new();
        let bogus = RuleId::new(9).unwrap();
        let err = kb.update_rule(bogus, [atom("a")], atom("b")).unwrap_err();
        assert!(matches!(err, KhetError::Kb(KbError::UnknownRuleId { id: 9 })));
    }

    #[test]
    fn facts_are_a_set() {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(atom("a"));
        kb.add_fact(atom("a"));
        assert_eq!(kb.facts().len(), 1);
        assert!(kb.remove_fact(&atom("a")));
        assert!(!kb.remove_fact(&atom("a")));
    }

    #[test]
    fn text_round_trip() {
        let mut kb = KnowledgeBase::new();
        kb.load_rules_from_text("a ^ b -> c\n# comment\n\nc -> d").unwrap();
        assert_eq!(kb.rule_count(), 2);
        assert_eq!(kb.export_rules_text(), "a ^ b -> c\nc -> d");
    }
}
