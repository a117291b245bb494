//! Backward chaining: goal-driven depth-first proof search.
//!
//! Each goal is reduced to the rules that conclude it, and each candidate
//! rule to its premises, recursively. An in-progress set guards against
//! cyclic derivations, and successfully proven atoms are memoized into the
//! known set so later goals reuse them. Recursion depth is bounded by the
//! finite atom vocabulary, since the guard removes revisits within a chain.

use std::collections::{BTreeSet, HashMap};

use crate::atom::Atom;
use crate::kb::KnowledgeBase;
use crate::rule::{Rule, RuleId};

use super::{BackwardQuery, BackwardResult, IndexMode};

/// Run backward chaining over every goal independently.
///
/// Infallible by design: an unprovable goal yields `success = false` with a
/// proof trace that explains the failure.
pub fn run_backward(kb: &KnowledgeBase, query: &BackwardQuery) -> BackwardResult {
    let known: BTreeSet<Atom> = match &query.initial_facts {
        Some(facts) => facts.iter().cloned().collect(),
        None => kb.facts().clone(),
    };

    let mut by_conclusion: HashMap<&Atom, Vec<&Rule>> = HashMap::new();
    for rule in kb.rules() {
        by_conclusion.entry(&rule.conclusion).or_default().push(rule);
    }

    tracing::debug!(
        rules = kb.rule_count(),
        facts = known.len(),
        goals = query.goals.len(),
        index_mode = %query.index_mode,
        "starting backward chaining"
    );

    let mut prover = Prover {
        by_conclusion,
        index_mode: query.index_mode,
        known,
        in_progress: BTreeSet::new(),
        used: Vec::new(),
        trace: Vec::new(),
    };

    let mut success = true;
    for goal in &query.goals {
        if prover.known.contains(goal) {
            prover
                .trace
                .push(format!("goal '{goal}' is already satisfied by the initial facts"));
            continue;
        }
        prover.trace.push(format!("=== proving goal '{goal}' ==="));
        if prover.prove(goal, 1) {
            prover.trace.push(format!("goal '{goal}' proven"));
        } else {
            success = false;
            prover.trace.push(format!("failed to prove goal '{goal}'"));
        }
    }

    tracing::debug!(success, used = prover.used.len(), "backward chaining finished");

    BackwardResult {
        success,
        goals: query.goals.clone(),
        final_known: prover.known.into_iter().collect(),
        used_rules: prover.used,
        trace: prover.trace,
    }
}

/// Mutable proof state threaded through the recursion.
struct Prover<'a> {
    by_conclusion: HashMap<&'a Atom, Vec<&'a Rule>>,
    index_mode: IndexMode,
    known: BTreeSet<Atom>,
    /// Atoms on the current recursion path; the cycle guard.
    in_progress: BTreeSet<Atom>,
    used: Vec<RuleId>,
    trace: Vec<String>,
}

impl Prover<'_> {
    fn prove(&mut self, goal: &Atom, depth: usize) -> bool {
        let indent = "  ".repeat(depth);

        if self.known.contains(goal) {
            self.trace
                .push(format!("{indent}- '{goal}' is already known"));
            return true;
        }
        if self.in_progress.contains(goal) {
            self.trace.push(format!(
                "{indent}- cycle detected while proving '{goal}', abandoning this path"
            ));
            return false;
        }

        let mut candidates = match self.by_conclusion.get(goal) {
            Some(rules) => rules.clone(),
            None => {
                self.trace
                    .push(format!("{indent}- no rule concludes '{goal}'"));
                return false;
            }
        };
        match self.index_mode {
            IndexMode::Min => candidates.sort_unstable_by_key(|rule| rule.id),
            IndexMode::Max => candidates.sort_unstable_by_key(|rule| std::cmp::Reverse(rule.id)),
        }

        self.trace.push(format!(
            "{indent}- considering {} candidate rule(s) for '{goal}' (priority: {})",
            candidates.len(),
            self.index_mode,
        ));
        self.in_progress.insert(goal.clone());

        for rule in candidates {
            self.trace
                .push(format!("{indent}  trying {}: {}", rule.id, rule.to_text()));
            let mut all_premises_hold = true;
            for premise in &rule.premises {
                self.trace
                    .push(format!("{indent}    proving premise '{premise}'"));
                if !self.prove(premise, depth + 2) {
                    self.trace.push(format!(
                        "{indent}    premise '{premise}' failed, abandoning {}",
                        rule.id
                    ));
                    all_premises_hold = false;
                    break;
                }
            }
            if all_premises_hold {
                self.known.insert(goal.clone());
                self.used.push(rule.id);
                self.trace
                    .push(format!("{indent}  '{goal}' established via {}", rule.id));
                self.in_progress.remove(goal);
                return true;
            }
        }

        self.in_progress.remove(goal);
        self.trace
            .push(format!("{indent}- could not establish '{goal}'"));
        false
    }
}
