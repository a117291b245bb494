//! Forward chaining: saturate the fact set from the rules.
//!
//! The agenda starts as the full rule-id list (sorted per the index mode).
//! Each iteration scans the agenda in pop order and fires the first rule
//! whose premises are all known; the scan then restarts from the top, since
//! a new fact may unlock a higher-priority rule. The run always continues to
//! the fixed point; goals never cut it short, and the goal check happens
//! after saturation.

use std::collections::BTreeSet;

use crate::atom::Atom;
use crate::kb::KnowledgeBase;

use super::agenda::Agenda;
use super::{ForwardQuery, ForwardResult, ForwardStep};

/// Run forward chaining to saturation.
///
/// Infallible by design: an empty rule set or an unreachable goal is a
/// non-success result with an explanatory trace, not an error.
pub fn run_forward(kb: &KnowledgeBase, query: &ForwardQuery) -> ForwardResult {
    let mut known: BTreeSet<Atom> = match &query.initial_facts {
        Some(facts) => facts.iter().cloned().collect(),
        None => kb.facts().clone(),
    };
    let goals: BTreeSet<Atom> = query.goals.iter().cloned().collect();

    let mut agenda = Agenda::new(
        kb.rules().map(|rule| rule.id).collect(),
        query.structure,
        query.index_mode,
    );
    let mut fired = Vec::new();
    let mut trace = Vec::new();

    tracing::debug!(
        rules = agenda.len(),
        facts = known.len(),
        structure = %query.structure,
        index_mode = %query.index_mode,
        "starting forward chaining"
    );

    trace.push(ForwardStep {
        step: 0,
        rule: None,
        agenda: agenda.snapshot(),
        known: known.iter().cloned().collect(),
        fired: fired.clone(),
        note: Some("initial state".into()),
    });

    let mut step = 0;
    loop {
        // Scan the agenda in pop order for the first fireable rule.
        let hit = agenda.scan().find_map(|(position, id)| {
            kb.rule(id)
                .filter(|rule| rule.is_fireable(&known))
                .map(|rule| (position, rule))
        });

        let Some((position, rule)) = hit else {
            let note = if agenda.is_empty() {
                "agenda exhausted, saturation reached"
            } else {
                "no rule fireable, saturation reached"
            };
            trace.push(ForwardStep {
                step: step + 1,
                rule: None,
                agenda: agenda.snapshot(),
                known: known.iter().cloned().collect(),
                fired: fired.clone(),
                note: Some(note.into()),
            });
            break;
        };

        step += 1;
        let conclusion = rule.conclusion.clone();
        let id = agenda.remove(position);
        let novel = known.insert(conclusion.clone());
        fired.push(id);

        trace.push(ForwardStep {
            step,
            rule: Some(id),
            agenda: agenda.snapshot(),
            known: known.iter().cloned().collect(),
            fired: fired.clone(),
            note: Some(if novel {
                format!("derived {conclusion}")
            } else {
                format!("{conclusion} was already known")
            }),
        });
    }

    let success = goals.iter().all(|goal| known.contains(goal));
    tracing::debug!(
        success,
        fired = fired.len(),
        facts = known.len(),
        "forward chaining saturated"
    );

    ForwardResult {
        success,
        goals: goals.into_iter().collect(),
        final_facts: known.into_iter().collect(),
        fired_rules: fired,
        trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::{IndexMode, Structure};

    fn atom(s: &str) -> Atom {
        Atom::new(s).unwrap()
    }

    fn kb(rules: &str, facts: &[&str]) -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        kb.load_rules_from_text(rules).unwrap();
        kb.set_facts(facts.iter().map(|f| atom(f)));
        kb
    }

    fn query(goals: &[&str]) -> ForwardQuery {
        ForwardQuery {
            goals: goals.iter().map(|g| atom(g)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn chains_to_the_goal() {
        let kb = kb("a -> b\nb -> c", &["a"]);
        let result = run_forward(&kb, &query(&["c"]));
        assert!(result.success);
        assert_eq!(result.final_facts, vec![atom("a"), atom("b"), atom("c")]);
        assert_eq!(
            result.fired_rules,
            vec![crate::rule::RuleId::new(1).unwrap(), crate::rule::RuleId::new(2).unwrap()]
        );
    }

    #[test]
    fn always_saturates_past_the_goal() {
        // The goal is derived by the first rule; saturation must still fire
        // the second.
        let kb = kb("a -> b\nb -> c", &["a"]);
        let result = run_forward(&kb, &query(&["b"]));
        assert!(result.success);
        assert!(result.final_facts.contains(&atom("c")));
        assert_eq!(result.fired_rules.len(), 2);
    }

    #[test]
    fn empty_rule_set_saturates_immediately() {
        let kb = kb("", &["a"]);
        let result = run_forward(&kb, &query(&["g"]));
        assert!(!result.success);
        assert_eq!(result.final_facts, vec![atom("a")]);
        assert!(result.fired_rules.is_empty());
        assert_eq!(result.trace.len(), 2);
        assert!(
            result.trace[1]
                .note
                .as_deref()
                .unwrap()
                .contains("saturation reached")
        );
    }

    #[test]
    fn unfireable_rules_stay_in_the_agenda() {
        let kb = kb("a -> b\nx -> y", &["a"]);
        let result = run_forward(&kb, &query(&["b"]));
        assert!(result.success);
        let last = result.trace.last().unwrap();
        assert_eq!(last.agenda, vec![crate::rule::RuleId::new(2).unwrap()]);
    }

    #[test]
    fn self_referential_rule_fires_once_and_terminates() {
        let kb = kb("a -> a", &["a"]);
        let result = run_forward(&kb, &query(&["a"]));
        assert!(result.success);
        assert_eq!(result.fired_rules.len(), 1);
        assert_eq!(result.final_facts, vec![atom("a")]);
        assert!(
            result.trace[1]
                .note
                .as_deref()
                .unwrap()
                .contains("already known")
        );
    }

    #[test]
    fn known_grows_monotonically() {
        let kb = kb("a -> b\nb -> c\nc -> d", &["a"]);
        let result = run_forward(&kb, &query(&["d"]));
        for pair in result.trace.windows(2) {
            let before: BTreeSet<_> = pair[0].known.iter().collect();
            let after: BTreeSet<_> = pair[1].known.iter().collect();
            assert!(before.is_subset(&after));
        }
    }

    #[test]
    fn initial_fact_override_replaces_kb_facts() {
        let kb = kb("x -> y", &["a"]);
        let result = run_forward(
            &kb,
            &ForwardQuery {
                goals: vec![atom("y")],
                initial_facts: Some(vec![atom("x")]),
                ..Default::default()
            },
        );
        assert!(result.success);
        assert!(!result.final_facts.contains(&atom("a")));
    }

    #[test]
    fn index_mode_orders_competing_rules() {
        // Both rules are immediately fireable; min fires R1 first under a
        // queue, max fires R2 first.
        let kb = kb("a -> b\na -> c", &["a"]);
        let min = run_forward(
            &kb,
            &ForwardQuery {
                goals: vec![],
                structure: Structure::Queue,
                index_mode: IndexMode::Min,
                initial_facts: None,
            },
        );
        let max = run_forward(
            &kb,
            &ForwardQuery {
                goals: vec![],
                structure: Structure::Queue,
                index_mode: IndexMode::Max,
                initial_facts: None,
            },
        );
        assert_eq!(
            min.fired_rules.first().unwrap().get(),
            1,
            "queue/min tries the lowest id first"
        );
        assert_eq!(
            max.fired_rules.first().unwrap().get(),
            2,
            "queue/max tries the highest id first"
        );
        assert_eq!(min.final_facts, max.final_facts);
    }
}
