//! Inference: forward (data-driven) and backward (goal-driven) chaining.
//!
//! Both chainers are pure, synchronous computations over an exclusively
//! owned [`KnowledgeBase`](crate::kb::KnowledgeBase): no I/O, no suspension
//! points, no shared mutable state. A host may run many invocations
//! concurrently as long as each gets its own knowledge base.
//!
//! Non-success is data, not an error: a goal the rules cannot reach yields
//! `success = false` plus a trace that explains why.

pub mod agenda;
pub mod backward;
pub mod forward;

pub use backward::run_backward;
pub use forward::run_forward;

use serde::{Deserialize, Serialize};

use crate::atom::Atom;
use crate::rule::RuleId;

/// Agenda container discipline for forward chaining.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Structure {
    /// LIFO: the scan starts from the back of the sorted agenda.
    Stack,
    /// FIFO: the scan starts from the front of the sorted agenda.
    Queue,
}

impl std::fmt::Display for Structure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Structure::Stack => write!(f, "stack"),
            Structure::Queue => write!(f, "queue"),
        }
    }
}

impl std::str::FromStr for Structure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stack" => Ok(Structure::Stack),
            "queue" => Ok(Structure::Queue),
            other => Err(format!("structure must be `stack` or `queue`, got {other:?}")),
        }
    }
}

/// Rule-id tie-breaking direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexMode {
    /// Lowest ids first: the agenda sorts ascending, candidate rules try
    /// ascending.
    Min,
    /// Highest ids first.
    Max,
}

impl std::fmt::Display for IndexMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexMode::Min => write!(f, "min"),
            IndexMode::Max => write!(f, "max"),
        }
    }
}

impl std::str::FromStr for IndexMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(IndexMode::Min),
            "max" => Ok(IndexMode::Max),
            other => Err(format!("index mode must be `min` or `max`, got {other:?}")),
        }
    }
}

/// Options for one forward-chaining run.
#[derive(Debug, Clone)]
pub struct ForwardQuery {
    /// Goal atoms checked against the saturated fact set.
    pub goals: Vec<Atom>,
    /// Agenda discipline (default: stack).
    pub structure: Structure,
    /// Tie-breaking direction (default: min).
    pub index_mode: IndexMode,
    /// Override the knowledge base's fact set as the starting point.
    pub initial_facts: Option<Vec<Atom>>,
}

impl Default for ForwardQuery {
    fn default() -> Self {
        Self {
            goals: Vec::new(),
            structure: Structure::Stack,
            index_mode: IndexMode::Min,
            initial_facts: None,
        }
    }
}

/// Options for one backward-chaining run.
#[derive(Debug, Clone)]
pub struct BackwardQuery {
    /// Goal atoms to prove, each attempted independently.
    pub goals: Vec<Atom>,
    /// Candidate-rule tie-breaking direction (default: min).
    pub index_mode: IndexMode,
    /// Override the knowledge base's fact set as the starting point.
    pub initial_facts: Option<Vec<Atom>>,
}

impl Default for BackwardQuery {
    fn default() -> Self {
        Self {
            goals: Vec::new(),
            index_mode: IndexMode::Min,
            initial_facts: None,
        }
    }
}

/// One recorded forward-chaining step.
///
/// Snapshots are taken after the step's effect: `known` includes the fired
/// rule's conclusion, `agenda` no longer contains the fired rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardStep {
    /// Step index; 0 is the pre-run snapshot.
    pub step: usize,
    /// The rule fired at this step, `None` for the initial and final records.
    pub rule: Option<RuleId>,
    /// Ids still pending, in pop order.
    pub agenda: Vec<RuleId>,
    /// Known facts after this step, sorted.
    pub known: Vec<Atom>,
    /// Ids fired so far, in firing order.
    pub fired: Vec<RuleId>,
    /// Optional human-readable note.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Outcome of a forward-chaining run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardResult {
    /// Whether every goal is contained in the saturated fact set.
    pub success: bool,
    /// The goals the run was asked about, sorted.
    pub goals: Vec<Atom>,
    /// The saturated fact set, sorted.
    pub final_facts: Vec<Atom>,
    /// Rules fired, in firing order.
    pub fired_rules: Vec<RuleId>,
    /// Step-by-step replay log.
    pub trace: Vec<ForwardStep>,
}

/// Outcome of a backward-chaining run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackwardResult {
    /// Whether every goal was proven.
    pub success: bool,
    /// The goals the run was asked to prove, in request order.
    pub goals: Vec<Atom>,
    /// Initial facts plus every memoized proven atom, sorted.
    pub final_known: Vec<Atom>,
    /// Rules whose derivation succeeded, in first-use order.
    pub used_rules: Vec<RuleId>,
    /// Proof log, one line per decision.
    pub trace: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_round_trips_through_strings() {
        assert_eq!("stack".parse::<Structure>().unwrap(), Structure::Stack);
        assert_eq!("QUEUE".parse::<Structure>().unwrap(), Structure::Queue);
        assert_eq!(Structure::Stack.to_string(), "stack");
        assert!("pile".parse::<Structure>().is_err());
    }

    #[test]
    fn index_mode_round_trips_through_strings() {
        assert_eq!("min".parse::<IndexMode>().unwrap(), IndexMode::Min);
        assert_eq!(" max ".parse::<IndexMode>().unwrap(), IndexMode::Max);
        assert!("median".parse::<IndexMode>().is_err());
    }

    #[test]
    fn options_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&Structure::Queue).unwrap(), "\"queue\"");
        assert_eq!(serde_json::to_string(&IndexMode::Max).unwrap(), "\"max\"");
    }
}
