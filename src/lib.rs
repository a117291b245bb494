//! # khet
//!
//! A propositional rule engine with two classical reasoning strategies:
//! forward chaining (data-driven saturation) and backward chaining
//! (goal-driven proof search), both with deterministic tie-breaking and
//! step-by-step replay traces.
//!
//! ## Architecture
//!
//! - **Knowledge base** (`kb`, `rule`, `atom`): rules + working fact set
//! - **Inference** (`infer`): agenda-driven forward chainer, cycle-guarded
//!   backward chainer
//! - **Graphs** (`graphs`): abstract FPG/RPG descriptors for external
//!   renderers
//! - **Parsing** (`parse`): rule-text boundary (`a ^ b -> c`)
//! - **Seed packs** (`seeds`): bundled TOML sample knowledge bases
//!
//! ## Library usage
//!
//! ```
//! use khet::atom::Atom;
//! use khet::infer::{run_forward, ForwardQuery};
//! use khet::kb::KnowledgeBase;
//!
//! let mut kb = KnowledgeBase::new();
//! kb.load_rules_from_text("a ^ b -> c\nc -> d").unwrap();
//! kb.set_facts([Atom::new("a").unwrap(), Atom::new("b").unwrap()]);
//!
//! let result = run_forward(
//!     &kb,
//!     &ForwardQuery {
//!         goals: vec![Atom::new("d").unwrap()],
//!         ..Default::default()
//!     },
//! );
//! assert!(result.success);
//! ```

pub mod atom;
pub mod error;
pub mod graphs;
pub mod infer;
pub mod kb;
pub mod parse;
pub mod rule;
pub mod seeds;
