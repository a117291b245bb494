//! Abstract graph descriptors for visualizing chaining results.
//!
//! Two graphs can be derived from a run: the fact propagation graph (FPG)
//! connects atoms to the rules that consumed and produced them, and the rule
//! precedence graph (RPG, forward-only) orders fired rules by which
//! conclusions fed which premises. Both are pure node/edge data: layout,
//! color and file handling belong to an external renderer, and [`to_dot`]
//! merely serializes the structure for it.
//!
//! [`to_dot`]: GraphDescriptor::to_dot

use std::collections::{BTreeSet, HashMap};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::atom::Atom;
use crate::kb::KnowledgeBase;
use crate::infer::{BackwardResult, ForwardResult};
use crate::rule::{Rule, RuleId};

/// Classification of a node in a chaining graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// An atom present before the run started.
    Given,
    /// An atom produced by a fired/used rule.
    Derived,
    /// An atom the run was asked about.
    Goal,
    /// A rule node.
    Rule,
}

/// A node in a chaining graph: a display id plus its kind tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Atom text, or `R{n}` for rule nodes.
    pub id: String,
    pub kind: NodeKind,
}

/// A directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

/// A pure node/edge description of one chaining graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDescriptor {
    /// `fpg` or `rpg`.
    pub name: String,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

/// The graphs derivable from one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fpg: Option<GraphDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpg: Option<GraphDescriptor>,
}

/// A chaining result to build graphs from.
#[derive(Debug, Clone, Copy)]
pub enum ChainOutcome<'a> {
    Forward(&'a ForwardResult),
    Backward(&'a BackwardResult),
}

/// Build the graph set for a chaining result.
///
/// Forward results yield both FPG and RPG; backward results only the FPG.
/// Rules are resolved against `kb`, which must be the knowledge base the
/// run was executed on.
pub fn build_graphs(kb: &KnowledgeBase, outcome: ChainOutcome<'_>) -> GraphSet {
    match outcome {
        ChainOutcome::Forward(result) => {
            let rules = resolve(kb, &result.fired_rules);
            GraphSet {
                fpg: Some(build_fpg(&rules, &result.final_facts, &result.goals)),
                rpg: Some(build_rpg(&rules)),
            }
        }
        ChainOutcome::Backward(result) => {
            let rules = resolve(kb, &result.used_rules);
            GraphSet {
                fpg: Some(build_fpg(&rules, &result.final_known, &result.goals)),
                rpg: None,
            }
        }
    }
}

fn resolve<'a>(kb: &'a KnowledgeBase, ids: &[RuleId]) -> Vec<&'a Rule> {
    ids.iter().filter_map(|&id| kb.rule(id)).collect()
}

/// Fact propagation graph: premise → rule → conclusion for every fired/used
/// rule, with atoms classified as given, derived or goal.
fn build_fpg(rules: &[&Rule], final_facts: &[Atom], goals: &[Atom]) -> GraphDescriptor {
    let goal_set: BTreeSet<&Atom> = goals.iter().collect();
    let derived: BTreeSet<&Atom> = rules.iter().map(|rule| &rule.conclusion).collect();

    let classify = |atom: &Atom| {
        if goal_set.contains(atom) {
            NodeKind::Goal
        } else if derived.contains(atom) {
            NodeKind::Derived
        } else {
            NodeKind::Given
        }
    };

    let mut builder = Builder::new("fpg");

    // Given facts that no fired rule touches still belong to the picture:
    // they are the run's starting point.
    for atom in final_facts {
        builder.node(atom.as_str(), classify(atom));
    }
    for goal in goals {
        builder.node(goal.as_str(), NodeKind::Goal);
    }
    for rule in rules {
        let rule_node = builder.node(&rule.id.to_string(), NodeKind::Rule);
        for premise in &rule.premises {
            let premise_node = builder.node(premise.as_str(), classify(premise));
            builder.edge(premise_node, rule_node);
        }
        let conclusion = builder.node(rule.conclusion.as_str(), classify(&rule.conclusion));
        builder.edge(rule_node, conclusion);
    }

    builder.finish()
}

/// Rule precedence graph: fired rules in firing order, an edge where an
/// earlier rule's conclusion was a premise of a later one.
fn build_rpg(fired: &[&Rule]) -> GraphDescriptor {
    let mut builder = Builder::new("rpg");

    let indices: Vec<NodeIndex> = fired
        .iter()
        .map(|rule| builder.node(&rule.id.to_string(), NodeKind::Rule))
        .collect();

    for (i, earlier) in fired.iter().enumerate() {
        for (j, later) in fired.iter().enumerate().skip(i + 1) {
            if later.premises.contains(&earlier.conclusion) {
                builder.edge(indices[i], indices[j]);
            }
        }
    }

    builder.finish()
}

/// Deduplicating graph builder over a petgraph `DiGraph`.
struct Builder {
    name: &'static str,
    graph: DiGraph<GraphNode, ()>,
    index: HashMap<String, NodeIndex>,
}

impl Builder {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            graph: DiGraph::new(),
            index: HashMap::new(),
        }
    }

    fn node(&mut self, id: &str, kind: NodeKind) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode {
            id: id.to_string(),
            kind,
        });
        self.index.insert(id.to_string(), idx);
        idx
    }

    fn edge(&mut self, from: NodeIndex, to: NodeIndex) {
        if !self.graph.contains_edge(from, to) {
            self.graph.add_edge(from, to, ());
        }
    }

    fn finish(self) -> GraphDescriptor {
        let nodes = self
            .graph
            .node_indices()
            .map(|idx| self.graph[idx].clone())
            .collect();
        let edges = self
            .graph
            .edge_references()
            .map(|edge| GraphEdge {
                from: self.graph[edge.source()].id.clone(),
                to: self.graph[edge.target()].id.clone(),
            })
            .collect();
        GraphDescriptor {
            name: self.name.to_string(),
            nodes,
            edges,
        }
    }
}

impl GraphDescriptor {
    /// Serialize as Graphviz DOT text.
    ///
    /// Emits structure only: labels, a box shape for rule nodes, and a
    /// `kind` attribute the renderer can map to its own styling.
    pub fn to_dot(&self) -> String {
        let mut out = format!("digraph {} {{\n", self.name);
        for node in &self.nodes {
            let shape = match node.kind {
                NodeKind::Rule => "box",
                _ => "ellipse",
            };
            let kind = match node.kind {
                NodeKind::Given => "given",
                NodeKind::Derived => "derived",
                NodeKind::Goal => "goal",
                NodeKind::Rule => "rule",
            };
            out.push_str(&format!(
                "  \"{}\" [shape={shape}, kind=\"{kind}\"];\n",
                escape(&node.id)
            ));
        }
        for edge in &self.edges {
            out.push_str(&format!(
                "  \"{}\" -> \"{}\";\n",
                escape(&edge.from),
                escape(&edge.to)
            ));
        }
        out.push_str("}\n");
        out
    }
}

fn escape(id: &str) -> String {
    id.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infer::{run_backward, run_forward, BackwardQuery, ForwardQuery};

    fn atom(s: &str) -> Atom {
        Atom::new(s).unwrap()
    }

    fn kb() -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        kb.load_rules_from_text("a -> b\nb -> c\nx -> y").unwrap();
        kb.set_facts([atom("a")]);
        kb
    }

    fn forward_set() -> GraphSet {
        let kb = kb();
        let result = run_forward(
            &kb,
            &ForwardQuery {
                goals: vec![atom("c")],
                ..Default::default()
            },
        );
        build_graphs(&kb, ChainOutcome::Forward(&result))
    }

    #[test]
    fn forward_yields_both_graphs() {
        let set = forward_set();
        assert!(set.fpg.is_some());
        assert!(set.rpg.is_some());
    }

    #[test]
    fn fpg_classifies_atoms() {
        let fpg = forward_set().fpg.unwrap();
        let kind_of = |id: &str| {
            fpg.nodes
                .iter()
                .find(|node| node.id == id)
                .map(|node| node.kind)
        };
        assert_eq!(kind_of("a"), Some(NodeKind::Given));
        assert_eq!(kind_of("b"), Some(NodeKind::Derived));
        assert_eq!(kind_of("c"), Some(NodeKind::Goal));
        assert_eq!(kind_of("R1"), Some(NodeKind::Rule));
        // The unfired rule R3 and its atoms stay out of the picture.
        assert_eq!(kind_of("R3"), None);
        assert_eq!(kind_of("x"), None);
    }

    #[test]
    fn fpg_edges_run_premise_to_rule_to_conclusion() {
        let fpg = forward_set().fpg.unwrap();
        let has = |from: &str, to: &str| {
            fpg.edges
                .iter()
                .any(|edge| edge.from == from && edge.to == to)
        };
        assert!(has("a", "R1"));
        assert!(has("R1", "b"));
        assert!(has("b", "R2"));
        assert!(has("R2", "c"));
    }

    #[test]
    fn rpg_orders_fired_rules() {
        let rpg = forward_set().rpg.unwrap();
        assert_eq!(rpg.nodes.len(), 2, "only fired rules appear");
        assert_eq!(rpg.edges.len(), 1);
        assert_eq!(rpg.edges[0].from, "R1");
        assert_eq!(rpg.edges[0].to, "R2");
    }

    #[test]
    fn backward_yields_fpg_only() {
        let kb = kb();
        let result = run_backward(
            &kb,
            &BackwardQuery {
                goals: vec![atom("c")],
                ..Default::default()
            },
        );
        let set = build_graphs(&kb, ChainOutcome::Backward(&result));
        assert!(set.fpg.is_some());
        assert!(set.rpg.is_none());
    }

    #[test]
    fn dot_output_contains_nodes_and_edges() {
        let fpg = forward_set().fpg.unwrap();
        let dot = fpg.to_dot();
        assert!(dot.starts_with("digraph fpg {"));
        assert!(dot.contains("\"R1\" [shape=box"));
        assert!(dot.contains("\"a\" -> \"R1\";"));
        assert!(dot.ends_with("}\n"));
    }
}
