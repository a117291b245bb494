//! Seed packs: bundled sample knowledge bases.
//!
//! A seed pack is a TOML-defined bundle of rule text, starting facts and
//! default goals. Two packs are compiled into the binary: `triangle`
//! (the classic triangle-quantity derivation set) and `mammals` (a small
//! zoo-identification set).

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::atom::Atom;
use crate::error::{KhetResult, SeedError};
use crate::kb::KnowledgeBase;
use crate::parse;

/// A sample pack: rule text plus default facts and goals.
#[derive(Debug, Clone)]
pub struct SeedPack {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: String,
    pub rules: Vec<String>,
    pub facts: Vec<String>,
    pub goals: Vec<String>,
}

impl SeedPack {
    /// Build a fresh knowledge base from this pack.
    pub fn to_knowledge_base(&self) -> KhetResult<KnowledgeBase> {
        let mut kb = KnowledgeBase::named(&self.id);
        for rule in &self.rules {
            kb.add_rule_from_text(rule)?;
        }
        kb.set_facts(self.facts.iter().filter_map(|f| Atom::new(f)));
        Ok(kb)
    }

    /// The pack's default goals as atoms.
    pub fn goal_atoms(&self) -> Vec<Atom> {
        self.goals.iter().filter_map(|g| Atom::new(g)).collect()
    }
}

// ── TOML deserialization helpers ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SeedToml {
    seed: SeedMeta,
    #[serde(default)]
    rules: Vec<String>,
    #[serde(default)]
    facts: Vec<String>,
    #[serde(default)]
    goals: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SeedMeta {
    id: String,
    name: String,
    version: String,
    description: String,
}

// ── Bundled seed packs ──────────────────────────────────────────────────

const TRIANGLE_TOML: &str = include_str!("../data/seeds/triangle/seed.toml");
const MAMMALS_TOML: &str = include_str!("../data/seeds/mammals/seed.toml");

fn parse_seed_toml(toml_str: &str) -> Result<SeedPack, SeedError> {
    let parsed: SeedToml = toml::from_str(toml_str).map_err(|e| SeedError::Parse {
        id: "(unknown)".into(),
        message: e.to_string(),
    })?;
    // Reject packs whose rule text does not parse, so a broken bundle is
    // caught at registry construction rather than mid-run.
    let id = parsed.seed.id.clone();
    parse::parse_rules(&parsed.rules.join("\n")).map_err(|e| SeedError::Parse {
        id: id.clone(),
        message: e.to_string(),
    })?;
    Ok(SeedPack {
        id: parsed.seed.id,
        name: parsed.seed.name,
        version: parsed.seed.version,
        description: parsed.seed.description,
        rules: parsed.rules,
        facts: parsed.facts,
        goals: parsed.goals,
    })
}

fn bundled_packs() -> Vec<SeedPack> {
    [(TRIANGLE_TOML, "triangle"), (MAMMALS_TOML, "mammals")]
        .iter()
        .filter_map(|(toml, id)| match parse_seed_toml(toml) {
            Ok(pack) => Some(pack),
            Err(e) => {
                tracing::warn!(seed = id, "failed to parse bundled seed: {e}");
                None
            }
        })
        .collect()
}

// ── Seed registry ───────────────────────────────────────────────────────

/// Registry of available seed packs.
pub struct SeedRegistry {
    packs: BTreeMap<String, SeedPack>,
}

impl SeedRegistry {
    /// Create a registry holding the bundled packs.
    pub fn bundled() -> Self {
        let packs = bundled_packs()
            .into_iter()
            .map(|pack| (pack.id.clone(), pack))
            .collect();
        Self { packs }
    }

    /// Look up a pack by id.
    pub fn get(&self, id: &str) -> Result<&SeedPack, SeedError> {
        self.packs.get(id).ok_or_else(|| SeedError::NotFound {
            id: id.to_string(),
        })
    }

    /// All packs, ordered by id.
    pub fn list(&self) -> impl Iterator<Item = &SeedPack> {
        self.packs.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_packs_parse() {
        let registry = SeedRegistry::bundled();
        assert_eq!(registry.list().count(), 2);
        assert!(registry.get("triangle").is_ok());
        assert!(registry.get("mammals").is_ok());
        assert!(matches!(
            registry.get("nope"),
            Err(SeedError::NotFound { .. })
        ));
    }

    #[test]
    fn triangle_pack_matches_the_classic_sample() {
        let registry = SeedRegistry::bundled();
        let pack = registry.get("triangle").unwrap();
        let kb = pack.to_knowledge_base().unwrap();
        assert_eq!(kb.rule_count(), 16);
        assert_eq!(kb.facts().len(), 3);
        assert_eq!(pack.goal_atoms(), vec![Atom::new("r").unwrap()]);
    }

    #[test]
    fn mammals_pack_builds() {
        let registry = SeedRegistry::bundled();
        let kb = registry.get("mammals").unwrap().to_knowledge_base().unwrap();
        assert_eq!(kb.rule_count(), 6);
        assert!(kb.facts().contains(&Atom::new("has-hair").unwrap()));
    }
}
