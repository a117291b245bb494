//! khet CLI: propositional rule engine.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use khet::atom::Atom;
use khet::graphs::{build_graphs, ChainOutcome, GraphSet};
use khet::infer::{
    run_backward, run_forward, BackwardQuery, ForwardQuery, ForwardResult, IndexMode, Structure,
};
use khet::kb::KnowledgeBase;
use khet::parse;
use khet::seeds::SeedRegistry;

#[derive(Parser)]
#[command(name = "khet", version, about = "Propositional rule engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run forward chaining (data-driven saturation).
    Forward {
        #[command(flatten)]
        source: Source,

        /// Goal atoms, comma-separated (defaults to the seed pack's goals).
        #[arg(long)]
        goals: Option<String>,

        /// Agenda discipline: stack or queue.
        #[arg(long, default_value = "stack")]
        structure: Structure,

        /// Rule-id tie-breaking: min or max.
        #[arg(long, default_value = "min")]
        index_mode: IndexMode,

        /// Print the result as JSON instead of a trace table.
        #[arg(long)]
        json: bool,

        /// Write FPG/RPG DOT files into this directory.
        #[arg(long)]
        graphs_dir: Option<PathBuf>,
    },

    /// Run backward chaining (goal-driven proof search).
    Backward {
        #[command(flatten)]
        source: Source,

        /// Goal atoms, comma-separated (defaults to the seed pack's goals).
        #[arg(long)]
        goals: Option<String>,

        /// Rule-id tie-breaking: min or max.
        #[arg(long, default_value = "min")]
        index_mode: IndexMode,

        /// Print the result as JSON instead of the proof log.
        #[arg(long)]
        json: bool,

        /// Write the FPG DOT file into this directory.
        #[arg(long)]
        graphs_dir: Option<PathBuf>,
    },

    /// Parse a rule source and list its rules.
    Rules {
        #[command(flatten)]
        source: Source,
    },

    /// Inspect bundled seed packs.
    Seed {
        #[command(subcommand)]
        action: SeedAction,
    },

    /// Saturate silently and write FPG/RPG DOT files.
    Graph {
        #[command(flatten)]
        source: Source,

        /// Goal atoms, comma-separated (defaults to the seed pack's goals).
        #[arg(long)]
        goals: Option<String>,

        /// Output directory for the DOT files.
        #[arg(long, default_value = "inference_outputs")]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum SeedAction {
    /// List all bundled seed packs.
    List,
    /// Show one pack's rules, facts and goals.
    Show {
        /// Pack id, e.g. "triangle".
        id: String,
    },
}

/// Where the knowledge base comes from: a rule file or a bundled seed pack.
#[derive(Args)]
struct Source {
    /// Path to a rule file (one `a ^ b -> c` rule per line).
    #[arg(long, conflicts_with = "seed")]
    rules: Option<PathBuf>,

    /// Id of a bundled seed pack (see `khet seed list`).
    #[arg(long)]
    seed: Option<String>,

    /// Override the initial facts, comma-separated.
    #[arg(long)]
    facts: Option<String>,
}

impl Source {
    /// Load the knowledge base plus the pack's default goals, if any.
    fn load(&self) -> Result<(KnowledgeBase, Vec<Atom>)> {
        let (mut kb, default_goals) = match (&self.rules, &self.seed) {
            (Some(path), None) => {
                let text = std::fs::read_to_string(path).into_diagnostic()?;
                let mut kb = KnowledgeBase::named(
                    path.file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_else(|| "rules".into()),
                );
                kb.load_rules_from_text(&text).into_diagnostic()?;
                (kb, Vec::new())
            }
            (None, Some(id)) => {
                let registry = SeedRegistry::bundled();
                let pack = registry.get(id).into_diagnostic()?;
                (pack.to_knowledge_base().into_diagnostic()?, pack.goal_atoms())
            }
            _ => miette::bail!("provide exactly one of --rules <FILE> or --seed <ID>"),
        };
        if let Some(facts) = &self.facts {
            kb.set_facts(parse::split_atoms(facts));
        }
        Ok((kb, default_goals))
    }
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Forward {
            source,
            goals,
            structure,
            index_mode,
            json,
            graphs_dir,
        } => {
            let (kb, default_goals) = source.load()?;
            let query = ForwardQuery {
                goals: resolve_goals(goals.as_deref(), default_goals)?,
                structure,
                index_mode,
                initial_facts: None,
            };
            let result = run_forward(&kb, &query);
            if json {
                println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
            } else {
                print_forward(&result);
            }
            if let Some(dir) = graphs_dir {
                let set = build_graphs(&kb, ChainOutcome::Forward(&result));
                write_graphs(&dir, "forward", &set)?;
            }
        }

        Commands::Backward {
            source,
            goals,
            index_mode,
            json,
            graphs_dir,
        } => {
            let (kb, default_goals) = source.load()?;
            let query = BackwardQuery {
                goals: resolve_goals(goals.as_deref(), default_goals)?,
                index_mode,
                initial_facts: None,
            };
            let result = run_backward(&kb, &query);
            if json {
                println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);
            } else {
                println!("=== Backward inference result ===");
                println!("Goals: {}", atom_list(&result.goals));
                println!("Success: {}", result.success);
                println!("Final known facts: {}", atom_list(&result.final_known));
                println!("Used rules: {}", rule_list(&result.used_rules));
                println!("\nProof:");
                for line in &result.trace {
                    println!("{line}");
                }
            }
            if let Some(dir) = graphs_dir {
                let set = build_graphs(&kb, ChainOutcome::Backward(&result));
                write_graphs(&dir, "backward", &set)?;
            }
        }

        Commands::Rules { source } => {
            let (kb, _) = source.load()?;
            println!("{}", kb.summary());
            for rule in kb.rules() {
                println!("{rule}");
            }
        }

        Commands::Seed { action } => {
            let registry = SeedRegistry::bundled();
            match action {
                SeedAction::List => {
                    for pack in registry.list() {
                        println!(
                            "{:<12} {:<28} {} rule(s) — {}",
                            pack.id,
                            pack.name,
                            pack.rules.len(),
                            pack.description
                        );
                    }
                }
                SeedAction::Show { id } => {
                    let pack = registry.get(&id).into_diagnostic()?;
                    println!("{} v{} — {}", pack.name, pack.version, pack.description);
                    let kb = pack.to_knowledge_base().into_diagnostic()?;
                    for rule in kb.rules() {
                        println!("{rule}");
                    }
                    println!("Facts: {}", pack.facts.join(", "));
                    println!("Goals: {}", pack.goals.join(", "));
                }
            }
        }

        Commands::Graph { source, goals, out } => {
            let (kb, default_goals) = source.load()?;
            let query = ForwardQuery {
                goals: resolve_goals(goals.as_deref(), default_goals)?,
                ..Default::default()
            };
            let result = run_forward(&kb, &query);
            let set = build_graphs(&kb, ChainOutcome::Forward(&result));
            write_graphs(&out, "forward", &set)?;
        }
    }

    Ok(())
}

fn resolve_goals(raw: Option<&str>, default_goals: Vec<Atom>) -> Result<Vec<Atom>> {
    let goals = match raw {
        Some(text) => parse::split_atoms(text),
        None => default_goals,
    };
    if goals.is_empty() {
        miette::bail!("no goals given; pass --goals or use a seed pack with default goals");
    }
    Ok(goals)
}

fn print_forward(result: &ForwardResult) {
    println!("=== Forward inference result ===");
    println!("Goals: {}", atom_list(&result.goals));
    println!("Success: {}", result.success);
    println!("Final facts: {}", atom_list(&result.final_facts));
    println!("Fired rules: {}", rule_list(&result.fired_rules));
    println!("\nStep trace:");
    println!(
        "{:<5} {:<6} {:<32} {:<20} {}",
        "Step", "Rule", "Known", "Agenda", "Fired"
    );
    println!("{}", "-".repeat(90));
    for step in &result.trace {
        let rule = step.rule.map_or_else(|| "-".into(), |id| id.to_string());
        println!(
            "{:<5} {:<6} {:<32} {:<20} {}",
            step.step,
            rule,
            atom_list(&step.known),
            rule_list(&step.agenda),
            rule_list(&step.fired),
        );
        if let Some(note) = &step.note {
            println!("      note: {note}");
        }
    }
}

fn atom_list(atoms: &[Atom]) -> String {
    if atoms.is_empty() {
        return "∅".into();
    }
    atoms
        .iter()
        .map(Atom::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn rule_list(ids: &[khet::rule::RuleId]) -> String {
    if ids.is_empty() {
        return "∅".into();
    }
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_graphs(dir: &Path, mode: &str, set: &GraphSet) -> Result<()> {
    std::fs::create_dir_all(dir).into_diagnostic()?;
    let pairs = [("fpg", set.fpg.as_ref()), ("rpg", set.rpg.as_ref())];
    for (label, descriptor) in pairs {
        let Some(descriptor) = descriptor else {
            continue;
        };
        let path = dir.join(format!("{mode}_{label}.dot"));
        std::fs::write(&path, descriptor.to_dot()).into_diagnostic()?;
        println!("{} graph written to {}", label.to_uppercase(), path.display());
    }
    Ok(())
}
