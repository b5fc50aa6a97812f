//! Resource-policy knobs.
//!
//! spec.md §5 warns that the product construction underlying
//! [`crate::intersect`] is worst-case multiplicative and recommends bounding
//! it externally with an edge/expression cap. `Config` collects the three
//! knobs this crate exposes for that purpose; the CLI parses them as
//! arguments, but library callers can build one directly.

use clap::Parser;

/// Resource bounds observed by [`crate::learn`] and [`crate::paths`].
#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// Maximum length `n` of a token sequence tried during position
    /// synthesis (spec.md §4.2 / §9 "implementers should still cap n").
    pub max_token_seq_len: usize,
    /// Once an intersected DAG's edge count exceeds this, `learn` aborts
    /// with [`crate::error::SynthesisError::DagTooLarge`] instead of
    /// continuing to fold further examples.
    pub max_dag_edges: usize,
    /// Stop depth-first path enumeration once this many source-to-sink
    /// paths have been found.
    pub max_paths: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_token_seq_len: 3,
            max_dag_edges: 50_000,
            max_paths: 256,
        }
    }
}

/// Command-line form of [`Config`], plus the CLI's own presentation flags.
#[derive(Debug, Parser)]
#[command(name = "substrfill", about = "Learn string-slicing programs from input/output examples")]
pub struct Cli {
    /// Maximum token-sequence length tried during position synthesis.
    #[arg(long, default_value_t = Config::default().max_token_seq_len)]
    pub max_n: usize,

    /// Abort synthesis once the intersected DAG exceeds this many edges.
    #[arg(long, default_value_t = Config::default().max_dag_edges)]
    pub max_dag_edges: usize,

    /// Cap on the number of enumerated source-to-sink paths.
    #[arg(long, default_value_t = Config::default().max_paths)]
    pub max_paths: usize,

    /// Print the chosen program as JSON instead of the default
    /// human-readable form.
    #[arg(long)]
    pub json: bool,

    /// Raise the tracing filter level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn to_config(&self) -> Config {
        Config {
            max_token_seq_len: self.max_n,
            max_dag_edges: self.max_dag_edges,
            max_paths: self.max_paths,
        }
    }
}
