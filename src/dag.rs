//! The per-example DAG and its builder (spec.md §3, §4.5).

use std::collections::{BTreeSet, HashMap};

use crate::config::Config;
use crate::error::SynthesisError;
use crate::expression::{synthesize_substrings, Expression};

/// A node identifier: per-example node indices, concatenated by
/// intersection so a k-way product has k-tuples (spec.md §3 "Node
/// identifiers are tuples").
pub type NodeId = Vec<usize>;

/// An edge `(a, b)` of a [`Dag`].
pub type Edge = (NodeId, NodeId);

/// A directed acyclic graph over `0..=|output|`-style nodes whose
/// source-to-sink paths enumerate candidate programs. Every edge present in
/// `w` has a non-empty expression set — empty sets are pruned eagerly
/// before insertion, so `w.keys()` *is* the edge set (spec.md §3
/// invariants); there is no separate `edges`/`nodes` field to keep in sync.
#[derive(Debug, Clone)]
pub struct Dag {
    pub source: NodeId,
    pub dest: NodeId,
    pub w: HashMap<Edge, BTreeSet<Expression>>,
}

impl Dag {
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.w.keys()
    }

    pub fn edge_count(&self) -> usize {
        self.w.len()
    }

    pub fn nodes(&self) -> BTreeSet<NodeId> {
        let mut out = BTreeSet::new();
        out.insert(self.source.clone());
        out.insert(self.dest.clone());
        for (a, b) in self.w.keys() {
            out.insert(a.clone());
            out.insert(b.clone());
        }
        out
    }
}

/// Build the DAG for a single (input, output) example (spec.md §4.5).
/// Nodes are `0..=|output|`; every edge `(i, j)` carries the constant slice
/// plus every substring expression that can produce `output[i..j]` from
/// `input`.
pub fn build_example_dag(input: &str, output: &str, config: &Config) -> Result<Dag, SynthesisError> {
    let n = output.len();
    let source: NodeId = vec![0];
    let dest: NodeId = vec![n];
    let mut w: HashMap<Edge, BTreeSet<Expression>> = HashMap::new();

    for i in 0..n {
        for j in (i + 1)..=n {
            if !output.is_char_boundary(i) || !output.is_char_boundary(j) {
                continue;
            }
            let slice = &output[i..j];
            let mut exprs: BTreeSet<Expression> = BTreeSet::new();
            exprs.insert(Expression::ConstStr(slice.to_string()));
            exprs.extend(synthesize_substrings(&[input], slice, config)?);
            // Loop candidates are a reserved no-op hook (spec.md §4.5):
            // this core never synthesizes one.
            w.insert((vec![i], vec![j]), exprs);
        }
    }

    tracing::debug!(input_len = input.len(), output_len = n, edges = w.len(), "built example DAG");
    Ok(Dag { source, dest, w })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_output_has_one_node_and_no_edges() {
        let config = Config::default();
        let dag = build_example_dag("anything", "", &config).unwrap();
        assert_eq!(dag.source, dag.dest);
        assert!(dag.w.is_empty());
    }

    #[test]
    fn every_edge_has_nonempty_expression_set() {
        let config = Config::default();
        let dag = build_example_dag("John Smith", "John", &config).unwrap();
        assert!(!dag.w.is_empty());
        for exprs in dag.w.values() {
            assert!(!exprs.is_empty());
        }
    }
}
