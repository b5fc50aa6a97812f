//! Path enumeration and program evaluation (spec.md §4.7).

use std::collections::{HashMap, HashSet};

use crate::config::Config;
use crate::dag::{Dag, Edge, NodeId};
use crate::error::SynthesisError;
use crate::expression::Expression;

/// A source-to-sink walk through a [`Dag`]: an ordered list of edges. The
/// empty path (no edges) is the valid program for the empty-output
/// boundary case, where `source == dest`.
pub type Path = Vec<Edge>;

/// Depth-first enumeration of every simple source-to-sink path, starting
/// only from edges whose left endpoint is the all-zeros source (spec.md
/// §4.7), shortest (fewest edges) first. Enumeration stops once
/// `config.max_paths` paths have been found; the truncation is logged so
/// it is observable rather than silent (spec.md §8 "no silent caps").
pub fn enumerate_paths(dag: &Dag, config: &Config) -> Vec<Path> {
    let mut results: Vec<Path> = Vec::new();

    if dag.source == dag.dest {
        results.push(Vec::new());
    }

    let mut adjacency: HashMap<NodeId, Vec<Edge>> = HashMap::new();
    for edge in dag.w.keys() {
        adjacency.entry(edge.0.clone()).or_default().push(edge.clone());
    }
    for edges in adjacency.values_mut() {
        edges.sort();
    }

    let mut path = Vec::new();
    let mut visited = HashSet::new();
    visited.insert(dag.source.clone());
    dfs(&dag.source, &dag.dest, &adjacency, &mut path, &mut visited, &mut results, config);

    results.sort_by_key(|p| p.len());
    if results.len() > config.max_paths {
        tracing::debug!(
            found = results.len(),
            cap = config.max_paths,
            "truncating path enumeration at the configured cap"
        );
        results.truncate(config.max_paths);
    }
    results
}

fn dfs(
    current: &NodeId,
    dest: &NodeId,
    adjacency: &HashMap<NodeId, Vec<Edge>>,
    path: &mut Vec<Edge>,
    visited: &mut HashSet<NodeId>,
    results: &mut Vec<Path>,
    config: &Config,
) {
    if results.len() >= config.max_paths {
        return;
    }
    if current == dest {
        if !path.is_empty() {
            results.push(path.clone());
        }
        return;
    }
    let Some(edges) = adjacency.get(current) else { return };
    for edge in edges {
        if results.len() >= config.max_paths {
            return;
        }
        if visited.contains(&edge.1) {
            continue;
        }
        visited.insert(edge.1.clone());
        path.push(edge.clone());
        dfs(&edge.1, dest, adjacency, path, visited, results, config);
        path.pop();
        visited.remove(&edge.1);
    }
}

/// Pick one representative expression per edge of `path` (deterministic:
/// the least element of each edge's ordered expression set) to turn it
/// into a concrete program.
pub fn materialize(dag: &Dag, path: &Path) -> Vec<Expression> {
    path.iter()
        .map(|edge| {
            dag.w
                .get(edge)
                .and_then(|exprs| exprs.iter().next())
                .cloned()
                .expect("every edge in a Dag carries a non-empty expression set")
        })
        .collect()
}

/// Evaluate a materialized program on a fresh input. `None` means the
/// program failed on this input; the caller should fall back to the next
/// path.
pub fn apply(program: &[Expression], input: &str) -> Result<Option<String>, SynthesisError> {
    let mut out = String::new();
    for expr in program {
        match expr.eval(input)? {
            Some(piece) => out.push_str(&piece),
            None => return Ok(None),
        }
    }
    Ok(Some(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::build_example_dag;

    #[test]
    fn paths_are_sorted_shortest_first() {
        let config = Config::default();
        let dag = build_example_dag("John Smith", "John", &config).unwrap();
        let paths = enumerate_paths(&dag, &config);
        assert!(!paths.is_empty());
        for w in paths.windows(2) {
            assert!(w[0].len() <= w[1].len());
        }
    }

    #[test]
    fn empty_output_yields_one_empty_path() {
        let config = Config::default();
        let dag = build_example_dag("anything", "", &config).unwrap();
        let paths = enumerate_paths(&dag, &config);
        assert_eq!(paths, vec![Vec::<Edge>::new()]);
        let program = materialize(&dag, &paths[0]);
        assert_eq!(apply(&program, "anything").unwrap().as_deref(), Some(""));
    }
}
