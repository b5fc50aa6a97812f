//! The intersection algebra (spec.md §4.6): pointwise, closed, defined as a
//! pure function at every level from token sequences up to whole DAGs.

use std::collections::{BTreeSet, HashMap};

use crate::config::Config;
use crate::dag::{Dag, Edge, NodeId};
use crate::error::SynthesisError;
use crate::expression::Expression;
use crate::position::{PosSet, Position};
use crate::token::{RegexList, TokenSeq};

/// Defined only when the two lists have equal length; slot-wise set
/// intersection; any empty slot means failure.
pub fn intersect_regex_list(a: &RegexList, b: &RegexList) -> Option<RegexList> {
    if a.len() != b.len() {
        return None;
    }
    let mut slots = Vec::with_capacity(a.len());
    for (sa, sb) in a.slots().iter().zip(b.slots()) {
        let inter: BTreeSet<TokenSeq> = sa.intersection(sb).cloned().collect();
        if inter.is_empty() {
            return None;
        }
        slots.push(inter);
    }
    Some(RegexList::new(slots))
}

/// `Absolute ∩ Absolute` requires equality; `Regex ∩ Regex` intersects both
/// RegexLists and the occurrence sets, defined iff all three survive.
pub fn intersect_position(a: &Position, b: &Position) -> Option<Position> {
    match (a, b) {
        (Position::Absolute(x), Position::Absolute(y)) => {
            if x == y {
                Some(Position::Absolute(*x))
            } else {
                None
            }
        }
        (
            Position::Regex { left: l1, right: r1, occurrences: o1 },
            Position::Regex { left: l2, right: r2, occurrences: o2 },
        ) => {
            let left = intersect_regex_list(l1, l2)?;
            let right = intersect_regex_list(r1, r2)?;
            let occurrences: BTreeSet<i64> = o1.intersection(o2).cloned().collect();
            if occurrences.is_empty() {
                None
            } else {
                Some(Position::Regex { left, right, occurrences })
            }
        }
        _ => None,
    }
}

/// The union of all pairwise position intersections that are defined.
pub fn intersect_pos_set(a: &PosSet, b: &PosSet) -> PosSet {
    let mut out = BTreeSet::new();
    for pa in a {
        for pb in b {
            if let Some(p) = intersect_position(pa, pb) {
                out.insert(p);
            }
        }
    }
    out
}

/// `ConstStr ∩ ConstStr` requires equality; `Substr ∩ Substr` intersects
/// both position sets; `Loop ∩ Loop` recurses into the body; mixed kinds
/// fail.
pub fn intersect_expression(a: &Expression, b: &Expression) -> Option<Expression> {
    match (a, b) {
        (Expression::ConstStr(x), Expression::ConstStr(y)) => {
            if x == y {
                Some(Expression::ConstStr(x.clone()))
            } else {
                None
            }
        }
        (Expression::Substr(p1, p2), Expression::Substr(q1, q2)) => {
            let r1 = intersect_pos_set(p1, q1);
            let r2 = intersect_pos_set(p2, q2);
            if r1.is_empty() || r2.is_empty() {
                None
            } else {
                Some(Expression::Substr(r1, r2))
            }
        }
        (Expression::Loop(x), Expression::Loop(y)) => {
            intersect_expression(x, y).map(|e| Expression::Loop(Box::new(e)))
        }
        _ => None,
    }
}

fn concat_node(a: &NodeId, b: &NodeId) -> NodeId {
    let mut v = a.clone();
    v.extend(b.iter().copied());
    v
}

/// Product construction (spec.md §4.6): nodes are the Cartesian product of
/// the operands' node identifiers; for every pair of edges, the new edge's
/// expression set is the (pruned) pairwise intersection of the operand
/// edges' expression sets. Associative up to tuple-flattening, so a driver
/// folding many examples left-to-right produces the same program space
/// regardless of fold order.
pub fn intersect_dag(a: &Dag, b: &Dag, config: &Config) -> Result<Dag, SynthesisError> {
    let mut w: HashMap<Edge, BTreeSet<Expression>> = HashMap::new();

    // Every pair of edges, one from each operand, is a candidate edge of the
    // product: `a`'s edge says "this slice of `a`'s output can be produced
    // this way", `b`'s says the same for `b`'s output, and the two combine
    // into one edge of the intersected DAG only if at least one expression
    // survives pairwise intersection. This is the multiplicative step spec.md
    // §5 warns about — `|a.w| * |b.w|` pairs considered — so an edge with
    // nothing surviving is dropped immediately (`continue`) rather than
    // inserted empty and pruned later; the `edges > max_dag_edges` check
    // below still catches a blow-up that makes it past per-pair pruning.
    for (e1, exprs1) in &a.w {
        for (e2, exprs2) in &b.w {
            let mut combined: BTreeSet<Expression> = BTreeSet::new();
            for f1 in exprs1 {
                for f2 in exprs2 {
                    if let Some(f) = intersect_expression(f1, f2) {
                        combined.insert(f);
                    }
                }
            }
            if combined.is_empty() {
                continue;
            }
            let edge = (concat_node(&e1.0, &e2.0), concat_node(&e1.1, &e2.1));
            w.entry(edge).or_default().extend(combined);
        }
    }

    let edges = w.len();
    if edges > config.max_dag_edges {
        tracing::warn!(edges, limit = config.max_dag_edges, "intersected DAG exceeded the configured edge cap");
        return Err(SynthesisError::DagTooLarge { edges, limit: config.max_dag_edges });
    }
    tracing::debug!(edges, "folded one more example into the DAG");

    Ok(Dag {
        source: concat_node(&a.source, &b.source),
        dest: concat_node(&a.dest, &b.dest),
        w,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::build_example_dag;

    #[test]
    fn intersection_is_associative_up_to_tuple_flattening() {
        let config = Config::default();
        let d1 = build_example_dag("John Smith", "Smith", &config).unwrap();
        let d2 = build_example_dag("Mary Jones", "Jones", &config).unwrap();
        let d3 = build_example_dag("Alan Turing", "Turing", &config).unwrap();

        let left = intersect_dag(&intersect_dag(&d1, &d2, &config).unwrap(), &d3, &config).unwrap();
        let right = intersect_dag(&d1, &intersect_dag(&d2, &d3, &config).unwrap(), &config).unwrap();

        // Associativity only promises the same program *space* modulo
        // tuple-flattening, not identical node labels, so compare edge
        // counts and the multiset of expression-set sizes rather than the
        // raw maps.
        assert_eq!(left.edge_count(), right.edge_count());
        let mut left_sizes: Vec<usize> = left.w.values().map(|v| v.len()).collect();
        let mut right_sizes: Vec<usize> = right.w.values().map(|v| v.len()).collect();
        left_sizes.sort_unstable();
        right_sizes.sort_unstable();
        assert_eq!(left_sizes, right_sizes);
    }

    #[test]
    fn no_constructed_edge_has_an_empty_expression_set() {
        let config = Config::default();
        let d1 = build_example_dag("John Smith", "Smith", &config).unwrap();
        let d2 = build_example_dag("Mary Jones", "Jones", &config).unwrap();
        let merged = intersect_dag(&d1, &d2, &config).unwrap();
        for exprs in merged.w.values() {
            assert!(!exprs.is_empty());
        }
    }
}
