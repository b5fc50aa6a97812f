//! Expressions (spec.md §3 `Expression`, §4.4 substring synthesizer).

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::Config;
use crate::error::SynthesisError;
use crate::position::{synthesize_positions, Position, PosSet};

/// Candidates from `set`, `Regex` variants first (in their existing
/// `BTreeSet` order), then `Absolute` variants. `Position`'s derived `Ord`
/// puts `Absolute` first (declaration order), which is the wrong default
/// here: a `Regex` position is the one that generalizes across examples, so
/// evaluation must reach for it before falling back to a fixed offset.
fn ordered_by_generality(set: &PosSet) -> Vec<&Position> {
    let (mut regexes, mut absolutes): (Vec<&Position>, Vec<&Position>) =
        (Vec::new(), Vec::new());
    for p in set {
        match p {
            Position::Regex { .. } => regexes.push(p),
            Position::Absolute(_) => absolutes.push(p),
        }
    }
    regexes.append(&mut absolutes);
    regexes
}

/// A program fragment that, given an input string, produces a piece of the
/// output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Expression {
    /// Always produces the fixed literal.
    ConstStr(String),
    /// Resolves one position from each set against the input and emits the
    /// slice between them.
    Substr(PosSet, PosSet),
    /// Iterative-extraction placeholder. Part of the data model and closed
    /// under intersection (spec.md §4.6) but never synthesized by this
    /// core (spec.md §1 Non-goals).
    Loop(Box<Expression>),
}

impl Expression {
    /// Evaluate this expression against `input`. `None` means the program
    /// fails on this input (spec.md §4.7 / §7): a `Substr` whose chosen
    /// positions don't both resolve, or a `Loop` (never evaluated by this
    /// core).
    pub fn eval(&self, input: &str) -> Result<Option<String>, SynthesisError> {
        match self {
            Expression::ConstStr(s) => Ok(Some(s.clone())),
            Expression::Substr(p1, p2) => {
                // `p1`/`p2` carry every position consistent with every
                // training example, but they are not interchangeable on a
                // fresh input: an `Absolute` position only happens to agree
                // with a `Regex` position when the training inputs share an
                // offset or length by coincidence (e.g. two names of equal
                // length). Trying `Absolute` first would silently prefer
                // that coincidence over the position that actually
                // generalizes, so each side is tried regex-candidates-first.
                for a in ordered_by_generality(p1) {
                    for b in ordered_by_generality(p2) {
                        if let (Some(ia), Some(ib)) = (a.resolve(input)?, b.resolve(input)?) {
                            if ia <= ib {
                                return Ok(Some(input[ia..ib].to_string()));
                            }
                        }
                    }
                }
                Ok(None)
            }
            Expression::Loop(_) => Ok(None),
        }
    }
}

/// All `Substr` expressions that can produce `target` from some input in
/// `inputs` (spec.md §4.4). One expression is synthesized per occurrence of
/// `target`, overlapping occurrences included (advance by 1).
pub fn synthesize_substrings(
    inputs: &[&str],
    target: &str,
    config: &Config,
) -> Result<BTreeSet<Expression>, SynthesisError> {
    let mut out = BTreeSet::new();
    if target.is_empty() {
        return Ok(out);
    }
    for &s in inputs {
        let mut offset = 0usize;
        while offset < s.len() {
            match s[offset..].find(target) {
                None => break,
                Some(rel) => {
                    let begin = offset + rel;
                    let end = begin + target.len();
                    let y1 = synthesize_positions(s, begin, config)?;
                    let y2 = synthesize_positions(s, end, config)?;
                    out.insert(Expression::Substr(y1, y2));
                    offset = begin + 1;
                }
            }
        }
    }
    Ok(out)
}
