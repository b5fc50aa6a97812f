//! Position expressions and the position synthesizer (spec.md §4.2, §4.3).

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::Config;
use crate::error::SynthesisError;
use crate::token::{self, Token, TokenSeq, RegexList};

/// A specification locating one index in a string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Position {
    /// A fixed offset; negative means "from the end": resolved index is
    /// `len + idx + 1` when `idx < 0`.
    Absolute(i64),
    /// The position between `left` (matching immediately before the cut)
    /// and `right` (matching immediately after), at the `i`-th occurrence
    /// for some `i` in `occurrences` (positive = from the left, negative =
    /// from the right).
    Regex {
        left: RegexList,
        right: RegexList,
        occurrences: BTreeSet<i64>,
    },
}

pub type PosSet = BTreeSet<Position>;

impl Position {
    /// Resolve this position against a (possibly different) string,
    /// returning `None` if it does not locate an index in `s`.
    pub fn resolve(&self, s: &str) -> Result<Option<usize>, SynthesisError> {
        match self {
            Position::Absolute(idx) => {
                let resolved = if *idx < 0 { s.len() as i64 + idx + 1 } else { *idx };
                if resolved < 0 || resolved as usize > s.len() || !s.is_char_boundary(resolved as usize) {
                    Ok(None)
                } else {
                    Ok(Some(resolved as usize))
                }
            }
            Position::Regex { left, right, occurrences } => {
                let matches = regex_match_positions(s, left, right)?;
                if matches.is_empty() {
                    return Ok(None);
                }
                let m = matches.len() as i64;
                for &occ in occurrences {
                    let idx = if occ >= 0 { occ } else { m + occ };
                    if idx >= 0 && (idx as usize) < matches.len() {
                        return Ok(Some(matches[idx as usize]));
                    }
                }
                Ok(None)
            }
        }
    }
}

/// All indices `i` in `s` such that some alternative of `left` matches
/// ending at `i` and some alternative of `right` matches starting at `i`.
fn regex_match_positions(s: &str, left: &RegexList, right: &RegexList) -> Result<Vec<usize>, SynthesisError> {
    let mut out = Vec::new();
    for i in 0..=s.len() {
        if !s.is_char_boundary(i) {
            continue;
        }
        let before = &s[..i];
        let after = &s[i..];
        let left_ok = any_matches_end(before, left)?;
        let right_ok = left_ok && any_matches_start(after, right)?;
        if right_ok {
            out.push(i);
        }
    }
    Ok(out)
}

/// Every concatenation that chooses one alternative per slot (concatenation
/// semantics: match the first alternative, then the second, …). Slots are
/// small (bounded by the fixed `ipart` family), so the full product is
/// cheap.
fn candidate_sequences(rl: &RegexList) -> Vec<TokenSeq> {
    let mut out: Vec<Vec<Token>> = vec![Vec::new()];
    for slot in rl.slots() {
        let mut next = Vec::new();
        for prefix in &out {
            for alt in slot {
                let mut v = prefix.clone();
                v.extend(alt.tokens().iter().copied());
                next.push(v);
            }
        }
        out = next;
        if out.is_empty() {
            break;
        }
    }
    out.into_iter().filter(|v| !v.is_empty()).map(TokenSeq::new).collect()
}

fn any_matches_end(s: &str, rl: &RegexList) -> Result<bool, SynthesisError> {
    for seq in candidate_sequences(rl) {
        if token::match_suffix(s, &seq)?.is_some() {
            return Ok(true);
        }
    }
    Ok(false)
}

fn any_matches_start(s: &str, rl: &RegexList) -> Result<bool, SynthesisError> {
    for seq in candidate_sequences(rl) {
        if token::match_prefix(s, &seq)?.is_some() {
            return Ok(true);
        }
    }
    Ok(false)
}

/// The fixed `ipart` family (spec.md §4.3): one singleton `TokenSeq` per
/// token kind. Structurally this is per-input-string in the spec's
/// wording, but the family itself never varies with the string — a hook
/// left for a future implementation that learns multi-token equivalents.
pub fn iparts() -> [TokenSeq; 7] {
    [
        TokenSeq::single(Token::Num),
        TokenSeq::single(Token::Alpha),
        TokenSeq::single(Token::Start),
        TokenSeq::single(Token::End),
        TokenSeq::single(Token::Space),
        TokenSeq::single(Token::Upper),
        TokenSeq::single(Token::Lower),
    ]
}

/// Turn a witness token sequence into a [`RegexList`] whose i-th slot holds
/// every `ipart` that contains `r`'s i-th token (currently: exactly the one
/// singleton equal to it).
fn generalize(r: &TokenSeq) -> RegexList {
    let parts = iparts();
    let slots = r
        .tokens()
        .iter()
        .map(|t| {
            parts
                .iter()
                .filter(|p| p.tokens().contains(t))
                .cloned()
                .collect::<BTreeSet<_>>()
        })
        .collect();
    RegexList::new(slots)
}

/// All position expressions that locate index `k` in `s` (spec.md §4.2).
/// Always includes the two absolute positions; regex positions are found
/// by growing the candidate token-sequence length up to
/// `config.max_token_seq_len`, stopping early once a length yields no
/// witnessing sequence on either side.
pub fn synthesize_positions(s: &str, k: usize, config: &Config) -> Result<PosSet, SynthesisError> {
    assert!(k <= s.len());
    let mut result: PosSet = BTreeSet::new();
    let n = s.len() as i64;
    let kk = k as i64;
    // The two absolute positions always qualify (spec.md §4.2, testable
    // property 4: the result set is never empty), one counting from the
    // left and one from the right. `-(n - k + 1)` is the right-offset
    // convention of spec.md §4.2: resolving a negative `idx` is
    // `len + idx + 1`, so plugging this back in gives
    // `n + (-(n - k + 1)) + 1 = k`, i.e. it really does locate the same cut.
    result.insert(Position::Absolute(kk));
    result.insert(Position::Absolute(-(n - kk + 1)));

    let before = &s[..k];
    let after = &s[k..];

    // Grow the candidate token-sequence length `n` starting at 1 (spec.md
    // §4.2 step 1-3). A "left candidate" is a sequence that matches the
    // suffix of everything before the cut (it ends exactly at `k`); a
    // "right candidate" matches the prefix of everything after the cut (it
    // starts exactly at `k`). Recording both independently, rather than
    // only sequences that do both, lets every left candidate pair with
    // every right candidate below, which is what actually witnesses a cut:
    // neither half alone locates `k`, only the pair does. Growth stops the
    // first round that produces nothing on either side, since maximal-run
    // tokens make longer sequences strictly harder to match, never easier.
    let mut left_witnesses: Vec<(TokenSeq, usize)> = Vec::new();
    let mut right_witnesses: Vec<(TokenSeq, usize)> = Vec::new();

    for len in 1..=config.max_token_seq_len {
        let mut matched_this_round = false;
        for cand in TokenSeq::enumerate(len) {
            if let Some((start, _end)) = token::match_suffix(before, &cand)? {
                left_witnesses.push((cand.clone(), start));
                matched_this_round = true;
            }
            if let Some((_start, end)) = token::match_prefix(after, &cand)? {
                right_witnesses.push((cand.clone(), k + end));
                matched_this_round = true;
            }
        }
        if !matched_this_round {
            break;
        }
    }

    // For every (left, right) pair, scan the concatenation globally: this
    // finds every place in `s` where the same two-part pattern matches, not
    // just the one at `k`. The occurrence that starts at `lstart` and ends
    // at `rend` is the one that actually witnesses this cut; its rank among
    // all matches (0-indexed from the left) is recorded alongside its rank
    // from the right, so a later intersection with another example's
    // witness set has both directions available to agree on.
    for (lseq, lstart) in &left_witnesses {
        for (rseq, rend) in &right_witnesses {
            let combined = lseq.concat(rseq);
            let matches = token::scan(s, &combined)?;
            for (rank, (_text, mstart, mend)) in matches.iter().enumerate() {
                if mstart == lstart && mend == rend {
                    let m = matches.len() as i64;
                    let i = rank as i64;
                    let mut occurrences = BTreeSet::new();
                    occurrences.insert(i);
                    occurrences.insert(-(m - i));
                    result.insert(Position::Regex {
                        left: generalize(lseq),
                        right: generalize(rseq),
                        occurrences,
                    });
                }
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completeness_always_includes_absolutes() {
        let config = Config::default();
        let s = "John Smith";
        for k in 0..=s.len() {
            let set = synthesize_positions(s, k, &config).unwrap();
            assert!(!set.is_empty());
            assert!(set.contains(&Position::Absolute(k as i64)));
        }
    }

    #[test]
    fn regex_position_resolves_back_to_k() {
        let config = Config::default();
        let s = "John Smith";
        let k = 5; // boundary right after the space, start of "Smith"
        let set = synthesize_positions(s, k, &config).unwrap();
        let found = set.iter().any(|p| matches!(
            p,
            Position::Regex { .. }
        ) && p.resolve(s).unwrap() == Some(k));
        assert!(found);
    }
}
