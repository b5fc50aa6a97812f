//! The fixed token alphabet and the regex-engine adapter over it.
//!
//! spec.md §4.1: each token is a closed, kind-only variant exposing a single
//! regex fragment; anchored-run tokens need lookaround to force maximal-run
//! semantics (`Alpha` on `"abc"` must match once, not three times, and two
//! `Alpha` tokens back to back over one run must never both match). The
//! `regex` crate has no lookaround, so the adapter is built on `fancy-regex`
//! instead — see DESIGN.md for the rationale.

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use fancy_regex::Regex;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::SynthesisError;

/// One atomic character-class (or anchor) matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Token {
    Start,
    End,
    Alpha,
    Upper,
    Lower,
    Num,
    Space,
}

impl Token {
    /// The fixed alphabet, in a stable order. Used to enumerate n-tuples
    /// during position synthesis (spec.md §4.2) and as the `ipart` family
    /// (spec.md §4.3).
    pub const ALPHABET: [Token; 7] = [
        Token::Start,
        Token::End,
        Token::Alpha,
        Token::Upper,
        Token::Lower,
        Token::Num,
        Token::Space,
    ];

    /// This token's regex fragment, anchored with lookaround where the
    /// class is a "maximal run" rather than a zero-width anchor.
    ///
    /// `Start`/`End` are the zero-width string-boundary anchors `^`/`$` and
    /// need no lookaround of their own. The five character-class tokens all
    /// follow the same shape: `(?<!class)class+(?!class)`. The `+` alone
    /// would already grab the whole run greedily, but it says nothing about
    /// what sits *outside* the match — without the lookaround, matching
    /// `Alpha` against `"abc"` starting at index 1 would still succeed
    /// (`"bc"`), which is wrong: a run has exactly one maximal match per
    /// position in the string, not one per suffix. The negative lookbehind
    /// `(?<!class)` rules out starting mid-run, and the negative lookahead
    /// `(?!class)` rules out stopping mid-run, so a two-token sequence like
    /// `Alpha, Alpha` can never both match across the same characters —
    /// whichever one claims the run leaves nothing of the same class for
    /// its neighbour.
    pub fn fragment(&self) -> &'static str {
        match self {
            Token::Start => r"^",
            Token::End => r"$",
            Token::Alpha => r"(?<![A-Za-z])[A-Za-z]+(?![A-Za-z])",
            Token::Upper => r"(?<![A-Z])[A-Z]+(?![A-Z])",
            Token::Lower => r"(?<![a-z])[a-z]+(?![a-z])",
            Token::Num => r"(?<!\d)\d+(?!\d)",
            Token::Space => r"(?<! ) +(?! )",
        }
    }
}

/// A non-empty ordered sequence of tokens. Its regex fragment is the
/// concatenation of its tokens' fragments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TokenSeq(Vec<Token>);

impl TokenSeq {
    pub fn new(tokens: Vec<Token>) -> Self {
        assert!(!tokens.is_empty(), "TokenSeq must be non-empty");
        TokenSeq(tokens)
    }

    pub fn single(t: Token) -> Self {
        TokenSeq(vec![t])
    }

    pub fn tokens(&self) -> &[Token] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fragment(&self) -> String {
        self.0.iter().map(|t| t.fragment()).collect()
    }

    /// Concatenate two token sequences (used to join a witnessing left/right
    /// pair, spec.md §4.2, into the global `scan` pattern).
    pub fn concat(&self, other: &TokenSeq) -> TokenSeq {
        let mut v = self.0.clone();
        v.extend(other.0.iter().copied());
        TokenSeq(v)
    }

    /// All n-length tuples over the fixed alphabet, in a stable order.
    pub fn enumerate(n: usize) -> Vec<TokenSeq> {
        fn go(n: usize, acc: &mut Vec<Token>, out: &mut Vec<TokenSeq>) {
            if acc.len() == n {
                out.push(TokenSeq(acc.clone()));
                return;
            }
            for t in Token::ALPHABET {
                acc.push(t);
                go(n, acc, out);
                acc.pop();
            }
        }
        let mut out = Vec::new();
        go(n, &mut Vec::new(), &mut out);
        out
    }
}

/// An ordered sequence of alternative sets of [`TokenSeq`]s: the i-th slot
/// carries every `TokenSeq` that is interchangeable with the witness at that
/// position, for one particular input string (spec.md §4.3).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct RegexList(Vec<BTreeSet<TokenSeq>>);

impl RegexList {
    pub fn new(slots: Vec<BTreeSet<TokenSeq>>) -> Self {
        RegexList(slots)
    }

    pub fn slots(&self) -> &[BTreeSet<TokenSeq>] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Position synthesis compiles a fresh token-sequence pattern for every
// candidate it tries (spec.md §4.2 grows `n` and enumerates every n-tuple of
// the alphabet at each step), so the same fragment string is very likely to
// recur across calls, across examples, and across a whole synthesis run.
// Rather than a fixed set of `lazy_static!` regexes (the teacher's token set
// is closed and small enough to name each one up front), the fragments here
// are built dynamically, so the cache is keyed by the fragment string itself
// and filled lazily the first time each one is seen.
static REGEX_CACHE: Lazy<Mutex<HashMap<String, Regex>>> = Lazy::new(|| Mutex::new(HashMap::new()));

fn compile(pattern: &str) -> Result<Regex, SynthesisError> {
    {
        let cache = REGEX_CACHE.lock().expect("regex cache poisoned");
        if let Some(re) = cache.get(pattern) {
            return Ok(re.clone());
        }
    }
    let re = Regex::new(pattern).map_err(|source| SynthesisError::RegexCompile {
        fragment: pattern.to_string(),
        source,
    })?;
    REGEX_CACHE
        .lock()
        .expect("regex cache poisoned")
        .insert(pattern.to_string(), re.clone());
    Ok(re)
}

/// All non-overlapping matches of `seq` in `s`, left to right, as
/// `(text, start, end)` byte-offset triples.
pub fn scan(s: &str, seq: &TokenSeq) -> Result<Vec<(String, usize, usize)>, SynthesisError> {
    let re = compile(&seq.fragment())?;
    let mut out = Vec::new();
    for m in re.find_iter(s) {
        let m = m.map_err(|source| SynthesisError::RegexCompile {
            fragment: seq.fragment(),
            source,
        })?;
        out.push((m.as_str().to_string(), m.start(), m.end()));
    }
    Ok(out)
}

/// Anchored match at position 0 of `s`.
pub fn match_prefix(s: &str, seq: &TokenSeq) -> Result<Option<(usize, usize)>, SynthesisError> {
    let pattern = format!(r"\A(?:{})", seq.fragment());
    let re = compile(&pattern)?;
    match re
        .find(s)
        .map_err(|source| SynthesisError::RegexCompile { fragment: pattern.clone(), source })?
    {
        Some(m) => Ok(Some((m.start(), m.end()))),
        None => Ok(None),
    }
}

/// The unique match of `seq` anchored at the end of `s`.
pub fn match_suffix(s: &str, seq: &TokenSeq) -> Result<Option<(usize, usize)>, SynthesisError> {
    let pattern = format!(r"(?:{})\z", seq.fragment());
    let re = compile(&pattern)?;
    match re
        .find(s)
        .map_err(|source| SynthesisError::RegexCompile { fragment: pattern.clone(), source })?
    {
        Some(m) => Ok(Some((m.start(), m.end()))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_run_matches_once() {
        let seq = TokenSeq::single(Token::Alpha);
        let matches = scan("abc", &seq).unwrap();
        assert_eq!(matches, vec![("abc".to_string(), 0, 3)]);
    }

    #[test]
    fn alpha_alpha_never_both_match_over_one_run() {
        let seq = TokenSeq::new(vec![Token::Alpha, Token::Alpha]);
        let matches = scan("abc", &seq).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn prefix_and_suffix_anchoring() {
        let num = TokenSeq::single(Token::Num);
        assert_eq!(match_prefix("123abc", &num).unwrap(), Some((0, 3)));
        assert_eq!(match_prefix("abc123", &num).unwrap(), None);
        assert_eq!(match_suffix("abc123", &num).unwrap(), Some((3, 6)));
        assert_eq!(match_suffix("123abc", &num).unwrap(), None);
    }

    #[test]
    fn enumerate_grows_as_alphabet_power() {
        assert_eq!(TokenSeq::enumerate(1).len(), 7);
        assert_eq!(TokenSeq::enumerate(2).len(), 49);
    }
}
