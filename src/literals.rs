// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use aho_corasick::{AhoCorasick, MatchKind};
use memchr::{memchr, memmem};

use crate::nfa::{Cond, Nfa, StateIdx};

const NUM_PREFIX_LIMIT: usize = 30;
const PREFIX_LENGTH_LIMIT: usize = 15;
const CLASS_EXPANSION_LIMIT: u32 = 4;
// Caps total extraction work, since alternation branches multiply.
const VISIT_LIMIT: usize = 10_000;

/// The set of alternate literal prefixes extracted from an automaton.
///
/// `at_match` is true when every literal spells out a complete path to the
/// accepting state, in which case finding a literal *is* finding a match.
pub struct AlternateLiterals {
    at_match: bool,
    literals: Vec<Vec<u8>>,
}

/// Extracts the mandatory literal prefixes of an automaton.
///
/// Walks forward from the start state through zero-width transitions,
/// extending every alternate with literal bytes and small ASCII classes.
/// Assertions, unbounded constructs and over-large alternations stop the
/// walk; whatever was collected so far remains a valid (incomplete) prefix.
pub fn prefixes(nfa: &Nfa) -> Literals {
    let mut w = Walker {
        nfa,
        visits: 0,
    };
    let mut on_path = vec![false; nfa.num_states()];
    let (literals, at_match) = w.alternates(nfa.start, 0, &mut on_path);
    AlternateLiterals {
        at_match,
        literals,
    }
    .into_matcher()
}

struct Walker<'a> {
    nfa: &'a Nfa,
    visits: usize,
}

impl<'a> Walker<'a> {
    // Returns the literal strings spelled along every path from `sid`
    // forward, plus whether all of them reach the accepting state. An empty
    // literal set means "no usable prefix through here".
    fn alternates(
        &mut self,
        sid: StateIdx,
        depth: usize,
        on_path: &mut Vec<bool>,
    ) -> (Vec<Vec<u8>>, bool) {
        self.visits += 1;
        if self.visits > VISIT_LIMIT || on_path[sid as usize] {
            return (vec![], false);
        }
        if sid == self.nfa.accept {
            return (vec![vec![]], true);
        }
        if depth > PREFIX_LENGTH_LIMIT {
            // Stop extending but keep what the callers collected.
            return (vec![vec![]], false);
        }
        on_path[sid as usize] = true;
        let mut all: Vec<Vec<u8>> = vec![];
        let mut complete = true;
        let nfa = self.nfa;
        for edge in &nfa.state(sid).edges {
            let (mut lits, comp) = match edge.cond {
                Cond::Epsilon | Cond::GroupStart(_) | Cond::GroupEnd(_) => {
                    self.alternates(edge.to, depth, on_path)
                }
                Cond::Char(b) => {
                    let (sub, comp) = self.alternates(edge.to, depth + 1, on_path);
                    if sub.is_empty() {
                        // The walk stopped past this byte; the byte itself
                        // is still a mandatory prefix.
                        (vec![vec![b]], false)
                    } else {
                        (prepend(b, sub), comp)
                    }
                }
                Cond::Class(ref cls) => {
                    let bytes = small_ascii_class(cls);
                    match bytes {
                        None => (vec![], false),
                        Some(bytes) => {
                            let (sub, comp) = self.alternates(edge.to, depth + 1, on_path);
                            let mut lits = vec![];
                            for b in bytes {
                                if sub.is_empty() {
                                    lits.push(vec![b]);
                                } else {
                                    lits.extend(prepend(b, sub.clone()));
                                }
                            }
                            let comp = comp && !sub.is_empty();
                            (lits, comp)
                        }
                    }
                }
                Cond::AnyChar | Cond::AssertStart | Cond::AssertEnd => (vec![], false),
            };
            if lits.is_empty() {
                // One alternative without a literal prefix poisons the
                // whole state.
                on_path[sid as usize] = false;
                return (vec![], false);
            }
            complete = complete && comp;
            all.append(&mut lits);
            if all.len() > NUM_PREFIX_LIMIT {
                on_path[sid as usize] = false;
                return (vec![], false);
            }
        }
        on_path[sid as usize] = false;
        (all, complete)
    }
}

fn prepend(b: u8, subs: Vec<Vec<u8>>) -> Vec<Vec<u8>> {
    if subs.is_empty() {
        return vec![];
    }
    subs.into_iter()
        .map(|mut s| {
            s.insert(0, b);
            s
        })
        .collect()
}

// A non-negated class entirely below 0x80 with at most a handful of
// members expands into per-byte alternates; anything else is not a literal.
fn small_ascii_class(cls: &crate::nfa::ClassRanges) -> Option<Vec<u8>> {
    if cls.is_negated() {
        return None;
    }
    let mut total = 0u32;
    for &(s, e) in cls.ranges() {
        if e > 0x7F {
            return None;
        }
        total += e - s + 1;
        if total > CLASS_EXPANSION_LIMIT {
            return None;
        }
    }
    let mut bytes = vec![];
    for &(s, e) in cls.ranges() {
        for b in s..=e {
            bytes.push(b as u8);
        }
    }
    Some(bytes)
}

impl AlternateLiterals {
    pub fn into_matcher(self) -> Literals {
        if self.literals.is_empty() || self.literals.iter().any(|l| l.is_empty()) {
            return Literals::empty();
        }
        let at_match = self.at_match;
        let matcher = LiteralMatcher::new(self.literals);
        Literals { at_match, matcher }
    }
}

/// A prefix extracted from a compiled regular expression, with a matcher
/// tiered by shape: a single byte uses `memchr`, a set of single bytes a
/// sparse table, one multi-byte literal a substring search, and a true
/// alternation an Aho-Corasick automaton built for leftmost-longest
/// matches (the engine's own policy).
pub struct Literals {
    at_match: bool,
    matcher: LiteralMatcher,
}

enum LiteralMatcher {
    /// No prefixes. Never advances through the input.
    Empty,
    /// A single byte.
    Byte(u8),
    /// A set of two or more single bytes.
    Bytes { sparse: Vec<bool> },
    /// A single multi-byte literal.
    Single(Vec<u8>),
    /// An automaton over alternate literals.
    Automaton(AhoCorasick),
}

impl LiteralMatcher {
    fn new(literals: Vec<Vec<u8>>) -> LiteralMatcher {
        if literals.len() == 1 && literals[0].len() == 1 {
            return LiteralMatcher::Byte(literals[0][0]);
        }
        if literals.iter().all(|l| l.len() == 1) {
            let mut sparse = vec![false; 256];
            for l in &literals {
                sparse[l[0] as usize] = true;
            }
            return LiteralMatcher::Bytes { sparse };
        }
        if literals.len() == 1 {
            let mut lits = literals;
            return LiteralMatcher::Single(lits.pop().unwrap_or_default());
        }
        match AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .build(&literals)
        {
            Ok(aut) => LiteralMatcher::Automaton(aut),
            Err(_) => LiteralMatcher::Empty,
        }
    }
}

impl Literals {
    /// Returns a matcher that never matches and never advances the input.
    pub fn empty() -> Literals {
        Literals {
            at_match: false,
            matcher: LiteralMatcher::Empty,
        }
    }

    /// True iff a literal match corresponds to a match of the whole regex.
    pub fn at_match(&self) -> bool {
        self.at_match
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.matcher, LiteralMatcher::Empty)
    }

    /// Finds the position of a prefix in `haystack` if one exists.
    ///
    /// The engines only need the starting index to skip ahead, but the end
    /// is returned too for the case where the prefix is the entire regex.
    pub fn find(&self, haystack: &[u8]) -> Option<(usize, usize)> {
        match self.matcher {
            LiteralMatcher::Empty => None,
            LiteralMatcher::Byte(b) => memchr(b, haystack).map(|i| (i, i + 1)),
            LiteralMatcher::Bytes { ref sparse } => haystack
                .iter()
                .position(|&b| sparse[b as usize])
                .map(|i| (i, i + 1)),
            LiteralMatcher::Single(ref lit) => {
                memmem::find(haystack, lit).map(|i| (i, i + lit.len()))
            }
            LiteralMatcher::Automaton(ref aut) => {
                aut.find(haystack).map(|m| (m.start(), m.end()))
            }
        }
    }
}

impl fmt::Debug for Literals {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.matcher {
            LiteralMatcher::Empty => "Empty",
            LiteralMatcher::Byte(_) => "Byte",
            LiteralMatcher::Bytes { .. } => "Bytes",
            LiteralMatcher::Single(_) => "Single",
            LiteralMatcher::Automaton(_) => "Automaton",
        };
        write!(f, "Literals({}, at_match: {})", kind, self.at_match)
    }
}

#[cfg(test)]
mod tests {
    use rematch_syntax::Ast;

    use super::prefixes;
    use crate::compile::Compiler;
    use crate::nfa::Nfa;

    fn nfa(pattern: &str) -> Nfa {
        let ast = Ast::parse(pattern).unwrap();
        Compiler::new(1 << 20).compile(&ast).unwrap()
    }

    #[test]
    fn whole_literal_is_complete() {
        let lits = prefixes(&nfa("hello"));
        assert!(lits.at_match());
        assert_eq!(lits.find(b"say hello"), Some((4, 9)));
    }

    #[test]
    fn alternation_of_literals() {
        let lits = prefixes(&nfa("foo|barbar"));
        assert!(lits.at_match());
        // Leftmost-longest, like the engines themselves.
        assert_eq!(lits.find(b"xbarbar"), Some((1, 7)));
    }

    #[test]
    fn prefix_of_larger_pattern_is_incomplete() {
        let lits = prefixes(&nfa("hel+o"));
        assert!(!lits.at_match());
        assert_eq!(lits.find(b"..hel"), Some((2, 5)));
    }

    #[test]
    fn anchors_and_dots_yield_nothing() {
        assert!(prefixes(&nfa("^abc")).is_empty());
        assert!(prefixes(&nfa(".bc")).is_empty());
        assert!(prefixes(&nfa("a*bc")).is_empty());
    }

    #[test]
    fn small_classes_expand() {
        let lits = prefixes(&nfa("[ab]c"));
        assert!(lits.at_match());
        assert_eq!(lits.find(b"zzbc"), Some((2, 4)));
        // Ten digits blow the expansion limit.
        assert!(prefixes(&nfa("[0-9]c")).is_empty());
    }

    #[test]
    fn single_byte_and_byte_set() {
        let lits = prefixes(&nfa("q"));
        assert_eq!(lits.find(b"xxq"), Some((2, 3)));
        let lits = prefixes(&nfa("a|b"));
        assert!(lits.at_match());
        assert_eq!(lits.find(b"zzb"), Some((2, 3)));
    }
}
