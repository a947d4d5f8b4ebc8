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

use crate::config::{Features, Flags, RuntimeConfig};
use crate::exec::{Exec, MatchEngine};
use crate::stream::StreamingMatcher;
use crate::Error;

/// The default limit on the size of a compiled automaton, in bytes.
const DEFAULT_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A match: an inclusive start and exclusive end byte offset into the
/// input, plus the spans of any capture groups.
///
/// Group 0 is the whole match; explicit groups are numbered from 1 in
/// left-paren order. A group inside an untaken alternation branch or an
/// unentered repetition has no span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    groups: Option<Vec<Option<(usize, usize)>>>,
}

impl Match {
    pub(crate) fn new(start: usize, end: usize) -> Match {
        Match {
            start,
            end,
            groups: None,
        }
    }

    // Builds a match from engine capture slots (two per group, group 0
    // first). Slots beyond group 0 become the group table.
    pub(crate) fn from_caps(caps: &[Option<usize>]) -> Option<Match> {
        let start = (*caps.first()?)?;
        let end = (*caps.get(1)?)?;
        let groups = if caps.len() > 2 {
            Some(
                caps[2..]
                    .chunks(2)
                    .map(|slot| match (slot.first().copied(), slot.get(1).copied()) {
                        (Some(Some(s)), Some(Some(e))) => Some((s, e)),
                        _ => None,
                    })
                    .collect(),
            )
        } else {
            None
        };
        Some(Match { start, end, groups })
    }

    /// The matched bytes.
    pub fn slice<'t>(&self, text: &'t [u8]) -> &'t [u8] {
        &text[self.start..self.end]
    }

    /// The span of a capture group. Group 0 is the whole match. Returns
    /// `None` for groups that did not participate in the match or when
    /// group tracking was disabled.
    pub fn group(&self, i: usize) -> Option<Match> {
        if i == 0 {
            return Some(Match::new(self.start, self.end));
        }
        let (s, e) = (*self.groups.as_ref()?.get(i - 1)?)?;
        Some(Match::new(s, e))
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A compiled regular expression.
///
/// Compiled once, a `Regex` is immutable and can be shared across threads;
/// searches reuse pooled scratch space. Searching is a single forward pass
/// per start offset with no backtracking, so match time is not
/// pattern-exponential.
///
/// The match reported at a given start offset is the longest one
/// (leftmost-longest): `a|ab` on `ab` matches `ab`, not `a`.
pub struct Regex(Exec);

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Debug for Regex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Regex({:?})", self.as_str())
    }
}

impl Regex {
    /// Compiles a pattern with the default configuration.
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        RegexBuilder::new().build(pattern)
    }

    /// The original pattern string.
    pub fn as_str(&self) -> &str {
        self.0.regex_str()
    }

    /// The flags this regex was compiled with.
    pub fn flags(&self) -> Flags {
        self.0.flags()
    }

    /// The number of capture groups, including group 0.
    pub fn capture_count(&self) -> usize {
        self.0.num_captures()
    }

    /// The parsed form of the pattern. The compiled regex owns its syntax
    /// tree for the lifetime of the handle.
    pub fn syntax(&self) -> &crate::syntax::Ast {
        self.0.syntax()
    }

    /// Returns true if and only if the regex matches somewhere in `text`.
    ///
    /// This is the fast path: no capture offsets are recorded, and the
    /// search stops at the first accepting position.
    pub fn is_match(&self, text: &[u8]) -> bool {
        self.0.exec(&mut [], text, 0)
    }

    /// Returns the first match in `text`, with capture groups recorded
    /// when group tracking is enabled.
    pub fn find(&self, text: &[u8]) -> Option<Match> {
        self.find_at(text, 0)
    }

    /// Returns all non-overlapping matches, left to right. After an empty
    /// match the search resumes past the following codepoint (at least one
    /// byte), so a zero-width match cannot stall the scan.
    pub fn find_all(&self, text: &[u8]) -> Vec<Match> {
        let mut matches = vec![];
        let mut pos = 0;
        while pos <= text.len() {
            let m = match self.find_at(text, pos) {
                None => break,
                Some(m) => m,
            };
            pos = if m.is_empty() {
                let width = crate::input::decode(text, m.end).map_or(1, |(_, w)| w);
                m.end + width
            } else {
                m.end
            };
            matches.push(m);
        }
        matches
    }

    /// Returns a matcher that accepts the input in chunks. Errors when the
    /// streaming feature was disabled at build time.
    pub fn streaming(&self) -> Result<StreamingMatcher<'_>, Error> {
        if !self.0.features().streaming_enabled {
            return Err(Error::UnsupportedFeature("streaming is disabled"));
        }
        Ok(StreamingMatcher::new(self.0.nfa()))
    }

    fn find_at(&self, text: &[u8], start: usize) -> Option<Match> {
        let mut caps = self.0.alloc_captures();
        if self.0.exec(&mut caps, text, start) {
            Match::from_caps(&caps)
        } else {
            None
        }
    }

    #[doc(hidden)]
    pub fn selected_engine(&self, with_captures: bool) -> MatchEngine {
        let cap_len = if with_captures {
            2 * self.0.num_captures()
        } else {
            0
        };
        self.0.selected_engine(cap_len)
    }
}

/// A builder for configuring a compiled regex: size limit, feature record
/// and runtime preferences.
///
/// The reserved matching-mode flags (`case_insensitive`, `multiline`,
/// `dot_all`) can be set but make `build` fail with
/// [`Error::UnsupportedFeature`]; the pattern syntax recognizes no flag
/// groups either, so there is no way to opt into semantics this engine
/// does not implement.
#[derive(Clone, Debug, Default)]
pub struct RegexBuilder {
    size_limit: Option<usize>,
    features: Features,
    runtime: RuntimeConfig,
    flags: Flags,
}

impl RegexBuilder {
    pub fn new() -> RegexBuilder {
        RegexBuilder::default()
    }

    /// Limits the size of a compiled automaton, in bytes. Defaults to
    /// 10 MiB.
    pub fn size_limit(mut self, limit: usize) -> RegexBuilder {
        self.size_limit = Some(limit);
        self
    }

    /// Replaces the whole feature record.
    pub fn features(mut self, features: Features) -> RegexBuilder {
        self.features = features;
        self
    }

    /// Replaces the runtime preference record.
    pub fn runtime(mut self, runtime: RuntimeConfig) -> RegexBuilder {
        self.runtime = runtime;
        self
    }

    /// Permits or forbids bytecode compilation.
    pub fn jit(mut self, yes: bool) -> RegexBuilder {
        self.features.jit_enabled = yes;
        self.flags.jit_enabled = yes;
        self
    }

    /// Enables or disables the Unicode property tables.
    pub fn unicode(mut self, yes: bool) -> RegexBuilder {
        self.features.unicode_enabled = yes;
        self.flags.unicode = yes;
        self
    }

    /// Reserved; building fails when set.
    pub fn case_insensitive(mut self, yes: bool) -> RegexBuilder {
        self.flags.case_insensitive = yes;
        self
    }

    /// Reserved; building fails when set.
    pub fn multiline(mut self, yes: bool) -> RegexBuilder {
        self.flags.multiline = yes;
        self
    }

    /// Reserved; building fails when set.
    pub fn dot_all(mut self, yes: bool) -> RegexBuilder {
        self.flags.dot_all = yes;
        self
    }

    pub fn build(&self, pattern: &str) -> Result<Regex, Error> {
        if self.flags.case_insensitive {
            return Err(Error::UnsupportedFeature(
                "case insensitive matching is not implemented",
            ));
        }
        if self.flags.multiline {
            return Err(Error::UnsupportedFeature(
                "multiline matching is not implemented",
            ));
        }
        if self.flags.dot_all {
            return Err(Error::UnsupportedFeature(
                "dot-all matching is not implemented",
            ));
        }
        let size_limit = self.size_limit.unwrap_or(DEFAULT_SIZE_LIMIT);
        Exec::new(pattern, size_limit, self.features, self.runtime, self.flags).map(Regex)
    }
}
