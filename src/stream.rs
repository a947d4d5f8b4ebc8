// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// The streaming driver. It keeps a single frontier alive across `feed`
// calls, with every thread carrying the absolute offset its match attempt
// started at. A candidate match is finalized only once no live thread could
// still produce a leftmost-longer one, so the reported matches equal those
// of `find_all` over the concatenated input, with cumulative offsets.
//
// `^` can only fire at absolute position 0 and `$` only inside `finalize`;
// a chunk boundary is never treated as the end of the input. An incomplete
// UTF-8 sequence at the end of a chunk is held back and decoded once the
// next chunk arrives.

use std::mem;

use log::trace;

use crate::char::Char;
use crate::input;
use crate::nfa::{Nfa, Cond, StateIdx};
use crate::re::Match;
use crate::Error;

/// A match found in a byte stream, tagged with the chunks it starts and
/// ends in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StreamMatch {
    /// The match, with offsets into the cumulative stream.
    pub m: Match,
    /// Index of the chunk the match starts in.
    pub start_chunk: usize,
    /// Index of the chunk the match ends in.
    pub end_chunk: usize,
    /// True iff the match spans more than one chunk.
    pub cross_boundary: bool,
}

/// A matcher that ingests input in arbitrary byte chunks.
///
/// Feed any number of chunks, then call [`finalize`](Self::finalize) once;
/// `$`-anchored patterns can only accept at that point. The matcher borrows
/// the compiled automaton, so it cannot outlive its `Regex`.
#[derive(Debug)]
pub struct StreamingMatcher<'r> {
    nfa: &'r Nfa,
    clist: OriginThreads,
    nlist: OriginThreads,
    /// Bytes held back because they end mid-codepoint.
    carry: Vec<u8>,
    /// Total bytes accepted by `feed`.
    committed: usize,
    /// Absolute position of the next byte to simulate. Lags `committed` by
    /// the length of `carry`.
    pos: usize,
    /// Chunk start offsets, monotonically increasing.
    boundaries: Vec<usize>,
    matches: Vec<StreamMatch>,
    /// Pending `(start, end)` candidates, sorted by start, at most one per
    /// start. A candidate stays pending while some live thread could still
    /// produce a leftmost or longer match, or overlap it away.
    candidates: Vec<(usize, usize)>,
    finished: bool,
}

impl<'r> StreamingMatcher<'r> {
    pub(crate) fn new(nfa: &'r Nfa) -> StreamingMatcher<'r> {
        let mut clist = OriginThreads::new();
        let mut nlist = OriginThreads::new();
        clist.resize(nfa.num_states());
        nlist.resize(nfa.num_states());
        StreamingMatcher {
            nfa,
            clist,
            nlist,
            carry: vec![],
            committed: 0,
            pos: 0,
            boundaries: vec![],
            matches: vec![],
            candidates: vec![],
            finished: false,
        }
    }

    /// Records a chunk boundary, then advances the simulation over the
    /// chunk's bytes.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), Error> {
        if self.finished {
            return Err(Error::InvalidInput("feed on a finalized streaming matcher"));
        }
        self.boundaries.push(self.committed);
        self.committed += chunk.len();
        trace!(
            "stream: chunk {} with {} bytes, {} committed",
            self.boundaries.len() - 1,
            chunk.len(),
            self.committed
        );
        if self.carry.is_empty() {
            self.run(chunk, false);
        } else {
            let mut data = mem::take(&mut self.carry);
            data.extend_from_slice(chunk);
            self.run(&data, false);
        }
        Ok(())
    }

    /// Marks the end of the stream: pending bytes are flushed, `$` becomes
    /// satisfiable, and any open candidate match is emitted. Idempotent.
    pub fn finalize(&mut self) -> Result<(), Error> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if !self.carry.is_empty() {
            // Whatever is left cannot become a valid sequence anymore.
            let data = mem::take(&mut self.carry);
            self.run(&data, true);
        }
        let end = self.pos;
        // Rebuild the frontier with end-of-input assertions allowed.
        self.nlist.clear();
        for i in 0..self.clist.size() {
            let t = self.clist.get(i);
            closure(self.nfa, &mut self.nlist, t.sid, t.origin, end, true);
        }
        mem::swap(&mut self.clist, &mut self.nlist);
        if !self.nfa.anchored_start || end == 0 {
            closure(self.nfa, &mut self.clist, self.nfa.start, end, end, true);
        }
        self.scan_accepts(end);
        self.flush_candidates(true);
        Ok(())
    }

    /// The matches recorded so far, in increasing start-offset order.
    pub fn matches(&self) -> &[StreamMatch] {
        &self.matches
    }

    /// Reconstructs the bytes of a match from the original chunk list,
    /// splicing across boundaries when needed. `chunks` must be the chunks
    /// previously fed, in order.
    pub fn slice_of(&self, m: &StreamMatch, chunks: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::with_capacity(m.m.len());
        for ci in m.start_chunk..=m.end_chunk {
            if ci >= chunks.len() || ci >= self.boundaries.len() {
                break;
            }
            let chunk_start = self.boundaries[ci];
            let chunk = chunks[ci];
            let lo = std::cmp::max(m.m.start, chunk_start);
            let hi = std::cmp::min(m.m.end, chunk_start + chunk.len());
            if hi > lo {
                out.extend_from_slice(&chunk[lo - chunk_start..hi - chunk_start]);
            }
        }
        out
    }

    /// Returns the matcher to its initial state, forgetting all chunks,
    /// matches and in-flight threads.
    pub fn reset(&mut self) {
        self.clist.clear();
        self.nlist.clear();
        self.carry.clear();
        self.committed = 0;
        self.pos = 0;
        self.boundaries.clear();
        self.matches.clear();
        self.candidates.clear();
        self.finished = false;
    }

    // Advances the simulation over `data`, whose first byte sits at
    // absolute position `self.pos`. A trailing incomplete sequence is held
    // back unless `at_end` is set.
    fn run(&mut self, data: &[u8], at_end: bool) {
        let base = self.pos;
        let mut i = 0;
        loop {
            let abs = base + i;
            // Every position starts a new match attempt, unless the
            // pattern is anchored to position 0.
            if !self.nfa.anchored_start || abs == 0 {
                closure(self.nfa, &mut self.clist, self.nfa.start, abs, abs, false);
            }
            self.scan_accepts(abs);
            self.flush_candidates(false);
            if i >= data.len() {
                break;
            }
            let (c, width) = match input::decode(data, i) {
                Some((cp, width)) => (Char::from_u32(cp), width),
                None => {
                    if !at_end && input::needs_more(data, i) {
                        break;
                    }
                    // Invalid byte: advance without transitioning.
                    (Char::none(), 1)
                }
            };
            self.nlist.clear();
            step_all(self.nfa, &self.clist, &mut self.nlist, c, abs + width);
            mem::swap(&mut self.clist, &mut self.nlist);
            i += width;
        }
        self.carry.clear();
        self.carry.extend_from_slice(&data[i..]);
        self.pos = base + i;
    }

    // Folds any accepting threads at position `abs` into the candidate
    // list: one slot per origin, whose end only grows (longest match at
    // that origin so far).
    fn scan_accepts(&mut self, abs: usize) {
        for i in 0..self.clist.size() {
            let t = self.clist.get(i);
            if t.sid != self.nfa.accept {
                continue;
            }
            match self.candidates.binary_search_by_key(&t.origin, |c| c.0) {
                Ok(k) => {
                    if abs > self.candidates[k].1 {
                        self.candidates[k].1 = abs;
                    }
                }
                Err(k) => self.candidates.insert(k, (t.origin, abs)),
            }
        }
    }

    // Emits the leftmost candidate once no live thread could still yield a
    // leftmost or longer match, then removes candidates and threads
    // overlapping the emitted span so matches stay non-overlapping.
    // `force` is set in `finalize`, where no thread can consume further
    // input.
    fn flush_candidates(&mut self, force: bool) {
        loop {
            let (s, e) = match self.candidates.first() {
                None => return,
                Some(&c) => c,
            };
            if !force {
                let blocked = (0..self.clist.size()).any(|i| {
                    let t = self.clist.get(i);
                    t.sid != self.nfa.accept && t.origin <= s
                });
                if blocked {
                    return;
                }
            }
            self.push_match(s, e);
            // Guarantee progress past zero-width matches.
            let cut = std::cmp::max(e, s + 1);
            self.candidates.retain(|&(o, _)| o >= cut);
            self.clist.retain_origin_at_least(cut);
        }
    }

    fn push_match(&mut self, s: usize, e: usize) {
        let start_chunk = self.chunk_of(s);
        let end_chunk = if e > s { self.chunk_of(e - 1) } else { start_chunk };
        trace!(
            "stream: match at [{}, {}) spanning chunks {}..={}",
            s,
            e,
            start_chunk,
            end_chunk
        );
        self.matches.push(StreamMatch {
            m: Match::new(s, e),
            start_chunk,
            end_chunk,
            cross_boundary: start_chunk != end_chunk,
        });
    }

    // Maps an absolute offset to the index of the chunk containing it.
    fn chunk_of(&self, pos: usize) -> usize {
        self.boundaries
            .partition_point(|&b| b <= pos)
            .saturating_sub(1)
    }
}

// The epsilon closure over a frontier keyed by state, where each thread
// remembers the position its match attempt started at. Re-inserting a state
// with an earlier origin re-expands it, since leftmost attempts take
// precedence.
fn closure(
    nfa: &Nfa,
    list: &mut OriginThreads,
    sid: StateIdx,
    origin: usize,
    abs: usize,
    at_end: bool,
) {
    if !list.insert(sid, origin) {
        return;
    }
    for edge in &nfa.state(sid).edges {
        match edge.cond {
            Cond::Epsilon | Cond::GroupStart(_) | Cond::GroupEnd(_) => {
                closure(nfa, list, edge.to, origin, abs, at_end);
            }
            Cond::AssertStart => {
                if abs == 0 {
                    closure(nfa, list, edge.to, origin, abs, at_end);
                }
            }
            Cond::AssertEnd => {
                if at_end {
                    closure(nfa, list, edge.to, origin, abs, at_end);
                }
            }
            Cond::Char(_) | Cond::AnyChar | Cond::Class(_) => {}
        }
    }
}

fn step_all(
    nfa: &Nfa,
    clist: &OriginThreads,
    nlist: &mut OriginThreads,
    c: Char,
    next_abs: usize,
) {
    for i in 0..clist.size() {
        let t = clist.get(i);
        if t.sid == nfa.accept {
            continue;
        }
        for edge in &nfa.state(t.sid).edges {
            if edge.cond.matches(c) {
                closure(nfa, nlist, edge.to, t.origin, next_abs, false);
            }
        }
    }
}

/// A sparse set of `(state, origin)` threads. At most one thread per state;
/// collisions keep the earlier origin.
#[derive(Debug)]
struct OriginThreads {
    dense: Vec<OriginThread>,
    sparse: Vec<u32>,
    size: usize,
}

#[derive(Clone, Copy, Debug)]
struct OriginThread {
    sid: StateIdx,
    origin: usize,
}

impl OriginThreads {
    fn new() -> OriginThreads {
        OriginThreads {
            dense: vec![],
            sparse: vec![],
            size: 0,
        }
    }

    fn resize(&mut self, nkeys: usize) {
        if nkeys != self.dense.len() {
            *self = OriginThreads {
                dense: vec![OriginThread { sid: 0, origin: 0 }; nkeys],
                sparse: vec![0; nkeys],
                size: 0,
            };
        }
    }

    fn size(&self) -> usize {
        self.size
    }

    fn get(&self, i: usize) -> OriginThread {
        self.dense[i]
    }

    fn clear(&mut self) {
        self.size = 0;
    }

    fn index_of(&self, sid: StateIdx) -> Option<usize> {
        let s = self.sparse[sid as usize] as usize;
        if s < self.size && self.dense[s].sid == sid {
            Some(s)
        } else {
            None
        }
    }

    // Returns true if the state was inserted or its origin improved, i.e.,
    // the caller should (re-)expand its closure.
    fn insert(&mut self, sid: StateIdx, origin: usize) -> bool {
        match self.index_of(sid) {
            Some(i) => {
                if self.dense[i].origin <= origin {
                    false
                } else {
                    self.dense[i].origin = origin;
                    true
                }
            }
            None => {
                let i = self.size;
                self.dense[i] = OriginThread { sid, origin };
                self.sparse[sid as usize] = i as u32;
                self.size += 1;
                true
            }
        }
    }

    fn retain_origin_at_least(&mut self, cut: usize) {
        let survivors: Vec<OriginThread> = (0..self.size)
            .map(|i| self.dense[i])
            .filter(|t| t.origin >= cut)
            .collect();
        self.clear();
        for t in survivors {
            self.insert(t.sid, t.origin);
        }
    }
}
