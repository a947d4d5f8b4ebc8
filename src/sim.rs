// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// The set-based simulation engine. For each candidate start offset it makes
// a single forward pass: the frontier starts as the epsilon closure of the
// start state and is stepped one codepoint at a time until it drains. The
// last position at which the frontier contained the accepting state is the
// match end, which yields leftmost-longest semantics. The closure resolves
// the zero-width conditions (assertions and group markers); capture slots
// travel with each thread and the accepting thread's slots become the
// result.

use crate::input::{Input, InputAt};
use crate::literals::Literals;
use crate::nfa::{Cond, Nfa, StateIdx};

/// A set-based NFA simulation matching engine.
#[derive(Debug)]
pub struct Sim<'r, 't> {
    nfa: &'r Nfa,
    prefixes: &'r Literals,
    input: Input<'t>,
}

/// A cached allocation that can be reused on each execution.
#[derive(Debug)]
pub struct SimCache {
    clist: Threads,
    nlist: Threads,
    seed_caps: Vec<Option<usize>>,
}

impl SimCache {
    pub fn new() -> SimCache {
        SimCache {
            clist: Threads::new(),
            nlist: Threads::new(),
            seed_caps: vec![],
        }
    }

    fn resize(&mut self, nstates: usize, nslots: usize) {
        self.clist.resize(nstates, nslots);
        self.nlist.resize(nstates, nslots);
        if self.seed_caps.len() != nslots {
            self.seed_caps = vec![None; nslots];
        }
    }
}

impl<'r, 't> Sim<'r, 't> {
    /// Executes the simulation, searching forward from `start`.
    ///
    /// If there's a match, returns `true` and populates the given capture
    /// slots. With an empty `caps`, only existence is determined (the fast
    /// path for `is_match`).
    pub fn exec(
        nfa: &'r Nfa,
        prefixes: &'r Literals,
        cache: &mut SimCache,
        caps: &mut [Option<usize>],
        input: Input<'t>,
        start: usize,
    ) -> bool {
        cache.resize(nfa.num_states(), caps.len());
        Sim {
            nfa,
            prefixes,
            input,
        }
        .exec_(cache, caps, start)
    }

    fn exec_(
        &self,
        cache: &mut SimCache,
        caps: &mut [Option<usize>],
        start: usize,
    ) -> bool {
        let mut at = self.input.at(start);
        loop {
            if self.nfa.anchored_start && at.pos() != 0 {
                return false;
            }
            if !self.nfa.anchored_start && !self.prefixes.is_empty() {
                // Jump ahead to the earliest possible literal prefix. If
                // there is none, no match can start anywhere.
                let text = &self.input.as_bytes()[at.pos()..];
                match self.prefixes.find(text) {
                    None => return false,
                    Some((s, _)) => at = self.input.at(at.pos() + s),
                }
            }
            if self.try_at(cache, caps, at) {
                return true;
            }
            if self.nfa.anchored_start || at.pos() >= self.input.len() {
                return false;
            }
            at = self.input.at(at.next_pos());
        }
    }

    // A single forward pass from a fixed start position.
    fn try_at(&self, cache: &mut SimCache, caps: &mut [Option<usize>], at: InputAt) -> bool {
        let SimCache {
            clist,
            nlist,
            seed_caps,
        } = cache;
        clist.clear();
        nlist.clear();
        for slot in seed_caps.iter_mut() {
            *slot = None;
        }
        let mut matched = false;
        let mut at = at;
        self.add(clist, seed_caps, self.nfa.start, at);
        while clist.size() > 0 {
            let at_next = self.input.at(at.next_pos());
            let mut accepted = false;
            for i in 0..clist.size() {
                let sid = clist.pc(i);
                if sid == self.nfa.accept {
                    // The first accepting thread at a given position has
                    // priority; a later position overwrites with a longer
                    // match.
                    if !accepted {
                        accepted = true;
                        matched = true;
                        let tcaps = clist.caps(i);
                        for (slot, val) in caps.iter_mut().zip(tcaps.iter()) {
                            *slot = *val;
                        }
                        if caps.is_empty() {
                            // Existence is all that was asked.
                            return true;
                        }
                    }
                    continue;
                }
                let tcaps = clist.caps(i);
                for edge in &self.nfa.state(sid).edges {
                    if edge.cond.matches(at.char()) {
                        self.add(nlist, tcaps, edge.to, at_next);
                    }
                }
            }
            if at.pos() >= self.input.len() {
                break;
            }
            at = at_next;
            clist.swap(nlist);
            nlist.clear();
        }
        matched
    }

    // Adds a state to a thread list by following its zero-width transitions
    // (the epsilon closure). Group markers write into `tcaps` around the
    // recursion so that sibling branches see unmodified slots.
    fn add(
        &self,
        nlist: &mut Threads,
        tcaps: &mut [Option<usize>],
        sid: StateIdx,
        at: InputAt,
    ) {
        if nlist.contains(sid) {
            return;
        }
        let ti = nlist.add(sid);
        let mut snapshot = sid == self.nfa.accept;
        for edge in &self.nfa.state(sid).edges {
            match edge.cond {
                Cond::Epsilon => self.add(nlist, tcaps, edge.to, at),
                Cond::AssertStart => {
                    if at.pos() == 0 {
                        self.add(nlist, tcaps, edge.to, at);
                    }
                }
                Cond::AssertEnd => {
                    if at.pos() == self.input.len() {
                        self.add(nlist, tcaps, edge.to, at);
                    }
                }
                Cond::GroupStart(id) => {
                    let slot = 2 * id as usize;
                    if slot >= tcaps.len() {
                        self.add(nlist, tcaps, edge.to, at);
                    } else {
                        let old = tcaps[slot];
                        tcaps[slot] = Some(at.pos());
                        self.add(nlist, tcaps, edge.to, at);
                        tcaps[slot] = old;
                    }
                }
                Cond::GroupEnd(id) => {
                    let slot = 2 * id as usize + 1;
                    if slot >= tcaps.len() {
                        self.add(nlist, tcaps, edge.to, at);
                    } else {
                        let old = tcaps[slot];
                        tcaps[slot] = Some(at.pos());
                        self.add(nlist, tcaps, edge.to, at);
                        tcaps[slot] = old;
                    }
                }
                Cond::Char(_) | Cond::AnyChar | Cond::Class(_) => {
                    snapshot = true;
                }
            }
        }
        if snapshot {
            let t = nlist.thread(ti);
            for (slot, val) in t.caps.iter_mut().zip(tcaps.iter()) {
                *slot = *val;
            }
        }
    }
}

/// A sparse set of threads keyed by state id (or instruction index, for the
/// bytecode VM). Insertion and membership are constant time; clearing does
/// not touch the dense storage.
#[derive(Debug)]
pub struct Threads {
    dense: Vec<Thread>,
    sparse: Vec<u32>,
    size: usize,
}

#[derive(Clone, Debug)]
pub struct Thread {
    pc: StateIdx,
    pub caps: Vec<Option<usize>>,
}

impl Threads {
    pub fn new() -> Threads {
        Threads {
            dense: vec![],
            sparse: vec![],
            size: 0,
        }
    }

    pub fn resize(&mut self, nkeys: usize, nslots: usize) {
        let old_slots = self.dense.first().map_or(0, |t| t.caps.len());
        if nkeys != self.dense.len() || old_slots != nslots {
            let t = Thread {
                pc: 0,
                caps: vec![None; nslots],
            };
            *self = Threads {
                dense: vec![t; nkeys],
                sparse: vec![0; nkeys],
                size: 0,
            };
        }
    }

    pub fn add(&mut self, pc: StateIdx) -> usize {
        let i = self.size;
        self.dense[i].pc = pc;
        self.sparse[pc as usize] = i as u32;
        self.size += 1;
        i
    }

    pub fn contains(&self, pc: StateIdx) -> bool {
        let s = self.sparse[pc as usize] as usize;
        s < self.size && self.dense[s].pc == pc
    }

    pub fn thread(&mut self, i: usize) -> &mut Thread {
        &mut self.dense[i]
    }

    pub fn pc(&self, i: usize) -> StateIdx {
        self.dense[i].pc
    }

    pub fn caps(&mut self, i: usize) -> &mut [Option<usize>] {
        &mut self.dense[i].caps
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn clear(&mut self) {
        self.size = 0;
    }

    pub fn swap(&mut self, other: &mut Threads) {
        std::mem::swap(self, other);
    }
}
