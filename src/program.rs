// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::nfa::{ClassRanges, Cond, Nfa, StateIdx};

/// The index of an instruction in a bytecode program.
pub type InstIdx = u32;

/// An instruction in a compiled bytecode program.
///
/// Consuming instructions fall through to the next instruction on success;
/// control flow is explicit through `Jump` and `Split`.
#[derive(Clone, Debug)]
pub enum Inst {
    /// The program has reached a match state.
    Match,
    /// Consume one codepoint equal to the given byte (which is `<= 0x7F`
    /// whenever the instruction can match at all).
    Char(u8),
    /// Consume one codepoint other than `\n`.
    Any,
    /// Consume one codepoint matched by the class.
    Ranges(ClassRanges),
    /// Diverge to one of two locations, preferring `goto1`.
    Split(InstSplit),
    /// Continue at the given location.
    Jump(InstIdx),
    /// Zero-width: record the start of a capture group, then fall through.
    GroupStart(u32),
    /// Zero-width: record the end of a capture group, then fall through.
    GroupEnd(u32),
    /// Zero-width: succeed only at absolute position 0.
    AssertStart,
    /// Zero-width: succeed only at the end of the input.
    AssertEnd,
    /// Kill the current thread. Emitted for dead states, which only arise
    /// from hand-assembled automata.
    Fail,
}

/// Representation of the Split instruction. `goto1` is the preferred
/// branch; non-greedy quantifiers are lowered with the branch order
/// swapped, so preference is uniform at this level.
#[derive(Clone, Copy, Debug)]
pub struct InstSplit {
    pub goto1: InstIdx,
    pub goto2: InstIdx,
}

/// A flat bytecode program compiled from an NFA, plus the metadata the VM
/// and the engine selection consult.
#[derive(Clone, Debug)]
pub struct Program {
    pub insts: Vec<Inst>,
    pub anchored_start: bool,
    pub anchored_end: bool,
    /// A lower bound, in bytes, on the length of any match.
    pub min_match_len: usize,
    /// An upper bound, in bytes, on the length of any match, if one exists.
    pub max_match_len: Option<usize>,
    /// Number of tracked capture groups, including group 0.
    pub ncaps: usize,
}

/// Compiles an NFA into a linear program.
///
/// Each reachable state is assigned an instruction index on first visit; a
/// state with one transition emits its condition inline followed by a jump
/// to its target, and a state with `n > 1` transitions emits a chain of
/// `n - 1` splits. A final peephole pass collapses chains of jumps.
pub struct ProgramCompiler<'a> {
    nfa: &'a Nfa,
    insts: Vec<Inst>,
    mapped: Vec<Option<InstIdx>>,
}

impl<'a> ProgramCompiler<'a> {
    /// Compiles `nfa` to a program. The match length bounds are computed by
    /// the caller from the syntax tree.
    pub fn compile(
        nfa: &'a Nfa,
        min_match_len: usize,
        max_match_len: Option<usize>,
    ) -> Program {
        let mut c = ProgramCompiler {
            nfa,
            insts: vec![],
            mapped: vec![None; nfa.num_states()],
        };
        let entry = c.c(nfa.start);
        debug_assert_eq!(entry, 0);
        c.peephole();
        Program {
            insts: c.insts,
            anchored_start: nfa.anchored_start,
            anchored_end: nfa.anchored_end,
            min_match_len,
            max_match_len,
            ncaps: nfa.ncaps,
        }
    }

    // Emits the code for a state and returns its entry index. The entry is
    // memoized before children are emitted so that loops terminate.
    fn c(&mut self, sid: StateIdx) -> InstIdx {
        if let Some(pc) = self.mapped[sid as usize] {
            return pc;
        }
        let entry = self.insts.len() as InstIdx;
        self.mapped[sid as usize] = Some(entry);
        let nfa = self.nfa;
        if sid == nfa.accept {
            self.push(Inst::Match);
            return entry;
        }
        let edges = &nfa.state(sid).edges;
        match edges.len() {
            0 => self.push(Inst::Fail),
            1 => {
                self.c_edge(sid, 0);
            }
            n => {
                let mut splits = Vec::with_capacity(n - 1);
                for _ in 0..n - 1 {
                    splits.push(self.empty_split());
                }
                let mut targets = Vec::with_capacity(n);
                for k in 0..n {
                    targets.push(self.c_edge(sid, k));
                }
                for (k, &sp) in splits.iter().enumerate() {
                    let goto2 = if k + 1 < splits.len() {
                        splits[k + 1]
                    } else {
                        targets[n - 1]
                    };
                    self.set_split(sp, targets[k], goto2);
                }
            }
        }
        entry
    }

    // Emits the code for one transition and returns its entry index.
    fn c_edge(&mut self, sid: StateIdx, k: usize) -> InstIdx {
        let nfa = self.nfa;
        let edge = &nfa.state(sid).edges[k];
        let entry = self.insts.len() as InstIdx;
        match edge.cond {
            Cond::Epsilon => {}
            Cond::Char(b) => self.push(Inst::Char(b)),
            Cond::AnyChar => self.push(Inst::Any),
            Cond::Class(ref cls) => self.push(Inst::Ranges(cls.clone())),
            Cond::AssertStart => self.push(Inst::AssertStart),
            Cond::AssertEnd => self.push(Inst::AssertEnd),
            Cond::GroupStart(id) => self.push(Inst::GroupStart(id)),
            Cond::GroupEnd(id) => self.push(Inst::GroupEnd(id)),
        }
        let jmp = self.empty_jump();
        let target = self.c(edge.to);
        self.set_jump(jmp, target);
        entry
    }

    // Rewrites every branch target that lands on a `Jump` to that jump's
    // final destination.
    fn peephole(&mut self) {
        let resolve = |insts: &[Inst], mut pc: InstIdx| -> InstIdx {
            let mut hops = 0;
            while let Inst::Jump(t) = insts[pc as usize] {
                pc = t;
                hops += 1;
                if hops > insts.len() {
                    break;
                }
            }
            pc
        };
        for i in 0..self.insts.len() {
            match self.insts[i] {
                Inst::Jump(t) => {
                    let t = resolve(&self.insts, t);
                    self.insts[i] = Inst::Jump(t);
                }
                Inst::Split(sp) => {
                    let goto1 = resolve(&self.insts, sp.goto1);
                    let goto2 = resolve(&self.insts, sp.goto2);
                    self.insts[i] = Inst::Split(InstSplit { goto1, goto2 });
                }
                _ => {}
            }
        }
    }

    fn push(&mut self, inst: Inst) {
        self.insts.push(inst);
    }

    fn empty_split(&mut self) -> InstIdx {
        self.insts.push(Inst::Split(InstSplit { goto1: 0, goto2: 0 }));
        (self.insts.len() - 1) as InstIdx
    }

    fn set_split(&mut self, i: InstIdx, goto1: InstIdx, goto2: InstIdx) {
        match self.insts[i as usize] {
            Inst::Split(_) => self.insts[i as usize] = Inst::Split(InstSplit { goto1, goto2 }),
            _ => unreachable!("invalid split index"),
        }
    }

    fn empty_jump(&mut self) -> InstIdx {
        self.insts.push(Inst::Jump(0));
        (self.insts.len() - 1) as InstIdx
    }

    fn set_jump(&mut self, i: InstIdx, pc: InstIdx) {
        match self.insts[i as usize] {
            Inst::Jump(_) => self.insts[i as usize] = Inst::Jump(pc),
            _ => unreachable!("invalid jump index"),
        }
    }
}
