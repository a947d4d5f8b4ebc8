// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// The thread VM over a bytecode program. Threads are `(pc, captures)` pairs
// advanced in lockstep over the input, with zero-width instructions
// resolved while threads are enqueued. The policy is the same
// leftmost-longest rule as the NFA simulation, so the two execution paths
// agree on every input.

use crate::input::{Input, InputAt};
use crate::program::{Inst, InstIdx, Program};
use crate::sim::Threads;

/// A thread-based interpreter for compiled bytecode programs.
#[derive(Debug)]
pub struct Vm<'r, 't> {
    prog: &'r Program,
    input: Input<'t>,
}

/// A cached allocation that can be reused on each execution.
#[derive(Debug)]
pub struct VmCache {
    clist: Threads,
    nlist: Threads,
    seed_caps: Vec<Option<usize>>,
}

impl VmCache {
    pub fn new() -> VmCache {
        VmCache {
            clist: Threads::new(),
            nlist: Threads::new(),
            seed_caps: vec![],
        }
    }

    fn resize(&mut self, ninsts: usize, nslots: usize) {
        self.clist.resize(ninsts, nslots);
        self.nlist.resize(ninsts, nslots);
        if self.seed_caps.len() != nslots {
            self.seed_caps = vec![None; nslots];
        }
    }
}

impl<'r, 't> Vm<'r, 't> {
    /// Executes the program, searching forward from `start`. Matching is
    /// attempted at successive start offsets unless the program is anchored
    /// at the start, in which case only offset 0 is tried.
    pub fn exec(
        prog: &'r Program,
        cache: &mut VmCache,
        caps: &mut [Option<usize>],
        input: Input<'t>,
        start: usize,
    ) -> bool {
        cache.resize(prog.insts.len(), caps.len());
        Vm { prog, input }.exec_(cache, caps, start)
    }

    fn exec_(
        &self,
        cache: &mut VmCache,
        caps: &mut [Option<usize>],
        start: usize,
    ) -> bool {
        let mut at = self.input.at(start);
        loop {
            if self.prog.anchored_start && at.pos() != 0 {
                return false;
            }
            // The remaining input only shrinks, so once it is shorter than
            // the minimum match no later offset can work either.
            if self.input.len().saturating_sub(at.pos()) < self.prog.min_match_len {
                return false;
            }
            // An end-anchored match of bounded length cannot start earlier
            // than `len - max`.
            if self.prog.anchored_end {
                if let Some(max) = self.prog.max_match_len {
                    let earliest = self.input.len().saturating_sub(max);
                    if at.pos() < earliest {
                        if self.prog.anchored_start {
                            return false;
                        }
                        at = self.input.at(earliest);
                    }
                }
            }
            if self.try_at(cache, caps, at) {
                return true;
            }
            if self.prog.anchored_start || at.pos() >= self.input.len() {
                return false;
            }
            at = self.input.at(at.next_pos());
        }
    }

    fn try_at(&self, cache: &mut VmCache, caps: &mut [Option<usize>], at: InputAt) -> bool {
        let VmCache {
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
        self.add(clist, seed_caps, 0, at);
        while clist.size() > 0 {
            let at_next = self.input.at(at.next_pos());
            let mut accepted = false;
            for i in 0..clist.size() {
                let pc = clist.pc(i);
                let tcaps = clist.caps(i);
                match self.prog.insts[pc as usize] {
                    Inst::Match => {
                        if !accepted {
                            accepted = true;
                            matched = true;
                            for (slot, val) in caps.iter_mut().zip(tcaps.iter()) {
                                *slot = *val;
                            }
                            if caps.is_empty() {
                                return true;
                            }
                        }
                    }
                    Inst::Char(b) => {
                        if b <= 0x7F && at.char().cp() == Some(b as u32) {
                            self.add(nlist, tcaps, pc + 1, at_next);
                        }
                    }
                    Inst::Any => {
                        if !at.char().is_none() && at.char() != '\n' {
                            self.add(nlist, tcaps, pc + 1, at_next);
                        }
                    }
                    Inst::Ranges(ref ranges) => {
                        if ranges.matches(at.char()) {
                            self.add(nlist, tcaps, pc + 1, at_next);
                        }
                    }
                    // Zero-width instructions are resolved in `add` and
                    // `Fail` threads are simply dropped.
                    _ => {}
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

    // Enqueues a thread, following zero-width instructions transitively.
    fn add(
        &self,
        nlist: &mut Threads,
        tcaps: &mut [Option<usize>],
        pc: InstIdx,
        at: InputAt,
    ) {
        if nlist.contains(pc) {
            return;
        }
        let ti = nlist.add(pc);
        match self.prog.insts[pc as usize] {
            Inst::Jump(target) => self.add(nlist, tcaps, target, at),
            Inst::Split(sp) => {
                self.add(nlist, tcaps, sp.goto1, at);
                self.add(nlist, tcaps, sp.goto2, at);
            }
            Inst::AssertStart => {
                if at.pos() == 0 {
                    self.add(nlist, tcaps, pc + 1, at);
                }
            }
            Inst::AssertEnd => {
                if at.pos() == self.input.len() {
                    self.add(nlist, tcaps, pc + 1, at);
                }
            }
            Inst::GroupStart(id) => {
                let slot = 2 * id as usize;
                if slot >= tcaps.len() {
                    self.add(nlist, tcaps, pc + 1, at);
                } else {
                    let old = tcaps[slot];
                    tcaps[slot] = Some(at.pos());
                    self.add(nlist, tcaps, pc + 1, at);
                    tcaps[slot] = old;
                }
            }
            Inst::GroupEnd(id) => {
                let slot = 2 * id as usize + 1;
                if slot >= tcaps.len() {
                    self.add(nlist, tcaps, pc + 1, at);
                } else {
                    let old = tcaps[slot];
                    tcaps[slot] = Some(at.pos());
                    self.add(nlist, tcaps, pc + 1, at);
                    tcaps[slot] = old;
                }
            }
            Inst::Match | Inst::Char(_) | Inst::Any | Inst::Ranges(_) => {
                let t = nlist.thread(ti);
                for (slot, val) in t.caps.iter_mut().zip(tcaps.iter()) {
                    *slot = *val;
                }
            }
            Inst::Fail => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use rematch_syntax::Ast;

    use super::{Vm, VmCache};
    use crate::compile::{max_match_len, min_match_len, Compiler};
    use crate::input::Input;
    use crate::program::{Program, ProgramCompiler};

    fn program(pattern: &str) -> Program {
        let ast = Ast::parse(pattern).unwrap();
        let nfa = Compiler::new(1 << 20).compile(&ast).unwrap();
        ProgramCompiler::compile(&nfa, min_match_len(&ast.root), max_match_len(&ast.root))
    }

    fn find(prog: &Program, text: &[u8]) -> Option<Vec<Option<usize>>> {
        let mut cache = VmCache::new();
        let mut caps = vec![None; 2 * prog.ncaps];
        if Vm::exec(prog, &mut cache, &mut caps, Input::new(text), 0) {
            Some(caps)
        } else {
            None
        }
    }

    #[test]
    fn longest_alternative_wins() {
        let prog = program("a|ab");
        let caps = find(&prog, b"ab").unwrap();
        assert_eq!(&caps[..2], &[Some(0), Some(2)]);
    }

    // Full capture tracking in VM threads: every thread carries the same
    // slot table as the simulation engine.
    #[test]
    fn group_slots_are_tracked_per_thread() {
        let prog = program("(a+)(b*)");
        let caps = find(&prog, b"xaab").unwrap();
        assert_eq!(&caps[..2], &[Some(1), Some(4)]);
        assert_eq!(&caps[2..4], &[Some(1), Some(3)]);
        assert_eq!(&caps[4..6], &[Some(3), Some(4)]);
    }

    #[test]
    fn assertions_execute_in_bytecode() {
        let prog = program("^ab$");
        assert!(find(&prog, b"ab").is_some());
        assert!(find(&prog, b"zab").is_none());
        assert!(find(&prog, b"abz").is_none());
    }

    #[test]
    fn min_length_prunes_short_input() {
        let prog = program("abcd");
        assert_eq!(prog.min_match_len, 4);
        assert!(find(&prog, b"abc").is_none());
    }

    #[test]
    fn unmatched_groups_stay_unset() {
        let prog = program("(a)|(b)");
        let caps = find(&prog, b"b").unwrap();
        assert_eq!(&caps[2..4], &[None, None]);
        assert_eq!(&caps[4..6], &[Some(0), Some(1)]);
    }
}
