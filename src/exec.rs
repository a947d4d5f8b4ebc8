// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use log::debug;

use rematch_syntax::Ast;

use crate::compile::{max_match_len, min_match_len, Compiler};
use crate::config::{Features, Flags, RuntimeConfig};
use crate::input::Input;
use crate::literals::{self, Literals};
use crate::nfa::Nfa;
use crate::pool::Pool;
use crate::program::{Program, ProgramCompiler};
use crate::sim::{Sim, SimCache};
use crate::vm::{Vm, VmCache};
use crate::Error;

/// The matching engines offered by this implementation.
///
/// N.B. This is exported for use in testing.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchEngine {
    /// The set-based NFA simulation. Can always be employed.
    Nfa,
    /// The thread VM over the bytecode program. Selected when the program
    /// has no positional assertions and no captures are requested.
    Vm,
    /// When the entire regex is a literal alternation and no capture groups
    /// are requested, plain substring search suffices.
    Literals,
}

/// Executor manages the execution of a regular expression.
///
/// It owns every compiled form of a single pattern (the syntax tree, the
/// automaton, the optional bytecode program and the literal prefixes) and
/// chooses which engine answers a given search. Immutable once built; the
/// scratch pools make it shareable across threads.
#[derive(Debug)]
pub struct Exec {
    original: String,
    ast: Ast,
    nfa: Nfa,
    program: Option<Program>,
    prefixes: Literals,
    features: Features,
    runtime: RuntimeConfig,
    flags: Flags,
    sim_cache: Pool<SimCache>,
    vm_cache: Pool<VmCache>,
}

impl Exec {
    pub fn new(
        pattern: &str,
        size_limit: usize,
        features: Features,
        runtime: RuntimeConfig,
        flags: Flags,
    ) -> Result<Exec, Error> {
        let ast = Ast::parse(pattern).map_err(Error::Syntax)?;
        if !features.unicode_enabled && ast.uses_properties() {
            return Err(Error::UnsupportedFeature(
                "property classes require the unicode feature",
            ));
        }
        let nfa = Compiler::new(size_limit)
            .captures(features.capture_groups)
            .compile(&ast)?;
        let prefixes = literals::prefixes(&nfa);
        let program = if features.jit_enabled {
            Some(ProgramCompiler::compile(
                &nfa,
                min_match_len(&ast.root),
                max_match_len(&ast.root),
            ))
        } else {
            None
        };
        if runtime.enable_diagnostics {
            debug!(
                "compiled `{}`: {} states, {} bytecode insts, prefixes {:?}",
                pattern,
                nfa.num_states(),
                program.as_ref().map_or(0, |p| p.insts.len()),
                prefixes,
            );
        }
        if runtime.debug_mode {
            debug!("automaton for `{}`: {:?}", pattern, nfa);
        }
        Ok(Exec {
            original: pattern.to_owned(),
            ast,
            nfa,
            program,
            prefixes,
            features,
            runtime,
            flags,
            sim_cache: Pool::new(Box::new(SimCache::new)),
            vm_cache: Pool::new(Box::new(VmCache::new)),
        })
    }

    /// Executes the search, filling `caps` on a match.
    ///
    /// `caps` has length 0 (existence only), 2 (whole-match span) or twice
    /// the capture count (all groups); the engine choice keys off it.
    pub fn exec(&self, caps: &mut [Option<usize>], text: &[u8], start: usize) -> bool {
        match self.choose_engine(caps.len()) {
            MatchEngine::Literals => self.exec_literals(caps, text, start),
            MatchEngine::Vm => match self.program {
                Some(ref prog) => {
                    let mut cache = self.vm_cache.get();
                    Vm::exec(prog, &mut cache, caps, Input::new(text), start)
                }
                None => self.exec_nfa(caps, text, start),
            },
            MatchEngine::Nfa => self.exec_nfa(caps, text, start),
        }
    }

    fn exec_nfa(&self, caps: &mut [Option<usize>], text: &[u8], start: usize) -> bool {
        let mut cache = self.sim_cache.get();
        Sim::exec(
            &self.nfa,
            &self.prefixes,
            &mut cache,
            caps,
            Input::new(text),
            start,
        )
    }

    fn exec_literals(&self, caps: &mut [Option<usize>], text: &[u8], start: usize) -> bool {
        match self.prefixes.find(&text[start..]) {
            None => false,
            Some((s, e)) => {
                if caps.len() >= 2 {
                    caps[0] = Some(start + s);
                    caps[1] = Some(start + e);
                }
                true
            }
        }
    }

    /// Applies the selection rule: literals beat everything when they cover
    /// the whole pattern, the bytecode VM runs assertion-free programs when
    /// no captures are requested, and the NFA simulation is the fallback
    /// that handles everything.
    fn choose_engine(&self, cap_len: usize) -> MatchEngine {
        let groups_required = cap_len > 2;
        let engine = if self.runtime.force_nfa {
            MatchEngine::Nfa
        } else if !groups_required && self.prefixes.at_match() {
            MatchEngine::Literals
        } else if self.features.jit_enabled
            && self.runtime.prefer_jit
            && !groups_required
            && self.program.is_some()
            && !self.nfa.has_assertions()
        {
            MatchEngine::Vm
        } else {
            MatchEngine::Nfa
        };
        if self.runtime.enable_diagnostics {
            debug!("engine for `{}` (cap_len {}): {:?}", self.original, cap_len, engine);
        }
        engine
    }

    #[doc(hidden)]
    pub fn selected_engine(&self, cap_len: usize) -> MatchEngine {
        self.choose_engine(cap_len)
    }

    /// Returns the total number of capture groups, including the zeroth
    /// capture for the whole match.
    pub fn num_captures(&self) -> usize {
        self.nfa.ncaps
    }

    /// Allocate new capture slots: two per group.
    pub fn alloc_captures(&self) -> Vec<Option<usize>> {
        vec![None; 2 * self.nfa.ncaps]
    }

    pub fn regex_str(&self) -> &str {
        &self.original
    }

    pub fn syntax(&self) -> &Ast {
        &self.ast
    }

    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    pub fn features(&self) -> Features {
        self.features
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }
}
