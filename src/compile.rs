// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::mem::size_of;

use rematch_syntax::{Ast, Expr};

use crate::nfa::{ClassRanges, Cond, Edge, Nfa, State, StateIdx};
use crate::Error;

/// An automaton builder.
///
/// Lowers an abstract syntax tree to an NFA by Thompson construction: each
/// expression becomes a fragment with a single entry and a single exit
/// state, and fragments compose with epsilon transitions.
pub struct Compiler {
    states: Vec<State>,
    size_limit: usize,
    captures: bool,
}

/// A partially built automaton piece: its entry and exit state.
#[derive(Clone, Copy)]
struct Frag {
    start: StateIdx,
    end: StateIdx,
}

impl Compiler {
    /// Creates a new compiler that limits the size of the automaton to the
    /// given number of bytes.
    pub fn new(size_limit: usize) -> Compiler {
        Compiler {
            states: vec![],
            size_limit,
            captures: true,
        }
    }

    /// Controls whether explicit capture groups emit recording transitions.
    /// The whole-match group 0 is always recorded.
    pub fn captures(mut self, yes: bool) -> Compiler {
        self.captures = yes;
        self
    }

    /// Compiles the AST into an automaton whose language equals the
    /// pattern's language.
    pub fn compile(mut self, ast: &Ast) -> Result<Nfa, Error> {
        let inner = self.c(&ast.root)?;
        // Group 0 wraps the entire pattern so that every engine reports the
        // whole-match span through the same slot mechanism.
        let start = self.state()?;
        let accept = self.state()?;
        self.edge(start, inner.start, Cond::GroupStart(0));
        self.edge(inner.end, accept, Cond::GroupEnd(0));
        let ncaps = if self.captures {
            1 + ast.groups as usize
        } else {
            1
        };
        Ok(Nfa {
            states: self.states,
            start,
            accept,
            ncaps,
            anchored_start: anchored_start(&ast.root),
            anchored_end: anchored_end(&ast.root),
        })
    }

    fn c(&mut self, expr: &Expr) -> Result<Frag, Error> {
        match *expr {
            Expr::Empty => self.empty(),
            Expr::Literal(b) => self.consuming(Cond::Char(b)),
            Expr::AnyChar => self.consuming(Cond::AnyChar),
            Expr::Class(ref cls) => {
                self.consuming(Cond::Class(ClassRanges::from_class(cls)))
            }
            Expr::StartText => self.zero_width(Cond::AssertStart),
            Expr::EndText => self.zero_width(Cond::AssertEnd),
            Expr::Group { ref e, i } => {
                if !self.captures {
                    return self.c(e);
                }
                let inner = self.c(e)?;
                let start = self.state()?;
                let end = self.state()?;
                self.edge(start, inner.start, Cond::GroupStart(i));
                self.edge(inner.end, end, Cond::GroupEnd(i));
                Ok(Frag { start, end })
            }
            Expr::NonCapture { ref e } => self.c(e),
            Expr::Concat {
                ref left,
                ref right,
            } => {
                let l = self.c(left)?;
                let r = self.c(right)?;
                self.edge(l.end, r.start, Cond::Epsilon);
                Ok(Frag {
                    start: l.start,
                    end: r.end,
                })
            }
            Expr::Alternate {
                ref left,
                ref right,
            } => {
                let l = self.c(left)?;
                let r = self.c(right)?;
                let start = self.state()?;
                let end = self.state()?;
                self.edge(start, l.start, Cond::Epsilon);
                self.edge(start, r.start, Cond::Epsilon);
                self.edge(l.end, end, Cond::Epsilon);
                self.edge(r.end, end, Cond::Epsilon);
                Ok(Frag { start, end })
            }
            Expr::Repeat {
                ref e,
                min,
                max,
                greedy,
            } => match (min, max) {
                (0, None) => self.star(e, greedy),
                (1, None) => self.plus(e, greedy),
                (0, Some(1)) => self.optional(e, greedy),
                (min, max) => self.counted(e, min, max, greedy),
            },
        }
    }

    fn star(&mut self, e: &Expr, greedy: bool) -> Result<Frag, Error> {
        let x = self.c(e)?;
        let start = self.state()?;
        let end = self.state()?;
        if greedy {
            self.edge(start, x.start, Cond::Epsilon);
            self.edge(start, end, Cond::Epsilon);
            self.edge(x.end, x.start, Cond::Epsilon);
            self.edge(x.end, end, Cond::Epsilon);
        } else {
            self.edge(start, end, Cond::Epsilon);
            self.edge(start, x.start, Cond::Epsilon);
            self.edge(x.end, end, Cond::Epsilon);
            self.edge(x.end, x.start, Cond::Epsilon);
        }
        Ok(Frag { start, end })
    }

    fn plus(&mut self, e: &Expr, greedy: bool) -> Result<Frag, Error> {
        let x = self.c(e)?;
        let end = self.state()?;
        if greedy {
            self.edge(x.end, x.start, Cond::Epsilon);
            self.edge(x.end, end, Cond::Epsilon);
        } else {
            self.edge(x.end, end, Cond::Epsilon);
            self.edge(x.end, x.start, Cond::Epsilon);
        }
        Ok(Frag {
            start: x.start,
            end,
        })
    }

    fn optional(&mut self, e: &Expr, greedy: bool) -> Result<Frag, Error> {
        let x = self.c(e)?;
        let start = self.state()?;
        let end = self.state()?;
        if greedy {
            self.edge(start, x.start, Cond::Epsilon);
            self.edge(start, end, Cond::Epsilon);
        } else {
            self.edge(start, end, Cond::Epsilon);
            self.edge(start, x.start, Cond::Epsilon);
        }
        self.edge(x.end, end, Cond::Epsilon);
        Ok(Frag { start, end })
    }

    // `{n}`, `{n,}` and `{n,m}`: n concatenated copies, then either a star
    // (no upper bound) or a chain of optional copies.
    fn counted(
        &mut self,
        e: &Expr,
        min: u32,
        max: Option<u32>,
        greedy: bool,
    ) -> Result<Frag, Error> {
        let mut frag: Option<Frag> = None;
        for _ in 0..min {
            let x = self.c(e)?;
            frag = Some(self.cat(frag, x));
        }
        match max {
            None => {
                let tail = self.star(e, greedy)?;
                frag = Some(self.cat(frag, tail));
            }
            Some(max) => {
                for _ in min..max {
                    let tail = self.optional(e, greedy)?;
                    frag = Some(self.cat(frag, tail));
                }
            }
        }
        match frag {
            Some(frag) => Ok(frag),
            // `{0,0}` matches only the empty string.
            None => self.empty(),
        }
    }

    fn cat(&mut self, left: Option<Frag>, right: Frag) -> Frag {
        match left {
            None => right,
            Some(left) => {
                self.edge(left.end, right.start, Cond::Epsilon);
                Frag {
                    start: left.start,
                    end: right.end,
                }
            }
        }
    }

    fn empty(&mut self) -> Result<Frag, Error> {
        self.zero_width(Cond::Epsilon)
    }

    fn zero_width(&mut self, cond: Cond) -> Result<Frag, Error> {
        let start = self.state()?;
        let end = self.state()?;
        self.edge(start, end, cond);
        Ok(Frag { start, end })
    }

    fn consuming(&mut self, cond: Cond) -> Result<Frag, Error> {
        let start = self.state()?;
        let end = self.state()?;
        self.edge(start, end, cond);
        Ok(Frag { start, end })
    }

    fn state(&mut self) -> Result<StateIdx, Error> {
        if (self.states.len() + 1) * size_of::<State>() > self.size_limit
            || self.states.len() >= StateIdx::MAX as usize
        {
            return Err(Error::CompiledTooBig(self.size_limit));
        }
        self.states.push(State::default());
        Ok((self.states.len() - 1) as StateIdx)
    }

    fn edge(&mut self, from: StateIdx, to: StateIdx, cond: Cond) {
        self.states[from as usize].edges.push(Edge { to, cond });
    }
}

/// True iff every path through the expression begins with `^`.
pub fn anchored_start(expr: &Expr) -> bool {
    match *expr {
        Expr::StartText => true,
        Expr::Group { ref e, .. } | Expr::NonCapture { ref e } => anchored_start(e),
        Expr::Concat { ref left, .. } => anchored_start(left),
        Expr::Alternate {
            ref left,
            ref right,
        } => anchored_start(left) && anchored_start(right),
        Expr::Repeat { ref e, min, .. } => min >= 1 && anchored_start(e),
        _ => false,
    }
}

/// True iff every path through the expression ends with `$`.
pub fn anchored_end(expr: &Expr) -> bool {
    match *expr {
        Expr::EndText => true,
        Expr::Group { ref e, .. } | Expr::NonCapture { ref e } => anchored_end(e),
        Expr::Concat { ref right, .. } => anchored_end(right),
        Expr::Alternate {
            ref left,
            ref right,
        } => anchored_end(left) && anchored_end(right),
        Expr::Repeat { ref e, min, .. } => min >= 1 && anchored_end(e),
        _ => false,
    }
}

/// A lower bound, in bytes, on the length of any match.
pub fn min_match_len(expr: &Expr) -> usize {
    match *expr {
        Expr::Literal(_) | Expr::AnyChar | Expr::Class(_) => 1,
        Expr::Group { ref e, .. } | Expr::NonCapture { ref e } => min_match_len(e),
        Expr::Concat {
            ref left,
            ref right,
        } => min_match_len(left) + min_match_len(right),
        Expr::Alternate {
            ref left,
            ref right,
        } => std::cmp::min(min_match_len(left), min_match_len(right)),
        Expr::Repeat { ref e, min, .. } => min as usize * min_match_len(e),
        _ => 0,
    }
}

/// An upper bound, in bytes, on the length of any match. `None` means
/// unbounded.
pub fn max_match_len(expr: &Expr) -> Option<usize> {
    match *expr {
        Expr::Literal(_) => Some(1),
        // Any codepoint occupies at most four bytes.
        Expr::AnyChar => Some(4),
        Expr::Class(ref cls) => {
            if cls.negated {
                Some(4)
            } else {
                let widest = cls.ranges.last().map_or(0, |r| r.end);
                Some(cp_width(widest))
            }
        }
        Expr::Group { ref e, .. } | Expr::NonCapture { ref e } => max_match_len(e),
        Expr::Concat {
            ref left,
            ref right,
        } => Some(max_match_len(left)?.checked_add(max_match_len(right)?)?),
        Expr::Alternate {
            ref left,
            ref right,
        } => Some(std::cmp::max(max_match_len(left)?, max_match_len(right)?)),
        Expr::Repeat { ref e, max, .. } => {
            let inner = max_match_len(e)?;
            if inner == 0 {
                return Some(0);
            }
            match max {
                None => None,
                Some(max) => inner.checked_mul(max as usize),
            }
        }
        _ => Some(0),
    }
}

fn cp_width(cp: u32) -> usize {
    if cp <= 0x7F {
        1
    } else if cp <= 0x7FF {
        2
    } else if cp <= 0xFFFF {
        3
    } else {
        4
    }
}
