// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A streaming-capable regular expression engine.
//!
//! A pattern is parsed into a syntax tree, lowered to a nondeterministic
//! finite automaton by Thompson construction, and executed either by a
//! set-based NFA simulation with capture-group tracking or, for patterns
//! without positional assertions, by a thread VM over a flat bytecode
//! program. Searching never backtracks: each candidate start offset gets a
//! single forward pass, and the reported match is the longest one at the
//! leftmost feasible position.
//!
//! # Searching
//!
//! ```
//! use rematch::Regex;
//!
//! let re = Regex::new(r"\d{3}-\d{4}").unwrap();
//! let m = re.find(b"call 555-0199 today").unwrap();
//! assert_eq!((m.start, m.end), (5, 13));
//! ```
//!
//! Capture groups are numbered in left-paren order, with group 0 reserved
//! for the whole match:
//!
//! ```
//! use rematch::Regex;
//!
//! let re = Regex::new("(a+)(b+)").unwrap();
//! let m = re.find(b"xaabb").unwrap();
//! assert_eq!(m.group(1).unwrap().slice(b"xaabb"), b"aa");
//! assert_eq!(m.group(2).unwrap().slice(b"xaabb"), b"bb");
//! ```
//!
//! # Streaming
//!
//! Input can be fed in arbitrary chunks. Matches carry offsets into the
//! cumulative stream and are identical to what [`Regex::find_all`] reports
//! on the concatenated input, however the input is split:
//!
//! ```
//! use rematch::Regex;
//!
//! let re = Regex::new("hello").unwrap();
//! let mut stream = re.streaming().unwrap();
//! stream.feed(b"hel").unwrap();
//! stream.feed(b"lo world").unwrap();
//! stream.finalize().unwrap();
//! let ms = stream.matches();
//! assert_eq!((ms[0].m.start, ms[0].m.end), (0, 5));
//! assert!(ms[0].cross_boundary);
//! ```
//!
//! # Syntax
//!
//! Literals, `.`, the anchors `^` and `$`, capturing `(..)` and
//! non-capturing `(?:..)` groups, alternation, the quantifiers `*`, `+`,
//! `?`, `{n}`, `{n,}` and `{n,m}` (each optionally non-greedy with a
//! trailing `?`), character classes `[..]`, the predefined classes `\d`,
//! `\w`, `\s` and their negations, and Unicode property classes
//! `\p{NAME}` / `\P{NAME}` over a small fixed set of names. Backreferences,
//! look-around, named groups and flag groups are rejected at parse time.
//!
//! Input is a byte slice decoded as UTF-8 on the fly; bytes that do not
//! decode are skipped without matching. Pattern literals are bytes, so only
//! ASCII literals can match; non-ASCII text is matched through classes.

use std::error;
use std::fmt;

pub use rematch_syntax as syntax;

pub use crate::config::{Features, Flags, RuntimeConfig};
#[doc(hidden)]
pub use crate::exec::MatchEngine;
pub use crate::re::{Match, Regex, RegexBuilder};
pub use crate::stream::{StreamMatch, StreamingMatcher};

mod char;
mod compile;
mod config;
mod exec;
mod input;
mod literals;
mod nfa;
mod pool;
mod program;
mod re;
mod sim;
mod stream;
mod vm;

/// An error that occurred while compiling or using a regular expression.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// The pattern is not a valid regular expression; carries the parse
    /// diagnostic.
    Syntax(syntax::Error),
    /// The compiled automaton exceeded the configured size limit (the
    /// limit, in bytes, is given).
    CompiledTooBig(usize),
    /// A recognized but unavailable capability was requested.
    UnsupportedFeature(&'static str),
    /// Matching could not be carried out. Reserved: the engines cannot
    /// currently fail on well-formed input.
    MatchingFailed(&'static str),
    /// An allocation failed. Reserved: allocation failure aborts the
    /// process on this platform.
    OutOfMemory,
    /// The operation is not valid in the current state, e.g. feeding a
    /// finalized streaming matcher.
    InvalidInput(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Syntax(ref err) => err.fmt(f),
            Error::CompiledTooBig(limit) => {
                write!(f, "compiled regex exceeds size limit of {} bytes", limit)
            }
            Error::UnsupportedFeature(msg) => write!(f, "unsupported feature: {}", msg),
            Error::MatchingFailed(msg) => write!(f, "matching failed: {}", msg),
            Error::OutOfMemory => write!(f, "out of memory"),
            Error::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            Error::Syntax(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<syntax::Error> for Error {
    fn from(err: syntax::Error) -> Error {
        Error::Syntax(err)
    }
}
