// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration records.
//!
//! All knobs are plain booleans threaded explicitly through
//! [`RegexBuilder`](crate::RegexBuilder) into compilation; there is no
//! process-wide state.

/// Engine capabilities decided at compile time of a pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Features {
    /// Permit compiling the pattern to a bytecode program.
    pub jit_enabled: bool,
    /// Enable the Unicode property tables (`\p{..}`).
    pub unicode_enabled: bool,
    /// Permit constructing a streaming matcher.
    pub streaming_enabled: bool,
    /// Track explicit capture groups. When disabled, parenthesised groups
    /// still group but record no offsets; the whole-match span is always
    /// tracked.
    pub capture_groups: bool,
    /// Reserved. There is no backtracking engine.
    pub backtracking: bool,
}

impl Default for Features {
    fn default() -> Features {
        Features {
            jit_enabled: true,
            unicode_enabled: true,
            streaming_enabled: true,
            capture_groups: true,
            backtracking: false,
        }
    }
}

/// Per-search preferences. Unlike [`Features`], nothing here changes what a
/// pattern can express, only which engine runs it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Prefer the bytecode VM when the selection rule allows it.
    pub prefer_jit: bool,
    /// Advisory: callers that can chunk their input may consult this to
    /// route through the streaming matcher.
    pub prefer_streaming: bool,
    /// Always use the NFA simulation, overriding every other preference.
    pub force_nfa: bool,
    /// Emit engine-selection and compilation diagnostics through `log`.
    pub enable_diagnostics: bool,
    /// Dump compiled forms through `log` at debug level.
    pub debug_mode: bool,
}

impl Default for RuntimeConfig {
    fn default() -> RuntimeConfig {
        RuntimeConfig {
            prefer_jit: true,
            prefer_streaming: false,
            force_nfa: false,
            enable_diagnostics: false,
            debug_mode: false,
        }
    }
}

/// The flags a compiled regex was built with.
///
/// `case_insensitive`, `multiline` and `dot_all` are recognized but not
/// implemented; setting them makes compilation fail with
/// [`Error::UnsupportedFeature`](crate::Error::UnsupportedFeature) rather
/// than silently matching with different semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Flags {
    pub case_insensitive: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub unicode: bool,
    pub jit_enabled: bool,
}

impl Default for Flags {
    fn default() -> Flags {
        Flags {
            case_insensitive: false,
            multiline: false,
            dot_all: false,
            unicode: true,
            jit_enabled: true,
        }
    }
}
