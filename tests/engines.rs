// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// Exercises engine selection and checks that every execution path reports
// identical matches.

use std::sync::Arc;

use rematch::{Error, Features, MatchEngine, Regex, RegexBuilder, RuntimeConfig};

fn builder_force_nfa() -> RegexBuilder {
    RegexBuilder::new().runtime(RuntimeConfig {
        force_nfa: true,
        ..RuntimeConfig::default()
    })
}

const PATTERNS: &[&str] = &[
    "hello",
    "hel+o",
    "a|ab",
    "foo|barbar",
    "[0-9]+",
    "[^x]+y",
    r"\w+@\w+",
    "(?:ab|cd)*e",
    "a{2,4}",
    ".x.",
];

const INPUTS: &[&[u8]] = &[
    b"",
    b"hello world",
    b"ab",
    b"aab",
    b"xbarbar foo",
    b"abc123def456",
    b"user@host",
    b"ababcde",
    b"aaaaa",
    b"\xFFax\xFEb",
    b"yyy",
];

#[test]
fn all_engines_agree() {
    for &pat in PATTERNS {
        let auto = Regex::new(pat).unwrap();
        let nfa = builder_force_nfa().build(pat).unwrap();
        let nojit = RegexBuilder::new().jit(false).build(pat).unwrap();
        for &text in INPUTS {
            let expected: Vec<(usize, usize)> = auto
                .find_all(text)
                .iter()
                .map(|m| (m.start, m.end))
                .collect();
            for re in [&nfa, &nojit] {
                let got: Vec<(usize, usize)> = re
                    .find_all(text)
                    .iter()
                    .map(|m| (m.start, m.end))
                    .collect();
                assert_eq!(
                    expected, got,
                    "engines disagree for `{}` on {:?}",
                    pat, text
                );
            }
            assert_eq!(auto.is_match(text), auto.find(text).is_some());
        }
    }
}

#[test]
fn engine_selection_rules() {
    // A pure literal with no captures requested degrades to substring
    // search; requesting the group pushes it onto the NFA simulation.
    let re = Regex::new("(hel)lo").unwrap();
    assert_eq!(re.selected_engine(false), MatchEngine::Literals);
    assert_eq!(re.selected_engine(true), MatchEngine::Nfa);
    // Without explicit groups the whole-match span alone never needs the
    // NFA.
    let re = Regex::new("hello").unwrap();
    assert_eq!(re.selected_engine(true), MatchEngine::Literals);

    // No complete literal and no assertions: the bytecode VM runs the
    // existence check.
    let re = Regex::new("([a-c]+)x").unwrap();
    assert_eq!(re.selected_engine(false), MatchEngine::Vm);
    assert_eq!(re.selected_engine(true), MatchEngine::Nfa);

    // Anchors exclude the VM.
    let re = Regex::new("^[a-c]+x").unwrap();
    assert_eq!(re.selected_engine(false), MatchEngine::Nfa);

    // force_nfa overrides everything.
    let re = builder_force_nfa().build("hello").unwrap();
    assert_eq!(re.selected_engine(false), MatchEngine::Nfa);

    // Disabling the bytecode feature removes the VM from consideration.
    let re = RegexBuilder::new().jit(false).build("[a-c]+x").unwrap();
    assert_eq!(re.selected_engine(false), MatchEngine::Nfa);
}

#[test]
fn reserved_flags_are_rejected() {
    for build in [
        RegexBuilder::new().case_insensitive(true).build("a"),
        RegexBuilder::new().multiline(true).build("a"),
        RegexBuilder::new().dot_all(true).build("a"),
    ] {
        match build {
            Err(Error::UnsupportedFeature(_)) => {}
            other => panic!("expected UnsupportedFeature, got {:?}", other.map(|_| ())),
        }
    }
}

#[test]
fn size_limit_overflow_errors() {
    match RegexBuilder::new().size_limit(64).build("a{100,200}") {
        Err(Error::CompiledTooBig(limit)) => assert_eq!(limit, 64),
        other => panic!("expected CompiledTooBig, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn parse_errors_surface_with_diagnostics() {
    match Regex::new("(ab") {
        Err(Error::Syntax(err)) => {
            assert_eq!(err.kind, rematch::syntax::ErrorKind::UnbalancedParentheses);
            assert_eq!(err.line, 1);
        }
        other => panic!("expected Syntax error, got {:?}", other.map(|_| ())),
    }
    assert!(Regex::new("(?=a)").is_err());
    assert!(Regex::new(r"x\1").is_err());
}

#[test]
fn streaming_can_be_disabled() {
    let re = RegexBuilder::new()
        .features(Features {
            streaming_enabled: false,
            ..Features::default()
        })
        .build("a")
        .unwrap();
    match re.streaming() {
        Err(Error::UnsupportedFeature(_)) => {}
        _ => panic!("expected streaming to be disabled"),
    }
}

#[test]
fn unicode_can_be_disabled() {
    match RegexBuilder::new().unicode(false).build(r"\p{L}") {
        Err(Error::UnsupportedFeature(_)) => {}
        other => panic!("expected UnsupportedFeature, got {:?}", other.map(|_| ())),
    }
    // Plain patterns still compile without the tables.
    let re = RegexBuilder::new().unicode(false).build(r"\d+").unwrap();
    assert!(re.is_match(b"42"));
}

#[test]
fn captures_can_be_disabled() {
    let re = RegexBuilder::new()
        .features(Features {
            capture_groups: false,
            ..Features::default()
        })
        .build("(a+)(b)")
        .unwrap();
    assert_eq!(re.capture_count(), 1);
    let m = re.find(b"xaab").unwrap();
    assert_eq!((m.start, m.end), (1, 4));
    assert_eq!(m.group(1), None);
}

#[test]
fn regex_is_shareable_across_threads() {
    let re = Arc::new(Regex::new(r"\w+").unwrap());
    let mut handles = vec![];
    for i in 0..4 {
        let re = Arc::clone(&re);
        handles.push(std::thread::spawn(move || {
            let text = format!("thread {} text", i);
            let spans: Vec<(usize, usize)> = re
                .find_all(text.as_bytes())
                .iter()
                .map(|m| (m.start, m.end))
                .collect();
            assert_eq!(spans.len(), 3);
        }));
    }
    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn display_and_metadata() {
    let re = Regex::new("(a)(b)?").unwrap();
    assert_eq!(re.as_str(), "(a)(b)?");
    assert_eq!(format!("{}", re), "(a)(b)?");
    assert_eq!(re.capture_count(), 3);
    assert!(re.flags().unicode);
    assert!(!re.flags().case_insensitive);
}
