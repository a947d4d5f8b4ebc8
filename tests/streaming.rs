// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

// The streaming driver must report exactly the matches of `find_all` on
// the concatenated input, for every way of chunking it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use rematch::{Error, Regex};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn spans(re: &Regex, text: &[u8]) -> Vec<(usize, usize)> {
    re.find_all(text).iter().map(|m| (m.start, m.end)).collect()
}

fn stream_spans(re: &Regex, chunks: &[&[u8]]) -> Vec<(usize, usize)> {
    let mut stream = re.streaming().unwrap();
    for chunk in chunks {
        stream.feed(chunk).unwrap();
    }
    stream.finalize().unwrap();
    stream
        .matches()
        .iter()
        .map(|m| (m.m.start, m.m.end))
        .collect()
}

#[test]
fn match_across_chunk_boundary() {
    init_logging();
    let re = Regex::new("hello").unwrap();
    let mut stream = re.streaming().unwrap();
    stream.feed(b"hel").unwrap();
    stream.feed(b"lo wor").unwrap();
    stream.feed(b"ld").unwrap();
    stream.finalize().unwrap();
    let ms = stream.matches();
    assert_eq!(ms.len(), 1);
    assert_eq!((ms[0].m.start, ms[0].m.end), (0, 5));
    assert_eq!((ms[0].start_chunk, ms[0].end_chunk), (0, 1));
    assert!(ms[0].cross_boundary);
}

#[test]
fn slice_reconstructs_across_chunks() {
    let re = Regex::new(r"\d+").unwrap();
    let chunks: &[&[u8]] = &[b"order 12", b"34", b"5 shipped"];
    let mut stream = re.streaming().unwrap();
    for chunk in chunks {
        stream.feed(chunk).unwrap();
    }
    stream.finalize().unwrap();
    let ms = stream.matches();
    assert_eq!(ms.len(), 1);
    assert_eq!((ms[0].m.start, ms[0].m.end), (6, 11));
    assert!(ms[0].cross_boundary);
    assert_eq!(stream.slice_of(&ms[0], chunks), b"12345".to_vec());
}

#[test]
fn fixed_chunkings_match_find_all() {
    init_logging();
    let cases: &[(&str, &[u8])] = &[
        ("hello", b"hello hello"),
        ("a*", b"aaabaa"),
        ("a|ab", b"aab"),
        ("[0-9]+", b"a1b22c333"),
        (r"\w+", b"one two three"),
        ("^abc", b"abcabc"),
        ("abc$", b"xabc"),
        ("^a*$", b"aaa"),
        (r"\p{L}+", "Hello\u{4E16}\u{754C} ok".as_bytes()),
        (r"\w+", b"ab\xFFcd"),
    ];
    for &(pat, text) in cases {
        let re = Regex::new(pat).unwrap();
        let expected = spans(&re, text);
        // Whole input in one chunk, byte-at-a-time, and split at every
        // possible single boundary.
        assert_eq!(expected, stream_spans(&re, &[text]), "`{}` single chunk", pat);
        let bytes: Vec<&[u8]> = text.chunks(1).collect();
        assert_eq!(expected, stream_spans(&re, &bytes), "`{}` byte chunks", pat);
        for split in 0..=text.len() {
            let (a, b) = text.split_at(split);
            assert_eq!(
                expected,
                stream_spans(&re, &[a, b]),
                "`{}` on {:?} split at {}",
                pat,
                text,
                split
            );
        }
    }
}

#[test]
fn random_chunkings_match_find_all() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let patterns = ["hel+o", "a|ab", r"\d{2}", "x.y", r"\p{L}+", "a*"];
    let text = "say hello 42 x\u{4E16}y a\u{754C}hello aa 11 ok".as_bytes();
    for pat in patterns {
        let re = Regex::new(pat).unwrap();
        let expected = spans(&re, text);
        for _ in 0..50 {
            let mut chunks: Vec<&[u8]> = vec![];
            let mut pos = 0;
            while pos < text.len() {
                let len = rng.gen_range(0..=text.len() - pos);
                chunks.push(&text[pos..pos + len]);
                pos += len;
                if len == 0 {
                    // Avoid spinning on empty chunks forever.
                    let len = rng.gen_range(1..=text.len() - pos);
                    chunks.push(&text[pos..pos + len]);
                    pos += len;
                }
            }
            assert_eq!(
                expected,
                stream_spans(&re, &chunks),
                "`{}` chunked as {:?}",
                pat,
                chunks.iter().map(|c| c.len()).collect::<Vec<_>>()
            );
        }
    }
}

#[test]
fn codepoint_split_across_chunks() {
    let re = Regex::new(r"\p{L}+").unwrap();
    let text = "Hello\u{4E16}\u{754C}".as_bytes();
    // Split inside the first CJK codepoint's three-byte sequence.
    let (a, b) = text.split_at(6);
    let got = stream_spans(&re, &[a, b]);
    assert_eq!(got, vec![(0, text.len())]);
}

#[test]
fn truncated_codepoint_at_stream_end() {
    let re = Regex::new(r"\w+").unwrap();
    // The final chunk ends mid-codepoint; finalize treats the leftovers as
    // undecodable bytes.
    let got = stream_spans(&re, &[b"ab", &[0xE4, 0xB8]]);
    assert_eq!(got, vec![(0, 2)]);
}

#[test]
fn end_anchor_only_fires_at_finalize() {
    let re = Regex::new("ab$").unwrap();
    let mut stream = re.streaming().unwrap();
    stream.feed(b"ab").unwrap();
    // The chunk boundary is not the end of the stream.
    assert!(stream.matches().is_empty());
    stream.feed(b"ab").unwrap();
    stream.finalize().unwrap();
    let got: Vec<(usize, usize)> = stream
        .matches()
        .iter()
        .map(|m| (m.m.start, m.m.end))
        .collect();
    assert_eq!(got, vec![(2, 4)]);
}

#[test]
fn start_anchor_fires_once_per_lifetime() {
    let re = Regex::new("^ab").unwrap();
    let mut stream = re.streaming().unwrap();
    stream.feed(b"ab").unwrap();
    stream.feed(b"ab").unwrap();
    stream.finalize().unwrap();
    let got: Vec<(usize, usize)> = stream
        .matches()
        .iter()
        .map(|m| (m.m.start, m.m.end))
        .collect();
    assert_eq!(got, vec![(0, 2)]);
}

#[test]
fn empty_chunks_are_boundaries_too() {
    let re = Regex::new("ab").unwrap();
    let mut stream = re.streaming().unwrap();
    stream.feed(b"a").unwrap();
    stream.feed(b"").unwrap();
    stream.feed(b"b").unwrap();
    stream.finalize().unwrap();
    let ms = stream.matches();
    assert_eq!(ms.len(), 1);
    assert_eq!((ms[0].m.start, ms[0].m.end), (0, 2));
    assert_eq!((ms[0].start_chunk, ms[0].end_chunk), (0, 2));
    assert!(ms[0].cross_boundary);
}

#[test]
fn reset_restores_initial_state() {
    let re = Regex::new("^hello").unwrap();
    let mut stream = re.streaming().unwrap();
    stream.feed(b"garbage").unwrap();
    stream.finalize().unwrap();
    assert!(stream.matches().is_empty());
    stream.reset();
    // `^` fires again after a reset.
    stream.feed(b"hello").unwrap();
    stream.finalize().unwrap();
    assert_eq!(stream.matches().len(), 1);
}

#[test]
fn feed_after_finalize_is_an_error() {
    let re = Regex::new("a").unwrap();
    let mut stream = re.streaming().unwrap();
    stream.feed(b"a").unwrap();
    stream.finalize().unwrap();
    // finalize is idempotent...
    stream.finalize().unwrap();
    // ...but feeding a finished stream is refused.
    match stream.feed(b"b") {
        Err(Error::InvalidInput(_)) => {}
        other => panic!("expected InvalidInput, got {:?}", other),
    }
}

#[test]
fn finalize_without_feeding() {
    let re = Regex::new("a*").unwrap();
    let mut stream = re.streaming().unwrap();
    stream.finalize().unwrap();
    let got: Vec<(usize, usize)> = stream
        .matches()
        .iter()
        .map(|m| (m.m.start, m.m.end))
        .collect();
    assert_eq!(got, vec![(0, 0)]);
}
