// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Range tables backing the predefined classes (`\d`, `\w`, `\s`) and the
//! property classes (`\p{NAME}`).
//!
//! The property tables cover a deliberately small slice of Unicode: the
//! general categories, scripts and binary properties listed in `property`,
//! with ranges that favor the common blocks over UCD exactness. Codepoints
//! are inclusive `(start, end)` pairs, sorted and non-overlapping.

/// `\d`: ASCII decimal digits.
pub const PERL_DIGIT: &[(u32, u32)] = &[(0x30, 0x39)];

/// `\w`: ASCII word characters.
pub const PERL_WORD: &[(u32, u32)] =
    &[(0x30, 0x39), (0x41, 0x5A), (0x5F, 0x5F), (0x61, 0x7A)];

/// `\s`: space, `\t`, `\n`, vertical tab, form feed, `\r`.
pub const PERL_SPACE: &[(u32, u32)] = &[(0x09, 0x0D), (0x20, 0x20)];

const LETTER: &[(u32, u32)] = &[
    (0x41, 0x5A),
    (0x61, 0x7A),
    (0xAA, 0xAA),
    (0xB5, 0xB5),
    (0xBA, 0xBA),
    (0xC0, 0xD6),
    (0xD8, 0xF6),
    (0xF8, 0x2C1),
    (0x370, 0x3FF),
    (0x400, 0x52F),
    (0x5D0, 0x5EA),
    (0x620, 0x64A),
    (0x66E, 0x6D3),
    (0x3041, 0x3096),
    (0x30A1, 0x30FA),
    (0x3400, 0x4DBF),
    (0x4E00, 0x9FFF),
    (0xF900, 0xFAD9),
];

const LETTER_LOWER: &[(u32, u32)] = &[
    (0x61, 0x7A),
    (0xB5, 0xB5),
    (0xDF, 0xF6),
    (0xF8, 0xFF),
    (0x3B1, 0x3C9),
    (0x430, 0x44F),
];

const LETTER_UPPER: &[(u32, u32)] = &[
    (0x41, 0x5A),
    (0xC0, 0xD6),
    (0xD8, 0xDE),
    (0x391, 0x3A1),
    (0x3A3, 0x3AB),
    (0x410, 0x42F),
];

const NUMBER: &[(u32, u32)] = &[
    (0x30, 0x39),
    (0xB2, 0xB3),
    (0xB9, 0xB9),
    (0xBC, 0xBE),
    (0x660, 0x669),
    (0x6F0, 0x6F9),
    (0x2150, 0x2189),
    (0xFF10, 0xFF19),
];

const NUMBER_DECIMAL: &[(u32, u32)] =
    &[(0x30, 0x39), (0x660, 0x669), (0x6F0, 0x6F9), (0xFF10, 0xFF19)];

const PUNCTUATION: &[(u32, u32)] = &[
    (0x21, 0x23),
    (0x25, 0x2A),
    (0x2C, 0x2F),
    (0x3A, 0x3B),
    (0x3F, 0x40),
    (0x5B, 0x5D),
    (0x5F, 0x5F),
    (0x7B, 0x7B),
    (0x7D, 0x7D),
    (0xA1, 0xA1),
    (0xBF, 0xBF),
    (0x2010, 0x2027),
    (0x2030, 0x205E),
    (0x3001, 0x3003),
    (0x3008, 0x3011),
];

const SYMBOL: &[(u32, u32)] = &[
    (0x24, 0x24),
    (0x2B, 0x2B),
    (0x3C, 0x3E),
    (0x5E, 0x5E),
    (0x60, 0x60),
    (0x7C, 0x7C),
    (0x7E, 0x7E),
    (0xA2, 0xA9),
    (0xAC, 0xAC),
    (0xAE, 0xB1),
    (0xD7, 0xD7),
    (0xF7, 0xF7),
    (0x2190, 0x22FF),
    (0x2600, 0x26FF),
];

const SEPARATOR: &[(u32, u32)] = &[
    (0x20, 0x20),
    (0xA0, 0xA0),
    (0x2000, 0x200A),
    (0x2028, 0x2029),
    (0x202F, 0x202F),
    (0x3000, 0x3000),
];

const SEPARATOR_SPACE: &[(u32, u32)] = &[
    (0x20, 0x20),
    (0xA0, 0xA0),
    (0x2000, 0x200A),
    (0x202F, 0x202F),
    (0x3000, 0x3000),
];

const SCRIPT_LATIN: &[(u32, u32)] = &[
    (0x41, 0x5A),
    (0x61, 0x7A),
    (0xAA, 0xAA),
    (0xBA, 0xBA),
    (0xC0, 0xD6),
    (0xD8, 0xF6),
    (0xF8, 0x24F),
    (0x1E00, 0x1EFF),
];

const SCRIPT_GREEK: &[(u32, u32)] = &[(0x370, 0x3FF), (0x1F00, 0x1FFF)];

const SCRIPT_CYRILLIC: &[(u32, u32)] = &[(0x400, 0x52F), (0x2DE0, 0x2DFF)];

const SCRIPT_HEBREW: &[(u32, u32)] = &[(0x591, 0x5F4)];

const SCRIPT_ARABIC: &[(u32, u32)] = &[(0x600, 0x6FF), (0x750, 0x77F)];

const SCRIPT_HIRAGANA: &[(u32, u32)] = &[(0x3041, 0x3096), (0x309D, 0x309F)];

const SCRIPT_KATAKANA: &[(u32, u32)] =
    &[(0x30A1, 0x30FA), (0x30FD, 0x30FF), (0x31F0, 0x31FF)];

const SCRIPT_HAN: &[(u32, u32)] =
    &[(0x2E80, 0x2EF3), (0x3400, 0x4DBF), (0x4E00, 0x9FFF), (0xF900, 0xFAD9)];

const ASCII: &[(u32, u32)] = &[(0x00, 0x7F)];

const ASCII_HEX_DIGIT: &[(u32, u32)] = &[(0x30, 0x39), (0x41, 0x46), (0x61, 0x66)];

const WHITE_SPACE: &[(u32, u32)] = &[
    (0x09, 0x0D),
    (0x20, 0x20),
    (0x85, 0x85),
    (0xA0, 0xA0),
    (0x2000, 0x200A),
    (0x2028, 0x2029),
    (0x202F, 0x202F),
    (0x3000, 0x3000),
];

/// Looks up the range table for a property name as written inside
/// `\p{..}`. Returns `None` for names outside the supported enumeration.
pub fn property(name: &str) -> Option<&'static [(u32, u32)]> {
    match name {
        "L" | "Letter" => Some(LETTER),
        "Ll" => Some(LETTER_LOWER),
        "Lu" => Some(LETTER_UPPER),
        "N" | "Number" => Some(NUMBER),
        "Nd" => Some(NUMBER_DECIMAL),
        "P" | "Punctuation" => Some(PUNCTUATION),
        "S" | "Symbol" => Some(SYMBOL),
        "Z" | "Separator" => Some(SEPARATOR),
        "Zs" | "Space_Separator" => Some(SEPARATOR_SPACE),
        "Script=Latin" => Some(SCRIPT_LATIN),
        "Script=Greek" => Some(SCRIPT_GREEK),
        "Script=Cyrillic" => Some(SCRIPT_CYRILLIC),
        "Script=Hebrew" => Some(SCRIPT_HEBREW),
        "Script=Arabic" => Some(SCRIPT_ARABIC),
        "Script=Hiragana" => Some(SCRIPT_HIRAGANA),
        "Script=Katakana" => Some(SCRIPT_KATAKANA),
        "Script=Han" => Some(SCRIPT_HAN),
        "ASCII" => Some(ASCII),
        "ASCII_Hex_Digit" => Some(ASCII_HEX_DIGIT),
        "White_Space" => Some(WHITE_SPACE),
        _ => None,
    }
}

// Simple case folding for ASCII and the Latin-1 uppercase block, as
// `(start, end, delta)` where folding adds `delta` to the codepoint. The
// gaps skip `×` (0xD7) and keep `ß`/`ÿ` unmapped, which have no single
// uppercase counterpart here.
const FOLD: &[(u32, u32, u32)] = &[(0x41, 0x5A, 0x20), (0xC0, 0xD6, 0x20), (0xD8, 0xDE, 0x20)];

/// Maps an uppercase ASCII/Latin-1 codepoint to its lowercase counterpart;
/// all other codepoints fold to themselves.
pub fn simple_fold(cp: u32) -> u32 {
    for &(start, end, delta) in FOLD {
        if cp < start {
            break;
        }
        if cp <= end {
            return cp + delta;
        }
    }
    cp
}
