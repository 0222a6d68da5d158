//! Normalizers applied to raw criteria before predicates are composed.
//!
//! Everything here is a pure function of its input except
//! [`normalize_kana_fields`], which rewrites kana entries of the criteria.

use std::fmt;

use unicode_normalization::UnicodeNormalization;

use crate::criteria::{CriterionValue, SearchCriteria};

const HIRAGANA_START: char = '\u{3041}';
const HIRAGANA_END: char = '\u{3096}';
const HIRAGANA_ITERATION_MARKS: [char; 2] = ['\u{309D}', '\u{309E}'];
const KATAKANA_OFFSET: u32 = 0x60;

/// Removes every whitespace character, including the full-width space (U+3000).
pub fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Keeps ASCII digits only, e.g. `"090-1234 (5678)"` becomes `"09012345678"`.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Converts phonetic-reading (kana) text to one canonical form.
pub trait KanaNormalizer: Send + Sync + fmt::Debug {
    fn normalize(&self, input: &str) -> String;
}

/// Canonical full-width katakana.
///
/// NFKC widens half-width katakana (composing voiced sound marks) and narrows
/// full-width ASCII; hiragana is then shifted onto the katakana block.
#[derive(Debug, Clone, Copy, Default)]
pub struct KatakanaNormalizer;

impl KanaNormalizer for KatakanaNormalizer {
    fn normalize(&self, input: &str) -> String {
        input.nfkc().map(hiragana_to_katakana).collect()
    }
}

/// Leaves kana criteria untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityKana;

impl KanaNormalizer for IdentityKana {
    fn normalize(&self, input: &str) -> String {
        input.to_string()
    }
}

fn hiragana_to_katakana(c: char) -> char {
    if (HIRAGANA_START..=HIRAGANA_END).contains(&c) || HIRAGANA_ITERATION_MARKS.contains(&c) {
        char::from_u32(c as u32 + KATAKANA_OFFSET).unwrap_or(c)
    } else {
        c
    }
}

/// Rewrites the listed kana fields of `criteria` in place.
///
/// Non-text and blank entries are left as they are.
pub fn normalize_kana_fields(
    criteria: &mut SearchCriteria,
    fields: &[&str],
    normalizer: &dyn KanaNormalizer,
) {
    for field in fields {
        let Some(CriterionValue::Text(raw)) = criteria.get(field) else {
            continue;
        };
        let normalized = normalizer.normalize(raw);
        if &normalized != raw {
            log::trace!("normalized kana criterion {field}: {raw:?} -> {normalized:?}");
            criteria.insert(*field, normalized);
        }
    }
}
