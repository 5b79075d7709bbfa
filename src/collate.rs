//! Swedish name collation.
//!
//! Letters sort in the Swedish alphabet order `a..z å ä ö`. Foreign accented
//! letters sort with their base letter (`é` with `e`, `ü` with `y`, `ø` with
//! `ö`), accents only break ties, and lowercase comes before uppercase when
//! names are otherwise equal.

use std::cmp::Ordering;

const ALPHABET: [char; 29] = [
    'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r',
    's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'å', 'ä', 'ö',
];

const COMBINING_RING: char = '\u{30A}';
const COMBINING_DIAERESIS: char = '\u{308}';

/// Character class at the primary level; lower classes sort first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Class {
    Punctuation,
    Digit,
    Letter,
    Other,
}

/// Precomputed sort key for a name
///
/// Keys compare primary letters first, then accents, then case, and finally
/// the raw string so that distinct names never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: Vec<(Class, u32)>,
    secondary: Vec<u32>,
    tertiary: Vec<u8>,
    raw: String,
}

/// Base letter(s) a lowercase character sorts as
fn fold(c: char) -> (char, Option<char>) {
    let base = match c {
        'á' | 'à' | 'â' | 'ã' | 'ā' | 'ą' | 'ă' => 'a',
        'æ' | 'ę' => 'ä',
        'ç' | 'č' | 'ć' => 'c',
        'ð' | 'đ' | 'ď' => 'd',
        'é' | 'è' | 'ê' | 'ë' | 'ē' | 'ė' | 'ě' => 'e',
        'ğ' => 'g',
        'í' | 'ì' | 'î' | 'ï' | 'ī' | 'ı' => 'i',
        'ł' | 'ľ' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ó' | 'ò' | 'õ' | 'ō' => 'o',
        'ô' | 'ø' | 'ő' | 'œ' => 'ö',
        'ř' => 'r',
        'ś' | 'š' | 'ş' => 's',
        'ť' | 'ţ' => 't',
        'ú' | 'ù' | 'û' | 'ū' | 'ů' => 'u',
        'ü' | 'ű' | 'ý' | 'ÿ' => 'y',
        'ž' | 'ź' | 'ż' => 'z',
        'ß' => return ('s', Some('s')),
        'þ' => return ('t', Some('h')),
        other => other,
    };
    (base, None)
}

fn primary_weight(c: char) -> (Class, u32) {
    if let Some(idx) = ALPHABET.iter().position(|a| *a == c) {
        (Class::Letter, idx as u32)
    } else if let Some(digit) = c.to_digit(10) {
        (Class::Digit, digit)
    } else if c.is_alphabetic() {
        (Class::Other, c as u32)
    } else {
        (Class::Punctuation, c as u32)
    }
}

/// Build the collation key of `name`
pub fn collation_key(name: &str) -> CollationKey {
    let mut primary = Vec::with_capacity(name.len());
    let mut secondary = Vec::with_capacity(name.len());
    let mut tertiary = Vec::with_capacity(name.len());

    for ch in name.chars() {
        // Decomposed å/ä/ö: fold the combining mark into the preceding letter
        if ch == COMBINING_RING || ch == COMBINING_DIAERESIS {
            let composed = match (primary.last(), ch) {
                (Some(&(Class::Letter, 0)), COMBINING_RING) => Some('å'),
                (Some(&(Class::Letter, 0)), COMBINING_DIAERESIS) => Some('ä'),
                (Some(&(Class::Letter, 14)), COMBINING_DIAERESIS) => Some('ö'),
                _ => None,
            };
            if let (Some(letter), Some(last)) = (composed, primary.last_mut()) {
                *last = primary_weight(letter);
                continue;
            }
        }

        if ('\u{300}'..='\u{36F}').contains(&ch) {
            secondary.push(ch as u32);
            continue;
        }

        let case = u8::from(ch.is_uppercase());
        for lower in ch.to_lowercase() {
            let (base, expansion) = fold(lower);
            let accent = if base == lower { 0 } else { lower as u32 };
            primary.push(primary_weight(base));
            secondary.push(accent);
            tertiary.push(case);
            if let Some(extra) = expansion {
                primary.push(primary_weight(extra));
                secondary.push(accent);
                tertiary.push(case);
            }
        }
    }

    CollationKey {
        primary,
        secondary,
        tertiary,
        raw: name.to_string(),
    }
}

/// Compare two names in Swedish collation order
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

/// Sort items in place by a name, in Swedish collation order
///
/// The sort is stable: items with identical names keep their relative order.
pub fn sort_by_name<T>(items: &mut [T], name: impl Fn(&T) -> &str) {
    items.sort_by_cached_key(|item| collation_key(name(item)));
}
