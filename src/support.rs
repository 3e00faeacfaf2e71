//! Raw support-token parsing for the caniuse stats matrix.
//!
//! Pure functions over raw dataset tokens, no I/O.
//!
//! A stats entry looks like `"10-11": "a x #2"`: the key may name a range of
//! eras, the value starts with a classification code and may embed `#<n>`
//! references to numbered notes.

use crate::types::SupportClass;

/// Largest number of eras a single range token may expand to.
const MAX_RANGE_SPAN: u32 = 64;

/// Substring that forces a token to `flag` whatever its leading character.
const FLAG_MARKER: &str = " d ";

// ============================================================================
// RANGE EXPANSION
// ============================================================================

/// Expand a (possibly hyphenated) era token into individual eras.
///
/// - `"10-15"` → `10, 11, 12, 13, 14, 15`
/// - `"15.2-15.4"` → `15.2, 15.3, 15.4`
/// - `"4.2-5.0"` → `4.2, 5.0` (endpoints only)
/// - `"TP"` → `TP`
///
/// Order is preserved and nothing in the token is dropped except empty
/// pieces around stray hyphens.
pub fn expand_range(token: &str) -> Vec<String> {
    let token = token.trim();
    if token.is_empty() {
        return Vec::new();
    }

    let Some((lo, hi)) = token.split_once('-') else {
        return vec![token.to_string()];
    };

    if let Some(eras) = expand_integers(lo, hi).or_else(|| expand_minors(lo, hi)) {
        return eras;
    }

    token
        .split('-')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(String::from)
        .collect()
}

/// `"10-15"`: both endpoints plain integers written canonically.
fn expand_integers(lo: &str, hi: &str) -> Option<Vec<String>> {
    let start = parse_canonical(lo)?;
    let end = parse_canonical(hi)?;
    if start > end || end - start >= MAX_RANGE_SPAN {
        return None;
    }
    Some((start..=end).map(|n| n.to_string()).collect())
}

/// `"15.2-15.4"`: same major, integer minors.
fn expand_minors(lo: &str, hi: &str) -> Option<Vec<String>> {
    let (lo_major, lo_minor) = lo.split_once('.')?;
    let (hi_major, hi_minor) = hi.split_once('.')?;
    if lo_major != hi_major || parse_canonical(lo_major).is_none() {
        return None;
    }
    let start = parse_canonical(lo_minor)?;
    let end = parse_canonical(hi_minor)?;
    if start > end || end - start >= MAX_RANGE_SPAN {
        return None;
    }
    Some((start..=end).map(|n| format!("{}.{}", lo_major, n)).collect())
}

/// Parse an integer only if printing it back gives the same text
/// (so `"01"` is not silently rewritten to `"1"`).
fn parse_canonical(text: &str) -> Option<u32> {
    let n: u32 = text.parse().ok()?;
    (n.to_string() == text).then_some(n)
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Step one: classification from the token's first character.
pub fn base_class(token: &str) -> SupportClass {
    token
        .chars()
        .next()
        .and_then(SupportClass::from_code)
        .unwrap_or(SupportClass::Unknown)
}

/// Step two: a token containing `" d "` needs a flag, whatever it starts with.
pub fn apply_flag_override(token: &str, base: SupportClass) -> SupportClass {
    if token.contains(FLAG_MARKER) {
        SupportClass::Flag
    } else {
        base
    }
}

/// Full classification of a raw support token.
pub fn classify(token: &str) -> SupportClass {
    apply_flag_override(token, base_class(token))
}

/// Extract `#<digits>` note references, in order, without duplicates.
pub fn note_refs(token: &str) -> Vec<u32> {
    let mut refs = Vec::new();
    for rest in token.split('#').skip(1) {
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        if let Ok(n) = digits.parse::<u32>() {
            if !refs.contains(&n) {
                refs.push(n);
            }
        }
    }
    refs
}

// ============================================================================
// TESTS
// ============================================================================
