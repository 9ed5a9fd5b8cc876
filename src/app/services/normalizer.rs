//! Text canonicalization for place-name and header matching
//!
//! All comparisons in the pipeline run over the output of these functions,
//! never over raw cell text. Every function is deterministic, allocation-only,
//! and returns an empty string for empty input.

use crate::constants::GENERIC_PLACE_WORDS;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonical matching form: trimmed, lower-cased, diacritics stripped,
/// internal whitespace collapsed to single spaces.
///
/// `ł` does not decompose under NFKD and is mapped to `l` explicitly.
pub fn normalize(text: &str) -> String {
    let lowered = text.trim().to_lowercase().replace('ł', "l");

    let stripped: String = lowered
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    collapse_whitespace(&stripped)
}

/// Looser matching key: [`normalize`] with generic qualifier words removed,
/// so "Nowa Wola" and "Wola" compare equal when an exact match fails.
///
/// If every word is generic the plain normalized form is returned.
pub fn base_key(text: &str) -> String {
    let normalized = normalize(text);
    if normalized.is_empty() {
        return normalized;
    }

    let kept: Vec<&str> = normalized
        .split(' ')
        .filter(|word| !GENERIC_PLACE_WORDS.contains(word))
        .collect();

    if kept.is_empty() {
        normalized
    } else {
        kept.join(" ")
    }
}

/// Aggressive key for header-name matching: lower-cased with all whitespace
/// (including NBSP and tabs) removed. Diacritics are kept so that "Miejscowość"
/// and "Miejscowosc" remain distinct alias entries.
pub fn match_key(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// File-name slug for a region: lower-cased ASCII with spaces as dashes,
/// e.g. "Warmińsko-Mazurskie" -> "warminsko-mazurskie".
pub fn region_slug(name: &str) -> String {
    let stripped = normalize(name).replace(' ', "-");

    let mut slug = String::with_capacity(stripped.len());
    let mut last_dash = false;
    for c in stripped.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
            last_dash = false;
        } else if c == '-' && !last_dash && !slug.is_empty() {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = !out.is_empty();
        } else {
            if pending_space {
                out.push(' ');
                pending_space = false;
            }
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_diacritics() {
        assert_eq!(normalize("Śródmieście"), "srodmiescie");
        assert_eq!(normalize("Łódź"), "lodz");
        assert_eq!(normalize("WARSZAWA"), "warszawa");
        assert_eq!(normalize("żółć"), "zolc");
    }

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  Nowy   Dwór\u{a0}Mazowiecki "), "nowy dwor mazowiecki");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("Świętokrzyskie  Góry");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_base_key_drops_generic_words() {
        assert_eq!(base_key("Nowa Wola"), "wola");
        assert_eq!(base_key("Kolonia Zamość"), "zamosc");
        assert_eq!(base_key("Stara Osiedle Wola"), "wola");
        // a place that IS a generic word keeps its normal form
        assert_eq!(base_key("Kolonia"), "kolonia");
        assert_eq!(base_key(""), "");
    }

    #[test]
    fn test_match_key_removes_all_whitespace() {
        assert_eq!(match_key("Nr KW"), "nrkw");
        assert_eq!(match_key("cena za m²"), "cenazam²");
        assert_eq!(match_key("Cena\u{a0}za metr"), "cenazametr");
    }

    #[test]
    fn test_region_slug() {
        assert_eq!(region_slug("Warmińsko-Mazurskie"), "warminsko-mazurskie");
        assert_eq!(region_slug("Łódzkie"), "lodzkie");
        assert_eq!(region_slug("Kujawsko--Pomorskie"), "kujawsko-pomorskie");
        assert_eq!(region_slug("dolnośląskie "), "dolnoslaskie");
    }
}
