//! Dictionary substitution.
//!
//! Substitution is sequential: keys are applied one after another, longest
//! first, each replacing every occurrence in the current buffer. A value
//! written by an earlier key can therefore be matched again by a later,
//! shorter key. Matching is plain substring matching, so a key can hit
//! inside a larger word.

use std::collections::BTreeMap;

/// Working form of user input: trimmed and lowercased.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Table entries ordered by descending key length in characters. Keys of
/// equal length keep the table's order.
pub fn longest_first(table: &BTreeMap<String, String>) -> Vec<(&str, &str)> {
    let mut pairs: Vec<(&str, &str)> = table
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    pairs.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
    pairs
}

/// Apply `pairs` to `buffer` in the given order. Empty keys are skipped.
pub fn substitute(buffer: &str, pairs: &[(&str, &str)]) -> String {
    let mut out = buffer.to_string();
    for (key, value) in pairs {
        if !key.is_empty() && out.contains(key) {
            out = out.replace(key, value);
        }
    }
    out
}

/// Normalize `text` and run a longest-first substitution with `table`.
/// Returns the normalized baseline alongside the substituted text.
pub fn apply_table(text: &str, table: &BTreeMap<String, String>) -> (String, String) {
    let baseline = normalize(text);
    let substituted = substitute(&baseline, &longest_first(table));
    (baseline, substituted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize("  HOLA Mundo \n"), "hola mundo");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn longest_first_orders_by_char_length() {
        let t = table(&[("sol", "inti"), ("buenos días", "alli p'unlla"), ("buenos", "alli")]);
        let keys: Vec<&str> = longest_first(&t).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["buenos días", "buenos", "sol"]);
    }

    #[test]
    fn longest_first_counts_chars_not_bytes() {
        // "ñaña" is 6 bytes but 4 chars; "perro" is 5 of each
        let t = table(&[("ñaña", "hermana"), ("perro", "allku")]);
        let keys: Vec<&str> = longest_first(&t).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["perro", "ñaña"]);
    }

    #[test]
    fn equal_lengths_keep_table_order() {
        let t = table(&[("uno", "shuk"), ("dos", "ishkay")]);
        let keys: Vec<&str> = longest_first(&t).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["dos", "uno"]);
    }

    #[test]
    fn phrase_entry_wins_over_word_entry() {
        let t = table(&[("buenos días", "alli p'unlla"), ("buenos", "alli")]);
        let (_, out) = apply_table("buenos días", &t);
        assert_eq!(out, "alli p'unlla");
    }

    #[test]
    fn replaces_every_occurrence() {
        let out = substitute("casa y casa", &[("casa", "wasi")]);
        assert_eq!(out, "wasi y wasi");
    }

    #[test]
    fn matches_inside_larger_words() {
        let out = substitute("casamiento", &[("casa", "wasi")]);
        assert_eq!(out, "wasimiento");
    }

    #[test]
    fn later_key_can_match_earlier_output() {
        // "agua" becomes "yaku", then the shorter key "ya" rewrites part of it
        let out = substitute("agua", &[("agua", "yaku"), ("ya", "ña")]);
        assert_eq!(out, "ñaku");
    }

    #[test]
    fn empty_key_is_skipped() {
        let out = substitute("sol", &[("", "x"), ("sol", "inti")]);
        assert_eq!(out, "inti");
    }

    #[test]
    fn no_match_leaves_buffer_untouched() {
        let t = table(&[("perro", "allku")]);
        let (baseline, out) = apply_table("  Gato ", &t);
        assert_eq!(baseline, "gato");
        assert_eq!(out, baseline);
    }
}
