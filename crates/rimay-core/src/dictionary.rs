use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::lang::Direction;

/// Spanish → Kichwa term mapping.
///
/// Keys are lowercase Spanish terms. Iteration is ordered by Spanish key,
/// which also fixes which key survives a collision when the mapping is
/// reversed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dictionary {
    entries: BTreeMap<String, String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, spanish: &str) -> Option<&str> {
        self.entries.get(spanish).map(String::as_str)
    }

    pub fn insert(&mut self, spanish: impl Into<String>, kichwa: impl Into<String>) -> Option<String> {
        self.entries.insert(spanish.into(), kichwa.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Kichwa → Spanish mapping. When two Spanish keys share a Kichwa
    /// value, the one that sorts last wins.
    pub fn reversed(&self) -> BTreeMap<String, String> {
        let mut inverse = BTreeMap::new();
        for (spanish, kichwa) in &self.entries {
            inverse.insert(kichwa.clone(), spanish.clone());
        }
        inverse
    }

    /// Substitution table for a direction: the mapping itself for es→qu,
    /// its inverse for qu→es.
    pub fn table(&self, direction: Direction) -> Cow<'_, BTreeMap<String, String>> {
        match direction {
            Direction::EsToQu => Cow::Borrowed(&self.entries),
            Direction::QuToEs => Cow::Owned(self.reversed()),
        }
    }

    /// Entries whose Spanish term contains `filter` (case-insensitive),
    /// sorted by Spanish term. An empty filter matches everything.
    pub fn search(&self, filter: &str) -> Vec<(&str, &str)> {
        let needle = filter.trim().to_lowercase();
        self.iter()
            .filter(|(spanish, _)| needle.is_empty() || spanish.to_lowercase().contains(&needle))
            .collect()
    }
}

impl FromIterator<(String, String)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

/// Spanish terms are stored trimmed and lowercase.
pub fn normalize_spanish(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Kichwa terms are stored trimmed, case preserved.
pub fn normalize_kichwa(term: &str) -> String {
    term.trim().to_string()
}
