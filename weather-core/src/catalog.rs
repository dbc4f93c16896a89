//! Static list of known city names with exact and approximate lookup.

use std::{collections::HashMap, fs, path::Path};

use crate::error::WeatherError;

/// Maximum number of fuzzy candidates offered for one query.
pub const MAX_CANDIDATES: usize = 3;

/// Minimum similarity ratio for a catalog entry to count as a candidate.
pub const SIMILARITY_CUTOFF: f64 = 0.6;

/// Known city names, loaded once per process and never mutated.
#[derive(Debug, Clone, Default)]
pub struct CityCatalog {
    cities: Vec<String>,
}

impl CityCatalog {
    /// Load a newline-delimited list of city names.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WeatherError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| WeatherError::CatalogLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog: Self = contents.lines().collect();
        tracing::debug!(cities = catalog.len(), path = %path.display(), "loaded city catalog");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn contains(&self, name: &str) -> bool {
        self.cities.iter().any(|city| city == name)
    }

    /// Closest catalog entries to `query`, best first.
    ///
    /// Returns at most [`MAX_CANDIDATES`] distinct names whose similarity is at
    /// least [`SIMILARITY_CUTOFF`]. An empty result means nothing is close enough.
    pub fn fuzzy_match(&self, query: &str) -> Vec<String> {
        let query: Vec<char> = query.chars().collect();
        let query_counts = char_counts(&query);

        let mut scored: Vec<(f64, &str)> = self
            .cities
            .iter()
            .filter_map(|city| {
                let candidate: Vec<char> = city.chars().collect();
                if length_bound(&candidate, &query) < SIMILARITY_CUTOFF
                    || multiset_bound(&candidate, &query, &query_counts) < SIMILARITY_CUTOFF
                {
                    return None;
                }
                let score = similarity(&candidate, &query);
                (score >= SIMILARITY_CUTOFF).then_some((score, city.as_str()))
            })
            .collect();

        // Highest score first; equal scores fall back to reverse lexical order.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
        scored.dedup_by(|a, b| a.1 == b.1);

        scored
            .into_iter()
            .take(MAX_CANDIDATES)
            .map(|(_, city)| city.to_string())
            .collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for CityCatalog {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let cities = iter
            .into_iter()
            .map(|line| line.as_ref().trim_end().to_string())
            .filter(|line| !line.is_empty())
            .collect();
        Self { cities }
    }
}

/// Upper-case the first letter of every alphabetic run and lower-case the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for ch in text.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

/// Ratcliff/Obershelp similarity: twice the matched characters over total length.
fn similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(a, b) as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let (i, j, size) = longest_common_block(a, b);
    if size == 0 {
        return 0;
    }
    size + matching_characters(&a[..i], &b[..j])
        + matching_characters(&a[i + size..], &b[j + size..])
}

/// Longest common contiguous block as `(start_a, start_b, len)`; earliest wins ties.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            let k = cur[j + 1];
            if k > best.2 {
                best = (i + 1 - k, j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}

fn length_bound(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * a.len().min(b.len()) as f64 / total as f64
}

fn multiset_bound(a: &[char], b: &[char], b_counts: &HashMap<char, usize>) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let mut available = b_counts.clone();
    let mut shared = 0;
    for ch in a {
        if let Some(n) = available.get_mut(ch).filter(|n| **n > 0) {
            *n -= 1;
            shared += 1;
        }
    }
    2.0 * shared as f64 / total as f64
}

fn char_counts(chars: &[char]) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for ch in chars {
        *counts.entry(*ch).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn catalog() -> CityCatalog {
        ["Taipei", "Taiwan", "Tawang", "Taliwang", "London", "Londrina", "Paris"]
            .into_iter()
            .collect()
    }

    #[test]
    fn no_plausible_match_yields_empty_set() {
        assert!(catalog().fuzzy_match("!").is_empty());
    }

    #[test]
    fn misspelling_ranks_closest_first() {
        let matches = catalog().fuzzy_match("Taiwn");
        assert_eq!(matches.first().map(String::as_str), Some("Taiwan"));
        assert!(matches.len() <= MAX_CANDIDATES);
    }

    #[test]
    fn exact_entry_scores_highest() {
        let matches = catalog().fuzzy_match("London");
        assert_eq!(matches[0], "London");
        assert!(catalog().contains("London"));
        assert!(!catalog().contains("london"));
    }

    #[test]
    fn duplicates_are_collapsed() {
        let catalog: CityCatalog = ["Paris", "Paris", "Parma"].into_iter().collect();
        let matches = catalog.fuzzy_match("Pari");
        assert_eq!(matches, vec!["Paris".to_string(), "Parma".to_string()]);
    }

    #[test]
    fn similarity_matches_known_ratios() {
        let a: Vec<char> = "Taiwan".chars().collect();
        let b: Vec<char> = "Taiwn".chars().collect();
        assert!((similarity(&a, &b) - 10.0 / 11.0).abs() < 1e-12);

        let c: Vec<char> = "abcd".chars().collect();
        let d: Vec<char> = "bcde".chars().collect();
        assert!((similarity(&c, &d) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn load_trims_trailing_whitespace() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Taipei  \r\nTaiwan\n\nTawang\t\n").unwrap();

        let catalog = CityCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.cities(), ["Taipei", "Taiwan", "Tawang"]);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CityCatalog::load(dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, WeatherError::CatalogLoad { .. }));
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("new YORK"), "New York");
        assert_eq!(title_case("  taipei "), "  Taipei ");
        assert_eq!(title_case("o'neill"), "O'Neill");
    }
}
