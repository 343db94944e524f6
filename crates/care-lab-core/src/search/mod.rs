//! Fuzzy lookup of catalog tests by key or name.
//!
//! Scoring:
//! - exact key match (case-insensitive): 1.0
//! - name containing the query: 0.9
//! - otherwise the best Jaro-Winkler / normalized Levenshtein similarity
//!   against the key and the name

use serde::Serialize;
use strsim::{jaro_winkler, normalized_levenshtein};

use crate::models::LabTest;

/// Minimum score to be returned as a match.
const MIN_SCORE: f64 = 0.70;

/// Score given to names that contain the query verbatim.
const CONTAINS_SCORE: f64 = 0.90;

/// A catalog test matched by a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestMatch {
    pub key: String,
    pub name: String,
    pub score: f64,
}

fn similarity(a: &str, b: &str) -> f64 {
    jaro_winkler(a, b).max(normalized_levenshtein(a, b))
}

/// Score a single test against a lowercase query.
fn score_test(test: &LabTest, query: &str) -> f64 {
    let key = test.key.to_lowercase();
    let name = test.name.to_lowercase();
    if key == query {
        return 1.0;
    }
    if name.contains(query) {
        return CONTAINS_SCORE.max(similarity(query, &name));
    }
    let word_score = name
        .split_whitespace()
        .map(|word| similarity(query, word))
        .fold(0.0, f64::max);
    similarity(query, &key)
        .max(similarity(query, &name))
        .max(word_score)
}

/// Rank tests by similarity to `query`, best first.
pub fn rank_tests(tests: &[LabTest], query: &str, limit: usize) -> Vec<TestMatch> {
    let query = query.trim().to_lowercase();
    if query.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut matches: Vec<TestMatch> = tests
        .iter()
        .map(|test| TestMatch {
            key: test.key.clone(),
            name: test.name.clone(),
            score: score_test(test, &query),
        })
        .filter(|m| m.score >= MIN_SCORE)
        .collect();

    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });
    matches.truncate(limit);
    matches
}
