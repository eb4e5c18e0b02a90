//! Approximate column-name matching
//!
//! Suggests which sheet columns correspond to a key concept ("Style",
//! "Customer Department", ...) when header text differs between workbooks.

use std::collections::BTreeSet;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use log::debug;

use crate::error::{MapperError, Result};

pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Ratcliff/Obershelp similarity: `2 * M / (len(a) + len(b))`
///
/// `M` is the number of characters in the matching blocks found by taking the
/// longest common substring and recursing on both sides of it.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = matching_chars(&a, &b, 0, a.len(), 0, b.len());
    2.0 * matched as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> usize {
    let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
    if k == 0 {
        return 0;
    }
    k + matching_chars(a, b, alo, i, blo, j) + matching_chars(a, b, i + k, ahi, j + k, bhi)
}

/// Longest common block in `a[alo..ahi]` / `b[blo..bhi]`
///
/// Among equally long blocks the one starting earliest in `a`, then in `b`,
/// wins. Returns `(start_a, start_b, len)`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0);
    if alo >= ahi || blo >= bhi {
        return best;
    }

    let width = bhi - blo + 1;
    let mut prev = vec![0usize; width];
    let mut cur = vec![0usize; width];

    for i in alo..ahi {
        for j in blo..bhi {
            let slot = j - blo + 1;
            if a[i] == b[j] {
                let k = prev[slot - 1] + 1;
                cur[slot] = k;
                if k > best.2 {
                    best = (i + 1 - k, j + 1 - k, k);
                }
            } else {
                cur[slot] = 0;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    best
}

#[derive(Debug, Clone)]
pub struct ColumnSuggester {
    threshold: f64,
}

impl Default for ColumnSuggester {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl ColumnSuggester {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Best candidate for one target name, if any clears the threshold
    ///
    /// Scores are `similarity(candidate, target)`; the measure is not
    /// symmetric, so the order matters. Equal scores resolve toward the lexicographically greater candidate so
    /// the answer does not depend on candidate order.
    pub fn best_match<S: AsRef<str>>(&self, target: &str, candidates: &[S]) -> Option<(String, f64)> {
        candidates
            .iter()
            .map(|c| (c.as_ref(), similarity(c.as_ref(), target)))
            .filter(|(_, score)| *score >= self.threshold)
            .max_by(|(a_name, a_score), (b_name, b_score)| {
                a_score.total_cmp(b_score).then_with(|| a_name.cmp(b_name))
            })
            .map(|(name, score)| (name.to_string(), score))
    }

    /// Distinct best matches across all target names
    pub fn suggest<T: AsRef<str>, S: AsRef<str>>(&self, targets: &[T], candidates: &[S]) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        for target in targets {
            if let Some((name, score)) = self.best_match(target.as_ref(), candidates) {
                debug!("'{}' suggests column '{}' ({:.3})", target.as_ref(), name, score);
                found.insert(name);
            }
        }
        found
    }

    /// Highest scoring match across all target names
    pub fn best_of<T: AsRef<str>, S: AsRef<str>>(&self, targets: &[T], candidates: &[S]) -> Option<(String, f64)> {
        targets
            .iter()
            .filter_map(|t| self.best_match(t.as_ref(), candidates))
            .max_by(|(a_name, a_score), (b_name, b_score)| {
                a_score.total_cmp(b_score).then_with(|| a_name.cmp(b_name))
            })
    }

    /// Like [`suggest`](Self::suggest), but an empty result is an error
    pub fn suggest_required<T: AsRef<str>, S: AsRef<str>>(
        &self,
        concept: &str,
        targets: &[T],
        candidates: &[S],
    ) -> Result<BTreeSet<String>> {
        let found = self.suggest(targets, candidates);
        if found.is_empty() {
            return Err(MapperError::NoMatchingColumns {
                concept: concept.to_string(),
            });
        }
        Ok(found)
    }
}

/// Columns whose header contains `keyword`, ignoring case
pub fn columns_containing<S: AsRef<str>>(keyword: &str, candidates: &[S]) -> Vec<String> {
    let needle = keyword.to_lowercase();
    candidates
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| c.to_lowercase().contains(&needle))
        .map(str::to_string)
        .collect()
}

/// Every candidate, likeliest first, for manual selection
///
/// Ordered by the best skim fuzzy score against any target; candidates no
/// target matches keep their original order at the end.
pub fn rank_candidates<T: AsRef<str>, S: AsRef<str>>(targets: &[T], candidates: &[S]) -> Vec<String> {
    let matcher = SkimMatcherV2::default().ignore_case();

    let mut scored: Vec<(usize, Option<i64>, &str)> = candidates
        .iter()
        .enumerate()
        .map(|(idx, candidate)| {
            let score = targets
                .iter()
                .filter_map(|t| matcher.fuzzy_match(candidate.as_ref(), t.as_ref()))
                .max();
            (idx, score, candidate.as_ref())
        })
        .collect();

    // None sorts below Some, so unmatched candidates end up last
    scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    scored.into_iter().map(|(_, _, name)| name.to_string()).collect()
}
