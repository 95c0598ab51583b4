//! Dot-product similarity ranking with deterministic top-K selection.
//!
//! Scores every corpus vector against the query and keeps the K best.
//! Scores are sorted descending; equal scores keep store order, so the
//! same corpus and query always produce the same ranking.

use std::cmp::Ordering;
use vxsearch_core::{Error, Result};

use crate::types::{Corpus, ScoredCandidate};

/// Dot product of two equal-length vectors.
///
/// For unit-normalized inputs this is the cosine similarity.
pub fn dot_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Score descending, then store position ascending. NaN sorts last.
fn by_rank(a: &(usize, f32), b: &(usize, f32)) -> Ordering {
    let key = |s: f32| if s.is_nan() { f32::NEG_INFINITY } else { s };
    key(b.1).total_cmp(&key(a.1)).then_with(|| a.0.cmp(&b.0))
}

/// Rank `corpus` against `query` and return the `top_k` best candidates.
///
/// Returns all chunks, ranked, when the corpus holds fewer than `top_k`.
///
/// # Errors
///
/// - [`Error::InvalidData`] if `top_k` is zero
/// - [`Error::DimensionMismatch`] if `query` is not corpus-dimensional
pub fn rank(corpus: &Corpus, query: &[f32], top_k: usize) -> Result<Vec<ScoredCandidate>> {
    if top_k == 0 {
        return Err(Error::invalid_data("K must be at least 1"));
    }
    if query.len() != corpus.dimension() {
        return Err(Error::dimension_mismatch(
            corpus.dimension(),
            query.len(),
            "query",
        ));
    }

    let mut scored: Vec<(usize, f32)> = corpus
        .iter()
        .enumerate()
        .map(|(i, (_, vector))| (i, dot_product(vector, query)))
        .collect();

    // Partition first so the sort only touches K entries.
    if top_k < scored.len() {
        scored.select_nth_unstable_by(top_k - 1, by_rank);
        scored.truncate(top_k);
    }
    scored.sort_unstable_by(by_rank);

    log::debug!("Ranked {} chunks, keeping {}", corpus.len(), scored.len());

    Ok(scored
        .into_iter()
        .filter_map(|(i, score)| {
            corpus.id(i).map(|id| ScoredCandidate {
                id: id.to_string(),
                score,
            })
        })
        .collect())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn corpus<const D: usize>(vectors: &[(&str, [f32; D])]) -> Corpus {
        let mut corpus = Corpus::new(D).unwrap();
        for (id, v) in vectors {
            corpus.push(*id, v).unwrap();
        }
        corpus
    }

    fn five_chunks() -> Corpus {
        corpus(&[
            ("x", [1.0, 0.0, 0.0]),
            ("y", [0.0, 1.0, 0.0]),
            ("z", [0.0, 0.0, 1.0]),
            ("near-x", [0.9, 0.1, 0.0]),
            ("anti-x", [-1.0, 0.0, 0.0]),
        ])
    }

    fn ids(candidates: &[ScoredCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_dot_product() {
        assert_eq!(dot_product(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert!((dot_product(&[0.6, 0.8], &[0.6, 0.8]) - 1.0).abs() < 1e-6);
        assert_eq!(dot_product(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
    }

    #[test]
    fn test_five_chunk_scenario() {
        let ranked = rank(&five_chunks(), &[1.0, 0.0, 0.0], 3).unwrap();
        assert_eq!(ids(&ranked), vec!["x", "near-x", "y"]);
        assert!((ranked[0].score - 1.0).abs() < 1e-6);
        assert!((ranked[1].score - 0.9).abs() < 1e-6);
        assert_eq!(ranked[2].score, 0.0);
    }

    #[test]
    fn test_full_ranking_ties_keep_store_order() {
        let ranked = rank(&five_chunks(), &[1.0, 0.0, 0.0], 5).unwrap();
        assert_eq!(ids(&ranked), vec!["x", "near-x", "y", "z", "anti-x"]);
    }

    #[test]
    fn test_exactly_k_sorted_non_increasing() {
        let corpus = five_chunks();
        for k in 1..=corpus.len() {
            let ranked = rank(&corpus, &[0.3, 0.5, 0.2], k).unwrap();
            assert_eq!(ranked.len(), k);
            assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }

    #[test]
    fn test_fewer_chunks_than_k_returns_all() {
        let corpus = corpus(&[("a", [1.0, 0.0]), ("b", [0.0, 1.0])]);
        let ranked = rank(&corpus, &[0.0, 1.0], 4).unwrap();
        assert_eq!(ids(&ranked), vec!["b", "a"]);
    }

    #[test]
    fn test_all_tied_scores_follow_store_order() {
        let corpus = corpus(&[
            ("c", [0.0, 1.0]),
            ("a", [0.0, 1.0]),
            ("d", [0.0, 1.0]),
            ("b", [0.0, 1.0]),
        ]);
        let ranked = rank(&corpus, &[1.0, 0.0], 2).unwrap();
        assert_eq!(ids(&ranked), vec!["c", "a"]);
    }

    #[test]
    fn test_nan_scores_sort_last() {
        let corpus = corpus(&[("nan", [f32::NAN, 0.0]), ("ok", [0.0, 1.0])]);
        let ranked = rank(&corpus, &[1.0, 1.0], 2).unwrap();
        assert_eq!(ranked[0].id, "ok");
    }

    #[test]
    fn test_idempotent() {
        let corpus = five_chunks();
        let first = rank(&corpus, &[0.5, 0.5, 0.0], 3).unwrap();
        let second = rank(&corpus, &[0.5, 0.5, 0.0], 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_k_rejected() {
        let err = rank(&five_chunks(), &[1.0, 0.0, 0.0], 0).unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));
    }

    #[test]
    fn test_query_dimension_mismatch() {
        let err = rank(&five_chunks(), &[1.0, 0.0], 3).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
    }
}
