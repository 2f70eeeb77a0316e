use std::cmp::Ordering;

use crate::{error::AppResult, models::RankedCandidate, store::SimilarityMatrix};

/// Ranks every peer of `index` and keeps the best `k`
///
/// Order is score descending, with equal scores broken by ascending peer index,
/// so the output is identical across runs and platforms. Returns
/// `min(k, N - 1)` candidates; the query item itself is never included.
pub fn top_k(matrix: &SimilarityMatrix, index: usize, k: usize) -> AppResult<Vec<RankedCandidate>> {
    let mut candidates: Vec<RankedCandidate> = matrix
        .peers(index)?
        .map(|(index, score)| RankedCandidate { index, score })
        .collect();

    if k == 0 {
        return Ok(Vec::new());
    }

    // The comparator is a total order, so partitioning first selects the same set
    // a full sort would.
    if k < candidates.len() {
        candidates.select_nth_unstable_by(k - 1, by_rank);
        candidates.truncate(k);
    }
    candidates.sort_unstable_by(by_rank);

    Ok(candidates)
}

fn by_rank(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.index.cmp(&b.index))
}
