use serde::Serialize;

use super::engine::ScoredUseCase;

/// A scored use case at its position in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedUseCase {
    /// 1-based position after sorting
    pub rank: usize,
    /// Position in the unsorted input
    pub index: usize,
    #[serde(flatten)]
    pub scored: ScoredUseCase,
}

/// Sort by Priority Score descending. Ties keep their input order.
pub fn rank(scored: Vec<ScoredUseCase>) -> Vec<RankedUseCase> {
    let mut indexed: Vec<(usize, ScoredUseCase)> = scored.into_iter().enumerate().collect();

    // sort_by is stable; total_cmp keeps NaN from breaking the ordering
    indexed.sort_by(|a, b| b.1.priority_score.total_cmp(&a.1.priority_score));

    indexed
        .into_iter()
        .enumerate()
        .map(|(pos, (index, scored))| RankedUseCase {
            rank: pos + 1,
            index,
            scored,
        })
        .collect()
}
