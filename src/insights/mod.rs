use crate::scoring::RankedUseCase;

/// Shown when there is nothing to summarize.
pub const EMPTY_MESSAGE: &str = "No use cases available. Please add at least one in the table.";

const DEFAULT_TOP_N: usize = 5;

/// Default number of top opportunities to show: 5, or fewer for small tables.
pub fn default_top_n(len: usize) -> usize {
    DEFAULT_TOP_N.min(len)
}

/// Clamp a requested top-N to `1..=len` (0 for an empty table).
pub fn clamp_top_n(n: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        n.clamp(1, len)
    }
}

/// The first `n` ranked rows, with `n` clamped to the table size.
pub fn top_n(ranked: &[RankedUseCase], n: usize) -> &[RankedUseCase] {
    let n = clamp_top_n(n, ranked.len());
    &ranked[..n]
}

/// Top opportunities plus narrative text for a workshop readout.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary<'a> {
    pub top: &'a [RankedUseCase],
    pub narrative: Vec<String>,
}

impl<'a> Summary<'a> {
    pub fn from_ranked(ranked: &'a [RankedUseCase], n: usize) -> Self {
        let top = top_n(ranked, n);
        Self {
            top,
            narrative: narrative(top),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.top.is_empty()
    }
}

/// Narrative lines for the top rows. An empty table yields the empty-state
/// message rather than an error.
pub fn narrative(top: &[RankedUseCase]) -> Vec<String> {
    let Some(highest) = top.first() else {
        return vec![EMPTY_MESSAGE.to_string()];
    };

    let use_case = &highest.scored.use_case;
    let owner = if use_case.owner.is_empty() {
        "unassigned"
    } else {
        use_case.owner.as_str()
    };

    vec![
        format!(
            "Highest priority: {} (Owner: {}) with Priority Score {:.2} and Readiness Score {:.2}.",
            use_case.name, owner, highest.scored.priority_score, highest.scored.readiness_score
        ),
        "Consider these as POC candidates: they balance strong business value with reasonable feasibility and data readiness.".to_string(),
        "Use the weights live with stakeholders to show how strategy changes (e.g. risk-averse vs. aggressive) alter the roadmap.".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{rank, score, WeightSet};
    use crate::seed::default_use_cases;
    use crate::usecase::UseCase;

    fn ranked_defaults() -> Vec<RankedUseCase> {
        rank(score(&default_use_cases(), &WeightSet::default()))
    }

    #[test]
    fn test_default_top_n() {
        assert_eq!(default_top_n(0), 0);
        assert_eq!(default_top_n(3), 3);
        assert_eq!(default_top_n(12), 5);
    }

    #[test]
    fn test_clamp_top_n() {
        assert_eq!(clamp_top_n(0, 4), 1);
        assert_eq!(clamp_top_n(9, 4), 4);
        assert_eq!(clamp_top_n(2, 4), 2);
        assert_eq!(clamp_top_n(3, 0), 0);
    }

    #[test]
    fn test_top_n_slices_ranked() {
        let ranked = ranked_defaults();
        let top = top_n(&ranked, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[1].rank, 2);
    }

    #[test]
    fn test_summary_highest_priority_line() {
        let ranked = ranked_defaults();
        let summary = Summary::from_ranked(&ranked, 5);
        assert_eq!(summary.top.len(), 4);
        assert_eq!(
            summary.narrative[0],
            "Highest priority: Internal knowledge retrieval assistant (Owner: Enterprise) with Priority Score 1.96 and Readiness Score 3.75."
        );
        assert_eq!(summary.narrative.len(), 3);
    }

    #[test]
    fn test_summary_empty_state() {
        let ranked: Vec<RankedUseCase> = Vec::new();
        let summary = Summary::from_ranked(&ranked, 5);
        assert!(summary.is_empty());
        assert_eq!(summary.narrative, vec![EMPTY_MESSAGE.to_string()]);
    }

    #[test]
    fn test_summary_unassigned_owner() {
        let ranked = rank(score(
            &[UseCase::new("Solo", [3.0, 3.0, 3.0, 3.0, 3.0])],
            &WeightSet::default(),
        ));
        let summary = Summary::from_ranked(&ranked, 1);
        assert!(summary.narrative[0].contains("(Owner: unassigned)"));
    }
}
