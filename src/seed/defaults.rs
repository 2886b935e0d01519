use crate::usecase::UseCase;

/// Built-in seed used when no seed file is available.
pub fn default_use_cases() -> Vec<UseCase> {
    vec![
        UseCase::new(
            "Intelligent document triage for claims",
            [5.0, 3.0, 3.0, 4.0, 3.0],
        )
        .with_owner("Operations")
        .with_notes("High cost savings; requires integration with core systems."),
        UseCase::new("Member services AI copilot", [4.0, 4.0, 4.0, 3.0, 3.0])
            .with_owner("Customer Service")
            .with_notes("GenAI-based; frontline adoption is key."),
        UseCase::new(
            "Provider data cleansing & matching",
            [4.0, 3.0, 2.0, 2.0, 2.0],
        )
        .with_owner("Data Management")
        .with_notes("Improves downstream analytics & reporting."),
        UseCase::new(
            "Internal knowledge retrieval assistant",
            [3.0, 5.0, 4.0, 2.0, 2.0],
        )
        .with_owner("Enterprise")
        .with_notes("RAG-based Q&A over policies, SOPs, and training materials."),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{rank, score, WeightSet};

    #[test]
    fn test_default_seed_has_four_rows() {
        let rows = default_use_cases();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| !r.name.is_empty()));
        assert!(rows.iter().all(|r| r.out_of_range_factors().is_empty()));
    }

    #[test]
    fn test_default_seed_ranking_with_default_weights() {
        let ranked = rank(score(&default_use_cases(), &WeightSet::default()));
        // knowledge retrieval: (9 + 12.5 + 10 - 4 - 4) / 12
        assert_eq!(
            ranked[0].scored.use_case.name,
            "Internal knowledge retrieval assistant"
        );
        assert!((ranked[0].scored.priority_score - 23.5 / 12.0).abs() < 1e-12);
    }
}
