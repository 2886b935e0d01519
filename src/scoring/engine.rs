use serde::Serialize;

use super::weights::WeightSet;
use crate::usecase::{Factor, UseCase};

#[derive(Debug, Clone, PartialEq)]
pub struct FactorContribution {
    pub factor: Factor,
    pub rating: f64,       // Coerced rating
    pub weight: f64,
    pub contribution: f64, // Signed: penalties are negative
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub factors: Vec<FactorContribution>,
    pub weight_sum: f64,
    pub denominator: f64,
    pub priority_score: f64,
    /// Feasibility, data readiness, 5 - change impact, 5 - risk
    pub readiness_components: [f64; 4],
    pub readiness_score: f64,
}

/// A use case with its derived scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredUseCase {
    #[serde(flatten)]
    pub use_case: UseCase,
    pub priority_score: f64,
    pub readiness_score: f64,
}

/// Score every use case against `weights`, preserving input order and length.
pub fn score(use_cases: &[UseCase], weights: &WeightSet) -> Vec<ScoredUseCase> {
    use_cases
        .iter()
        .map(|uc| ScoredUseCase {
            use_case: uc.clone(),
            priority_score: priority_score(uc, weights),
            readiness_score: readiness_score(uc),
        })
        .collect()
}

/// Weighted value, feasibility and data readiness minus weighted change
/// impact and risk, divided by the sum of all five weights.
///
/// Not normalized to the rating scale: the denominator counts all five
/// weights while two terms are subtracted.
pub fn priority_score(use_case: &UseCase, weights: &WeightSet) -> f64 {
    let numerator: f64 = Factor::ALL
        .iter()
        .map(|f| signed_contribution(*f, use_case.value(*f), weights.get(*f)))
        .sum();
    numerator / weights.denominator()
}

/// Unweighted average of feasibility, data readiness, and the inverted
/// change impact and risk.
pub fn readiness_score(use_case: &UseCase) -> f64 {
    readiness_components(use_case).iter().sum::<f64>() / 4.0
}

fn readiness_components(use_case: &UseCase) -> [f64; 4] {
    [
        use_case.value(Factor::TechnicalFeasibility),
        use_case.value(Factor::DataReadiness),
        5.0 - use_case.value(Factor::ChangeImpact),
        5.0 - use_case.value(Factor::Risk),
    ]
}

fn signed_contribution(factor: Factor, rating: f64, weight: f64) -> f64 {
    if factor.is_penalty() {
        -(rating * weight)
    } else {
        rating * weight
    }
}

/// Explain how a use case's scores were derived.
pub fn breakdown(use_case: &UseCase, weights: &WeightSet) -> ScoreBreakdown {
    let factors: Vec<FactorContribution> = Factor::ALL
        .iter()
        .map(|f| {
            let rating = use_case.value(*f);
            let weight = weights.get(*f);
            FactorContribution {
                factor: *f,
                rating,
                weight,
                contribution: signed_contribution(*f, rating, weight),
            }
        })
        .collect();

    ScoreBreakdown {
        factors,
        weight_sum: weights.sum(),
        denominator: weights.denominator(),
        priority_score: priority_score(use_case, weights),
        readiness_components: readiness_components(use_case),
        readiness_score: readiness_score(use_case),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecase::{Field, Rating};

    fn triage() -> UseCase {
        UseCase::new(
            "Intelligent document triage for claims",
            [5.0, 3.0, 3.0, 4.0, 3.0],
        )
    }

    fn sample_weights() -> WeightSet {
        WeightSet {
            value: 3.0,
            feasibility: 2.5,
            data: 2.5,
            change: 2.0,
            risk: 2.0,
        }
    }

    #[test]
    fn test_priority_formula_exact() {
        let scored = score(&[triage()], &sample_weights());
        // (15 + 7.5 + 7.5 - 8 - 6) / 12
        assert!((scored[0].priority_score - 16.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_readiness_formula_exact() {
        let scored = score(&[triage()], &sample_weights());
        // (3 + 3 + 1 + 2) / 4
        assert_eq!(scored[0].readiness_score, 2.25);
    }

    #[test]
    fn test_readiness_ignores_weights() {
        let a = score(&[triage()], &sample_weights());
        let b = score(&[triage()], &WeightSet::zero());
        assert_eq!(a[0].readiness_score, b[0].readiness_score);
    }

    #[test]
    fn test_zero_weights_give_zero_priority() {
        let rows = vec![triage(), UseCase::new("Other", [1.0, 2.0, 3.0, 4.0, 5.0])];
        let scored = score(&rows, &WeightSet::zero());
        assert!(scored.iter().all(|s| s.priority_score == 0.0));
    }

    #[test]
    fn test_empty_input() {
        assert!(score(&[], &sample_weights()).is_empty());
        assert!(score(&[], &WeightSet::zero()).is_empty());
    }

    #[test]
    fn test_preserves_length_and_order() {
        let rows = vec![
            UseCase::new("low", [1.0, 1.0, 1.0, 5.0, 5.0]),
            UseCase::new("high", [5.0, 5.0, 5.0, 1.0, 1.0]),
            UseCase::new("mid", [3.0, 3.0, 3.0, 3.0, 3.0]),
        ];
        let scored = score(&rows, &sample_weights());
        assert_eq!(scored.len(), rows.len());
        for (s, uc) in scored.iter().zip(&rows) {
            assert_eq!(&s.use_case, uc);
        }
    }

    #[test]
    fn test_idempotent() {
        let rows = vec![triage(), UseCase::new("Copilot", [4.0, 4.0, 4.0, 3.0, 3.0])];
        let weights = sample_weights();
        assert_eq!(score(&rows, &weights), score(&rows, &weights));
    }

    #[test]
    fn test_non_numeric_rating_behaves_as_zero() {
        let mut text_row = triage();
        Field::Rating(Factor::DataReadiness).set(&mut text_row, "lots");
        let mut zero_row = triage();
        zero_row.data_readiness = Rating::Number(0.0);

        let weights = sample_weights();
        let a = &score(&[text_row], &weights)[0];
        let b = &score(&[zero_row], &weights)[0];
        assert_eq!(a.priority_score, b.priority_score);
        assert_eq!(a.readiness_score, b.readiness_score);
    }

    #[test]
    fn test_missing_rating_behaves_as_zero() {
        let mut missing = triage();
        missing.risk = Rating::Missing;
        let mut zero = triage();
        zero.risk = Rating::Number(0.0);
        let weights = sample_weights();
        assert_eq!(
            priority_score(&missing, &weights),
            priority_score(&zero, &weights)
        );
    }

    #[test]
    fn test_out_of_range_not_clamped() {
        let row = UseCase::new("wild", [10.0, 0.0, 0.0, 0.0, 0.0]);
        let weights = WeightSet {
            value: 1.0,
            ..WeightSet::zero()
        };
        assert_eq!(priority_score(&row, &weights), 10.0);
        // (0 + 0 + 5 + 5) / 4
        assert_eq!(readiness_score(&row), 2.5);
    }

    #[test]
    fn test_priority_can_be_negative() {
        let row = UseCase::new("costly", [1.0, 1.0, 1.0, 5.0, 5.0]);
        assert!(priority_score(&row, &sample_weights()) < 0.0);
    }

    #[test]
    fn test_asymmetric_formula_not_normalized() {
        // All ratings at the top of the scale still land below 5
        let row = UseCase::new("max", [5.0, 5.0, 5.0, 5.0, 5.0]);
        let weights = WeightSet {
            value: 1.0,
            feasibility: 1.0,
            data: 1.0,
            change: 1.0,
            risk: 1.0,
        };
        // (5 + 5 + 5 - 5 - 5) / 5
        assert_eq!(priority_score(&row, &weights), 1.0);
    }

    #[test]
    fn test_breakdown_sums_to_priority() {
        let weights = sample_weights();
        let b = breakdown(&triage(), &weights);
        let total: f64 = b.factors.iter().map(|f| f.contribution).sum();
        assert!((total / b.denominator - b.priority_score).abs() < 1e-12);
        assert_eq!(b.weight_sum, 12.0);
        assert_eq!(b.readiness_components, [3.0, 3.0, 1.0, 2.0]);
        assert_eq!(b.readiness_score, 2.25);
    }

    #[test]
    fn test_breakdown_penalties_are_negative() {
        let b = breakdown(&triage(), &sample_weights());
        let change = b
            .factors
            .iter()
            .find(|f| f.factor == Factor::ChangeImpact)
            .unwrap();
        assert_eq!(change.contribution, -8.0);
        let value = b
            .factors
            .iter()
            .find(|f| f.factor == Factor::BusinessValue)
            .unwrap();
        assert_eq!(value.contribution, 15.0);
    }

    #[test]
    fn test_breakdown_zero_weights() {
        let b = breakdown(&triage(), &WeightSet::zero());
        assert_eq!(b.weight_sum, 0.0);
        assert_eq!(b.denominator, 1.0);
        assert_eq!(b.priority_score, 0.0);
    }
}
