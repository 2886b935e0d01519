pub mod engine;
pub mod rank;
pub mod validation;
pub mod weights;

pub use engine::{breakdown, priority_score, readiness_score, score, FactorContribution, ScoreBreakdown, ScoredUseCase};
pub use rank::{rank, RankedUseCase};
pub use validation::validate_weights;
pub use weights::{WeightSet, WeightsConfig, WEIGHT_MAX, WEIGHT_STEP};
