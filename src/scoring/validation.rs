use super::weights::WeightsConfig;
use crate::usecase::Factor;

fn weight_key(factor: Factor) -> &'static str {
    match factor {
        Factor::BusinessValue => "value",
        Factor::TechnicalFeasibility => "feasibility",
        Factor::DataReadiness => "data",
        Factor::ChangeImpact => "change",
        Factor::Risk => "risk",
    }
}

/// Validate weights at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_weights(config: &WeightsConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for factor in Factor::ALL {
        if let Some(w) = config.get(factor) {
            if !w.is_finite() {
                errors.push(format!("weights.{}: must be a finite number", weight_key(factor)));
            } else if w < 0.0 {
                errors.push(format!("weights.{}: must be non-negative", weight_key(factor)));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
