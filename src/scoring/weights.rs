use serde::{Deserialize, Serialize};

use crate::usecase::Factor;

/// Step used by interactive weight adjustment.
pub const WEIGHT_STEP: f64 = 0.5;

/// Upper bound of interactive weight adjustment.
pub const WEIGHT_MAX: f64 = 5.0;

/// Weights controlling how strongly each rating moves the Priority Score.
///
/// Change impact and risk are penalty weights.
///
/// Example YAML:
/// ```yaml
/// weights:
///   value: 3.0
///   feasibility: 2.5
///   data: 2.5
///   change: 2.0
///   risk: 2.0
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeightSet {
    pub value: f64,
    pub feasibility: f64,
    pub data: f64,
    pub change: f64,
    pub risk: f64,
}

impl Default for WeightSet {
    fn default() -> Self {
        Self {
            value: 3.0,
            feasibility: 2.5,
            data: 2.5,
            change: 2.0,
            risk: 2.0,
        }
    }
}

impl WeightSet {
    pub fn zero() -> Self {
        Self {
            value: 0.0,
            feasibility: 0.0,
            data: 0.0,
            change: 0.0,
            risk: 0.0,
        }
    }

    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::BusinessValue => self.value,
            Factor::TechnicalFeasibility => self.feasibility,
            Factor::DataReadiness => self.data,
            Factor::ChangeImpact => self.change,
            Factor::Risk => self.risk,
        }
    }

    pub fn set(&mut self, factor: Factor, weight: f64) {
        let slot = match factor {
            Factor::BusinessValue => &mut self.value,
            Factor::TechnicalFeasibility => &mut self.feasibility,
            Factor::DataReadiness => &mut self.data,
            Factor::ChangeImpact => &mut self.change,
            Factor::Risk => &mut self.risk,
        };
        *slot = weight;
    }

    /// Move a weight by `steps` increments of [`WEIGHT_STEP`], clamped to
    /// `0.0..=WEIGHT_MAX`.
    pub fn adjust(&mut self, factor: Factor, steps: i32) {
        let next = self.get(factor) + f64::from(steps) * WEIGHT_STEP;
        self.set(factor, next.clamp(0.0, WEIGHT_MAX));
    }

    /// Sum of all five weights.
    pub fn sum(&self) -> f64 {
        Factor::ALL.iter().map(|f| self.get(*f)).sum()
    }

    /// Denominator of the Priority Score: the weight sum, or 1 when all
    /// weights are zero.
    pub fn denominator(&self) -> f64 {
        let sum = self.sum();
        if sum == 0.0 {
            1.0
        } else {
            sum
        }
    }
}

/// Partial weights as written in a config file or on the command line.
///
/// Unset weights fall back to a base [`WeightSet`].
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeightsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feasibility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<f64>,
}

impl WeightsConfig {
    pub fn get(&self, factor: Factor) -> Option<f64> {
        match factor {
            Factor::BusinessValue => self.value,
            Factor::TechnicalFeasibility => self.feasibility,
            Factor::DataReadiness => self.data,
            Factor::ChangeImpact => self.change,
            Factor::Risk => self.risk,
        }
    }

    /// Fill unset weights from `base`.
    pub fn resolve(&self, base: &WeightSet) -> WeightSet {
        let mut weights = *base;
        for factor in Factor::ALL {
            if let Some(w) = self.get(factor) {
                weights.set(factor, w);
            }
        }
        weights
    }

    /// Overlay `other` on top of `self`: weights set in `other` win.
    pub fn merge(&self, other: &WeightsConfig) -> WeightsConfig {
        WeightsConfig {
            value: other.value.or(self.value),
            feasibility: other.feasibility.or(self.feasibility),
            data: other.data.or(self.data),
            change: other.change.or(self.change),
            risk: other.risk.or(self.risk),
        }
    }
}

impl From<WeightSet> for WeightsConfig {
    fn from(w: WeightSet) -> Self {
        Self {
            value: Some(w.value),
            feasibility: Some(w.feasibility),
            data: Some(w.data),
            change: Some(w.change),
            risk: Some(w.risk),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let w = WeightSet::default();
        assert_eq!(w.value, 3.0);
        assert_eq!(w.feasibility, 2.5);
        assert_eq!(w.data, 2.5);
        assert_eq!(w.change, 2.0);
        assert_eq!(w.risk, 2.0);
        assert_eq!(w.sum(), 12.0);
    }

    #[test]
    fn test_zero_weights_denominator_is_one() {
        assert_eq!(WeightSet::zero().denominator(), 1.0);
    }

    #[test]
    fn test_adjust_steps_and_clamps() {
        let mut w = WeightSet::default();
        w.adjust(Factor::BusinessValue, 1);
        assert_eq!(w.value, 3.5);
        w.adjust(Factor::BusinessValue, 10);
        assert_eq!(w.value, WEIGHT_MAX);
        w.adjust(Factor::Risk, -10);
        assert_eq!(w.risk, 0.0);
    }

    #[test]
    fn test_partial_weights_parse() {
        let yaml = r#"
value: 4
risk: 0.5
"#;
        let config: WeightsConfig = serde_saphyr::from_str(yaml).unwrap();
        let w = config.resolve(&WeightSet::default());
        assert_eq!(w.value, 4.0);
        assert_eq!(w.feasibility, 2.5);
        assert_eq!(w.risk, 0.5);
    }

    #[test]
    fn test_unknown_weight_rejected() {
        let yaml = "speed: 1";
        let result: Result<WeightsConfig, _> = serde_saphyr::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = WeightsConfig {
            value: Some(1.0),
            data: Some(2.0),
            ..Default::default()
        };
        let overlay = WeightsConfig {
            value: Some(5.0),
            ..Default::default()
        };
        let merged = base.merge(&overlay);
        assert_eq!(merged.value, Some(5.0));
        assert_eq!(merged.data, Some(2.0));
        assert_eq!(merged.risk, None);
    }
}
