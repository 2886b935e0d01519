use serde::{Deserialize, Serialize};

use super::rating::Rating;

/// One of the five rated dimensions of a use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Factor {
    BusinessValue,
    TechnicalFeasibility,
    DataReadiness,
    ChangeImpact,
    Risk,
}

impl Factor {
    /// All factors in seed-file column order.
    pub const ALL: [Factor; 5] = [
        Factor::BusinessValue,
        Factor::TechnicalFeasibility,
        Factor::DataReadiness,
        Factor::ChangeImpact,
        Factor::Risk,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Factor::BusinessValue => "Business Value",
            Factor::TechnicalFeasibility => "Technical Feasibility",
            Factor::DataReadiness => "Data Readiness",
            Factor::ChangeImpact => "Change Impact",
            Factor::Risk => "Risk",
        }
    }

    /// Column header used in seed and export files.
    pub fn column(self) -> &'static str {
        match self {
            Factor::BusinessValue => "Business Value (1-5)",
            Factor::TechnicalFeasibility => "Technical Feasibility (1-5)",
            Factor::DataReadiness => "Data Readiness (1-5)",
            Factor::ChangeImpact => "Change Impact (1-5)",
            Factor::Risk => "Risk (1-5)",
        }
    }

    /// Short header for narrow table columns.
    pub fn short(self) -> &'static str {
        match self {
            Factor::BusinessValue => "Val",
            Factor::TechnicalFeasibility => "Feas",
            Factor::DataReadiness => "Data",
            Factor::ChangeImpact => "Chg",
            Factor::Risk => "Risk",
        }
    }

    /// Change impact and risk are costs: their weighted contribution is subtracted.
    pub fn is_penalty(self) -> bool {
        matches!(self, Factor::ChangeImpact | Factor::Risk)
    }
}

/// A candidate initiative: a label, five ratings, and free-text metadata.
///
/// Names are display keys, not identifiers; duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UseCase {
    pub name: String,
    #[serde(default)]
    pub business_value: Rating,
    #[serde(default)]
    pub technical_feasibility: Rating,
    #[serde(default)]
    pub data_readiness: Rating,
    #[serde(default)]
    pub change_impact: Rating,
    #[serde(default)]
    pub risk: Rating,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub notes: String,
}

impl UseCase {
    /// Create a use case with numeric ratings in column order.
    pub fn new(name: impl Into<String>, ratings: [f64; 5]) -> Self {
        let [bv, tf, dr, ci, r] = ratings;
        Self {
            name: name.into(),
            business_value: Rating::Number(bv),
            technical_feasibility: Rating::Number(tf),
            data_readiness: Rating::Number(dr),
            change_impact: Rating::Number(ci),
            risk: Rating::Number(r),
            owner: String::new(),
            notes: String::new(),
        }
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    pub fn rating(&self, factor: Factor) -> &Rating {
        match factor {
            Factor::BusinessValue => &self.business_value,
            Factor::TechnicalFeasibility => &self.technical_feasibility,
            Factor::DataReadiness => &self.data_readiness,
            Factor::ChangeImpact => &self.change_impact,
            Factor::Risk => &self.risk,
        }
    }

    pub fn rating_mut(&mut self, factor: Factor) -> &mut Rating {
        match factor {
            Factor::BusinessValue => &mut self.business_value,
            Factor::TechnicalFeasibility => &mut self.technical_feasibility,
            Factor::DataReadiness => &mut self.data_readiness,
            Factor::ChangeImpact => &mut self.change_impact,
            Factor::Risk => &mut self.risk,
        }
    }

    /// Coerced rating value (0 for missing or unparseable cells).
    pub fn value(&self, factor: Factor) -> f64 {
        self.rating(factor).value()
    }

    /// Factors whose coerced rating falls outside the 1-5 scale.
    pub fn out_of_range_factors(&self) -> Vec<Factor> {
        Factor::ALL
            .into_iter()
            .filter(|f| self.rating(*f).is_out_of_range())
            .collect()
    }
}

/// An editable column of a use case row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Rating(Factor),
    Owner,
    Notes,
}

impl Field {
    /// Fields in table column order.
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Rating(Factor::BusinessValue),
        Field::Rating(Factor::TechnicalFeasibility),
        Field::Rating(Factor::DataReadiness),
        Field::Rating(Factor::ChangeImpact),
        Field::Rating(Factor::Risk),
        Field::Owner,
        Field::Notes,
    ];

    pub fn column(self) -> &'static str {
        match self {
            Field::Name => "Use Case",
            Field::Rating(factor) => factor.column(),
            Field::Owner => "Owner",
            Field::Notes => "Notes",
        }
    }

    /// Current cell text for this field.
    pub fn get(self, use_case: &UseCase) -> String {
        match self {
            Field::Name => use_case.name.clone(),
            Field::Rating(factor) => use_case.rating(factor).display(),
            Field::Owner => use_case.owner.clone(),
            Field::Notes => use_case.notes.clone(),
        }
    }

    /// Assign cell text to this field. Rating cells are stored raw and
    /// coerced only when scored.
    pub fn set(self, use_case: &mut UseCase, text: &str) {
        match self {
            Field::Name => use_case.name = text.to_string(),
            Field::Rating(factor) => *use_case.rating_mut(factor) = Rating::from_cell(text),
            Field::Owner => use_case.owner = text.to_string(),
            Field::Notes => use_case.notes = text.to_string(),
        }
    }

    pub fn next(self) -> Field {
        let pos = Field::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Field::ALL[(pos + 1) % Field::ALL.len()]
    }

    pub fn previous(self) -> Field {
        let pos = Field::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Field::ALL[(pos + Field::ALL.len() - 1) % Field::ALL.len()]
    }
}
