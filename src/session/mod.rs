//! Session state: the editable use-case table and the current weights.
//!
//! A `Session` is owned by its caller. Scores are recomputed from the
//! current rows and weights on every read and never stored.

use crate::scoring::{self, RankedUseCase, ScoreBreakdown, ScoredUseCase, WeightSet};
use crate::usecase::{Factor, Field, UseCase};

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    use_cases: Vec<UseCase>,
    weights: WeightSet,
}

impl Session {
    pub fn new(use_cases: Vec<UseCase>, weights: WeightSet) -> Self {
        Self { use_cases, weights }
    }

    pub fn use_cases(&self) -> &[UseCase] {
        &self.use_cases
    }

    pub fn weights(&self) -> &WeightSet {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.use_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.use_cases.is_empty()
    }

    /// Append a row and return its index.
    pub fn add_use_case(&mut self, use_case: UseCase) -> usize {
        self.use_cases.push(use_case);
        self.use_cases.len() - 1
    }

    /// Remove the row at `index`, keeping the order of the rest.
    pub fn remove_use_case(&mut self, index: usize) -> Option<UseCase> {
        if index < self.use_cases.len() {
            Some(self.use_cases.remove(index))
        } else {
            None
        }
    }

    /// Overwrite the row at `index`. Returns false if the row does not exist.
    pub fn replace_use_case(&mut self, index: usize, use_case: UseCase) -> bool {
        match self.use_cases.get_mut(index) {
            Some(slot) => {
                *slot = use_case;
                true
            }
            None => false,
        }
    }

    /// Assign cell text to one field of a row. Returns false if the row
    /// does not exist.
    pub fn set_field(&mut self, index: usize, field: Field, text: &str) -> bool {
        match self.use_cases.get_mut(index) {
            Some(use_case) => {
                field.set(use_case, text);
                true
            }
            None => false,
        }
    }

    pub fn set_weight(&mut self, factor: Factor, weight: f64) {
        self.weights.set(factor, weight);
    }

    pub fn adjust_weight(&mut self, factor: Factor, steps: i32) {
        self.weights.adjust(factor, steps);
    }

    pub fn set_weights(&mut self, weights: WeightSet) {
        self.weights = weights;
    }

    /// Current rows with scores, in insertion order.
    pub fn scored(&self) -> Vec<ScoredUseCase> {
        scoring::score(&self.use_cases, &self.weights)
    }

    /// Current rows sorted by Priority Score.
    pub fn ranked(&self) -> Vec<RankedUseCase> {
        scoring::rank(self.scored())
    }

    pub fn breakdown(&self, index: usize) -> Option<ScoreBreakdown> {
        self.use_cases
            .get(index)
            .map(|uc| scoring::breakdown(uc, &self.weights))
    }
}
