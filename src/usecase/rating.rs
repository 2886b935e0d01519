use serde::{Deserialize, Serialize};

/// A single rating cell as entered by a user or read from a seed file.
///
/// The raw cell is kept as-is so the table can show exactly what was typed.
/// Scoring always goes through [`Rating::value`], which never fails.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl Rating {
    /// Build a rating from a text cell: empty is missing, numeric text is a
    /// number, anything else is kept as text.
    pub fn from_cell(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Rating::Missing;
        }
        match trimmed.parse::<f64>() {
            Ok(n) => Rating::Number(n),
            Err(_) => Rating::Text(cell.to_string()),
        }
    }

    /// Numeric value used for scoring. Unparseable, missing and NaN cells
    /// coerce to 0.
    pub fn value(&self) -> f64 {
        let n = match self {
            Rating::Number(n) => *n,
            Rating::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Rating::Missing => 0.0,
        };
        if n.is_nan() {
            0.0
        } else {
            n
        }
    }

    /// True when the coerced value falls outside the intended 1-5 scale.
    pub fn is_out_of_range(&self) -> bool {
        let v = self.value();
        !(1.0..=5.0).contains(&v)
    }

    /// Text shown in tables and edit buffers.
    pub fn display(&self) -> String {
        match self {
            Rating::Number(n) => format_number(*n),
            Rating::Text(s) => s.clone(),
            Rating::Missing => String::new(),
        }
    }
}

impl From<f64> for Rating {
    fn from(n: f64) -> Self {
        Rating::Number(n)
    }
}

impl From<i32> for Rating {
    fn from(n: i32) -> Self {
        Rating::Number(f64::from(n))
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{:.0}", n)
    } else {
        format!("{}", n)
    }
}
