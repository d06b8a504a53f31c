use serde::Deserialize;

use crate::error::AppError;

/// Numeric form field that may arrive as a JSON number or as a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberInput {
    Number(f64),
    Text(String),
}

impl NumberInput {
    pub fn parse(&self, field: &str) -> Result<f64, AppError> {
        let value = match self {
            NumberInput::Number(n) => Some(*n),
            NumberInput::Text(s) => s.trim().parse::<f64>().ok(),
        };
        value
            .filter(|v| v.is_finite())
            .ok_or_else(|| AppError::BadRequest(format!("{} must be a number", field)))
    }

    pub fn parse_positive(&self, field: &str) -> Result<f64, AppError> {
        let v = self.parse(field)?;
        if v <= 0.0 {
            return Err(AppError::BadRequest(format!("{} must be greater than zero", field)));
        }
        Ok(v)
    }
}

impl From<f64> for NumberInput {
    fn from(v: f64) -> Self {
        NumberInput::Number(v)
    }
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
