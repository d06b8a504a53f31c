//! BMI and daily calorie target derived from height and weight.

use serde::Serialize;
use thiserror::Error;

pub const UNDERWEIGHT_BELOW: f64 = 18.5;
pub const OVERWEIGHT_FROM: f64 = 25.0;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum BmiCategory {
    #[serde(rename = "U")]
    Underweight,
    #[serde(rename = "N")]
    Normal,
    #[serde(rename = "O")]
    Overweight,
}

impl BmiCategory {
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < UNDERWEIGHT_BELOW {
            BmiCategory::Underweight
        } else if bmi < OVERWEIGHT_FROM {
            BmiCategory::Normal
        } else {
            BmiCategory::Overweight
        }
    }

    /// Single-letter code stored in the users table.
    pub fn code(self) -> &'static str {
        match self {
            BmiCategory::Underweight => "U",
            BmiCategory::Normal => "N",
            BmiCategory::Overweight => "O",
        }
    }

    pub fn recommended_kcal(self) -> f64 {
        match self {
            BmiCategory::Underweight => 2850.0,
            BmiCategory::Normal => 2500.0,
            BmiCategory::Overweight => 2200.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum MetricsError {
    #[error("height must be a positive number of centimetres")]
    InvalidHeight,
    #[error("weight must be a positive number of kilograms")]
    InvalidWeight,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMetrics {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub category: BmiCategory,
    pub recommended_kcal: f64,
}

impl BodyMetrics {
    pub fn compute(height_cm: f64, weight_kg: f64) -> Result<Self, MetricsError> {
        if !height_cm.is_finite() || height_cm <= 0.0 {
            return Err(MetricsError::InvalidHeight);
        }
        if !weight_kg.is_finite() || weight_kg <= 0.0 {
            return Err(MetricsError::InvalidWeight);
        }
        let height_m = height_cm / 100.0;
        let bmi = weight_kg / (height_m * height_m);
        let category = BmiCategory::from_bmi(bmi);
        Ok(Self {
            height_cm,
            weight_kg,
            bmi,
            category,
            recommended_kcal: category.recommended_kcal(),
        })
    }
}
