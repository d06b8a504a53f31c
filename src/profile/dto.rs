use serde::Deserialize;

use crate::input::NumberInput;

#[derive(Debug, Deserialize)]
pub struct UpdateMetricsRequest {
    pub height_cm: NumberInput,
    pub weight_kg: NumberInput,
}
