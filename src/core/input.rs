use thiserror::Error;

use super::types::{Field, FieldId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("`{0}` is not a number")]
    NotNumeric(String),
    #[error("value must be finite")]
    NotFinite,
    #[error("negative values are not accepted")]
    Negative,
}

/// Parses the text of a numeric field. Blank text clears the field; negative
/// entries are rejected rather than clamped, so the caller keeps the prior
/// value.
pub fn parse_field(text: &str) -> Result<Field, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Field::Empty);
    }

    let value = trimmed
        .parse::<f64>()
        .map_err(|_| InputError::NotNumeric(trimmed.to_string()))?;

    if !value.is_finite() {
        return Err(InputError::NotFinite);
    }
    if value.is_sign_negative() {
        return Err(InputError::Negative);
    }

    Ok(Field::Number(value))
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

pub const LOAN_AMOUNT_SLIDER: SliderRange = SliderRange {
    min: 50_000.0,
    max: 10_000_000.0,
    step: 50_000.0,
};

pub const ANNUAL_RATE_SLIDER: SliderRange = SliderRange {
    min: 0.0,
    max: 30.0,
    step: 0.1,
};

pub const TENURE_YEARS_SLIDER: SliderRange = SliderRange {
    min: 1.0,
    max: 40.0,
    step: 1.0,
};

pub fn slider_for(id: FieldId) -> SliderRange {
    match id {
        FieldId::LoanAmount => LOAN_AMOUNT_SLIDER,
        FieldId::AnnualRate => ANNUAL_RATE_SLIDER,
        FieldId::TenureYears => TENURE_YEARS_SLIDER,
    }
}

impl SliderRange {
    /// Where the thumb sits for a field state. Free-form entries may lie
    /// outside the slider's range, so the thumb is pinned to the nearest end.
    pub fn position(&self, field: Field) -> f64 {
        self.clamp(field.value_or_zero())
    }

    /// Clamps into range and rounds to the step grid anchored at `min`.
    pub fn snap(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        let clamped = self.clamp(value);
        let steps = ((clamped - self.min) / self.step).round();
        let snapped = self.min + steps * self.step;
        // 0.1 steps accumulate binary error; keep the same precision as the step.
        let decimals = step_decimals(self.step);
        let scale = 10f64.powi(decimals);
        ((snapped * scale).round() / scale).min(self.max)
    }

    fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        value.clamp(self.min, self.max)
    }
}

fn step_decimals(step: f64) -> i32 {
    let mut decimals = 0;
    let mut scaled = step;
    while decimals < 6 && (scaled - scaled.round()).abs() > 1e-9 {
        scaled *= 10.0;
        decimals += 1;
    }
    decimals
}
