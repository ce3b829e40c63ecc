mod engine;
mod format;
mod input;
mod types;

pub use engine::{
    compute_payment, compute_shares, evaluate, evaluate_normalized, normalize, periodic_rate_for,
    periods_for,
};
pub use format::{format_inr, format_percent};
pub use input::{
    ANNUAL_RATE_SLIDER, InputError, LOAN_AMOUNT_SLIDER, SliderRange, TENURE_YEARS_SLIDER,
    parse_field, slider_for,
};
pub use types::{
    AmortizationResult, DEFAULT_ANNUAL_RATE_PERCENT, DEFAULT_LOAN_AMOUNT, DEFAULT_TENURE_YEARS,
    Field, FieldId, MIN_TENURE_YEARS, NormalizedInputs, PERIODS_PER_YEAR, Payment, RawInputs,
    Shares,
};
