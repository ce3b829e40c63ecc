use super::types::{
    AmortizationResult, MIN_TENURE_YEARS, NormalizedInputs, PERIODS_PER_YEAR, Payment, RawInputs,
    Shares,
};

pub fn normalize(raw: &RawInputs) -> NormalizedInputs {
    NormalizedInputs {
        principal: non_negative(raw.loan_amount.value_or_zero()),
        annual_rate_percent: non_negative(raw.annual_rate_percent.value_or_zero()),
        tenure_years: non_negative(raw.tenure_years.value_or_zero()),
    }
}

/// Number of monthly periods for a tenure. Tenures under one year are floored
/// to a full year so the installment never divides by zero.
pub fn periods_for(tenure_years: f64) -> f64 {
    tenure_years.max(MIN_TENURE_YEARS) * PERIODS_PER_YEAR
}

pub fn periodic_rate_for(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / PERIODS_PER_YEAR / 100.0
}

pub fn compute_payment(principal: f64, annual_rate_percent: f64, tenure_years: f64) -> Payment {
    let periods = periods_for(tenure_years);
    let periodic_rate = periodic_rate_for(annual_rate_percent);

    if principal <= 0.0 || periods <= 0.0 {
        return Payment::default();
    }

    let even_split = principal / periods;
    if periodic_rate > 0.0 {
        // P*r / (1 - (1+r)^-n), with the discount factor built from ln_1p and
        // exp_m1 so that tiny rates do not cancel to zero and huge rates
        // saturate at P*r instead of overflowing.
        let log_growth = periods * periodic_rate.ln_1p();
        let periodic_payment = principal * periodic_rate / -(-log_growth).exp_m1();
        if periodic_payment.is_finite() && periodic_payment > even_split {
            let total_payable = periodic_payment * periods;
            return Payment {
                periodic_payment,
                total_payable,
                total_interest: total_payable - principal,
            };
        }
    }

    // Zero rate, or a rate too small to register against rounding.
    Payment {
        periodic_payment: even_split,
        total_payable: principal,
        total_interest: 0.0,
    }
}

pub fn compute_shares(principal: f64, total_payable: f64, total_interest: f64) -> Shares {
    if total_payable <= 0.0 {
        return Shares::default();
    }
    if !total_payable.is_finite() {
        // Interest grew past f64 range; the principal's share is nil.
        return Shares {
            principal_share_percent: 0.0,
            interest_share_percent: 100.0,
        };
    }
    Shares {
        principal_share_percent: principal / total_payable * 100.0,
        interest_share_percent: total_interest / total_payable * 100.0,
    }
}

pub fn evaluate(raw: &RawInputs) -> AmortizationResult {
    evaluate_normalized(&normalize(raw))
}

pub fn evaluate_normalized(inputs: &NormalizedInputs) -> AmortizationResult {
    let payment = compute_payment(
        inputs.principal,
        inputs.annual_rate_percent,
        inputs.tenure_years,
    );
    let shares = compute_shares(
        inputs.principal,
        payment.total_payable,
        payment.total_interest,
    );
    AmortizationResult::from_parts(payment, shares)
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
