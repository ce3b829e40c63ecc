use serde::{Deserialize, Serialize};

pub const PERIODS_PER_YEAR: f64 = 12.0;
pub const MIN_TENURE_YEARS: f64 = 1.0;

pub const DEFAULT_LOAN_AMOUNT: f64 = 350_000.0;
pub const DEFAULT_ANNUAL_RATE_PERCENT: f64 = 15.0;
pub const DEFAULT_TENURE_YEARS: f64 = 13.0;

/// Value held by one input field. `Empty` is what a user gets after clearing
/// the field mid-edit and is distinct from an explicit zero.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Field {
    #[default]
    Empty,
    Number(f64),
}

impl Field {
    pub fn value_or_zero(self) -> f64 {
        match self {
            Field::Empty => 0.0,
            Field::Number(v) => v,
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, Field::Empty)
    }

    /// Text the field's input box shows for this value.
    pub fn entry_text(self) -> String {
        match self {
            Field::Empty => String::new(),
            Field::Number(v) => v.to_string(),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    LoanAmount,
    AnnualRate,
    TenureYears,
}

impl FieldId {
    pub fn label(self) -> &'static str {
        match self {
            FieldId::LoanAmount => "loanAmount",
            FieldId::AnnualRate => "annualRate",
            FieldId::TenureYears => "tenureYears",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RawInputs {
    pub loan_amount: Field,
    pub annual_rate_percent: Field,
    pub tenure_years: Field,
}

impl RawInputs {
    pub fn field(&self, id: FieldId) -> Field {
        match id {
            FieldId::LoanAmount => self.loan_amount,
            FieldId::AnnualRate => self.annual_rate_percent,
            FieldId::TenureYears => self.tenure_years,
        }
    }

    pub fn set_field(&mut self, id: FieldId, value: Field) {
        match id {
            FieldId::LoanAmount => self.loan_amount = value,
            FieldId::AnnualRate => self.annual_rate_percent = value,
            FieldId::TenureYears => self.tenure_years = value,
        }
    }
}

impl Default for RawInputs {
    fn default() -> Self {
        Self {
            loan_amount: Field::Number(DEFAULT_LOAN_AMOUNT),
            annual_rate_percent: Field::Number(DEFAULT_ANNUAL_RATE_PERCENT),
            tenure_years: Field::Number(DEFAULT_TENURE_YEARS),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedInputs {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub tenure_years: f64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Payment {
    pub periodic_payment: f64,
    pub total_payable: f64,
    pub total_interest: f64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Shares {
    pub principal_share_percent: f64,
    pub interest_share_percent: f64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationResult {
    pub periodic_payment: f64,
    pub total_payable: f64,
    pub total_interest: f64,
    pub principal_share_percent: f64,
    pub interest_share_percent: f64,
}

impl AmortizationResult {
    pub fn from_parts(payment: Payment, shares: Shares) -> Self {
        Self {
            periodic_payment: payment.periodic_payment,
            total_payable: payment.total_payable,
            total_interest: payment.total_interest,
            principal_share_percent: shares.principal_share_percent,
            interest_share_percent: shares.interest_share_percent,
        }
    }
}
