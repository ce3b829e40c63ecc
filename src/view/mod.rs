use serde::Serialize;
use tracing::debug;

use crate::core::{
    AmortizationResult, Field, FieldId, InputError, NormalizedInputs, RawInputs, evaluate_normalized,
    format_inr, format_percent, normalize, parse_field, slider_for,
};

pub const MOBILE_BREAKPOINT_PX: u32 = 768;
const MOBILE_DONUT_PX: u32 = 180;
const DESKTOP_DONUT_PX: u32 = 240;
const DONUT_HOLE_RATIO: f64 = 0.52;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Mobile,
    #[default]
    Desktop,
}

impl Layout {
    pub fn for_width(width: u32) -> Self {
        if width < MOBILE_BREAKPOINT_PX {
            Layout::Mobile
        } else {
            Layout::Desktop
        }
    }

    pub fn donut_px(self) -> u32 {
        match self {
            Layout::Mobile => MOBILE_DONUT_PX,
            Layout::Desktop => DESKTOP_DONUT_PX,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonutGeometry {
    pub size_px: u32,
    pub hole_px: u32,
    /// Where the principal segment ends and the interest segment begins.
    pub principal_stop_percent: f64,
}

impl DonutGeometry {
    pub fn new(layout: Layout, result: &AmortizationResult) -> Self {
        let size_px = layout.donut_px();
        Self {
            size_px,
            hole_px: (size_px as f64 * DONUT_HOLE_RATIO).round() as u32,
            principal_stop_percent: result.principal_share_percent,
        }
    }
}

/// Strings the page shows, already rounded and grouped.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFigures {
    pub periodic_payment: String,
    pub principal: String,
    pub total_interest: String,
    pub total_payable: String,
    pub principal_share: String,
    pub interest_share: String,
}

impl DisplayFigures {
    pub fn new(inputs: &NormalizedInputs, result: &AmortizationResult) -> Self {
        Self {
            periodic_payment: format_inr(result.periodic_payment),
            principal: format_inr(inputs.principal),
            total_interest: format_inr(result.total_interest),
            total_payable: format_inr(result.total_payable),
            principal_share: format_percent(result.principal_share_percent),
            interest_share: format_percent(result.interest_share_percent),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderPositions {
    pub loan_amount: f64,
    pub annual_rate: f64,
    pub tenure_years: f64,
}

impl SliderPositions {
    pub fn new(raw: &RawInputs) -> Self {
        let at = |id: FieldId| slider_for(id).position(raw.field(id));
        Self {
            loan_amount: at(FieldId::LoanAmount),
            annual_rate: at(FieldId::AnnualRate),
            tenure_years: at(FieldId::TenureYears),
        }
    }
}

/// What each input box should read after the update.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryTexts {
    pub loan_amount: String,
    pub annual_rate: String,
    pub tenure_years: String,
}

impl EntryTexts {
    pub fn new(raw: &RawInputs) -> Self {
        Self {
            loan_amount: raw.loan_amount.entry_text(),
            annual_rate: raw.annual_rate_percent.entry_text(),
            tenure_years: raw.tenure_years.entry_text(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    #[serde(skip)]
    pub raw: RawInputs,
    #[serde(rename = "inputs")]
    pub normalized: NormalizedInputs,
    pub result: AmortizationResult,
    pub display: DisplayFigures,
    pub fields: EntryTexts,
    pub sliders: SliderPositions,
    pub layout: Layout,
    pub donut: DonutGeometry,
}

/// The calculator page's state: three raw fields plus the layout flag.
/// Every derived figure is recomputed from scratch when asked for.
#[derive(Clone, Debug, Default)]
pub struct CalculatorView {
    inputs: RawInputs,
    layout: Layout,
}

impl CalculatorView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs(inputs: RawInputs) -> Self {
        Self {
            inputs,
            layout: Layout::default(),
        }
    }

    pub fn set_viewport_width(&mut self, width: u32) {
        self.layout = Layout::for_width(width);
    }

    pub fn inputs(&self) -> &RawInputs {
        &self.inputs
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Applies typed text to a field. A rejected entry leaves the field as
    /// it was.
    pub fn enter_text(&mut self, id: FieldId, text: &str) -> Result<(), InputError> {
        match parse_field(text) {
            Ok(value) => {
                self.inputs.set_field(id, value);
                Ok(())
            }
            Err(err) => {
                debug!(field = id.label(), %err, "entry rejected, keeping prior value");
                Err(err)
            }
        }
    }

    pub fn slide(&mut self, id: FieldId, position: f64) {
        let value = slider_for(id).snap(position);
        self.inputs.set_field(id, Field::Number(value));
    }

    pub fn result(&self) -> AmortizationResult {
        evaluate_normalized(&normalize(&self.inputs))
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        let normalized = normalize(&self.inputs);
        let result = evaluate_normalized(&normalized);
        ViewSnapshot {
            raw: self.inputs,
            normalized,
            result,
            display: DisplayFigures::new(&normalized, &result),
            fields: EntryTexts::new(&self.inputs),
            sliders: SliderPositions::new(&self.inputs),
            layout: self.layout,
            donut: DonutGeometry::new(self.layout, &result),
        }
    }
}
