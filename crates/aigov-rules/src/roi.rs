//! Return-on-investment calculator for proposed AI initiatives.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RulesError};

pub const MAX_HORIZON_YEARS: u32 = 10;

/// Cost and benefit estimates for an initiative.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoiInput {
    pub implementation_cost: f64,
    pub annual_operating_cost: f64,
    #[serde(default)]
    pub hours_saved_per_month: f64,
    #[serde(default)]
    pub hourly_rate: f64,
    #[serde(default)]
    pub annual_revenue_uplift: f64,
    #[serde(default)]
    pub annual_risk_reduction: f64,
    pub horizon_years: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoiResult {
    pub annual_benefit: f64,
    pub total_benefit: f64,
    pub total_cost: f64,
    pub net_benefit: f64,
    pub roi_percent: f64,
    /// Months to recoup the implementation cost. `None` when the initiative never pays back.
    pub payback_months: Option<f64>,
}

pub fn calculate_roi(input: &RoiInput) -> Result<RoiResult> {
    let fields = [
        ("implementation_cost", input.implementation_cost),
        ("annual_operating_cost", input.annual_operating_cost),
        ("hours_saved_per_month", input.hours_saved_per_month),
        ("hourly_rate", input.hourly_rate),
        ("annual_revenue_uplift", input.annual_revenue_uplift),
        ("annual_risk_reduction", input.annual_risk_reduction),
    ];
    for (name, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(RulesError::validation(format!(
                "{name} must be a finite non-negative number"
            )));
        }
    }
    if input.horizon_years == 0 || input.horizon_years > MAX_HORIZON_YEARS {
        return Err(RulesError::validation(format!(
            "horizon_years must be between 1 and {MAX_HORIZON_YEARS}"
        )));
    }

    let years = f64::from(input.horizon_years);
    let annual_benefit = input.hours_saved_per_month * input.hourly_rate * 12.0
        + input.annual_revenue_uplift
        + input.annual_risk_reduction;
    let total_benefit = annual_benefit * years;
    let total_cost = input.implementation_cost + input.annual_operating_cost * years;
    let net_benefit = total_benefit - total_cost;
    let roi_percent = if total_cost > 0.0 {
        net_benefit / total_cost * 100.0
    } else {
        0.0
    };

    let monthly_net = (annual_benefit - input.annual_operating_cost) / 12.0;
    let payback_months = (monthly_net > 0.0).then(|| input.implementation_cost / monthly_net);

    Ok(RoiResult {
        annual_benefit: cents(annual_benefit),
        total_benefit: cents(total_benefit),
        total_cost: cents(total_cost),
        net_benefit: cents(net_benefit),
        roi_percent: cents(roi_percent),
        payback_months: payback_months.map(|m| (m * 10.0).round() / 10.0),
    })
}

fn cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
