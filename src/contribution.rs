//! # EPF (KWSP) Monthly Contribution
//!
//! Resolves the employee/employer split for a monthly salary into the single
//! "used" figure that feeds the EPF projection.
//!
//! ## Statutory rates
//! - Employee: 11% of wages.
//! - Employer: 13% for wages up to RM5,000, 12% above.
//!
//! Rates outside the usual KWSP band are allowed (voluntary top-ups, reduced
//! rates for older members) but reported as warnings. Anything outside 0–20%
//! is rejected.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::warn;

use crate::inputs::IntoTabungDecimal;
use crate::math::{percent_to_fraction, SafeDecimal};
use crate::types::TabungError;

pub const MAX_CONTRIBUTION_PERCENT: Decimal = dec!(20);
pub const STATUTORY_EMPLOYEE_PERCENT: Decimal = dec!(11);
pub const STATUTORY_EMPLOYER_PERCENT_LOW_WAGE: Decimal = dec!(13);
pub const STATUTORY_EMPLOYER_PERCENT: Decimal = dec!(12);
pub const LOW_WAGE_THRESHOLD: Decimal = dec!(5000);

const TYPICAL_EMPLOYEE_RANGE: (Decimal, Decimal) = (dec!(9), dec!(13));
const TYPICAL_EMPLOYER_RANGE: (Decimal, Decimal) = (dec!(11), dec!(13));

/// Where a resolved settings snapshot came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SettingsSource {
    Account,
    Profile,
    #[default]
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EpfContributionSettings {
    pub employee_percentage: Decimal,
    pub employer_percentage: Decimal,
    /// Count the employer share towards the projected contribution.
    pub use_total: bool,
    pub is_manual: bool,
    pub manual_amount: Option<Decimal>,
    pub source: SettingsSource,
}

impl Default for EpfContributionSettings {
    fn default() -> Self {
        Self {
            employee_percentage: STATUTORY_EMPLOYEE_PERCENT,
            employer_percentage: STATUTORY_EMPLOYER_PERCENT,
            use_total: true,
            is_manual: false,
            manual_amount: None,
            source: SettingsSource::Default,
        }
    }
}

impl EpfContributionSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statutory percentages for the given monthly salary.
    pub fn statutory(monthly_salary: Decimal) -> Self {
        let employer = if monthly_salary <= LOW_WAGE_THRESHOLD {
            STATUTORY_EMPLOYER_PERCENT_LOW_WAGE
        } else {
            STATUTORY_EMPLOYER_PERCENT
        };
        Self {
            employer_percentage: employer,
            ..Self::default()
        }
    }

    /// Switches to a fixed monthly amount with no employee/employer split.
    pub fn manual(amount: impl IntoTabungDecimal) -> Result<Self, TabungError> {
        let amount = amount.into_tabung_decimal()?;
        if amount < Decimal::ZERO {
            return Err(TabungError::invalid_input(
                "manual_amount",
                amount,
                "Manual contribution must be non-negative",
            ));
        }
        Ok(Self {
            is_manual: true,
            manual_amount: Some(amount),
            ..Self::default()
        })
    }

    pub fn employee(mut self, percent: impl IntoTabungDecimal) -> Self {
        if let Ok(p) = percent.into_tabung_decimal() {
            self.employee_percentage = p;
        }
        self
    }

    pub fn employer(mut self, percent: impl IntoTabungDecimal) -> Self {
        if let Ok(p) = percent.into_tabung_decimal() {
            self.employer_percentage = p;
        }
        self
    }

    pub fn use_total(mut self, use_total: bool) -> Self {
        self.use_total = use_total;
        self
    }

    pub fn source(mut self, source: SettingsSource) -> Self {
        self.source = source;
        self
    }

    /// Picks the effective snapshot: an account-level override wins over the
    /// profile default, which wins over the built-in default.
    pub fn resolve(account: Option<&Self>, profile: Option<&Self>) -> Self {
        match (account, profile) {
            (Some(a), _) => a.clone().source(SettingsSource::Account),
            (None, Some(p)) => p.clone().source(SettingsSource::Profile),
            (None, None) => Self::default(),
        }
    }

    /// Range checks. Hard bounds return `Err`; the usual KWSP band only
    /// produces warnings.
    pub fn validate(&self) -> Result<Vec<String>, TabungError> {
        let mut warnings = Vec::new();

        if self.is_manual {
            if let Some(amount) = self.manual_amount
                && amount < Decimal::ZERO
            {
                return Err(TabungError::invalid_input(
                    "manual_amount",
                    amount,
                    "Manual contribution must be non-negative",
                ));
            }
            return Ok(warnings);
        }

        check_hard_bounds("employee_percentage", self.employee_percentage)?;
        check_hard_bounds("employer_percentage", self.employer_percentage)?;

        if !in_range(self.employee_percentage, TYPICAL_EMPLOYEE_RANGE) {
            warnings.push(format!(
                "Employee contribution {}% is outside the typical KWSP range of {}-{}%",
                self.employee_percentage, TYPICAL_EMPLOYEE_RANGE.0, TYPICAL_EMPLOYEE_RANGE.1
            ));
        }
        if !in_range(self.employer_percentage, TYPICAL_EMPLOYER_RANGE) {
            warnings.push(format!(
                "Employer contribution {}% is outside the typical KWSP range of {}-{}%",
                self.employer_percentage, TYPICAL_EMPLOYER_RANGE.0, TYPICAL_EMPLOYER_RANGE.1
            ));
        }

        Ok(warnings)
    }
}

fn in_range(value: Decimal, (lo, hi): (Decimal, Decimal)) -> bool {
    value >= lo && value <= hi
}

fn check_hard_bounds(field: &str, value: Decimal) -> Result<(), TabungError> {
    if !in_range(value, (Decimal::ZERO, MAX_CONTRIBUTION_PERCENT)) {
        return Err(TabungError::invalid_input(
            field,
            value,
            format!("Contribution percentage must be between 0 and {}", MAX_CONTRIBUTION_PERCENT),
        ));
    }
    Ok(())
}

/// Monthly contribution figures. Only `used_contribution` feeds projections;
/// the rest is for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContributionBreakdown {
    pub employee_contribution: Decimal,
    pub employer_contribution: Decimal,
    pub total_contribution: Decimal,
    pub used_contribution: Decimal,
    pub is_manual: bool,
    pub warnings: Vec<String>,
}

pub fn calculate_contribution(
    monthly_salary: impl IntoTabungDecimal,
    settings: &EpfContributionSettings,
) -> Result<ContributionBreakdown, TabungError> {
    let salary = monthly_salary.into_tabung_decimal()?;
    if salary < Decimal::ZERO {
        return Err(TabungError::invalid_input(
            "monthly_salary",
            salary,
            "Salary must be non-negative",
        ));
    }

    let mut warnings = settings.validate()?;

    if settings.is_manual {
        let amount = match settings.manual_amount {
            Some(amount) => amount,
            None => {
                warn!("manual EPF contribution selected without an amount; using zero");
                warnings.push("Manual contribution selected but no amount set".to_string());
                Decimal::ZERO
            }
        };
        return Ok(ContributionBreakdown {
            employee_contribution: amount,
            employer_contribution: Decimal::ZERO,
            total_contribution: amount,
            used_contribution: amount,
            is_manual: true,
            warnings,
        });
    }

    let salary = SafeDecimal::new(salary);
    let employee = salary.safe_mul(percent_to_fraction(settings.employee_percentage))?.into_inner();
    let employer = salary.safe_mul(percent_to_fraction(settings.employer_percentage))?.into_inner();
    let total = SafeDecimal::new(employee).safe_add(employer)?.into_inner();
    let used = if settings.use_total { total } else { employee };

    Ok(ContributionBreakdown {
        employee_contribution: employee,
        employer_contribution: employer,
        total_contribution: total,
        used_contribution: used,
        is_manual: false,
        warnings,
    })
}
