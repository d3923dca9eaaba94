//! # Employees Provident Fund (EPF / KWSP)
//!
//! Mandatory retirement savings. The projection runs from the member's
//! current age to their planned retirement age, with the monthly contribution
//! derived from salary via [`crate::contribution`] rather than supplied
//! directly.
//!
//! Since May 2024 new contributions are split across three accounts:
//! Akaun Persaraan (75%), Akaun Sejahtera (15%) and Akaun Fleksibel (10%).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::TabungConfig;
use crate::contribution::{calculate_contribution, EpfContributionSettings};
use crate::goal::classify_progress;
use crate::inputs::IntoTabungDecimal;
use crate::math::SafeDecimal;
use crate::projection::project;
use crate::rates::{select_rate, EpfBenchmarks, EpfSavingsType, RateMethod};
use crate::traits::ProjectSavings;
use crate::types::{
    AccountType, CalculationStep, ProgressStatus, ProjectionDetails, ProjectionPayload, TabungError,
};

pub const DEFAULT_RETIREMENT_AGE: u32 = 60;
/// Age from which benchmark interpolation starts at a zero balance.
pub const EPF_START_AGE: u32 = 18;

const PERSARAAN_SHARE: Decimal = dec!(0.75);
const SEJAHTERA_SHARE: Decimal = dec!(0.15);
const FLEKSIBEL_SHARE: Decimal = dec!(0.10);

/// A balance split across the three EPF accounts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EpfAccountSplit {
    pub persaraan: Decimal,
    pub sejahtera: Decimal,
    pub fleksibel: Decimal,
}

impl EpfAccountSplit {
    pub fn of(balance: Decimal) -> Result<Self, TabungError> {
        let balance = SafeDecimal::new(balance);
        Ok(Self {
            persaraan: balance.safe_mul(PERSARAAN_SHARE)?.into_inner(),
            sejahtera: balance.safe_mul(SEJAHTERA_SHARE)?.into_inner(),
            fleksibel: balance.safe_mul(FLEKSIBEL_SHARE)?.into_inner(),
        })
    }

    pub fn total(&self) -> Decimal {
        self.persaraan + self.sejahtera + self.fleksibel
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EpfProjection {
    pub current_balance: Decimal,
    pub monthly_salary: Decimal,
    pub current_age: u32,
    pub retirement_age: u32,
    pub settings: EpfContributionSettings,
    pub savings_type: EpfSavingsType,
    /// Rate method override; the config default applies when unset.
    pub rate_method: Option<RateMethod>,
    pub label: Option<String>,
    pub id: uuid::Uuid,
}

impl Default for EpfProjection {
    fn default() -> Self {
        Self {
            current_balance: Decimal::ZERO,
            monthly_salary: Decimal::ZERO,
            current_age: 0,
            retirement_age: DEFAULT_RETIREMENT_AGE,
            settings: EpfContributionSettings::default(),
            savings_type: EpfSavingsType::default(),
            rate_method: None,
            label: None,
            id: uuid::Uuid::nil(),
        }
    }
}

impl EpfProjection {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            ..Default::default()
        }
    }

    pub fn balance(mut self, balance: impl IntoTabungDecimal) -> Self {
        if let Ok(b) = balance.into_tabung_decimal() {
            self.current_balance = b;
        }
        self
    }

    pub fn salary(mut self, salary: impl IntoTabungDecimal) -> Self {
        if let Ok(s) = salary.into_tabung_decimal() {
            self.monthly_salary = s;
        }
        self
    }

    pub fn ages(mut self, current_age: u32, retirement_age: u32) -> Self {
        self.current_age = current_age;
        self.retirement_age = retirement_age;
        self
    }

    pub fn settings(mut self, settings: EpfContributionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn savings_type(mut self, savings_type: EpfSavingsType) -> Self {
        self.savings_type = savings_type;
        self
    }

    pub fn rate_method(mut self, method: RateMethod) -> Self {
        self.rate_method = Some(method);
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Whole years until retirement, zero once the member is past it.
    pub fn horizon_years(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }
}

impl ProjectSavings for EpfProjection {
    fn project(&self, config: &TabungConfig) -> Result<ProjectionDetails, TabungError> {
        let label = self.label.clone();
        let source = || label.clone().unwrap_or_else(|| "EPF".to_string());

        let contribution =
            calculate_contribution(self.monthly_salary, &self.settings).map_err(|e| e.with_source(source()))?;

        let method = self.rate_method.unwrap_or(config.epf_rate_method);
        let rate = select_rate(config.rates.epf(self.savings_type), method)
            .map_err(|e| e.with_source(source()))?;
        let years = self.horizon_years();

        let result = project(self.current_balance, contribution.used_contribution, rate, years)
            .map_err(|e| e.with_source(source()))?;

        let mut trace = vec![CalculationStep::initial("Current Balance", self.current_balance)];
        if contribution.is_manual {
            trace.push(CalculationStep::info("Manual monthly contribution"));
        } else {
            trace.push(CalculationStep::info(format!(
                "Employee {}% + Employer {}% of {} salary{}",
                self.settings.employee_percentage,
                self.settings.employer_percentage,
                self.monthly_salary,
                if self.settings.use_total { "" } else { " (employee share only)" }
            )));
        }
        trace.push(CalculationStep::add("Monthly Contribution Used", contribution.used_contribution));
        trace.push(CalculationStep::info(format!(
            "Age {} to {} ({} years)",
            self.current_age, self.retirement_age, years
        )));
        trace.push(CalculationStep::rate(
            format!("EPF {} Rate ({})", self.savings_type, method),
            rate,
        ));
        trace.push(CalculationStep::add("Total Contributions", result.total_contributions));
        trace.push(CalculationStep::add("Total Dividends", result.total_dividends));
        trace.push(CalculationStep::result("Balance at Retirement", result.projected_balance));

        let account_split =
            EpfAccountSplit::of(result.projected_balance).map_err(|e| e.with_source(source()))?;

        Ok(ProjectionDetails {
            account_type: AccountType::Epf,
            current_balance: self.current_balance,
            monthly_contribution: contribution.used_contribution,
            rate_applied: rate,
            years,
            result,
            label,
            payload: ProjectionPayload::Epf {
                current_age: self.current_age,
                retirement_age: self.retirement_age,
                contribution,
                account_split,
            },
            calculation_trace: trace,
        })
    }

    fn get_label(&self) -> Option<String> {
        self.label.clone()
    }

    fn get_id(&self) -> uuid::Uuid {
        self.id
    }
}

/// Where a member's balance sits relative to the recommended savings path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BenchmarkComparison {
    pub age: u32,
    pub balance: Decimal,
    pub expected_balance: Decimal,
    pub status: ProgressStatus,
    /// `balance - expected_balance`.
    pub difference: Decimal,
}

/// Recommended balance at `age`, interpolated linearly between milestones.
///
/// The path starts at zero at [`EPF_START_AGE`] and stays flat after the last
/// milestone. `None` when no milestones are configured.
pub fn expected_balance_at(age: u32, benchmarks: &EpfBenchmarks) -> Result<Option<Decimal>, TabungError> {
    let mut points: Vec<(u32, Decimal)> = Vec::new();
    let Some((first_age, _)) = benchmarks.iter().next() else {
        return Ok(None);
    };
    if first_age > EPF_START_AGE {
        points.push((EPF_START_AGE, Decimal::ZERO));
    }
    points.extend(benchmarks.iter());

    let (first_age, first_value) = points[0];
    if age <= first_age {
        return Ok(Some(first_value));
    }

    for window in points.windows(2) {
        let (a0, v0) = window[0];
        let (a1, v1) = window[1];
        if age <= a1 {
            let span = Decimal::from(a1 - a0);
            let offset = Decimal::from(age - a0);
            let step = SafeDecimal::new(v1)
                .safe_sub(v0)?
                .safe_mul(offset)?
                .safe_div(span)?;
            return Ok(Some(SafeDecimal::new(v0).safe_add(*step)?.into_inner()));
        }
    }

    Ok(points.last().map(|(_, v)| *v))
}

/// Classifies an EPF balance against the age benchmarks using the same
/// thresholds as goal tracking.
///
/// Fails with [`TabungError::MissingConfig`] when no milestones are configured.
pub fn compare_with_benchmark(
    age: u32,
    balance: Decimal,
    benchmarks: &EpfBenchmarks,
) -> Result<BenchmarkComparison, TabungError> {
    let expected = expected_balance_at(age, benchmarks)?.ok_or_else(|| TabungError::MissingConfig {
        field: "epf_benchmarks".to_string(),
        source_label: None,
    })?;
    Ok(BenchmarkComparison {
        age,
        balance,
        expected_balance: expected,
        status: classify_progress(balance, expected)?,
        difference: SafeDecimal::new(balance).safe_sub(expected)?.into_inner(),
    })
}
