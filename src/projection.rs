//! # Annual Dividend Compounding
//!
//! ASB, EPF and Tabung Haji all declare one dividend per year on the balance
//! held. The projector models that with one step per whole year:
//!
//! 1. The year's contributions (`monthly × 12`) are added first, so new money
//!    earns dividend in its first year.
//! 2. The dividend (`balance × rate / 100`) is credited.
//!
//! Dividends are never rounded inside the loop; rounding is a display concern.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::math::{percent_to_fraction, SafeDecimal};
use crate::types::TabungError;

/// Hard cap on simulated years for open-ended (target-seeking) projections.
pub const MAX_TARGET_YEARS: u32 = 30;

/// Balance and dividend at the end of one simulated year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct YearlyBreakdown {
    /// 1-based year index relative to the projection start.
    pub year: u32,
    pub balance: Decimal,
    pub dividend: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectionResult {
    pub projected_balance: Decimal,
    pub total_dividends: Decimal,
    pub total_contributions: Decimal,
    /// One entry per simulated year, in chronological order.
    pub yearly_breakdown: Vec<YearlyBreakdown>,
}

impl ProjectionResult {
    pub fn years(&self) -> u32 {
        self.yearly_breakdown.len() as u32
    }
}

/// Inputs to a single compounding run.
///
/// Built fresh for every call; negative amounts are clamped to zero so bad
/// upstream values degrade to "no growth" instead of failing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionInput {
    pub current_balance: Decimal,
    pub monthly_contribution: Decimal,
    pub annual_rate_percent: Decimal,
}

impl ProjectionInput {
    pub fn new(current_balance: Decimal, monthly_contribution: Decimal, annual_rate_percent: Decimal) -> Self {
        Self {
            current_balance: clamp_non_negative("current_balance", current_balance),
            monthly_contribution: clamp_non_negative("monthly_contribution", monthly_contribution),
            annual_rate_percent: clamp_non_negative("annual_rate_percent", annual_rate_percent),
        }
    }

    pub fn annual_contribution(&self) -> Result<Decimal, TabungError> {
        Ok(SafeDecimal::new(self.monthly_contribution).safe_mul(Decimal::from(12))?.into_inner())
    }
}

fn clamp_non_negative(field: &str, value: Decimal) -> Decimal {
    if value < Decimal::ZERO {
        warn!(field, %value, "negative projection input clamped to zero");
        Decimal::ZERO
    } else {
        value
    }
}

/// Stateful year-by-year simulation shared by the fixed-horizon projector and
/// the target-seeking Tabung Haji wrapper.
struct Compounder {
    balance: SafeDecimal,
    annual_contribution: Decimal,
    rate: Decimal,
    total_dividends: SafeDecimal,
    breakdown: Vec<YearlyBreakdown>,
}

impl Compounder {
    fn new(input: &ProjectionInput) -> Result<Self, TabungError> {
        Ok(Self {
            balance: SafeDecimal::new(input.current_balance),
            annual_contribution: input.annual_contribution()?,
            rate: percent_to_fraction(input.annual_rate_percent),
            total_dividends: SafeDecimal::new(Decimal::ZERO),
            breakdown: Vec::new(),
        })
    }

    fn step(&mut self) -> Result<(), TabungError> {
        let with_contribution = self.balance.safe_add(self.annual_contribution)?;
        let dividend = with_contribution.safe_mul(self.rate)?;
        self.balance = with_contribution.safe_add(*dividend)?;
        self.total_dividends = self.total_dividends.safe_add(*dividend)?;
        self.breakdown.push(YearlyBreakdown {
            year: self.breakdown.len() as u32 + 1,
            balance: *self.balance,
            dividend: *dividend,
        });
        Ok(())
    }

    fn balance(&self) -> Decimal {
        *self.balance
    }

    fn finish(self) -> Result<ProjectionResult, TabungError> {
        let years = Decimal::from(self.breakdown.len() as u64);
        let total_contributions = SafeDecimal::new(self.annual_contribution).safe_mul(years)?;
        Ok(ProjectionResult {
            projected_balance: *self.balance,
            total_dividends: *self.total_dividends,
            total_contributions: *total_contributions,
            yearly_breakdown: self.breakdown,
        })
    }
}

/// Projects a balance forward `years` whole years at a fixed annual rate.
///
/// `years = 0` returns the starting balance untouched with an empty breakdown.
pub fn project(
    current_balance: Decimal,
    monthly_contribution: Decimal,
    annual_rate_percent: Decimal,
    years: u32,
) -> Result<ProjectionResult, TabungError> {
    let input = ProjectionInput::new(current_balance, monthly_contribution, annual_rate_percent);
    project_input(&input, years)
}

pub fn project_input(input: &ProjectionInput, years: u32) -> Result<ProjectionResult, TabungError> {
    let mut sim = Compounder::new(input)?;
    for _ in 0..years {
        sim.step()?;
    }
    let result = sim.finish()?;
    debug!(
        years,
        rate = %input.annual_rate_percent,
        projected = %result.projected_balance,
        "compounding projection complete"
    );
    Ok(result)
}

/// Outcome of compounding until a target balance is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetProjection {
    /// Years simulated, at most `max_years`.
    pub years_elapsed: u32,
    pub target_reached: bool,
    pub result: ProjectionResult,
}

/// Runs the same yearly loop as [`project`] until the balance reaches
/// `target` or `max_years` have been simulated.
///
/// A starting balance already at or above the target takes zero years.
pub fn project_until(
    input: &ProjectionInput,
    target: Decimal,
    max_years: u32,
) -> Result<TargetProjection, TabungError> {
    let mut sim = Compounder::new(input)?;
    let mut years_elapsed = 0;
    while sim.balance() < target && years_elapsed < max_years {
        sim.step()?;
        years_elapsed += 1;
    }
    let target_reached = sim.balance() >= target;
    let result = sim.finish()?;
    debug!(years_elapsed, target_reached, %target, "target projection complete");
    Ok(TargetProjection {
        years_elapsed,
        target_reached,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_single_year_no_contribution() {
        let res = project(dec!(10000), Decimal::ZERO, dec!(5.75), 1).unwrap();
        assert_eq!(res.projected_balance, dec!(10575));
        assert_eq!(res.total_dividends, dec!(575));
        assert_eq!(res.total_contributions, Decimal::ZERO);
        assert_eq!(res.yearly_breakdown.len(), 1);
    }

    #[test]
    fn test_contribution_added_before_dividend() {
        // Year 1: 1000 + 1200 = 2200, dividend 110, balance 2310.
        // Year 2: 2310 + 1200 = 3510, dividend 175.5, balance 3685.5.
        let res = project(dec!(1000), dec!(100), dec!(5), 2).unwrap();
        assert_eq!(res.yearly_breakdown[0].dividend, dec!(110));
        assert_eq!(res.yearly_breakdown[0].balance, dec!(2310));
        assert_eq!(res.yearly_breakdown[1].dividend, dec!(175.5));
        assert_eq!(res.projected_balance, dec!(3685.5));
        assert_eq!(res.total_dividends, dec!(285.5));
        assert_eq!(res.total_contributions, dec!(2400));
    }

    #[test]
    fn test_zero_years_is_identity() {
        let res = project(dec!(12345.67), dec!(500), dec!(6.3), 0).unwrap();
        assert_eq!(res.projected_balance, dec!(12345.67));
        assert_eq!(res.total_dividends, Decimal::ZERO);
        assert_eq!(res.total_contributions, Decimal::ZERO);
        assert!(res.yearly_breakdown.is_empty());
    }

    #[test]
    fn test_huge_monthly_contribution_overflows() {
        let err = project(Decimal::ZERO, Decimal::MAX, dec!(5), 1).unwrap_err();
        assert!(matches!(err, TabungError::Overflow { .. }));
    }

    #[test]
    fn test_breakdown_is_chronological_and_sized_to_horizon() {
        let res = project(dec!(5000), dec!(200), dec!(5.5), 20).unwrap();
        assert_eq!(res.years(), 20);
        for (i, entry) in res.yearly_breakdown.iter().enumerate() {
            assert_eq!(entry.year, i as u32 + 1);
        }
        assert_eq!(res.yearly_breakdown.last().unwrap().balance, res.projected_balance);
    }

    #[test]
    fn test_contribution_total_independent_of_rate() {
        for rate in [dec!(0), dec!(3.1), dec!(7.75)] {
            let res = project(dec!(100), dec!(250.25), rate, 7).unwrap();
            assert_eq!(res.total_contributions, dec!(250.25) * dec!(12) * dec!(7));
        }
    }

    #[test]
    fn test_monotonic_for_non_negative_inputs() {
        for years in 1..=10 {
            for (balance, monthly, rate) in [
                (dec!(0), dec!(0), dec!(0)),
                (dec!(1000), dec!(0), dec!(0)),
                (dec!(1000), dec!(50), dec!(4.25)),
            ] {
                let res = project(balance, monthly, rate, years).unwrap();
                assert!(res.projected_balance >= balance);
            }
        }
    }

    #[test]
    fn test_negative_inputs_clamped() {
        let res = project(dec!(-100), dec!(-10), dec!(-5), 3).unwrap();
        assert_eq!(res.projected_balance, Decimal::ZERO);
        assert_eq!(res.total_contributions, Decimal::ZERO);
    }

    #[test]
    fn test_project_until_already_reached() {
        let input = ProjectionInput::new(dec!(45000), dec!(0), dec!(3.1));
        let res = project_until(&input, dec!(45000), MAX_TARGET_YEARS).unwrap();
        assert_eq!(res.years_elapsed, 0);
        assert!(res.target_reached);
        assert_eq!(res.result.projected_balance, dec!(45000));
    }

    #[test]
    fn test_project_until_caps_at_max_years() {
        let input = ProjectionInput::new(dec!(10), dec!(0), dec!(0));
        let res = project_until(&input, dec!(45000), MAX_TARGET_YEARS).unwrap();
        assert_eq!(res.years_elapsed, MAX_TARGET_YEARS);
        assert!(!res.target_reached);
        assert_eq!(res.result.yearly_breakdown.len(), MAX_TARGET_YEARS as usize);
    }

    #[test]
    fn test_project_until_matches_fixed_horizon() {
        let input = ProjectionInput::new(dec!(20000), dec!(500), dec!(3.1));
        let seek = project_until(&input, dec!(45000), MAX_TARGET_YEARS).unwrap();
        assert!(seek.target_reached);
        let fixed = project_input(&input, seek.years_elapsed).unwrap();
        assert_eq!(seek.result, fixed);
    }
}
