//! # Savings Goals
//!
//! Monthly savings needed, a naive completion estimate, and an
//! ahead / on-track / behind classification.
//!
//! ## Progress classification
//! Progress is compared against elapsed time over the goal's window:
//! - `ahead` when saved% ≥ 1.1 × elapsed%
//! - `behind` when saved% < 0.9 × elapsed%
//! - `on-track` otherwise
//!
//! The window starts at the goal's creation date when known and otherwise at
//! a nominal one year before the target date. [`goal_progress`] is the only
//! implementation of this rule; everything else calls it.

use chrono::{DateTime, Local, Months, NaiveDate, TimeDelta};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::TabungConfig;
use crate::inputs::IntoTabungDecimal;
use crate::math::{ceil_to_u32, SafeDecimal};
use crate::recommend::recommend_account;
use crate::types::{AccountType, GoalCategory, ProgressStatus, TabungError};

/// Length of the assumed window when a goal's creation date is unknown.
pub const NOMINAL_WINDOW_DAYS: i64 = 365;
pub const DAYS_PER_MONTH: i64 = 30;

const AHEAD_FACTOR: Decimal = dec!(1.1);
const BEHIND_FACTOR: Decimal = dec!(0.9);

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp into a calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, TabungError> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|e| TabungError::InvalidDate {
            value: value.to_string(),
            reason: format!("expected YYYY-MM-DD or RFC 3339: {}", e),
            source_label: None,
        })
}

/// Classifies `actual` against `expected` with the ±10% band.
pub fn classify_progress(actual: Decimal, expected: Decimal) -> Result<ProgressStatus, TabungError> {
    let expected = SafeDecimal::new(expected);
    let status = if actual >= *expected.safe_mul(AHEAD_FACTOR)? {
        ProgressStatus::Ahead
    } else if actual < *expected.safe_mul(BEHIND_FACTOR)? {
        ProgressStatus::Behind
    } else {
        ProgressStatus::OnTrack
    };
    Ok(status)
}

/// Progress of a goal at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GoalProgress {
    /// Share of the window elapsed, percent in `[0, 100]`.
    pub time_progress: Decimal,
    /// Share of the target saved, percent (may exceed 100).
    pub actual_progress: Decimal,
    pub status: ProgressStatus,
    /// `current - target × time_progress / 100`.
    pub difference: Decimal,
}

/// Canonical progress classification.
///
/// `window_start` defaults to `target_date - 365 days`. A non-positive target
/// can never be on track and is reported as `Behind`.
pub fn goal_progress(
    current_amount: Decimal,
    target_amount: Decimal,
    target_date: NaiveDate,
    window_start: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<GoalProgress, TabungError> {
    let start = window_start.unwrap_or(target_date - TimeDelta::days(NOMINAL_WINDOW_DAYS));
    let total_days = (target_date - start).num_days();
    let elapsed_days = (today - start).num_days();

    let time_progress = if total_days <= 0 {
        Decimal::ONE_HUNDRED
    } else {
        (Decimal::from(elapsed_days) * Decimal::ONE_HUNDRED / Decimal::from(total_days))
            .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
    };

    if target_amount <= Decimal::ZERO {
        return Ok(GoalProgress {
            time_progress,
            actual_progress: Decimal::ZERO,
            status: ProgressStatus::Behind,
            difference: current_amount,
        });
    }

    let actual_progress = SafeDecimal::new(current_amount)
        .safe_mul(Decimal::ONE_HUNDRED)?
        .safe_div(target_amount)?
        .into_inner();
    let expected_amount = SafeDecimal::new(target_amount)
        .safe_mul(time_progress)?
        .safe_div(Decimal::ONE_HUNDRED)?;
    Ok(GoalProgress {
        time_progress,
        actual_progress,
        status: classify_progress(actual_progress, time_progress)?,
        difference: SafeDecimal::new(current_amount).safe_sub(*expected_amount)?.into_inner(),
    })
}

/// `true` unless the goal is behind schedule. A zero target is never on track.
pub fn is_goal_on_track(
    current_amount: Decimal,
    target_amount: Decimal,
    target_date: NaiveDate,
    created_on: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<bool, TabungError> {
    if target_amount <= Decimal::ZERO {
        return Ok(false);
    }
    let progress = goal_progress(current_amount, target_amount, target_date, created_on, today)?;
    Ok(progress.status != ProgressStatus::Behind)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GoalProjectionResult {
    /// Savings needed each month to hit the target on time (never negative).
    pub monthly_needed: Decimal,
    /// Whole 30-day months until the target date, at least 1.
    pub months_remaining: u32,
    /// Months the current contribution needs to close the gap.
    pub projected_months: u32,
    pub projected_completion_date: NaiveDate,
    pub status: ProgressStatus,
    pub difference: Decimal,
    pub time_progress: Decimal,
    pub actual_progress: Decimal,
}

/// Months left until `target_date`, counted in 30-day blocks and rounded up.
/// Never below 1 so it is always safe to divide by.
pub fn months_remaining(target_date: NaiveDate, today: NaiveDate) -> u32 {
    let days = (target_date - today).num_days();
    if days <= 0 {
        return 1;
    }
    let months = (days + DAYS_PER_MONTH - 1) / DAYS_PER_MONTH;
    u32::try_from(months).unwrap_or(u32::MAX).max(1)
}

/// Projects a goal using the nominal one-year window.
pub fn project_goal(
    current_amount: impl IntoTabungDecimal,
    target_amount: impl IntoTabungDecimal,
    target_date_iso: &str,
    monthly_contribution: impl IntoTabungDecimal,
    today: NaiveDate,
) -> Result<GoalProjectionResult, TabungError> {
    let current = current_amount.into_tabung_decimal()?;
    let target = target_amount.into_tabung_decimal()?;
    let monthly = monthly_contribution.into_tabung_decimal()?;
    let target_date = parse_date(target_date_iso)?;
    project_goal_dates(current, target, target_date, None, monthly, today)
}

/// [`project_goal`] against the local clock.
pub fn project_goal_today(
    current_amount: impl IntoTabungDecimal,
    target_amount: impl IntoTabungDecimal,
    target_date_iso: &str,
    monthly_contribution: impl IntoTabungDecimal,
) -> Result<GoalProjectionResult, TabungError> {
    project_goal(
        current_amount,
        target_amount,
        target_date_iso,
        monthly_contribution,
        Local::now().date_naive(),
    )
}

fn project_goal_dates(
    current: Decimal,
    target: Decimal,
    target_date: NaiveDate,
    window_start: Option<NaiveDate>,
    monthly: Decimal,
    today: NaiveDate,
) -> Result<GoalProjectionResult, TabungError> {
    let monthly = if monthly < Decimal::ZERO {
        warn!(%monthly, "negative monthly goal contribution treated as zero");
        Decimal::ZERO
    } else {
        monthly
    };

    let months_remaining = months_remaining(target_date, today);
    let remaining = SafeDecimal::new(target).safe_sub(current)?;
    let monthly_needed = remaining
        .safe_div(Decimal::from(months_remaining))?
        .into_inner()
        .max(Decimal::ZERO);

    // No contribution: assume twice the time left. A heuristic, not a forecast.
    let projected_months = if *remaining <= Decimal::ZERO {
        0
    } else if monthly > Decimal::ZERO {
        ceil_to_u32(remaining.safe_div(monthly)?.into_inner())
    } else {
        months_remaining.saturating_mul(2)
    };

    let projected_completion_date = today
        .checked_add_months(Months::new(projected_months))
        .ok_or_else(|| TabungError::CalculationError {
            reason: format!("completion date {} months out is not representable", projected_months),
            source_label: None,
        })?;

    let progress = goal_progress(current, target, target_date, window_start, today)?;

    Ok(GoalProjectionResult {
        monthly_needed,
        months_remaining,
        projected_months,
        projected_completion_date,
        status: progress.status,
        difference: progress.difference,
        time_progress: progress.time_progress,
        actual_progress: progress.actual_progress,
    })
}

/// An account counted towards a goal, possibly only in part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AccountLink {
    pub account_type: AccountType,
    pub balance: Decimal,
    /// Share of the balance counted towards this goal, percent in `[0, 100]`.
    pub allocation_percent: Decimal,
}

impl AccountLink {
    pub fn new(account_type: AccountType, balance: Decimal, allocation_percent: Decimal) -> Self {
        Self {
            account_type,
            balance,
            allocation_percent,
        }
    }

    pub fn allocated(&self) -> Result<Decimal, TabungError> {
        if self.allocation_percent < Decimal::ZERO || self.allocation_percent > Decimal::ONE_HUNDRED {
            return Err(TabungError::invalid_input(
                "allocation_percent",
                self.allocation_percent,
                "Allocation must be between 0 and 100",
            ));
        }
        Ok(SafeDecimal::new(self.balance)
            .safe_mul(self.allocation_percent)?
            .safe_div(Decimal::ONE_HUNDRED)?
            .into_inner())
    }
}

/// Manual progress plus the allocated share of every linked account.
pub fn linked_progress(manual_amount: Decimal, links: &[AccountLink]) -> Result<Decimal, TabungError> {
    links.iter().try_fold(manual_amount, |acc, link| {
        Ok(SafeDecimal::new(acc).safe_add(link.allocated()?)?.into_inner())
    })
}

/// A user's savings goal.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SavingsGoal {
    pub name: String,
    pub category: GoalCategory,
    pub target_amount: Decimal,
    pub target_date: NaiveDate,
    /// Progress entered by hand, on top of linked accounts.
    pub manual_amount: Decimal,
    pub monthly_contribution: Decimal,
    pub created_on: Option<NaiveDate>,
    pub links: Vec<AccountLink>,
}

impl SavingsGoal {
    pub fn new(
        name: impl Into<String>,
        category: GoalCategory,
        target_amount: impl IntoTabungDecimal,
        target_date_iso: &str,
    ) -> Result<Self, TabungError> {
        let name = name.into();
        let target_amount = target_amount
            .into_tabung_decimal()
            .map_err(|e| e.with_source(name.clone()))?;
        let target_date = parse_date(target_date_iso).map_err(|e| e.with_source(name.clone()))?;
        Ok(Self {
            name,
            category,
            target_amount,
            target_date,
            manual_amount: Decimal::ZERO,
            monthly_contribution: Decimal::ZERO,
            created_on: None,
            links: Vec::new(),
        })
    }

    pub fn manual(mut self, amount: impl IntoTabungDecimal) -> Self {
        if let Ok(a) = amount.into_tabung_decimal() {
            self.manual_amount = a;
        }
        self
    }

    pub fn monthly(mut self, amount: impl IntoTabungDecimal) -> Self {
        if let Ok(a) = amount.into_tabung_decimal() {
            self.monthly_contribution = a;
        }
        self
    }

    pub fn created_on(mut self, date: NaiveDate) -> Self {
        self.created_on = Some(date);
        self
    }

    pub fn link(mut self, link: AccountLink) -> Self {
        self.links.push(link);
        self
    }

    pub fn current_amount(&self) -> Result<Decimal, TabungError> {
        linked_progress(self.manual_amount, &self.links).map_err(|e| e.with_source(self.name.clone()))
    }

    /// Projection with the window starting at the creation date when known.
    pub fn project(&self, today: NaiveDate) -> Result<GoalProjectionResult, TabungError> {
        let current = self.current_amount()?;
        project_goal_dates(
            current,
            self.target_amount,
            self.target_date,
            self.created_on,
            self.monthly_contribution,
            today,
        )
        .map_err(|e| e.with_source(self.name.clone()))
    }

    pub fn is_on_track(&self, today: NaiveDate) -> Result<bool, TabungError> {
        is_goal_on_track(
            self.current_amount()?,
            self.target_amount,
            self.target_date,
            self.created_on,
            today,
        )
        .map_err(|e| e.with_source(self.name.clone()))
    }

    /// Best account for this goal among the linked account types.
    pub fn recommended_account(&self, config: &TabungConfig) -> AccountType {
        let held: Vec<AccountType> = self.links.iter().map(|l| l.account_type).collect();
        recommend_account(self.category, &held, config)
    }
}
