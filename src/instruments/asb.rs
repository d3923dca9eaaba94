//! # Amanah Saham Bumiputera (ASB)
//!
//! ASB is a fixed-price unit trust (1 unit = RM1) managed by PNB. Each year it
//! declares a dividend plus a bonus, quoted in sen per unit.
//!
//! Projections use the rate of the most recently declared year as-is rather
//! than an average, so the figure matches what users see in the latest
//! announcement.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::TabungConfig;
use crate::math::SafeDecimal;
use crate::projection::project;
use crate::rates::{select_rate, RateMethod, RateTables};
use crate::traits::ProjectSavings;
use crate::types::{AccountType, CalculationStep, ProjectionDetails, ProjectionPayload, TabungError};

crate::savings_instrument! {
    #[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
    pub struct AsbProjection {
        /// Horizon in whole years.
        pub years: u32,
        /// Declared year whose rate to use. Latest year when unset.
        pub rate_year: Option<i32>,
    }
}

impl AsbProjection {
    pub fn years(mut self, years: u32) -> Self {
        self.years = years;
        self
    }

    pub fn rate_year(mut self, year: i32) -> Self {
        self.rate_year = Some(year);
        self
    }

    fn resolve_rate(&self, config: &TabungConfig) -> Result<(Option<i32>, Decimal), TabungError> {
        let table = &config.rates.asb;
        if let Some(year) = self.rate_year {
            if let Some(rate) = table.get(year) {
                return Ok((Some(year), rate));
            }
            warn!(year, "no ASB rate declared for requested year; falling back to latest");
        }
        Ok((table.latest().map(|(y, _)| y), select_rate(table, RateMethod::Latest)?))
    }
}

impl ProjectSavings for AsbProjection {
    fn project(&self, config: &TabungConfig) -> Result<ProjectionDetails, TabungError> {
        let label = self.label.clone();
        let source = || label.clone().unwrap_or_else(|| "ASB".to_string());
        let (rate_year, rate) = self.resolve_rate(config).map_err(|e| e.with_source(source()))?;

        let result = project(self.current_balance, self.monthly_contribution, rate, self.years)
            .map_err(|e| e.with_source(source()))?;

        let rate_desc = match rate_year {
            Some(year) => format!("ASB Rate ({} declared)", year),
            None => "ASB Rate (no declared years)".to_string(),
        };

        let trace = vec![
            CalculationStep::initial("Current Balance", self.current_balance),
            CalculationStep::add("Total Contributions", result.total_contributions),
            CalculationStep::rate(rate_desc, rate),
            CalculationStep::add("Total Dividends", result.total_dividends),
            CalculationStep::result(format!("Balance after {} years", self.years), result.projected_balance),
        ];

        Ok(ProjectionDetails {
            account_type: AccountType::Asb,
            current_balance: self.current_balance,
            monthly_contribution: self.monthly_contribution,
            rate_applied: rate,
            years: self.years,
            result,
            label,
            payload: ProjectionPayload::Standard,
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

/// Ringgit paid out on a unit holding for one declared year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AsbUnitPayout {
    pub dividend: Decimal,
    pub bonus: Decimal,
    pub total: Decimal,
}

/// Converts the sen-per-unit declaration for `year` into ringgit for `units`.
///
/// Returns `None` when no detailed declaration exists for that year.
pub fn asb_unit_payout(
    units: Decimal,
    year: i32,
    tables: &RateTables,
) -> Result<Option<AsbUnitPayout>, TabungError> {
    let Some(declared) = tables.asb_detailed(year) else {
        return Ok(None);
    };
    let in_ringgit = |sen: Decimal| -> Result<Decimal, TabungError> {
        Ok(SafeDecimal::new(units)
            .safe_mul(sen)?
            .safe_div(Decimal::ONE_HUNDRED)?
            .into_inner())
    };
    Ok(Some(AsbUnitPayout {
        dividend: in_ringgit(declared.dividend)?,
        bonus: in_ringgit(declared.bonus)?,
        total: in_ringgit(declared.total)?,
    }))
}
