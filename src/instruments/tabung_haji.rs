//! # Lembaga Tabung Haji
//!
//! Pilgrimage savings fund paying an annual hibah. Rather than a fixed
//! horizon, the projection answers "how many years until I can afford the
//! pilgrimage?": it compounds year by year until the balance covers the
//! target, giving up after 30 years.
//!
//! The reported shortfall is measured against today's balance, not the
//! projected one: it is the principal still missing right now.

use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::config::TabungConfig;
use crate::inputs::IntoTabungDecimal;
use crate::projection::{project_until, ProjectionInput, MAX_TARGET_YEARS};
use crate::rates::{select_rate, RateMethod};
use crate::traits::ProjectSavings;
use crate::types::{AccountType, CalculationStep, ProjectionDetails, ProjectionPayload, TabungError};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, Display,
    EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum PilgrimageType {
    #[default]
    Hajj,
    Umrah,
}

impl PilgrimageType {
    pub fn cost(&self, config: &TabungConfig) -> Decimal {
        match self {
            PilgrimageType::Hajj => config.hajj_cost,
            PilgrimageType::Umrah => config.umrah_cost,
        }
    }
}

crate::savings_instrument! {
    #[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
    pub struct TabungHajiProjection {
        /// Explicit savings target. The configured pilgrimage cost applies when unset.
        pub target: Option<Decimal>,
        pub pilgrimage: PilgrimageType,
        pub rate_method: Option<RateMethod>,
    }
}

impl TabungHajiProjection {
    pub fn target(mut self, target: impl IntoTabungDecimal) -> Self {
        if let Ok(t) = target.into_tabung_decimal() {
            self.target = Some(t);
        }
        self
    }

    pub fn pilgrimage(mut self, pilgrimage: PilgrimageType) -> Self {
        self.pilgrimage = pilgrimage;
        self
    }

    pub fn rate_method(mut self, method: RateMethod) -> Self {
        self.rate_method = Some(method);
        self
    }

    pub fn resolve_target(&self, config: &TabungConfig) -> Decimal {
        self.target.unwrap_or_else(|| self.pilgrimage.cost(config))
    }
}

impl ProjectSavings for TabungHajiProjection {
    fn project(&self, config: &TabungConfig) -> Result<ProjectionDetails, TabungError> {
        let label = self.label.clone();
        let source = || label.clone().unwrap_or_else(|| "Tabung Haji".to_string());
        let target = self.resolve_target(config);
        let method = self.rate_method.unwrap_or(config.tabung_haji_rate_method);
        let rate = select_rate(&config.rates.tabung_haji, method).map_err(|e| e.with_source(source()))?;

        let input = ProjectionInput::new(self.current_balance, self.monthly_contribution, rate);
        let outcome = project_until(&input, target, MAX_TARGET_YEARS).map_err(|e| e.with_source(source()))?;

        let shortfall = (target - input.current_balance).max(Decimal::ZERO);

        let mut trace = vec![
            CalculationStep::initial("Current Balance", input.current_balance),
            CalculationStep::info(format!("Target: {} cost", self.pilgrimage)),
            CalculationStep::result("Target Amount", target),
            CalculationStep::result("Shortfall Today", shortfall),
            CalculationStep::rate(format!("Tabung Haji Hibah ({})", method), rate),
            CalculationStep::add("Total Contributions", outcome.result.total_contributions),
            CalculationStep::add("Total Hibah", outcome.result.total_dividends),
            CalculationStep::result(
                format!("Balance after {} years", outcome.years_elapsed),
                outcome.result.projected_balance,
            ),
        ];
        if !outcome.target_reached {
            trace.push(CalculationStep::info(format!(
                "Target not reached within {} years",
                MAX_TARGET_YEARS
            )));
        }

        Ok(ProjectionDetails {
            account_type: AccountType::TabungHaji,
            current_balance: self.current_balance,
            monthly_contribution: self.monthly_contribution,
            rate_applied: rate,
            years: outcome.years_elapsed,
            result: outcome.result,
            label,
            payload: ProjectionPayload::TabungHaji {
                target,
                years_to_target: outcome.years_elapsed,
                target_reached: outcome.target_reached,
                shortfall,
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
