//! # Portfolio Projection
//!
//! Projects every account a user holds against one config and totals the
//! results. A failing account does not abort the run: it is reported as a
//! [`PortfolioItemResult::Failure`] and left out of the totals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::TabungConfig;
use crate::math::SafeDecimal;
use crate::traits::ProjectSavings;
#[cfg(feature = "async")]
use crate::traits::AsyncProjectSavings;
use crate::types::{ProjectionDetails, TabungError};

/// Individual result for an account in the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PortfolioItemResult {
    Success(ProjectionDetails),
    Failure {
        /// Account label, or its 1-based position when unlabelled.
        source: String,
        error: TabungError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortfolioStatus {
    /// Every account projected.
    Complete,
    /// Some accounts failed; totals cover the rest.
    Partial,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioResult {
    pub status: PortfolioStatus,
    pub results: Vec<PortfolioItemResult>,
    pub total_current_balance: Decimal,
    pub total_projected_balance: Decimal,
    pub total_contributions: Decimal,
    pub total_dividends: Decimal,
    pub items_attempted: usize,
    pub items_failed: usize,
}

impl PortfolioResult {
    pub fn failures(&self) -> Vec<&PortfolioItemResult> {
        self.results
            .iter()
            .filter(|r| matches!(r, PortfolioItemResult::Failure { .. }))
            .collect()
    }

    pub fn successes(&self) -> Vec<&ProjectionDetails> {
        self.results
            .iter()
            .filter_map(|r| match r {
                PortfolioItemResult::Success(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.status == PortfolioStatus::Complete
    }

    /// Growth across all successful accounts.
    pub fn total_growth(&self) -> Decimal {
        self.total_projected_balance - self.total_current_balance
    }

    /// Returns the result if Complete, otherwise an error describing the failure(s).
    pub fn expect_complete(self) -> Result<Self, TabungError> {
        match self.status {
            PortfolioStatus::Complete => Ok(self),
            PortfolioStatus::Partial => Err(TabungError::CalculationError {
                reason: format!(
                    "Portfolio projection incomplete. {}/{} accounts failed.",
                    self.items_failed, self.items_attempted
                ),
                source_label: Some("Portfolio".to_string()),
            }),
            PortfolioStatus::Failed => Err(TabungError::CalculationError {
                reason: "Portfolio projection failed completely.".to_string(),
                source_label: Some("Portfolio".to_string()),
            }),
        }
    }

    fn config_failure(error: TabungError, items: usize) -> Self {
        Self::whole_failure("Configuration", error, items)
    }

    /// A failure that applies to the run as a whole rather than one account.
    fn whole_failure(source: &str, error: TabungError, items: usize) -> Self {
        PortfolioResult {
            status: PortfolioStatus::Failed,
            results: vec![PortfolioItemResult::Failure {
                source: source.to_string(),
                error: error.with_source(source),
            }],
            total_current_balance: Decimal::ZERO,
            total_projected_balance: Decimal::ZERO,
            total_contributions: Decimal::ZERO,
            total_dividends: Decimal::ZERO,
            items_attempted: items,
            items_failed: items,
        }
    }
}

fn source_for(label: Option<String>, index: usize) -> String {
    label.unwrap_or_else(|| format!("Account {}", index + 1))
}

fn to_item_result(
    outcome: Result<ProjectionDetails, TabungError>,
    label: Option<String>,
    index: usize,
) -> PortfolioItemResult {
    match outcome {
        Ok(details) => PortfolioItemResult::Success(details),
        Err(e) => {
            let source = source_for(label, index);
            warn!(%source, error = %e, "account projection failed");
            PortfolioItemResult::Failure {
                error: e.with_source(source.clone()),
                source,
            }
        }
    }
}

#[derive(Default)]
pub struct SavingsPortfolio {
    accounts: Vec<Box<dyn ProjectSavings + Send + Sync>>,
}

impl SavingsPortfolio {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add<T: ProjectSavings + Send + Sync + 'static>(mut self, account: T) -> Self {
        self.accounts.push(Box::new(account));
        self
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Projects every account. The config is validated once up front.
    pub fn project_all(&self, config: &TabungConfig) -> PortfolioResult {
        if let Err(e) = config.validate() {
            return PortfolioResult::config_failure(e, self.accounts.len());
        }

        let results = self
            .accounts
            .iter()
            .enumerate()
            .map(|(index, account)| to_item_result(account.project(config), account.get_label(), index))
            .collect();

        summarize(results)
    }

    /// Re-runs only the failed accounts of `previous` against `config`.
    ///
    /// Falls back to a full run when `previous` does not line up with this
    /// portfolio (e.g. it was a configuration failure).
    pub fn retry_failures(&self, previous: &PortfolioResult, config: &TabungConfig) -> PortfolioResult {
        if let Err(e) = config.validate() {
            return PortfolioResult::config_failure(e, self.accounts.len());
        }
        if previous.results.len() != self.accounts.len() {
            debug!("previous result does not match portfolio; projecting everything");
            return self.project_all(config);
        }

        let results = previous
            .results
            .iter()
            .zip(&self.accounts)
            .enumerate()
            .map(|(index, (result, account))| match result {
                PortfolioItemResult::Success(details) => PortfolioItemResult::Success(details.clone()),
                PortfolioItemResult::Failure { .. } => {
                    to_item_result(account.project(config), account.get_label(), index)
                }
            })
            .collect();

        summarize(results)
    }
}

#[cfg(feature = "async")]
#[derive(Default)]
pub struct AsyncSavingsPortfolio {
    accounts: Vec<Box<dyn AsyncProjectSavings>>,
}

#[cfg(feature = "async")]
impl AsyncSavingsPortfolio {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add<T: AsyncProjectSavings + 'static>(mut self, account: T) -> Self {
        self.accounts.push(Box::new(account));
        self
    }

    /// Projects all accounts concurrently; results keep insertion order.
    pub async fn project_all_async(&self, config: &TabungConfig) -> PortfolioResult {
        if let Err(e) = config.validate() {
            return PortfolioResult::config_failure(e, self.accounts.len());
        }

        let outcomes =
            futures::future::join_all(self.accounts.iter().map(|account| account.project_async(config))).await;

        let results = outcomes
            .into_iter()
            .zip(&self.accounts)
            .enumerate()
            .map(|(index, (outcome, account))| to_item_result(outcome, account.get_label(), index))
            .collect();

        summarize(results)
    }
}

#[derive(Default)]
struct Totals {
    current_balance: Decimal,
    projected_balance: Decimal,
    contributions: Decimal,
    dividends: Decimal,
}

impl Totals {
    fn add(self, details: &ProjectionDetails) -> Result<Self, TabungError> {
        let sum = |a: Decimal, b: Decimal| SafeDecimal::new(a).safe_add(b).map(SafeDecimal::into_inner);
        Ok(Totals {
            current_balance: sum(self.current_balance, details.current_balance)?,
            projected_balance: sum(self.projected_balance, details.result.projected_balance)?,
            contributions: sum(self.contributions, details.result.total_contributions)?,
            dividends: sum(self.dividends, details.result.total_dividends)?,
        })
    }
}

fn summarize(results: Vec<PortfolioItemResult>) -> PortfolioResult {
    let totals = results
        .iter()
        .filter_map(|r| match r {
            PortfolioItemResult::Success(d) => Some(d),
            _ => None,
        })
        .try_fold(Totals::default(), |totals, details| totals.add(details));

    let totals = match totals {
        Ok(totals) => totals,
        Err(e) => {
            warn!(error = %e, "portfolio totals overflowed");
            return PortfolioResult::whole_failure("Totals", e, results.len());
        }
    };

    let items_attempted = results.len();
    let items_failed = results
        .iter()
        .filter(|r| matches!(r, PortfolioItemResult::Failure { .. }))
        .count();

    let status = if items_failed == 0 {
        PortfolioStatus::Complete
    } else if items_failed == items_attempted {
        PortfolioStatus::Failed
    } else {
        PortfolioStatus::Partial
    };

    PortfolioResult {
        status,
        results,
        total_current_balance: totals.current_balance,
        total_projected_balance: totals.projected_balance,
        total_contributions: totals.contributions,
        total_dividends: totals.dividends,
        items_attempted,
        items_failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contribution::EpfContributionSettings;
    use crate::instruments::{AsbProjection, EpfProjection, TabungHajiProjection};
    use rust_decimal_macros::dec;

    fn broken_epf() -> EpfProjection {
        EpfProjection::new()
            .salary(4000)
            .ages(30, 60)
            .settings(EpfContributionSettings::new().employee(25))
            .label("Broken EPF")
    }

    #[test]
    fn test_totals_cover_all_accounts() {
        let config = TabungConfig::default();
        let result = SavingsPortfolio::new()
            .add(AsbProjection::new().balance(10000).years(1))
            .add(TabungHajiProjection::new().balance(50000))
            .project_all(&config);

        assert!(result.is_clean());
        assert_eq!(result.total_current_balance, dec!(60000));
        assert_eq!(result.total_projected_balance, dec!(60575));
        assert_eq!(result.total_dividends, dec!(575));
        assert_eq!(result.total_growth(), dec!(575));
    }

    #[test]
    fn test_partial_failure_keeps_others() {
        let config = TabungConfig::default();
        let result = SavingsPortfolio::new()
            .add(AsbProjection::new().balance(10000).years(1))
            .add(broken_epf())
            .project_all(&config);

        assert_eq!(result.status, PortfolioStatus::Partial);
        assert_eq!(result.items_failed, 1);
        assert_eq!(result.total_projected_balance, dec!(10575));
        match result.failures()[0] {
            PortfolioItemResult::Failure { source, error } => {
                assert_eq!(source, "Broken EPF");
                assert_eq!(error.source_label(), Some("Broken EPF"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(result.expect_complete().is_err());
    }

    #[test]
    fn test_unlabelled_failure_uses_position() {
        let config = TabungConfig::default();
        let result = SavingsPortfolio::new()
            .add(AsbProjection::new())
            .add(EpfProjection::new().settings(EpfContributionSettings::new().employer(-1)))
            .project_all(&config);
        match result.failures()[0] {
            PortfolioItemResult::Failure { source, .. } => assert_eq!(source, "Account 2"),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_config_fails_fast_then_retry_recovers() {
        let mut bad = TabungConfig::default();
        bad.hajj_cost = dec!(-1);

        let portfolio = SavingsPortfolio::new()
            .add(AsbProjection::new().balance(100).years(1))
            .add(TabungHajiProjection::new().balance(100).monthly(1000));

        let first = portfolio.project_all(&bad);
        assert_eq!(first.status, PortfolioStatus::Failed);
        assert_eq!(first.results.len(), 1);

        let second = portfolio.retry_failures(&first, &TabungConfig::default());
        assert!(second.is_clean());
        assert_eq!(second.successes().len(), 2);
    }

    #[test]
    fn test_retry_keeps_successes() {
        let config = TabungConfig::default();
        let portfolio = SavingsPortfolio::new()
            .add(AsbProjection::new().balance(10000).years(1).label("ASB"))
            .add(broken_epf());
        let first = portfolio.project_all(&config);
        let retried = portfolio.retry_failures(&first, &config);

        assert_eq!(retried.status, PortfolioStatus::Partial);
        assert_eq!(retried.successes()[0].label.as_deref(), Some("ASB"));
    }

    #[test]
    fn test_overflowing_totals_fail_the_run() {
        let result = SavingsPortfolio::new()
            .add(AsbProjection::new().balance(Decimal::MAX))
            .add(AsbProjection::new().balance(Decimal::MAX))
            .project_all(&TabungConfig::default());

        assert_eq!(result.status, PortfolioStatus::Failed);
        assert_eq!(result.items_failed, 2);
        match &result.results[0] {
            PortfolioItemResult::Failure { source, error } => {
                assert_eq!(source, "Totals");
                assert!(matches!(error, TabungError::Overflow { .. }));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_portfolio_is_complete() {
        let result = SavingsPortfolio::new().project_all(&TabungConfig::default());
        assert_eq!(result.status, PortfolioStatus::Complete);
        assert_eq!(result.total_projected_balance, Decimal::ZERO);
    }
}
