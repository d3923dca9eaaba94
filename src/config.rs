use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use tracing::debug;

use crate::builder::{Builder, Validate};
use crate::inputs::IntoTabungDecimal;
use crate::rates::{EpfBenchmarks, RateMethod, RateTable, RateTables};
use crate::types::{AccountType, TabungError};

/// Estimated Hajj package cost (RM) used as the default Tabung Haji target.
pub const HAJJ_COST_2025: Decimal = dec!(45000);
/// Estimated Umrah package cost (RM).
pub const UMRAH_COST_2025: Decimal = dec!(8000);

pub const ENV_CONFIG_PATH: &str = "TABUNG_CONFIG_PATH";
pub const ENV_HAJJ_COST: &str = "TABUNG_HAJJ_COST";
pub const ENV_UMRAH_COST: &str = "TABUNG_UMRAH_COST";

static BUILTIN: Lazy<TabungConfig> = Lazy::new(TabungConfig::default);

/// Illustrative annual returns (percent) for instruments without a declared dividend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IllustrativeRates {
    pub fixed_deposit: Decimal,
    pub savings: Decimal,
    pub stocks: Decimal,
    pub crypto: Decimal,
}

impl Default for IllustrativeRates {
    fn default() -> Self {
        Self {
            fixed_deposit: dec!(3.0),
            savings: dec!(2.0),
            stocks: dec!(8.0),
            crypto: dec!(10.0),
        }
    }
}

impl IllustrativeRates {
    pub fn get(&self, account_type: AccountType) -> Option<Decimal> {
        match account_type {
            AccountType::FixedDeposit => Some(self.fixed_deposit),
            AccountType::Savings => Some(self.savings),
            AccountType::Stocks => Some(self.stocks),
            AccountType::Crypto => Some(self.crypto),
            _ => None,
        }
    }
}

/// Rate data and targets every calculator reads from.
///
/// Calculators never reach for global state: pass the config you want used.
/// [`TabungConfig::default`] carries the built-in historical tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TabungConfig {
    pub rates: RateTables,
    #[serde(default)]
    pub illustrative_rates: IllustrativeRates,
    #[serde(default)]
    pub epf_benchmarks: EpfBenchmarks,
    pub hajj_cost: Decimal,
    pub umrah_cost: Decimal,
    /// Rate method used by EPF projections that do not pick one.
    #[serde(default)]
    pub epf_rate_method: RateMethod,
    /// Rate method used by Tabung Haji projections that do not pick one.
    #[serde(default)]
    pub tabung_haji_rate_method: RateMethod,
}

impl Default for TabungConfig {
    fn default() -> Self {
        Self {
            rates: RateTables::default(),
            illustrative_rates: IllustrativeRates::default(),
            epf_benchmarks: EpfBenchmarks::default(),
            hajj_cost: HAJJ_COST_2025,
            umrah_cost: UMRAH_COST_2025,
            epf_rate_method: RateMethod::default(),
            tabung_haji_rate_method: RateMethod::default(),
        }
    }
}

impl std::str::FromStr for TabungConfig {
    type Err = TabungError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: TabungConfig = serde_json::from_str(s)
            .map_err(|e| TabungError::configuration(format!("Failed to parse config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

impl TabungConfig {
    pub fn builder() -> TabungConfigBuilder {
        TabungConfigBuilder::default()
    }

    /// Shared instance holding the built-in tables.
    pub fn builtin() -> &'static TabungConfig {
        &BUILTIN
    }

    /// Validates the configuration for logical consistency and safety.
    pub fn validate(&self) -> Result<(), TabungError> {
        self.rates.validate()?;
        self.epf_benchmarks.validate()?;

        let illustrative = &self.illustrative_rates;
        for (name, rate) in [
            ("Fixed Deposit", illustrative.fixed_deposit),
            ("Savings", illustrative.savings),
            ("Stocks", illustrative.stocks),
            ("Crypto", illustrative.crypto),
        ] {
            if rate < Decimal::ZERO {
                return Err(TabungError::configuration(format!(
                    "{} illustrative rate must be non-negative",
                    name
                )));
            }
        }

        if self.hajj_cost < Decimal::ZERO {
            return Err(TabungError::configuration("Hajj cost must be non-negative"));
        }
        if self.umrah_cost < Decimal::ZERO {
            return Err(TabungError::configuration("Umrah cost must be non-negative"));
        }
        Ok(())
    }

    /// Loads configuration from the environment.
    ///
    /// `TABUNG_CONFIG_PATH` points at a JSON file (built-in tables when unset);
    /// `TABUNG_HAJJ_COST` and `TABUNG_UMRAH_COST` override the pilgrimage targets.
    pub fn from_env() -> Result<Self, TabungError> {
        let mut config = match env::var(ENV_CONFIG_PATH) {
            Ok(path) if path.trim().is_empty() => {
                return Err(TabungError::MissingConfig {
                    field: ENV_CONFIG_PATH.to_string(),
                    source_label: None,
                });
            }
            Ok(path) => Self::try_from_json(&path)?,
            Err(_) => {
                debug!("{} not set; using built-in rate tables", ENV_CONFIG_PATH);
                Self::default()
            }
        };

        if let Ok(raw) = env::var(ENV_HAJJ_COST) {
            config.hajj_cost = parse_env_amount(ENV_HAJJ_COST, &raw)?;
        }
        if let Ok(raw) = env::var(ENV_UMRAH_COST) {
            config.umrah_cost = parse_env_amount(ENV_UMRAH_COST, &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Attempts to load configuration from a JSON file.
    pub fn try_from_json(path: &str) -> Result<Self, TabungError> {
        let content = fs::read_to_string(path)
            .map_err(|e| TabungError::configuration(format!("Failed to read config file {}: {}", path, e)))?;
        content.parse()
    }

    /// Async variant of [`TabungConfig::try_from_json`].
    #[cfg(feature = "async")]
    pub async fn try_from_json_async(path: &str) -> Result<Self, TabungError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TabungError::configuration(format!("Failed to read config file {}: {}", path, e)))?;
        content.parse()
    }

    /// Creates a config whose rate tables come from an async [`RateProvider`](crate::provider::RateProvider).
    #[cfg(feature = "async")]
    pub async fn from_provider<P: crate::provider::RateProvider>(provider: &P) -> Result<Self, TabungError> {
        let rates = provider.get_rate_tables().await?;
        Self::builder().rates(rates).build()
    }

    /// Replaces the rate tables using the given provider.
    #[cfg(feature = "async")]
    pub async fn refresh_rates(&mut self, provider: &impl crate::provider::RateProvider) -> Result<(), TabungError> {
        let rates = provider.get_rate_tables().await?;
        rates.validate()?;
        self.rates = rates;
        Ok(())
    }

    // ========== Fluent Helper Methods ==========

    pub fn with_hajj_cost(mut self, cost: impl IntoTabungDecimal) -> Result<Self, TabungError> {
        self.hajj_cost = cost.into_tabung_decimal()?;
        Ok(self)
    }

    pub fn with_umrah_cost(mut self, cost: impl IntoTabungDecimal) -> Result<Self, TabungError> {
        self.umrah_cost = cost.into_tabung_decimal()?;
        Ok(self)
    }

    pub fn with_epf_rate_method(mut self, method: RateMethod) -> Self {
        self.epf_rate_method = method;
        self
    }

    /// Records a newly declared rate for a dividend-based account.
    pub fn with_declared_rate(
        mut self,
        account_type: AccountType,
        year: i32,
        rate: impl IntoTabungDecimal,
    ) -> Result<Self, TabungError> {
        let rate = rate.into_tabung_decimal()?;
        let table = match account_type {
            AccountType::Asb => &mut self.rates.asb,
            AccountType::Epf => &mut self.rates.epf_conventional,
            AccountType::TabungHaji => &mut self.rates.tabung_haji,
            other => {
                return Err(TabungError::configuration(format!(
                    "{} has no declared dividend table",
                    other
                )));
            }
        };
        table.insert(year, rate);
        Ok(self)
    }

    /// Historical-average rate for any account type: declared dividends for
    /// ASB/EPF/Tabung Haji, illustrative figures for everything else.
    pub fn historical_average_rate(&self, account_type: AccountType) -> Result<Decimal, TabungError> {
        match self.rates.for_account(account_type) {
            Some(table) => crate::rates::select_rate(table, RateMethod::HistoricalAverage),
            None => Ok(self.illustrative_rates.get(account_type).unwrap_or(Decimal::ZERO)),
        }
    }
}

fn parse_env_amount(var: &str, raw: &str) -> Result<Decimal, TabungError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|e| TabungError::configuration(format!("Invalid {} value '{}': {}", var, raw, e)))
}

// ========== TabungConfigBuilder ==========

#[derive(Default)]
pub struct TabungConfigBuilder {
    rates: Option<RateTables>,
    asb: Option<RateTable>,
    epf_conventional: Option<RateTable>,
    epf_syariah: Option<RateTable>,
    tabung_haji: Option<RateTable>,
    illustrative_rates: Option<IllustrativeRates>,
    epf_benchmarks: Option<EpfBenchmarks>,
    hajj_cost: Option<Decimal>,
    umrah_cost: Option<Decimal>,
    epf_rate_method: Option<RateMethod>,
    tabung_haji_rate_method: Option<RateMethod>,
}

impl TabungConfigBuilder {
    pub fn rates(mut self, rates: RateTables) -> Self {
        self.rates = Some(rates);
        self
    }

    pub fn asb_table(mut self, table: RateTable) -> Self {
        self.asb = Some(table);
        self
    }

    pub fn epf_conventional_table(mut self, table: RateTable) -> Self {
        self.epf_conventional = Some(table);
        self
    }

    pub fn epf_syariah_table(mut self, table: RateTable) -> Self {
        self.epf_syariah = Some(table);
        self
    }

    pub fn tabung_haji_table(mut self, table: RateTable) -> Self {
        self.tabung_haji = Some(table);
        self
    }

    pub fn illustrative_rates(mut self, rates: IllustrativeRates) -> Self {
        self.illustrative_rates = Some(rates);
        self
    }

    pub fn epf_benchmarks(mut self, benchmarks: EpfBenchmarks) -> Self {
        self.epf_benchmarks = Some(benchmarks);
        self
    }

    pub fn hajj_cost(mut self, cost: impl IntoTabungDecimal) -> Self {
        if let Ok(c) = cost.into_tabung_decimal() {
            self.hajj_cost = Some(c);
        }
        self
    }

    pub fn umrah_cost(mut self, cost: impl IntoTabungDecimal) -> Self {
        if let Ok(c) = cost.into_tabung_decimal() {
            self.umrah_cost = Some(c);
        }
        self
    }

    pub fn epf_rate_method(mut self, method: RateMethod) -> Self {
        self.epf_rate_method = Some(method);
        self
    }

    pub fn tabung_haji_rate_method(mut self, method: RateMethod) -> Self {
        self.tabung_haji_rate_method = Some(method);
        self
    }
}

impl Validate for TabungConfigBuilder {
    fn validate(&self) -> Result<(), TabungError> {
        if let Some(cost) = self.hajj_cost
            && cost < Decimal::ZERO
        {
            return Err(TabungError::configuration("Hajj cost must be non-negative"));
        }
        if let Some(cost) = self.umrah_cost
            && cost < Decimal::ZERO
        {
            return Err(TabungError::configuration("Umrah cost must be non-negative"));
        }
        Ok(())
    }
}

impl Builder<TabungConfig> for TabungConfigBuilder {
    fn build(self) -> Result<TabungConfig, TabungError> {
        Validate::validate(&self)?;

        let mut rates = self.rates.unwrap_or_default();
        if let Some(t) = self.asb {
            rates.asb = t;
        }
        if let Some(t) = self.epf_conventional {
            rates.epf_conventional = t;
        }
        if let Some(t) = self.epf_syariah {
            rates.epf_syariah = t;
        }
        if let Some(t) = self.tabung_haji {
            rates.tabung_haji = t;
        }

        let config = TabungConfig {
            rates,
            illustrative_rates: self.illustrative_rates.unwrap_or_default(),
            epf_benchmarks: self.epf_benchmarks.unwrap_or_default(),
            hajj_cost: self.hajj_cost.unwrap_or(HAJJ_COST_2025),
            umrah_cost: self.umrah_cost.unwrap_or(UMRAH_COST_2025),
            epf_rate_method: self.epf_rate_method.unwrap_or_default(),
            tabung_haji_rate_method: self.tabung_haji_rate_method.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epf_rate_method_reaches_projection() {
        use crate::instruments::EpfProjection;
        use crate::traits::ProjectSavings;

        let epf = EpfProjection::new().balance(1000).ages(30, 31);
        let latest = epf.project(&TabungConfig::default()).unwrap();
        assert_eq!(latest.rate_applied, dec!(6.30));

        let config = TabungConfig::default().with_epf_rate_method(RateMethod::ThreeYearAverage);
        assert_eq!(config.epf_rate_method, RateMethod::ThreeYearAverage);
        let averaged = epf.project(&config).unwrap();
        assert_eq!(averaged.rate_applied, dec!(17.15) / dec!(3));
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(TabungConfig::default().validate().is_ok());
        assert_eq!(TabungConfig::builtin().hajj_cost, HAJJ_COST_2025);
    }

    #[test]
    fn test_builder_overrides_single_table() {
        let config = TabungConfig::builder()
            .asb_table(RateTable::new().with_rate(2025, dec!(6.0)))
            .hajj_cost(50000)
            .build()
            .unwrap();
        assert_eq!(config.rates.asb.latest(), Some((2025, dec!(6.0))));
        assert_eq!(config.rates.tabung_haji, RateTables::default().tabung_haji);
        assert_eq!(config.hajj_cost, dec!(50000));
    }

    #[test]
    fn test_builder_rejects_negative_cost() {
        assert!(TabungConfig::builder().umrah_cost(-1).build().is_err());
    }

    #[test]
    fn test_builder_rejects_negative_rate() {
        let res = TabungConfig::builder()
            .epf_syariah_table(RateTable::new().with_rate(2024, dec!(-0.5)))
            .build();
        assert!(res.is_err());
    }

    #[test]
    fn test_json_round_trip_through_from_str() {
        let json = serde_json::to_string(&TabungConfig::default()).unwrap();
        let parsed: TabungConfig = json.parse().unwrap();
        assert_eq!(parsed, TabungConfig::default());
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        let err = "not json".parse::<TabungConfig>().unwrap_err();
        assert!(matches!(err, TabungError::ConfigurationError { .. }));
    }

    #[test]
    fn test_declared_rate_updates_table() {
        let config = TabungConfig::default()
            .with_declared_rate(AccountType::TabungHaji, 2025, 3.5)
            .unwrap();
        assert_eq!(config.rates.tabung_haji.latest(), Some((2025, dec!(3.5))));

        assert!(TabungConfig::default()
            .with_declared_rate(AccountType::Crypto, 2025, 3.5)
            .is_err());
    }

    #[test]
    fn test_historical_average_rate_for_non_dividend_accounts() {
        let config = TabungConfig::default();
        assert_eq!(config.historical_average_rate(AccountType::Crypto).unwrap(), dec!(10.0));
        assert_eq!(config.historical_average_rate(AccountType::FixedDeposit).unwrap(), dec!(3.0));
    }
}
