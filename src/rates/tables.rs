//! Historical dividend data for Malaysian savings instruments.
//!
//! Rates are annual percentages as declared by the fund managers
//! (PNB for ASB, KWSP for EPF, Lembaga Tabung Haji for hibah).
//! The built-in figures are a starting point; deployments are expected to
//! override them through [`crate::config::TabungConfig`] when a new year is
//! declared.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::types::{AccountType, TabungError};

/// Calendar year → annual rate in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RateTable(BTreeMap<i32, Decimal>);

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (i32, Decimal)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    pub fn with_rate(mut self, year: i32, rate: Decimal) -> Self {
        self.0.insert(year, rate);
        self
    }

    pub fn insert(&mut self, year: i32, rate: Decimal) -> Option<Decimal> {
        self.0.insert(year, rate)
    }

    pub fn get(&self, year: i32) -> Option<Decimal> {
        self.0.get(&year).copied()
    }

    /// Most recent year and its rate.
    pub fn latest(&self) -> Option<(i32, Decimal)> {
        self.0.iter().next_back().map(|(y, r)| (*y, *r))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates years in ascending order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (i32, Decimal)> + '_ {
        self.0.iter().map(|(y, r)| (*y, *r))
    }

    pub fn validate(&self, name: &str) -> Result<(), TabungError> {
        if let Some((year, rate)) = self.iter().find(|(_, r)| *r < Decimal::ZERO) {
            return Err(TabungError::configuration(format!(
                "{} rate for {} is negative ({})",
                name, year, rate
            )));
        }
        Ok(())
    }
}

/// ASB distribution for one year in sen per unit.
///
/// `total` is stored rather than derived so it can be entered straight from
/// the PNB announcement; [`AsbDetailedRate::is_consistent`] checks it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AsbDetailedRate {
    pub dividend: Decimal,
    pub bonus: Decimal,
    pub total: Decimal,
}

impl AsbDetailedRate {
    pub fn new(dividend: Decimal, bonus: Decimal) -> Self {
        Self {
            dividend,
            bonus,
            total: dividend.saturating_add(bonus),
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.dividend.checked_add(self.bonus) == Some(self.total)
    }
}

/// EPF savings account flavour; each declares its own dividend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum EpfSavingsType {
    #[default]
    Conventional,
    Syariah,
}

/// All dividend tables the calculators read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RateTables {
    pub asb: RateTable,
    #[serde(default)]
    pub asb_detailed: BTreeMap<i32, AsbDetailedRate>,
    pub epf_conventional: RateTable,
    pub epf_syariah: RateTable,
    pub tabung_haji: RateTable,
}

impl Default for RateTables {
    fn default() -> Self {
        Self {
            asb: builtin_asb(),
            asb_detailed: builtin_asb_detailed(),
            epf_conventional: builtin_epf_conventional(),
            epf_syariah: builtin_epf_syariah(),
            tabung_haji: builtin_tabung_haji(),
        }
    }
}

impl RateTables {
    pub fn epf(&self, savings_type: EpfSavingsType) -> &RateTable {
        match savings_type {
            EpfSavingsType::Conventional => &self.epf_conventional,
            EpfSavingsType::Syariah => &self.epf_syariah,
        }
    }

    /// Dividend table backing an account type. EPF maps to the
    /// conventional table; non-dividend instruments have none.
    pub fn for_account(&self, account_type: AccountType) -> Option<&RateTable> {
        if !account_type.is_dividend_based() {
            return None;
        }
        match account_type {
            AccountType::Asb => Some(&self.asb),
            AccountType::Epf => Some(&self.epf_conventional),
            _ => Some(&self.tabung_haji),
        }
    }

    pub fn asb_detailed(&self, year: i32) -> Option<AsbDetailedRate> {
        self.asb_detailed.get(&year).copied()
    }

    pub fn validate(&self) -> Result<(), TabungError> {
        self.asb.validate("ASB")?;
        self.epf_conventional.validate("EPF Conventional")?;
        self.epf_syariah.validate("EPF Syariah")?;
        self.tabung_haji.validate("Tabung Haji")?;

        for (year, rate) in &self.asb_detailed {
            if rate.dividend < Decimal::ZERO || rate.bonus < Decimal::ZERO {
                return Err(TabungError::configuration(format!(
                    "ASB detailed rate for {} is negative",
                    year
                )));
            }
            if !rate.is_consistent() {
                return Err(TabungError::configuration(format!(
                    "ASB detailed rate for {}: total {} != dividend {} + bonus {}",
                    year, rate.total, rate.dividend, rate.bonus
                )));
            }
        }
        Ok(())
    }
}

/// Milestone age → recommended cumulative EPF balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct EpfBenchmarks(BTreeMap<u32, Decimal>);

impl Default for EpfBenchmarks {
    fn default() -> Self {
        Self(BTreeMap::from([
            (30, dec!(35000)),
            (40, dec!(95000)),
            (50, dec!(180000)),
            (55, dec!(240000)),
        ]))
    }
}

impl EpfBenchmarks {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (u32, Decimal)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    pub fn get(&self, age: u32) -> Option<Decimal> {
        self.0.get(&age).copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (u32, Decimal)> + '_ {
        self.0.iter().map(|(a, b)| (*a, *b))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self) -> Result<(), TabungError> {
        if let Some((age, amount)) = self.iter().find(|(_, b)| *b < Decimal::ZERO) {
            return Err(TabungError::configuration(format!(
                "EPF benchmark for age {} is negative ({})",
                age, amount
            )));
        }
        Ok(())
    }
}

pub fn builtin_asb() -> RateTable {
    RateTable::from_pairs([
        (2015, dec!(7.75)),
        (2016, dec!(7.25)),
        (2017, dec!(7.50)),
        (2018, dec!(7.00)),
        (2019, dec!(6.00)),
        (2020, dec!(5.00)),
        (2021, dec!(5.00)),
        (2022, dec!(5.35)),
        (2023, dec!(5.25)),
        (2024, dec!(5.75)),
    ])
}

pub fn builtin_asb_detailed() -> BTreeMap<i32, AsbDetailedRate> {
    BTreeMap::from([
        (2015, AsbDetailedRate::new(dec!(7.00), dec!(0.75))),
        (2016, AsbDetailedRate::new(dec!(6.75), dec!(0.50))),
        (2017, AsbDetailedRate::new(dec!(6.75), dec!(0.75))),
        (2018, AsbDetailedRate::new(dec!(6.50), dec!(0.50))),
        (2019, AsbDetailedRate::new(dec!(5.50), dec!(0.50))),
        (2020, AsbDetailedRate::new(dec!(4.25), dec!(0.75))),
        (2021, AsbDetailedRate::new(dec!(4.25), dec!(0.75))),
        (2022, AsbDetailedRate::new(dec!(4.60), dec!(0.75))),
        (2023, AsbDetailedRate::new(dec!(5.00), dec!(0.25))),
        (2024, AsbDetailedRate::new(dec!(5.50), dec!(0.25))),
    ])
}

pub fn builtin_epf_conventional() -> RateTable {
    RateTable::from_pairs([
        (2015, dec!(6.40)),
        (2016, dec!(5.70)),
        (2017, dec!(6.90)),
        (2018, dec!(6.15)),
        (2019, dec!(5.45)),
        (2020, dec!(5.20)),
        (2021, dec!(6.10)),
        (2022, dec!(5.35)),
        (2023, dec!(5.50)),
        (2024, dec!(6.30)),
    ])
}

pub fn builtin_epf_syariah() -> RateTable {
    RateTable::from_pairs([
        (2017, dec!(6.40)),
        (2018, dec!(5.90)),
        (2019, dec!(5.00)),
        (2020, dec!(4.90)),
        (2021, dec!(5.65)),
        (2022, dec!(4.75)),
        (2023, dec!(5.40)),
        (2024, dec!(6.30)),
    ])
}

pub fn builtin_tabung_haji() -> RateTable {
    RateTable::from_pairs([
        (2015, dec!(6.25)),
        (2016, dec!(5.00)),
        (2017, dec!(6.25)),
        (2018, dec!(1.25)),
        (2019, dec!(3.05)),
        (2020, dec!(3.10)),
        (2021, dec!(3.10)),
        (2022, dec!(3.10)),
        (2023, dec!(3.10)),
        (2024, dec!(3.25)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_only_dividend_accounts_have_tables() {
        let tables = RateTables::default();
        for account in AccountType::iter() {
            assert_eq!(
                tables.for_account(account).is_some(),
                account.is_dividend_based(),
                "{}",
                account
            );
        }
        assert_eq!(tables.for_account(AccountType::TabungHaji), Some(&tables.tabung_haji));
    }

    #[test]
    fn test_builtin_asb_detailed_matches_percent_table() {
        // Both tables are entered by hand; they must agree (1 unit = RM1).
        let tables = RateTables::default();
        for (year, rate) in tables.asb.iter() {
            let detailed = tables.asb_detailed(year).expect("detailed entry for every year");
            assert_eq!(detailed.total, rate, "year {}", year);
        }
    }

    #[test]
    fn test_builtin_tables_validate() {
        assert!(RateTables::default().validate().is_ok());
        assert!(EpfBenchmarks::default().validate().is_ok());
    }

    #[test]
    fn test_inconsistent_detailed_rate_rejected() {
        let mut tables = RateTables::default();
        tables.asb_detailed.insert(
            2030,
            AsbDetailedRate { dividend: dec!(5), bonus: dec!(1), total: dec!(7) },
        );
        assert!(tables.validate().is_err());
    }

    #[test]
    fn test_negative_rate_rejected() {
        let mut tables = RateTables::default();
        tables.tabung_haji.insert(2030, dec!(-1));
        let err = tables.validate().unwrap_err();
        assert!(err.to_string().contains("Tabung Haji"));
    }

    #[test]
    fn test_rate_table_json_shape() {
        let table = RateTable::new().with_rate(2024, dec!(5.75));
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"2024":"5.75"}"#);
        let back: RateTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back.latest(), Some((2024, dec!(5.75))));
    }
}
