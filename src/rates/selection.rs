use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::tables::RateTable;
use crate::math::SafeDecimal;
use crate::types::TabungError;

/// How a single effective rate is picked from a [`RateTable`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum RateMethod {
    /// Rate declared for the most recent year.
    #[default]
    Latest,
    #[serde(rename = "3-year-average")]
    #[strum(to_string = "3-year-average")]
    ThreeYearAverage,
    #[serde(rename = "5-year-average")]
    #[strum(to_string = "5-year-average")]
    FiveYearAverage,
    HistoricalAverage,
}

impl RateMethod {
    /// Number of trailing years averaged, `None` meaning "all of them".
    fn window(&self) -> Option<usize> {
        match self {
            RateMethod::Latest => Some(1),
            RateMethod::ThreeYearAverage => Some(3),
            RateMethod::FiveYearAverage => Some(5),
            RateMethod::HistoricalAverage => None,
        }
    }
}

/// Picks an effective annual rate (percent) from `table`.
///
/// An empty table yields `0`, which downstream compounding treats as "no growth".
/// Trailing averages use whatever years exist when fewer than N are present.
pub fn select_rate(table: &RateTable, method: RateMethod) -> Result<Decimal, TabungError> {
    let take = method.window().unwrap_or(usize::MAX);

    let (sum, count) = table.iter().rev().take(take).try_fold(
        (SafeDecimal::new(Decimal::ZERO), 0u32),
        |(sum, n), (_, rate)| Ok::<_, TabungError>((sum.safe_add(rate)?, n + 1)),
    )?;

    if count == 0 {
        return Ok(Decimal::ZERO);
    }
    Ok(sum.safe_div(Decimal::from(count))?.into_inner())
}
