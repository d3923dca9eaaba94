//! Account recommendation for a savings goal.
//!
//! Pilgrimage goals always go to Tabung Haji and retirement goals to EPF,
//! whatever the user already holds. Any other goal picks the held account with
//! the best historical-average rate, or ASB when nothing held is recognised.

use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::config::TabungConfig;
use crate::types::{AccountType, GoalCategory};

/// Recommended account when nothing better can be determined.
pub const DEFAULT_RECOMMENDATION: AccountType = AccountType::Asb;

pub fn recommend_account(
    category: GoalCategory,
    held: &[AccountType],
    config: &TabungConfig,
) -> AccountType {
    match category {
        GoalCategory::Hajj | GoalCategory::Umrah => AccountType::TabungHaji,
        GoalCategory::Retirement => AccountType::Epf,
        _ => {
            let mut best: Option<(AccountType, Decimal)> = None;
            for &account in held {
                let rate = match config.historical_average_rate(account) {
                    Ok(rate) => rate,
                    Err(e) => {
                        warn!(%account, error = %e, "skipping account with unusable rate table");
                        continue;
                    }
                };
                // Ties keep the earlier account.
                if best.is_none_or(|(_, top)| rate > top) {
                    best = Some((account, rate));
                }
            }
            match best {
                Some((account, rate)) => {
                    debug!(%category, %account, %rate, "recommended highest historical rate");
                    account
                }
                None => DEFAULT_RECOMMENDATION,
            }
        }
    }
}

/// String form of [`recommend_account`].
///
/// Unknown category names are treated as [`GoalCategory::Other`] and unknown
/// account names are ignored.
pub fn recommend(category: &str, held: &[&str], config: &TabungConfig) -> String {
    let category = GoalCategory::from_str(category.trim()).unwrap_or(GoalCategory::Other);
    let held: Vec<AccountType> = held
        .iter()
        .filter_map(|name| AccountType::from_str(name.trim()).ok())
        .collect();
    recommend_account(category, &held, config).to_string()
}
