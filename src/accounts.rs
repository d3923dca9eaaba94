use serde::{Deserialize, Serialize};

use crate::config::TabungConfig;
use crate::instruments::{AsbProjection, EpfProjection, TabungHajiProjection};
use crate::traits::ProjectSavings;
use crate::types::{ProjectionDetails, TabungError};

/// A wrapper enum for every projectable account type.
/// This enables serialization and uniform handling in a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AccountItem {
    Asb(AsbProjection),
    Epf(EpfProjection),
    TabungHaji(TabungHajiProjection),
}

impl ProjectSavings for AccountItem {
    fn project(&self, config: &TabungConfig) -> Result<ProjectionDetails, TabungError> {
        match self {
            AccountItem::Asb(account) => account.project(config),
            AccountItem::Epf(account) => account.project(config),
            AccountItem::TabungHaji(account) => account.project(config),
        }
    }

    fn get_label(&self) -> Option<String> {
        match self {
            AccountItem::Asb(account) => account.get_label(),
            AccountItem::Epf(account) => account.get_label(),
            AccountItem::TabungHaji(account) => account.get_label(),
        }
    }

    fn get_id(&self) -> uuid::Uuid {
        match self {
            AccountItem::Asb(account) => account.get_id(),
            AccountItem::Epf(account) => account.get_id(),
            AccountItem::TabungHaji(account) => account.get_id(),
        }
    }
}

impl From<AsbProjection> for AccountItem {
    fn from(account: AsbProjection) -> Self {
        AccountItem::Asb(account)
    }
}

impl From<EpfProjection> for AccountItem {
    fn from(account: EpfProjection) -> Self {
        AccountItem::Epf(account)
    }
}

impl From<TabungHajiProjection> for AccountItem {
    fn from(account: TabungHajiProjection) -> Self {
        AccountItem::TabungHaji(account)
    }
}
