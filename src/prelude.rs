//! Prelude module for tabung
//!
//! Re-exports the commonly used structs, traits, and functions.
//!
//! # Usage
//!
//! ```rust
//! use tabung::prelude::*;
//! ```

// Core exports
pub use crate::accounts::AccountItem;
pub use crate::builder::{Builder, Validate};
pub use crate::config::{IllustrativeRates, TabungConfig, TabungConfigBuilder};
pub use crate::inputs::IntoTabungDecimal;
pub use crate::portfolio::{PortfolioItemResult, PortfolioResult, PortfolioStatus, SavingsPortfolio};
pub use crate::traits::ProjectSavings;
pub use crate::types::{
    AccountType, CalculationStep, GoalCategory, ProgressStatus, ProjectionDetails, ProjectionPayload,
    TabungError,
};

// Rates and projection
pub use crate::projection::{project, ProjectionResult, YearlyBreakdown};
pub use crate::rates::{select_rate, EpfSavingsType, RateMethod, RateTable, RateTables};

// Instruments
pub use crate::contribution::{calculate_contribution, ContributionBreakdown, EpfContributionSettings};
pub use crate::instruments::{
    asb_unit_payout, compare_with_benchmark, AsbProjection, EpfProjection, PilgrimageType,
    TabungHajiProjection,
};

// Goals
pub use crate::goal::{is_goal_on_track, project_goal, AccountLink, GoalProjectionResult, SavingsGoal};
pub use crate::recommend::{recommend, recommend_account};

#[cfg(feature = "async")]
pub use crate::portfolio::AsyncSavingsPortfolio;
#[cfg(feature = "async")]
pub use crate::provider::{RateProvider, StaticRateProvider};
#[cfg(feature = "async")]
pub use crate::traits::AsyncProjectSavings;
