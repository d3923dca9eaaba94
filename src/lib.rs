//! Savings projections for Malaysian accounts: ASB, EPF (KWSP) and Tabung Haji.
//!
//! Every calculator takes a [`TabungConfig`] carrying the declared dividend
//! tables, so new annual rates can be loaded without touching the math.

pub mod accounts;
pub mod builder;
pub mod config;
pub mod contribution;
pub mod goal;
pub mod inputs;
pub mod instruments;
pub mod macros;
pub mod math;
pub mod portfolio;
pub mod prelude;
pub mod projection;
#[cfg(feature = "async")]
pub mod provider;
pub mod rates;
pub mod recommend;
pub mod traits;
pub mod types;

pub use config::TabungConfig;
pub use portfolio::SavingsPortfolio;
pub use traits::ProjectSavings;
pub use types::{AccountType, ProjectionDetails, TabungError};
