use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::projection::ProjectionResult;

/// The kind of arithmetic a [`CalculationStep`] records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Initial,
    Add,
    Rate,
    Result,
    Info,
}

/// Represents a single step in a projection.
///
/// The trace lets callers show users how a projected balance was reached
/// (which rate was picked, which contribution was used, and so on).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CalculationStep {
    /// Human-readable description of what this step does.
    pub description: String,
    /// The value at this step (if applicable).
    pub amount: Option<Decimal>,
    pub operation: Operation,
}

impl CalculationStep {
    pub fn initial(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            amount: Some(amount),
            operation: Operation::Initial,
        }
    }

    pub fn add(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            amount: Some(amount),
            operation: Operation::Add,
        }
    }

    pub fn rate(description: impl Into<String>, rate: Decimal) -> Self {
        Self {
            description: description.into(),
            amount: Some(rate),
            operation: Operation::Rate,
        }
    }

    pub fn result(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            amount: Some(amount),
            operation: Operation::Result,
        }
    }

    pub fn info(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            amount: None,
            operation: Operation::Info,
        }
    }
}

/// Account types a user can hold.
///
/// Names follow what Malaysian users see on their statements, so
/// `"Tabung Haji"` and `"Fixed Deposit"` parse and print with spaces.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum AccountType {
    #[strum(to_string = "ASB")]
    #[serde(rename = "ASB")]
    Asb,
    #[strum(to_string = "EPF", serialize = "KWSP")]
    #[serde(rename = "EPF")]
    Epf,
    #[strum(to_string = "Tabung Haji", serialize = "TH")]
    #[serde(rename = "Tabung Haji")]
    TabungHaji,
    #[strum(to_string = "Fixed Deposit", serialize = "FD")]
    #[serde(rename = "Fixed Deposit")]
    FixedDeposit,
    Savings,
    Stocks,
    Crypto,
}

impl AccountType {
    /// Whether the account grows through an annual declared dividend
    /// rather than a fixed illustrative rate.
    pub fn is_dividend_based(&self) -> bool {
        matches!(self, AccountType::Asb | AccountType::Epf | AccountType::TabungHaji)
    }
}

/// What a savings goal is for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
    Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum GoalCategory {
    Hajj,
    Umrah,
    Retirement,
    Emergency,
    Education,
    House,
    Car,
    Wedding,
    Travel,
    Investment,
    Other,
}

/// Progress classification shared by goals and EPF benchmarks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProgressStatus {
    Ahead,
    OnTrack,
    Behind,
}

/// Instrument-specific output attached to a [`ProjectionDetails`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind")]
pub enum ProjectionPayload {
    /// Plain horizon projection (ASB).
    Standard,
    Epf {
        current_age: u32,
        retirement_age: u32,
        contribution: crate::contribution::ContributionBreakdown,
        account_split: crate::instruments::epf::EpfAccountSplit,
    },
    TabungHaji {
        target: Decimal,
        years_to_target: u32,
        target_reached: bool,
        shortfall: Decimal,
    },
}

/// Uniform projection output for any savings instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectionDetails {
    pub account_type: AccountType,
    /// Balance the projection started from.
    pub current_balance: Decimal,
    /// Monthly contribution fed into the compounding loop.
    pub monthly_contribution: Decimal,
    /// Annual rate (percent) applied every simulated year.
    pub rate_applied: Decimal,
    pub years: u32,
    pub result: ProjectionResult,
    pub label: Option<String>,
    pub payload: ProjectionPayload,
    pub calculation_trace: Vec<CalculationStep>,
}

impl ProjectionDetails {
    /// Growth over the starting balance (contributions plus dividends).
    pub fn growth(&self) -> Decimal {
        self.result.projected_balance - self.current_balance
    }

    /// Returns the projected balance formatted with 2 decimal places.
    pub fn format_amount(&self) -> String {
        use rust_decimal::RoundingStrategy;
        let rounded = self
            .result
            .projected_balance
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{:.2}", rounded)
    }

    /// Returns a concise status string.
    /// Format: "{Label}: {Account} @ {rate}% for {n} years - Projected: {Amount}"
    pub fn summary(&self) -> String {
        let label_str = self.label.as_deref().unwrap_or("Account");
        format!(
            "{}: {} @ {}% for {} years - Projected: {}",
            label_str,
            self.account_type,
            self.rate_applied.normalize(),
            self.years,
            self.format_amount()
        )
    }

    /// Generates a human-readable, step-by-step explanation of the projection.
    pub fn explain(&self) -> String {
        use std::fmt::Write;
        let mut output = String::new();
        let label = self.label.as_deref().unwrap_or("Account");

        let _ = writeln!(output, "Projection for '{}' ({}):", label, self.account_type);
        let _ = writeln!(output, "{:-<50}", "");

        let max_desc_len = self
            .calculation_trace
            .iter()
            .map(|step| step.description.len())
            .max()
            .unwrap_or(20)
            .max(20);

        for step in &self.calculation_trace {
            let op_symbol = match step.operation {
                Operation::Initial => " ",
                Operation::Add => "+",
                Operation::Rate => "%",
                Operation::Result => "=",
                Operation::Info => " ",
            };

            match (step.operation, step.amount) {
                (Operation::Info, _) | (_, None) => {
                    let _ = writeln!(output, "  INFO: {}", step.description);
                }
                (Operation::Rate, Some(amt)) => {
                    let _ = writeln!(
                        output,
                        "  {:<width$} : {} {:>12}",
                        step.description,
                        op_symbol,
                        format!("{:.3}", amt),
                        width = max_desc_len
                    );
                }
                (_, Some(amt)) => {
                    let _ = writeln!(
                        output,
                        "  {:<width$} : {} {:>12}",
                        step.description,
                        op_symbol,
                        format!("{:.2}", amt),
                        width = max_desc_len
                    );
                }
            }
        }

        let _ = writeln!(output, "{:-<50}", "");
        let _ = writeln!(output, "Projected Balance: {}", self.format_amount());
        output
    }
}

impl std::fmt::Display for ProjectionDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label_str = self.label.as_deref().unwrap_or("Account");
        writeln!(f, "Account: {} (Type: {})", label_str, self.account_type)?;
        writeln!(
            f,
            "Current: {} | Monthly: {} | Rate: {}%",
            self.current_balance, self.monthly_contribution, self.rate_applied
        )?;
        write!(f, "Projected after {} years: {}", self.years, self.format_amount())
    }
}

/// Errors surfaced by the calculators.
///
/// `source_label` carries the account or goal label so a portfolio report
/// can say which item failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, thiserror::Error)]
pub enum TabungError {
    #[error("Calculation Error [Item: {}]: {reason}", label_or_unknown(.source_label))]
    CalculationError {
        reason: String,
        source_label: Option<String>,
    },

    #[error("Invalid Input [Item: {}]: field '{field}' = {value}: {reason}", label_or_unknown(.source_label))]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
        source_label: Option<String>,
    },

    #[error("Invalid Date [Item: {}]: '{value}': {reason}", label_or_unknown(.source_label))]
    InvalidDate {
        value: String,
        reason: String,
        source_label: Option<String>,
    },

    #[error("Configuration Error [Item: {}]: {reason}", label_or_unknown(.source_label))]
    ConfigurationError {
        reason: String,
        source_label: Option<String>,
    },

    #[error("Missing Configuration [Item: {}]: Field '{field}' is required", label_or_unknown(.source_label))]
    MissingConfig {
        field: String,
        source_label: Option<String>,
    },

    #[error("Arithmetic Overflow [Item: {}]: Operation '{operation}' failed", label_or_unknown(.source_label))]
    Overflow {
        operation: String,
        source_label: Option<String>,
    },
}

fn label_or_unknown(label: &Option<String>) -> &str {
    label.as_deref().unwrap_or("Unknown")
}

impl TabungError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        TabungError::ConfigurationError {
            reason: reason.into(),
            source_label: None,
        }
    }

    pub fn invalid_input(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        TabungError::InvalidInput {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
            source_label: None,
        }
    }

    pub fn overflow(operation: impl Into<String>) -> Self {
        TabungError::Overflow {
            operation: operation.into(),
            source_label: None,
        }
    }

    /// Attaches (or replaces) the label of the item that produced this error.
    pub fn with_source(self, source: impl Into<String>) -> Self {
        let source = Some(source.into());
        match self {
            TabungError::CalculationError { reason, .. } => TabungError::CalculationError {
                reason,
                source_label: source,
            },
            TabungError::InvalidInput {
                field,
                value,
                reason,
                ..
            } => TabungError::InvalidInput {
                field,
                value,
                reason,
                source_label: source,
            },
            TabungError::InvalidDate { value, reason, .. } => TabungError::InvalidDate {
                value,
                reason,
                source_label: source,
            },
            TabungError::ConfigurationError { reason, .. } => TabungError::ConfigurationError {
                reason,
                source_label: source,
            },
            TabungError::MissingConfig { field, .. } => TabungError::MissingConfig {
                field,
                source_label: source,
            },
            TabungError::Overflow { operation, .. } => TabungError::Overflow {
                operation,
                source_label: source,
            },
        }
    }

    /// Label of the item that produced this error, if known.
    pub fn source_label(&self) -> Option<&str> {
        match self {
            TabungError::CalculationError { source_label, .. }
            | TabungError::InvalidInput { source_label, .. }
            | TabungError::InvalidDate { source_label, .. }
            | TabungError::ConfigurationError { source_label, .. }
            | TabungError::MissingConfig { source_label, .. }
            | TabungError::Overflow { source_label, .. } => source_label.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_account_type_names() {
        assert_eq!(AccountType::TabungHaji.to_string(), "Tabung Haji");
        assert_eq!(AccountType::from_str("tabung haji").unwrap(), AccountType::TabungHaji);
        assert_eq!(AccountType::from_str("KWSP").unwrap(), AccountType::Epf);
        assert_eq!(AccountType::from_str("Fixed Deposit").unwrap(), AccountType::FixedDeposit);
        assert!(AccountType::from_str("Gold Bar").is_err());
    }

    #[test]
    fn test_account_type_json_uses_display_names() {
        let json = serde_json::to_string(&AccountType::TabungHaji).unwrap();
        assert_eq!(json, r#""Tabung Haji""#);
    }

    #[test]
    fn test_progress_status_kebab_case() {
        assert_eq!(ProgressStatus::OnTrack.to_string(), "on-track");
        let json = serde_json::to_string(&ProgressStatus::OnTrack).unwrap();
        assert_eq!(json, r#""on-track""#);
    }

    #[test]
    fn test_error_with_source() {
        let err = TabungError::invalid_input("monthly_contribution", "-5", "must be non-negative")
            .with_source("My ASB");
        assert_eq!(err.source_label(), Some("My ASB"));
        let msg = err.to_string();
        assert!(msg.contains("My ASB"));
        assert!(msg.contains("monthly_contribution"));
    }

    #[test]
    fn test_error_without_source_reports_unknown() {
        let err = TabungError::configuration("negative rate");
        assert_eq!(err.to_string(), "Configuration Error [Item: Unknown]: negative rate");
    }
}
