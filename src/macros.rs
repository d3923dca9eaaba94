//! Declarative macros for reducing boilerplate in savings instrument definitions.
//!
//! The `savings_instrument!` macro generates the fields and setters every
//! instrument shares (balance, monthly contribution, label, id).

/// Macro for generating savings instrument structs with common fields and methods.
///
/// This macro generates:
/// - The struct definition with user-defined fields plus common fields
///   (`current_balance`, `monthly_contribution`, `label`, `id`)
/// - A `new()` constructor assigning a fresh v4 id
/// - Standard setters: `balance()`, `monthly()`, `label()`
///
/// The struct must derive `Default`.
///
/// # Usage
///
/// ```rust,ignore
/// savings_instrument! {
///     #[derive(Debug, Clone, Default)]
///     pub struct MyAccount {
///         pub years: u32,
///     }
/// }
/// ```
///
/// The user must still implement `ProjectSavings` manually.
#[macro_export]
macro_rules! savings_instrument {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
            /// Balance held today.
            pub current_balance: rust_decimal::Decimal,
            /// Amount added every month.
            pub monthly_contribution: rust_decimal::Decimal,
            /// Optional label for identifying this account in portfolio reports.
            pub label: Option<String>,
            pub id: uuid::Uuid,
        }

        impl $name {
            /// Creates a new instance with default values and a fresh id.
            pub fn new() -> Self {
                Self {
                    id: uuid::Uuid::new_v4(),
                    ..Default::default()
                }
            }

            /// Sets the current balance.
            pub fn balance(mut self, val: impl $crate::inputs::IntoTabungDecimal) -> Self {
                if let Ok(v) = val.into_tabung_decimal() {
                    self.current_balance = v;
                }
                self
            }

            /// Sets the monthly contribution.
            pub fn monthly(mut self, val: impl $crate::inputs::IntoTabungDecimal) -> Self {
                if let Ok(v) = val.into_tabung_decimal() {
                    self.monthly_contribution = v;
                }
                self
            }

            /// Sets an optional label for this account.
            pub fn label(mut self, val: impl Into<String>) -> Self {
                self.label = Some(val.into());
                self
            }
        }
    };
}
