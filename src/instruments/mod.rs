pub mod asb;
pub mod epf;
pub mod tabung_haji;

pub use asb::{asb_unit_payout, AsbProjection, AsbUnitPayout};
pub use epf::{compare_with_benchmark, expected_balance_at, BenchmarkComparison, EpfAccountSplit, EpfProjection};
pub use tabung_haji::{PilgrimageType, TabungHajiProjection};
