pub mod selection;
pub mod tables;

pub use selection::{select_rate, RateMethod};
pub use tables::{AsbDetailedRate, EpfBenchmarks, EpfSavingsType, RateTable, RateTables};
