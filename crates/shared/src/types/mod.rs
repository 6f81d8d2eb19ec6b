//! Common types used across the application.

pub mod mode;
pub mod money;

pub use mode::SplitMode;
pub use money::{AMOUNT_SCALE, AmountError, MonetaryAmount, Rounding};
