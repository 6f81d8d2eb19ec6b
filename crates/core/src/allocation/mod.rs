//! Dependent column allocation across partition parts.

pub mod proportional;

#[cfg(test)]
mod props;

pub use proportional::{ProportionalAllocation, ProportionalAllocator};
