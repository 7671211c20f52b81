//! Analysis modules.
//!
//! This module computes the demographic statistics of a loaded dataset.

pub mod aggregator;

pub use aggregator::*;
