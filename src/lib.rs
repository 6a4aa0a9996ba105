//! Per-stock price history analysis: windowed mean/stdev and the single best
//! buy/sell pair for a fixed 100-unit lot.

pub mod analysis;
pub mod error;
pub mod loader;
pub mod model;
pub mod suggest;
