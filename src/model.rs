use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format shared by data files and interactive input, e.g. "05-Jan-2023".
pub const DATE_FORMAT: &str = "%d-%b-%Y";

/// Fixed lot multiplied into the price delta so profit is reported in
/// currency units rather than per-share.
pub const LOT_SIZE: f64 = 100.0;

pub type Price = f64;

/// One loaded row for a stock, still text. An empty `price_text` marks a
/// missing quote for that day.
#[derive(Default, Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub date_text: String,
    pub price_text: String,
}

impl RawRecord {
    pub fn new(date_text: impl Into<String>, price_text: impl Into<String>) -> Self {
        Self {
            date_text: date_text.into(),
            price_text: price_text.into(),
        }
    }
}

/// Symbol to rows, in file order.
pub type StockTable = HashMap<String, Vec<RawRecord>>;

/// A price that parsed to a number, or a marker for a missing quote.
/// Nothing downstream of the normalizer sees price text.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawPrice {
    Numeric(Price),
    Absent,
}

impl RawPrice {
    pub fn is_absent(&self) -> bool {
        matches!(self, RawPrice::Absent)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub price: RawPrice,
}

/// Optimizer output. `profit` is already scaled by [`LOT_SIZE`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub profit: f64,
    pub buy: (NaiveDate, Price),
    pub sell: (NaiveDate, Price),
}

/// Everything `analyze` reports for one stock and window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBundle {
    pub mean: f64,
    pub stdev: f64,
    pub buy_date: NaiveDate,
    pub sell_date: NaiveDate,
    pub profit: f64,
}
