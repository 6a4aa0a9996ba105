use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use eyre::ensure;
use itertools::Itertools;

use crate::model::{RawRecord, StockTable};

/// Source of raw per-stock rows. The core never reads files itself; anything
/// that can produce a [`StockTable`] can feed it.
pub trait StockDataLoader {
    fn load(path: impl AsRef<Path>) -> eyre::Result<StockTable>;
}

/// Loads `stock date price` rows separated by single spaces, one header row
/// skipped. A row with no price field (trailing delimiter or nothing after
/// the date) becomes a record with empty price text.
pub struct SpaceDelimitedLoader {}

impl StockDataLoader for SpaceDelimitedLoader {
    fn load(path: impl AsRef<Path>) -> eyre::Result<StockTable> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let mut stocks: StockTable = HashMap::new();

        for (ix, line) in reader.lines().enumerate().skip(1) {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let splits = line.splitn(3, ' ').collect_vec();
            ensure!(
                splits.len() >= 2,
                "row {}: expected `stock date price`, got {line:?}",
                ix + 1
            );

            let stock = splits[0].trim().to_owned();
            let record = RawRecord::new(
                splits[1].trim(),
                splits.get(2).copied().unwrap_or("").trim(),
            );

            stocks.entry(stock).or_insert_with(Vec::new).push(record);
        }

        log::debug!("loaded {} stocks", stocks.len());

        Ok(stocks)
    }
}
