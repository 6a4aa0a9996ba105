use chrono::NaiveDate;
use itertools::Itertools;

use crate::error::AnalysisError;
use crate::model::{
    Observation, Price, RawPrice, RawRecord, ResultBundle, Trade, DATE_FORMAT, LOT_SIZE,
};

/// Whether `text` matches the fixed day-month-year format. The prompt loop
/// calls this before handing dates to [`analyze`].
pub fn validate_format(text: &str) -> bool {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).is_ok()
}

fn parse_date(text: &str) -> Result<NaiveDate, AnalysisError> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| AnalysisError::bad_date(text))
}

fn parse_price(text: &str) -> Result<RawPrice, AnalysisError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(RawPrice::Absent);
    }
    text.parse::<Price>()
        .map(RawPrice::Numeric)
        .map_err(|_| AnalysisError::bad_price(text))
}

/// Parse raw rows into typed observations, keeping input order.
pub fn parse_observations(records: &[RawRecord]) -> Result<Vec<Observation>, AnalysisError> {
    records
        .iter()
        .map(|r| {
            Ok(Observation {
                date: parse_date(r.date_text.trim())?,
                price: parse_price(&r.price_text)?,
            })
        })
        .collect()
}

/// Forward-fill absent prices in ascending date order, writing through the
/// buffer in place so the fill is visible regardless of iteration order
/// downstream. The earliest observation must carry a price.
pub fn forward_fill(observations: &mut [Observation]) -> Result<(), AnalysisError> {
    let mut order = (0..observations.len()).collect_vec();
    // sort_by_key is stable, so same-date rows keep input order
    order.sort_by_key(|&ix| observations[ix].date);

    for (pos, &ix) in order.iter().enumerate() {
        if observations[ix].price.is_absent() {
            if pos == 0 {
                return Err(AnalysisError::DataIntegrity {
                    date: observations[ix].date,
                });
            }
            observations[ix].price = observations[order[pos - 1]].price;
        }
    }

    Ok(())
}

/// Sorted-ascending, forward-filled copy of one stock's series.
pub fn normalize(records: &[RawRecord]) -> Result<Vec<Observation>, AnalysisError> {
    let mut observations = parse_observations(records)?;
    forward_fill(&mut observations)?;
    observations.sort_by_key(|o| o.date);
    Ok(observations)
}

/// Keep observations strictly inside the window (both bounds excluded) and
/// coerce prices to numbers. An absent price here means the fill pass never
/// ran or failed, so it is a series defect rather than something to coerce.
fn select_range(
    observations: &[Observation],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<(NaiveDate, Price)>, AnalysisError> {
    observations
        .iter()
        .filter(|o| start < o.date && o.date < end)
        .map(|o| match o.price {
            RawPrice::Numeric(price) => Ok((o.date, price)),
            RawPrice::Absent => Err(AnalysisError::DataIntegrity { date: o.date }),
        })
        .collect()
}

/// Single left-to-right scan for the buy/sell pair maximizing sell minus buy,
/// buy strictly before sell in sequence order. O(n) time, O(1) extra space.
///
/// `candidate_buy` trails the running minimum: when a new best profit is found
/// the buy is the candidate tracked before this iteration's minimum update.
/// With all deltas non-positive the least-negative pairing is still returned;
/// there is no zero floor.
///
/// Needs at least 2 observations; callers check counts first.
pub fn best_trade(data: &[(NaiveDate, Price)]) -> Trade {
    assert!(data.len() >= 2);

    let mut min_price = data[0].1;
    let mut candidate_buy = data[0];
    let mut max_profit = data[1].1 - data[0].1;
    let mut sell = data[1];
    let mut buy = data[0];

    for &point in &data[1..] {
        if point.1 - min_price > max_profit {
            max_profit = point.1 - min_price;
            sell = point;
            buy = candidate_buy;
        }
        if point.1 < min_price {
            min_price = point.1;
            candidate_buy = point;
        }
    }

    Trade {
        profit: max_profit * LOT_SIZE,
        buy,
        sell,
    }
}

/// Arithmetic mean and sample standard deviation (Bessel-corrected, n−1).
pub fn mean_stdev(prices: &[Price]) -> Result<(f64, f64), AnalysisError> {
    if prices.len() < 2 {
        return Err(AnalysisError::Statistics {
            count: prices.len(),
        });
    }

    let n = prices.len() as f64;
    let mean = prices.iter().sum::<f64>() / n;
    let variance = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / (n - 1.0);

    Ok((mean, variance.sqrt()))
}

/// Analyze one stock's raw rows over the open window `(start, end)`.
///
/// Returns `Ok(None)` when fewer than 2 observations fall strictly inside the
/// window; that is an expected outcome the caller branches on, not an error.
pub fn analyze(
    records: &[RawRecord],
    start_text: &str,
    end_text: &str,
) -> Result<Option<ResultBundle>, AnalysisError> {
    let start = parse_date(start_text.trim())?;
    let end = parse_date(end_text.trim())?;

    let mut observations = parse_observations(records)?;
    forward_fill(&mut observations)?;

    let range = select_range(&observations, start, end)?;
    if range.len() < 2 {
        return Ok(None);
    }

    let trade = best_trade(&range);
    let prices = range.iter().map(|(_, price)| *price).collect_vec();
    let (mean, stdev) = mean_stdev(&prices)?;

    Ok(Some(ResultBundle {
        mean,
        stdev,
        buy_date: trade.buy.0,
        sell_date: trade.sell.0,
        profit: trade.profit,
    }))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{analyze, best_trade, forward_fill, mean_stdev, normalize, validate_format};
    use crate::error::AnalysisError;
    use crate::model::{RawPrice, RawRecord};

    fn rec(date: &str, price: &str) -> RawRecord {
        RawRecord::new(date, price)
    }

    fn date(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%d-%b-%Y").unwrap()
    }

    #[test]
    fn unittest_best_trade_picks_max_profit_pair() -> eyre::Result<()> {
        let records = vec![
            rec("01-Jan-2023", "10"),
            rec("02-Jan-2023", "7"),
            rec("03-Jan-2023", "12"),
            rec("04-Jan-2023", "9"),
        ];

        let result = analyze(&records, "31-Dec-2022", "05-Jan-2023")?.unwrap();

        assert_eq!(result.buy_date, date("02-Jan-2023"));
        assert_eq!(result.sell_date, date("03-Jan-2023"));
        assert_eq!(result.profit, 500.0);
        Ok(())
    }

    #[test]
    fn unittest_descending_prices_return_least_negative_pair() -> eyre::Result<()> {
        let records = vec![
            rec("01-Jan-2023", "20"),
            rec("02-Jan-2023", "15"),
            rec("03-Jan-2023", "10"),
        ];

        let result = analyze(&records, "31-Dec-2022", "04-Jan-2023")?.unwrap();

        assert_eq!(result.buy_date, date("01-Jan-2023"));
        assert_eq!(result.sell_date, date("02-Jan-2023"));
        assert_eq!(result.profit, -500.0);
        Ok(())
    }

    #[test]
    fn unittest_best_trade_buy_precedes_sell() {
        let data = vec![
            (date("01-Jan-2023"), 30.0),
            (date("02-Jan-2023"), 20.0),
            (date("03-Jan-2023"), 15.0),
        ];

        // least-negative delta is 15-20; the scan must not pair backwards
        let trade = best_trade(&data);
        assert!(trade.buy.0 < trade.sell.0);
        assert_eq!(trade.buy.1, 20.0);
        assert_eq!(trade.sell.1, 15.0);
        assert_eq!(trade.profit, -500.0);
    }

    #[test]
    fn unittest_single_observation_window_is_insufficient() -> eyre::Result<()> {
        let records = vec![
            rec("01-Jan-2023", "10"),
            rec("02-Jan-2023", "11"),
            rec("03-Jan-2023", "12"),
        ];

        let result = analyze(&records, "01-Jan-2023", "03-Jan-2023")?;
        assert!(result.is_none());
        Ok(())
    }

    #[test]
    fn unittest_window_excludes_both_bounds() -> eyre::Result<()> {
        let records = vec![
            rec("01-Jan-2023", "10"),
            rec("02-Jan-2023", "11"),
            rec("03-Jan-2023", "13"),
            rec("04-Jan-2023", "14"),
        ];

        // 01-Jan and 04-Jan sit exactly on the bounds and must not count
        let result = analyze(&records, "01-Jan-2023", "04-Jan-2023")?.unwrap();
        assert_eq!(result.mean, 12.0);
        assert_eq!(result.buy_date, date("02-Jan-2023"));
        assert_eq!(result.sell_date, date("03-Jan-2023"));
        Ok(())
    }

    #[test]
    fn unittest_forward_fill_uses_previous_price() -> eyre::Result<()> {
        let records = vec![
            rec("01-Jan-2023", "10"),
            rec("02-Jan-2023", ""),
            rec("03-Jan-2023", "15"),
        ];

        let filled = normalize(&records)?;
        assert_eq!(filled[1].price, RawPrice::Numeric(10.0));

        // the filled value also reaches the windowed path
        let result = analyze(&records, "31-Dec-2022", "04-Jan-2023")?.unwrap();
        assert_eq!(result.buy_date, date("01-Jan-2023"));
        assert_eq!(result.sell_date, date("03-Jan-2023"));
        assert_eq!(result.profit, 500.0);
        Ok(())
    }

    #[test]
    fn unittest_forward_fill_is_transitive() -> eyre::Result<()> {
        let records = vec![
            rec("01-Jan-2023", "10"),
            rec("02-Jan-2023", ""),
            rec("03-Jan-2023", ""),
            rec("04-Jan-2023", ""),
        ];

        let filled = normalize(&records)?;
        for observation in &filled {
            assert_eq!(observation.price, RawPrice::Numeric(10.0));
        }
        Ok(())
    }

    #[test]
    fn unittest_forward_fill_runs_in_date_order() -> eyre::Result<()> {
        // rows arrive unsorted; the gap on 02-Jan must fill from 01-Jan
        let records = vec![
            rec("03-Jan-2023", "15"),
            rec("02-Jan-2023", ""),
            rec("01-Jan-2023", "10"),
        ];

        let filled = normalize(&records)?;
        assert_eq!(filled[0].date, date("01-Jan-2023"));
        assert_eq!(filled[1].price, RawPrice::Numeric(10.0));
        assert_eq!(filled[2].price, RawPrice::Numeric(15.0));
        Ok(())
    }

    #[test]
    fn unittest_absent_first_price_is_data_integrity_error() {
        let records = vec![rec("01-Jan-2023", ""), rec("02-Jan-2023", "15")];

        let mut observations = super::parse_observations(&records).unwrap();
        let err = forward_fill(&mut observations).unwrap_err();
        assert!(matches!(err, AnalysisError::DataIntegrity { .. }));
    }

    #[test]
    fn unittest_bad_date_is_format_error() {
        let records = vec![rec("2023-01-01", "10")];
        let err = analyze(&records, "01-Jan-2023", "05-Jan-2023").unwrap_err();
        assert!(matches!(err, AnalysisError::Format { kind: "date", .. }));
    }

    #[test]
    fn unittest_bad_price_is_format_error() {
        let records = vec![rec("01-Jan-2023", "ten")];
        let err = analyze(&records, "01-Jan-2023", "05-Jan-2023").unwrap_err();
        assert!(matches!(err, AnalysisError::Format { kind: "price", .. }));
    }

    #[test]
    fn unittest_mean_and_sample_stdev() -> eyre::Result<()> {
        let (mean, stdev) = mean_stdev(&[10.0, 12.0, 14.0])?;
        assert_eq!(mean, 12.0);
        assert_eq!(stdev, 2.0);
        Ok(())
    }

    #[test]
    fn unittest_mean_stdev_needs_two_points() {
        let err = mean_stdev(&[10.0]).unwrap_err();
        assert!(matches!(err, AnalysisError::Statistics { count: 1 }));
    }

    #[test]
    fn unittest_analyze_is_idempotent() -> eyre::Result<()> {
        let records = vec![
            rec("01-Jan-2023", "10"),
            rec("02-Jan-2023", ""),
            rec("03-Jan-2023", "12"),
            rec("04-Jan-2023", "9"),
        ];

        let first = analyze(&records, "31-Dec-2022", "05-Jan-2023")?;
        let second = analyze(&records, "31-Dec-2022", "05-Jan-2023")?;
        assert_eq!(first, second);
        Ok(())
    }

    #[test]
    fn unittest_validate_format() {
        assert!(validate_format("05-Jan-2023"));
        assert!(validate_format(" 05-Jan-2023 "));
        assert!(!validate_format("2023-01-05"));
        assert!(!validate_format("05-January-2023"));
        assert!(!validate_format(""));
    }
}
