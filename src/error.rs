use thiserror::Error;

/// Failures of the analysis core. The loader and binary wrap these in
/// `eyre::Result` at their seams.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A date or price string did not parse.
    #[error("format error: cannot parse {kind} {text:?}")]
    Format { kind: &'static str, text: String },

    /// An absent price had no earlier observation to fill from. The series
    /// contract requires the first observation by date to carry a price.
    #[error("data integrity error: absent price on {date} has no predecessor")]
    DataIntegrity { date: chrono::NaiveDate },

    /// Sample statistics are undefined for fewer than two points.
    #[error("statistics error: need at least 2 data points, got {count}")]
    Statistics { count: usize },
}

impl AnalysisError {
    pub fn bad_date(text: &str) -> Self {
        AnalysisError::Format {
            kind: "date",
            text: text.to_owned(),
        }
    }

    pub fn bad_price(text: &str) -> Self {
        AnalysisError::Format {
            kind: "price",
            text: text.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AnalysisError;

    #[test]
    fn unittest_error_display() {
        let err = AnalysisError::bad_date("not-a-date");
        assert_eq!(err.to_string(), "format error: cannot parse date \"not-a-date\"");

        let err = AnalysisError::Statistics { count: 1 };
        assert_eq!(
            err.to_string(),
            "statistics error: need at least 2 data points, got 1"
        );
    }
}
