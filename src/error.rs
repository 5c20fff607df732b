use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("malformed record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("unknown timeframe '{0}'")]
    UnknownTimeframe(String),

    #[error("invalid timeframe table: {0}")]
    InvalidTimeframeTable(String),
}

impl ChartError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            index,
            reason: reason.into(),
        }
    }
}
