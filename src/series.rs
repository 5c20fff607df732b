use serde::Serialize;

use crate::aggregator::{aggregate, last_price};
use crate::error::ChartError;
use crate::model::candle::Candle;
use crate::model::timeframe::TimeframeTable;

/// Payload handed to a candlestick renderer for one timeframe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesUpdate {
    pub timeframe: String,
    pub candles: Vec<Candle>,
    /// `None` until at least one complete candle exists; render a placeholder then.
    pub last_price: Option<f64>,
}

impl SeriesUpdate {
    pub fn build(base: &[Candle], label: &str, table: &TimeframeTable) -> Result<Self, ChartError> {
        let candles = aggregate(base, label, table)?.into_owned();
        let last_price = last_price(&candles);
        Ok(Self {
            timeframe: label.to_string(),
            candles,
            last_price,
        })
    }

    pub fn is_loading(&self) -> bool {
        self.last_price.is_none()
    }
}

/// One update per configured timeframe, in table order.
pub fn build_all(base: &[Candle], table: &TimeframeTable) -> Result<Vec<SeriesUpdate>, ChartError> {
    table
        .labels()
        .map(|label| SeriesUpdate::build(base, label, table))
        .collect()
}
