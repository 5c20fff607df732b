use serde::{Deserialize, Serialize};

/// One OHLC bar. `timestamp` is seconds since the epoch and marks the bar's opening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    #[serde(rename = "time", alias = "timestamp")]
    pub timestamp: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A candle covering a contiguous window of base candles.
pub type AggregatedCandle = Candle;

impl Candle {
    pub fn new(timestamp: u64, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.open
    }

    /// Extend this candle with the next candle of the same window.
    pub fn absorb(&mut self, next: &Candle) {
        self.high = self.high.max(next.high);
        self.low = self.low.min(next.low);
        self.close = next.close;
    }

    /// Reduce a window to a single candle: first open and timestamp, last close,
    /// max high, min low. `None` for an empty window.
    pub fn from_window(window: &[Candle]) -> Option<AggregatedCandle> {
        let (first, rest) = window.split_first()?;
        let mut merged = *first;
        for candle in rest {
            merged.absorb(candle);
        }
        Some(merged)
    }
}
