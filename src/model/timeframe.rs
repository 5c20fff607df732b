use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// The chart timeframes offered for a 5-minute base series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "5m")]
    Base,
    #[serde(rename = "15m")]
    Medium,
    #[serde(rename = "1h")]
    Coarse,
}

impl Timeframe {
    pub fn label(&self) -> &'static str {
        match self {
            Timeframe::Base => "5m",
            Timeframe::Medium => "15m",
            Timeframe::Coarse => "1h",
        }
    }

    /// Number of base candles collapsed into one candle of this timeframe.
    pub fn window(&self) -> usize {
        match self {
            Timeframe::Base => 1,
            Timeframe::Medium => 3,
            Timeframe::Coarse => 12,
        }
    }

    pub fn all() -> &'static [Timeframe] {
        &[Timeframe::Base, Timeframe::Medium, Timeframe::Coarse]
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Timeframe {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::all()
            .iter()
            .copied()
            .find(|tf| tf.label() == s)
            .ok_or_else(|| ChartError::UnknownTimeframe(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeframeSpec {
    pub label: String,
    pub window: usize,
}

impl TimeframeSpec {
    pub fn new(label: impl Into<String>, window: usize) -> Self {
        Self {
            label: label.into(),
            window,
        }
    }
}

/// Label → window-size lookup. The aggregator only ever consults this table,
/// so adding a timeframe means adding an entry here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeframeTable {
    entries: Vec<TimeframeSpec>,
}

impl TimeframeTable {
    pub fn new(entries: Vec<TimeframeSpec>) -> Result<Self, ChartError> {
        if entries.is_empty() {
            return Err(ChartError::InvalidTimeframeTable(
                "at least one timeframe is required".to_string(),
            ));
        }
        for (i, entry) in entries.iter().enumerate() {
            if entry.label.trim().is_empty() {
                return Err(ChartError::InvalidTimeframeTable(format!(
                    "entry {} has an empty label",
                    i
                )));
            }
            if entry.window == 0 {
                return Err(ChartError::InvalidTimeframeTable(format!(
                    "timeframe '{}' has a zero window",
                    entry.label
                )));
            }
            if entries[..i].iter().any(|e| e.label == entry.label) {
                return Err(ChartError::InvalidTimeframeTable(format!(
                    "duplicate timeframe '{}'",
                    entry.label
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Base / 3x / 12x, labelled for a 5-minute base series.
    pub fn standard() -> Self {
        Self {
            entries: Timeframe::all()
                .iter()
                .map(|tf| TimeframeSpec::new(tf.label(), tf.window()))
                .collect(),
        }
    }

    pub fn window_size(&self, label: &str) -> Result<usize, ChartError> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.window)
            .ok_or_else(|| ChartError::UnknownTimeframe(label.to_string()))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.iter().any(|e| e.label == label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.label.as_str())
    }

    pub fn entries(&self) -> &[TimeframeSpec] {
        &self.entries
    }
}

impl Default for TimeframeTable {
    fn default() -> Self {
        Self::standard()
    }
}
