use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};

use crate::error::ChartError;
use crate::model::candle::Candle;
use crate::model::raw_record::{RawPrice, RawRecord};

const TIME_FORMATS: [&str; 3] = ["%H:%M:%S", "%H:%M:%S%.f", "%H:%M"];

/// Turns raw export rows into the canonical base series.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    offset: FixedOffset,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self { offset: Utc.fix() }
    }
}

impl Normalizer {
    /// Interpret record wall-clock times at `offset` (e.g. broker server time).
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// All-or-nothing: the first bad record fails the whole call. Input order is kept.
    pub fn normalize(&self, records: &[RawRecord]) -> Result<Vec<Candle>, ChartError> {
        let candles = records
            .iter()
            .enumerate()
            .map(|(index, record)| self.normalize_record(index, record))
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            records = candles.len(),
            offset = %self.offset,
            "Normalized base series"
        );
        Ok(candles)
    }

    fn normalize_record(&self, index: usize, record: &RawRecord) -> Result<Candle, ChartError> {
        let timestamp = self.parse_timestamp(index, &record.date, &record.time)?;
        Ok(Candle {
            timestamp,
            open: parse_price(index, "open", &record.open)?,
            high: parse_price(index, "high", &record.high)?,
            low: parse_price(index, "low", &record.low)?,
            close: parse_price(index, "close", &record.close)?,
        })
    }

    fn parse_timestamp(&self, index: usize, date: &str, time: &str) -> Result<u64, ChartError> {
        let date_str = date.trim().replace(['.', '/'], "-");
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|e| ChartError::malformed(index, format!("invalid date '{}': {}", date_str, e)))?;

        let time_str = time.trim();
        let time = TIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveTime::parse_from_str(time_str, fmt).ok())
            .ok_or_else(|| ChartError::malformed(index, format!("invalid time '{}'", time_str)))?;

        let local = NaiveDateTime::new(date, time);
        let instant = self
            .offset
            .from_local_datetime(&local)
            .single()
            .ok_or_else(|| {
                ChartError::malformed(index, format!("instant {} is out of range", local))
            })?;

        // `timestamp()` floors to whole seconds, dropping any fraction.
        u64::try_from(instant.timestamp()).map_err(|_| {
            ChartError::malformed(index, format!("instant {} is before the epoch", instant))
        })
    }
}

/// Normalize with times read as UTC.
pub fn normalize(records: &[RawRecord]) -> Result<Vec<Candle>, ChartError> {
    Normalizer::default().normalize(records)
}

fn parse_price(index: usize, field: &str, value: &RawPrice) -> Result<f64, ChartError> {
    value.to_f64().ok_or_else(|| match value {
        RawPrice::Missing => ChartError::malformed(index, format!("{} is missing", field)),
        other => ChartError::malformed(index, format!("{} is not numeric: {:?}", field, other)),
    })
}
