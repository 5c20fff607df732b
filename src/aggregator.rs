use std::borrow::Cow;

use crate::error::ChartError;
use crate::model::candle::{AggregatedCandle, Candle};
use crate::model::timeframe::{Timeframe, TimeframeTable};

/// Collapse consecutive runs of `window` candles into one candle each.
///
/// Windows are counted from index 0. A trailing run shorter than `window` is an
/// open bucket and produces nothing. A zero window produces nothing.
pub fn group_candles(base: &[Candle], window: usize) -> Vec<AggregatedCandle> {
    if window == 0 {
        return Vec::new();
    }
    base.chunks_exact(window)
        .filter_map(Candle::from_window)
        .collect()
}

/// Aggregate `base` to the timeframe named `label` in `table`.
///
/// A window of 1 borrows `base` unchanged.
pub fn aggregate<'a>(
    base: &'a [Candle],
    label: &str,
    table: &TimeframeTable,
) -> Result<Cow<'a, [Candle]>, ChartError> {
    let window = table.window_size(label)?;
    if window == 1 {
        return Ok(Cow::Borrowed(base));
    }

    let grouped = group_candles(base, window);
    tracing::debug!(
        timeframe = label,
        window,
        base = base.len(),
        aggregated = grouped.len(),
        discarded = base.len() % window,
        "Aggregated candles"
    );
    Ok(Cow::Owned(grouped))
}

/// [`aggregate`] over the standard 5m/15m/1h table.
pub fn aggregate_timeframe(
    base: &[Candle],
    timeframe: Timeframe,
) -> Result<Cow<'_, [Candle]>, ChartError> {
    aggregate(base, timeframe.label(), &TimeframeTable::standard())
}

/// The price a chart header shows: close of the newest candle, if any.
pub fn last_price(candles: &[Candle]) -> Option<f64> {
    candles.last().map(|c| c.close)
}
