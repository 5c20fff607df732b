use std::borrow::Cow;

use ohlc_timeframe::aggregator::{aggregate, aggregate_timeframe, group_candles, last_price};
use ohlc_timeframe::error::ChartError;
use ohlc_timeframe::model::candle::Candle;
use ohlc_timeframe::model::timeframe::{Timeframe, TimeframeSpec, TimeframeTable};

fn wavy_series(n: usize) -> Vec<Candle> {
    (0..n)
        .map(|i| {
            let mid = 2000.0 + ((i * 37) % 11) as f64 - 5.0;
            let open = mid - 0.25;
            let close = mid + if i % 2 == 0 { 0.5 } else { -0.5 };
            let high = open.max(close) + (i % 3) as f64 * 0.1 + 0.05;
            let low = open.min(close) - (i % 4) as f64 * 0.1 - 0.05;
            Candle::new(1_709_287_200 + i as u64 * 300, open, high, low, close)
        })
        .collect()
}

fn scenario_series() -> Vec<Candle> {
    let opens = [9.0, 10.0, 8.0, 14.0];
    let highs = [11.0, 13.0, 10.0, 16.0];
    let lows = [9.0, 11.0, 8.0, 14.0];
    let closes = [10.0, 12.0, 9.0, 15.0];
    (0..4)
        .map(|i| Candle::new(i as u64 * 300, opens[i], highs[i], lows[i], closes[i]))
        .collect()
}

#[test]
fn base_timeframe_is_identity() {
    let base = wavy_series(17);
    let out = aggregate(&base, "5m", &TimeframeTable::standard()).unwrap();
    assert_eq!(out.len(), base.len());
    for (a, b) in out.iter().zip(base.iter()) {
        assert_eq!(a, b);
    }
}

#[test]
fn window_count_law() {
    let table = TimeframeTable::standard();
    for n in [0usize, 1, 2, 3, 11, 12, 13, 24, 35, 100] {
        let base = wavy_series(n);
        for tf in Timeframe::all() {
            let out = aggregate(&base, tf.label(), &table).unwrap();
            assert_eq!(out.len(), n / tf.window(), "n={} tf={}", n, tf);
        }
    }
}

#[test]
fn field_reduction_over_each_window() {
    let base = wavy_series(36);
    let out = group_candles(&base, 12);
    assert_eq!(out.len(), 3);

    for (k, candle) in out.iter().enumerate() {
        let window = &base[k * 12..(k + 1) * 12];
        let max_high = window.iter().map(|c| c.high).fold(f64::NEG_INFINITY, f64::max);
        let min_low = window.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);

        assert_eq!(candle.timestamp, window[0].timestamp);
        assert!((candle.open - window[0].open).abs() < f64::EPSILON);
        assert!((candle.close - window[11].close).abs() < f64::EPSILON);
        assert!((candle.high - max_high).abs() < f64::EPSILON);
        assert!((candle.low - min_low).abs() < f64::EPSILON);
    }
}

#[test]
fn trailing_partial_window_is_discarded() {
    let base = wavy_series(4);
    let out = aggregate_timeframe(&base, Timeframe::Medium).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].timestamp, base[0].timestamp);
    assert!((out[0].close - base[2].close).abs() < f64::EPSILON);

    let base = wavy_series(13);
    assert_eq!(aggregate_timeframe(&base, Timeframe::Coarse).unwrap().len(), 1);
}

#[test]
fn fewer_candles_than_window_yields_nothing() {
    let base = wavy_series(11);
    let out = aggregate_timeframe(&base, Timeframe::Coarse).unwrap();
    assert!(out.is_empty());
    assert_eq!(last_price(&out), None);
}

#[test]
fn repeated_calls_are_identical() {
    let base = wavy_series(50);
    let table = TimeframeTable::standard();
    for tf in Timeframe::all() {
        let first = aggregate(&base, tf.label(), &table).unwrap().into_owned();
        let second = aggregate(&base, tf.label(), &table).unwrap().into_owned();
        assert_eq!(first, second);
    }
}

#[test]
fn empty_input_at_every_timeframe() {
    let table = TimeframeTable::standard();
    for label in table.labels() {
        let out = aggregate(&[], label, &table).unwrap();
        assert!(out.is_empty());
        assert_eq!(last_price(&out), None);
    }
}

#[test]
fn scenario_four_candles_window_three() {
    let base = scenario_series();
    let out = aggregate(&base, "15m", &TimeframeTable::standard()).unwrap();
    assert_eq!(out.len(), 1);

    let c = out[0];
    assert_eq!(c.timestamp, 0);
    assert!((c.open - 9.0).abs() < f64::EPSILON);
    assert!((c.high - 13.0).abs() < f64::EPSILON);
    assert!((c.low - 8.0).abs() < f64::EPSILON);
    assert!((c.close - 9.0).abs() < f64::EPSILON);
    assert_eq!(last_price(&out), Some(9.0));
}

#[test]
fn unknown_timeframe_fails_without_defaulting() {
    let base = scenario_series();
    let err = aggregate(&base, "30m", &TimeframeTable::standard()).unwrap_err();
    assert_eq!(err, ChartError::UnknownTimeframe("30m".to_string()));
}

#[test]
fn custom_table_adds_timeframe_without_touching_aggregation() {
    let table = TimeframeTable::new(vec![
        TimeframeSpec::new("1m", 1),
        TimeframeSpec::new("5m", 5),
        TimeframeSpec::new("30m", 30),
    ])
    .unwrap();
    let base = wavy_series(61);

    assert!(matches!(aggregate(&base, "1m", &table).unwrap(), Cow::Borrowed(_)));
    assert_eq!(aggregate(&base, "5m", &table).unwrap().len(), 12);
    assert_eq!(aggregate(&base, "30m", &table).unwrap().len(), 2);
    assert!(aggregate(&base, "15m", &table).is_err());
}

#[test]
fn windows_by_count_not_elapsed_time() {
    // Irregular spacing, e.g. a weekend gap, does not move window boundaries.
    let mut base = wavy_series(6);
    for c in base.iter_mut().skip(2) {
        c.timestamp += 2 * 86_400;
    }
    let out = group_candles(&base, 3);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].timestamp, base[0].timestamp);
    assert_eq!(out[1].timestamp, base[3].timestamp);
}

#[test]
fn concurrent_aggregation_shares_nothing() {
    let base = wavy_series(240);
    let table = TimeframeTable::standard();
    let expected: Vec<Vec<Candle>> = Timeframe::all()
        .iter()
        .map(|tf| aggregate(&base, tf.label(), &table).unwrap().into_owned())
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = Timeframe::all()
            .iter()
            .map(|tf| {
                let base = &base;
                let table = &table;
                scope.spawn(move || aggregate(base, tf.label(), table).unwrap().into_owned())
            })
            .collect();
        for (handle, want) in handles.into_iter().zip(expected.iter()) {
            assert_eq!(&handle.join().unwrap(), want);
        }
    });
}
