pub mod candle;
pub mod raw_record;
pub mod timeframe;
