pub mod aggregator;
pub mod config;
pub mod error;
pub mod model;
pub mod normalizer;
pub mod series;
pub mod source;
