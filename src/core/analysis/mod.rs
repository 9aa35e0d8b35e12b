pub mod aggregator;
pub mod baseline;
pub mod classifier;
pub mod dispatcher;
pub mod merger;
pub mod runner;
pub mod timeframe;
