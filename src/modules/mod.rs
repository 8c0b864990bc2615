pub mod aggregator;
pub mod deleter;
