pub mod config;
pub mod modules;

pub use modules::aggregator::controller::StationAggregator;
pub use modules::deleter::controller::BatchDeleter;
