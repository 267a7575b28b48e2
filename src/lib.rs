pub mod analyzers;
pub mod chart;
pub mod config;
pub mod enrich;
pub mod error;
pub mod fetch;
pub mod mock;
pub mod model;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod source;
pub mod stats;
