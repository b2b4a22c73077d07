pub mod chain;
pub mod codec;
pub mod config;
pub mod error;
pub mod heuristics;
pub mod report;
