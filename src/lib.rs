pub mod chart;
pub mod config;
pub mod emit;
pub mod error;
pub mod process;
pub mod snapshot;
