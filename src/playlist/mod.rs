pub mod config;
pub mod content;
pub mod curator;
pub mod day;
pub mod filters;
pub mod generator;
pub mod genres;
pub mod metadata;
pub mod timeline;

#[cfg(test)]
mod config_tests;

pub use config::*;
pub use generator::*;
pub use metadata::*;
