pub mod config;
pub mod cues;
pub mod runner;
