// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod record;
pub mod specs;

pub mod dedup;
pub mod progress;
pub mod runner;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "cli")]
pub mod log;
