// src/process/mod.rs

pub mod clean;
pub mod utils;

pub use clean::clean;
