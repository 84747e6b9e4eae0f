pub mod breakdown;
pub mod config;
pub mod input;
pub mod profile;
