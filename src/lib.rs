pub mod configuration;
pub mod grammar;
pub mod log;
pub mod persistence;
