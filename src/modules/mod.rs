pub mod conversion;
pub mod fixtures;
pub mod harness;
pub mod health;
pub mod polling;
