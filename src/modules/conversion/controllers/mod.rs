pub mod convert_controller;

pub use convert_controller::{configure, convert_file};
