pub mod lifecycle;

pub use lifecycle::{CleanReport, LifecycleManager, SeedReport};
