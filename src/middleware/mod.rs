pub mod fault_barrier;

pub use fault_barrier::FaultBarrier;
