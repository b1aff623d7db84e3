//! Completion poller for waiting on asynchronous backend jobs

pub mod poller;

pub use poller::{
    wait_until, CheckErrorPolicy, PollEvent, PollOptions, PollOutcome, PollState, Poller,
    DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT,
};
