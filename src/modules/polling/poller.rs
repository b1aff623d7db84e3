use crate::core::{AppError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep_until, timeout_at, Instant};
use tracing::{debug, trace, warn};

pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(30_000);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1_000);

/// Stand-in for a deadline that does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// What to do when the check itself returns an error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckErrorPolicy {
    /// Stop immediately and hand the error to the caller
    #[default]
    Propagate,
    /// Treat the error like a `false` result and keep polling
    RetryAsFalse,
}

#[derive(Debug, Clone)]
pub struct PollOptions {
    pub timeout: Duration,
    pub interval: Duration,
    /// Diagnostic carried by the timeout error
    pub error_msg: String,
    pub on_check_error: CheckErrorPolicy,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_POLL_TIMEOUT,
            interval: DEFAULT_POLL_INTERVAL,
            error_msg: "Timed out waiting for condition".to_string(),
            on_check_error: CheckErrorPolicy::Propagate,
        }
    }
}

impl PollOptions {
    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self {
            timeout,
            interval,
            ..Self::default()
        }
    }

    pub fn with_message(mut self, error_msg: impl Into<String>) -> Self {
        self.error_msg = error_msg.into();
        self
    }

    pub fn with_check_error_policy(mut self, policy: CheckErrorPolicy) -> Self {
        self.on_check_error = policy;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Checking,
    Waiting,
    Succeeded,
    TimedOut,
    Failed,
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PollState::Succeeded | PollState::TimedOut | PollState::Failed
        )
    }
}

/// Inputs that drive the state machine
#[derive(Debug)]
pub enum PollEvent {
    CheckReturned(bool),
    CheckErrored(AppError),
    /// The check was still running when the deadline passed
    CheckCutOff,
    /// A wait finished at the given instant
    WaitElapsed(Instant),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Bounded retry of an asynchronous condition
///
/// The first check runs immediately, later checks are spaced by the interval,
/// and nothing is scheduled once the deadline has passed.
#[derive(Debug)]
pub struct Poller {
    options: PollOptions,
    started: Instant,
    deadline: Instant,
    attempts: u32,
    state: PollState,
    failure: Option<AppError>,
}

impl Poller {
    pub fn new(options: PollOptions) -> Self {
        Self::starting_at(options, Instant::now())
    }

    pub fn starting_at(options: PollOptions, started: Instant) -> Self {
        let deadline = started
            .checked_add(options.timeout)
            .unwrap_or_else(|| started + FAR_FUTURE);
        Self {
            options,
            started,
            deadline,
            attempts: 0,
            state: PollState::Checking,
            failure: None,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// When the next check may start, given that a wait begins at `now`
    pub fn next_wake(&self, now: Instant) -> Instant {
        now.checked_add(self.options.interval)
            .map_or(self.deadline, |wake| wake.min(self.deadline))
    }

    /// Apply one event; events arriving in a terminal state are ignored
    pub fn transition(&mut self, event: PollEvent) -> PollState {
        if self.state.is_terminal() {
            return self.state;
        }

        let next = match (self.state, event) {
            (PollState::Checking, PollEvent::CheckReturned(true)) => PollState::Succeeded,
            (PollState::Checking, PollEvent::CheckReturned(false)) => PollState::Waiting,
            (PollState::Checking, PollEvent::CheckErrored(err)) => match self.options.on_check_error {
                CheckErrorPolicy::Propagate => {
                    self.failure = Some(err);
                    PollState::Failed
                }
                CheckErrorPolicy::RetryAsFalse => {
                    warn!(attempt = self.attempts, error = %err, "Poll check failed, retrying");
                    PollState::Waiting
                }
            },
            (PollState::Checking, PollEvent::CheckCutOff) => PollState::TimedOut,
            (PollState::Waiting, PollEvent::WaitElapsed(now)) => {
                if now >= self.deadline {
                    PollState::TimedOut
                } else {
                    PollState::Checking
                }
            }
            (state, event) => {
                trace!(?state, ?event, "Ignoring event");
                state
            }
        };

        trace!(from = ?self.state, to = ?next, attempts = self.attempts, "Poll transition");
        self.state = next;
        next
    }

    /// Drive the machine to a terminal state
    pub async fn run<F, Fut>(mut self, mut check: F) -> Result<PollOutcome>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<bool>>,
    {
        loop {
            match self.state {
                PollState::Checking => {
                    self.attempts += 1;
                    let event = match timeout_at(self.deadline, check()).await {
                        Ok(Ok(ready)) => PollEvent::CheckReturned(ready),
                        Ok(Err(err)) => PollEvent::CheckErrored(err),
                        Err(_) => PollEvent::CheckCutOff,
                    };
                    self.transition(event);
                }
                PollState::Waiting => {
                    let now = Instant::now();
                    if now < self.deadline {
                        sleep_until(self.next_wake(now)).await;
                    }
                    self.transition(PollEvent::WaitElapsed(Instant::now()));
                }
                PollState::Succeeded => {
                    let outcome = PollOutcome {
                        attempts: self.attempts,
                        elapsed: self.started.elapsed(),
                    };
                    debug!(attempts = outcome.attempts, elapsed = ?outcome.elapsed, "Condition met");
                    return Ok(outcome);
                }
                PollState::TimedOut => {
                    let elapsed = self.started.elapsed();
                    debug!(attempts = self.attempts, ?elapsed, "Poll timed out");
                    return Err(AppError::PollTimeout {
                        message: self.options.error_msg.clone(),
                        attempts: self.attempts,
                        elapsed,
                    });
                }
                PollState::Failed => {
                    let source = self
                        .failure
                        .take()
                        .unwrap_or_else(|| AppError::internal("poll check failed"));
                    return Err(AppError::PredicateFailed {
                        attempts: self.attempts,
                        source: Box::new(source),
                    });
                }
            }
        }
    }
}

/// Poll `check` until it returns `true`, the timeout passes, or it errors
pub async fn wait_until<F, Fut>(options: PollOptions, check: F) -> Result<PollOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    Poller::new(options).run(check).await
}
