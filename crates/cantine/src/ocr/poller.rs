//! Bounded status polling as an explicit state machine.
//!
//! ```text
//! Pending --poll--> Pending (attempts < max) --wait--> poll again
//!         --poll--> Completed | Failed
//!         --poll--> TimedOut  (attempts == max, still pending)
//! ```

use std::time::Duration;

use tracing::{debug, warn};

use super::clock::Clock;
use super::job::{ExtractionJob, JobStatus};
use super::OcrService;
use crate::error::OcrError;

/// One poll per second, at most sixty of them.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PollPolicy {
    /// Longest time a job can be waited on.
    pub fn ceiling(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Pending { attempts: u32 },
    Completed,
    Failed { reason: String },
    /// Attempt budget spent while the service still reported pending.
    TimedOut { attempts: u32 },
}

impl PollState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending { .. })
    }
}

pub struct JobPoller<'a, S: ?Sized, C: ?Sized> {
    service: &'a S,
    clock: &'a C,
    policy: PollPolicy,
}

impl<'a, S, C> JobPoller<'a, S, C>
where
    S: OcrService + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(service: &'a S, clock: &'a C, policy: PollPolicy) -> Self {
        Self {
            service,
            clock,
            policy,
        }
    }

    /// Issues at most one status request and moves the job accordingly.
    /// A job that already reached a terminal state is not polled again.
    pub fn step(&self, job: &mut ExtractionJob) -> Result<PollState, OcrError> {
        match job.status() {
            JobStatus::Completed => return Ok(PollState::Completed),
            JobStatus::Failed => {
                return Ok(PollState::Failed {
                    reason: job.failure().unwrap_or("unknown error").to_string(),
                })
            }
            JobStatus::Pending => {}
        }

        if job.attempts() >= self.policy.max_attempts {
            return Ok(self.time_out(job));
        }

        let response = self.service.poll(&job.document_id)?;
        job.record_attempt();

        match JobStatus::from_wire(&response.status) {
            JobStatus::Completed => {
                job.complete(response.documents);
                debug!(
                    document_id = %job.document_id,
                    attempts = job.attempts(),
                    "Extraction completed"
                );
                Ok(PollState::Completed)
            }
            JobStatus::Failed => {
                let reason = response
                    .error
                    .unwrap_or_else(|| "service reported failure".to_string());
                job.fail(reason.clone());
                Ok(PollState::Failed { reason })
            }
            JobStatus::Pending if job.attempts() >= self.policy.max_attempts => {
                Ok(self.time_out(job))
            }
            JobStatus::Pending => Ok(PollState::Pending {
                attempts: job.attempts(),
            }),
        }
    }

    /// Polls until the job reaches a terminal state, waiting one interval
    /// between requests. Blocks for at most the policy ceiling.
    pub fn run(&self, job: &mut ExtractionJob) -> Result<PollState, OcrError> {
        loop {
            let state = self.step(job)?;
            if state.is_terminal() {
                return Ok(state);
            }
            self.clock.sleep(self.policy.interval);
        }
    }

    fn time_out(&self, job: &mut ExtractionJob) -> PollState {
        let attempts = job.attempts();
        warn!(
            document_id = %job.document_id,
            attempts,
            "Extraction still pending after attempt budget"
        );
        job.fail(format!("timed out after {} polls", attempts));
        PollState::TimedOut { attempts }
    }
}
