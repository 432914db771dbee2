//! JobController - single-flight, cancellable analysis runs
//!
//! Each job is bound to its own `CancellationToken`. The controller keeps a
//! pointer to the one active job; a response is applied only if its job is
//! still the one the pointer references when the response lands.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::JobError;
use crate::config::AnalysisConfig;
use crate::domain::{AnalysisMode, AnalysisRequest, AnalysisResponse, AnalysisResult, AudioInput, JobId, SummaryLevel};
use crate::events::{CancelReason, EventEmitter};
use crate::gateway::{Gateway, GatewayError};
use crate::state::{JobState, JobView, StateManager};

/// Bounds applied to every job
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobLimits {
    /// Upper bound on one analysis request
    pub timeout: Duration,
    /// Largest accepted audio payload in bytes
    pub max_upload_bytes: usize,
}

impl Default for JobLimits {
    fn default() -> Self {
        Self::from(&AnalysisConfig::default())
    }
}

impl From<&AnalysisConfig> for JobLimits {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            max_upload_bytes: config.max_upload_bytes(),
        }
    }
}

/// How a job ended, as seen by whoever started it
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Succeeded(AnalysisResult),
    Failed(String),
    /// Revoked before a response arrived
    Cancelled,
    /// A response arrived after the job was revoked and was dropped
    Discarded,
}

/// Handle returned by [`JobController::start`]
#[derive(Debug)]
pub struct JobTicket {
    pub id: JobId,
    rx: oneshot::Receiver<JobOutcome>,
}

impl JobTicket {
    /// Wait for the job to settle
    pub async fn outcome(self) -> JobOutcome {
        match self.rx.await {
            Ok(outcome) => outcome,
            Err(_) => JobOutcome::Failed("Job task ended without reporting an outcome".to_string()),
        }
    }
}

struct ActiveJob {
    id: JobId,
    token: CancellationToken,
}

struct Inner {
    gateway: Arc<dyn Gateway>,
    state: StateManager,
    events: EventEmitter,
    limits: JobLimits,
    next_id: AtomicU64,
    // Job view writes happen under this lock so they follow pointer order
    active: Mutex<Option<ActiveJob>>,
}

/// Owner of the analysis job slot
#[derive(Clone)]
pub struct JobController {
    inner: Arc<Inner>,
}

impl JobController {
    pub fn new(gateway: Arc<dyn Gateway>, state: StateManager, events: EventEmitter, limits: JobLimits) -> Self {
        debug!(?limits, "JobController::new: called");
        Self {
            inner: Arc::new(Inner {
                gateway,
                state,
                events,
                limits,
                next_id: AtomicU64::new(1),
                active: Mutex::new(None),
            }),
        }
    }

    /// Start a new analysis, superseding any running one
    ///
    /// Input is validated first; a rejected input leaves the running job
    /// alone.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime; the request runs on a
    /// spawned task.
    pub fn start(&self, audio: AudioInput, mode: AnalysisMode, summary_level: SummaryLevel) -> Result<JobTicket, JobError> {
        debug!(?audio, %mode, %summary_level, "start: called");
        if let Err(e) = self.inner.validate(&audio) {
            self.inner.events.error("analyze", &e.to_string());
            return Err(e);
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        let token = CancellationToken::new();
        let file_name = audio.file_name.clone();

        let superseded = {
            let mut active = self.inner.lock_active();
            let previous = active.replace(ActiveJob {
                id,
                token: token.clone(),
            });
            if let Some(prev) = &previous {
                prev.token.cancel();
            }
            self.inner.state.modify(|s| {
                let job = &mut s.job;
                job.job_id = Some(id);
                job.state = JobState::Running;
                job.file_name = Some(file_name.clone());
                job.mode = mode;
                job.summary_level = summary_level;
                job.error = None;
                true
            });
            previous.map(|p| p.id)
        };

        if let Some(prev_id) = superseded {
            info!(%prev_id, %id, "start: superseded running job");
            self.inner.events.job_cancelled(prev_id, CancelReason::Superseded);
        }
        info!(%id, %file_name, %mode, "start: job running");
        self.inner.events.job_started(id, &file_name, mode);

        let request = AnalysisRequest {
            audio,
            mode,
            summary_level,
        };
        let (tx, rx) = oneshot::channel();
        let inner = self.inner.clone();
        tokio::spawn(async move {
            let outcome = inner.run(id, token, request).await;
            let _ = tx.send(outcome);
        });

        Ok(JobTicket { id, rx })
    }

    /// Cancel the running job; returns false when nothing was running
    pub fn cancel(&self) -> bool {
        debug!("cancel: called");
        let cancelled = {
            let mut active = self.inner.lock_active();
            let Some(job) = active.take() else {
                debug!("cancel: no running job");
                return false;
            };
            job.token.cancel();
            self.inner.state.modify(|s| {
                if s.job.job_id != Some(job.id) || s.job.state != JobState::Running {
                    return false;
                }
                s.job.state = JobState::Cancelled;
                true
            });
            job.id
        };

        info!(id = %cancelled, "cancel: job cancelled");
        self.inner.events.job_cancelled(cancelled, CancelReason::User);
        true
    }

    /// Return the job slot to idle, dropping the last result and error
    ///
    /// Refused while a job is running.
    pub fn reset(&self) -> bool {
        debug!("reset: called");
        let active = self.inner.lock_active();
        if active.is_some() {
            debug!("reset: job running, ignoring");
            return false;
        }
        self.inner.state.modify(|s| {
            let changed = s.job != JobView::default();
            s.job = JobView::default();
            changed
        });
        true
    }

    pub fn is_running(&self) -> bool {
        self.inner.lock_active().is_some()
    }

    /// Id of the running job, if any
    pub fn current_job(&self) -> Option<JobId> {
        self.inner.lock_active().as_ref().map(|job| job.id)
    }
}

impl Inner {
    fn lock_active(&self) -> MutexGuard<'_, Option<ActiveJob>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn validate(&self, audio: &AudioInput) -> Result<(), JobError> {
        if audio.is_empty() {
            return Err(JobError::Validation(format!("Audio file '{}' is empty", audio.file_name)));
        }
        if audio.len() > self.limits.max_upload_bytes {
            return Err(JobError::PayloadTooLarge {
                size: audio.len(),
                limit: self.limits.max_upload_bytes,
            });
        }
        Ok(())
    }

    async fn run(&self, id: JobId, token: CancellationToken, request: AnalysisRequest) -> JobOutcome {
        debug!(%id, "run: called");
        let timeout = self.limits.timeout;
        let response = tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!(%id, "run: revoked before response");
                return JobOutcome::Cancelled;
            }
            res = tokio::time::timeout(timeout, self.gateway.analyze(request)) => match res {
                Ok(res) => res,
                Err(_) => Err(GatewayError::Timeout(timeout)),
            },
        };
        self.finish(id, response)
    }

    /// Apply a settled response if `id` is still the active job
    fn finish(&self, id: JobId, response: Result<AnalysisResponse, GatewayError>) -> JobOutcome {
        let mut active = self.lock_active();
        if active.as_ref().map(|job| job.id) != Some(id) {
            debug!(%id, ok = response.is_ok(), "finish: stale response discarded");
            return JobOutcome::Discarded;
        }
        *active = None;

        match response {
            Ok(response) => {
                let result = AnalysisResult::from(response);
                self.state.modify(|s| {
                    s.job.state = JobState::Succeeded;
                    s.job.result = Some(result.clone());
                    s.job.error = None;
                    true
                });
                drop(active);
                info!(%id, action_items = result.action_items.len(), "finish: job succeeded");
                self.events.job_succeeded(id, result.action_items.len());
                JobOutcome::Succeeded(result)
            }
            Err(e) => {
                let message = e.to_string();
                self.state.modify(|s| {
                    s.job.state = JobState::Failed;
                    s.job.error = Some(message.clone());
                    true
                });
                drop(active);
                warn!(%id, error = %message, "finish: job failed");
                self.events.job_failed(id, &message);
                JobOutcome::Failed(message)
            }
        }
    }
}
