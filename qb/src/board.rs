//! Board - one place that wires the controllers together
//!
//! All controllers share one gateway, one state container and one event bus.

use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::events::{EventBus, create_event_bus};
use crate::gateway::{Gateway, GatewayError, create_gateway};
use crate::jobs::{JobController, JobLimits};
use crate::state::StateManager;
use crate::stats::StatsMonitor;
use crate::tasks::TaskStore;

/// The wired-up client: task store, stats monitor and job controller
#[derive(Clone)]
pub struct Board {
    pub bus: Arc<EventBus>,
    pub state: StateManager,
    pub tasks: TaskStore,
    pub stats: StatsMonitor,
    pub jobs: JobController,
}

impl Board {
    pub fn new(gateway: Arc<dyn Gateway>, limits: JobLimits) -> Self {
        debug!(?limits, "Board::new: called");
        let bus = create_event_bus();
        let state = StateManager::new();
        let stats = StatsMonitor::new(gateway.clone(), state.clone(), bus.emitter());
        let tasks = TaskStore::new(gateway.clone(), state.clone(), bus.emitter(), stats.clone());
        let jobs = JobController::new(gateway, state.clone(), bus.emitter(), limits);
        Self {
            bus,
            state,
            tasks,
            stats,
            jobs,
        }
    }

    /// Board talking to the HTTP authority described by `config`
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        let gateway = create_gateway(config)?;
        Ok(Self::new(gateway, JobLimits::from(&config.analysis)))
    }
}
