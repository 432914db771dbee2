//! StatsMonitor - level/EXP tracking and level-up detection

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::UserStats;
use crate::events::EventEmitter;
use crate::gateway::{Gateway, GatewayError};
use crate::state::{StateManager, StatsSwap};

/// Fetches stats from the authority and announces level transitions
///
/// The only state is the held stats snapshot in the [`StateManager`].
#[derive(Clone)]
pub struct StatsMonitor {
    gateway: Arc<dyn Gateway>,
    state: StateManager,
    events: EventEmitter,
}

impl StatsMonitor {
    pub fn new(gateway: Arc<dyn Gateway>, state: StateManager, events: EventEmitter) -> Self {
        Self { gateway, state, events }
    }

    /// Held stats, if any fetch has succeeded yet
    pub fn current(&self) -> Option<UserStats> {
        self.state.stats()
    }

    /// Fetch current stats and emit `LevelUp` on a strict level increase
    ///
    /// The first fetch only establishes the baseline. Each fetch takes an
    /// issue number before the request goes out; a response that lands after
    /// one from a later fetch is dropped, so a slow reply cannot roll the held
    /// level back and re-announce the same transition.
    pub async fn refresh(&self) -> Result<UserStats, GatewayError> {
        let seq = self.state.issue_stats_fetch();
        debug!(seq, "refresh: called");
        let stats = self.gateway.fetch_stats().await?;

        match self.state.swap_stats(seq, stats.clone()) {
            StatsSwap::Replaced(prev) if stats.level > prev.level => {
                info!(from = prev.level, to = stats.level, title = %stats.title, "refresh: level up");
                self.events.level_up(stats.level, &stats.title);
            }
            StatsSwap::Replaced(prev) => {
                debug!(held = prev.level, fetched = stats.level, "refresh: no level change");
            }
            StatsSwap::Baseline => {
                debug!(level = stats.level, "refresh: baseline established");
            }
            StatsSwap::Stale => {
                debug!(seq, level = stats.level, "refresh: newer stats already held, dropping");
                return Ok(self.current().unwrap_or(stats));
            }
        }

        Ok(stats)
    }
}
