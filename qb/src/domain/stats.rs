//! Gamification stats as computed by the authority

use serde::{Deserialize, Serialize};

/// Level/EXP snapshot. The leveling formula lives on the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    /// Current level (starts at 1)
    pub level: u32,

    /// EXP accumulated from done tasks
    pub total_exp: u64,

    /// EXP required to reach the next level
    pub next_level_exp_req: i64,

    /// Progress toward the next level, 0..100
    pub progress_percentage: f64,

    /// Rank name for the current level
    #[serde(default)]
    pub title: String,
}

impl UserStats {
    /// Progress clamped into 0..=100 for rendering a bar
    pub fn progress(&self) -> f64 {
        self.progress_percentage.clamp(0.0, 100.0)
    }
}
