//! Gamification stats tracking
//!
//! The authority computes level and EXP; the monitor only notices when the
//! level goes up.

mod monitor;

pub use monitor::StatsMonitor;
