//! Presentation effects and the event-to-effect mapping

use super::sound::CueKind;
use crate::domain::TaskStatus;
use crate::events::{CancelReason, Event};

/// Celebratory animation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Celebration {
    TaskDone { title: String },
    LevelUp { level: u32, title: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Error,
}

/// Transient message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// One presentation action
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Celebrate(Celebration),
    Play { cue: CueKind },
    Notify(Notification),
}

/// Fixed presentation response to a domain event
pub fn effects_for(event: &Event) -> Vec<Effect> {
    match event {
        Event::TaskCreated { task } => vec![
            Effect::Play { cue: CueKind::Pop },
            Effect::Notify(Notification::success(format!(
                "Added '{}' (+{} EXP when done)",
                task.title, task.exp
            ))),
        ],
        Event::TaskStatusChanged {
            title,
            to: TaskStatus::Done,
            ..
        } => vec![
            Effect::Celebrate(Celebration::TaskDone { title: title.clone() }),
            Effect::Play { cue: CueKind::Success },
            Effect::Notify(Notification::success(format!("Completed '{}'", title))),
        ],
        Event::TaskStatusChanged { title, to, .. } => vec![
            Effect::Play { cue: CueKind::Routine },
            Effect::Notify(Notification::info(format!("Moved '{}' to {}", title, to))),
        ],
        Event::TaskDeleted { title, .. } => vec![
            Effect::Play { cue: CueKind::Pop },
            Effect::Notify(Notification::info(format!("Deleted '{}'", title))),
        ],
        Event::LevelUp { level, title } => vec![
            Effect::Celebrate(Celebration::LevelUp {
                level: *level,
                title: title.clone(),
            }),
            Effect::Play { cue: CueKind::Success },
            Effect::Notify(Notification::success(format!("Level up! Level {} - {}", level, title))),
        ],
        Event::JobStarted { file_name, mode, .. } => {
            vec![Effect::Notify(Notification::info(format!("Analyzing '{}' ({})", file_name, mode)))]
        }
        Event::JobSucceeded { action_items, .. } => vec![
            Effect::Play { cue: CueKind::Success },
            Effect::Notify(Notification::success(format!(
                "Analysis complete: {} action item(s)",
                action_items
            ))),
        ],
        Event::JobCancelled { reason, .. } => {
            let message = match reason {
                CancelReason::User => "Analysis cancelled",
                CancelReason::Superseded => "Previous analysis replaced by a new one",
            };
            vec![Effect::Play { cue: CueKind::Cancel }, Effect::Notify(Notification::info(message))]
        }
        Event::JobFailed { message, .. } => {
            vec![Effect::Notify(Notification::error(format!("Analysis failed: {}", message)))]
        }
        Event::Error { context, message } => {
            vec![Effect::Notify(Notification::error(format!("Could not {}: {}", context, message)))]
        }
    }
}
