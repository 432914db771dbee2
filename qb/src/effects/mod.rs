//! Side effects: celebrations, audio cues, notifications
//!
//! Pure reactions to domain events. Nothing in here feeds back into task,
//! stats or job state.

mod dispatcher;
mod effect;
mod sound;
mod terminal;

pub use dispatcher::{Presenter, SideEffectDispatcher, dispatch};
pub use effect::{Celebration, Effect, Notification, NotificationLevel, effects_for};
pub use sound::{CueKind, SoundEffect, sound_effect};
pub use terminal::{TerminalPresenter, render_celebration, render_notification};
