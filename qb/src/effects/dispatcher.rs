//! SideEffectDispatcher - turns domain events into presentation effects
//!
//! Runs as a background task reading the event bus. Controllers emit and move
//! on; nothing here can delay or fail a domain operation.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::effect::{Celebration, Effect, Notification, effects_for};
use super::sound::{SoundEffect, sound_effect};
use crate::events::{Event, EventBus};

/// Presentation capability
///
/// Calls are made from the dispatcher task and must return quickly.
pub trait Presenter: Send + Sync {
    fn celebrate(&self, celebration: &Celebration);
    fn play(&self, sound: &SoundEffect);
    fn notify(&self, notification: &Notification);
}

/// Handle to the running dispatcher task
pub struct SideEffectDispatcher {
    shutdown: CancellationToken,
    handle: JoinHandle<()>,
}

impl SideEffectDispatcher {
    /// Subscribe to `bus` and start dispatching to `presenter`
    ///
    /// Events emitted after this returns are guaranteed to be seen.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(bus: &EventBus, presenter: Arc<dyn Presenter>) -> Self {
        debug!("SideEffectDispatcher::spawn: called");
        let rx = bus.subscribe();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(run(rx, presenter, shutdown.clone()));
        Self { shutdown, handle }
    }

    /// Stop after presenting whatever is already queued
    pub async fn shutdown(self) {
        debug!("SideEffectDispatcher::shutdown: called");
        self.shutdown.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "SideEffectDispatcher: task ended abnormally");
        }
    }
}

async fn run(mut rx: broadcast::Receiver<Event>, presenter: Arc<dyn Presenter>, shutdown: CancellationToken) {
    debug!("SideEffectDispatcher::run: starting");
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                // Drain what was emitted before shutdown
                while let Ok(event) = rx.try_recv() {
                    dispatch(presenter.as_ref(), &event);
                }
                debug!("SideEffectDispatcher: shutdown requested");
                break;
            }
            received = rx.recv() => match received {
                Ok(event) => dispatch(presenter.as_ref(), &event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(missed = n, "SideEffectDispatcher: lagged behind, skipping events");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    debug!("SideEffectDispatcher: channel closed, shutting down");
                    break;
                }
            },
        }
    }
}

/// Apply every effect for one event, isolating presenter panics
pub fn dispatch(presenter: &dyn Presenter, event: &Event) {
    debug!(event_type = event.event_type(), job_id = ?event.job_id(), "dispatch: handling event");
    for effect in effects_for(event) {
        let applied = catch_unwind(AssertUnwindSafe(|| apply(presenter, &effect)));
        if applied.is_err() {
            warn!(event_type = event.event_type(), ?effect, "dispatch: presenter panicked");
        }
    }
}

fn apply(presenter: &dyn Presenter, effect: &Effect) {
    match effect {
        Effect::Celebrate(celebration) => presenter.celebrate(celebration),
        Effect::Play { cue } => presenter.play(&sound_effect(*cue)),
        Effect::Notify(notification) => presenter.notify(notification),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use crate::domain::TaskStatus;
    use crate::effects::{CueKind, NotificationLevel};
    use crate::events::CancelReason;

    #[derive(Default)]
    struct RecordingPresenter {
        log: Mutex<Vec<String>>,
        panic_on_celebrate: bool,
    }

    impl RecordingPresenter {
        fn entries(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    impl Presenter for RecordingPresenter {
        fn celebrate(&self, celebration: &Celebration) {
            if self.panic_on_celebrate {
                panic!("confetti cannon jammed");
            }
            self.log.lock().unwrap().push(format!("celebrate {:?}", celebration));
        }

        fn play(&self, sound: &SoundEffect) {
            self.log.lock().unwrap().push(format!("play {:?}", sound.cue));
        }

        fn notify(&self, notification: &Notification) {
            self.log
                .lock()
                .unwrap()
                .push(format!("notify {:?} {}", notification.level, notification.message));
        }
    }

    fn done_event() -> Event {
        Event::TaskStatusChanged {
            id: 1,
            title: "Write report".to_string(),
            from: TaskStatus::Doing,
            to: TaskStatus::Done,
        }
    }

    #[test]
    fn test_dispatch_applies_effects_in_order() {
        let presenter = RecordingPresenter::default();
        dispatch(&presenter, &done_event());
        assert_eq!(
            presenter.entries(),
            vec![
                "celebrate TaskDone { title: \"Write report\" }".to_string(),
                format!("play {:?}", CueKind::Success),
                format!("notify {:?} Completed 'Write report'", NotificationLevel::Success),
            ]
        );
    }

    #[test]
    fn test_panicking_presenter_is_contained() {
        let presenter = RecordingPresenter {
            panic_on_celebrate: true,
            ..Default::default()
        };
        dispatch(&presenter, &done_event());
        // Remaining effects still ran
        assert_eq!(presenter.entries().len(), 2);
    }

    #[tokio::test]
    async fn test_dispatcher_consumes_bus_until_shutdown() {
        let bus = EventBus::new(16);
        let presenter = Arc::new(RecordingPresenter::default());
        let dispatcher = SideEffectDispatcher::spawn(&bus, presenter.clone());

        let emitter = bus.emitter();
        emitter.job_cancelled(1, CancelReason::User);
        emitter.error("refresh stats", "down");
        dispatcher.shutdown().await;

        let entries = presenter.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], format!("play {:?}", CueKind::Cancel));
        assert!(entries[2].starts_with("notify Error Could not refresh stats"));
    }

    #[tokio::test]
    async fn test_dispatcher_stops_when_bus_closes() {
        let bus = EventBus::new(16);
        let presenter = Arc::new(RecordingPresenter::default());
        let dispatcher = SideEffectDispatcher::spawn(&bus, presenter);
        drop(bus);

        // Ends on its own once every sender is gone
        tokio::time::timeout(std::time::Duration::from_secs(1), dispatcher.handle)
            .await
            .unwrap()
            .unwrap();
    }
}
