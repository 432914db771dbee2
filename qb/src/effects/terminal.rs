//! Terminal presenter used by the `qb` binary

use std::io::Write;

use colored::*;
use tracing::debug;

use super::dispatcher::Presenter;
use super::effect::{Celebration, Notification, NotificationLevel};
use super::sound::SoundEffect;

/// Prints notifications and celebrations; rings the bell for audio cues
#[derive(Debug, Clone, Default)]
pub struct TerminalPresenter {
    /// Emit BEL for audio cues
    pub bell: bool,
}

impl TerminalPresenter {
    pub fn new(bell: bool) -> Self {
        Self { bell }
    }
}

/// One-line rendering of a notification
pub fn render_notification(notification: &Notification) -> String {
    match notification.level {
        NotificationLevel::Info => format!("{} {}", "•".blue(), notification.message),
        NotificationLevel::Success => format!("{} {}", "✓".green(), notification.message),
        NotificationLevel::Error => format!("{} {}", "✗".red(), notification.message.red()),
    }
}

pub fn render_celebration(celebration: &Celebration) -> String {
    match celebration {
        Celebration::TaskDone { title } => format!("{} {} {}", "★".yellow(), "Quest complete:".bold(), title),
        Celebration::LevelUp { level, title } => format!(
            "{} {} {}",
            "★ ★ ★".yellow(),
            format!("LEVEL {}", level).bold().magenta(),
            title.cyan()
        ),
    }
}

impl Presenter for TerminalPresenter {
    fn celebrate(&self, celebration: &Celebration) {
        println!("{}", render_celebration(celebration));
    }

    fn play(&self, sound: &SoundEffect) {
        debug!(cue = ?sound.cue, frequency_hz = sound.frequency_hz, "TerminalPresenter::play");
        if self.bell {
            let mut stdout = std::io::stdout();
            let _ = stdout.write_all(b"\x07");
            let _ = stdout.flush();
        }
    }

    fn notify(&self, notification: &Notification) {
        match notification.level {
            NotificationLevel::Error => eprintln!("{}", render_notification(notification)),
            _ => println!("{}", render_notification(notification)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_message() {
        colored::control::set_override(false);
        assert_eq!(render_notification(&Notification::success("Added 'x'")), "✓ Added 'x'");
        assert_eq!(render_notification(&Notification::error("boom")), "✗ boom");
        assert_eq!(
            render_celebration(&Celebration::LevelUp {
                level: 3,
                title: "Adept".to_string()
            }),
            "★ ★ ★ LEVEL 3 Adept"
        );
    }
}
