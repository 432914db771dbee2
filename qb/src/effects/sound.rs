//! One-shot audio cues
//!
//! Cues are described, not played: a presenter turns a [`SoundEffect`] into
//! sound however its platform allows. Nothing here keeps a handle to a
//! playing sound.

use std::time::Duration;

/// Category of audio feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueKind {
    /// Task done, level up, analysis complete
    Success,
    /// Task moved between non-final columns
    Routine,
    /// Job cancelled
    Cancel,
    /// Small add/remove feedback
    Pop,
}

/// A single tone to play once
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundEffect {
    pub cue: CueKind,
    pub frequency_hz: f32,
    pub duration: Duration,
    /// Linear gain, 0.0..=1.0
    pub gain: f32,
}

/// Describe the tone for a cue
pub fn sound_effect(cue: CueKind) -> SoundEffect {
    let (frequency_hz, millis, gain) = match cue {
        CueKind::Success => (880.0, 180, 0.30),
        CueKind::Routine => (523.25, 90, 0.20),
        CueKind::Cancel => (220.0, 160, 0.25),
        CueKind::Pop => (1200.0, 40, 0.15),
    };
    SoundEffect {
        cue,
        frequency_hz,
        duration: Duration::from_millis(millis),
        gain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cues_are_short_and_quiet() {
        for cue in [CueKind::Success, CueKind::Routine, CueKind::Cancel, CueKind::Pop] {
            let sound = sound_effect(cue);
            assert_eq!(sound.cue, cue);
            assert!(sound.duration <= Duration::from_millis(250));
            assert!(sound.gain > 0.0 && sound.gain <= 1.0);
        }
    }

    #[test]
    fn test_cancel_is_lower_than_success() {
        assert!(sound_effect(CueKind::Cancel).frequency_hz < sound_effect(CueKind::Success).frequency_hz);
    }
}
