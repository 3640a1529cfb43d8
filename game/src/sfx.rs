use std::time::Duration;

use engine::audio::{Tone, Waveform};

/// Shared SFX volume constants (0.0..=1.0), validated by tests.
pub const MOVE_SFX_VOLUME: f32 = 0.5;
pub const WIN_SFX_VOLUME: f32 = 0.7;
pub const TIMEOUT_SFX_VOLUME: f32 = 0.7;

/// Background music volume. Kept low so it sits under the gameplay SFX.
pub const MUSIC_VOLUME: f32 = 0.3;

/// Discrete audio triggers emitted by the update phase. The frontend reacts
/// to them; the game never blocks on audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    Move,
    Win,
    Timeout,
    MusicPause,
    MusicResume,
    MusicStop,
    MusicLoopStart,
}

/// Short blip for a successful move or undo.
pub fn move_tone() -> Tone {
    Tone::new(660.0, Duration::from_millis(70)).with_gain(0.8)
}

/// Ascending arpeggio for a completed level.
pub fn win_tones() -> Vec<Tone> {
    [523.25, 659.25, 783.99, 1046.5]
        .into_iter()
        .map(|hz| Tone::new(hz, Duration::from_millis(140)).with_gain(0.8))
        .collect()
}

/// Low double buzz for running out of time.
pub fn timeout_tones() -> Vec<Tone> {
    [196.0, 147.0]
        .into_iter()
        .map(|hz| {
            Tone::new(hz, Duration::from_millis(260))
                .with_waveform(Waveform::Square)
                .with_gain(0.5)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volumes_are_normalized() {
        for v in [
            MOVE_SFX_VOLUME,
            WIN_SFX_VOLUME,
            TIMEOUT_SFX_VOLUME,
            MUSIC_VOLUME,
        ] {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn music_sits_under_the_sfx() {
        assert!(MUSIC_VOLUME < MOVE_SFX_VOLUME);
        assert!(MUSIC_VOLUME < WIN_SFX_VOLUME);
    }
}
