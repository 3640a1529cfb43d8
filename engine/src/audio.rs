//! Audio output with synthesized sources.
//!
//! Sounds are generated, not loaded: the game ships no audio assets, and a
//! missing output device degrades to silence instead of failing startup.

use std::f32::consts::TAU;
use std::time::Duration;

use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

const SAMPLE_RATE: u32 = 44_100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
}

fn waveform_sample(wave: Waveform, phase: f32) -> f32 {
    match wave {
        Waveform::Sine => phase.sin(),
        Waveform::Square => {
            if phase.sin() >= 0.0 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Triangle => (2.0 / std::f32::consts::PI) * phase.sin().asin(),
    }
}

/// A single synthesized note with a linear attack/release envelope.
#[derive(Debug, Clone)]
pub struct Tone {
    freq_hz: f32,
    waveform: Waveform,
    gain: f32,
    total_samples: u64,
    attack_samples: u64,
    release_samples: u64,
    cursor: u64,
}

impl Tone {
    pub fn new(freq_hz: f32, duration: Duration) -> Self {
        let total_samples = (duration.as_secs_f64() * SAMPLE_RATE as f64) as u64;
        let attack_samples = (SAMPLE_RATE as u64 / 200).min(total_samples); // 5ms
        let release_samples = (SAMPLE_RATE as u64 / 50).min(total_samples); // 20ms
        Self {
            freq_hz: freq_hz.max(1.0),
            waveform: Waveform::Sine,
            gain: 1.0,
            total_samples,
            attack_samples,
            release_samples,
            cursor: 0,
        }
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> Self {
        self.waveform = waveform;
        self
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain.clamp(0.0, 1.0);
        self
    }

    fn envelope(&self, n: u64) -> f32 {
        if self.attack_samples > 0 && n < self.attack_samples {
            return n as f32 / self.attack_samples as f32;
        }
        let remaining = self.total_samples.saturating_sub(n);
        if self.release_samples > 0 && remaining < self.release_samples {
            return remaining as f32 / self.release_samples as f32;
        }
        1.0
    }
}

impl Iterator for Tone {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.cursor >= self.total_samples {
            return None;
        }
        let n = self.cursor;
        self.cursor += 1;
        let phase = (TAU * self.freq_hz * n as f32 / SAMPLE_RATE as f32) % TAU;
        Some(waveform_sample(self.waveform, phase) * self.gain * self.envelope(n))
    }
}

impl Source for Tone {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f64(
            self.total_samples as f64 / SAMPLE_RATE as f64,
        ))
    }
}

/// An endless step-sequenced melody (`None` steps are rests).
#[derive(Debug, Clone)]
pub struct MusicLoop {
    notes_hz: Vec<Option<f32>>,
    samples_per_step: u64,
    gain: f32,
    cursor: u64,
}

impl MusicLoop {
    pub fn new(notes_hz: Vec<Option<f32>>, step: Duration) -> Self {
        let notes_hz = if notes_hz.is_empty() {
            vec![None]
        } else {
            notes_hz
        };
        Self {
            notes_hz,
            samples_per_step: ((step.as_secs_f64() * SAMPLE_RATE as f64) as u64).max(1),
            gain: 0.5,
            cursor: 0,
        }
    }

    pub fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain.clamp(0.0, 1.0);
        self
    }

    /// A mellow pentatonic loop used as the background theme.
    pub fn default_theme() -> Self {
        const A3: f32 = 220.00;
        const C4: f32 = 261.63;
        const D4: f32 = 293.66;
        const E4: f32 = 329.63;
        const G4: f32 = 392.00;
        Self::new(
            vec![
                Some(A3),
                Some(C4),
                Some(E4),
                None,
                Some(D4),
                Some(E4),
                Some(G4),
                None,
                Some(E4),
                Some(D4),
                Some(C4),
                Some(A3),
                None,
                Some(C4),
                Some(D4),
                None,
            ],
            Duration::from_millis(280),
        )
    }

    fn step_envelope(&self, in_step: u64) -> f32 {
        let attack = self.samples_per_step / 10;
        let release = self.samples_per_step / 4;
        if attack > 0 && in_step < attack {
            return in_step as f32 / attack as f32;
        }
        let remaining = self.samples_per_step - in_step;
        if release > 0 && remaining < release {
            return remaining as f32 / release as f32;
        }
        1.0
    }
}

impl Iterator for MusicLoop {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        let step_index = ((self.cursor / self.samples_per_step) as usize) % self.notes_hz.len();
        let in_step = self.cursor % self.samples_per_step;
        self.cursor = self.cursor.wrapping_add(1);

        let Some(freq_hz) = self.notes_hz[step_index] else {
            return Some(0.0);
        };
        let phase = (TAU * freq_hz * in_step as f32 / SAMPLE_RATE as f32) % TAU;
        Some(waveform_sample(Waveform::Triangle, phase) * self.gain * self.step_envelope(in_step))
    }
}

impl Source for MusicLoop {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}

/// Owns the output stream, fire-and-forget SFX sinks, and the music sink.
pub struct AudioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    music: Option<Sink>,
    music_gain: f32,
    theme: MusicLoop,
}

impl AudioOutput {
    pub fn new(theme: MusicLoop, music_gain: f32) -> Result<Self, rodio::StreamError> {
        let (stream, handle) = OutputStream::try_default()?;
        let mut out = Self {
            _stream: stream,
            handle,
            music: None,
            music_gain: music_gain.clamp(0.0, 1.0),
            theme,
        };
        out.music_restart();
        Ok(out)
    }

    /// Fire-and-forget one tone. Sink creation failures are silent.
    pub fn play(&self, tone: Tone, volume: f32) {
        self.play_sequence([tone], volume);
    }

    /// Fire-and-forget a sequence of tones played back to back.
    pub fn play_sequence(&self, tones: impl IntoIterator<Item = Tone>, volume: f32) {
        let Ok(sink) = Sink::try_new(&self.handle) else {
            return;
        };
        sink.set_volume(volume.clamp(0.0, 1.0));
        for tone in tones {
            sink.append(tone);
        }
        sink.detach();
    }

    pub fn music_pause(&self) {
        if let Some(sink) = &self.music {
            sink.pause();
        }
    }

    pub fn music_resume(&self) {
        if let Some(sink) = &self.music {
            sink.play();
        }
    }

    pub fn music_stop(&mut self) {
        if let Some(sink) = self.music.take() {
            sink.stop();
        }
    }

    /// (Re)starts the theme loop from the top.
    pub fn music_restart(&mut self) {
        self.music_stop();
        if self.music_gain <= 0.0 {
            return;
        }
        if let Ok(sink) = Sink::try_new(&self.handle) {
            sink.set_volume(self.music_gain);
            sink.append(self.theme.clone());
            self.music = Some(sink);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_yields_expected_sample_count() {
        let tone = Tone::new(440.0, Duration::from_millis(100));
        let n = tone.count();
        assert_eq!(n as u64, (SAMPLE_RATE as u64) / 10);
    }

    #[test]
    fn tone_samples_stay_in_unit_range() {
        let tone = Tone::new(880.0, Duration::from_millis(50)).with_waveform(Waveform::Square);
        for s in tone {
            assert!((-1.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn tone_envelope_starts_and_ends_quiet() {
        let mut tone = Tone::new(440.0, Duration::from_millis(100));
        let first = tone.next().unwrap();
        assert!(first.abs() < 0.01);
        let last = tone.by_ref().last().unwrap();
        assert!(last.abs() < 0.1);
    }

    #[test]
    fn music_loop_is_endless_and_bounded() {
        let mut theme = MusicLoop::default_theme().with_gain(1.0);
        for _ in 0..(SAMPLE_RATE * 2) {
            let s = theme.next().expect("music loop must never end");
            assert!((-1.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn rest_steps_are_silent() {
        let mut theme = MusicLoop::new(vec![None], Duration::from_millis(10));
        for _ in 0..1000 {
            assert_eq!(theme.next(), Some(0.0));
        }
    }
}
