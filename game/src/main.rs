use std::error::Error;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use engine::app::{AppConfig, AppControl, AppEvent, GameApp, run_game};
use engine::audio::{AudioOutput, MusicLoop};
use engine::graphics::{Renderer2d, SurfaceSize};
use winit::dpi::PhysicalSize;

use plates::app::PlatesApp;
use plates::settings::{PlayerSettings, SettingsStore};
use plates::sfx::{
    self, AudioEvent, MOVE_SFX_VOLUME, MUSIC_VOLUME, TIMEOUT_SFX_VOLUME, WIN_SFX_VOLUME,
};
use plates::ui;

/// Bridges the game update/render to the window loop and the audio device.
struct Frontend {
    app: PlatesApp,
    audio: Option<AudioOutput>,
    settings: PlayerSettings,
    last_now: Instant,
}

impl Frontend {
    fn new(app: PlatesApp, audio: Option<AudioOutput>, settings: PlayerSettings) -> Self {
        Self {
            app,
            audio,
            settings,
            last_now: Instant::now(),
        }
    }

    fn perform_audio(&mut self, events: &[AudioEvent]) {
        let Some(audio) = self.audio.as_mut() else {
            return;
        };
        let sfx_gain = |base: f32| self.settings.audio.effective_sfx_gain(base);
        for event in events {
            match event {
                AudioEvent::Move => audio.play(sfx::move_tone(), sfx_gain(MOVE_SFX_VOLUME)),
                AudioEvent::Win => audio.play_sequence(sfx::win_tones(), sfx_gain(WIN_SFX_VOLUME)),
                AudioEvent::Timeout => {
                    audio.play_sequence(sfx::timeout_tones(), sfx_gain(TIMEOUT_SFX_VOLUME))
                }
                AudioEvent::MusicPause => audio.music_pause(),
                AudioEvent::MusicResume => audio.music_resume(),
                AudioEvent::MusicStop => audio.music_stop(),
                AudioEvent::MusicLoopStart => audio.music_restart(),
            }
        }
    }
}

impl GameApp for Frontend {
    fn update(&mut self, events: &[AppEvent], now: Instant, size: SurfaceSize) -> AppControl {
        self.last_now = now;
        let out = self.app.update(events, now, size);
        self.perform_audio(&out.audio);
        if out.exit {
            AppControl::Exit
        } else {
            AppControl::Continue
        }
    }

    fn render(&mut self, gfx: &mut dyn Renderer2d) {
        ui::render(
            self.app.state(),
            self.last_now,
            self.settings.display.show_timer,
            gfx,
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = SettingsStore::from_env().load();

    let music_gain = settings.audio.effective_music_gain(MUSIC_VOLUME);
    let audio = match AudioOutput::new(MusicLoop::default_theme(), music_gain) {
        Ok(audio) => Some(audio),
        Err(err) => {
            tracing::warn!(%err, "audio disabled; playing silent");
            None
        }
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1);
    let app = PlatesApp::new(settings.clone(), seed);

    let config = AppConfig {
        title: "Stacking Plates".to_string(),
        desired_size: PhysicalSize::new(1280, 720),
        fullscreen: settings.display.fullscreen,
        tick_rate: 30,
    };

    run_game(config, Frontend::new(app, audio, settings))
}
