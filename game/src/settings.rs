use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::level::LevelRules;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AudioSettings {
    pub master_volume: f32,
    pub music_enabled: bool,
    pub sfx_enabled: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            music_enabled: true,
            sfx_enabled: true,
        }
    }
}

impl AudioSettings {
    pub fn clamp(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self
    }

    pub fn effective_music_gain(self, base: f32) -> f32 {
        if self.music_enabled {
            self.master_volume * base
        } else {
            0.0
        }
    }

    pub fn effective_sfx_gain(self, base: f32) -> f32 {
        if self.sfx_enabled {
            self.master_volume * base
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplaySettings {
    pub fullscreen: bool,
    pub show_timer: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            fullscreen: true,
            show_timer: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub display: DisplaySettings,
    #[serde(default)]
    pub rules: LevelRules,
    #[serde(default = "default_leaderboard_path")]
    pub leaderboard_path: PathBuf,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            audio: AudioSettings::default(),
            display: DisplaySettings::default(),
            rules: LevelRules::default(),
            leaderboard_path: default_leaderboard_path(),
        }
    }
}

impl PlayerSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.audio = self.audio.clamp();
        self.rules = self.rules.sanitized();
        self
    }
}

fn default_version() -> u32 {
    1
}

fn default_leaderboard_path() -> PathBuf {
    PathBuf::from("leaderboard.txt")
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("PLATES_SETTINGS_PATH") {
            return Self {
                path: PathBuf::from(explicit),
            };
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("plates");
        path.push("settings.json");
        Self { path }
    }

    pub fn load(&self) -> PlayerSettings {
        let Ok(bytes) = fs::read(&self.path) else {
            return PlayerSettings::default();
        };
        serde_json::from_slice::<PlayerSettings>(&bytes)
            .map(PlayerSettings::sanitized)
            .unwrap_or_else(|_| PlayerSettings::default())
    }

    pub fn save(&self, settings: &PlayerSettings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_gains_respect_toggles() {
        let mut audio = AudioSettings::default();
        assert!((audio.effective_music_gain(0.3) - 0.3).abs() < 1e-6);
        assert!((audio.effective_sfx_gain(0.5) - 0.5).abs() < 1e-6);

        audio.music_enabled = false;
        assert_eq!(audio.effective_music_gain(0.3), 0.0);
        assert!((audio.effective_sfx_gain(0.5) - 0.5).abs() < 1e-6);

        audio.master_volume = 0.5;
        assert!((audio.effective_sfx_gain(0.5) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn sanitized_clamps_volume_and_rules() {
        let settings = PlayerSettings {
            version: 99,
            audio: AudioSettings {
                master_volume: 4.0,
                ..AudioSettings::default()
            },
            rules: LevelRules {
                base_total_plates: 0,
                plates_increment: 2,
                base_stacks: 0,
                max_levels: 0,
            },
            ..PlayerSettings::default()
        }
        .sanitized();

        assert_eq!(settings.version, 1);
        assert_eq!(settings.audio.master_volume, 1.0);
        assert!(settings.rules.base_stacks >= 2);
        assert!(settings.rules.max_levels >= 1);
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: PlayerSettings =
            serde_json::from_str(r#"{"version":1,"audio":{"master_volume":0.5,"music_enabled":false,"sfx_enabled":true}}"#)
                .expect("settings JSON should parse");
        assert_eq!(parsed.display, DisplaySettings::default());
        assert_eq!(parsed.rules, LevelRules::default());
        assert_eq!(parsed.leaderboard_path, PathBuf::from("leaderboard.txt"));
        assert!(!parsed.audio.music_enabled);
    }
}
