//! The update phase: drains input events in arrival order, routes them
//! through the screen state machine and the puzzle engine, performs the
//! resulting effects, and reports audio triggers. Win and timeout are checked
//! after move application, before the frame is rendered.

use std::time::Instant;

use engine::app::AppEvent;
use engine::graphics::SurfaceSize;

use crate::input::{Key, map_key};
use crate::leaderboard::{Entry, Leaderboard, LeaderboardStore};
use crate::puzzle::UndoOutcome;
use crate::screen::{Screen, ScreenCtx, ScreenEffect, ScreenEvent};
use crate::session::Session;
use crate::settings::PlayerSettings;
use crate::sfx::AudioEvent;
use crate::state::GameState;
use crate::ui;

#[derive(Debug, Default)]
pub struct UpdateOutput {
    pub audio: Vec<AudioEvent>,
    pub exit: bool,
}

pub struct PlatesApp {
    settings: PlayerSettings,
    store: LeaderboardStore,
    state: GameState,
    seed: u64,
    view_size: SurfaceSize,
    exit: bool,
}

impl PlatesApp {
    pub fn new(settings: PlayerSettings, seed: u64) -> Self {
        let store = LeaderboardStore::new(settings.leaderboard_path.clone());
        Self::with_store(settings, store, seed)
    }

    pub fn with_store(settings: PlayerSettings, store: LeaderboardStore, seed: u64) -> Self {
        let leaderboard = store.load();
        let state = GameState::new(settings.rules.max_levels, leaderboard);
        Self {
            settings,
            store,
            state,
            seed,
            view_size: SurfaceSize::new(1, 1),
            exit: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    /// One tick: apply `events` in order, then the win/timeout checks.
    pub fn update(&mut self, events: &[AppEvent], now: Instant, size: SurfaceSize) -> UpdateOutput {
        self.view_size = size;
        let mut out = UpdateOutput::default();

        for event in events {
            match *event {
                AppEvent::PointerDown { x, y } => self.on_pointer(x, y, now, &mut out),
                AppEvent::KeyDown(key) => {
                    if let Some(key) = map_key(key) {
                        self.on_key(key, now, &mut out);
                    }
                }
                AppEvent::Char(ch) => self.on_char(ch),
            }
        }

        self.check_win(now, &mut out);
        self.check_timeout(now, &mut out);

        out.exit = self.exit;
        out
    }

    fn on_pointer(&mut self, x: u32, y: u32, now: Instant, out: &mut UpdateOutput) {
        let size = self.view_size;
        match self.state.screen {
            Screen::Start => {
                if ui::start_layout(size).start_button.contains(x, y) {
                    self.screen_event(ScreenEvent::DismissSplash, now, out);
                }
            }
            Screen::NamePrompt => {}
            Screen::Home => {
                let layout = ui::home_layout(size);
                for (button, rect) in ui::HOME_BUTTONS.iter().zip(&layout.buttons) {
                    if !rect.contains(x, y) {
                        continue;
                    }
                    let event = match button {
                        ui::HomeButton::Play => ScreenEvent::SelectPlay,
                        ui::HomeButton::Levels => ScreenEvent::SelectLevels,
                        ui::HomeButton::Help => ScreenEvent::SelectHelp,
                        ui::HomeButton::Quit => ScreenEvent::SelectQuit,
                        ui::HomeButton::Leaderboard => ScreenEvent::SelectLeaderboard,
                    };
                    self.screen_event(event, now, out);
                    break;
                }
            }
            Screen::LevelSelect => {
                let layout = ui::level_select_layout(size, self.settings.rules.max_levels);
                if layout.back.contains(x, y) {
                    self.screen_event(ScreenEvent::Back, now, out);
                    return;
                }
                for (i, rect) in layout.levels.iter().enumerate() {
                    if rect.contains(x, y) {
                        self.screen_event(ScreenEvent::PickLevel(i), now, out);
                        break;
                    }
                }
            }
            Screen::Help => {
                if ui::help_layout(size).back.contains(x, y) {
                    self.screen_event(ScreenEvent::Back, now, out);
                }
            }
            Screen::Playing { paused } => self.on_play_pointer(x, y, paused, now, out),
            Screen::Win => {
                let layout = ui::result_layout(size);
                if layout.left_button.contains(x, y) {
                    self.screen_event(ScreenEvent::Back, now, out);
                } else if layout.right_button.contains(x, y) {
                    self.screen_event(ScreenEvent::NextLevel, now, out);
                }
            }
            Screen::Timeout => {
                let layout = ui::result_layout(size);
                if layout.left_button.contains(x, y) {
                    self.screen_event(ScreenEvent::Retry, now, out);
                } else if layout.right_button.contains(x, y) {
                    self.screen_event(ScreenEvent::Back, now, out);
                }
            }
            Screen::Leaderboard => {
                let layout = ui::leaderboard_layout(size);
                if layout.back.contains(x, y) {
                    self.screen_event(ScreenEvent::Back, now, out);
                } else if layout.clear.contains(x, y) {
                    self.screen_event(ScreenEvent::ClearLeaderboard, now, out);
                }
            }
        }
    }

    fn on_play_pointer(&mut self, x: u32, y: u32, paused: bool, now: Instant, out: &mut UpdateOutput) {
        let Some(session) = &self.state.session else {
            return;
        };
        let layout = ui::play_layout(self.view_size, session.puzzle().peg_count());

        if layout.pause.contains(x, y) {
            self.screen_event(ScreenEvent::TogglePause, now, out);
            return;
        }
        if paused {
            // Everything but the pause button is inert while paused.
            return;
        }
        if layout.back.contains(x, y) {
            self.screen_event(ScreenEvent::Back, now, out);
            return;
        }

        if let Some(peg) = layout.columns.peg_at(x, y) {
            let peg_is_empty = session
                .puzzle()
                .peg(peg)
                .is_none_or(|plates| plates.is_empty());
            if let Some((from, to)) = self.state.selection.click(peg, peg_is_empty) {
                if let Some(session) = &mut self.state.session {
                    if session.puzzle_mut().move_plate(from, to) {
                        out.audio.push(AudioEvent::Move);
                    }
                }
            }
        }
    }

    fn on_key(&mut self, key: Key, now: Instant, out: &mut UpdateOutput) {
        match (self.state.screen, key) {
            (_, Key::Quit) => {
                self.exit = true;
            }
            (Screen::NamePrompt, Key::Enter) => {
                self.screen_event(ScreenEvent::SubmitName, now, out);
            }
            (Screen::NamePrompt, Key::Backspace) => {
                self.state.name_input.backspace();
            }
            (Screen::Playing { paused: false }, Key::Undo) => {
                if let Some(session) = &mut self.state.session {
                    match session.puzzle_mut().undo_move() {
                        UndoOutcome::Undone => out.audio.push(AudioEvent::Move),
                        UndoOutcome::NothingToUndo => {}
                        UndoOutcome::Inconsistent => {
                            tracing::warn!(
                                "undo found a mismatched plate; board restored conservatively"
                            );
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn on_char(&mut self, ch: char) {
        if self.state.screen == Screen::NamePrompt {
            self.state.name_input.push_char(ch);
        }
    }

    fn check_win(&mut self, now: Instant, out: &mut UpdateOutput) {
        if !self.state.screen.is_playing_unpaused() {
            return;
        }
        let won = self
            .state
            .session
            .as_ref()
            .is_some_and(|session| session.puzzle().is_win());
        if won {
            self.screen_event(ScreenEvent::Won, now, out);
        }
    }

    fn check_timeout(&mut self, now: Instant, out: &mut UpdateOutput) {
        if !self.state.screen.is_playing_unpaused() {
            return;
        }
        let expired = self.state.session.as_mut().is_some_and(|session| {
            let limit = session.config().time_limit;
            session.timer_mut().check_expired(now, limit)
        });
        if expired {
            self.screen_event(ScreenEvent::TimerExpired, now, out);
        }
    }

    fn screen_event(&mut self, event: ScreenEvent, now: Instant, out: &mut UpdateOutput) {
        let previous = self.state.screen;
        let (next, effect) = {
            let ctx = ScreenCtx {
                name_valid: self.state.name_input.is_valid(),
                level: self.state.current_level(),
                unlocked: self.state.completed.as_slice(),
            };
            self.state.screen.handle(event, ctx)
        };
        self.state.screen = next;
        self.apply_effect(effect, now, out);

        // Leaving the play screen for a menu ends the attempt. Win/timeout
        // handling has already consumed the session by this point.
        if previous.is_playing() && !self.state.screen.is_playing() {
            self.state.session = None;
            self.state.selection.clear();
        }
    }

    fn apply_effect(&mut self, effect: ScreenEffect, now: Instant, out: &mut UpdateOutput) {
        match effect {
            ScreenEffect::None => {}
            ScreenEffect::StartLevel(level) => self.start_level(level, now, out),
            ScreenEffect::NameAccepted => {
                self.state.player_name = self.state.name_input.trimmed().to_string();
            }
            ScreenEffect::NameRejected => self.state.name_input.reject(),
            ScreenEffect::RecordWin => self.record_win(now, out),
            ScreenEffect::TimeoutEntered => self.enter_timeout(now, out),
            ScreenEffect::PauseChanged(paused) => {
                if let Some(session) = &mut self.state.session {
                    if paused {
                        session.timer_mut().pause(now);
                        out.audio.push(AudioEvent::MusicPause);
                    } else {
                        session.timer_mut().resume(now);
                        out.audio.push(AudioEvent::MusicResume);
                    }
                }
            }
            ScreenEffect::ClearLeaderboard => {
                self.state.leaderboard.clear();
                self.persist_leaderboard();
            }
            ScreenEffect::Quit => {
                self.exit = true;
            }
        }
    }

    fn start_level(&mut self, level: usize, now: Instant, out: &mut UpdateOutput) {
        self.seed = self
            .seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let max_pegs = Some(ui::max_peg_columns(self.view_size));

        match Session::begin(self.settings.rules, level, max_pegs, self.seed, now) {
            Ok(session) => {
                tracing::info!(
                    level,
                    plates = session.config().total_plates,
                    pegs = session.config().peg_count,
                    "level started"
                );
                self.state.session = Some(session);
                self.state.selection.clear();
                self.state.last_level = level;
                self.state.last_result = None;
                out.audio.push(AudioEvent::MusicLoopStart);
            }
            Err(err) => {
                // The menus only offer valid levels; treat this as a refused
                // request and fall back to the home screen.
                tracing::warn!(%err, "refusing to start level");
                self.state.screen = Screen::Home;
                self.state.session = None;
            }
        }
    }

    fn record_win(&mut self, now: Instant, out: &mut UpdateOutput) {
        let Some(session) = self.state.session.take() else {
            return;
        };
        let level = session.level_index();
        let moves = session.puzzle().moves();
        let seconds = session.elapsed_secs(now);

        self.state.last_level = level;
        self.state.last_result = Some((moves, seconds));
        self.state.completed.record_win(level);
        self.state.selection.clear();

        out.audio.push(AudioEvent::Win);
        out.audio.push(AudioEvent::MusicLoopStart);

        let changed = self.state.leaderboard.submit(Entry {
            name: self.state.player_name.clone(),
            level: (level + 1) as u32,
            moves,
            seconds,
        });
        if changed {
            self.persist_leaderboard();
        }
        tracing::info!(level, moves, seconds, "level complete");
    }

    fn enter_timeout(&mut self, now: Instant, out: &mut UpdateOutput) {
        let Some(session) = self.state.session.take() else {
            return;
        };
        self.state.last_level = session.level_index();
        self.state.last_result = Some((session.puzzle().moves(), session.elapsed_secs(now)));
        self.state.selection.clear();

        out.audio.push(AudioEvent::MusicStop);
        out.audio.push(AudioEvent::Timeout);
        tracing::info!(level = self.state.last_level, "level timed out");
    }

    fn persist_leaderboard(&self) {
        if let Err(err) = self.store.save(&self.state.leaderboard) {
            tracing::warn!(%err, "leaderboard not saved; continuing without persistence");
        }
    }

    /// Test hook: the in-memory leaderboard.
    pub fn leaderboard(&self) -> &Leaderboard {
        &self.state.leaderboard
    }

    /// Test hook: mutable access to the active session.
    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.state.session.as_mut()
    }
}
