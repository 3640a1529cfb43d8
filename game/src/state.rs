use crate::input::{NameInput, PegSelection};
use crate::leaderboard::Leaderboard;
use crate::screen::Screen;
use crate::session::Session;

/// Per-level unlock flags. Level 0 is always unlocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionFlags {
    unlocked: Vec<bool>,
}

impl CompletionFlags {
    pub fn new(max_levels: usize) -> Self {
        let mut unlocked = vec![false; max_levels.max(1)];
        unlocked[0] = true;
        Self { unlocked }
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.unlocked
    }

    pub fn is_unlocked(&self, level: usize) -> bool {
        self.unlocked.get(level).copied().unwrap_or(false)
    }

    /// Winning a level unlocks it and its successor, on every win.
    pub fn record_win(&mut self, level: usize) {
        if let Some(flag) = self.unlocked.get_mut(level) {
            *flag = true;
        }
        if let Some(flag) = self.unlocked.get_mut(level + 1) {
            *flag = true;
        }
    }
}

/// The whole game state the update phase mutates and the renderer reads.
/// One owner, no module globals.
#[derive(Debug, Clone)]
pub struct GameState {
    pub screen: Screen,
    pub session: Option<Session>,
    pub player_name: String,
    pub name_input: NameInput,
    pub completed: CompletionFlags,
    pub leaderboard: Leaderboard,
    pub selection: PegSelection,
    /// Level shown on the win/timeout screens after the session ends.
    pub last_level: usize,
    /// Move count and elapsed seconds captured when the session ended.
    pub last_result: Option<(u32, u64)>,
}

impl GameState {
    pub fn new(max_levels: usize, leaderboard: Leaderboard) -> Self {
        Self {
            screen: Screen::default(),
            session: None,
            player_name: String::new(),
            name_input: NameInput::default(),
            completed: CompletionFlags::new(max_levels),
            leaderboard,
            selection: PegSelection::default(),
            last_level: 0,
            last_result: None,
        }
    }

    /// The level the screen machine should treat as "current": the active
    /// session's if one exists, else the one that just ended.
    pub fn current_level(&self) -> usize {
        self.session
            .as_ref()
            .map(Session::level_index)
            .unwrap_or(self.last_level)
    }
}
