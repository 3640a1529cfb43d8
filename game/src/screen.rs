/// The UI screens and the legal transitions between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    NamePrompt,
    Home,
    LevelSelect,
    Help,
    Playing { paused: bool },
    Win,
    Timeout,
    Leaderboard,
}

impl Default for Screen {
    fn default() -> Self {
        Self::Start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEvent {
    DismissSplash,
    SubmitName,
    SelectPlay,
    SelectLevels,
    SelectHelp,
    SelectLeaderboard,
    SelectQuit,
    PickLevel(usize),
    Back,
    TogglePause,
    Won,
    TimerExpired,
    NextLevel,
    Retry,
    ClearLeaderboard,
}

/// What the app must do after a transition. Side effects are reported rather
/// than performed so the transition function stays pure and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEffect {
    None,
    /// Initialize the given level and start its timer.
    StartLevel(usize),
    /// The submitted name was accepted; commit it.
    NameAccepted,
    /// The submitted name failed validation; show the inline error.
    NameRejected,
    /// Record the finished level: submit to the leaderboard, unlock levels.
    RecordWin,
    /// Stop the music and play the timeout sound.
    TimeoutEntered,
    /// Pause flag flipped to the carried value; pause/resume timer and music.
    PauseChanged(bool),
    ClearLeaderboard,
    Quit,
}

/// Guard inputs for transitions that need game state.
#[derive(Debug, Clone, Copy)]
pub struct ScreenCtx<'a> {
    /// Whether the name input currently passes validation.
    pub name_valid: bool,
    /// The level the active/finished session was playing.
    pub level: usize,
    /// Unlock flags, one per level.
    pub unlocked: &'a [bool],
}

impl Screen {
    /// Pure transition function for the screen state machine.
    ///
    /// Guard failures return the same screen with `ScreenEffect::None`; an
    /// ignored click is a normal outcome, never an error.
    pub fn handle(self, event: ScreenEvent, ctx: ScreenCtx<'_>) -> (Screen, ScreenEffect) {
        use Screen::*;
        use ScreenEvent as E;
        use ScreenEffect as Fx;

        match (self, event) {
            (Start, E::DismissSplash) => (NamePrompt, Fx::None),

            (NamePrompt, E::SubmitName) if ctx.name_valid => (Home, Fx::NameAccepted),
            (NamePrompt, E::SubmitName) => (NamePrompt, Fx::NameRejected),

            (Home, E::SelectPlay) => (Playing { paused: false }, Fx::StartLevel(0)),
            (Home, E::SelectLevels) => (LevelSelect, Fx::None),
            (Home, E::SelectHelp) => (Help, Fx::None),
            (Home, E::SelectLeaderboard) => (Leaderboard, Fx::None),
            (Home, E::SelectQuit) => (Home, Fx::Quit),

            (LevelSelect, E::PickLevel(i)) if ctx.unlocked.get(i).copied().unwrap_or(false) => {
                (Playing { paused: false }, Fx::StartLevel(i))
            }
            (LevelSelect, E::Back) => (Home, Fx::None),

            (Help, E::Back) => (Home, Fx::None),

            (Playing { paused }, E::TogglePause) => {
                (Playing { paused: !paused }, Fx::PauseChanged(!paused))
            }
            // Gameplay-affecting transitions are gated while paused.
            (Playing { paused: false }, E::Won) => (Win, Fx::RecordWin),
            (Playing { paused: false }, E::TimerExpired) => (Timeout, Fx::TimeoutEntered),
            (Playing { paused: false }, E::Back) => (Home, Fx::None),

            (Win, E::NextLevel)
                if ctx
                    .unlocked
                    .get(ctx.level + 1)
                    .copied()
                    .unwrap_or(false) =>
            {
                (Playing { paused: false }, Fx::StartLevel(ctx.level + 1))
            }
            (Win, E::Back) => (Home, Fx::None),

            (Timeout, E::Retry) => (Playing { paused: false }, Fx::StartLevel(ctx.level)),
            (Timeout, E::Back) => (Home, Fx::None),

            (Leaderboard, E::Back) => (Home, Fx::None),
            (Leaderboard, E::ClearLeaderboard) => (Leaderboard, Fx::ClearLeaderboard),

            // Everything else is ignored in the current screen.
            (screen, _) => (screen, Fx::None),
        }
    }

    pub fn is_playing(self) -> bool {
        matches!(self, Screen::Playing { .. })
    }

    pub fn is_playing_unpaused(self) -> bool {
        matches!(self, Screen::Playing { paused: false })
    }
}
