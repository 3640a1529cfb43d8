//! Maps raw input to game actions: key routing, name editing, and the
//! pointer-to-peg / click-to-move semantics of the play screen.

use engine::ui::Rect;
use winit::event::VirtualKeyCode;

pub const MAX_NAME_LEN: usize = 20;
pub const MIN_NAME_LEN: usize = 2;

/// The logical keys the game consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Undo,
    Quit,
}

pub fn map_key(key: VirtualKeyCode) -> Option<Key> {
    match key {
        VirtualKeyCode::Return | VirtualKeyCode::NumpadEnter => Some(Key::Enter),
        VirtualKeyCode::Back => Some(Key::Backspace),
        VirtualKeyCode::Z => Some(Key::Undo),
        VirtualKeyCode::Escape => Some(Key::Quit),
        _ => None,
    }
}

/// The name-prompt edit buffer. Only alphabetic characters are accepted, up
/// to `MAX_NAME_LEN`; submitting requires a trimmed length of at least
/// `MIN_NAME_LEN`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameInput {
    text: String,
    error: Option<&'static str>,
}

impl NameInput {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn push_char(&mut self, ch: char) {
        if ch.is_alphabetic() && self.text.chars().count() < MAX_NAME_LEN {
            self.text.push(ch);
            self.error = None;
        }
    }

    pub fn backspace(&mut self) {
        self.text.pop();
        self.error = None;
    }

    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    pub fn is_valid(&self) -> bool {
        let trimmed = self.trimmed();
        trimmed.chars().count() >= MIN_NAME_LEN && trimmed.chars().all(char::is_alphabetic)
    }

    pub fn reject(&mut self) {
        self.error = Some("Name must be at least 2 letters (alphabets only)");
    }
}

/// Horizontal peg-column geometry for the play area. This is the one place
/// screen coordinates meet the puzzle; the engine itself never sees pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PegColumns {
    pub area: Rect,
    pub peg_count: usize,
}

impl PegColumns {
    pub fn new(area: Rect, peg_count: usize) -> Self {
        Self { area, peg_count }
    }

    /// Maps a pointer position to a peg index, or `None` outside the playable
    /// area or past the last column.
    pub fn peg_at(&self, x: u32, y: u32) -> Option<usize> {
        if self.peg_count == 0 || !self.area.contains(x, y) {
            return None;
        }
        let column_width = (self.area.w / self.peg_count as u32).max(1);
        let index = ((x - self.area.x) / column_width) as usize;
        (index < self.peg_count).then_some(index)
    }

    /// The horizontal center of column `index`.
    pub fn column_center_x(&self, index: usize) -> u32 {
        let column_width = (self.area.w / self.peg_count.max(1) as u32).max(1);
        self.area
            .x
            .saturating_add(index as u32 * column_width)
            .saturating_add(column_width / 2)
    }
}

/// Click-to-move selection: first click picks up a non-empty peg, second
/// click yields the attempted `(from, to)` pair and always clears.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PegSelection {
    selected: Option<usize>,
}

impl PegSelection {
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn click(&mut self, peg: usize, peg_is_empty: bool) -> Option<(usize, usize)> {
        match self.selected {
            None => {
                if !peg_is_empty {
                    self.selected = Some(peg);
                }
                None
            }
            Some(from) => {
                self.selected = None;
                Some((from, peg))
            }
        }
    }
}
