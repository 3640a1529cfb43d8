//! Per-screen layout and drawing.
//!
//! Layout functions are pure over the surface size so the update phase can
//! hit-test clicks against the same rects the renderer draws. Rendering only
//! reads state.

use std::time::Instant;

use engine::graphics::{Color, Renderer2d, SurfaceSize, text_height};
use engine::ui::{Anchor, Rect, Size};

use crate::input::PegColumns;
use crate::screen::Screen;
use crate::state::GameState;

const WHITE: Color = [255, 255, 255, 255];
const BLACK: Color = [0, 0, 0, 255];
const GRAY: Color = [180, 180, 180, 255];
const BLUE: Color = [70, 130, 255, 255];
const YELLOW: Color = [255, 215, 0, 255];
const GREEN: Color = [0, 200, 0, 255];
const RED: Color = [255, 0, 0, 255];
const BOX_FILL: Color = [230, 230, 250, 255];

const TITLE_SCALE: u32 = 6;
const HEADING_SCALE: u32 = 4;
const TEXT_SCALE: u32 = 2;

const BUTTON_SIZE: Size = Size { w: 300, h: 60 };
const BUTTON_GAP: u32 = 20;
const LEVEL_BUTTON_SIZE: Size = Size { w: 220, h: 80 };
const LEVEL_BUTTON_GAP: Size = Size { w: 50, h: 50 };
const LEVEL_GRID_COLS: usize = 3;

const PLATE_HEIGHT: u32 = 22;
const PLATE_MIN_WIDTH: u32 = 40;
const POLE_HEIGHT: u32 = 300;
/// Narrowest column a peg can be squeezed into before the peg count is
/// clamped at level start.
pub const MIN_PEG_COLUMN_WIDTH: u32 = 90;

pub fn content_rect(size: SurfaceSize) -> Rect {
    Rect::new(
        size.width / 20,
        size.height * 2 / 25,
        size.width * 9 / 10,
        size.height * 21 / 25,
    )
}

/// Display-driven upper bound on peg count, handed to the level configurator.
pub fn max_peg_columns(size: SurfaceSize) -> usize {
    (content_rect(size).w / MIN_PEG_COLUMN_WIDTH).max(1) as usize
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartLayout {
    pub start_button: Rect,
}

pub fn start_layout(size: SurfaceSize) -> StartLayout {
    let area = Rect::from_size(size.width, size.height);
    let mut button = area.place(Size::new(300, 70), Anchor::BottomCenter);
    button.y = button.y.saturating_sub(110);
    StartLayout {
        start_button: button,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamePromptLayout {
    pub input_box: Rect,
}

pub fn name_prompt_layout(size: SurfaceSize) -> NamePromptLayout {
    let content = content_rect(size);
    NamePromptLayout {
        input_box: content.place(Size::new(300, 50), Anchor::Center),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeButton {
    Play,
    Levels,
    Help,
    Quit,
    Leaderboard,
}

pub const HOME_BUTTONS: [HomeButton; 5] = [
    HomeButton::Play,
    HomeButton::Levels,
    HomeButton::Help,
    HomeButton::Quit,
    HomeButton::Leaderboard,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeLayout {
    pub buttons: Vec<Rect>,
}

pub fn home_layout(size: SurfaceSize) -> HomeLayout {
    let content = content_rect(size);
    let start_y = content
        .center_y()
        .saturating_sub((BUTTON_SIZE.h + BUTTON_GAP) * 2);
    HomeLayout {
        buttons: content.column(BUTTON_SIZE, BUTTON_GAP, HOME_BUTTONS.len(), start_y),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSelectLayout {
    pub back: Rect,
    pub levels: Vec<Rect>,
}

pub fn level_select_layout(size: SurfaceSize, max_levels: usize) -> LevelSelectLayout {
    let content = content_rect(size);
    LevelSelectLayout {
        back: back_button_rect(),
        levels: content.grid(LEVEL_BUTTON_SIZE, LEVEL_BUTTON_GAP, LEVEL_GRID_COLS, max_levels),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayLayout {
    pub back: Rect,
    pub pause: Rect,
    pub columns: PegColumns,
}

pub fn play_layout(size: SurfaceSize, peg_count: usize) -> PlayLayout {
    PlayLayout {
        back: back_button_rect(),
        pause: Rect::new(size.width.saturating_sub(150), 10, 140, 40),
        columns: PegColumns::new(content_rect(size), peg_count),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultLayout {
    pub left_button: Rect,
    pub right_button: Rect,
}

/// Shared two-button footer for the win (back/next) and timeout (retry/exit)
/// screens.
pub fn result_layout(size: SurfaceSize) -> ResultLayout {
    let content = content_rect(size);
    let y = content.bottom().saturating_sub(90);
    ResultLayout {
        left_button: Rect::new(content.center_x().saturating_sub(220), y, 180, 50),
        right_button: Rect::new(content.center_x() + 40, y, 180, 50),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderboardLayout {
    pub back: Rect,
    pub clear: Rect,
}

pub fn leaderboard_layout(size: SurfaceSize) -> LeaderboardLayout {
    let content = content_rect(size);
    LeaderboardLayout {
        back: back_button_rect(),
        clear: Rect::new(
            content.center_x().saturating_sub(120),
            content.bottom().saturating_sub(100),
            240,
            60,
        ),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpLayout {
    pub back: Rect,
}

pub fn help_layout(_size: SurfaceSize) -> HelpLayout {
    HelpLayout {
        back: back_button_rect(),
    }
}

fn back_button_rect() -> Rect {
    Rect::new(10, 10, 140, 40)
}

fn gradient_for(screen: Screen) -> (Color, Color) {
    match screen {
        Screen::Start => ([0, 0, 0, 255], [25, 25, 45, 255]),
        Screen::NamePrompt => ([40, 40, 80, 255], [100, 100, 180, 255]),
        Screen::Home => ([10, 100, 150, 255], [60, 180, 200, 255]),
        Screen::LevelSelect => ([40, 20, 60, 255], [130, 50, 150, 255]),
        Screen::Help => ([60, 60, 60, 255], [180, 180, 180, 255]),
        Screen::Playing { .. } => ([30, 30, 60, 255], [80, 120, 180, 255]),
        Screen::Win => ([0, 70, 0, 255], [80, 180, 80, 255]),
        Screen::Timeout => ([100, 0, 0, 255], [180, 50, 50, 255]),
        Screen::Leaderboard => ([30, 30, 30, 255], [90, 90, 90, 255]),
    }
}

pub fn render(state: &GameState, now: Instant, show_timer: bool, gfx: &mut dyn Renderer2d) {
    let size = gfx.size();
    let (top, bottom) = gradient_for(state.screen);
    gfx.fill_vertical_gradient(Rect::from_size(size.width, size.height), top, bottom);

    match state.screen {
        Screen::Start => draw_start(size, gfx),
        Screen::NamePrompt => draw_name_prompt(state, size, gfx),
        Screen::Home => draw_home(size, gfx),
        Screen::LevelSelect => draw_level_select(state, size, gfx),
        Screen::Help => draw_help(size, gfx),
        Screen::Playing { paused } => draw_play(state, now, paused, show_timer, size, gfx),
        Screen::Win => draw_win(state, size, gfx),
        Screen::Timeout => draw_timeout(state, size, gfx),
        Screen::Leaderboard => draw_leaderboard(state, size, gfx),
    }
}

fn draw_content_box(size: SurfaceSize, gfx: &mut dyn Renderer2d) -> Rect {
    let content = content_rect(size);
    gfx.fill_rect(content, BOX_FILL);
    gfx.rect_outline(content, BLACK, 3);
    content
}

fn draw_button(gfx: &mut dyn Renderer2d, rect: Rect, label: &str, enabled: bool) {
    gfx.fill_rect(rect, if enabled { BLUE } else { GRAY });
    gfx.rect_outline(rect, BLACK, 2);
    let text_y = rect
        .center_y()
        .saturating_sub(text_height(TEXT_SCALE) / 2);
    gfx.draw_text_centered(rect.center_x(), text_y, label, BLACK, TEXT_SCALE);
}

fn draw_start(size: SurfaceSize, gfx: &mut dyn Renderer2d) {
    let layout = start_layout(size);
    gfx.draw_text_centered(
        size.width / 2,
        size.height / 3,
        "STACKING PLATES",
        YELLOW,
        TITLE_SCALE,
    );
    gfx.fill_rect(layout.start_button, YELLOW);
    gfx.rect_outline(layout.start_button, BLACK, 3);
    let text_y = layout
        .start_button
        .center_y()
        .saturating_sub(text_height(TEXT_SCALE) / 2);
    gfx.draw_text_centered(
        layout.start_button.center_x(),
        text_y,
        "START GAME",
        BLACK,
        TEXT_SCALE,
    );
}

fn draw_name_prompt(state: &GameState, size: SurfaceSize, gfx: &mut dyn Renderer2d) {
    let content = draw_content_box(size, gfx);
    let layout = name_prompt_layout(size);

    gfx.draw_text_centered(
        content.center_x(),
        content.y + 40,
        "ENTER YOUR NAME",
        BLACK,
        HEADING_SCALE,
    );

    gfx.fill_rect(layout.input_box, WHITE);
    gfx.rect_outline(layout.input_box, BLACK, 2);
    gfx.draw_text(
        layout.input_box.x + 10,
        layout.input_box.y + 16,
        state.name_input.text(),
        BLACK,
    );

    if let Some(error) = state.name_input.error() {
        gfx.draw_text_centered(
            content.center_x(),
            layout.input_box.bottom() + 12,
            error,
            RED,
            TEXT_SCALE,
        );
    }

    gfx.draw_text_centered(
        content.center_x(),
        content.bottom().saturating_sub(60),
        "PRESS ENTER (LETTERS ONLY) TO CONTINUE",
        BLACK,
        TEXT_SCALE,
    );
}

fn draw_home(size: SurfaceSize, gfx: &mut dyn Renderer2d) {
    let content = draw_content_box(size, gfx);
    gfx.draw_text_centered(
        content.center_x(),
        content.y + 24,
        "STACKING PLATES",
        BLACK,
        TITLE_SCALE,
    );

    let layout = home_layout(size);
    for (button, rect) in HOME_BUTTONS.iter().zip(&layout.buttons) {
        let label = match button {
            HomeButton::Play => "PLAY",
            HomeButton::Levels => "LEVELS",
            HomeButton::Help => "HELP",
            HomeButton::Quit => "QUIT",
            HomeButton::Leaderboard => "LEADERBOARD",
        };
        draw_button(gfx, *rect, label, true);
    }
}

fn draw_level_select(state: &GameState, size: SurfaceSize, gfx: &mut dyn Renderer2d) {
    let content = draw_content_box(size, gfx);
    gfx.draw_text_centered(
        content.center_x(),
        content.y + 30,
        "SELECT LEVEL",
        BLUE,
        TITLE_SCALE,
    );

    let layout = level_select_layout(size, state.completed.as_slice().len());
    for (i, rect) in layout.levels.iter().enumerate() {
        let unlocked = state.completed.is_unlocked(i);
        draw_button(gfx, *rect, &format!("LEVEL {}", i + 1), unlocked);
        if !unlocked {
            gfx.draw_text(rect.right().saturating_sub(30), rect.y + 10, "X", RED);
        }
    }
    draw_button(gfx, layout.back, "< BACK", true);
}

fn draw_help(size: SurfaceSize, gfx: &mut dyn Renderer2d) {
    let content = draw_content_box(size, gfx);
    gfx.draw_text_centered(content.center_x(), content.y + 20, "HELP", BLACK, HEADING_SCALE);

    let lines = [
        "- MOVE ALL PLATES (IN INCREASING ORDER) ONTO ANY STACK.",
        "- MOVE ONLY ONE TOP PLATE AT A TIME.",
        "- CAN'T PLACE LARGER OVER SMALLER.",
        "- EACH LEVEL ADDS 2 NEW PLATES.",
        "- EVERY 2 LEVELS ADD ANOTHER STACK.",
        "- CLICK STACKS TO MOVE.",
        "- PRESS Z TO UNDO THE LAST MOVE.",
        "- 45 SECONDS PER LEVEL STEP.",
    ];
    for (i, line) in lines.iter().enumerate() {
        gfx.draw_text(
            content.x + 20,
            content.y + 80 + (i as u32) * 30,
            line,
            BLACK,
        );
    }
    draw_button(gfx, help_layout(size).back, "< BACK", true);
}

fn draw_play(
    state: &GameState,
    now: Instant,
    paused: bool,
    show_timer: bool,
    size: SurfaceSize,
    gfx: &mut dyn Renderer2d,
) {
    let content = draw_content_box(size, gfx);
    let Some(session) = &state.session else {
        return;
    };
    let layout = play_layout(size, session.puzzle().peg_count());

    draw_stacks(state, layout.columns, gfx);

    if show_timer {
        let time_left = session.remaining_secs(now);
        gfx.draw_text(
            content.x + 10,
            content.y + 10,
            &format!("TIME LEFT: {time_left}S"),
            BLACK,
        );
    }
    gfx.draw_text(
        content.x + 10,
        content.y + 40,
        &format!("LEVEL: {}", session.level_index() + 1),
        BLACK,
    );

    let score_box = Rect::new(content.right().saturating_sub(160), content.y + 5, 140, 40);
    gfx.fill_rect(score_box, [255, 255, 200, 255]);
    gfx.rect_outline(score_box, BLACK, 2);
    gfx.draw_text(
        score_box.x + 10,
        score_box.y + 14,
        &format!("MOVES: {}", session.puzzle().moves()),
        BLACK,
    );

    draw_button(gfx, layout.back, "< BACK", true);
    draw_button(gfx, layout.pause, if paused { ">" } else { "II" }, true);

    if paused {
        gfx.blend_rect(Rect::from_size(size.width, size.height), BLACK, 128);
        gfx.draw_text_centered(
            size.width / 2,
            (size.height / 2).saturating_sub(50),
            "PAUSED",
            WHITE,
            HEADING_SCALE,
        );
        gfx.draw_text_centered(
            size.width / 2,
            size.height / 2 + 20,
            "CLICK > TO CONTINUE",
            WHITE,
            TEXT_SCALE,
        );
    }
}

fn draw_stacks(state: &GameState, columns: PegColumns, gfx: &mut dyn Renderer2d) {
    let Some(session) = &state.session else {
        return;
    };
    let puzzle = session.puzzle();
    let won = puzzle.is_win();
    let total = puzzle.total_plates().max(1) as u32;
    let column_width = (columns.area.w / puzzle.peg_count().max(1) as u32).max(1);
    let max_plate_width = column_width * 9 / 10;
    let y_base = columns.area.bottom().saturating_sub(40);

    for (i, peg) in puzzle.pegs().iter().enumerate() {
        let x_center = columns.column_center_x(i);

        let full = peg.len() == puzzle.total_plates();
        let pole_color = if won && full { GREEN } else { GRAY };
        let pole = Rect::new(
            x_center.saturating_sub(column_width * 2 / 5),
            y_base.saturating_sub(POLE_HEIGHT),
            column_width * 4 / 5,
            POLE_HEIGHT,
        );
        gfx.rect_outline(pole, pole_color, if won && full { 5 } else { 3 });

        let selected = state.selection.selected() == Some(i);
        let mut y = y_base;
        for plate in peg {
            let width = (PLATE_MIN_WIDTH
                + *plate * (max_plate_width.saturating_sub(PLATE_MIN_WIDTH)) / total)
                .min(max_plate_width);
            let rect = Rect::new(
                x_center.saturating_sub(width / 2),
                y.saturating_sub(PLATE_HEIGHT),
                width,
                PLATE_HEIGHT,
            );
            gfx.fill_rect(rect, if selected { YELLOW } else { BLUE });
            gfx.rect_outline(rect, BLACK, 2);
            let label = plate.to_string();
            gfx.draw_text_centered(
                rect.center_x(),
                rect.center_y().saturating_sub(text_height(1) / 2),
                &label,
                BLACK,
                1,
            );
            y = y.saturating_sub(PLATE_HEIGHT + 2);
        }
    }
}

fn draw_result_stats(state: &GameState, content: Rect, gfx: &mut dyn Renderer2d) {
    if let Some((moves, secs)) = state.last_result {
        gfx.draw_text_centered(
            content.center_x(),
            content.y + 200,
            &format!("MOVES: {moves} / TIME: {secs}S"),
            BLACK,
            TEXT_SCALE,
        );
    }
}

fn draw_win(state: &GameState, size: SurfaceSize, gfx: &mut dyn Renderer2d) {
    let content = draw_content_box(size, gfx);
    gfx.draw_text_centered(
        content.center_x(),
        content.y + 50,
        "CONGRATULATIONS!",
        BLACK,
        TITLE_SCALE,
    );
    gfx.draw_text_centered(
        content.center_x(),
        content.y + 140,
        &format!("LEVEL {} COMPLETED", state.last_level + 1),
        BLACK,
        TEXT_SCALE,
    );
    draw_result_stats(state, content, gfx);

    let layout = result_layout(size);
    draw_button(gfx, layout.left_button, "BACK TO HOME", true);
    let next_unlocked = state.completed.is_unlocked(state.last_level + 1);
    draw_button(gfx, layout.right_button, "NEXT LEVEL", next_unlocked);
}

fn draw_timeout(state: &GameState, size: SurfaceSize, gfx: &mut dyn Renderer2d) {
    let content = draw_content_box(size, gfx);
    gfx.draw_text_centered(
        content.center_x(),
        content.y + 80,
        "TIME'S UP!",
        BLACK,
        TITLE_SCALE,
    );
    gfx.draw_text_centered(
        content.center_x(),
        content.y + 160,
        &format!("LEVEL {} FAILED", state.last_level + 1),
        BLACK,
        TEXT_SCALE,
    );
    draw_result_stats(state, content, gfx);

    let layout = result_layout(size);
    draw_button(gfx, layout.left_button, "RETRY", true);
    draw_button(gfx, layout.right_button, "EXIT", true);
}

fn draw_leaderboard(state: &GameState, size: SurfaceSize, gfx: &mut dyn Renderer2d) {
    let content = draw_content_box(size, gfx);
    gfx.draw_text_centered(
        content.center_x(),
        content.y + 30,
        "LEADERBOARD",
        BLACK,
        HEADING_SCALE,
    );

    let headers = ["NAME", "LEVEL", "MOVES", "TIME"];
    for (i, header) in headers.iter().enumerate() {
        gfx.draw_text(
            content.x + 80 + (i as u32) * 180,
            content.y + 90,
            header,
            BLACK,
        );
    }
    for (row, entry) in state.leaderboard.entries().iter().enumerate() {
        let y = content.y + 130 + (row as u32) * 30;
        let cells = [
            entry.name.clone(),
            entry.level.to_string(),
            entry.moves.to_string(),
            entry.seconds.to_string(),
        ];
        for (col, cell) in cells.iter().enumerate() {
            gfx.draw_text(content.x + 80 + (col as u32) * 180, y, cell, RED);
        }
    }

    let layout = leaderboard_layout(size);
    draw_button(gfx, layout.back, "< BACK", true);
    draw_button(gfx, layout.clear, "CLEAR LEADERBOARD", true);
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: SurfaceSize = SurfaceSize::new(1280, 720);

    #[test]
    fn content_rect_leaves_margins() {
        let content = content_rect(SIZE);
        assert!(content.x > 0 && content.y > 0);
        assert!(content.right() < SIZE.width);
        assert!(content.bottom() < SIZE.height);
    }

    #[test]
    fn home_buttons_fit_inside_the_content_box() {
        let content = content_rect(SIZE);
        for rect in home_layout(SIZE).buttons {
            assert!(rect.x >= content.x && rect.right() <= content.right());
        }
    }

    #[test]
    fn level_grid_has_one_rect_per_level() {
        let layout = level_select_layout(SIZE, 5);
        assert_eq!(layout.levels.len(), 5);
    }

    #[test]
    fn play_columns_cover_the_content_area() {
        let layout = play_layout(SIZE, 4);
        assert_eq!(layout.columns.area, content_rect(SIZE));
        assert_eq!(layout.columns.peg_count, 4);
    }

    #[test]
    fn max_peg_columns_scales_with_width() {
        let narrow = max_peg_columns(SurfaceSize::new(400, 300));
        let wide = max_peg_columns(SurfaceSize::new(1920, 1080));
        assert!(wide > narrow);
        assert!(narrow >= 1);
    }
}
