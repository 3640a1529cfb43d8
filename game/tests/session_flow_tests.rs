//! Scripted end-to-end sessions driven through the app update loop with
//! synthetic pointer/keyboard events and a controlled clock.

use std::time::{Duration, Instant};

use engine::app::{AppEvent, VirtualKeyCode};
use engine::graphics::SurfaceSize;
use engine::ui::Rect;

use plates::app::PlatesApp;
use plates::leaderboard::LeaderboardStore;
use plates::screen::Screen;
use plates::settings::PlayerSettings;
use plates::sfx::AudioEvent;
use plates::ui;

const SIZE: SurfaceSize = SurfaceSize::new(1280, 720);

fn click(rect: Rect) -> AppEvent {
    AppEvent::PointerDown {
        x: rect.center_x(),
        y: rect.center_y(),
    }
}

fn click_peg(peg: usize, peg_count: usize) -> AppEvent {
    let columns = ui::play_layout(SIZE, peg_count).columns;
    AppEvent::PointerDown {
        x: columns.column_center_x(peg),
        y: columns.area.bottom() - 60,
    }
}

fn key(code: VirtualKeyCode) -> AppEvent {
    AppEvent::KeyDown(code)
}

fn type_name(name: &str) -> Vec<AppEvent> {
    let mut events: Vec<AppEvent> = name.chars().map(AppEvent::Char).collect();
    events.push(key(VirtualKeyCode::Return));
    events
}

fn new_app(dir: &tempfile::TempDir) -> PlatesApp {
    let settings = PlayerSettings::default();
    let store = LeaderboardStore::new(dir.path().join("leaderboard.txt"));
    PlatesApp::with_store(settings, store, 42)
}

/// Splash -> name prompt -> home.
fn reach_home(app: &mut PlatesApp, t0: Instant) {
    app.update(&[click(ui::start_layout(SIZE).start_button)], t0, SIZE);
    assert_eq!(app.state().screen, Screen::NamePrompt);

    app.update(&type_name("ada"), t0, SIZE);
    assert_eq!(app.state().screen, Screen::Home);
    assert_eq!(app.state().player_name, "ada");
}

/// Home -> playing level 0.
fn reach_playing(app: &mut PlatesApp, t0: Instant) {
    let home = ui::home_layout(SIZE);
    app.update(&[click(home.buttons[0])], t0, SIZE);
    assert_eq!(app.state().screen, Screen::Playing { paused: false });
    let session = app.state().session.as_ref().expect("session started");
    assert_eq!(session.level_index(), 0);
    assert_eq!(session.puzzle().total_plates(), 4);
}

#[test]
fn winning_a_level_unlocks_submits_and_advances() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = new_app(&dir);
    let t0 = Instant::now();

    reach_home(&mut app, t0);
    reach_playing(&mut app, t0);

    // Put the board one legal move from victory.
    app.session_mut()
        .unwrap()
        .puzzle_mut()
        .set_pegs_for_test(vec![vec![1, 2, 3], vec![4], vec![]]);

    let out = app.update(
        &[click_peg(1, 3), click_peg(0, 3)],
        t0 + Duration::from_secs(12),
        SIZE,
    );

    assert_eq!(app.state().screen, Screen::Win);
    assert!(out.audio.contains(&AudioEvent::Move));
    assert!(out.audio.contains(&AudioEvent::Win));
    assert_eq!(app.state().last_result, Some((1, 12)));

    // Winning unlocks the level itself and the next one.
    assert!(app.state().completed.is_unlocked(0));
    assert!(app.state().completed.is_unlocked(1));
    assert!(!app.state().completed.is_unlocked(2));

    // The attempt is on the leaderboard (1-based level) and on disk.
    let entries = app.leaderboard().entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "ada");
    assert_eq!(entries[0].level, 1);
    assert_eq!(entries[0].moves, 1);
    let saved = std::fs::read_to_string(dir.path().join("leaderboard.txt")).unwrap();
    assert_eq!(saved, "ada,1,1,12\n");

    // "Next Level" starts level 1 with its bigger board.
    app.update(
        &[click(ui::result_layout(SIZE).right_button)],
        t0 + Duration::from_secs(13),
        SIZE,
    );
    assert_eq!(app.state().screen, Screen::Playing { paused: false });
    let session = app.state().session.as_ref().unwrap();
    assert_eq!(session.level_index(), 1);
    assert_eq!(session.puzzle().total_plates(), 6);
}

#[test]
fn running_out_of_time_reaches_timeout_and_retry_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = new_app(&dir);
    let t0 = Instant::now();

    reach_home(&mut app, t0);
    reach_playing(&mut app, t0);

    // Level 0 allows 45 seconds. One second short: still playing.
    app.update(&[], t0 + Duration::from_secs(44), SIZE);
    assert_eq!(app.state().screen, Screen::Playing { paused: false });

    let out = app.update(&[], t0 + Duration::from_secs(45), SIZE);
    assert_eq!(app.state().screen, Screen::Timeout);
    assert!(out.audio.contains(&AudioEvent::MusicStop));
    assert!(out.audio.contains(&AudioEvent::Timeout));
    assert!(app.state().session.is_none());

    // Retry deals the same level again with a fresh clock.
    let t1 = t0 + Duration::from_secs(50);
    let out = app.update(&[click(ui::result_layout(SIZE).left_button)], t1, SIZE);
    assert_eq!(app.state().screen, Screen::Playing { paused: false });
    assert!(out.audio.contains(&AudioEvent::MusicLoopStart));
    let session = app.state().session.as_ref().unwrap();
    assert_eq!(session.level_index(), 0);
    assert_eq!(session.remaining_secs(t1), 45);
}

#[test]
fn pausing_freezes_gameplay_and_the_clock() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = new_app(&dir);
    let t0 = Instant::now();

    reach_home(&mut app, t0);
    reach_playing(&mut app, t0);

    let pause_button = ui::play_layout(SIZE, 3).pause;
    let out = app.update(&[click(pause_button)], t0 + Duration::from_secs(10), SIZE);
    assert_eq!(app.state().screen, Screen::Playing { paused: true });
    assert!(out.audio.contains(&AudioEvent::MusicPause));

    // Clicks on pegs and the timer are inert while paused, even far past the
    // time limit.
    app.update(&[click_peg(0, 3)], t0 + Duration::from_secs(500), SIZE);
    assert_eq!(app.state().screen, Screen::Playing { paused: true });
    assert_eq!(app.state().selection.selected(), None);
    assert_eq!(app.state().session.as_ref().unwrap().puzzle().moves(), 0);

    // Resume at t0+1000: the 990 paused seconds never count as play time.
    let out = app.update(&[click(pause_button)], t0 + Duration::from_secs(1000), SIZE);
    assert_eq!(app.state().screen, Screen::Playing { paused: false });
    assert!(out.audio.contains(&AudioEvent::MusicResume));

    app.update(&[], t0 + Duration::from_secs(1030), SIZE);
    assert_eq!(app.state().screen, Screen::Playing { paused: false });

    app.update(&[], t0 + Duration::from_secs(1036), SIZE);
    assert_eq!(app.state().screen, Screen::Timeout);
}

#[test]
fn undo_key_reverts_the_last_move_for_a_fee() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = new_app(&dir);
    let t0 = Instant::now();

    reach_home(&mut app, t0);
    reach_playing(&mut app, t0);

    app.session_mut()
        .unwrap()
        .puzzle_mut()
        .set_pegs_for_test(vec![vec![1, 2], vec![3], vec![4]]);

    app.update(&[click_peg(1, 3), click_peg(0, 3)], t0, SIZE);
    let session = app.state().session.as_ref().unwrap();
    assert_eq!(session.puzzle().peg(0).unwrap(), &[1, 2, 3]);
    assert_eq!(session.puzzle().moves(), 1);

    let out = app.update(&[key(VirtualKeyCode::Z)], t0, SIZE);
    let session = app.state().session.as_ref().unwrap();
    assert_eq!(session.puzzle().peg(0).unwrap(), &[1, 2]);
    assert_eq!(session.puzzle().peg(1).unwrap(), &[3]);
    assert_eq!(session.puzzle().moves(), 2);
    assert!(out.audio.contains(&AudioEvent::Move));
}

#[test]
fn short_names_are_rejected_inline() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = new_app(&dir);
    let t0 = Instant::now();

    app.update(&[click(ui::start_layout(SIZE).start_button)], t0, SIZE);
    app.update(&type_name("a"), t0, SIZE);

    assert_eq!(app.state().screen, Screen::NamePrompt);
    assert!(app.state().name_input.error().is_some());

    // Typing more letters clears the error and lets the player through.
    app.update(&type_name("da"), t0, SIZE);
    assert_eq!(app.state().screen, Screen::Home);
    assert_eq!(app.state().player_name, "ada");
}

#[test]
fn locked_levels_ignore_clicks_on_the_level_grid() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = new_app(&dir);
    let t0 = Instant::now();

    reach_home(&mut app, t0);

    let home = ui::home_layout(SIZE);
    app.update(&[click(home.buttons[1])], t0, SIZE);
    assert_eq!(app.state().screen, Screen::LevelSelect);

    let grid = ui::level_select_layout(SIZE, 5);
    app.update(&[click(grid.levels[2])], t0, SIZE);
    assert_eq!(app.state().screen, Screen::LevelSelect);

    // Level 1 (index 0) is unlocked by default.
    app.update(&[click(grid.levels[0])], t0, SIZE);
    assert_eq!(app.state().screen, Screen::Playing { paused: false });
}

#[test]
fn escape_quits_from_anywhere() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = new_app(&dir);
    let t0 = Instant::now();

    let out = app.update(&[key(VirtualKeyCode::Escape)], t0, SIZE);
    assert!(out.exit);
}

#[test]
fn back_from_play_returns_home_and_drops_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = new_app(&dir);
    let t0 = Instant::now();

    reach_home(&mut app, t0);
    reach_playing(&mut app, t0);

    let back = ui::play_layout(SIZE, 3).back;
    app.update(&[click(back)], t0, SIZE);
    assert_eq!(app.state().screen, Screen::Home);
    assert!(app.state().session.is_none());
}
