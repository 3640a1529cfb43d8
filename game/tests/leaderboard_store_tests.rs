use std::fs;

use plates::leaderboard::{Entry, Leaderboard, LeaderboardStore};

fn entry(name: &str, level: u32, moves: u32, seconds: u64) -> Entry {
    Entry {
        name: name.to_string(),
        level,
        moves,
        seconds,
    }
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::new(dir.path().join("leaderboard.txt"));

    let mut lb = Leaderboard::default();
    lb.submit(entry("alice", 1, 10, 50));
    lb.submit(entry("bob", 2, 4, 9));
    store.save(&lb).unwrap();

    assert_eq!(store.load(), lb);
}

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::new(dir.path().join("nope.txt"));
    assert!(store.load().is_empty());
}

#[test]
fn unreadable_path_degrades_to_empty() {
    // A directory where the file should be: reading fails, the game goes on.
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::new(dir.path().to_path_buf());
    assert!(store.load().is_empty());
}

#[test]
fn malformed_lines_are_dropped_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.txt");
    fs::write(
        &path,
        "alice,1,10,50\ngarbage line\nbob,1,not-a-number,3\ncarol,2,8,40\n",
    )
    .unwrap();

    let lb = LeaderboardStore::new(path).load();
    let names: Vec<&str> = lb.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["alice", "carol"]);
}

#[test]
fn save_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let store = LeaderboardStore::new(dir.path().join("nested/dir/leaderboard.txt"));

    let mut lb = Leaderboard::default();
    lb.submit(entry("alice", 1, 10, 50));
    store.save(&lb).unwrap();
    assert_eq!(store.load(), lb);
}

#[test]
fn file_format_is_one_comma_separated_entry_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.txt");
    let store = LeaderboardStore::new(path.clone());

    let mut lb = Leaderboard::default();
    lb.submit(entry("alice", 1, 10, 50));
    store.save(&lb).unwrap();

    assert_eq!(fs::read_to_string(path).unwrap(), "alice,1,10,50\n");
}

#[test]
fn clearing_rewrites_an_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaderboard.txt");
    let store = LeaderboardStore::new(path.clone());

    let mut lb = Leaderboard::default();
    lb.submit(entry("alice", 1, 10, 50));
    store.save(&lb).unwrap();

    lb.clear();
    store.save(&lb).unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), "");
    assert!(store.load().is_empty());
}
