use std::time::Duration;

use tokio_test::assert_ok;

use tui_link::core::{Board, Session};
use tui_link::runtime::{JsonFileStore, SessionHandle};
use tui_link::types::{FailReason, Mode, SessionAction, SessionEvent};

#[tokio::test(start_paused = true)]
async fn handle_runs_a_level_to_time_up() {
    let handle = SessionHandle::spawn(Session::new(Mode::ClassicEasy, 99), 250);
    tokio::time::sleep(Duration::from_secs(121)).await;

    let snap = assert_ok!(handle.snapshot().await);
    assert_eq!(snap.time_left, 0);
    assert_eq!(snap.failed, Some(FailReason::TimeUp));
    assert!(!snap.timer_running);

    assert!(!assert_ok!(handle.apply(SessionAction::Hint).await));
    assert!(assert_ok!(handle.apply(SessionAction::Restart).await));
    assert_eq!(assert_ok!(handle.snapshot().await).time_left, 120);
    assert_ok!(handle.shutdown().await);
}

#[tokio::test(start_paused = true)]
async fn endless_clear_through_the_handle_saves_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");

    let mut session = Session::new(Mode::Endless, 5).with_store(JsonFileStore::open(&path));
    session.start();
    session.load_board(Board::parse("tile_001 tile_001").unwrap());

    let handle = SessionHandle::spawn(session, 250);
    handle.send(SessionAction::Tap { row: 1, col: 1 }).await.unwrap();
    handle.send(SessionAction::Tap { row: 1, col: 2 }).await.unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;

    let events = assert_ok!(handle.drain_events().await);
    assert!(events.contains(&SessionEvent::LevelCleared { level: 1, score: 130 }));
    assert!(events.contains(&SessionEvent::BestRecordUpdated { level: 1, score: 130 }));

    let session = assert_ok!(handle.shutdown().await);
    assert!(session.cleared());
    let reopened = JsonFileStore::open(&path);
    assert_eq!(
        tui_link::core::BestRecord::load(&reopened),
        tui_link::core::BestRecord { level: 1, score: 130 }
    );
}
