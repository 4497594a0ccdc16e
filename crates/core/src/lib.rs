//! Core rules engine - pure, deterministic, and testable
//!
//! This crate contains the board, the connectivity solver and the session
//! state machine of the connect-the-pair puzzle. It does no rendering, no
//! file or terminal I/O and keeps no global state:
//!
//! - **Deterministic**: every random choice draws from a seeded [`SimpleRng`]
//! - **Testable**: the reveal/commit split lets tests play without real time
//! - **Portable**: persistence and feedback are ports ([`RecordStore`], [`Feedback`])
//!
//! # Module Structure
//!
//! - [`board`]: padded 7x16 grid with its empty border corridor
//! - [`path`]: breadth-first search with at most two turns
//! - [`rules`]: identity and tagged-pair matching
//! - [`compact`]: the eight post-removal fall styles
//! - [`generate`]: shuffled, clustered and tagged layouts
//! - [`deadlock`]: move detection and reshuffle-until-playable
//! - [`progression`]: base time, hints, fall style and names per level
//! - [`records`]: best-record store and feedback ports
//! - [`session`]: the level/mode state machine
//! - [`snapshot`]: pull-based view of a session
//!
//! # Example
//!
//! ```
//! use tui_link_core::{Board, Session};
//! use tui_link_types::{Mode, TapOutcome};
//!
//! let mut session = Session::new(Mode::ClassicEasy, 12345);
//! session.start();
//! session.load_board(
//!     Board::parse(
//!         "tile_001 .        .        tile_001
//!          tile_002 .        .        tile_002",
//!     )
//!     .unwrap(),
//! );
//!
//! assert_eq!(session.handle_tap(1, 1), TapOutcome::Selected);
//! assert_eq!(session.handle_tap(1, 4), TapOutcome::MatchPending);
//! assert!(session.commit_match());
//! assert_eq!(session.score(), 10);
//! assert_eq!(session.pairs_left(), 1);
//! ```
//!
//! # Timing
//!
//! The core never sleeps. A host calls [`Session::tick`] once per second and
//! [`Session::commit_match`] once a revealed path has been shown. See the
//! engine and runtime crates for ready-made hosts.

pub mod board;
pub mod compact;
pub mod deadlock;
pub mod generate;
pub mod path;
pub mod progression;
pub mod records;
pub mod rng;
pub mod rules;
pub mod session;
pub mod snapshot;

pub use tui_link_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use compact::compact;
pub use deadlock::{DeadlockResolver, ShuffleOutcome};
pub use generate::{BoardGenerator, Layout};
pub use path::{can_connect, can_connect_with, count_turns, find_path, find_path_with, Path, PathScratch};
pub use records::{BestRecord, Feedback, MemoryStore, NullFeedback, RecordStore, RecordingFeedback};
pub use rng::SimpleRng;
pub use rules::{GroupKey, MatchRule};
pub use session::Session;
pub use snapshot::SessionSnapshot;
