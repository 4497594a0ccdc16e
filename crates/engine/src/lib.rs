//! Engine layer - synchronous scheduling around the core session.
//!
//! The core never sleeps: it exposes `tick` and a two-phase match
//! (`handle_tap` then `commit_match`). This crate provides [`Driver`], a
//! single-owner host that converts elapsed milliseconds into those calls, so a
//! terminal loop, a replay tool or a test can run a game at any speed.

pub mod driver;

pub use tui_link_core as core;
pub use tui_link_types as types;

pub use driver::{Advance, Driver};
