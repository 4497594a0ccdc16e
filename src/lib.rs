//! TUI Link (workspace facade crate).
//!
//! Re-exports the workspace crates as `tui_link::{core, engine, input,
//! runtime, term, types}` while the implementation lives under `crates/`.

pub use tui_link_core as core;
pub use tui_link_engine as engine;
pub use tui_link_input as input;
pub use tui_link_runtime as runtime;
pub use tui_link_term as term;
pub use tui_link_types as types;
