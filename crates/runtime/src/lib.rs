//! Async hosting for a puzzle session.
//!
//! - [`config`]: environment configuration
//! - [`store`]: JSON file record store
//! - [`actor`]: tokio task owning a session

pub mod actor;
pub mod config;
pub mod store;

pub use tui_link_core as core;
pub use tui_link_types as types;

pub use actor::SessionHandle;
pub use config::RuntimeConfig;
pub use store::JsonFileStore;
