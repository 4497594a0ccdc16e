//! Ports to the outside world: persisted records and feedback cues
//!
//! The session never touches files or audio directly. It reads and writes two
//! integers through a [`RecordStore`] and fires [`Cue`]s at a [`Feedback`]
//! sink. Both are infallible from the session's point of view; an
//! implementation that can fail is expected to log and carry on.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::types::{Cue, BEST_LEVEL_KEY, BEST_SCORE_KEY};

/// Key/value store of persisted integers. Missing keys read as 0.
pub trait RecordStore {
    fn read(&self, key: &str) -> u32;
    fn write(&mut self, key: &str, value: u32);
}

/// In-memory store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, u32>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn read(&self, key: &str) -> u32 {
        match self.values.lock() {
            Ok(values) => values.get(key).copied().unwrap_or(0),
            Err(poisoned) => poisoned.into_inner().get(key).copied().unwrap_or(0),
        }
    }

    fn write(&mut self, key: &str, value: u32) {
        let mut values = match self.values.lock() {
            Ok(values) => values,
            Err(poisoned) => poisoned.into_inner(),
        };
        values.insert(key.to_string(), value);
    }
}

/// Best endless result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestRecord {
    pub level: u32,
    pub score: u32,
}

impl BestRecord {
    pub fn load(store: &dyn RecordStore) -> Self {
        Self {
            level: store.read(BEST_LEVEL_KEY),
            score: store.read(BEST_SCORE_KEY),
        }
    }

    pub fn save(&self, store: &mut dyn RecordStore) {
        store.write(BEST_LEVEL_KEY, self.level);
        store.write(BEST_SCORE_KEY, self.score);
    }

    /// Fold a finished run into the record. Returns true if anything improved.
    pub fn merge(&mut self, level: u32, score: u32) -> bool {
        let improved = level > self.level || score > self.score;
        self.level = self.level.max(level);
        self.score = self.score.max(score);
        improved
    }
}

/// Fire-and-forget cue sink (sound, bell, haptics...).
pub trait Feedback {
    fn cue(&mut self, cue: Cue);
}

/// Feedback sink that ignores every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl Feedback for NullFeedback {
    fn cue(&mut self, _cue: Cue) {}
}

/// Feedback sink that remembers cues, for tests and replays.
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    cues: Arc<Mutex<Vec<Cue>>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues received so far, oldest first.
    pub fn cues(&self) -> Vec<Cue> {
        match self.cues.lock() {
            Ok(cues) => cues.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Feedback for RecordingFeedback {
    fn cue(&mut self, cue: Cue) {
        match self.cues.lock() {
            Ok(mut cues) => cues.push(cue),
            Err(poisoned) => poisoned.into_inner().push(cue),
        }
    }
}
