//! Terminal bell feedback.

use std::io::{self, Write};

use crate::core::Feedback;
use crate::types::Cue;

/// Rings the terminal bell on every successful match.
#[derive(Debug)]
pub struct BellFeedback<W: Write = io::Stdout> {
    out: W,
}

impl BellFeedback {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> BellFeedback<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Feedback for BellFeedback<W> {
    fn cue(&mut self, cue: Cue) {
        if cue == Cue::Match {
            // A lost bell is not worth interrupting play for.
            let _ = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
        }
    }
}
