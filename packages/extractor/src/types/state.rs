//! Continuation state: the opaque checkpoint a handler attaches to a
//! response and expects back verbatim on the next call for the same session.
//!
//! The router and orchestrator never look inside a state value; only the
//! extractor operation that produced it interprets it. The union is closed
//! and serialized with an explicit tag rather than carrying loosely-typed
//! maps around.

use serde::{Deserialize, Serialize};

/// Checkpoint value threading a session's progress across round trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum State {
    /// A bare step counter, the common case.
    Plain { step: u32 },

    /// A step counter plus an intermediate identifier resolved in an earlier
    /// round (e.g. a channel id looked up from a vanity URL at step 0 and
    /// consumed at step 1).
    Resolved { step: u32, id: String },
}

impl State {
    /// State at the given bare step.
    pub fn plain(step: u32) -> Self {
        State::Plain { step }
    }

    /// State at the given step, carrying a resolved identifier.
    pub fn resolved(step: u32, id: impl Into<String>) -> Self {
        State::Resolved {
            step,
            id: id.into(),
        }
    }

    /// The step tag, whichever variant carries it.
    pub fn step(&self) -> u32 {
        match self {
            State::Plain { step } | State::Resolved { step, .. } => *step,
        }
    }
}
