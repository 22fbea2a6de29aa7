//! The unit of communication.

use std::fmt;

use calor_core::{Direction, Rank, StepId, HANDSHAKE_LEN};

/// What a message is for. Receivers match on `(source, tag)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Partition assignment, coordinator to worker.
    Handshake,
    /// A block of the initial field, coordinator to worker.
    Scatter,
    /// A block of the final field, worker to coordinator.
    Gather,
    /// Barrier arrival, worker to coordinator.
    Barrier,
    /// Barrier release, coordinator to worker.
    Release,
    /// Halo data travelling in the given direction: a block sends its
    /// right boundary as `Halo(Right)` and its right neighbor receives
    /// it into its left halo.
    Halo(Direction),
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handshake => f.write_str("handshake"),
            Self::Scatter => f.write_str("scatter"),
            Self::Gather => f.write_str("gather"),
            Self::Barrier => f.write_str("barrier"),
            Self::Release => f.write_str("release"),
            Self::Halo(dir) => write!(f, "halo({dir})"),
        }
    }
}

/// Message body.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// A partition assignment in wire form.
    Handshake([i64; HANDSHAKE_LEN]),
    /// Field values.
    Values(Vec<f32>),
    /// No data (barrier traffic).
    Empty,
}

impl Payload {
    /// Short name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Handshake(_) => "handshake",
            Self::Values(_) => "values",
            Self::Empty => "empty",
        }
    }
}

/// A message in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// Sending rank.
    pub source: Rank,
    /// Purpose of the message.
    pub tag: Tag,
    /// Step the message was sent in; [`StepId::PRIME`] outside the loop.
    pub step: StepId,
    /// Body.
    pub payload: Payload,
}
