//! Exchange error types.

use std::time::Duration;

use calor_core::{Direction, Rank, StepId, WireError};
use calor_decomp::DecompError;
use calor_grid::GridError;

use crate::descriptor::TransferKind;
use crate::envelope::Tag;

/// Errors from point-to-point messaging, halo transfers, and collectives.
///
/// None of these are recoverable mid-run: the caller is expected to
/// abort the world and fail.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExchangeError {
    /// A receive waited longer than the liveness timeout.
    #[error("rank {rank} stalled: no {tag} from rank {peer} after {waited:?}")]
    Stalled {
        /// The waiting rank.
        rank: Rank,
        /// The rank it was waiting on.
        peer: Rank,
        /// The expected tag.
        tag: Tag,
        /// How long it waited.
        waited: Duration,
    },
    /// A peer's inbox is gone.
    #[error("rank {rank} lost contact with rank {peer}")]
    PeerLost {
        /// The local rank.
        rank: Rank,
        /// The unreachable peer.
        peer: Rank,
    },
    /// Another worker failed and raised the abort flag.
    #[error("rank {rank} aborted: another worker failed")]
    Aborted {
        /// The local rank.
        rank: Rank,
    },
    /// A message was addressed to a rank outside the world.
    #[error("rank {rank} addressed rank {peer}, which does not exist")]
    NoSuchPeer {
        /// The local rank.
        rank: Rank,
        /// The requested peer.
        peer: Rank,
    },
    /// A halo message belonged to a different step.
    #[error("{tag} from rank {peer} carries step {got}, expected step {expected}")]
    OutOfOrder {
        /// Sending rank.
        peer: Rank,
        /// Message tag.
        tag: Tag,
        /// Step the receiver is in.
        expected: StepId,
        /// Step the message was sent in.
        got: StepId,
    },
    /// A message carried the wrong kind of payload.
    #[error("{tag} from rank {peer} carried a {got} payload")]
    UnexpectedPayload {
        /// Sending rank.
        peer: Rank,
        /// Message tag.
        tag: Tag,
        /// Kind of payload received.
        got: &'static str,
    },
    /// A message carried the wrong number of values.
    #[error("{tag} from rank {peer} carried {got} values, expected {expected}")]
    PayloadLength {
        /// Sending rank.
        peer: Rank,
        /// Message tag.
        tag: Tag,
        /// Values the receiver expects.
        expected: usize,
        /// Values received.
        got: usize,
    },
    /// A descriptor was started while already in flight.
    #[error("{kind} descriptor for edge {direction} started while active")]
    DescriptorBusy {
        /// Edge of the descriptor.
        direction: Direction,
        /// Send or receive.
        kind: TransferKind,
    },
    /// Descriptors were released with transfers still in flight.
    #[error("rank {rank} released {active} transfer descriptors while active")]
    ReleasedWhileActive {
        /// The local rank.
        rank: Rank,
        /// Number of descriptors still active.
        active: usize,
    },
    /// The partition handshake could not be decoded.
    #[error("bad partition handshake: {0}")]
    Handshake(#[from] WireError),
    /// A block did not fit its buffer.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Scatter or gather could not map a block.
    #[error(transparent)]
    Decomp(#[from] DecompError),
}
