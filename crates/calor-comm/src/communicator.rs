//! Point-to-point messaging between the workers of one world.
//!
//! A world of `W` workers is a set of `W` unbounded crossbeam channels;
//! every [`Communicator`] holds a sender to each inbox and the receiver
//! for its own. Sends never block. Receives match on `(source, tag)` and
//! stash anything else in arrival order, so messages from one sender
//! with one tag are always delivered in the order they were sent.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use indexmap::IndexMap;
use tracing::{debug, warn};

use calor_core::{Rank, StepId};

use crate::envelope::{Envelope, Payload, Tag};
use crate::error::ExchangeError;

/// Liveness timeout used when none is configured explicitly.
pub const DEFAULT_LIVENESS_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on one blocking poll of the inbox; the abort flag is
/// checked between polls.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Shared handle to the world-wide abort flag.
#[derive(Clone, Debug)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    /// Raise the flag. Every blocked receive in the world fails with
    /// [`ExchangeError::Aborted`] at its next poll.
    pub fn abort(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether the flag has been raised.
    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// One worker's endpoint.
///
/// Dropping a communicator without [`close`](Communicator::close) (for
/// example while unwinding from a panic) raises the abort flag.
pub struct Communicator {
    rank: Rank,
    outboxes: Arc<[Sender<Envelope>]>,
    inbox: Receiver<Envelope>,
    stash: IndexMap<(Rank, Tag), VecDeque<Envelope>>,
    abort: AbortHandle,
    liveness_timeout: Option<Duration>,
    closed: bool,
}

/// Build a world of `size` connected communicators, indexed by rank.
///
/// `liveness_timeout` bounds every blocking receive; `None` waits forever
/// (still subject to the abort flag).
pub fn world(size: usize, liveness_timeout: Option<Duration>) -> Vec<Communicator> {
    let (senders, receivers): (Vec<_>, Vec<_>) =
        (0..size).map(|_| crossbeam_channel::unbounded::<Envelope>()).unzip();
    let outboxes: Arc<[Sender<Envelope>]> = senders.into();
    let abort = AbortHandle {
        flag: Arc::new(AtomicBool::new(false)),
    };
    receivers
        .into_iter()
        .enumerate()
        .map(|(i, inbox)| Communicator {
            rank: Rank(i as u32),
            outboxes: Arc::clone(&outboxes),
            inbox,
            stash: IndexMap::new(),
            abort: abort.clone(),
            liveness_timeout,
            closed: false,
        })
        .collect()
}

impl Communicator {
    /// This worker's rank.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Number of workers in the world.
    pub fn size(&self) -> usize {
        self.outboxes.len()
    }

    /// Configured liveness timeout.
    pub fn liveness_timeout(&self) -> Option<Duration> {
        self.liveness_timeout
    }

    /// A handle to the world-wide abort flag.
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    /// Raise the world-wide abort flag.
    pub fn abort(&self) {
        if !self.abort.is_aborted() {
            warn!(rank = %self.rank, "raising world abort");
        }
        self.abort.abort();
    }

    /// Whether any worker has aborted the world.
    pub fn is_aborted(&self) -> bool {
        self.abort.is_aborted()
    }

    /// Number of messages received but not yet matched.
    pub fn stashed(&self) -> usize {
        self.stash.values().map(VecDeque::len).sum()
    }

    /// Send without blocking.
    pub fn send(
        &self,
        dest: Rank,
        tag: Tag,
        step: StepId,
        payload: Payload,
    ) -> Result<(), ExchangeError> {
        let outbox = self
            .outboxes
            .get(dest.index())
            .ok_or(ExchangeError::NoSuchPeer {
                rank: self.rank,
                peer: dest,
            })?;
        let envelope = Envelope {
            source: self.rank,
            tag,
            step,
            payload,
        };
        outbox.send(envelope).map_err(|_| ExchangeError::PeerLost {
            rank: self.rank,
            peer: dest,
        })
    }

    /// Block until a message from `source` with `tag` arrives.
    ///
    /// Fails with [`ExchangeError::Aborted`] if the world is aborted and
    /// with [`ExchangeError::Stalled`] once the liveness timeout elapses.
    pub fn recv(&mut self, source: Rank, tag: Tag) -> Result<Envelope, ExchangeError> {
        if let Some(env) = self
            .stash
            .get_mut(&(source, tag))
            .and_then(VecDeque::pop_front)
        {
            return Ok(env);
        }
        if source.index() >= self.size() {
            return Err(ExchangeError::NoSuchPeer {
                rank: self.rank,
                peer: source,
            });
        }

        let started = Instant::now();
        loop {
            if self.abort.is_aborted() {
                return Err(ExchangeError::Aborted { rank: self.rank });
            }
            let waited = started.elapsed();
            let slice = match self.liveness_timeout {
                Some(limit) if waited >= limit => {
                    warn!(rank = %self.rank, peer = %source, %tag, ?waited, "receive stalled");
                    return Err(ExchangeError::Stalled {
                        rank: self.rank,
                        peer: source,
                        tag,
                        waited,
                    });
                }
                Some(limit) => POLL_INTERVAL.min(limit - waited),
                None => POLL_INTERVAL,
            };
            match self.inbox.recv_timeout(slice) {
                Ok(env) if env.source == source && env.tag == tag => return Ok(env),
                Ok(env) => {
                    debug!(rank = %self.rank, from = %env.source, tag = %env.tag, "stashing");
                    self.stash
                        .entry((env.source, env.tag))
                        .or_default()
                        .push_back(env);
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(ExchangeError::PeerLost {
                        rank: self.rank,
                        peer: source,
                    });
                }
            }
        }
    }

    /// Receive a [`Payload::Values`] of exactly `len` values.
    pub fn recv_values(
        &mut self,
        source: Rank,
        tag: Tag,
        len: usize,
    ) -> Result<(StepId, Vec<f32>), ExchangeError> {
        let env = self.recv(source, tag)?;
        match env.payload {
            Payload::Values(values) if values.len() == len => Ok((env.step, values)),
            Payload::Values(values) => Err(ExchangeError::PayloadLength {
                peer: source,
                tag,
                expected: len,
                got: values.len(),
            }),
            other => Err(ExchangeError::UnexpectedPayload {
                peer: source,
                tag,
                got: other.kind(),
            }),
        }
    }

    /// Mark a clean shutdown so dropping does not abort the world.
    pub fn close(mut self) {
        self.closed = true;
    }
}

impl Drop for Communicator {
    fn drop(&mut self) {
        if !self.closed && !self.abort.is_aborted() {
            warn!(rank = %self.rank, "communicator dropped without close");
            self.abort.abort();
        }
    }
}

impl std::fmt::Debug for Communicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Communicator")
            .field("rank", &self.rank)
            .field("size", &self.size())
            .field("stashed", &self.stashed())
            .field("liveness_timeout", &self.liveness_timeout)
            .finish()
    }
}
