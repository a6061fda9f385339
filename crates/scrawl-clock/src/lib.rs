//! Per-room timing for Scrawl.
//!
//! Each room runs at most one 1 Hz countdown (the choosing or drawing
//! clock) and at most one delayed one-shot action (round-end grace, the
//! pause between rounds, teardown). [`RoomClock`] owns both and hands the
//! room actor a single future to `select!` on:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         event = clock.next() => match event {
//!             ClockEvent::Tick(tick) => { /* countdown second elapsed */ }
//!             ClockEvent::Due(action) => { /* delayed action fired */ }
//!         }
//!     }
//! }
//! ```
//!
//! # Idle behavior
//!
//! With nothing scheduled, [`RoomClock::next`] pends forever — `select!`
//! keeps processing the other branches. This is the correct shape for a
//! Waiting room that only reacts to player commands.
//!
//! # Supersession
//!
//! Starting a countdown replaces the running one and bumps a generation
//! counter; so does cancellation. A deadline that was superseded simply
//! no longer exists, so a stale timer can never act on a room that has
//! moved to a different phase. [`Tick`] carries the generation for
//! callers that want to assert this.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace};

/// One elapsed countdown second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick<K> {
    /// Which countdown this tick belongs to.
    pub kind: K,
    /// Whole seconds left after this tick. Zero means the countdown just
    /// finished and has torn itself down.
    pub remaining: u32,
    /// The clock generation that produced this tick.
    pub generation: u64,
}

/// What [`RoomClock::next`] resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent<K, A> {
    /// A countdown second elapsed.
    Tick(Tick<K>),
    /// A delayed one-shot action came due.
    Due(A),
}

#[derive(Debug)]
struct Countdown<K> {
    kind: K,
    remaining: u32,
    next: Instant,
    generation: u64,
}

#[derive(Debug)]
struct Pending<A> {
    action: A,
    at: Instant,
}

/// The timers of a single room. One per room actor; never shared.
#[derive(Debug)]
pub struct RoomClock<K, A> {
    countdown: Option<Countdown<K>>,
    pending: Option<Pending<A>>,
    generation: u64,
}

impl<K: Copy + std::fmt::Debug, A: Copy + std::fmt::Debug> RoomClock<K, A> {
    /// A clock with nothing scheduled.
    pub fn new() -> Self {
        Self {
            countdown: None,
            pending: None,
            generation: 0,
        }
    }

    /// Starts a 1 Hz countdown from `seconds`, replacing any countdown
    /// already running. The first tick fires one second from now.
    ///
    /// Returns the new generation.
    pub fn start_countdown(&mut self, kind: K, seconds: u32) -> u64 {
        self.generation += 1;
        self.countdown = Some(Countdown {
            kind,
            remaining: seconds,
            next: Instant::now() + Duration::from_secs(1),
            generation: self.generation,
        });
        debug!(?kind, seconds, generation = self.generation, "countdown started");
        self.generation
    }

    /// Stops the running countdown, if any. Idempotent.
    pub fn cancel_countdown(&mut self) {
        if self.countdown.take().is_some() {
            self.generation += 1;
            debug!(generation = self.generation, "countdown cancelled");
        }
    }

    /// Runs `action` after `delay`, replacing any pending action.
    pub fn schedule(&mut self, action: A, delay: Duration) {
        debug!(?action, ?delay, "action scheduled");
        self.pending = Some(Pending {
            action,
            at: Instant::now() + delay,
        });
    }

    /// Drops the countdown and any pending action.
    pub fn cancel_all(&mut self) {
        self.cancel_countdown();
        self.pending = None;
    }

    /// The kind of the running countdown, if one is running.
    pub fn active_kind(&self) -> Option<K> {
        self.countdown.as_ref().map(|c| c.kind)
    }

    /// Seconds left on the running countdown.
    pub fn remaining(&self) -> Option<u32> {
        self.countdown.as_ref().map(|c| c.remaining)
    }

    /// True when neither a countdown nor an action is scheduled.
    pub fn is_idle(&self) -> bool {
        self.countdown.is_none() && self.pending.is_none()
    }

    /// The current generation. Bumped on every start and cancel.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Resolves when the next tick or due action fires; pends forever
    /// while idle.
    ///
    /// When a tick and the pending action share a deadline, the action
    /// wins — a phase transition should land before another tick
    /// broadcast.
    pub async fn next(&mut self) -> ClockEvent<K, A> {
        let tick_at = self.countdown.as_ref().map(|c| c.next);
        let due_at = self.pending.as_ref().map(|p| p.at);

        let action_first = match (tick_at, due_at) {
            (None, None) => {
                std::future::pending::<()>().await;
                unreachable!()
            }
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (Some(t), Some(d)) => d <= t,
        };

        if action_first {
            // Checked above: pending is Some on this path.
            let at = match &self.pending {
                Some(p) => p.at,
                None => unreachable!(),
            };
            time::sleep_until(at).await;
            let action = match self.pending.take() {
                Some(p) => p.action,
                None => unreachable!(),
            };
            trace!(?action, "action due");
            return ClockEvent::Due(action);
        }

        // Checked above: countdown is Some on this path.
        let next = match &self.countdown {
            Some(c) => c.next,
            None => unreachable!(),
        };
        time::sleep_until(next).await;

        let tick = match &mut self.countdown {
            Some(c) => {
                c.remaining = c.remaining.saturating_sub(1);
                c.next += Duration::from_secs(1);
                Tick {
                    kind: c.kind,
                    remaining: c.remaining,
                    generation: c.generation,
                }
            }
            None => unreachable!(),
        };

        // The countdown tears itself down at zero; the transition it
        // triggers must not race another tick.
        if tick.remaining == 0 {
            self.countdown = None;
        }

        trace!(kind = ?tick.kind, remaining = tick.remaining, "tick");
        ClockEvent::Tick(tick)
    }
}

impl<K: Copy + std::fmt::Debug, A: Copy + std::fmt::Debug> Default
    for RoomClock<K, A>
{
    fn default() -> Self {
        Self::new()
    }
}
