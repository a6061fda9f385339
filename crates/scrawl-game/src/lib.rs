//! Phase engine for Scrawl.
//!
//! This crate is the game itself: the state machine that drives a room
//! through waiting → choosing → drawing → roundEnd → (next round or game
//! end), plus the word bank and scoring rules.
//!
//! The engine is deliberately pure. Every operation on [`GameRoom`]
//! returns an [`Outcome`]: the events to deliver (paired with a
//! [`Recipient`](scrawl_protocol::Recipient)) and the [`Effect`]s the
//! caller must apply to its timers. The engine never touches a socket or
//! a clock, which is what makes the whole state machine testable with
//! nothing but a seeded RNG.
//!
//! # Key types
//!
//! - [`GameRoom`] — per-room game state and all transitions
//! - [`Outcome`] / [`Effect`] — what a transition wants to happen
//! - [`GameConfig`] — round count and countdown durations
//! - [`words`] — the static categorized vocabulary

mod config;
mod state;
pub mod words;

pub use config::GameConfig;
pub use state::{
    CountdownKind, DeferredAction, Effect, GameRoom, Outcome, PhaseState,
    WORD_CHOICES, guess_score,
};
