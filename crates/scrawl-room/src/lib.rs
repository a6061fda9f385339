//! Room lifecycle for Scrawl.
//!
//! Each room runs as an isolated Tokio task (actor model) owning its game
//! state, its clock, and the outbound channels of its players. Commands,
//! countdown ticks, and delayed actions all serialize through the actor's
//! `select!` loop, so one room's state changes can never interleave.
//! Rooms stay concurrent with each other.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — creates, finds, and deletes rooms by code
//! - [`RoomHandle`] — sends commands to a running room actor
//! - [`RoomAction`] — the in-room commands a player can issue
//! - [`RoomInfo`] — metadata snapshot for diagnostics and tests

mod error;
mod registry;
mod room;

pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{PlayerSender, RoomAction, RoomHandle, RoomInfo};
