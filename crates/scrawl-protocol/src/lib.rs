//! Wire protocol for Scrawl.
//!
//! This crate defines the "language" spoken between the browser client and
//! the game server:
//!
//! - **Types** ([`ClientCommand`], [`ServerEvent`], [`Player`], [`Stroke`],
//!   etc.) — the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong while doing so.
//!
//! The protocol layer sits between transport (raw frames) and the game
//! layers. It doesn't know about connections, rooms, or timers — it only
//! knows how to describe and (de)serialize messages.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientCommand, Phase, Player, PlayerId, Recipient, RoomCode,
    ServerEvent, Stroke,
};
