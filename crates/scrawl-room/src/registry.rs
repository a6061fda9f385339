//! Room registry: creates rooms, generates codes, and routes players.

use std::collections::HashMap;

use rand::Rng;
use scrawl_game::GameConfig;
use scrawl_protocol::{PlayerId, RoomCode};
use tokio::sync::mpsc;

use crate::room::{spawn_room, PlayerSender, RoomAction, RoomHandle};
use crate::RoomError;

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Tracks all active rooms and which player is in which room.
///
/// This is the entry point for room operations from the connection
/// layer. Retired rooms announce their code on the channel handed to
/// [`RoomRegistry::new`]; the owner is expected to call
/// [`RoomRegistry::delete_room`] when a code arrives.
pub struct RoomRegistry {
    /// Active rooms, keyed by code.
    rooms: HashMap<RoomCode, RoomHandle>,

    /// Maps each player to the room they're currently in.
    /// A player can be in at most ONE room at a time (key invariant).
    player_rooms: HashMap<PlayerId, RoomCode>,

    /// Game configuration applied to every new room.
    config: GameConfig,

    /// Handed to each room actor so it can announce its own retirement.
    retired: mpsc::UnboundedSender<RoomCode>,
}

impl RoomRegistry {
    /// Creates an empty registry. Rooms that finish (or empty out) send
    /// their code on `retired`.
    pub fn new(
        config: GameConfig,
        retired: mpsc::UnboundedSender<RoomCode>,
    ) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            config,
            retired,
        }
    }

    /// Creates a new room with a fresh code and returns the code.
    pub fn create_room(&mut self) -> RoomCode {
        let code = self.generate_code();
        let handle = spawn_room(
            code.clone(),
            self.config.clone(),
            self.retired.clone(),
            DEFAULT_CHANNEL_SIZE,
        );
        self.rooms.insert(code.clone(), handle);
        tracing::info!(%code, rooms = self.rooms.len(), "room created");
        code
    }

    /// Picks a random code not currently in use. With a 36^4 space,
    /// collisions are rare; retry until one is free.
    fn generate_code(&self) -> RoomCode {
        let mut rng = rand::rng();
        loop {
            let raw: String = (0..RoomCode::LEN)
                .map(|_| {
                    let idx = rng.random_range(0..RoomCode::CHARSET.len());
                    RoomCode::CHARSET[idx] as char
                })
                .collect();
            let code = RoomCode::new(raw);
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    /// Adds a player to a room.
    ///
    /// A player can be in at most one room; a join to the room they are
    /// already in is treated as a resync and passed through.
    pub async fn join_room(
        &mut self,
        player_id: PlayerId,
        code: &RoomCode,
        name: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        if let Some(current) = self.player_rooms.get(&player_id) {
            if current != code {
                return Err(RoomError::AlreadyInRoom(
                    player_id,
                    current.clone(),
                ));
            }
        }

        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        handle.join(player_id, name, sender).await?;
        self.player_rooms.insert(player_id, code.clone());
        Ok(())
    }

    /// Removes a player from whatever room they're in. A no-op result
    /// error if they're in none.
    pub async fn leave_room(
        &mut self,
        player_id: PlayerId,
    ) -> Result<(), RoomError> {
        let code = self
            .player_rooms
            .remove(&player_id)
            .ok_or(RoomError::NotInRoom(player_id))?;

        if let Some(handle) = self.rooms.get(&code) {
            handle.leave(player_id).await?;
        }
        Ok(())
    }

    /// Routes a game action to the room the player addressed.
    ///
    /// The action is only forwarded when the player actually is in that
    /// room; a stale or forged code gets [`RoomError::NotFound`].
    pub async fn route(
        &self,
        player_id: PlayerId,
        code: &RoomCode,
        action: RoomAction,
    ) -> Result<(), RoomError> {
        match self.player_rooms.get(&player_id) {
            Some(current) if current == code => {}
            _ => return Err(RoomError::NotFound(code.clone())),
        }

        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        handle.send_action(player_id, action).await
    }

    /// Drops a retired room and purges its players from the index.
    /// Idempotent; a code that was already deleted is ignored.
    pub fn delete_room(&mut self, code: &RoomCode) {
        if self.rooms.remove(code).is_none() {
            return;
        }
        self.player_rooms.retain(|_, c| c != code);
        tracing::info!(%code, rooms = self.rooms.len(), "room deleted");
    }

    /// The room a player is currently in, if any.
    pub fn player_room(&self, player_id: PlayerId) -> Option<&RoomCode> {
        self.player_rooms.get(&player_id)
    }

    /// Handle for a room, if it exists.
    pub fn room(&self, code: &RoomCode) -> Option<&RoomHandle> {
        self.rooms.get(code)
    }

    /// Number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
