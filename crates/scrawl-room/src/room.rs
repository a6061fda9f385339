//! Room actor: an isolated Tokio task that owns one game.
//!
//! The actor serializes everything that can touch a room — player
//! commands, countdown ticks, delayed actions — through one `select!`
//! loop. The outside world talks to it through a [`RoomHandle`].

use std::collections::HashMap;

use scrawl_clock::{ClockEvent, RoomClock};
use scrawl_game::{
    CountdownKind, DeferredAction, GameConfig, GameRoom, Outcome,
};
use scrawl_protocol::{
    Phase, PlayerId, Recipient, RoomCode, ServerEvent, Stroke,
};
use tokio::sync::{mpsc, oneshot};

use crate::RoomError;

/// Channel sender for delivering events to one player's connection.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// An in-room command from a player, code already stripped by routing.
#[derive(Debug, Clone)]
pub enum RoomAction {
    /// Submit a drawing stroke.
    Stroke(Stroke),
    /// Wipe the canvas.
    ClearCanvas,
    /// Pick the word to draw.
    ChooseWord(String),
    /// Submit a guess (or chat, if it doesn't match).
    Guess(String),
}

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Register a player and their outbound channel.
    Join {
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Remove a player.
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Deliver a game action from a player.
    Action {
        sender: PlayerId,
        action: RoomAction,
    },

    /// Request room metadata.
    Info { reply: oneshot::Sender<RoomInfo> },

    /// Shut the room down.
    Shutdown,
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    /// The room's code.
    pub code: RoomCode,
    /// Current phase tag.
    pub phase: Phase,
    /// Current round number.
    pub round: u32,
    /// Number of players currently in the room.
    pub player_count: usize,
}

/// Handle to a running room actor. Cheap to clone — an `mpsc::Sender`
/// wrapper. The [`RoomRegistry`](crate::RoomRegistry) holds one per room.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// The room's code.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Registers a player in the room.
    pub async fn join(
        &self,
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player_id,
                name,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Removes a player from the room.
    pub async fn leave(&self, player_id: PlayerId) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Delivers a game action (fire-and-forget).
    pub async fn send_action(
        &self,
        sender: PlayerId,
        action: RoomAction,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Action { sender, action })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Requests current room metadata.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }
}

/// The internal room actor. Runs inside a Tokio task.
struct RoomActor {
    code: RoomCode,
    game: GameRoom,
    clock: RoomClock<CountdownKind, DeferredAction>,
    /// Per-player outbound channels.
    senders: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
    /// Where to announce our own code when the room is done.
    retired: mpsc::UnboundedSender<RoomCode>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(code = %self.code, "room actor started");

        loop {
            let stop = tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
                event = self.clock.next() => self.handle_clock(event),
            };
            if stop {
                break;
            }
        }

        tracing::info!(code = %self.code, "room actor stopped");
    }

    /// Returns `true` when the actor should stop.
    fn handle_command(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Join {
                player_id,
                name,
                sender,
                reply,
            } => {
                self.senders.insert(player_id, sender);
                tracing::info!(
                    code = %self.code,
                    %player_id,
                    players = self.game.player_count() + 1,
                    "player joined"
                );
                let outcome =
                    self.game.add_player(&mut rand::rng(), player_id, name);
                let _ = reply.send(Ok(()));
                self.apply(outcome)
            }
            RoomCommand::Leave { player_id, reply } => {
                if self.senders.remove(&player_id).is_none() {
                    let _ = reply.send(Err(RoomError::PlayerNotFound(
                        player_id,
                        self.code.clone(),
                    )));
                    return false;
                }
                tracing::info!(
                    code = %self.code,
                    %player_id,
                    players = self.game.player_count().saturating_sub(1),
                    "player left"
                );
                let outcome = self.game.remove_player(player_id);
                let _ = reply.send(Ok(()));
                self.apply(outcome)
            }
            RoomCommand::Action { sender, action } => {
                let outcome = match action {
                    RoomAction::Stroke(stroke) => {
                        self.game.submit_stroke(sender, stroke)
                    }
                    RoomAction::ClearCanvas => self.game.clear_canvas(sender),
                    RoomAction::ChooseWord(word) => {
                        self.game.choose_word(sender, word)
                    }
                    RoomAction::Guess(text) => self.game.guess(sender, &text),
                };
                self.apply(outcome)
            }
            RoomCommand::Info { reply } => {
                let _ = reply.send(RoomInfo {
                    code: self.code.clone(),
                    phase: self.game.phase(),
                    round: self.game.round(),
                    player_count: self.game.player_count(),
                });
                false
            }
            RoomCommand::Shutdown => {
                tracing::info!(code = %self.code, "room shutting down");
                true
            }
        }
    }

    /// Returns `true` when the actor should stop.
    fn handle_clock(
        &mut self,
        event: ClockEvent<CountdownKind, DeferredAction>,
    ) -> bool {
        let outcome = match event {
            ClockEvent::Tick(tick) => {
                self.game.tick(&mut rand::rng(), tick.kind, tick.remaining)
            }
            ClockEvent::Due(DeferredAction::EndRound) => self.game.end_round(),
            ClockEvent::Due(DeferredAction::NextRound) => {
                self.game.start_round(&mut rand::rng())
            }
            ClockEvent::Due(DeferredAction::Teardown) => {
                return self.retire();
            }
        };
        self.apply(outcome)
    }

    /// Delivers events and applies timer effects. Returns `true` when an
    /// effect retired the room.
    fn apply(&mut self, outcome: Outcome) -> bool {
        for (recipient, event) in outcome.events {
            self.dispatch(recipient, event);
        }

        for effect in outcome.effects {
            match effect {
                scrawl_game::Effect::StartCountdown { kind, seconds } => {
                    self.clock.start_countdown(kind, seconds);
                }
                scrawl_game::Effect::CancelCountdown => {
                    self.clock.cancel_countdown();
                }
                scrawl_game::Effect::Schedule { action, delay } => {
                    self.clock.schedule(action, delay);
                }
                scrawl_game::Effect::Retire => {
                    return self.retire();
                }
            }
        }

        false
    }

    /// Announces this room's code on the reaper channel and stops.
    fn retire(&mut self) -> bool {
        self.clock.cancel_all();
        let _ = self.retired.send(self.code.clone());
        tracing::info!(code = %self.code, "room retired");
        true
    }

    /// Sends an event to the right audience. A missing or closed channel
    /// means the player is already gone; the event is simply dropped.
    fn dispatch(&self, recipient: Recipient, event: ServerEvent) {
        match recipient {
            Recipient::All => {
                for sender in self.senders.values() {
                    let _ = sender.send(event.clone());
                }
            }
            Recipient::Player(player_id) => {
                if let Some(sender) = self.senders.get(&player_id) {
                    let _ = sender.send(event);
                }
            }
            Recipient::AllExcept(excluded) => {
                for (player_id, sender) in &self.senders {
                    if *player_id != excluded {
                        let _ = sender.send(event.clone());
                    }
                }
            }
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
///
/// `channel_size` bounds the command channel — senders wait when it
/// fills.
pub(crate) fn spawn_room(
    code: RoomCode,
    config: GameConfig,
    retired: mpsc::UnboundedSender<RoomCode>,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        code: code.clone(),
        game: GameRoom::new(config),
        clock: RoomClock::new(),
        senders: HashMap::new(),
        receiver: rx,
        retired,
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
