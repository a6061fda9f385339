//! Core protocol types for Scrawl's wire format.
//!
//! Everything here is serialized as internally tagged JSON with camelCase
//! tags and fields, matching what the browser client sends and expects:
//! `{"type":"joinRoom","code":"ABCD","name":"Alice"}`.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Ephemeral identifier for a connected player.
///
/// Assigned per connection when the socket is accepted; there is no
/// account identity behind it. `#[serde(transparent)]` makes it a plain
/// number on the wire, so clients can compare it against `drawerId`
/// without unwrapping an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Short code identifying a room — the broadcast routing key.
///
/// Four uppercase alphanumeric characters (A–Z, 0–9). Codes arriving from
/// clients are normalized to uppercase so "ab3d" joins "AB3D".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomCode(String);

impl RoomCode {
    /// Length of a generated room code.
    pub const LEN: usize = 4;

    /// Characters a generated room code is drawn from.
    pub const CHARSET: &'static [u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

    /// Wraps a code string, normalizing to uppercase.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_ascii_uppercase())
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Game data
// ---------------------------------------------------------------------------

/// A participant in a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    /// The player's connection identifier.
    pub id: PlayerId,
    /// Display name, supplied on join. Not unique.
    pub name: String,
    /// Accumulated score. Only ever increases within a game.
    pub score: u32,
    /// Always true once joined; kept for future lobby-ready flows.
    pub is_ready: bool,
}

impl Player {
    /// A freshly joined player with zero score.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            score: 0,
            is_ready: true,
        }
    }
}

/// One continuous pointer-drag gesture.
///
/// Points are normalized to [0,1]×[0,1] so every canvas size reproduces
/// the same path. Strokes are relayed verbatim — the server never rewrites
/// id, style, or point data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    /// Client-generated stroke identifier.
    pub id: String,
    /// CSS color string.
    pub color: String,
    /// Brush width in canvas-relative units.
    pub width: f32,
    /// Ordered (x, y) path, each coordinate in [0, 1].
    pub points: Vec<[f32; 2]>,
}

/// The stage a room is currently in, as shown on the wire.
///
/// This is only the tag; phase-specific data (candidate words, the secret
/// word) lives in the game engine and is never part of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Waiting,
    Choosing,
    Drawing,
    RoundEnd,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "waiting"),
            Self::Choosing => write!(f, "choosing"),
            Self::Drawing => write!(f, "drawing"),
            Self::RoundEnd => write!(f, "roundEnd"),
        }
    }
}

// ---------------------------------------------------------------------------
// Recipient — who should receive an event?
// ---------------------------------------------------------------------------

/// Specifies who should receive a server event.
///
/// The game engine returns `(Recipient, ServerEvent)` pairs; the room
/// actor resolves them against its live connections. `AllExcept` exists
/// for stroke relay — the drawer already rendered its own input locally,
/// so echoing it back would double-draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    /// Every player in the room.
    All,
    /// One specific player (private word reveal, candidate list).
    Player(PlayerId),
    /// Everyone except the given player (stroke relay).
    AllExcept(PlayerId),
}

// ---------------------------------------------------------------------------
// Commands (client → server)
// ---------------------------------------------------------------------------

/// Everything a client can ask the server to do.
///
/// Commands that act on a room carry the room code; the gateway uses it
/// (plus its player→room index) for routing, and the engine validates the
/// sender's authority. Unauthorized or mistimed commands are dropped
/// silently — they are expected races from stale clients, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientCommand {
    /// Create a new room. Acked with [`ServerEvent::RoomCreated`].
    CreateRoom,

    /// Join a room by code. Acked with a [`ServerEvent::RoomState`]
    /// snapshot, or [`ServerEvent::Error`] if the code is unknown.
    JoinRoom { code: RoomCode, name: String },

    /// Submit a drawing stroke (drawer only, Drawing phase only).
    Stroke { code: RoomCode, stroke: Stroke },

    /// Wipe the canvas (drawer only).
    ClearCanvas { code: RoomCode },

    /// Pick the word to draw (drawer only, Choosing phase only).
    ChooseWord { code: RoomCode, word: String },

    /// Submit a guess. Non-matching guesses become chat.
    Guess { code: RoomCode, guess: String },
}

// ---------------------------------------------------------------------------
// Events (server → client)
// ---------------------------------------------------------------------------

/// Everything the server can push to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerEvent {
    /// First event on every connection: tells the client its own id so it
    /// can recognize itself in rosters and as the drawer.
    Welcome { player_id: PlayerId },

    /// Ack for [`ClientCommand::CreateRoom`].
    RoomCreated { code: RoomCode },

    /// Full snapshot sent to a joining connection so it can resynchronize
    /// regardless of when it joined. Never includes the secret word.
    RoomState {
        players: Vec<Player>,
        strokes: Vec<Stroke>,
        drawer_id: Option<PlayerId>,
        phase: Phase,
        round: u32,
        max_rounds: u32,
    },

    /// Roster update, broadcast on every join and leave.
    UpdatePlayers { players: Vec<Player> },

    /// A new round has begun; the named player is choosing a word.
    RoundStart {
        drawer_id: PlayerId,
        round: u32,
        phase: Phase,
        max_rounds: u32,
    },

    /// Private to the drawer: the candidate words to pick from.
    ChooseWord { words: Vec<String> },

    /// Private to the drawer: the word actually in play.
    YourWord { word: String },

    /// The drawing phase started. The word is withheld.
    DrawingStart { drawer_id: PlayerId },

    /// Countdown tick, whole seconds remaining.
    Timer { seconds: u32 },

    /// Stroke relay to everyone but its author.
    Stroke { stroke: Stroke },

    /// The canvas was cleared.
    ClearCanvas,

    /// A player guessed the word.
    CorrectGuess {
        player_id: PlayerId,
        name: String,
        guess: String,
        score: u32,
        time_left: u32,
    },

    /// An ordinary chat message (any guess that didn't score).
    Chat {
        id: PlayerId,
        name: String,
        message: String,
    },

    /// The round is over: word revealed, scores settled.
    RoundEnd {
        word: String,
        drawer_id: Option<PlayerId>,
        guessed_players: Vec<PlayerId>,
        scores: Vec<Player>,
    },

    /// The game is over. `scores` is sorted descending.
    GameEnd { winner: Player, scores: Vec<Player> },

    /// An explicit failure (unknown room, unregistered player).
    /// `code` follows HTTP conventions.
    Error { code: u16, message: String },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The browser client expects exact JSON shapes. These tests pin the
    //! serde attributes that produce them — a mismatch here means the
    //! client silently drops events.

    use super::*;

    fn stroke() -> Stroke {
        Stroke {
            id: "s-1".into(),
            color: "#ff0000".into(),
            width: 4.0,
            points: vec![[0.1, 0.2], [0.3, 0.4]],
        }
    }

    // =====================================================================
    // Identity types
    // =====================================================================

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
    }

    #[test]
    fn test_room_code_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoomCode::new("AB3D")).unwrap();
        assert_eq!(json, "\"AB3D\"");
    }

    #[test]
    fn test_room_code_normalizes_to_uppercase() {
        assert_eq!(RoomCode::new("ab3d"), RoomCode::new("AB3D"));
        assert_eq!(RoomCode::new("ab3d").as_str(), "AB3D");
    }

    // =====================================================================
    // Player and Stroke
    // =====================================================================

    #[test]
    fn test_player_json_uses_camel_case_fields() {
        let p = Player::new(PlayerId(1), "Alice");
        let json: serde_json::Value = serde_json::to_value(&p).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Alice");
        assert_eq!(json["score"], 0);
        assert_eq!(json["isReady"], true);
    }

    #[test]
    fn test_stroke_round_trip_is_lossless() {
        let s = stroke();
        let bytes = serde_json::to_vec(&s).unwrap();
        let decoded: Stroke = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(s, decoded);
    }

    #[test]
    fn test_phase_serializes_as_camel_case_tag() {
        assert_eq!(
            serde_json::to_string(&Phase::Waiting).unwrap(),
            "\"waiting\""
        );
        assert_eq!(
            serde_json::to_string(&Phase::RoundEnd).unwrap(),
            "\"roundEnd\""
        );
    }

    // =====================================================================
    // ClientCommand
    // =====================================================================

    #[test]
    fn test_join_room_command_json_format() {
        let cmd = ClientCommand::JoinRoom {
            code: RoomCode::new("AB3D"),
            name: "Alice".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["type"], "joinRoom");
        assert_eq!(json["code"], "AB3D");
        assert_eq!(json["name"], "Alice");
    }

    #[test]
    fn test_create_room_command_is_tag_only() {
        let json = serde_json::to_string(&ClientCommand::CreateRoom).unwrap();
        assert_eq!(json, r#"{"type":"createRoom"}"#);
    }

    #[test]
    fn test_guess_command_round_trip() {
        let cmd = ClientCommand::Guess {
            code: RoomCode::new("XY12"),
            guess: "cat".into(),
        };
        let bytes = serde_json::to_vec(&cmd).unwrap();
        let decoded: ClientCommand = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(cmd, decoded);
    }

    #[test]
    fn test_stroke_command_round_trip() {
        let cmd = ClientCommand::Stroke {
            code: RoomCode::new("XY12"),
            stroke: stroke(),
        };
        let bytes = serde_json::to_vec(&cmd).unwrap();
        let decoded: ClientCommand = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(cmd, decoded);
    }

    #[test]
    fn test_decode_unknown_command_tag_returns_error() {
        let unknown = r#"{"type": "teleport", "code": "AB3D"}"#;
        let result: Result<ClientCommand, _> = serde_json::from_str(unknown);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_garbage_returns_error() {
        let garbage = b"not json at all";
        let result: Result<ClientCommand, _> =
            serde_json::from_slice(garbage);
        assert!(result.is_err());
    }

    // =====================================================================
    // ServerEvent
    // =====================================================================

    #[test]
    fn test_round_start_event_json_format() {
        let ev = ServerEvent::RoundStart {
            drawer_id: PlayerId(3),
            round: 1,
            phase: Phase::Choosing,
            max_rounds: 5,
        };
        let json: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "roundStart");
        assert_eq!(json["drawerId"], 3);
        assert_eq!(json["round"], 1);
        assert_eq!(json["phase"], "choosing");
        assert_eq!(json["maxRounds"], 5);
    }

    #[test]
    fn test_room_state_event_json_format() {
        let ev = ServerEvent::RoomState {
            players: vec![Player::new(PlayerId(1), "Alice")],
            strokes: vec![],
            drawer_id: None,
            phase: Phase::Waiting,
            round: 0,
            max_rounds: 5,
        };
        let json: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "roomState");
        assert!(json["drawerId"].is_null());
        assert_eq!(json["phase"], "waiting");
        assert_eq!(json["players"][0]["name"], "Alice");
    }

    #[test]
    fn test_timer_event_json_format() {
        let json: serde_json::Value =
            serde_json::to_value(&ServerEvent::Timer { seconds: 42 }).unwrap();
        assert_eq!(json["type"], "timer");
        assert_eq!(json["seconds"], 42);
    }

    #[test]
    fn test_correct_guess_event_json_format() {
        let ev = ServerEvent::CorrectGuess {
            player_id: PlayerId(2),
            name: "Bob".into(),
            guess: "cat".into(),
            score: 125,
            time_left: 50,
        };
        let json: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "correctGuess");
        assert_eq!(json["playerId"], 2);
        assert_eq!(json["timeLeft"], 50);
    }

    #[test]
    fn test_round_end_event_round_trip() {
        let ev = ServerEvent::RoundEnd {
            word: "cat".into(),
            drawer_id: Some(PlayerId(1)),
            guessed_players: vec![PlayerId(2), PlayerId(3)],
            scores: vec![Player::new(PlayerId(1), "Alice")],
        };
        let bytes = serde_json::to_vec(&ev).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(ev, decoded);
    }

    #[test]
    fn test_game_end_event_round_trip() {
        let winner = Player {
            id: PlayerId(2),
            name: "Bob".into(),
            score: 250,
            is_ready: true,
        };
        let ev = ServerEvent::GameEnd {
            winner: winner.clone(),
            scores: vec![winner],
        };
        let bytes = serde_json::to_vec(&ev).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(ev, decoded);
    }

    #[test]
    fn test_clear_canvas_event_is_tag_only() {
        let json = serde_json::to_string(&ServerEvent::ClearCanvas).unwrap();
        assert_eq!(json, r#"{"type":"clearCanvas"}"#);
    }

    #[test]
    fn test_error_event_json_format() {
        let ev = ServerEvent::Error {
            code: 404,
            message: "room not found".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["code"], 404);
    }
}
