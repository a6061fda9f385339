//! The room state machine.
//!
//! `GameRoom` owns everything the spec calls game state: the roster in
//! join order, the stroke log, the drawer, the tagged phase, counters, and
//! the set of players who already guessed this round. Transitions mutate
//! that state and return an [`Outcome`] describing what should happen
//! outside the engine — which events go to whom, and which timers to
//! start, cancel, or schedule.

use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;
use rand::seq::IndexedRandom;
use scrawl_protocol::{Phase, Player, PlayerId, Recipient, ServerEvent, Stroke};

use crate::{GameConfig, words};

/// Candidate words offered to the drawer each round.
pub const WORD_CHOICES: usize = 3;

/// Base points for a correct guess.
const GUESS_BASE_SCORE: u32 = 100;

/// Points the drawer earns per player who guessed correctly.
const DRAWER_BONUS_PER_GUESS: u32 = 25;

/// Grace before the round ends once everyone has guessed.
const ALL_GUESSED_DELAY: Duration = Duration::from_secs(1);

/// Pause between roundEnd and the next round.
const NEXT_ROUND_DELAY: Duration = Duration::from_secs(3);

/// Pause before restarting after the drawer disconnects, so remaining
/// clients see the updated roster before the next drawer is announced.
const DRAWER_LEFT_DELAY: Duration = Duration::from_secs(2);

/// How long a finished room lingers so clients can render the results.
const TEARDOWN_DELAY: Duration = Duration::from_secs(10);

/// Points for a correct guess with `time_left` seconds on the clock.
pub fn guess_score(time_left: u32) -> u32 {
    GUESS_BASE_SCORE + time_left / 2
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The room's stage, with the data that only exists in that stage.
///
/// Keeping the candidates and the secret word inside the variant makes
/// illegal combinations unrepresentable: a Waiting room cannot carry a
/// word, and a Drawing room always has one.
#[derive(Debug, Clone, PartialEq)]
pub enum PhaseState {
    /// Room exists, fewer than two players. No round has started.
    Waiting,
    /// The drawer is picking among `candidates`.
    Choosing { candidates: Vec<String> },
    /// The drawer is drawing `word`; guessers race the clock.
    Drawing { word: String },
    /// `word` has been revealed; the next round (or game end) is pending.
    RoundEnd { word: String },
}

impl PhaseState {
    /// The wire-level tag for this phase.
    pub fn tag(&self) -> Phase {
        match self {
            Self::Waiting => Phase::Waiting,
            Self::Choosing { .. } => Phase::Choosing,
            Self::Drawing { .. } => Phase::Drawing,
            Self::RoundEnd { .. } => Phase::RoundEnd,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome and effects
// ---------------------------------------------------------------------------

/// Which countdown a room is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownKind {
    /// The word-choosing countdown.
    Choose,
    /// The drawing countdown.
    Draw,
}

/// A delayed one-shot the engine wants run later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Finish the current round.
    EndRound,
    /// Start the next round (or end the game if rounds are exhausted).
    NextRound,
    /// Tear the room down.
    Teardown,
}

/// A timer-side request produced by a transition.
///
/// The room actor owns the actual clock; the engine only describes what
/// it needs. Starting a countdown supersedes any countdown already
/// running, which is how "at most one timer per room" holds by
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Run a 1 Hz countdown from `seconds`.
    StartCountdown { kind: CountdownKind, seconds: u32 },
    /// Stop the running countdown, if any.
    CancelCountdown,
    /// Run `action` after `delay`.
    Schedule {
        action: DeferredAction,
        delay: Duration,
    },
    /// The room is done; delete it.
    Retire,
}

/// What a transition produced: events to deliver and effects to apply.
#[derive(Debug, Default)]
pub struct Outcome {
    /// Events, in emission order, each paired with its audience.
    pub events: Vec<(Recipient, ServerEvent)>,
    /// Timer requests, in order.
    pub effects: Vec<Effect>,
}

impl Outcome {
    fn broadcast(&mut self, event: ServerEvent) {
        self.events.push((Recipient::All, event));
    }

    fn to(&mut self, player: PlayerId, event: ServerEvent) {
        self.events.push((Recipient::Player(player), event));
    }

    fn except(&mut self, player: PlayerId, event: ServerEvent) {
        self.events.push((Recipient::AllExcept(player), event));
    }

    fn effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    fn merge(&mut self, other: Outcome) {
        self.events.extend(other.events);
        self.effects.extend(other.effects);
    }
}

// ---------------------------------------------------------------------------
// GameRoom
// ---------------------------------------------------------------------------

/// The full game state of one room and every transition on it.
#[derive(Debug)]
pub struct GameRoom {
    config: GameConfig,
    /// Roster in join order — the stable view used for drawer rotation.
    players: Vec<Player>,
    /// Stroke log for the current round, replayed to late joiners.
    strokes: Vec<Stroke>,
    drawer: Option<PlayerId>,
    phase: PhaseState,
    round: u32,
    /// Mirror of the running countdown, for snapshots and scoring.
    timer: Option<u32>,
    /// Who has guessed correctly this round. Reset at round start.
    guessed: HashSet<PlayerId>,
}

impl GameRoom {
    /// A fresh room in Waiting with no players.
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            players: Vec::new(),
            strokes: Vec::new(),
            drawer: None,
            phase: PhaseState::Waiting,
            round: 0,
            timer: None,
            guessed: HashSet::new(),
        }
    }

    /// Current phase tag.
    pub fn phase(&self) -> Phase {
        self.phase.tag()
    }

    /// Current round number (0 before the first round).
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The current drawer, if a round is running.
    pub fn drawer(&self) -> Option<PlayerId> {
        self.drawer
    }

    /// Roster in join order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Seconds left on the running countdown, if any.
    pub fn timer(&self) -> Option<u32> {
        self.timer
    }

    /// The full-state snapshot sent to a joining connection.
    ///
    /// Never carries the secret word — only the drawer learns it, via a
    /// private event.
    pub fn snapshot(&self) -> ServerEvent {
        ServerEvent::RoomState {
            players: self.players.clone(),
            strokes: self.strokes.clone(),
            drawer_id: self.drawer,
            phase: self.phase.tag(),
            round: self.round,
            max_rounds: self.config.max_rounds,
        }
    }

    fn roster_event(&self) -> ServerEvent {
        ServerEvent::UpdatePlayers {
            players: self.players.clone(),
        }
    }

    fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    /// Registers a player, sends them the snapshot, broadcasts the roster,
    /// and starts the first round when a Waiting room reaches two players.
    pub fn add_player<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        id: PlayerId,
        name: impl Into<String>,
    ) -> Outcome {
        let mut out = Outcome::default();

        // A rejoin on the same connection id just resyncs.
        if self.player(id).is_none() {
            self.players.push(Player::new(id, name));
        }

        out.to(id, self.snapshot());
        out.broadcast(self.roster_event());

        if matches!(self.phase, PhaseState::Waiting) && self.players.len() >= 2
        {
            out.merge(self.start_round(rng));
        }

        out
    }

    /// Removes a player and runs the phase-appropriate recovery.
    pub fn remove_player(&mut self, id: PlayerId) -> Outcome {
        let mut out = Outcome::default();

        let Some(idx) = self.players.iter().position(|p| p.id == id) else {
            return out;
        };
        self.players.remove(idx);
        self.guessed.remove(&id);

        if self.players.is_empty() {
            // Empty rooms never persist.
            self.timer = None;
            out.effect(Effect::CancelCountdown);
            out.effect(Effect::Retire);
            return out;
        }

        out.broadcast(self.roster_event());

        if self.drawer == Some(id) {
            // A snapshot must never name a player who already left.
            self.drawer = None;
            if matches!(
                self.phase,
                PhaseState::Choosing { .. } | PhaseState::Drawing { .. }
            ) {
                // The drawer is gone mid-round: abandon it and rotate after
                // a short pause so clients see the roster change first.
                self.timer = None;
                out.effect(Effect::CancelCountdown);
                out.effect(Effect::Schedule {
                    action: DeferredAction::NextRound,
                    delay: DRAWER_LEFT_DELAY,
                });
            }
        } else if matches!(self.phase, PhaseState::Drawing { .. })
            && self.all_guessed()
        {
            // A guesser leaving can make the remaining set complete.
            out.effect(Effect::Schedule {
                action: DeferredAction::EndRound,
                delay: ALL_GUESSED_DELAY,
            });
        }

        out
    }

    /// Starts the next round, or ends the game once rounds are exhausted.
    ///
    /// Rotation is deterministic: the drawer for round N is the player at
    /// index `(N - 1) % player_count` in join order.
    pub fn start_round<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Outcome {
        if self.players.is_empty() {
            return Outcome::default();
        }
        if self.round >= self.config.max_rounds {
            return self.end_game();
        }

        let idx = self.round as usize % self.players.len();
        let drawer = self.players[idx].id;
        self.drawer = Some(drawer);
        self.round += 1;
        self.strokes.clear();
        self.guessed.clear();

        let candidates = words::pick_words(rng, WORD_CHOICES);
        self.phase = PhaseState::Choosing {
            candidates: candidates.clone(),
        };
        self.timer = Some(self.config.choose_time);

        tracing::info!(
            round = self.round,
            %drawer,
            players = self.players.len(),
            "round started"
        );

        let mut out = Outcome::default();
        out.broadcast(ServerEvent::ClearCanvas);
        out.broadcast(ServerEvent::RoundStart {
            drawer_id: drawer,
            round: self.round,
            phase: Phase::Choosing,
            max_rounds: self.config.max_rounds,
        });
        out.to(drawer, ServerEvent::ChooseWord { words: candidates });
        out.effect(Effect::StartCountdown {
            kind: CountdownKind::Choose,
            seconds: self.config.choose_time,
        });
        out
    }

    /// The drawer picked a word. Anyone else, or any other phase: no-op.
    pub fn choose_word(
        &mut self,
        sender: PlayerId,
        word: impl Into<String>,
    ) -> Outcome {
        if self.drawer != Some(sender)
            || !matches!(self.phase, PhaseState::Choosing { .. })
        {
            return Outcome::default();
        }
        self.begin_drawing(word.into())
    }

    fn begin_drawing(&mut self, word: String) -> Outcome {
        let Some(drawer) = self.drawer else {
            return Outcome::default();
        };

        self.phase = PhaseState::Drawing { word: word.clone() };
        self.timer = Some(self.config.round_time);

        let mut out = Outcome::default();
        out.broadcast(ServerEvent::DrawingStart { drawer_id: drawer });
        out.to(drawer, ServerEvent::YourWord { word });
        out.effect(Effect::StartCountdown {
            kind: CountdownKind::Draw,
            seconds: self.config.round_time,
        });
        out
    }

    /// One countdown tick. Broadcasts the remaining seconds; zero triggers
    /// the phase transition synchronously.
    ///
    /// A tick whose kind doesn't match the current phase is stale (the
    /// phase moved on before the cancellation landed) and is dropped.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        kind: CountdownKind,
        remaining: u32,
    ) -> Outcome {
        let expected = match self.phase {
            PhaseState::Choosing { .. } => CountdownKind::Choose,
            PhaseState::Drawing { .. } => CountdownKind::Draw,
            _ => return Outcome::default(),
        };
        if kind != expected {
            tracing::debug!(?kind, phase = %self.phase.tag(), "stale tick dropped");
            return Outcome::default();
        }

        self.timer = Some(remaining);
        let mut out = Outcome::default();
        out.broadcast(ServerEvent::Timer { seconds: remaining });

        if remaining == 0 {
            self.timer = None;
            match kind {
                CountdownKind::Choose => {
                    // The drawer never picked; choose on their behalf.
                    let word = match &self.phase {
                        PhaseState::Choosing { candidates } => {
                            candidates.choose(rng).cloned()
                        }
                        _ => None,
                    };
                    if let Some(word) = word {
                        out.merge(self.begin_drawing(word));
                    }
                }
                CountdownKind::Draw => out.merge(self.end_round()),
            }
        }

        out
    }

    /// Appends a stroke and relays it to everyone but its author.
    /// Ignored unless the sender is the drawer and the phase is Drawing.
    pub fn submit_stroke(
        &mut self,
        sender: PlayerId,
        stroke: Stroke,
    ) -> Outcome {
        if self.drawer != Some(sender)
            || !matches!(self.phase, PhaseState::Drawing { .. })
        {
            return Outcome::default();
        }

        self.strokes.push(stroke.clone());
        let mut out = Outcome::default();
        out.except(sender, ServerEvent::Stroke { stroke });
        out
    }

    /// Wipes the stroke log. Drawer only; broadcast to the whole room,
    /// sender included, so every canvas agrees.
    pub fn clear_canvas(&mut self, sender: PlayerId) -> Outcome {
        if self.drawer != Some(sender) {
            return Outcome::default();
        }

        self.strokes.clear();
        let mut out = Outcome::default();
        out.broadcast(ServerEvent::ClearCanvas);
        out
    }

    /// Evaluates a guess against the hidden word.
    ///
    /// Outside Drawing the guess is dropped. A correct first guess by a
    /// non-drawer scores `100 + floor(time_left / 2)` and is credited
    /// once. Everything else (wrong word, the drawer fishing, a repeat
    /// guess) is relayed as chat.
    pub fn guess(&mut self, sender: PlayerId, text: &str) -> Outcome {
        let PhaseState::Drawing { word } = &self.phase else {
            return Outcome::default();
        };
        let word = word.clone();

        let mut out = Outcome::default();
        let Some(player) = self.player(sender) else {
            out.to(
                sender,
                ServerEvent::Error {
                    code: 404,
                    message: "player not found".into(),
                },
            );
            return out;
        };
        let name = player.name.clone();

        let normalized = text.trim().to_lowercase();
        let correct = normalized == word.to_lowercase()
            && self.drawer != Some(sender)
            && !self.guessed.contains(&sender);

        if correct {
            let time_left = self.timer.unwrap_or(0);
            let score = guess_score(time_left);
            if let Some(player) = self.player_mut(sender) {
                player.score += score;
            }
            self.guessed.insert(sender);

            tracing::info!(%sender, score, time_left, "correct guess");

            out.broadcast(ServerEvent::CorrectGuess {
                player_id: sender,
                name,
                guess: text.to_string(),
                score,
                time_left,
            });
            out.broadcast(self.roster_event());

            if self.all_guessed() {
                out.effect(Effect::Schedule {
                    action: DeferredAction::EndRound,
                    delay: ALL_GUESSED_DELAY,
                });
            }
        } else {
            out.broadcast(ServerEvent::Chat {
                id: sender,
                name,
                message: text.to_string(),
            });
        }

        out
    }

    /// Ends the current round: drawer bonus, reveal, next-round schedule.
    /// A no-op outside Drawing, which also makes a scheduled end harmless
    /// after the draw timer already fired (and vice versa).
    pub fn end_round(&mut self) -> Outcome {
        let PhaseState::Drawing { word } = &self.phase else {
            return Outcome::default();
        };
        let word = word.clone();
        self.phase = PhaseState::RoundEnd { word: word.clone() };
        self.timer = None;

        if !self.guessed.is_empty() {
            let bonus = self.guessed.len() as u32 * DRAWER_BONUS_PER_GUESS;
            if let Some(drawer) = self.drawer {
                if let Some(player) = self.player_mut(drawer) {
                    player.score += bonus;
                }
            }
        }

        let mut guessed: Vec<PlayerId> = self.guessed.iter().copied().collect();
        guessed.sort_by_key(|p| p.0);

        tracing::info!(
            round = self.round,
            word = %word,
            guessed = guessed.len(),
            "round ended"
        );

        let mut out = Outcome::default();
        out.effect(Effect::CancelCountdown);
        out.broadcast(ServerEvent::RoundEnd {
            word,
            drawer_id: self.drawer,
            guessed_players: guessed,
            scores: self.players.clone(),
        });
        out.effect(Effect::Schedule {
            action: DeferredAction::NextRound,
            delay: NEXT_ROUND_DELAY,
        });
        out
    }

    /// Ends the game: picks the winner, publishes final scores, schedules
    /// teardown.
    ///
    /// Ties go to the earliest-joined player among the tied.
    pub fn end_game(&mut self) -> Outcome {
        let mut out = Outcome::default();
        out.effect(Effect::CancelCountdown);
        self.timer = None;

        let Some(winner) = self
            .players
            .iter()
            .fold(None::<&Player>, |best, p| match best {
                Some(b) if p.score <= b.score => best,
                _ => Some(p),
            })
            .cloned()
        else {
            out.effect(Effect::Retire);
            return out;
        };

        let mut scores = self.players.clone();
        scores.sort_by(|a, b| b.score.cmp(&a.score));

        tracing::info!(winner = %winner.id, score = winner.score, "game ended");

        out.broadcast(ServerEvent::GameEnd { winner, scores });
        out.effect(Effect::Schedule {
            action: DeferredAction::Teardown,
            delay: TEARDOWN_DELAY,
        });
        out
    }

    fn all_guessed(&self) -> bool {
        let non_drawers = self
            .players
            .iter()
            .filter(|p| self.drawer != Some(p.id))
            .count();
        non_drawers > 0 && self.guessed.len() >= non_drawers
    }
}
