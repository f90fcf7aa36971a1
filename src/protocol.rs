#![cfg(feature = "std")]
//! Messages exchanged between a game client and the server, and the
//! operation set both sides speak.

use crate::common::GameError;
use crate::game::{GameId, GameView, PlayerView, UserId};
use crate::grid::Grid;
use crate::store::{GameEvent, Moved};

pub use crate::config::PROTOCOL_VERSION;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Message {
    /// Opens a session for `user`. Must be the first client message.
    Hello { version: u8, user: UserId },
    HelloAck { version: u8 },

    CreateGame,
    JoinGame { game: GameId },
    ApplyMove { game: GameId, grid: Grid },
    GetGame { game: GameId },
    ListGames,
    /// Drain events committed since the last poll.
    PollEvents,

    Game(GameView),
    MaybeGame(Option<GameView>),
    Games(Vec<GameView>),
    Player(PlayerView),
    Moved(Moved),
    Events(Vec<GameEvent>),
    /// The request was refused; nothing changed.
    Error(GameError),

    /// Ends the session.
    Bye,
}

/// The boundary operations, seen from one authenticated user.
///
/// Refusals come back as an [`anyhow::Error`] wrapping a [`GameError`].
#[async_trait::async_trait]
pub trait GameApi: Send {
    async fn create_game(&mut self) -> anyhow::Result<GameView>;
    async fn join_game(&mut self, game: GameId) -> anyhow::Result<PlayerView>;
    async fn apply_move(&mut self, game: GameId, grid: Grid) -> anyhow::Result<Moved>;
    async fn get_game(&mut self, game: GameId) -> anyhow::Result<Option<GameView>>;
    async fn list_games(&mut self) -> anyhow::Result<Vec<GameView>>;
    async fn poll_events(&mut self) -> anyhow::Result<Vec<GameEvent>>;
}
