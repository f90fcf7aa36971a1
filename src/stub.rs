#![cfg(feature = "std")]

use anyhow::anyhow;

use crate::game::{GameId, GameView, PlayerView, UserId};
use crate::grid::Grid;
use crate::protocol::{GameApi, Message, PROTOCOL_VERSION};
use crate::store::{GameEvent, Moved};
use crate::transport::Transport;

/// Client proxy: the [`GameApi`] of a remote server, acting as one user.
pub struct Stub<T: Transport> {
    transport: T,
    user: UserId,
    handshaken: bool,
}

impl<T: Transport> Stub<T> {
    pub fn new(transport: T, user: UserId) -> Self {
        Self {
            transport,
            user,
            handshaken: false,
        }
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    async fn ensure_handshake(&mut self) -> anyhow::Result<()> {
        if self.handshaken {
            return Ok(());
        }
        self.transport
            .send(Message::Hello {
                version: PROTOCOL_VERSION,
                user: self.user,
            })
            .await?;
        match self.transport.recv().await? {
            Message::HelloAck { version } if version == PROTOCOL_VERSION => {
                self.handshaken = true;
                Ok(())
            }
            Message::HelloAck { version } => Err(anyhow!(
                "Protocol version mismatch: expected {}, got {}",
                PROTOCOL_VERSION,
                version
            )),
            other => Err(anyhow!("Expected HelloAck, got {:?}", other)),
        }
    }

    /// Send one request and return its reply. A refusal becomes an error
    /// wrapping the server's [`GameError`](crate::GameError).
    async fn request(&mut self, msg: Message) -> anyhow::Result<Message> {
        self.ensure_handshake().await?;
        self.transport.send(msg).await?;
        match self.transport.recv().await? {
            Message::Error(refusal) => Err(refusal.into()),
            reply => Ok(reply),
        }
    }

    /// Close the session politely.
    pub async fn close(mut self) -> anyhow::Result<()> {
        if self.handshaken {
            self.transport.send(Message::Bye).await?;
        }
        Ok(())
    }
}

fn unexpected(reply: Message) -> anyhow::Error {
    anyhow!("Unexpected reply {:?}", reply)
}

#[async_trait::async_trait]
impl<T: Transport> GameApi for Stub<T> {
    async fn create_game(&mut self) -> anyhow::Result<GameView> {
        match self.request(Message::CreateGame).await? {
            Message::Game(view) => Ok(view),
            other => Err(unexpected(other)),
        }
    }

    async fn join_game(&mut self, game: GameId) -> anyhow::Result<PlayerView> {
        match self.request(Message::JoinGame { game }).await? {
            Message::Player(player) => Ok(player),
            other => Err(unexpected(other)),
        }
    }

    async fn apply_move(&mut self, game: GameId, grid: Grid) -> anyhow::Result<Moved> {
        match self.request(Message::ApplyMove { game, grid }).await? {
            Message::Moved(moved) => Ok(moved),
            other => Err(unexpected(other)),
        }
    }

    async fn get_game(&mut self, game: GameId) -> anyhow::Result<Option<GameView>> {
        match self.request(Message::GetGame { game }).await? {
            Message::MaybeGame(view) => Ok(view),
            other => Err(unexpected(other)),
        }
    }

    async fn list_games(&mut self) -> anyhow::Result<Vec<GameView>> {
        match self.request(Message::ListGames).await? {
            Message::Games(views) => Ok(views),
            other => Err(unexpected(other)),
        }
    }

    async fn poll_events(&mut self) -> anyhow::Result<Vec<GameEvent>> {
        match self.request(Message::PollEvents).await? {
            Message::Events(events) => Ok(events),
            other => Err(unexpected(other)),
        }
    }
}
