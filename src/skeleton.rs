#![cfg(feature = "std")]
//! Server side of the wire protocol: one [`Skeleton`] per connection,
//! translating messages into [`GameStore`] calls on behalf of the user
//! named in the handshake.

use std::sync::Arc;

use anyhow::anyhow;
use log::{debug, error, info, warn};
use tokio::net::TcpListener;
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::common::GameError;
use crate::config::ServerConfig;
use crate::game::{GameId, GameView, PlayerView, UserId};
use crate::grid::Grid;
use crate::protocol::{GameApi, Message, PROTOCOL_VERSION};
use crate::store::{GameEvent, GameStore, Moved};
use crate::transport::{tcp::TcpTransport, Transport};

/// The store seen by one user, with that user's event subscription.
pub struct GameSession {
    store: Arc<GameStore>,
    user: UserId,
    events: broadcast::Receiver<GameEvent>,
}

impl GameSession {
    pub fn new(store: Arc<GameStore>, user: UserId) -> Self {
        let events = store.subscribe();
        Self {
            store,
            user,
            events,
        }
    }

    pub fn user(&self) -> UserId {
        self.user
    }
}

#[async_trait::async_trait]
impl GameApi for GameSession {
    async fn create_game(&mut self) -> anyhow::Result<GameView> {
        Ok(self.store.create_game(self.user).await)
    }

    async fn join_game(&mut self, game: GameId) -> anyhow::Result<PlayerView> {
        Ok(self.store.join_game(self.user, game).await?)
    }

    async fn apply_move(&mut self, game: GameId, grid: Grid) -> anyhow::Result<Moved> {
        Ok(self.store.apply_move(self.user, game, &grid).await?)
    }

    async fn get_game(&mut self, game: GameId) -> anyhow::Result<Option<GameView>> {
        Ok(self.store.get_game(self.user, game).await)
    }

    async fn list_games(&mut self) -> anyhow::Result<Vec<GameView>> {
        Ok(self.store.list_games().await)
    }

    async fn poll_events(&mut self) -> anyhow::Result<Vec<GameEvent>> {
        let mut drained = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(event) => drained.push(event),
                Err(TryRecvError::Lagged(n)) => {
                    warn!("{} missed {} events", self.user, n);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        Ok(drained)
    }
}

pub struct Skeleton<T: Transport> {
    store: Arc<GameStore>,
    transport: T,
}

impl<T: Transport> Skeleton<T> {
    pub fn new(store: Arc<GameStore>, transport: T) -> Self {
        Self { store, transport }
    }

    /// Wait for `Hello` and answer it; returns the session's user.
    async fn handshake(&mut self) -> anyhow::Result<UserId> {
        match self.transport.recv().await? {
            Message::Hello { version, user } if version == PROTOCOL_VERSION => {
                self.transport
                    .send(Message::HelloAck {
                        version: PROTOCOL_VERSION,
                    })
                    .await?;
                Ok(user)
            }
            Message::Hello { version, .. } => {
                self.transport
                    .send(Message::HelloAck {
                        version: PROTOCOL_VERSION,
                    })
                    .await?;
                Err(anyhow!(
                    "Protocol version mismatch: expected {}, got {}",
                    PROTOCOL_VERSION,
                    version
                ))
            }
            other => Err(anyhow!("Expected Hello, got {:?}", other)),
        }
    }

    /// Serve requests until the peer says `Bye`. A failed receive, including
    /// a peer that hangs up without `Bye`, ends the session with its error.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let user = self.handshake().await?;
        let mut session = GameSession::new(self.store.clone(), user);
        info!("session opened for {}", user);

        loop {
            let msg = match self.transport.recv().await {
                Ok(msg) => msg,
                Err(e) => {
                    warn!("session for {} dropped without Bye: {}", user, e);
                    return Err(e);
                }
            };
            let reply = match msg {
                Message::Bye => break,
                Message::CreateGame => session.create_game().await.map(Message::Game),
                Message::JoinGame { game } => session.join_game(game).await.map(Message::Player),
                Message::ApplyMove { game, grid } => {
                    session.apply_move(game, grid).await.map(Message::Moved)
                }
                Message::GetGame { game } => session.get_game(game).await.map(Message::MaybeGame),
                Message::ListGames => session.list_games().await.map(Message::Games),
                Message::PollEvents => session.poll_events().await.map(Message::Events),
                other => Err(anyhow!("Unexpected request {:?}", other)),
            };
            let reply = match reply {
                Ok(msg) => msg,
                Err(e) => match e.downcast_ref::<GameError>() {
                    Some(refusal) => {
                        debug!("{} refused: {}", user, refusal);
                        Message::Error(*refusal)
                    }
                    None => return Err(e),
                },
            };
            self.transport.send(reply).await?;
        }
        info!("session closed for {}", user);
        Ok(())
    }
}

/// Accept connections forever, one task per session.
pub async fn serve(
    listener: TcpListener,
    store: Arc<GameStore>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        debug!("connection from {}", addr);
        let transport = TcpTransport::with_config(stream, &config);
        let mut skeleton = Skeleton::new(store.clone(), transport);
        tokio::spawn(async move {
            if let Err(e) = skeleton.run().await {
                error!("session with {} ended: {}", addr, e);
            }
        });
    }
}
