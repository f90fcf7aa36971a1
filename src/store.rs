#![cfg(feature = "std")]
//! In-process registry of games and the boundary operations on them.
//!
//! Each game sits behind its own mutex, held for one whole transition.
//! The registry lock is only taken to insert a game or to clone a handle,
//! so transitions on different games run in parallel.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::{broadcast, Mutex, RwLock};

use crate::common::GameError;
use crate::game::{Game, GameId, GameView, MoveOutcome, PlayerView, UserId};
use crate::grid::Grid;

/// Notification emitted after every committed create, join or move.
///
/// Payloads are public views: they never carry a boat layout.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GameEvent {
    #[serde(rename = "ADD_GAME")]
    AddGame(GameView),
    #[serde(rename = "UPDATE_GAME")]
    UpdateGame(GameView),
}

impl GameEvent {
    /// Event type tag as the front end knows it.
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::AddGame(_) => "ADD_GAME",
            GameEvent::UpdateGame(_) => "UPDATE_GAME",
        }
    }

    pub fn payload(&self) -> &GameView {
        match self {
            GameEvent::AddGame(view) | GameEvent::UpdateGame(view) => view,
        }
    }
}

/// Reply to an accepted move, addressed to the mover.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Moved {
    pub game: GameView,
    pub player: PlayerView,
    pub outcome: MoveOutcome,
}

type Handle = Arc<Mutex<Game>>;

pub struct GameStore {
    games: RwLock<BTreeMap<GameId, Handle>>,
    next_id: AtomicU64,
    events: broadcast::Sender<GameEvent>,
    seed: Option<u64>,
}

impl GameStore {
    /// An empty store buffering up to `event_capacity` events per subscriber.
    pub fn new(event_capacity: usize) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            games: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
            events,
            seed: None,
        }
    }

    /// A store whose boat layouts are reproducible from `seed`.
    pub fn with_seed(event_capacity: usize, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::new(event_capacity)
        }
    }

    /// Fresh generator for one player's layout. Seeded stores derive it from
    /// the game id and join slot so games stay independent.
    fn layout_rng(&self, game: GameId, slot: u64) -> SmallRng {
        match self.seed {
            Some(s) => SmallRng::seed_from_u64(
                s.wrapping_add(game.0.wrapping_mul(0x9E37_79B9_7F4A_7C15))
                    .wrapping_add(slot),
            ),
            None => SmallRng::from_rng(&mut rand::rng()),
        }
    }

    /// Receive every event committed from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: GameEvent) {
        debug!("emit {} for {}", event.kind(), event.payload().id);
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    async fn handle(&self, id: GameId) -> Result<Handle, GameError> {
        self.games
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(GameError::GameNotFound)
    }

    /// Open a new pending game with `user` as `X`.
    pub async fn create_game(&self, user: UserId) -> GameView {
        let id = GameId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let game = Game::create(id, user, &mut self.layout_rng(id, 0));
        let view = game.view_for(user);
        let public = game.public_view();
        self.games.write().await.insert(id, Arc::new(Mutex::new(game)));
        info!("{} opened {}", user, id);
        self.emit(GameEvent::AddGame(public));
        view
    }

    /// Join `id` as `O`, starting the game.
    pub async fn join_game(&self, user: UserId, id: GameId) -> Result<PlayerView, GameError> {
        let handle = self.handle(id).await?;
        let mut game = handle.lock().await;
        let player = game.join(user, &mut self.layout_rng(id, 1))?.view(true);
        info!("{} joined {}", user, id);
        self.emit(GameEvent::UpdateGame(game.public_view()));
        Ok(player)
    }

    /// Apply `user`'s proposed grid to game `id`.
    pub async fn apply_move(
        &self,
        user: UserId,
        id: GameId,
        proposed: &Grid,
    ) -> Result<Moved, GameError> {
        let handle = self.handle(id).await?;
        let mut game = handle.lock().await;
        let outcome = game.apply_move(user, proposed)?;
        let player = game
            .player_for(user)
            .map(|p| p.view(true))
            .ok_or(GameError::NotAParticipant)?;
        if outcome.finished {
            info!("{} finished, winner {:?}", id, outcome.winner);
        }
        self.emit(GameEvent::UpdateGame(game.public_view()));
        Ok(Moved {
            game: game.view_for(user),
            player,
            outcome,
        })
    }

    /// Game `id` as `viewer` may see it.
    pub async fn get_game(&self, viewer: UserId, id: GameId) -> Option<GameView> {
        let handle = self.handle(id).await.ok()?;
        let game = handle.lock().await;
        Some(game.view_for(viewer))
    }

    /// Public views of all games, oldest first.
    pub async fn list_games(&self) -> Vec<GameView> {
        let handles: Vec<Handle> = self.games.read().await.values().cloned().collect();
        let mut views = Vec::with_capacity(handles.len());
        for handle in handles {
            views.push(handle.lock().await.public_view());
        }
        views
    }
}

impl Default for GameStore {
    fn default() -> Self {
        Self::new(crate::config::ServerConfig::default().event_capacity)
    }
}
