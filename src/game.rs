//! The game state machine: creation, joining, and validated moves.
//!
//! A [`Game`] moves only forward through `pending → started → finished`.
//! Every operation checks all of its preconditions before touching state, so
//! an `Err` always leaves the game exactly as it was.

use core::fmt;

use log::debug;
use rand::Rng;

use crate::bitboard::CellSet;
use crate::boats::BoatLayout;
use crate::common::{GameError, GridError};
use crate::grid::{Cell, Grid, GridKind, Position, Symbol};
use crate::hit::{all_boats_hit, evaluate_hit};
use crate::moves::validate_transition;
use crate::win::evaluate_winner;

/// Identity of an authenticated user, assigned outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct UserId(pub u64);

/// Identity of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user#{}", self.0)
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "game#{}", self.0)
    }
}

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "lowercase"))]
pub enum GameStatus {
    /// Waiting for a second player.
    Pending,
    Started,
    /// Terminal. No further moves are accepted.
    Finished,
}

/// One participant: its symbol, concealed boats, and move history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    user: UserId,
    symbol: Symbol,
    boats: BoatLayout,
    marks: CellSet,
    hits: CellSet,
}

impl Player {
    fn new<R: Rng + ?Sized>(user: UserId, symbol: Symbol, rng: &mut R) -> Self {
        Self {
            user,
            symbol,
            boats: BoatLayout::random(rng),
            marks: CellSet::new(),
            hits: CellSet::new(),
        }
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// This player's concealed layout. Never hand it to the opponent.
    pub fn boats(&self) -> &BoatLayout {
        &self.boats
    }

    /// Cells this player has marked.
    pub fn marks(&self) -> CellSet {
        self.marks
    }

    /// Marked cells that landed on an opponent boat.
    pub fn hits(&self) -> CellSet {
        self.hits
    }

    /// Grid holding only this player's own marks.
    pub fn marks_grid(&self) -> Grid {
        grid_of(self.marks, self.symbol.mark())
    }

    /// What anyone may see about this player. `reveal_boats` adds the layout.
    pub fn view(&self, reveal_boats: bool) -> PlayerView {
        PlayerView {
            user: self.user,
            symbol: self.symbol,
            marks: self.marks_grid(),
            hits: grid_of(self.hits, Cell::Boat),
            boats: reveal_boats.then_some(self.boats),
        }
    }
}

fn grid_of(cells: CellSet, cell: Cell) -> Grid {
    let mut grid = Grid::empty();
    for (r, c) in cells.iter_set_bits() {
        if let Ok(p) = Position::new(r, c) {
            grid.set(p, cell);
        }
    }
    grid
}

/// Result of an accepted move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveOutcome {
    /// The newly marked cell.
    pub position: Position,
    /// Whether the cell holds one of the opponent's boats.
    pub hit: bool,
    /// Set when this move ended the game with a winner.
    pub winner: Option<Symbol>,
    /// True when this move ended the game, with or without a winner.
    pub finished: bool,
}

/// A two-player game and its shared marks grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    id: GameId,
    status: GameStatus,
    turn: Symbol,
    winner: Option<Symbol>,
    board: Grid,
    x: Player,
    o: Option<Player>,
}

impl Game {
    /// A pending game with `user` as `X`.
    pub fn create<R: Rng + ?Sized>(id: GameId, user: UserId, rng: &mut R) -> Self {
        debug!("{} created by {}", id, user);
        Self {
            id,
            status: GameStatus::Pending,
            turn: Symbol::X,
            winner: None,
            board: Grid::empty(),
            x: Player::new(user, Symbol::X, rng),
            o: None,
        }
    }

    /// Attach `user` as `O` and start the game with `X` to move.
    pub fn join<R: Rng + ?Sized>(&mut self, user: UserId, rng: &mut R) -> Result<&Player, GameError> {
        if self.status != GameStatus::Pending || self.x.user == user {
            return Err(GameError::GameNotJoinable);
        }
        self.status = GameStatus::Started;
        self.turn = Symbol::X;
        debug!("{} joined {} as {}", user, self.id, Symbol::O);
        Ok(self.o.insert(Player::new(user, Symbol::O, rng)))
    }

    /// Apply `user`'s proposed marks grid as their next move.
    pub fn apply_move(&mut self, user: UserId, proposed: &Grid) -> Result<MoveOutcome, GameError> {
        let symbol = self
            .player_for(user)
            .map(Player::symbol)
            .ok_or(GameError::NotAParticipant)?;
        match self.status {
            GameStatus::Pending => return Err(GameError::GameNotStarted),
            GameStatus::Finished => return Err(GameError::GameAlreadyFinished),
            GameStatus::Started => {}
        }
        if symbol != self.turn {
            return Err(GameError::NotYourTurn);
        }
        proposed.check_kind(GridKind::Marks)?;
        let position = validate_transition(symbol, &self.board, proposed)?;

        let opponent = self
            .player(symbol.other())
            .ok_or(GameError::GameNotStarted)?;
        let hit = evaluate_hit(position, opponent.boats());
        let actor = self.player(symbol).ok_or(GameError::NotAParticipant)?;
        let (mut marks, mut hits) = (actor.marks, actor.hits);
        marks.set(position.row(), position.col()).map_err(GridError::from)?;
        if hit {
            hits.set(position.row(), position.col()).map_err(GridError::from)?;
        }
        let winner = match evaluate_winner(proposed)? {
            Some(w) => Some(w),
            None if all_boats_hit(hits, opponent.boats()) => Some(symbol),
            None => None,
        };
        let finished = winner.is_some() || proposed.is_full();

        // commit; nothing below can fail
        self.board = *proposed;
        if let Some(actor) = self.player_mut(symbol) {
            actor.marks = marks;
            actor.hits = hits;
        }
        if finished {
            self.status = GameStatus::Finished;
            self.winner = winner;
            debug!("{} finished, winner {:?}", self.id, winner);
        } else {
            self.turn = symbol.other();
        }
        debug!("{} {} marked {} (hit: {})", self.id, symbol, position, hit);

        Ok(MoveOutcome {
            position,
            hit,
            winner,
            finished,
        })
    }

    pub fn id(&self) -> GameId {
        self.id
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Whose move is next.
    pub fn turn(&self) -> Symbol {
        self.turn
    }

    pub fn winner(&self) -> Option<Symbol> {
        self.winner
    }

    /// Finished without a winner.
    pub fn is_draw(&self) -> bool {
        self.status == GameStatus::Finished && self.winner.is_none()
    }

    /// The shared marks grid both players write into.
    pub fn board(&self) -> &Grid {
        &self.board
    }

    pub fn player(&self, symbol: Symbol) -> Option<&Player> {
        match symbol {
            Symbol::X => Some(&self.x),
            Symbol::O => self.o.as_ref(),
        }
    }

    fn player_mut(&mut self, symbol: Symbol) -> Option<&mut Player> {
        match symbol {
            Symbol::X => Some(&mut self.x),
            Symbol::O => self.o.as_mut(),
        }
    }

    /// The participant for `user`, if any.
    pub fn player_for(&self, user: UserId) -> Option<&Player> {
        self.players().find(|p| p.user == user)
    }

    /// Attached players in join order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        core::iter::once(&self.x).chain(self.o.as_ref())
    }

    /// Projection for `viewer`: only the viewer's own boats are included.
    pub fn view_for(&self, viewer: UserId) -> GameView {
        self.project(Some(viewer))
    }

    /// Projection with no boat layouts at all, for broadcasts and listings.
    pub fn public_view(&self) -> GameView {
        self.project(None)
    }

    fn project(&self, viewer: Option<UserId>) -> GameView {
        let view = |p: &Player| p.view(viewer == Some(p.user));
        GameView {
            id: self.id,
            status: self.status,
            turn: self.turn,
            winner: self.winner,
            board: self.board,
            players: [Some(view(&self.x)), self.o.as_ref().map(view)],
        }
    }
}

/// Data about a player that may leave the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerView {
    pub user: UserId,
    pub symbol: Symbol,
    /// The player's own marks.
    pub marks: Grid,
    /// Opponent boats this player has found, as `Boat` cells.
    pub hits: Grid,
    /// Present only when the view is addressed to this player.
    pub boats: Option<BoatLayout>,
}

/// Data about a game that may leave the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameView {
    pub id: GameId,
    pub status: GameStatus,
    pub turn: Symbol,
    pub winner: Option<Symbol>,
    pub board: Grid,
    /// `X` then `O`; the `O` slot is empty while pending.
    pub players: [Option<PlayerView>; 2],
}

impl GameView {
    /// The view of the player with `symbol`.
    pub fn player(&self, symbol: Symbol) -> Option<&PlayerView> {
        let slot = match symbol {
            Symbol::X => 0,
            Symbol::O => 1,
        };
        self.players[slot].as_ref()
    }

    /// The view of `user`, if they take part.
    pub fn player_for(&self, user: UserId) -> Option<&PlayerView> {
        self.players.iter().flatten().find(|p| p.user == user)
    }
}
