#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate std;
mod bitboard;
mod boats;
mod common;
mod config;
mod game;
mod grid;
mod hit;
#[cfg(feature = "std")]
mod logging;
mod moves;
#[cfg(feature = "std")]
pub mod protocol;
#[cfg(feature = "std")]
pub mod skeleton;
#[cfg(feature = "std")]
pub mod store;
#[cfg(feature = "std")]
pub mod stub;
#[cfg(feature = "std")]
pub mod transport;
mod win;

pub use bitboard::{BitBoard, BitBoardError, CellSet};
pub use boats::{BoatLayout, BoatShape};
pub use common::*;
pub use config::*;
pub use game::*;
pub use grid::*;
pub use hit::*;
#[cfg(feature = "std")]
pub use logging::init_logging;
pub use moves::*;
#[cfg(feature = "std")]
pub use protocol::{GameApi, Message};
#[cfg(feature = "std")]
pub use skeleton::*;
#[cfg(feature = "std")]
pub use store::*;
#[cfg(feature = "std")]
pub use stub::*;
#[cfg(feature = "std")]
pub use transport::{in_memory::InMemoryTransport, tcp::TcpTransport, Transport};
pub use win::*;
