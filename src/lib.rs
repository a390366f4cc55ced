//! A Werewolf party-game engine.
//!
//! [game::Game] holds the rules: the roster, role distribution, role actions, lynch
//! votes and win conditions. [session::GameSession] drives a game through its timed
//! lifecycle and publishes [events::GameEvent]s to registered listeners.

pub mod error;
pub mod events;
pub mod game;
pub mod session;
mod time;
