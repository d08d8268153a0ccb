//! Space Raiders: a small Space Invaders style shooter.
//!
//! The library is the simulation (entities, groups, the session and the
//! menu/playing state machine).  The binary wraps it in a crossterm terminal
//! frontend that samples input, paces frames and draws.

pub mod collision;
pub mod config;
pub mod entities;
pub mod game;
pub mod group;
pub mod session;
