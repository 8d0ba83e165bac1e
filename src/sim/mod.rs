//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (no wall clock; the session clock is advanced by `tick`)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::circles_overlap;
pub use state::{
    Coin, CoinKind, GameState, Particle, Phase, Player, Projectile, Rock, ShopOutcome,
};
pub use tick::{TickInput, tick};
