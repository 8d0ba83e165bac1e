//! Coinfall - a vertical-scrolling coin shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, game state)
//! - `settings`: User preferences loaded from a JSON file
//!
//! Rendering and input live in the binary; the library never touches the
//! terminal and never reads the wall clock.

pub mod settings;
pub mod sim;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Nominal simulation step length (60 steps per second)
    pub const STEP_MS: f64 = 1000.0 / 60.0;

    /// Play area dimensions (logical units)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_LIVES: u32 = 3;
    /// Damage immunity window after a hit (ms)
    pub const INVULNERABILITY_MS: f64 = 2000.0;

    /// Projectiles
    pub const PROJECTILE_WIDTH: f32 = 5.0;
    pub const PROJECTILE_HEIGHT: f32 = 15.0;
    pub const PROJECTILE_SPEED: f32 = 8.0;
    pub const PROJECTILE_DAMAGE: u32 = 1;
    pub const PROJECTILE_POWER_DAMAGE: u32 = 2;
    /// Minimum interval between shots (ms)
    pub const PROJECTILE_COOLDOWN_MS: f64 = 250.0;

    /// Coins
    pub const COIN_RADIUS: f32 = 20.0;
    pub const COIN_FALL_SPEED: f32 = 1.0;
    pub const COIN_ROTATION_STEP: f32 = 0.05;

    /// Rocks
    pub const ROCK_MIN_SIZE: f32 = 30.0;
    pub const ROCK_MAX_SIZE: f32 = 50.0;
    pub const ROCK_SPEED_LEVEL1: f32 = 2.0;
    pub const ROCK_SPEED_LEVEL2: f32 = 3.0;
    pub const ROCK_SIZE_MULTIPLIER_LEVEL2: f32 = 1.5;

    /// Level score targets (cumulative)
    pub const LEVEL1_TARGET: u32 = 800;
    pub const LEVEL2_TARGET: u32 = 5000;

    /// Shop
    pub const POWER_PROJECTILE_COST: u32 = 50;

    /// Spawn intervals (ms)
    pub const COIN_SPAWN_INTERVAL_MS: f64 = 2000.0;
    pub const ROCK_SPAWN_INTERVAL_MS: f64 = 1500.0;

    /// Particle bursts
    pub const PARTICLES_PER_BURST: usize = 10;
    pub const PARTICLE_DECAY_RATE: f32 = 0.02;
}
