//! Game state and core simulation types
//!
//! Everything needed to reproduce a session deterministically lives here:
//! the entities, the session clock, the seeded RNG and the phase machine.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Main menu, no simulation running
    Menu,
    /// Active gameplay
    Playing,
    /// Gameplay suspended, overlay shown
    Paused,
    /// In-game shop (level 2 only)
    Shop,
    /// Level 1 target reached, waiting for the player to continue
    LevelTransition,
    /// Out of lives
    GameOver,
    /// Level 2 target reached
    Victory,
}

/// Coin tiers. Tier decides health, point value, color and spawn weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinKind {
    Bronze,
    Silver,
    Gold,
}

impl CoinKind {
    /// Hits (un-powered) needed to break the coin
    pub fn health(self) -> u32 {
        match self {
            CoinKind::Bronze => 8,
            CoinKind::Silver => 12,
            CoinKind::Gold => 25,
        }
    }

    /// Score awarded when the coin breaks
    pub fn points(self) -> u32 {
        match self {
            CoinKind::Bronze => 15,
            CoinKind::Silver => 40,
            CoinKind::Gold => 100,
        }
    }

    /// Probability mass for the spawn draw (sums to 1.0 across tiers)
    pub fn spawn_weight(self) -> f32 {
        match self {
            CoinKind::Bronze => 0.5,
            CoinKind::Silver => 0.3,
            CoinKind::Gold => 0.2,
        }
    }

    /// Display color (RGB)
    pub fn color(self) -> [u8; 3] {
        match self {
            CoinKind::Bronze => [0xCD, 0x7F, 0x32],
            CoinKind::Silver => [0xC0, 0xC0, 0xC0],
            CoinKind::Gold => [0xFF, 0xD7, 0x00],
        }
    }
}

/// Particle color for damage bursts (rock and contact hits)
pub const DAMAGE_BURST_COLOR: [u8; 3] = [0xFF, 0x00, 0x00];

/// The player's ship. Position is the top-left corner of its bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub lives: u32,
    pub invulnerable: bool,
    /// Session-clock timestamp of the hit that started the current
    /// invulnerability window (meaningless while `invulnerable` is false)
    pub invulnerable_since_ms: f64,
}

impl Player {
    /// Fresh ship at the starting position near the bottom center
    pub fn spawn() -> Self {
        Self {
            pos: Vec2::new(
                CANVAS_WIDTH / 2.0 - PLAYER_WIDTH / 2.0,
                CANVAS_HEIGHT - 100.0,
            ),
            lives: PLAYER_LIVES,
            invulnerable: false,
            invulnerable_since_ms: 0.0,
        }
    }

    /// Center of the bounding box (collision reference point)
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(PLAYER_WIDTH / 2.0, PLAYER_HEIGHT / 2.0)
    }

    /// Apply one step of directional input. `dx`/`dy` are unit directions;
    /// diagonals are intentionally not normalized, so diagonal movement is
    /// faster by a factor of sqrt(2).
    pub fn apply_move(&mut self, dx: f32, dy: f32) {
        self.pos.x += dx * PLAYER_SPEED;
        self.pos.y += dy * PLAYER_SPEED;

        // Stay fully inside the play area on both axes
        self.pos.x = self.pos.x.clamp(0.0, CANVAS_WIDTH - PLAYER_WIDTH);
        self.pos.y = self.pos.y.clamp(0.0, CANVAS_HEIGHT - PLAYER_HEIGHT);
    }

    /// One damage tick. No-op while the invulnerability window is open.
    pub fn take_damage(&mut self, now_ms: f64) {
        if !self.invulnerable {
            self.lives = self.lives.saturating_sub(1);
            self.invulnerable = true;
            self.invulnerable_since_ms = now_ms;
        }
    }

    /// Advance the invulnerability timer
    pub fn update(&mut self, now_ms: f64) {
        if self.invulnerable && now_ms - self.invulnerable_since_ms > INVULNERABILITY_MS {
            self.invulnerable = false;
        }
    }
}

/// A player shot. Position is the top-left corner of its bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub damage: u32,
    pub powered: bool,
    pub active: bool,
}

impl Projectile {
    pub fn new(x: f32, y: f32, powered: bool) -> Self {
        Self {
            pos: Vec2::new(x, y),
            damage: if powered {
                PROJECTILE_POWER_DAMAGE
            } else {
                PROJECTILE_DAMAGE
            },
            powered,
            active: true,
        }
    }

    /// Center of the bounding box (collision reference point)
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(PROJECTILE_WIDTH / 2.0, PROJECTILE_HEIGHT / 2.0)
    }

    /// Move one step upward; deactivate once fully above the top edge
    pub fn update(&mut self) {
        self.pos.y -= PROJECTILE_SPEED;
        if self.pos.y < -PROJECTILE_HEIGHT {
            self.active = false;
        }
    }
}

/// A falling coin target. Position is the center of the disc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub kind: CoinKind,
    pub health: u32,
    pub max_health: u32,
    pub active: bool,
    /// Cosmetic spin, radians
    pub rotation: f32,
}

impl Coin {
    pub fn new(x: f32, y: f32, kind: CoinKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            kind,
            health: kind.health(),
            max_health: kind.health(),
            active: true,
            rotation: 0.0,
        }
    }

    /// Apply damage. Returns the coin's point value exactly once, on the
    /// call where cumulative damage first reaches max health; 0 otherwise.
    /// The coin deactivates at the same moment.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        if !self.active {
            return 0;
        }
        self.health = self.health.saturating_sub(damage);
        if self.health == 0 {
            self.active = false;
            return self.kind.points();
        }
        0
    }

    /// Fall one step; deactivate once below the bottom edge
    pub fn update(&mut self) {
        self.pos.y += COIN_FALL_SPEED;
        self.rotation += COIN_ROTATION_STEP;
        if self.pos.y > CANVAS_HEIGHT + COIN_RADIUS {
            self.active = false;
        }
    }
}

/// A falling rock hazard. Position is the center.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rock {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    pub active: bool,
}

impl Rock {
    /// Size is drawn uniformly from the base range, scaled up on level 2;
    /// speed is fixed per level.
    pub fn new(x: f32, y: f32, level: u32, rng: &mut impl Rng) -> Self {
        let size_multiplier = if level == 2 {
            ROCK_SIZE_MULTIPLIER_LEVEL2
        } else {
            1.0
        };
        Self {
            pos: Vec2::new(x, y),
            size: rng.random_range(ROCK_MIN_SIZE..ROCK_MAX_SIZE) * size_multiplier,
            speed: if level == 1 {
                ROCK_SPEED_LEVEL1
            } else {
                ROCK_SPEED_LEVEL2
            },
            rotation: 0.0,
            rotation_speed: rng.random_range(-0.05..0.05),
            active: true,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Fall one step; deactivate once below the bottom edge
    pub fn update(&mut self) {
        self.pos.y += self.speed;
        self.rotation += self.rotation_speed;
        if self.pos.y > CANVAS_HEIGHT + self.size {
            self.active = false;
        }
    }
}

/// A short-lived visual spark from a destroyed coin or a hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Constant after creation; no drag, no gravity
    pub vel: Vec2,
    /// 1.0 at birth, dead at <= 0
    pub life: f32,
    pub color: [u8; 3],
    pub size: f32,
}

impl Particle {
    pub fn new(pos: Vec2, color: [u8; 3], rng: &mut impl Rng) -> Self {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(1.0..4.0);
        Self {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: 1.0,
            color,
            size: rng.random_range(2.0..6.0),
        }
    }

    /// Advance by `step_scale` steps worth of drift and decay
    pub fn update(&mut self, step_scale: f32) {
        self.pos += self.vel;
        self.life -= step_scale * PARTICLE_DECAY_RATE;
    }
}

/// Result of a purchase attempt in the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopOutcome {
    /// Cost deducted, upgrade owned from now on
    Purchased,
    /// Upgrade already bought this session; score unchanged
    AlreadyOwned,
    /// Score below the cost; score unchanged
    InsufficientPoints,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; all randomness in the simulation flows through here
    pub rng: Pcg32,
    pub phase: Phase,
    pub score: u32,
    /// 1 or 2
    pub level: u32,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub coins: Vec<Coin>,
    pub rocks: Vec<Rock>,
    /// Visual only, not gameplay-affecting
    pub particles: Vec<Particle>,
    /// Shop upgrade, bought at most once per session and never revoked
    pub has_power_projectile: bool,
    /// Session clock, advanced by the fixed step each tick
    pub elapsed_ms: f64,
    pub last_shot_ms: f64,
    pub last_coin_spawn_ms: f64,
    pub last_rock_spawn_ms: f64,
}

impl GameState {
    /// New session sitting at the main menu
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: Phase::Menu,
            score: 0,
            level: 1,
            player: Player::spawn(),
            projectiles: Vec::new(),
            coins: Vec::new(),
            rocks: Vec::new(),
            particles: Vec::new(),
            has_power_projectile: false,
            elapsed_ms: 0.0,
            last_shot_ms: -PROJECTILE_COOLDOWN_MS,
            last_coin_spawn_ms: 0.0,
            last_rock_spawn_ms: 0.0,
        }
    }

    /// Score target for the current level
    pub fn level_target(&self) -> u32 {
        if self.level == 1 {
            LEVEL1_TARGET
        } else {
            LEVEL2_TARGET
        }
    }

    /// "Start" action: reset score/level/entities/lives/session flags and
    /// enter gameplay. Also serves as restart from GameOver/Victory.
    pub fn start_game(&mut self) {
        self.score = 0;
        self.level = 1;
        self.player = Player::spawn();
        self.projectiles.clear();
        self.coins.clear();
        self.rocks.clear();
        self.particles.clear();
        self.has_power_projectile = false;
        self.last_shot_ms = self.elapsed_ms - PROJECTILE_COOLDOWN_MS;
        self.last_coin_spawn_ms = self.elapsed_ms;
        self.last_rock_spawn_ms = self.elapsed_ms;
        self.phase = Phase::Playing;
        log::info!("session started (seed {})", self.seed);
    }

    /// "Pause" action (Playing only)
    pub fn pause(&mut self) {
        if self.phase == Phase::Playing {
            self.phase = Phase::Paused;
        }
    }

    /// "Resume" action (Paused only)
    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Playing;
        }
    }

    /// "Quit"/"menu" action from any overlay
    pub fn back_to_menu(&mut self) {
        self.phase = Phase::Menu;
    }

    /// "Open shop" action, permitted only while playing level 2
    pub fn open_shop(&mut self) {
        if self.phase == Phase::Playing && self.level == 2 {
            self.phase = Phase::Shop;
        }
    }

    /// "Close shop" action
    pub fn close_shop(&mut self) {
        if self.phase == Phase::Shop {
            self.phase = Phase::Playing;
        }
    }

    /// Attempt to buy the powered-projectile upgrade
    pub fn buy_power_projectile(&mut self) -> ShopOutcome {
        if self.has_power_projectile {
            return ShopOutcome::AlreadyOwned;
        }
        if self.score < POWER_PROJECTILE_COST {
            return ShopOutcome::InsufficientPoints;
        }
        self.score -= POWER_PROJECTILE_COST;
        self.has_power_projectile = true;
        log::info!("powered projectile bought, {} points left", self.score);
        ShopOutcome::Purchased
    }

    /// "Continue" action from the level transition: advance to level 2 with
    /// a fresh slate of entities. Score and lives persist.
    pub fn continue_to_next_level(&mut self) {
        if self.phase != Phase::LevelTransition {
            return;
        }
        self.level = 2;
        self.projectiles.clear();
        self.coins.clear();
        self.rocks.clear();
        self.particles.clear();
        self.phase = Phase::Playing;
        log::info!("level 2 started at score {}", self.score);
    }

    /// Check the current level's target after a score gain. Fires at most
    /// once per level because no further Playing frames run afterwards.
    pub(crate) fn check_level_complete(&mut self) {
        if self.score >= self.level_target() {
            if self.level == 1 {
                self.phase = Phase::LevelTransition;
                log::info!("level 1 target reached at score {}", self.score);
            } else {
                self.phase = Phase::Victory;
                log::info!("victory at score {}", self.score);
            }
        }
    }

    /// Spawn a fixed-count particle burst at `pos`
    pub(crate) fn burst(&mut self, pos: Vec2, color: [u8; 3]) {
        for _ in 0..PARTICLES_PER_BURST {
            let particle = Particle::new(pos, color, &mut self.rng);
            self.particles.push(particle);
        }
    }
}
