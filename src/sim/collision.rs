//! Circle-circle collision tests
//!
//! Every contact in the game reduces to one test: Euclidean distance between
//! centers against the sum of effective radii. Box-shaped entities (player,
//! projectile) stand in a circle of half their width centered on the box.

use glam::Vec2;

use crate::consts::{COIN_RADIUS, PLAYER_WIDTH, PROJECTILE_WIDTH};

use super::state::{Coin, Player, Projectile, Rock};

/// True if two circles overlap (strict: touching exactly does not count)
#[inline]
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance(b) < radius_a + radius_b
}

/// Projectile vs. coin, with the projectile's effective radius of half its width
pub fn projectile_hits_coin(projectile: &Projectile, coin: &Coin) -> bool {
    circles_overlap(
        projectile.center(),
        PROJECTILE_WIDTH / 2.0,
        coin.pos,
        COIN_RADIUS,
    )
}

/// Player vs. rock
pub fn player_hits_rock(player: &Player, rock: &Rock) -> bool {
    circles_overlap(player.center(), PLAYER_WIDTH / 2.0, rock.pos, rock.radius())
}

/// Player vs. coin (contact penalty, not a scoring hit)
pub fn player_hits_coin(player: &Player, coin: &Coin) -> bool {
    circles_overlap(player.center(), PLAYER_WIDTH / 2.0, coin.pos, COIN_RADIUS)
}
