//! Randomized entity generation
//!
//! Sizes and speeds scale with the current fall speed. All randomness goes
//! through the caller-supplied RNG, so spawn behavior is reproducible from
//! a seed.

use glam::Vec2;
use rand::Rng;

use super::state::{Config, Obstacle, Pickup, PickupReward};
use crate::consts::*;

/// Spawn one obstacle just above the visible field
///
/// Width and height are uniform in their ranges; x keeps the rectangle
/// inside the side margins; velocity is `speed_base` scaled by a
/// per-obstacle factor in [0.9, 1.2).
pub fn spawn_obstacle<R: Rng>(rng: &mut R, config: &Config, speed_base: f32, id: u32) -> Obstacle {
    let width = rng.random_range(OBSTACLE_MIN_WIDTH..OBSTACLE_MAX_WIDTH);
    let height = rng.random_range(OBSTACLE_MIN_HEIGHT..OBSTACLE_MAX_HEIGHT);
    let x = rng.random_range(FIELD_SIDE_MARGIN..(config.field_width - width - FIELD_SIDE_MARGIN));
    let vy = speed_base * rng.random_range(OBSTACLE_SPEED_MIN..OBSTACLE_SPEED_MAX);
    let hue = if config.varied_obstacle_colors {
        Some(rng.random_range(0..360u16))
    } else {
        None
    };

    Obstacle {
        id,
        pos: Vec2::new(x, OBSTACLE_SPAWN_Y),
        size: Vec2::new(width, height),
        vy,
        hue,
    }
}

/// Spawn one pickup just above the visible field
///
/// Gem-reward pickups drift at [0.6, 0.9) of `speed_base`; score-reward
/// pickups at [0.85, 1.1).
pub fn spawn_pickup<R: Rng>(rng: &mut R, config: &Config, speed_base: f32, id: u32) -> Pickup {
    let radius = PICKUP_RADIUS;
    let x = rng.random_range(radius..(config.field_width - radius));
    let factor = match config.pickup_reward {
        PickupReward::Gems { .. } => rng.random_range(GEM_SPEED_MIN..GEM_SPEED_MAX),
        PickupReward::Score { .. } => {
            rng.random_range(SCORE_PICKUP_SPEED_MIN..SCORE_PICKUP_SPEED_MAX)
        }
    };

    Pickup {
        id,
        pos: Vec2::new(x, PICKUP_SPAWN_Y),
        radius,
        vy: speed_base * factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_obstacle_ranges() {
        let mut rng = Pcg32::seed_from_u64(42);
        let config = Config::default();

        for id in 0..200 {
            let o = spawn_obstacle(&mut rng, &config, BASE_FALL_SPEED, id);
            assert!(o.size.x >= OBSTACLE_MIN_WIDTH && o.size.x < OBSTACLE_MAX_WIDTH);
            assert!(o.size.y >= OBSTACLE_MIN_HEIGHT && o.size.y < OBSTACLE_MAX_HEIGHT);
            assert!(o.pos.x >= FIELD_SIDE_MARGIN);
            assert!(o.pos.x + o.size.x <= config.field_width - FIELD_SIDE_MARGIN);
            assert_eq!(o.pos.y, OBSTACLE_SPAWN_Y);
            assert!(o.vy >= BASE_FALL_SPEED * OBSTACLE_SPEED_MIN);
            assert!(o.vy < BASE_FALL_SPEED * OBSTACLE_SPEED_MAX);
            assert_eq!(o.hue, None);
        }
    }

    #[test]
    fn test_obstacle_varied_colors() {
        let mut rng = Pcg32::seed_from_u64(42);
        let config = Config {
            varied_obstacle_colors: true,
            ..Config::default()
        };

        for id in 0..50 {
            let o = spawn_obstacle(&mut rng, &config, BASE_FALL_SPEED, id);
            let hue = o.hue.unwrap();
            assert!(hue < 360);
        }
    }

    #[test]
    fn test_pickup_ranges_gem_policy() {
        let mut rng = Pcg32::seed_from_u64(7);
        let config = Config::default();

        for id in 0..200 {
            let p = spawn_pickup(&mut rng, &config, BASE_FALL_SPEED, id);
            assert_eq!(p.radius, PICKUP_RADIUS);
            assert!(p.pos.x >= p.radius && p.pos.x < config.field_width - p.radius);
            assert_eq!(p.pos.y, PICKUP_SPAWN_Y);
            assert!(p.vy >= BASE_FALL_SPEED * GEM_SPEED_MIN);
            assert!(p.vy < BASE_FALL_SPEED * GEM_SPEED_MAX);
        }
    }

    #[test]
    fn test_pickup_ranges_score_policy() {
        let mut rng = Pcg32::seed_from_u64(7);
        let config = Config {
            pickup_reward: PickupReward::Score { points: 250 },
            ..Config::default()
        };

        for id in 0..200 {
            let p = spawn_pickup(&mut rng, &config, BASE_FALL_SPEED, id);
            assert!(p.vy >= BASE_FALL_SPEED * SCORE_PICKUP_SPEED_MIN);
            assert!(p.vy < BASE_FALL_SPEED * SCORE_PICKUP_SPEED_MAX);
        }
    }

    #[test]
    fn test_spawns_reproducible_from_seed() {
        let config = Config::default();
        let mut a = Pcg32::seed_from_u64(99999);
        let mut b = Pcg32::seed_from_u64(99999);

        for id in 0..20 {
            let oa = spawn_obstacle(&mut a, &config, 200.0, id);
            let ob = spawn_obstacle(&mut b, &config, 200.0, id);
            assert_eq!(oa.pos, ob.pos);
            assert_eq!(oa.size, ob.size);
            assert_eq!(oa.vy, ob.vy);
        }
    }
}
