//! Per-tick simulation advance
//!
//! One `tick` call corresponds to one rendered frame. The host supplies
//! the frame's input and a pre-clamped time delta; the tick returns the
//! discrete events it produced, in order (any number of pickups collected,
//! at most one terminal collision).

use rand::Rng;

use super::collision::{circle_circle_overlap, circle_rect_overlap};
use super::spawn::{spawn_obstacle, spawn_pickup};
use super::state::{ControlMode, RunEvent, RunPhase, RunState};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Absolute target x from thumb drag (drag mode)
    pub target_x: Option<f32>,
    /// Raw tilt reading in degrees (tilt mode)
    pub tilt: Option<f32>,
    /// Begin the run (from `Idle`)
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the run by one tick
///
/// `Idle` waits for `start`; `Paused` and `GameOver` are inert. A
/// non-positive `dt` is a no-op; oversized deltas are capped at
/// [`MAX_TICK_DT`].
pub fn tick(state: &mut RunState, input: &TickInput, dt: f32) -> Vec<RunEvent> {
    let mut events = Vec::new();

    if input.pause {
        match state.phase {
            RunPhase::Running => {
                state.phase = RunPhase::Paused;
                return events;
            }
            RunPhase::Paused => state.phase = RunPhase::Running,
            _ => {}
        }
    }

    if state.phase == RunPhase::Idle && input.start {
        state.phase = RunPhase::Running;
    }

    if state.phase != RunPhase::Running {
        return events;
    }

    if dt <= 0.0 {
        return events;
    }
    let dt = dt.min(MAX_TICK_DT);

    // Input translation
    match state.config.control {
        ControlMode::Drag => {
            if let Some(x) = input.target_x {
                state.set_player_target_x(x);
            }
        }
        ControlMode::Tilt => {
            if let Some(reading) = input.tilt {
                state.apply_tilt(reading);
            }
        }
    }

    // Time, survival score, difficulty ramp
    state.elapsed += dt;
    state.accrue_score(dt);
    state.difficulty += dt * DIFFICULTY_RAMP;
    state.fall_speed = BASE_FALL_SPEED + state.difficulty * FALL_SPEED_RAMP;

    // Spawn timers. Both start at zero, so a fresh run spawns on its
    // first tick.
    state.obstacle_timer -= dt;
    state.pickup_timer -= dt;
    if state.obstacle_timer <= 0.0 {
        state.obstacle_timer =
            (OBSTACLE_SPAWN_MAX - state.difficulty * OBSTACLE_SPAWN_RAMP).max(OBSTACLE_SPAWN_MIN);
        let id = state.next_entity_id();
        let obstacle = spawn_obstacle(&mut state.rng, &state.config, state.fall_speed, id);
        state.obstacles.push(obstacle);
    }
    if state.pickup_timer <= 0.0 {
        state.pickup_timer = state.rng.random_range(PICKUP_SPAWN_MIN..PICKUP_SPAWN_MAX);
        let id = state.next_entity_id();
        let pickup = spawn_pickup(&mut state.rng, &state.config, state.fall_speed, id);
        state.pickups.push(pickup);
    }

    // Everything falls
    for obstacle in &mut state.obstacles {
        obstacle.pos.y += obstacle.vy * dt;
    }
    for pickup in &mut state.pickups {
        pickup.pos.y += pickup.vy * dt;
    }

    // Pickups: collect on contact, cull once the top edge is past the
    // despawn margin
    let player = state.player;
    let field_height = state.config.field_height;
    let reward = state.config.pickup_reward;
    state.pickups.retain(|pickup| {
        if circle_circle_overlap(pickup.pos, pickup.radius, player.pos, player.radius) {
            events.push(RunEvent::PickupCollected {
                pos: pickup.pos,
                reward,
            });
            false
        } else {
            pickup.top() <= field_height + PICKUP_CULL_MARGIN
        }
    });

    // Obstacles: a hit ends the run immediately, nothing else this tick
    // matters; survivors are culled once past the despawn margin
    let mut i = 0;
    while i < state.obstacles.len() {
        let obstacle = &state.obstacles[i];
        if circle_rect_overlap(player.pos, player.radius, obstacle.pos, obstacle.size) {
            events.push(RunEvent::Collision {
                pos: obstacle.pos + obstacle.size / 2.0,
            });
            state.phase = RunPhase::GameOver;
            return events;
        } else if obstacle.pos.y > field_height + OBSTACLE_CULL_MARGIN {
            state.obstacles.remove(i);
        } else {
            i += 1;
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Config, Obstacle, Pickup, PickupReward};
    use glam::Vec2;
    use proptest::prelude::*;

    const DT: f32 = 0.033;

    fn started(config: Config, seed: u64) -> RunState {
        let mut state = RunState::new(config, seed);
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
            0.0,
        );
        assert_eq!(state.phase, RunPhase::Running);
        state
    }

    /// Park the spawn timers so a test can control the entity lists
    fn disable_spawns(state: &mut RunState) {
        state.obstacle_timer = 1e9;
        state.pickup_timer = 1e9;
    }

    #[test]
    fn test_idle_waits_for_start() {
        let mut state = RunState::new(Config::default(), 1);
        let events = tick(&mut state, &TickInput::default(), DT);
        assert!(events.is_empty());
        assert_eq!(state.phase, RunPhase::Idle);
        assert_eq!(state.elapsed, 0.0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_first_second_of_survival() {
        // reset(360, 640, 18), then ~1s of 30 fps ticks
        let mut state = started(Config::new(360.0, 640.0, 18.0), 12345);
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), DT);
        }
        // 100 pts/s baseline, within one frame of rounding
        let expected = (state.elapsed * 100.0).floor() as i64;
        assert!(
            (state.score as i64 - expected).abs() <= 1,
            "score {} vs elapsed {}",
            state.score,
            state.elapsed
        );
        // Initial spawn timer is zero, so the first tick spawned
        assert!(!state.obstacles.is_empty());
    }

    #[test]
    fn test_nonpositive_dt_is_noop() {
        let mut state = started(Config::default(), 2);
        disable_spawns(&mut state);
        let before = state.clone();
        for dt in [0.0, -1.0, -0.001] {
            let events = tick(&mut state, &TickInput::default(), dt);
            assert!(events.is_empty());
        }
        assert_eq!(state.elapsed, before.elapsed);
        assert_eq!(state.score, before.score);
    }

    #[test]
    fn test_oversized_dt_is_capped() {
        let mut state = started(Config::default(), 3);
        tick(&mut state, &TickInput::default(), 5.0);
        assert!((state.elapsed - MAX_TICK_DT).abs() < 1e-6);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = started(Config::default(), 4);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), DT);
        }
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, RunPhase::Paused);

        let frozen = state.clone();
        for _ in 0..20 {
            let events = tick(&mut state, &TickInput::default(), DT);
            assert!(events.is_empty());
        }
        assert_eq!(state.elapsed, frozen.elapsed);
        assert_eq!(state.score, frozen.score);
        assert_eq!(state.obstacles.len(), frozen.obstacles.len());
        assert_eq!(state.pickups.len(), frozen.pickups.len());

        // Toggle back and time flows again
        tick(&mut state, &pause, DT);
        assert_eq!(state.phase, RunPhase::Running);
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.elapsed > frozen.elapsed);
    }

    #[test]
    fn test_falling_pickup_is_collected() {
        // Pickup at (100, -20) falling at 100 u/s toward a player parked
        // at (100, 300): contact after ~3s of ticks
        let mut state = started(Config::new(360.0, 640.0, 18.0), 5);
        disable_spawns(&mut state);
        state.player.pos = Vec2::new(100.0, 300.0);
        state.pickups.push(Pickup {
            id: 999,
            pos: Vec2::new(100.0, -20.0),
            radius: 10.0,
            vy: 100.0,
        });

        let mut collected = Vec::new();
        for _ in 0..170 {
            collected.extend(tick(&mut state, &TickInput::default(), 0.02));
            if state.pickups.is_empty() {
                break;
            }
            // Untouched pickups are never silently dropped mid-field
            assert_eq!(state.pickups.len(), 1);
        }

        assert_eq!(collected.len(), 1);
        let RunEvent::PickupCollected { pos, reward } = collected[0] else {
            panic!("expected a pickup event");
        };
        assert_eq!(reward, PickupReward::Gems { amount: 1 });
        // Collected on the tick where distance dipped below the radius sum
        assert!((pos.y - (300.0 - 28.0)).abs() < 100.0 * 0.02 + 1e-3);
        assert_eq!(state.phase, RunPhase::Running);
    }

    #[test]
    fn test_two_pickups_same_tick_both_fire() {
        let mut state = started(Config::default(), 6);
        disable_spawns(&mut state);
        state.player.pos = Vec2::new(180.0, 300.0);
        for (id, x) in [(100, 170.0), (101, 190.0)] {
            state.pickups.push(Pickup {
                id,
                pos: Vec2::new(x, 299.0),
                radius: 10.0,
                vy: 0.0,
            });
        }

        let events = tick(&mut state, &TickInput::default(), DT);
        assert_eq!(events.len(), 2);
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_overlapping_obstacle_collides_immediately() {
        // Obstacle covering x in [50,150], y in [0,40]; player at (100,20)
        let mut state = started(Config::new(360.0, 640.0, 18.0), 7);
        disable_spawns(&mut state);
        state.player.pos = Vec2::new(100.0, 20.0);
        state.obstacles.push(Obstacle {
            id: 999,
            pos: Vec2::new(50.0, 0.0),
            size: Vec2::new(100.0, 40.0),
            vy: 0.0,
            hue: None,
        });

        let events = tick(&mut state, &TickInput::default(), DT);
        assert!(matches!(events.as_slice(), [RunEvent::Collision { .. }]));
        assert!(state.is_over());
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = started(Config::default(), 8);
        disable_spawns(&mut state);
        state.obstacles.push(Obstacle {
            id: 999,
            pos: state.player.pos - Vec2::new(5.0, 5.0),
            size: Vec2::new(10.0, 10.0),
            vy: 0.0,
            hue: None,
        });
        tick(&mut state, &TickInput::default(), DT);
        assert!(state.is_over());

        let after = state.clone();
        for _ in 0..10 {
            let events = tick(
                &mut state,
                &TickInput {
                    start: true,
                    pause: true,
                    ..Default::default()
                },
                DT,
            );
            assert!(events.is_empty());
        }
        assert_eq!(state.score, after.score);
        assert_eq!(state.elapsed, after.elapsed);
        assert_eq!(state.obstacles.len(), after.obstacles.len());

        // A new state is the way back
        let fresh = RunState::new(state.config.clone(), 9);
        assert_eq!(fresh.phase, RunPhase::Idle);
    }

    #[test]
    fn test_offscreen_culling() {
        let mut state = started(Config::new(360.0, 640.0, 18.0), 10);
        disable_spawns(&mut state);
        state.player.pos = Vec2::new(340.0, 300.0);
        state.obstacles.push(Obstacle {
            id: 100,
            pos: Vec2::new(10.0, 701.0),
            size: Vec2::new(30.0, 16.0),
            vy: 0.0,
            hue: None,
        });
        state.pickups.push(Pickup {
            id: 101,
            pos: Vec2::new(10.0, 691.0),
            radius: 10.0,
            vy: 0.0,
        });

        let events = tick(&mut state, &TickInput::default(), DT);
        // Both past their margins (640+60 and 640+40): removed, no events
        assert!(events.is_empty());
        assert!(state.obstacles.is_empty());
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let config = Config::new(360.0, 640.0, 18.0);
        let mut a = started(config.clone(), 99999);
        let mut b = started(config, 99999);

        let inputs = [
            TickInput {
                target_x: Some(120.0),
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                target_x: Some(300.0),
                ..Default::default()
            },
        ];
        for _ in 0..120 {
            for input in &inputs {
                tick(&mut a, input, DT);
                tick(&mut b, input, DT);
            }
        }

        assert_eq!(a.score, b.score);
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.pickups.len(), b.pickups.len());
        for (oa, ob) in a.obstacles.iter().zip(&b.obstacles) {
            assert_eq!(oa.pos, ob.pos);
            assert_eq!(oa.vy, ob.vy);
        }
    }

    proptest! {
        #[test]
        fn prop_score_and_difficulty_never_decrease(deltas in prop::collection::vec(-0.01f32..0.05, 1..200)) {
            let mut state = started(Config::default(), 42);
            let mut last_score = state.score;
            let mut last_difficulty = state.difficulty;
            for dt in deltas {
                tick(&mut state, &TickInput::default(), dt);
                prop_assert!(state.score >= last_score);
                prop_assert!(state.difficulty >= last_difficulty);
                last_score = state.score;
                last_difficulty = state.difficulty;
            }
        }

        #[test]
        fn prop_entities_only_fall(seed in any::<u64>()) {
            let mut state = started(Config::default(), seed);
            for _ in 0..60 {
                tick(&mut state, &TickInput::default(), DT);
                for o in &state.obstacles {
                    prop_assert!(o.vy >= 0.0);
                }
                for p in &state.pickups {
                    prop_assert!(p.vy >= 0.0);
                }
                if state.is_over() {
                    break;
                }
            }
        }
    }
}
