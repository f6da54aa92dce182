//! Per-frame simulation tick
//!
//! The frame driver calls [`tick`] once per displayed frame with the wall-clock
//! delta. Order within a tick: travel and steering, scoring, collision, then
//! recycling of stale tunnel segments and walls.

use glam::Vec2;

use super::collision::{CollisionParams, check_collision, scoring_pass};
use super::motion::{SteeringInput, sanitize_dt, travel};
use super::state::{GamePhase, GameState};

/// Steering event from the input source. Only the latest value matters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SteeringChanged {
    pub x: f32,
    pub y: f32,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest steering reading
    pub steering: SteeringInput,
    /// Attract mode: the craft steers itself toward the next hole
    pub autopilot: bool,
}

impl TickInput {
    /// Overwrite the held steering with the newest event
    pub fn apply(&mut self, event: SteeringChanged) {
        self.steering = SteeringInput::new(event.x, event.y);
    }
}

/// What the presentation layer needs after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickResult {
    /// False once the run is over; the driver should stop its loop
    pub still_running: bool,
    /// Walls passed this tick (0 or 1)
    pub score_delta: u32,
    /// The craft struck a wall this tick
    pub collided: bool,
}

impl TickResult {
    fn halted() -> Self {
        Self {
            still_running: false,
            score_delta: 0,
            collided: false,
        }
    }
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickResult {
    // Don't tick once the run has ended
    if state.phase == GamePhase::GameOver {
        return TickResult::halted();
    }

    let dt = sanitize_dt(dt);
    state.time_ticks += 1;
    state.elapsed += dt;

    // --- Motion ---
    let previous_craft_z = state.craft_axis_position();
    state.viewpoint = travel(state.viewpoint, state.tuning.camera_speed, dt);

    let steering = if input.autopilot {
        autopilot_steering(state)
    } else {
        input.steering
    };
    let max_offset = state.tuning.rocket_max_offset();
    let smoothing_rate = state.tuning.smoothing_rate;
    if let Some(craft) = state.craft.as_mut() {
        craft.steer(steering, max_offset);
        craft.smooth(dt, smoothing_rate);
    }

    // --- Scoring ---
    let scored = scoring_pass(
        &state.obstacles,
        state.viewpoint,
        &mut state.last_scored_obstacle,
        &mut state.score,
    );
    if let Some(sequence) = scored {
        log::debug!("Passed wall #{sequence}, score {}", state.score);
    }
    let score_delta = u32::from(scored.is_some());

    // --- Collision ---
    if let Some(craft) = state.craft.as_ref() {
        let params = CollisionParams::from_tuning(&state.tuning);
        let result = check_collision(
            craft,
            state.craft_axis_position(),
            previous_craft_z,
            &state.obstacles,
            &state.pool,
            &params,
        );
        if result.hit {
            state.phase = GamePhase::GameOver;
            log::info!(
                "Game over: struck wall #{} at ({:.2}, {:.2}), final score {}",
                result.sequence.unwrap_or_default(),
                result.point.x,
                result.point.y,
                state.score
            );
            return TickResult {
                still_running: false,
                score_delta,
                collided: true,
            };
        }
    }

    // --- Recycling ---
    state.tunnel.advance(state.viewpoint);
    state.obstacles.advance(
        state.viewpoint,
        state.last_scored_obstacle,
        &state.pool,
        &mut state.rng,
    );

    TickResult {
        still_running: true,
        score_delta,
        collided: false,
    }
}

/// Steering that lines the craft up with the most reachable hole of the next
/// wall ahead. Centred when no wall is ahead or there is no craft.
pub fn autopilot_steering(state: &GameState) -> SteeringInput {
    let Some(craft) = state.craft.as_ref() else {
        return SteeringInput::default();
    };
    // Hold the line on a wall until the craft has cleared its collision band
    let band = CollisionParams::from_tuning(&state.tuning).band(craft.radius);
    let Some(next) = state
        .obstacles
        .nearest_ahead(state.craft_axis_position() + band)
    else {
        return SteeringInput::default();
    };

    let max_offset = state.tuning.rocket_max_offset();
    let required = craft.radius * state.tuning.hole_shrink;
    let pattern = &state.pool.get(next.shape).pattern;

    // Prefer passable holes, nearest first; otherwise the roomiest one
    let aim = pattern
        .holes
        .iter()
        .filter(|h| h.is_passable(required, max_offset))
        .map(|h| h.aim_point(max_offset))
        .min_by(|a, b| {
            a.distance(craft.offset)
                .total_cmp(&b.distance(craft.offset))
        })
        .or_else(|| pattern.roomiest_hole().map(|h| h.aim_point(max_offset)))
        .unwrap_or(Vec2::ZERO);

    SteeringInput::new(aim.x / max_offset, -aim.y / max_offset).clamped()
}
