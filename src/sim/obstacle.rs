//! Obstacle walls placed along the travel axis
//!
//! Obstacles carry a logical sequence number: the index of the wall in the
//! endless run. A slot gets a fresh sequence number every time it is recycled,
//! which is what scoring keys on.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pool::{GeometryPool, ShapeId};
use super::ring::{RecyclingRing, RingEntity};
use crate::distance_behind;
use crate::tuning::{ReshapePolicy, Tuning};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub axis_position: f32,
    pub shape: ShapeId,
    /// Logical index in the run (0 for the first wall ever placed)
    pub sequence: u64,
}

impl RingEntity for Obstacle {
    fn axis_position(&self) -> f32 {
        self.axis_position
    }

    fn set_axis_position(&mut self, position: f32) {
        self.axis_position = position;
    }
}

#[derive(Debug, Clone)]
pub struct ObstacleRing {
    ring: RecyclingRing<Obstacle>,
    next_sequence: u64,
    cycle_cursor: usize,
    slack: f32,
    policy: ReshapePolicy,
}

impl ObstacleRing {
    /// Place `max_obstacles` walls, the first `first_obstacle_distance` ahead
    /// of the start, cycling through the pool for their initial shapes
    pub fn new(tuning: &Tuning, pool: &GeometryPool) -> Self {
        let count = tuning.max_obstacles;
        let obstacles = (0..count)
            .map(|i| Obstacle {
                axis_position: -(tuning.first_obstacle_distance
                    + i as f32 * tuning.obstacle_spacing),
                shape: pool.cycled(i),
                sequence: i as u64,
            })
            .collect();
        Self {
            ring: RecyclingRing::new(obstacles, tuning.obstacle_spacing),
            next_sequence: count as u64,
            cycle_cursor: count,
            slack: tuning.recycle_slack,
            policy: tuning.reshape_policy,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        self.ring.entries()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn spacing(&self) -> f32 {
        self.ring.pitch()
    }

    /// Sequence number the next recycled wall will get
    pub fn next_sequence(&self) -> u64 {
        self.next_sequence
    }

    /// Recycle walls more than `slack` behind the viewpoint, but never one that
    /// has not been scored yet (`sequence > last_scored`). A recycled wall is
    /// always placed ahead of the viewpoint, so after a long frame it skips
    /// the spacing slots the viewpoint has already flown past.
    pub fn advance<R: Rng>(
        &mut self,
        viewpoint: f32,
        last_scored: i64,
        pool: &GeometryPool,
        rng: &mut R,
    ) -> usize {
        let Self {
            ring,
            next_sequence,
            cycle_cursor,
            slack,
            policy,
        } = self;
        let slack = *slack;
        let policy = *policy;

        ring.recycle_ahead_of(
            viewpoint,
            |o| distance_behind(o.axis_position, viewpoint) > slack && o.sequence as i64 <= last_scored,
            |o| {
                o.sequence = *next_sequence;
                *next_sequence += 1;
                o.shape = match policy {
                    ReshapePolicy::Cycle => {
                        let id = pool.cycled(*cycle_cursor);
                        *cycle_cursor += 1;
                        id
                    }
                    ReshapePolicy::Random => pool.random_id(&mut *rng),
                };
                log::debug!(
                    "Recycled obstacle as #{} at {:.1} (shape {})",
                    o.sequence,
                    o.axis_position,
                    o.shape.0
                );
            },
        )
    }

    /// Unscored wall with the lowest sequence number that is already behind
    /// the viewpoint
    pub fn next_to_score(&self, viewpoint: f32, last_scored: i64) -> Option<&Obstacle> {
        self.obstacles()
            .iter()
            .filter(|o| o.sequence as i64 > last_scored)
            .filter(|o| distance_behind(o.axis_position, viewpoint) > 0.0)
            .min_by_key(|o| o.sequence)
    }

    /// Closest wall at or ahead of `position`
    pub fn nearest_ahead(&self, position: f32) -> Option<&Obstacle> {
        self.obstacles()
            .iter()
            .filter(|o| distance_behind(o.axis_position, position) <= 0.0)
            .max_by(|a, b| a.axis_position.total_cmp(&b.axis_position))
    }

    /// Positions from trailing to leading
    pub fn sorted_positions(&self) -> Vec<f32> {
        self.ring.sorted_positions()
    }
}
