//! Craft vs. wall collision and pass-through scoring
//!
//! The craft is a bounding sphere. Near a wall plane it is safe only if its
//! centre sits well inside one of the wall's holes: closer to the hole centre
//! than the hole's clearance minus a fraction of the craft radius.

use glam::Vec2;

use super::motion::Craft;
use super::obstacle::ObstacleRing;
use super::pattern::ObstaclePattern;
use super::pool::GeometryPool;
use crate::tuning::Tuning;

/// Collision tolerances derived from tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionParams {
    /// Wall depth along the axis
    pub thickness: f32,
    /// Axial band multiplier on the craft radius
    pub margin: f32,
    /// Fraction of the craft radius a hole must clear
    pub shrink: f32,
}

impl CollisionParams {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            thickness: tuning.obstacle_thickness,
            margin: tuning.collision_margin,
            shrink: tuning.hole_shrink,
        }
    }

    /// Half-width of the axial band around a wall plane
    pub fn band(&self, craft_radius: f32) -> f32 {
        self.thickness / 2.0 + craft_radius * self.margin
    }
}

/// Result of a collision pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Whether the craft struck a wall
    pub hit: bool,
    /// Sequence number of the wall that was struck
    pub sequence: Option<u64>,
    /// Lateral craft offset at impact
    pub point: Vec2,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            sequence: None,
            point: Vec2::ZERO,
        }
    }
}

/// True if the craft at `offset` would strike a wall with this pattern
pub fn strikes_wall(offset: Vec2, craft_radius: f32, pattern: &ObstaclePattern, shrink: f32) -> bool {
    !pattern.admits(offset, craft_radius * shrink)
}

/// True if a wall plane at `plane` is within reach of the craft this tick:
/// inside the axial band, or crossed between the previous and current craft
/// positions (so a long frame cannot skip over a wall).
pub fn near_plane(craft_z: f32, previous_craft_z: f32, plane: f32, band: f32) -> bool {
    if (craft_z - plane).abs() < band {
        return true;
    }
    (previous_craft_z - plane) * (craft_z - plane) < 0.0
}

/// Test the craft against every wall in reach
pub fn check_collision(
    craft: &Craft,
    craft_z: f32,
    previous_craft_z: f32,
    obstacles: &ObstacleRing,
    pool: &GeometryPool,
    params: &CollisionParams,
) -> CollisionResult {
    let band = params.band(craft.radius);

    for obstacle in obstacles.obstacles() {
        if !near_plane(craft_z, previous_craft_z, obstacle.axis_position, band) {
            continue;
        }
        let shape = pool.get(obstacle.shape);
        if strikes_wall(craft.offset, craft.radius, &shape.pattern, params.shrink) {
            return CollisionResult {
                hit: true,
                sequence: Some(obstacle.sequence),
                point: craft.offset,
            };
        }
    }

    CollisionResult::miss()
}

/// Score at most one wall the viewpoint has passed.
///
/// Picks the unscored wall (sequence above `last_scored`) with the lowest
/// sequence that is behind the viewpoint, bumps `score` and records it.
/// Returns the sequence scored.
pub fn scoring_pass(
    obstacles: &ObstacleRing,
    viewpoint: f32,
    last_scored: &mut i64,
    score: &mut u64,
) -> Option<u64> {
    let passed = obstacles.next_to_score(viewpoint, *last_scored)?.sequence;
    *score += 1;
    *last_scored = passed as i64;
    Some(passed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar_to_cartesian;
    use crate::sim::pattern::{evenly_spaced, Hole, HoleShape};
    use crate::sim::pool::ObstacleShape;
    use crate::tuning::{ReshapePolicy, Tuning};
    use proptest::prelude::*;
    use std::f32::consts::PI;

    const R: f32 = 2.0;

    fn single_shape_pool(pattern: ObstaclePattern) -> GeometryPool {
        GeometryPool::new(
            vec![ObstacleShape {
                outer_radius: R,
                thickness: 0.18,
                pattern,
            }],
            R,
            0.18,
        )
    }

    #[test]
    fn test_centered_in_hole_is_safe() {
        // Hole radius 0.49R, craft radius 0.25R: 0 < 0.49R - 0.25R*0.85
        let pattern = evenly_spaced(2, R);
        let centre = pattern.holes[0].center;
        assert!(!strikes_wall(centre, R * 0.25, &pattern, 0.85));
    }

    #[test]
    fn test_between_holes_is_collision() {
        let pattern = evenly_spaced(2, R);
        // Straight up: equidistant from holes at 0 and π
        let p = Vec2::new(0.0, 1.2);
        for hole in &pattern.holes {
            assert!(p.distance(hole.center) >= hole.size);
        }
        assert!(strikes_wall(p, R * 0.25, &pattern, 0.85));
    }

    #[test]
    fn test_touching_hole_edge_is_not_enough() {
        let pattern = evenly_spaced(2, R);
        let hole = pattern.holes[0];
        // Inside the hole outline, but the sphere would clip the rim
        let p = hole.center + Vec2::new(hole.size - 0.2, 0.0);
        assert!(strikes_wall(p, R * 0.25, &pattern, 0.85));
    }

    #[test]
    fn test_square_hole_uses_inscribed_clearance() {
        let pattern = ObstaclePattern::new(vec![Hole::new(HoleShape::Square, 0.0, 1.0, 1.0)]);
        let centre = pattern.holes[0].center;
        // Clearance 0.5, needs more than 0.425
        assert!(!strikes_wall(centre, 0.5, &pattern, 0.85));
        assert!(strikes_wall(centre + Vec2::new(0.1, 0.0), 0.5, &pattern, 0.85));
    }

    #[test]
    fn test_near_plane_band_and_sweep() {
        assert!(near_plane(-100.1, -99.9, -100.0, 0.64));
        assert!(!near_plane(-98.0, -97.5, -100.0, 0.64));
        // Long frame jumps clean over the plane
        assert!(near_plane(-103.0, -97.0, -100.0, 0.64));
        // Both positions past the plane
        assert!(!near_plane(-103.0, -102.0, -100.0, 0.64));
    }

    #[test]
    fn test_check_collision_only_near_walls() {
        let tuning = Tuning {
            reshape_policy: ReshapePolicy::Cycle,
            ..Default::default()
        };
        let pool = single_shape_pool(evenly_spaced(2, R));
        let ring = ObstacleRing::new(&tuning, &pool);
        let params = CollisionParams::from_tuning(&tuning);
        let mut craft = Craft::new(tuning.craft_radius());
        craft.offset = Vec2::new(0.0, 1.2);

        // Far from any wall: no hit even though craft is off-hole
        let res = check_collision(&craft, -20.0, -19.8, &ring, &pool, &params);
        assert!(!res.hit);

        // At the first wall plane
        let res = check_collision(&craft, -40.0, -39.8, &ring, &pool, &params);
        assert!(res.hit);
        assert_eq!(res.sequence, Some(0));

        // Same spot, but lined up with a hole
        craft.offset = polar_to_cartesian(R * 0.49, PI);
        let res = check_collision(&craft, -40.0, -39.8, &ring, &pool, &params);
        assert!(!res.hit);
    }

    #[test]
    fn test_scoring_pass_counts_each_wall_once() {
        let tuning = Tuning::default();
        let pool = single_shape_pool(evenly_spaced(3, R));
        let ring = ObstacleRing::new(&tuning, &pool);
        let mut last = -1i64;
        let mut score = 0u64;

        assert_eq!(scoring_pass(&ring, -30.0, &mut last, &mut score), None);
        assert_eq!(scoring_pass(&ring, -41.0, &mut last, &mut score), Some(0));
        assert_eq!(scoring_pass(&ring, -41.0, &mut last, &mut score), None);
        assert_eq!((score, last), (1, 0));

        // Two walls passed at once: one per call
        assert_eq!(scoring_pass(&ring, -170.0, &mut last, &mut score), Some(1));
        assert_eq!(scoring_pass(&ring, -170.0, &mut last, &mut score), Some(2));
        assert_eq!(scoring_pass(&ring, -170.0, &mut last, &mut score), None);
        assert_eq!(score, 3);
    }

    proptest! {
        #[test]
        fn prop_hole_test_is_deterministic(x in -1.6f32..1.6, y in -1.6f32..1.6) {
            let pattern = evenly_spaced(3, R);
            let p = Vec2::new(x, y);
            let first = strikes_wall(p, 0.5, &pattern, 0.85);
            for _ in 0..4 {
                prop_assert_eq!(strikes_wall(p, 0.5, &pattern, 0.85), first);
            }
        }
    }
}
