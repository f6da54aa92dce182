//! Hole patterns punched into obstacle walls
//!
//! A pattern is described in the wall's own cross-section plane, centred on the
//! tunnel axis. Patterns come from a small fixed catalog or from random
//! placement with a minimum angular separation between holes.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{angular_distance, polar_to_cartesian};

/// Catalog hole radius and centre distance, as a fraction of the tube radius
pub const CATALOG_HOLE_RATIO: f32 = 0.49;

/// Hole outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoleShape {
    Circle,
    Square,
    Triangle,
}

impl HoleShape {
    const ALL: [HoleShape; 3] = [HoleShape::Circle, HoleShape::Square, HoleShape::Triangle];
}

/// A single passable gap in an obstacle wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub shape: HoleShape,
    /// Centre in the cross-section plane
    pub center: Vec2,
    /// Placement angle around the axis (triangles are also rotated by it)
    pub angle: f32,
    /// Circle radius, square side length, or triangle circumscribed diameter
    pub size: f32,
}

impl Hole {
    pub fn new(shape: HoleShape, angle: f32, distance: f32, size: f32) -> Self {
        Self {
            shape,
            center: polar_to_cartesian(distance, angle),
            angle,
            size,
        }
    }

    /// Radius of the largest circle centred on the hole that fits inside it
    pub fn clearance(&self) -> f32 {
        match self.shape {
            HoleShape::Circle => self.size,
            HoleShape::Square => self.size / 2.0,
            // Inradius of an equilateral triangle is half its circumradius
            HoleShape::Triangle => self.size / 4.0,
        }
    }

    /// True if a sphere at `point` needing `required` margin fits through
    pub fn admits(&self, point: Vec2, required: f32) -> bool {
        point.distance(self.center) < self.clearance() - required
    }

    /// Closest point to the hole centre the craft can reach when its offset is
    /// limited to `max_offset` on each axis
    pub fn aim_point(&self, max_offset: f32) -> Vec2 {
        self.center.clamp(Vec2::splat(-max_offset), Vec2::splat(max_offset))
    }

    /// True if the craft can reach a position where this hole admits it
    pub fn is_passable(&self, required: f32, max_offset: f32) -> bool {
        self.admits(self.aim_point(max_offset), required)
    }

    /// Outline vertices for polygonal holes (empty for circles)
    pub fn vertices(&self) -> Vec<Vec2> {
        match self.shape {
            HoleShape::Circle => Vec::new(),
            HoleShape::Square => {
                let h = self.size / 2.0;
                vec![
                    self.center + Vec2::new(-h, -h),
                    self.center + Vec2::new(h, -h),
                    self.center + Vec2::new(h, h),
                    self.center + Vec2::new(-h, h),
                ]
            }
            HoleShape::Triangle => (0..3)
                .map(|j| {
                    let theta = self.angle + TAU * (j as f32 / 3.0);
                    self.center + polar_to_cartesian(self.size / 2.0, theta)
                })
                .collect(),
        }
    }
}

/// Ordered set of holes on one wall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ObstaclePattern {
    pub holes: Vec<Hole>,
}

impl ObstaclePattern {
    pub fn new(holes: Vec<Hole>) -> Self {
        Self { holes }
    }

    /// True if `point` lies safely inside any hole
    pub fn admits(&self, point: Vec2, required: f32) -> bool {
        self.holes.iter().any(|h| h.admits(point, required))
    }

    /// True if at least one hole is wide enough and within reach
    pub fn is_passable(&self, required: f32, max_offset: f32) -> bool {
        self.holes.iter().any(|h| h.is_passable(required, max_offset))
    }

    /// Hole with the largest clearance
    pub fn roomiest_hole(&self) -> Option<&Hole> {
        self.holes
            .iter()
            .max_by(|a, b| a.clearance().total_cmp(&b.clearance()))
    }
}

/// Evenly spaced circular holes, starting at angle 0
pub fn evenly_spaced(count: usize, tube_radius: f32) -> ObstaclePattern {
    let r = tube_radius * CATALOG_HOLE_RATIO;
    let holes = (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count as f32;
            Hole::new(HoleShape::Circle, angle, r, r)
        })
        .collect();
    ObstaclePattern::new(holes)
}

/// The predefined patterns: two opposite holes, three holes 120° apart
pub fn catalog(tube_radius: f32) -> Vec<ObstaclePattern> {
    vec![evenly_spaced(2, tube_radius), evenly_spaced(3, tube_radius)]
}

/// Result of a bounded-attempt sampling run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample<T> {
    pub value: T,
    /// False when the attempt budget ran out and the best candidate was taken
    pub separated: bool,
    pub attempts: u32,
}

/// Draw an angle at least `min_separation` away from every angle in `used`.
///
/// Tries up to `max_attempts` candidates. If none satisfies the separation, the
/// candidate with the largest distance to its nearest neighbour is returned
/// with `separated == false`.
pub fn sample_separated<R: Rng>(
    rng: &mut R,
    used: &[f32],
    min_separation: f32,
    max_attempts: u32,
) -> Sample<f32> {
    let nearest = |angle: f32| {
        used.iter()
            .map(|&u| angular_distance(u, angle))
            .fold(f32::INFINITY, f32::min)
    };

    let mut best = (0.0_f32, f32::NEG_INFINITY);
    let max_attempts = max_attempts.max(1);
    for attempt in 1..=max_attempts {
        let angle = rng.random_range(0.0..TAU);
        let gap = nearest(angle);
        if gap >= min_separation {
            return Sample {
                value: angle,
                separated: true,
                attempts: attempt,
            };
        }
        if gap > best.1 {
            best = (angle, gap);
        }
    }

    Sample {
        value: best.0,
        separated: false,
        attempts: max_attempts,
    }
}

/// Random hole placement parameters
#[derive(Debug, Clone, Copy)]
pub struct RandomPatternParams {
    pub tube_radius: f32,
    pub hole_count: usize,
    pub min_separation: f32,
    pub max_attempts: u32,
}

/// Generate a random pattern. The flag is false if any hole had to be placed
/// closer than the minimum separation.
pub fn random_pattern<R: Rng>(
    rng: &mut R,
    params: &RandomPatternParams,
) -> (ObstaclePattern, bool) {
    let tube_radius = params.tube_radius;
    let mut used = Vec::with_capacity(params.hole_count);
    let mut holes = Vec::with_capacity(params.hole_count);
    let mut all_separated = true;

    for _ in 0..params.hole_count {
        let sample = sample_separated(rng, &used, params.min_separation, params.max_attempts);
        all_separated &= sample.separated;
        let angle = sample.value;
        used.push(angle);

        let distance = tube_radius * (0.5 + rng.random::<f32>() * 0.35);
        let shape = HoleShape::ALL[rng.random_range(0..HoleShape::ALL.len())];
        let size = match shape {
            HoleShape::Circle => tube_radius * (0.25 + rng.random::<f32>() * 0.15),
            HoleShape::Square => tube_radius * (0.35 + rng.random::<f32>() * 0.1),
            HoleShape::Triangle => tube_radius * (0.38 + rng.random::<f32>() * 0.08),
        };
        holes.push(Hole::new(shape, angle, distance, size));
    }

    (ObstaclePattern::new(holes), all_separated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::PI;

    #[test]
    fn test_catalog_layout() {
        let patterns = catalog(2.0);
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].holes.len(), 2);
        assert_eq!(patterns[1].holes.len(), 3);

        let opposite = &patterns[0].holes[1];
        assert!((opposite.angle - PI).abs() < 1e-5);
        assert!((opposite.center.x + 0.98).abs() < 1e-5);
        assert!((opposite.size - 0.98).abs() < 1e-6);
    }

    #[test]
    fn test_clearance_per_shape() {
        let circle = Hole::new(HoleShape::Circle, 0.0, 1.0, 0.8);
        let square = Hole::new(HoleShape::Square, 0.0, 1.0, 0.8);
        let triangle = Hole::new(HoleShape::Triangle, 0.0, 1.0, 0.8);
        assert!((circle.clearance() - 0.8).abs() < 1e-6);
        assert!((square.clearance() - 0.4).abs() < 1e-6);
        assert!((triangle.clearance() - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_triangle_inradius_fits_inside_outline() {
        let tri = Hole::new(HoleShape::Triangle, 0.3, 1.0, 1.0);
        let verts = tri.vertices();
        assert_eq!(verts.len(), 3);
        // Distance from the centre to each edge midpoint is the inradius
        for i in 0..3 {
            let mid = (verts[i] + verts[(i + 1) % 3]) / 2.0;
            assert!((mid.distance(tri.center) - tri.clearance()).abs() < 1e-5);
        }
    }

    #[test]
    fn test_sample_separated_respects_used_angles() {
        let mut rng = Pcg32::seed_from_u64(7);
        let used = [0.0, PI];
        for _ in 0..50 {
            let sample = sample_separated(&mut rng, &used, PI / 6.0, 10);
            if sample.separated {
                assert!(used.iter().all(|&u| angular_distance(u, sample.value) >= PI / 6.0));
            }
        }
    }

    #[test]
    fn test_sample_separated_falls_back_when_impossible() {
        let mut rng = Pcg32::seed_from_u64(3);
        // No angle can be farther than π from anything
        let sample = sample_separated(&mut rng, &[0.0], PI + 0.5, 5);
        assert!(!sample.separated);
        assert_eq!(sample.attempts, 5);
        assert!((0.0..TAU).contains(&sample.value));
    }

    #[test]
    fn test_random_pattern_hole_bounds() {
        let mut rng = Pcg32::seed_from_u64(42);
        let params = RandomPatternParams {
            tube_radius: 2.0,
            hole_count: 3,
            min_separation: PI / 6.0,
            max_attempts: 10,
        };
        for _ in 0..20 {
            let (pattern, _) = random_pattern(&mut rng, &params);
            assert_eq!(pattern.holes.len(), 3);
            for hole in &pattern.holes {
                let d = hole.center.length();
                assert!((1.0..1.7 + 1e-4).contains(&d), "centre distance {d}");
                let max_size = match hole.shape {
                    HoleShape::Circle => 0.8,
                    HoleShape::Square => 0.9,
                    HoleShape::Triangle => 0.92,
                };
                assert!(hole.size <= max_size + 1e-4);
            }
        }
    }

    #[test]
    fn test_roomiest_hole() {
        let pattern = ObstaclePattern::new(vec![
            Hole::new(HoleShape::Square, 0.0, 1.0, 0.9),
            Hole::new(HoleShape::Circle, PI, 1.0, 0.6),
        ]);
        let best = pattern.roomiest_hole().expect("non-empty");
        assert_eq!(best.shape, HoleShape::Circle);
        assert!(pattern.is_passable(0.425, 1.6));
        assert!(!ObstaclePattern::default().is_passable(0.0, 1.6));
    }

    #[test]
    fn test_hole_out_of_reach_is_not_passable() {
        // Wide enough, but its centre lies beyond the steering limit
        let far = Hole::new(HoleShape::Circle, 0.0, 1.7, 0.5);
        assert!(!far.is_passable(0.425, 1.6));
        assert_eq!(far.aim_point(1.6), Vec2::new(1.6, 0.0));

        let near = Hole::new(HoleShape::Circle, 0.0, 1.0, 0.5);
        assert!(near.is_passable(0.425, 1.6));
    }

    proptest! {
        #[test]
        fn prop_admits_is_deterministic(x in -2.0f32..2.0, y in -2.0f32..2.0) {
            let pattern = evenly_spaced(3, 2.0);
            let p = Vec2::new(x, y);
            prop_assert_eq!(pattern.admits(p, 0.425), pattern.admits(p, 0.425));
        }
    }
}
