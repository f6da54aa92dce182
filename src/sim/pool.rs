//! Geometry pool of obstacle wall shapes
//!
//! Shapes are generated once per run and never mutated. Obstacles refer to
//! them by [`ShapeId`], so any number of obstacles can share one shape.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pattern::{self, Hole, HoleShape, ObstaclePattern, RandomPatternParams};
use crate::tuning::{PatternSource, Tuning};

/// Index of a shape inside a [`GeometryPool`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeId(pub usize);

/// A disc of `outer_radius` with holes punched per `pattern`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleShape {
    pub outer_radius: f32,
    pub thickness: f32,
    pub pattern: ObstaclePattern,
}

/// Generation inputs for [`generate_shape_catalog`]
#[derive(Debug, Clone, Copy)]
pub struct CatalogParams {
    pub count: usize,
    pub tube_radius: f32,
    pub thickness: f32,
    pub source: PatternSource,
    pub min_separation: f32,
    pub max_attempts: u32,
    /// Clearance a hole needs so the craft can fly through it
    pub required_clearance: f32,
    /// Steering limit on each axis
    pub max_offset: f32,
}

impl CatalogParams {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            count: tuning.shape_pool_size,
            tube_radius: tuning.tube_radius,
            thickness: tuning.obstacle_thickness,
            source: tuning.pattern_source,
            min_separation: tuning.min_hole_separation,
            max_attempts: tuning.placement_attempts,
            required_clearance: tuning.required_clearance(),
            max_offset: tuning.rocket_max_offset(),
        }
    }
}

/// Generate `count` wall shapes with 2-3 holes each.
///
/// Every returned shape has at least one hole the craft can reach and fit
/// through: a random pattern without one gets its first hole replaced by a
/// catalog circle.
pub fn generate_shape_catalog<R: Rng>(rng: &mut R, params: &CatalogParams) -> Vec<ObstacleShape> {
    let catalog = pattern::catalog(params.tube_radius);
    let mut shapes = Vec::with_capacity(params.count);
    let mut degenerate = 0u32;

    for i in 0..params.count {
        let use_catalog = match params.source {
            PatternSource::Catalog => true,
            PatternSource::Random => false,
            PatternSource::Mixed => i % 2 == 0,
        };

        let pattern = if use_catalog {
            catalog[rng.random_range(0..catalog.len())].clone()
        } else {
            let hole_count = 2 + rng.random_range(0..2);
            let (mut pattern, separated) = pattern::random_pattern(
                rng,
                &RandomPatternParams {
                    tube_radius: params.tube_radius,
                    hole_count,
                    min_separation: params.min_separation,
                    max_attempts: params.max_attempts,
                },
            );
            if !separated {
                degenerate += 1;
                log::debug!("Shape {i}: holes placed closer than minimum separation");
            }
            if !pattern.is_passable(params.required_clearance, params.max_offset) {
                widen_first_hole(&mut pattern, params.tube_radius);
                log::debug!("Shape {i}: no passable hole, widened first hole");
            }
            pattern
        };

        shapes.push(ObstacleShape {
            outer_radius: params.tube_radius,
            thickness: params.thickness,
            pattern,
        });
    }

    log::info!(
        "Generated {} obstacle shapes ({} source, {} degenerate)",
        shapes.len(),
        params.source.as_str(),
        degenerate
    );
    shapes
}

fn widen_first_hole(pattern: &mut ObstaclePattern, tube_radius: f32) {
    let r = tube_radius * pattern::CATALOG_HOLE_RATIO;
    if let Some(first) = pattern.holes.first_mut() {
        *first = Hole::new(HoleShape::Circle, first.angle, r, r);
    } else {
        pattern.holes.push(Hole::new(HoleShape::Circle, 0.0, r, r));
    }
}

/// Immutable set of shapes shared by all obstacles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "PoolShapes")]
pub struct GeometryPool {
    shapes: Vec<ObstacleShape>,
}

/// Serialized form of a pool, checked before it becomes a [`GeometryPool`]
#[derive(Deserialize)]
struct PoolShapes {
    shapes: Vec<ObstacleShape>,
}

impl TryFrom<PoolShapes> for GeometryPool {
    type Error = String;

    fn try_from(value: PoolShapes) -> Result<Self, Self::Error> {
        if value.shapes.is_empty() {
            return Err("geometry pool needs at least one shape".to_string());
        }
        Ok(Self {
            shapes: value.shapes,
        })
    }
}

impl GeometryPool {
    /// Build a pool. An empty shape list gets the first catalog pattern so
    /// every [`ShapeId`] handed out stays valid.
    pub fn new(mut shapes: Vec<ObstacleShape>, tube_radius: f32, thickness: f32) -> Self {
        if shapes.is_empty() {
            shapes.push(ObstacleShape {
                outer_radius: tube_radius,
                thickness,
                pattern: pattern::evenly_spaced(2, tube_radius),
            });
        }
        Self { shapes }
    }

    pub fn generate<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        let shapes = generate_shape_catalog(rng, &CatalogParams::from_tuning(tuning));
        Self::new(shapes, tuning.tube_radius, tuning.obstacle_thickness)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Look up a shape. Ids wrap so a stale id never panics.
    pub fn get(&self, id: ShapeId) -> &ObstacleShape {
        &self.shapes[id.0 % self.shapes.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeId, &ObstacleShape)> {
        self.shapes.iter().enumerate().map(|(i, s)| (ShapeId(i), s))
    }

    /// Id for the `n`th slot, cycling through the pool
    pub fn cycled(&self, n: usize) -> ShapeId {
        ShapeId(n % self.shapes.len())
    }

    pub fn random_id<R: Rng>(&self, rng: &mut R) -> ShapeId {
        ShapeId(rng.random_range(0..self.shapes.len()))
    }
}
