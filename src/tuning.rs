//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a run can be retuned from a
//! JSON file without rebuilding.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Where obstacle wall patterns come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PatternSource {
    /// Evenly spaced circular holes from a fixed catalog
    #[default]
    Catalog,
    /// Random placement of circle/square/triangle holes
    Random,
    /// Alternate between catalog and random shapes
    Mixed,
}

impl PatternSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternSource::Catalog => "catalog",
            PatternSource::Random => "random",
            PatternSource::Mixed => "mixed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "catalog" | "predefined" => Some(PatternSource::Catalog),
            "random" => Some(PatternSource::Random),
            "mixed" | "mix" => Some(PatternSource::Mixed),
            _ => None,
        }
    }
}

/// How a recycled obstacle picks its next shape from the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReshapePolicy {
    /// Walk the pool in order
    Cycle,
    /// Pick uniformly from the pool
    #[default]
    Random,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Tunnel ===
    pub tube_radius: f32,
    pub segment_length: f32,
    pub num_segments: usize,
    pub segment_overlap: f32,

    // === Travel ===
    pub camera_speed: f32,

    // === Obstacles ===
    pub obstacle_spacing: f32,
    pub max_obstacles: usize,
    pub first_obstacle_distance: f32,
    pub obstacle_thickness: f32,
    pub shape_pool_size: usize,
    pub pattern_source: PatternSource,
    pub reshape_policy: ReshapePolicy,
    pub recycle_slack: f32,

    // === Craft ===
    pub craft_radius_ratio: f32,
    pub craft_lead: f32,
    pub max_offset_ratio: f32,
    pub smoothing_rate: f32,

    // === Collision ===
    pub collision_margin: f32,
    pub hole_shrink: f32,

    // === Pattern generation ===
    pub min_hole_separation: f32,
    pub placement_attempts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tube_radius: TUBE_RADIUS,
            segment_length: SEGMENT_LENGTH,
            num_segments: NUM_SEGMENTS,
            segment_overlap: SEGMENT_OVERLAP,

            camera_speed: CAMERA_SPEED,

            obstacle_spacing: OBSTACLE_SPACING,
            max_obstacles: MAX_OBSTACLES,
            first_obstacle_distance: FIRST_OBSTACLE_DISTANCE,
            obstacle_thickness: OBSTACLE_THICKNESS,
            shape_pool_size: SHAPE_POOL_SIZE,
            pattern_source: PatternSource::Catalog,
            reshape_policy: ReshapePolicy::Random,
            recycle_slack: RECYCLE_SLACK,

            craft_radius_ratio: CRAFT_RADIUS_RATIO,
            craft_lead: CRAFT_LEAD,
            max_offset_ratio: MAX_OFFSET_RATIO,
            smoothing_rate: SMOOTHING_RATE,

            collision_margin: COLLISION_MARGIN,
            hole_shrink: HOLE_SHRINK,

            min_hole_separation: MIN_HOLE_SEPARATION,
            placement_attempts: PLACEMENT_ATTEMPTS,
        }
    }
}

impl Tuning {
    /// Largest lateral craft offset on either axis
    pub fn rocket_max_offset(&self) -> f32 {
        self.tube_radius * self.max_offset_ratio
    }

    /// Craft bounding sphere radius
    pub fn craft_radius(&self) -> f32 {
        self.tube_radius * self.craft_radius_ratio
    }

    /// Distance a hole's clearance must exceed for the craft to pass
    pub fn required_clearance(&self) -> f32 {
        self.craft_radius() * self.hole_shrink
    }

    /// Half-width of the axial band around an obstacle plane
    pub fn collision_band(&self) -> f32 {
        self.obstacle_thickness / 2.0 + self.craft_radius() * self.collision_margin
    }

    /// Axial step between consecutive tunnel segments
    pub fn segment_pitch(&self) -> f32 {
        self.segment_length - self.segment_overlap
    }

    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("tube_radius", self.tube_radius),
            ("segment_length", self.segment_length),
            ("camera_speed", self.camera_speed),
            ("obstacle_spacing", self.obstacle_spacing),
            ("obstacle_thickness", self.obstacle_thickness),
            ("craft_radius_ratio", self.craft_radius_ratio),
            ("max_offset_ratio", self.max_offset_ratio),
            ("smoothing_rate", self.smoothing_rate),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: format!("must be positive and finite, got {value}"),
                });
            }
        }

        let non_negative = [
            ("segment_overlap", self.segment_overlap),
            ("first_obstacle_distance", self.first_obstacle_distance),
            ("recycle_slack", self.recycle_slack),
            ("craft_lead", self.craft_lead),
            ("collision_margin", self.collision_margin),
            ("hole_shrink", self.hole_shrink),
            ("min_hole_separation", self.min_hole_separation),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: format!("must be non-negative and finite, got {value}"),
                });
            }
        }

        let counts = [
            ("num_segments", self.num_segments),
            ("max_obstacles", self.max_obstacles),
            ("shape_pool_size", self.shape_pool_size),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be at least 1".to_string(),
                });
            }
        }

        if self.placement_attempts == 0 {
            return Err(TuningError::Invalid {
                field: "placement_attempts",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.segment_overlap >= self.segment_length {
            return Err(TuningError::Invalid {
                field: "segment_overlap",
                reason: format!(
                    "must be smaller than segment_length ({})",
                    self.segment_length
                ),
            });
        }

        Ok(())
    }
}
