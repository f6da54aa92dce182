//! Tube Runner - an endless flight through a tunnel of holed walls
//!
//! Core modules:
//! - `sim`: World simulation (recycling rings, steering, collision, scoring)
//! - `tuning`: Data-driven game balance
//! - `rig`: Craft asset contract (sub-part discovery, auto-scaling, cosmetics)
//!
//! Rendering, asset loading and UI overlays live outside this crate. They call
//! [`sim::tick`] once per displayed frame and react to the returned
//! [`sim::TickResult`].

pub mod rig;
pub mod sim;
pub mod tuning;

pub use rig::{CraftAsset, CraftRig};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Default tuning constants
pub mod consts {
    /// Tunnel cross-section radius
    pub const TUBE_RADIUS: f32 = 2.0;
    /// Length of one tunnel segment along the travel axis
    pub const SEGMENT_LENGTH: f32 = 20.0;
    /// Number of tunnel segments kept alive
    pub const NUM_SEGMENTS: usize = 12;
    /// Overlap between consecutive segments (hides seams)
    pub const SEGMENT_OVERLAP: f32 = 0.2;

    /// Forward speed of the viewpoint (units/s)
    pub const CAMERA_SPEED: f32 = 10.0;

    /// Distance between consecutive obstacles
    pub const OBSTACLE_SPACING: f32 = 60.0;
    /// Number of obstacles kept alive
    pub const MAX_OBSTACLES: usize = 8;
    /// Distance from the start position to the first obstacle
    pub const FIRST_OBSTACLE_DISTANCE: f32 = 40.0;
    /// Obstacle wall depth along the travel axis
    pub const OBSTACLE_THICKNESS: f32 = 0.18;
    /// Distinct wall shapes generated at startup
    pub const SHAPE_POOL_SIZE: usize = 15;
    /// How far behind the viewpoint an obstacle may drift before recycling
    pub const RECYCLE_SLACK: f32 = 10.0;

    /// Craft bounding sphere radius, as a fraction of the tube radius
    pub const CRAFT_RADIUS_RATIO: f32 = 0.25;
    /// Craft distance ahead of the viewpoint
    pub const CRAFT_LEAD: f32 = 5.0;
    /// Maximum lateral offset, as a fraction of the tube radius
    pub const MAX_OFFSET_RATIO: f32 = 0.8;
    /// Exponential approach rate of the craft offset (per second)
    pub const SMOOTHING_RATE: f32 = 5.0;

    /// Axial band multiplier applied to the craft radius
    pub const COLLISION_MARGIN: f32 = 1.1;
    /// Fraction of the craft radius a hole must clear
    pub const HOLE_SHRINK: f32 = 0.85;

    /// Minimum angle between randomly placed holes
    pub const MIN_HOLE_SEPARATION: f32 = std::f32::consts::FRAC_PI_6;
    /// Placement attempts per hole before accepting the best candidate
    pub const PLACEMENT_ATTEMPTS: u32 = 10;
}

/// Signed distance of `position` behind `viewpoint` on the travel axis.
///
/// The viewpoint travels toward decreasing axis values, so anything with a
/// larger axis value than the viewpoint is behind it (positive result) and
/// anything smaller is still ahead (negative result).
#[inline]
pub fn distance_behind(position: f32, viewpoint: f32) -> f32 {
    position - viewpoint
}

/// Smallest absolute difference between two angles, in [0, π]
#[inline]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let diff = (a - b).rem_euclid(std::f32::consts::TAU);
    diff.min(std::f32::consts::TAU - diff)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
