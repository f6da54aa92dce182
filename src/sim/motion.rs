//! Viewpoint travel and craft steering
//!
//! The craft is expressed in viewpoint-relative coordinates: `offset` is its
//! lateral (x, y) displacement from the tunnel axis, and it rides a fixed
//! distance ahead of the viewpoint. Motion is an exponential approach, not a
//! physics model.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Latest joystick/pointer reading, each axis nominally in [-1, 1].
/// Positive `y` is "down" on the input device.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SteeringInput {
    pub x: f32,
    pub y: f32,
}

impl SteeringInput {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamp both axes to [-1, 1]; NaN reads as centred
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_axis(self.x),
            y: clamp_axis(self.y),
        }
    }
}

#[inline]
fn clamp_axis(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }
}

/// Treat negative or non-finite frame times as no time passing
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

/// New viewpoint position after travelling for `dt` seconds
#[inline]
pub fn travel(viewpoint: f32, speed: f32, dt: f32) -> f32 {
    viewpoint - speed * dt
}

/// Cosmetic orientation derived from the craft offset (radians)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Attitude {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

/// The player's craft, modelled as a bounding sphere
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Craft {
    /// Offset the craft is steering toward
    pub target: Vec2,
    /// Smoothed offset actually flown
    pub offset: Vec2,
    /// Bounding sphere radius used for collision
    pub radius: f32,
}

impl Craft {
    pub fn new(radius: f32) -> Self {
        Self {
            target: Vec2::ZERO,
            offset: Vec2::ZERO,
            radius,
        }
    }

    /// Set the target offset from steering input. Vertical input is inverted
    /// so pushing the stick up moves the craft up.
    pub fn steer(&mut self, input: SteeringInput, max_offset: f32) {
        let input = input.clamped();
        self.target = Vec2::new(input.x * max_offset, -input.y * max_offset);
    }

    /// Close the gap to the target by `min(1, rate * dt)` of its size
    pub fn smooth(&mut self, dt: f32, rate: f32) {
        let factor = (rate * dt).min(1.0);
        self.offset += (self.target - self.offset) * factor;
    }

    /// Banking and nose direction; never feeds back into collision
    pub fn attitude(&self, max_offset: f32) -> Attitude {
        let ratio = if max_offset > 0.0 {
            self.offset / max_offset
        } else {
            Vec2::ZERO
        };
        Attitude {
            pitch: ratio.y * 0.5,
            yaw: std::f32::consts::PI - ratio.x * 0.3,
            roll: -ratio.x,
        }
    }

    /// Return to the centre of the tunnel
    pub fn recenter(&mut self) {
        self.target = Vec2::ZERO;
        self.offset = Vec2::ZERO;
    }
}
