//! World simulation module
//!
//! All gameplay logic lives here. This module is headless and synchronous:
//! - One `tick` per displayed frame, scaled by the frame's delta time
//! - Seeded RNG only, so a seed reproduces a run's walls
//! - No rendering, asset or platform dependencies

pub mod collision;
pub mod motion;
pub mod obstacle;
pub mod pattern;
pub mod pool;
pub mod ring;
pub mod state;
pub mod tick;
pub mod tunnel;

pub use collision::{CollisionParams, CollisionResult, check_collision, scoring_pass, strikes_wall};
pub use motion::{Attitude, Craft, SteeringInput};
pub use obstacle::{Obstacle, ObstacleRing};
pub use pattern::{Hole, HoleShape, ObstaclePattern};
pub use pool::{GeometryPool, ObstacleShape, ShapeId, generate_shape_catalog};
pub use ring::{RecyclingRing, RingEntity};
pub use state::{GamePhase, GameState};
pub use tick::{SteeringChanged, TickInput, TickResult, autopilot_steering, tick};
pub use tunnel::{TunnelRing, TunnelSegment};
