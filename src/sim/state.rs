//! Game state and session lifecycle
//!
//! `GameState` is the whole world for one run: rings, craft, score and phase.
//! It is owned by whoever drives the frame loop and mutated only by
//! [`super::tick`] and [`GameState::reset_session`].

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::motion::{Attitude, Craft};
use super::obstacle::ObstacleRing;
use super::pool::GeometryPool;
use super::tunnel::TunnelRing;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Flying; ticks advance the world
    Running,
    /// Craft struck a wall; ticks are ignored until reset
    GameOver,
}

/// Complete world state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the shape pool and reshaping draw from
    pub seed: u64,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub score: u64,
    /// Sequence number of the last wall scored (-1 before the first)
    pub last_scored_obstacle: i64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulated seconds since the session started
    pub elapsed: f32,
    /// Viewpoint position on the travel axis (decreases while flying)
    pub viewpoint: f32,
    /// `None` when the craft asset is unavailable
    pub craft: Option<Craft>,
    pub pool: GeometryPool,
    pub tunnel: TunnelRing,
    pub obstacles: ObstacleRing,
    pub(crate) rng: Pcg32,
    /// RNG state right after pool generation, restored on reset
    session_rng: Pcg32,
}

impl GameState {
    /// Create a new game state with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(Tuning::default(), seed)
    }

    pub fn with_tuning(tuning: Tuning, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let pool = GeometryPool::generate(&mut rng, &tuning);
        let tunnel = TunnelRing::new(&tuning);
        let obstacles = ObstacleRing::new(&tuning, &pool);
        let craft = Some(Craft::new(tuning.craft_radius()));

        log::info!(
            "Session start: seed={seed}, {} segments, {} obstacles, {} shapes",
            tunnel.len(),
            obstacles.len(),
            pool.len()
        );

        Self {
            seed,
            tuning,
            phase: GamePhase::Running,
            score: 0,
            last_scored_obstacle: -1,
            time_ticks: 0,
            elapsed: 0.0,
            viewpoint: 0.0,
            craft,
            pool,
            tunnel,
            obstacles,
            session_rng: rng.clone(),
            rng,
        }
    }

    /// Start a new run: rings, craft offsets, score and phase all return to
    /// their initial values. The shape pool and craft presence are kept.
    pub fn reset_session(&mut self) {
        self.phase = GamePhase::Running;
        self.score = 0;
        self.last_scored_obstacle = -1;
        self.time_ticks = 0;
        self.elapsed = 0.0;
        self.viewpoint = 0.0;
        if let Some(craft) = self.craft.as_mut() {
            craft.recenter();
        }
        self.tunnel = TunnelRing::new(&self.tuning);
        self.obstacles = ObstacleRing::new(&self.tuning, &self.pool);
        self.rng = self.session_rng.clone();
        log::info!("Session reset (seed={})", self.seed);
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Score of a finished run
    pub fn final_score(&self) -> Option<u64> {
        match self.phase {
            GamePhase::GameOver => Some(self.score),
            GamePhase::Running => None,
        }
    }

    /// Craft position on the travel axis (it rides ahead of the viewpoint)
    pub fn craft_axis_position(&self) -> f32 {
        self.viewpoint - self.tuning.craft_lead
    }

    /// Craft asset failed to load: motion and collision go inert
    pub fn detach_craft(&mut self) {
        if self.craft.take().is_some() {
            log::warn!("Craft detached; collision disabled");
        }
    }

    /// Craft asset became available
    pub fn attach_craft(&mut self) {
        if self.craft.is_none() {
            self.craft = Some(Craft::new(self.tuning.craft_radius()));
            log::info!("Craft attached");
        }
    }

    pub fn has_craft(&self) -> bool {
        self.craft.is_some()
    }

    /// Cosmetic orientation of the craft, if present
    pub fn craft_attitude(&self) -> Option<Attitude> {
        self.craft
            .as_ref()
            .map(|c| c.attitude(self.tuning.rocket_max_offset()))
    }
}
