//! Tunnel corridor segments
//!
//! Each segment spans `[axis_position - length, axis_position]`. Consecutive
//! segments overlap so the corridor never shows a seam.

use serde::{Deserialize, Serialize};

use super::ring::{RecyclingRing, RingEntity};
use crate::distance_behind;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TunnelSegment {
    /// Trailing edge of the segment (its largest axis value)
    pub axis_position: f32,
    pub length: f32,
}

impl TunnelSegment {
    /// Leading edge (smallest axis value)
    pub fn leading_edge(&self) -> f32 {
        self.axis_position - self.length
    }

    pub fn covers(&self, position: f32) -> bool {
        position <= self.axis_position && position >= self.leading_edge()
    }
}

impl RingEntity for TunnelSegment {
    fn axis_position(&self) -> f32 {
        self.axis_position
    }

    fn set_axis_position(&mut self, position: f32) {
        self.axis_position = position;
    }
}

#[derive(Debug, Clone)]
pub struct TunnelRing {
    ring: RecyclingRing<TunnelSegment>,
    length: f32,
}

impl TunnelRing {
    /// Lay out `num_segments` segments from the start position forward
    pub fn new(tuning: &Tuning) -> Self {
        let pitch = tuning.segment_pitch();
        let segments = (0..tuning.num_segments)
            .map(|i| TunnelSegment {
                axis_position: -(i as f32) * pitch,
                length: tuning.segment_length,
            })
            .collect();
        Self {
            ring: RecyclingRing::new(segments, pitch),
            length: tuning.segment_length,
        }
    }

    pub fn segments(&self) -> &[TunnelSegment] {
        self.ring.entries()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Recycle segments whose trailing edge is more than one segment length
    /// behind the viewpoint. Returns the number of relocations.
    pub fn advance(&mut self, viewpoint: f32) -> usize {
        let length = self.length;
        let moved = self.ring.recycle(
            |s| distance_behind(s.axis_position, viewpoint) > length,
            |_| {},
        );
        if moved > 0 {
            log::debug!(
                "Recycled {moved} tunnel segment(s), lead now {:?}",
                self.ring.leading_position()
            );
        }
        moved
    }

    /// True if some segment covers `position`
    pub fn covers(&self, position: f32) -> bool {
        self.segments().iter().any(|s| s.covers(position))
    }

    /// Largest uncovered stretch between consecutive segments (0 when the
    /// corridor is seamless)
    pub fn max_gap(&self) -> f32 {
        let mut segments: Vec<&TunnelSegment> = self.segments().iter().collect();
        segments.sort_by(|a, b| b.axis_position.total_cmp(&a.axis_position));
        segments
            .windows(2)
            .map(|w| w[0].leading_edge() - w[1].axis_position)
            .fold(0.0, f32::max)
    }

    /// Axial range covered from trailing to leading edge
    pub fn span(&self) -> Option<(f32, f32)> {
        let trailing = self.ring.trailing_position()?;
        let leading = self.ring.leading_position()? - self.length;
        Some((trailing, leading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f32 = 1e-3;

    #[test]
    fn test_initial_layout() {
        let tunnel = TunnelRing::new(&Tuning::default());
        assert_eq!(tunnel.len(), 12);
        assert_eq!(tunnel.segments()[0].axis_position, 0.0);
        assert!((tunnel.segments()[11].axis_position + 11.0 * 19.8).abs() < EPS);
        assert!(tunnel.max_gap() <= EPS);
        assert!(tunnel.covers(0.0));
        assert!(tunnel.covers(-200.0));
    }

    #[test]
    fn test_segment_not_recycled_until_a_full_length_behind() {
        let mut tunnel = TunnelRing::new(&Tuning::default());
        assert_eq!(tunnel.advance(-19.9), 0);
        assert_eq!(tunnel.advance(-20.1), 1);
        let (_, leading) = tunnel.span().expect("non-empty");
        assert!((leading - (-12.0 * 19.8 - 20.0)).abs() < EPS);
    }

    #[test]
    fn test_long_run_stays_seamless() {
        let tuning = Tuning::default();
        let mut tunnel = TunnelRing::new(&tuning);
        let mut viewpoint = 0.0;
        for _ in 0..10_000 {
            viewpoint -= tuning.camera_speed / 60.0;
            tunnel.advance(viewpoint);
            assert!(tunnel.max_gap() <= EPS);
            assert!(tunnel.covers(viewpoint));
            assert!(tunnel.covers(viewpoint - tuning.camera_speed / 60.0));
        }
    }

    proptest! {
        #[test]
        fn prop_recycle_keeps_coverage(steps in proptest::collection::vec(0.0f32..45.0, 1..60)) {
            let mut tunnel = TunnelRing::new(&Tuning::default());
            let mut viewpoint = 0.0;
            for step in steps {
                viewpoint -= step;
                tunnel.advance(viewpoint);
                prop_assert!(tunnel.max_gap() <= EPS);
                prop_assert!(tunnel.covers(viewpoint));
            }
        }
    }
}
