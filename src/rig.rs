//! Craft asset contract
//!
//! The visual model is loaded elsewhere. The core only needs to find the
//! thrust-effect emitters and ring decorations among its named sub-parts and
//! to know its overall size so it can be scaled to fit the tunnel. Everything
//! here is cosmetic and never touches collision, which uses the bounding
//! sphere radius from tuning.

use glam::Vec3;

/// Name fragment marking thrust-effect emitters
pub const THRUST_MARKER: &str = "circle";
/// Name fragment marking rotating ring decorations
pub const RING_MARKER: &str = "tor";
/// Largest model dimension after scaling, as a fraction of the tube radius
pub const FIT_RATIO: f32 = 0.9;

/// A loaded craft model as seen by the core
pub trait CraftAsset {
    /// Opaque handle to one node of the model
    type Handle: Clone;

    /// Every named node in the model's subtree
    fn nodes(&self) -> Vec<(String, Self::Handle)>;

    /// Axis-aligned bounding box size of the whole model
    fn extent(&self) -> Vec3;
}

/// Per-frame cosmetic values for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct RigPose<H> {
    /// Emitter handle and its z-scale
    pub thrusters: Vec<(H, f32)>,
    /// Ring handle and its z-rotation (radians)
    pub rings: Vec<(H, f32)>,
}

/// Sub-parts and scale discovered from a craft asset
#[derive(Debug, Clone)]
pub struct CraftRig<H> {
    pub thrusters: Vec<H>,
    pub rings: Vec<H>,
    /// Uniform scale that fits the model inside the tunnel
    pub scale: f32,
}

impl<H: Clone> CraftRig<H> {
    /// Classify the asset's nodes by case-insensitive name fragment and
    /// compute the fit scale
    pub fn discover<A: CraftAsset<Handle = H>>(asset: &A, tube_radius: f32) -> Self {
        let mut thrusters = Vec::new();
        let mut rings = Vec::new();
        for (name, handle) in asset.nodes() {
            let name = name.to_lowercase();
            if name.contains(THRUST_MARKER) {
                thrusters.push(handle.clone());
            }
            if name.contains(RING_MARKER) {
                rings.push(handle);
            }
        }

        let scale = fit_scale(asset.extent(), tube_radius);
        log::info!(
            "Craft rig: {} thruster(s), {} ring(s), scale {:.3}",
            thrusters.len(),
            rings.len(),
            scale
        );

        Self {
            thrusters,
            rings,
            scale,
        }
    }

    /// Cosmetic values for all parts at `elapsed` seconds
    pub fn pose(&self, elapsed: f32) -> RigPose<H> {
        RigPose {
            thrusters: self
                .thrusters
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), thrust_scale(i, elapsed)))
                .collect(),
            rings: self
                .rings
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), ring_rotation(i, elapsed)))
                .collect(),
        }
    }
}

/// Scale that makes the model's largest dimension `FIT_RATIO * tube_radius`.
/// Degenerate extents leave the model unscaled.
pub fn fit_scale(extent: Vec3, tube_radius: f32) -> f32 {
    let max_dim = extent.max_element();
    if !max_dim.is_finite() || max_dim <= 0.0 {
        log::warn!("Craft extent {extent:?} is degenerate, leaving model unscaled");
        return 1.0;
    }
    tube_radius * FIT_RATIO / max_dim
}

/// Flicker of emitter `index`
pub fn thrust_scale(index: usize, elapsed: f32) -> f32 {
    0.8 + 0.3 * (elapsed * 50.0 + index as f32).sin()
}

/// Spin of ring `index`
pub fn ring_rotation(index: usize, elapsed: f32) -> f32 {
    elapsed * 3.0 + index as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockAsset {
        nodes: Vec<(&'static str, u32)>,
        extent: Vec3,
    }

    impl CraftAsset for MockAsset {
        type Handle = u32;

        fn nodes(&self) -> Vec<(String, u32)> {
            self.nodes.iter().map(|(n, h)| (n.to_string(), *h)).collect()
        }

        fn extent(&self) -> Vec3 {
            self.extent
        }
    }

    fn ship() -> MockAsset {
        MockAsset {
            nodes: vec![
                ("Hull", 1),
                ("Circle.001", 2),
                ("engine_CIRCLE_left", 3),
                ("Torus", 4),
                ("ring_tor_2", 5),
                ("Wing", 6),
            ],
            extent: Vec3::new(1.0, 4.0, 2.0),
        }
    }

    #[test]
    fn test_discover_matches_case_insensitively() {
        let rig = CraftRig::discover(&ship(), 2.0);
        assert_eq!(rig.thrusters, vec![2, 3]);
        assert_eq!(rig.rings, vec![4, 5]);
        assert!((rig.scale - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_extent_is_unscaled() {
        assert_eq!(fit_scale(Vec3::ZERO, 2.0), 1.0);
        assert_eq!(fit_scale(Vec3::new(f32::NAN, 1.0, 1.0), 2.0), 2.0 * FIT_RATIO);
    }

    #[test]
    fn test_pose_values() {
        let rig = CraftRig::discover(&ship(), 2.0);
        let pose = rig.pose(0.0);
        assert_eq!(pose.thrusters.len(), 2);
        assert!((pose.thrusters[0].1 - 0.8).abs() < 1e-6);
        assert!((pose.thrusters[1].1 - (0.8 + 0.3 * 1.0f32.sin())).abs() < 1e-6);
        assert_eq!(pose.rings[1], (5, 1.0));

        let later = rig.pose(2.0);
        assert!((later.rings[0].1 - 6.0).abs() < 1e-6);
        for (_, s) in later.thrusters {
            assert!((0.5..=1.1).contains(&s));
        }
    }
}
