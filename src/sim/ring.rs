//! Fixed-size recycling ring along the travel axis
//!
//! Tunnel segments and obstacles both simulate an endless world with a bounded
//! number of entities: once an entry falls behind, it is moved to just ahead of
//! the current leading entry. Entries are addressed by axis position, not by
//! index, so the ring needs no head/tail bookkeeping.

/// Something that lives at a single position on the travel axis
pub trait RingEntity {
    fn axis_position(&self) -> f32;
    fn set_axis_position(&mut self, position: f32);
}

/// Upper bound on recycle passes per call (each pass moves the lead forward)
const MAX_RECYCLE_PASSES: usize = 4096;

#[derive(Debug, Clone)]
pub struct RecyclingRing<T> {
    entries: Vec<T>,
    /// Axial distance between an entry and the one placed ahead of it
    pitch: f32,
}

impl<T: RingEntity> RecyclingRing<T> {
    pub fn new(entries: Vec<T>, pitch: f32) -> Self {
        Self { entries, pitch }
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [T] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Axis position of the entry furthest ahead (smallest value)
    pub fn leading_position(&self) -> Option<f32> {
        self.entries
            .iter()
            .map(RingEntity::axis_position)
            .min_by(f32::total_cmp)
    }

    /// Axis position of the entry furthest behind (largest value)
    pub fn trailing_position(&self) -> Option<f32> {
        self.entries
            .iter()
            .map(RingEntity::axis_position)
            .max_by(f32::total_cmp)
    }

    /// Positions ordered from trailing to leading
    pub fn sorted_positions(&self) -> Vec<f32> {
        let mut positions: Vec<f32> = self.entries.iter().map(RingEntity::axis_position).collect();
        positions.sort_by(|a, b| b.total_cmp(a));
        positions
    }

    /// Relocate every stale entry to one pitch ahead of the current leader.
    ///
    /// `on_recycle` runs on each entry right after it moves. Passes repeat
    /// until nothing is stale, so a large jump of the viewpoint is caught up in
    /// a single call. Returns the number of relocations.
    pub fn recycle<F, G>(&mut self, is_stale: F, on_recycle: G) -> usize
    where
        F: FnMut(&T) -> bool,
        G: FnMut(&mut T),
    {
        self.relocate(None, is_stale, on_recycle)
    }

    /// Like [`Self::recycle`], but an entry never lands at or behind
    /// `frontier`: it skips forward whole pitches to the first slot ahead.
    pub fn recycle_ahead_of<F, G>(&mut self, frontier: f32, is_stale: F, on_recycle: G) -> usize
    where
        F: FnMut(&T) -> bool,
        G: FnMut(&mut T),
    {
        self.relocate(Some(frontier), is_stale, on_recycle)
    }

    fn relocate<F, G>(&mut self, frontier: Option<f32>, mut is_stale: F, mut on_recycle: G) -> usize
    where
        F: FnMut(&T) -> bool,
        G: FnMut(&mut T),
    {
        let mut recycled = 0;
        for _ in 0..MAX_RECYCLE_PASSES {
            let mut moved = false;
            for i in 0..self.entries.len() {
                if !is_stale(&self.entries[i]) {
                    continue;
                }
                let Some(lead) = self.leading_position() else {
                    return recycled;
                };
                let mut target = lead - self.pitch;
                if let Some(frontier) = frontier {
                    if target >= frontier {
                        let skip = ((target - frontier) / self.pitch).floor() + 1.0;
                        target -= skip * self.pitch;
                        if target >= frontier {
                            target -= self.pitch;
                        }
                    }
                }
                let entry = &mut self.entries[i];
                entry.set_axis_position(target);
                on_recycle(entry);
                recycled += 1;
                moved = true;
            }
            if !moved {
                return recycled;
            }
        }
        log::warn!("Recycle pass limit reached after {recycled} relocations");
        recycled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Marker {
        z: f32,
        moves: u32,
    }

    impl RingEntity for Marker {
        fn axis_position(&self) -> f32 {
            self.z
        }
        fn set_axis_position(&mut self, position: f32) {
            self.z = position;
        }
    }

    fn ring(count: usize, pitch: f32) -> RecyclingRing<Marker> {
        let entries = (0..count)
            .map(|i| Marker {
                z: -(i as f32) * pitch,
                moves: 0,
            })
            .collect();
        RecyclingRing::new(entries, pitch)
    }

    #[test]
    fn test_leading_and_trailing() {
        let r = ring(4, 10.0);
        assert_eq!(r.leading_position(), Some(-30.0));
        assert_eq!(r.trailing_position(), Some(0.0));
        assert_eq!(r.sorted_positions(), vec![0.0, -10.0, -20.0, -30.0]);
    }

    #[test]
    fn test_recycle_moves_stale_to_front() {
        let mut r = ring(4, 10.0);
        let viewpoint = -15.0;
        let n = r.recycle(|m| m.z > viewpoint, |m| m.moves += 1);
        assert_eq!(n, 2);
        assert_eq!(r.sorted_positions(), vec![-20.0, -30.0, -40.0, -50.0]);
        assert_eq!(r.iter().map(|m| m.moves).sum::<u32>(), 2);
    }

    #[test]
    fn test_recycle_catches_up_large_jump() {
        let mut r = ring(3, 10.0);
        let viewpoint = -1000.0;
        r.recycle(|m| m.z > viewpoint, |_| {});
        let positions = r.sorted_positions();
        assert!(positions.iter().all(|&z| z <= viewpoint));
        // Still evenly pitched after many passes
        for w in positions.windows(2) {
            assert!((w[0] - w[1] - 10.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_recycle_ahead_of_skips_past_frontier() {
        let mut r = ring(3, 10.0);
        // Only the trailing entry is stale; its normal slot (-30) is behind -95
        let n = r.recycle_ahead_of(-95.0, |m| m.z > -5.0, |m| m.moves += 1);
        assert_eq!(n, 1);
        assert_eq!(r.sorted_positions(), vec![-10.0, -20.0, -100.0]);

        // A slot already ahead of the frontier is used as is
        let mut r = ring(3, 10.0);
        r.recycle_ahead_of(-25.0, |m| m.z > -5.0, |_| {});
        assert_eq!(r.leading_position(), Some(-30.0));
    }

    #[test]
    fn test_recycle_noop_when_nothing_stale() {
        let mut r = ring(3, 10.0);
        let before = r.sorted_positions();
        assert_eq!(r.recycle(|_| false, |_| {}), 0);
        assert_eq!(r.sorted_positions(), before);
    }

    #[test]
    fn test_empty_ring() {
        let mut r: RecyclingRing<Marker> = RecyclingRing::new(Vec::new(), 1.0);
        assert!(r.is_empty());
        assert_eq!(r.leading_position(), None);
        assert_eq!(r.recycle(|_| true, |_| {}), 0);
    }
}
