//! Spawn/retire lanes
//!
//! A lane holds entities in spawn order, which is also scroll order: the head
//! is the next to leave the world, the tail the most recent arrival. Only the
//! tail is measured for the spawn gap and only the head is checked for
//! retirement.

use std::collections::VecDeque;

/// Something that scrolls left across the world
pub trait Scrolling {
    /// Reference x position
    fn x(&self) -> f32;
    /// Distance from `x` to the entity's trailing edge
    fn extent(&self) -> f32;

    /// Fully past the left edge of the world
    fn is_offscreen(&self) -> bool {
        self.x() + self.extent() < 0.0
    }
}

/// What one maintenance pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    pub spawned: usize,
    pub retired: usize,
}

/// Ordered queue of live entities with a minimum spawn gap
#[derive(Debug, Clone)]
pub struct SpawnQueue<T> {
    items: VecDeque<T>,
    gap: f32,
    /// Instances kept alive at once (two for world-wide strips)
    min_live: usize,
}

impl<T> SpawnQueue<T> {
    pub fn new(gap: f32) -> Self {
        Self::with_min_live(gap, 1)
    }

    pub fn with_min_live(gap: f32, min_live: usize) -> Self {
        Self {
            items: VecDeque::new(),
            gap,
            min_live,
        }
    }

    #[inline]
    pub fn gap(&self) -> f32 {
        self.gap
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Oldest entity
    pub fn head(&self) -> Option<&T> {
        self.items.front()
    }

    /// Newest entity
    pub fn tail(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    /// Append at the tail; the caller keeps scroll order
    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Remove out of turn (collected pickups), preserving order
    pub fn remove(&mut self, index: usize) -> Option<T> {
        self.items.remove(index)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: Scrolling> SpawnQueue<T> {
    /// Empty, or the tail has scrolled at least `gap` in from the right edge
    pub fn spawn_due(&self, world_width: f32) -> bool {
        match self.items.back() {
            None => true,
            Some(tail) => tail.x() < world_width - self.gap,
        }
    }

    /// Drop the head if it has left the world
    pub fn retire_head(&mut self) -> Option<T> {
        if self.items.front().is_some_and(|head| head.is_offscreen()) {
            self.items.pop_front()
        } else {
            None
        }
    }

    /// One spawn/retire pass
    ///
    /// `spawn` receives the current tail and returns the entity to append.
    /// At most one entity is spawned through the gap rule per pass; lanes with
    /// `min_live > 1` are then topped up so every instance is seeded at once.
    pub fn maintain<F>(&mut self, world_width: f32, mut spawn: F) -> SpawnReport
    where
        F: FnMut(Option<&T>) -> T,
    {
        let mut report = SpawnReport::default();

        if self.spawn_due(world_width) {
            let item = spawn(self.items.back());
            self.items.push_back(item);
            report.spawned += 1;
        }
        while self.items.len() < self.min_live {
            let item = spawn(self.items.back());
            self.items.push_back(item);
            report.spawned += 1;
        }

        if self.retire_head().is_some() {
            report.retired += 1;
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WIDTH: f32 = 800.0;

    #[derive(Debug, Clone, PartialEq)]
    struct Rock {
        id: u32,
        x: f32,
        r: f32,
    }

    impl Scrolling for Rock {
        fn x(&self) -> f32 {
            self.x
        }
        fn extent(&self) -> f32 {
            self.r
        }
    }

    fn run_lane(queue: &mut SpawnQueue<Rock>, next_id: &mut u32, speed: f32, dt: f32) -> SpawnReport {
        for rock in queue.iter_mut() {
            rock.x -= speed * dt;
        }
        queue.maintain(WIDTH, |_| {
            *next_id += 1;
            Rock {
                id: *next_id,
                x: WIDTH + 30.0,
                r: 30.0,
            }
        })
    }

    #[test]
    fn test_first_pass_spawns_exactly_one_at_edge() {
        let mut queue = SpawnQueue::new(300.0);
        let mut id = 0;
        let report = run_lane(&mut queue, &mut id, 180.0, 1.0 / 60.0);
        assert_eq!(report.spawned, 1);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.head().map(|r| r.x), Some(WIDTH + 30.0));
    }

    #[test]
    fn test_gap_then_spawn() {
        let mut queue = SpawnQueue::new(300.0);
        let mut id = 0;
        run_lane(&mut queue, &mut id, 180.0, 1.0 / 60.0);

        // Tail must travel from 830 to below 500 before the next spawn
        let mut ticks = 1;
        while queue.len() == 1 {
            run_lane(&mut queue, &mut id, 180.0, 1.0 / 60.0);
            ticks += 1;
        }
        assert!(ticks >= 110);
        assert!(queue.head().expect("head").x < WIDTH - 300.0);
    }

    #[test]
    fn test_min_live_bootstraps_two_slots() {
        let mut queue = SpawnQueue::with_min_live(WIDTH, 2);
        let report = queue.maintain(WIDTH, |tail: Option<&Rock>| Rock {
            id: 0,
            x: tail.map(|t| t.x + WIDTH).unwrap_or(0.0),
            r: WIDTH,
        });
        assert_eq!(report.spawned, 2);
        let xs: Vec<f32> = queue.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![0.0, WIDTH]);
    }

    #[test]
    fn test_only_head_retires() {
        let mut queue = SpawnQueue::new(100.0);
        queue.push(Rock { id: 1, x: -10.0, r: 5.0 });
        queue.push(Rock { id: 2, x: -50.0, r: 5.0 });
        assert_eq!(queue.retire_head().map(|r| r.id), Some(1));
        assert_eq!(queue.retire_head().map(|r| r.id), Some(2));
        assert!(queue.retire_head().is_none());
    }

    proptest! {
        #[test]
        fn prop_gap_and_retirement_hold(
            speed in 60.0f32..400.0,
            frames in prop::collection::vec(0.001f32..0.1, 1..800),
        ) {
            let gap = 420.0;
            let max_dt = 0.1;
            let mut queue: SpawnQueue<Rock> = SpawnQueue::new(gap);
            let mut id = 0;
            let mut retired_ids = Vec::new();

            for dt in frames {
                for rock in queue.iter_mut() {
                    rock.x -= speed * dt;
                }
                let before: Vec<u32> = queue.iter().map(|r| r.id).collect();
                queue.maintain(WIDTH, |_| {
                    id += 1;
                    Rock { id, x: WIDTH + 30.0, r: 30.0 }
                });
                let after: Vec<u32> = queue.iter().map(|r| r.id).collect();
                if let Some(first) = before.first() {
                    if !after.contains(first) {
                        retired_ids.push(*first);
                    }
                }

                // Spawn order is scroll order, spaced by the gap
                let xs: Vec<f32> = queue.iter().map(|r| r.x).collect();
                for pair in xs.windows(2) {
                    prop_assert!(pair[1] - pair[0] >= gap - speed * max_dt);
                }
                // Occupancy bound for the world plus one spawn margin each side
                prop_assert!(queue.len() as f32 <= (WIDTH + 60.0) / (gap - speed * max_dt) + 2.0);
                // Retired ids never come back
                for r in &retired_ids {
                    prop_assert!(!after.contains(r));
                }
            }
        }
    }
}
