//! Animation scheduler
//!
//! Owns a set of springs and steps them together once per frame.

use crate::spring::Spring;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    pub struct SpringId;
}

/// Ticks every registered spring with the frame's `dt`
#[derive(Clone, Debug)]
pub struct AnimationScheduler {
    springs: SlotMap<SpringId, Spring>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            springs: SlotMap::with_key(),
        }
    }

    pub fn add_spring(&mut self, spring: Spring) -> SpringId {
        self.springs.insert(spring)
    }

    pub fn get_spring(&self, id: SpringId) -> Option<&Spring> {
        self.springs.get(id)
    }

    pub fn get_spring_mut(&mut self, id: SpringId) -> Option<&mut Spring> {
        self.springs.get_mut(id)
    }

    pub fn remove_spring(&mut self, id: SpringId) -> Option<Spring> {
        self.springs.remove(id)
    }

    /// Value of a spring, or `None` once it has been removed
    pub fn value(&self, id: SpringId) -> Option<f32> {
        self.springs.get(id).map(Spring::value)
    }

    /// Retarget a spring; unknown ids are ignored
    pub fn set_target(&mut self, id: SpringId, target: f32) {
        if let Some(spring) = self.springs.get_mut(id) {
            spring.set_target(target);
        }
    }

    /// Step all springs by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        for (_, spring) in self.springs.iter_mut() {
            if spring.is_animating() {
                spring.step(dt);
            }
        }
    }

    /// Check if any spring is still moving
    pub fn has_active_animations(&self) -> bool {
        self.springs.iter().any(|(_, s)| !s.is_settled())
    }

    pub fn springs_iter(&self) -> impl Iterator<Item = (SpringId, &Spring)> {
        self.springs.iter()
    }

    pub fn springs_iter_mut(&mut self) -> impl Iterator<Item = (SpringId, &mut Spring)> {
        self.springs.iter_mut()
    }

    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    pub fn clear(&mut self) {
        self.springs.clear();
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spring::SpringConfig;

    #[test]
    fn ticks_until_settled() {
        let mut scheduler = AnimationScheduler::new();
        let x = scheduler.add_spring(Spring::new(SpringConfig::cursor(), 0.0));
        let size = scheduler.add_spring(Spring::new(SpringConfig::cursor_size(), 16.0));
        assert!(!scheduler.has_active_animations());

        scheduler.set_target(x, 200.0);
        scheduler.set_target(size, 80.0);
        assert!(scheduler.has_active_animations());

        for _ in 0..600 {
            scheduler.tick(1.0 / 60.0);
        }
        assert!(!scheduler.has_active_animations());
        assert_eq!(scheduler.value(x), Some(200.0));
        assert_eq!(scheduler.value(size), Some(80.0));
    }

    #[test]
    fn removed_springs_are_gone() {
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.add_spring(Spring::new(SpringConfig::default(), 1.0));
        assert_eq!(scheduler.spring_count(), 1);
        assert!(scheduler.remove_spring(id).is_some());
        assert_eq!(scheduler.value(id), None);
        scheduler.set_target(id, 5.0);
        assert_eq!(scheduler.spring_count(), 0);
    }
}
