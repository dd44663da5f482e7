use eframe::egui::{Pos2, pos2};
use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AnimatedPosition {
    pub(crate) current: Pos2,
    pub(crate) target: Pos2,
}

impl AnimatedPosition {
    pub(crate) fn at(position: Pos2) -> Self {
        Self {
            current: position,
            target: position,
        }
    }

    pub(crate) fn scattered<R: Rng>(rng: &mut R, spread: f32) -> Self {
        let spread = spread.max(1.0);
        Self::at(pos2(rng.gen_range(0.0..spread), rng.gen_range(0.0..spread)))
    }

    pub(crate) fn retarget(&mut self, target: Pos2) {
        self.target = target;
    }

    pub(crate) fn advance(&mut self, damping: f32) {
        self.current += (self.target - self.current) * damping;
    }

    #[cfg(test)]
    pub(crate) fn distance_to_target(&self) -> f32 {
        self.current.distance(self.target)
    }
}
