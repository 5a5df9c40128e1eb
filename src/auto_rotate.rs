use crate::config::GalleryConfig;

/// Idle spin: a constant yaw increment per frame, no velocity state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoRotateState {
    pub active: bool,
}

impl AutoRotateState {
    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Yaw increment for this frame, or `None` while inactive.
    pub fn step(&self, cfg: &GalleryConfig) -> Option<f64> {
        self.active.then_some(cfg.auto_rotate_speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_only_while_active() {
        let cfg = GalleryConfig::default();
        let mut state = AutoRotateState::default();
        assert_eq!(state.step(&cfg), None);
        state.activate();
        assert_eq!(state.step(&cfg), Some(0.04));
        state.deactivate();
        assert_eq!(state.step(&cfg), None);
    }
}
