//! Supporting state types: camera shake and developer debug toggles.

use glam::DVec2;

/// Camera screen shake for impact feedback. Trauma accumulates on hits and
/// decays over time; the render layer reads `offset` each frame.
pub struct ScreenShake {
    pub intensity: f64,
    pub decay_rate: f64,
    pub offset: DVec2,
    pub trauma: f64,
}

impl ScreenShake {
    pub fn new() -> Self {
        Self {
            intensity: 0.0,
            decay_rate: 1.4,
            offset: DVec2::ZERO,
            trauma: 0.0,
        }
    }

    pub fn add_trauma(&mut self, amount: f64) {
        self.trauma = (self.trauma + amount).min(1.0);
    }

    /// Advance shake. `t` is monotonic seconds (drives the jitter pattern;
    /// no wall clock reads here so tests stay deterministic).
    pub fn update(&mut self, dt: f64, t: f64) {
        self.intensity = self.trauma * self.trauma;
        if self.intensity > 0.001 {
            let max_offset = self.intensity * 14.0;
            self.offset = DVec2::new(
                (t * 173.7).sin() * max_offset,
                (t * 259.3).cos() * max_offset,
            );
        } else {
            self.offset = DVec2::ZERO;
        }
        self.trauma = (self.trauma - self.decay_rate * dt).max(0.0);
    }

    /// Snap back to rest. Called when an active effect completes.
    pub fn reset(&mut self) {
        self.trauma = 0.0;
        self.intensity = 0.0;
        self.offset = DVec2::ZERO;
    }
}

impl Default for ScreenShake {
    fn default() -> Self {
        Self::new()
    }
}

/// Developer debug settings, togglable by the host shell.
pub struct DebugSettings {
    /// Player takes no damage.
    pub god_mode: bool,
    /// Skip the hazard update pass entirely.
    pub no_hazards: bool,
    /// Freeze the density controller (no cull, no top-up).
    pub freeze_spawns: bool,
    /// Time scale multiplier (0.1 = slow-mo, 1.0 = normal, 2.0 = fast).
    pub time_scale: f64,
}

impl DebugSettings {
    pub fn new() -> Self {
        Self {
            god_mode: false,
            no_hazards: false,
            freeze_spawns: false,
            time_scale: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trauma_decays_to_zero() {
        let mut shake = ScreenShake::new();
        shake.add_trauma(0.8);
        for i in 0..120 {
            shake.update(1.0 / 60.0, i as f64 / 60.0);
        }
        assert_eq!(shake.trauma, 0.0);
        assert_eq!(shake.offset, DVec2::ZERO);
    }

    #[test]
    fn reset_clears_everything() {
        let mut shake = ScreenShake::new();
        shake.add_trauma(1.0);
        shake.update(0.016, 0.5);
        shake.reset();
        assert_eq!(shake.trauma, 0.0);
        assert_eq!(shake.offset, DVec2::ZERO);
    }
}
