use std::path::PathBuf;
use std::time::Duration;

/// Audio configuration. Maps to the `AudioSettings` in the client's settings file.
#[derive(Debug, Clone)]
pub struct AudioConfig {
    /// Initial music volume (0.0–1.0).
    pub volume: f64,
    /// Whether music starts muted.
    pub muted: bool,
    /// Volume change applied on each fade tick.
    pub fade_step: f64,
    /// Interval between fade ticks.
    pub fade_tick: Duration,
    /// Directory that location music paths are resolved against.
    pub assets_dir: PathBuf,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            volume: 0.3,
            muted: false,
            fade_step: 0.05,
            fade_tick: Duration::from_millis(100),
            assets_dir: PathBuf::from("assets"),
        }
    }
}

impl AudioConfig {
    /// Initial volume clamped into the valid range.
    pub fn clamped_volume(&self) -> f64 {
        clamp_volume(self.volume)
    }

    /// Fade step, never zero or negative so a fade always terminates.
    pub fn effective_fade_step(&self) -> f64 {
        if self.fade_step.is_finite() && self.fade_step > 0.0 {
            self.fade_step.min(1.0)
        } else {
            Self::default().fade_step
        }
    }
}

/// Clamp a volume into 0.0–1.0, mapping NaN to silence.
pub fn clamp_volume(volume: f64) -> f64 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = AudioConfig::default();
        assert_eq!(config.volume, 0.3);
        assert!(!config.muted);
        assert_eq!(config.fade_step, 0.05);
        assert_eq!(config.fade_tick, Duration::from_millis(100));
    }

    #[test]
    fn volume_is_clamped() {
        assert_eq!(clamp_volume(1.5), 1.0);
        assert_eq!(clamp_volume(-0.2), 0.0);
        assert_eq!(clamp_volume(f64::NAN), 0.0);
        let config = AudioConfig {
            volume: 4.0,
            ..Default::default()
        };
        assert_eq!(config.clamped_volume(), 1.0);
    }

    #[test]
    fn non_positive_fade_step_falls_back() {
        let config = AudioConfig {
            fade_step: 0.0,
            ..Default::default()
        };
        assert_eq!(config.effective_fade_step(), 0.05);
        let config = AudioConfig {
            fade_step: -1.0,
            ..Default::default()
        };
        assert_eq!(config.effective_fade_step(), 0.05);
    }
}
