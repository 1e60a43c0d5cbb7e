use log::debug;

use crate::modules::{setting::FogSetting, utils::random::RandomSource};

/// Accumulated ramp steps may land a hair under the maximum.
const DENSITY_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FogPhase {
    Idle,
    /// Density climbs by a fixed step each frame.
    RampingUp { timer: i32 },
    /// Density follows the remaining frames once the maximum was reached.
    Decaying { timer: i32 },
}

impl FogPhase {
    pub fn timer(&self) -> Option<i32> {
        match self {
            FogPhase::Idle => None,
            FogPhase::RampingUp { timer } | FogPhase::Decaying { timer } => Some(*timer),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, FogPhase::Idle)
    }
}

#[derive(Debug, Clone)]
pub struct Fog {
    phase: FogPhase,
    density: f64,
    setting: FogSetting,
}

impl Fog {
    pub fn new(setting: FogSetting) -> Self {
        Self {
            phase: FogPhase::Idle,
            density: 0.0,
            setting,
        }
    }

    /// Builds a fog in an arbitrary phase, density is clamped to the valid range.
    pub fn with_phase(setting: FogSetting, phase: FogPhase, density: f64) -> Self {
        let density = match phase {
            FogPhase::Idle => 0.0,
            _ => density.clamp(0.0, setting.max_density),
        };
        Self { phase, density, setting }
    }

    pub fn phase(&self) -> FogPhase {
        self.phase
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    /// Advances the fog by one frame.
    pub fn update(&mut self, random: &mut impl RandomSource) {
        let max = self.setting.max_density;
        match self.phase {
            FogPhase::Idle => {
                if random.next_f64() < self.setting.trigger_chance {
                    let duration = random.next_f64() * self.setting.duration_spread + self.setting.duration_base;
                    self.phase = FogPhase::RampingUp { timer: duration as i32 };
                    self.density = 0.0;
                    debug!("fog episode started for {} frames", duration as i32);
                }
                return;
            }
            FogPhase::RampingUp { timer } => {
                let timer = timer - 1;
                let density = self.density + self.setting.ramp_step;
                if density >= max - DENSITY_EPSILON {
                    self.density = max;
                    self.phase = FogPhase::Decaying { timer };
                } else {
                    self.density = density;
                    self.phase = FogPhase::RampingUp { timer };
                }
            }
            FogPhase::Decaying { timer } => {
                let timer = timer - 1;
                self.density = f64::min(max, timer as f64 * self.setting.decay_factor).max(0.0);
                self.phase = FogPhase::Decaying { timer };
            }
        }
        if let Some(timer) = self.phase.timer() {
            if timer <= 0 {
                self.phase = FogPhase::Idle;
                self.density = 0.0;
                debug!("fog episode ended");
            }
        }
    }
}

#[repr(C)]
#[derive(bytemuck::Pod, bytemuck::Zeroable, Copy, Clone, Debug, Default)]
pub struct FogUniform {
    /// Linear rgb, density in `w`
    pub color_density: [f32; 4],
}

impl FogUniform {
    pub fn new(color: [f32; 3], density: f64) -> Self {
        Self {
            color_density: [color[0], color[1], color[2], density as f32],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::utils::random::{FixedRandom, ScriptedRandom};

    fn setting() -> FogSetting {
        FogSetting::default()
    }

    #[test]
    fn starts_idle_and_clear() {
        let fog = Fog::new(setting());
        assert_eq!(fog.phase(), FogPhase::Idle);
        assert_eq!(fog.density(), 0.0);
    }

    #[test]
    fn idle_triggers_on_low_draw() {
        let mut fog = Fog::new(setting());
        fog.update(&mut FixedRandom(0.002));
        // 0.002 * 120 + 300 = 300.24
        assert_eq!(fog.phase(), FogPhase::RampingUp { timer: 300 });
        assert_eq!(fog.density(), 0.0);
    }

    #[test]
    fn idle_stays_idle_on_high_draw() {
        let mut fog = Fog::new(setting());
        for _ in 0..100 {
            fog.update(&mut FixedRandom(0.5));
        }
        assert_eq!(fog.phase(), FogPhase::Idle);
        assert_eq!(fog.density(), 0.0);
    }

    #[test]
    fn duration_uses_second_draw() {
        let mut fog = Fog::new(setting());
        fog.update(&mut ScriptedRandom::new(vec![0.0, 0.999]));
        assert_eq!(fog.phase(), FogPhase::RampingUp { timer: 419 });
    }

    #[test]
    fn ramp_crosses_threshold_in_one_step() {
        let mut fog = Fog::with_phase(setting(), FogPhase::RampingUp { timer: 200 }, 0.149);
        fog.update(&mut FixedRandom(0.9));
        assert!((fog.density() - 0.15).abs() < 1e-12);
        assert_eq!(fog.phase(), FogPhase::Decaying { timer: 199 });
    }

    #[test]
    fn ramp_adds_fixed_step() {
        let mut fog = Fog::with_phase(setting(), FogPhase::RampingUp { timer: 200 }, 0.05);
        fog.update(&mut FixedRandom(0.9));
        assert!((fog.density() - 0.051).abs() < 1e-12);
        assert_eq!(fog.phase(), FogPhase::RampingUp { timer: 199 });
    }

    #[test]
    fn decay_tracks_timer() {
        let mut fog = Fog::with_phase(setting(), FogPhase::Decaying { timer: 50 }, 0.15);
        fog.update(&mut FixedRandom(0.9));
        assert!((fog.density() - 0.049).abs() < 1e-12);
        assert_eq!(fog.phase(), FogPhase::Decaying { timer: 49 });
    }

    #[test]
    fn decay_holds_maximum_while_timer_is_long() {
        let mut fog = Fog::with_phase(setting(), FogPhase::Decaying { timer: 280 }, 0.15);
        fog.update(&mut FixedRandom(0.9));
        assert_eq!(fog.density(), 0.15);
    }

    #[test]
    fn last_frame_terminates_within_the_step() {
        for phase in [FogPhase::RampingUp { timer: 1 }, FogPhase::Decaying { timer: 1 }] {
            let mut fog = Fog::with_phase(setting(), phase, 0.1);
            fog.update(&mut FixedRandom(0.0));
            assert_eq!(fog.phase(), FogPhase::Idle);
            assert_eq!(fog.density(), 0.0);
        }
    }

    #[test]
    fn termination_does_not_retrigger_in_same_step() {
        let mut fog = Fog::with_phase(setting(), FogPhase::Decaying { timer: 1 }, 0.001);
        fog.update(&mut FixedRandom(0.0));
        assert_eq!(fog.phase(), FogPhase::Idle);
        fog.update(&mut FixedRandom(0.0));
        assert!(fog.phase().is_active());
    }

    #[test]
    fn with_phase_clamps_density() {
        let fog = Fog::with_phase(setting(), FogPhase::RampingUp { timer: 10 }, 3.0);
        assert_eq!(fog.density(), 0.15);
        let fog = Fog::with_phase(setting(), FogPhase::Idle, 0.1);
        assert_eq!(fog.density(), 0.0);
    }
}
