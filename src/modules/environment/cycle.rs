use crate::modules::{setting::{CycleSetting, FogSetting}, utils::random::RandomSource};
use super::{fog::{Fog, FogPhase}, sky::HemisphereLight, sun::CelestialLight};

/// Everything the renderer needs to light one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleFrame {
    pub angle: f64,
    pub sun: CelestialLight,
    pub moon: CelestialLight,
    pub sky: HemisphereLight,
    pub ground: HemisphereLight,
    pub fog_density: f64,
    pub fog_phase: FogPhase,
}

impl CycleFrame {
    pub fn is_day(&self) -> bool {
        self.angle.sin() > 0.0
    }
}

/// Day/night cycle and fog episodes, advanced once per rendered frame.
pub struct Cycle {
    angle: f64,
    fog: Fog,
    setting: CycleSetting,
}

impl Cycle {
    pub fn new(setting: CycleSetting, fog_setting: FogSetting) -> Self {
        Self {
            angle: setting.angle_start,
            fog: Fog::new(fog_setting),
            setting,
        }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Advances the angle, then derives the lights from it and runs the fog step.
    pub fn update(&mut self, random: &mut impl RandomSource) -> CycleFrame {
        self.angle += self.setting.angle_step;
        self.fog.update(random);
        self.frame()
    }

    /// Lights for the current angle, without advancing anything.
    pub fn frame(&self) -> CycleFrame {
        let angle = self.angle;
        CycleFrame {
            angle,
            sun: CelestialLight::sun(angle, self.setting.orbit_radius, self.setting.sun_intensity),
            moon: CelestialLight::moon(angle, self.setting.orbit_radius, self.setting.moon_intensity),
            sky: HemisphereLight::sky(angle),
            ground: HemisphereLight::ground(angle),
            fog_density: self.fog.density(),
            fog_phase: self.fog.phase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::utils::random::FixedRandom;
    use std::f64::consts::FRAC_PI_2;

    fn cycle() -> Cycle {
        Cycle::new(CycleSetting::default(), FogSetting::default())
    }

    #[test]
    fn starts_at_quarter_turn() {
        assert_eq!(cycle().angle(), FRAC_PI_2);
    }

    #[test]
    fn angle_advances_before_lights_are_derived() {
        let mut cycle = cycle();
        let frame = cycle.update(&mut FixedRandom(0.9));
        assert!((frame.angle - (FRAC_PI_2 + 0.002)).abs() < 1e-12);
        assert!((frame.sun.position[0] - (FRAC_PI_2 + 0.002).cos() * 9.5).abs() < 1e-12);
    }

    #[test]
    fn angle_grows_monotonically() {
        let mut cycle = cycle();
        let mut previous = cycle.angle();
        for _ in 0..5000 {
            let frame = cycle.update(&mut FixedRandom(0.9));
            assert!(frame.angle > previous);
            previous = frame.angle;
        }
        assert!((previous - (FRAC_PI_2 + 5000.0 * 0.002)).abs() < 1e-9);
    }

    #[test]
    fn frame_carries_fog_state() {
        let mut cycle = cycle();
        let frame = cycle.update(&mut FixedRandom(0.002));
        assert_eq!(frame.fog_phase, FogPhase::RampingUp { timer: 300 });
        assert_eq!(frame.fog_density, 0.0);
        let frame = cycle.update(&mut FixedRandom(0.002));
        assert!((frame.fog_density - 0.001).abs() < 1e-12);
    }

    #[test]
    fn intensities_follow_the_sun() {
        let mut cycle = cycle();
        let frame = cycle.update(&mut FixedRandom(0.9));
        assert!(frame.is_day());
        assert_eq!(frame.sky.intensity, 20.0);
        assert_eq!(frame.sun.intensity, 200.0);
        assert_eq!(frame.moon.intensity, 100.0);
    }
}
