use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::modules::assets::assets::load_string;

pub const SETTING_FILE: &str = "setting.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Setting {
    pub model_file: String,
    /// Node names that both cast and receive shadows
    pub shadow_casters: Vec<String>,
    /// Node names that only receive shadows
    pub shadow_receivers: Vec<String>,
    pub shadow_map_size: u32,
    pub cycle: CycleSetting,
    pub fog: FogSetting,
}

impl Default for Setting {
    fn default() -> Self {
        Self {
            model_file: "scene.gltf".to_string(),
            shadow_casters: vec![
                "Pyramid_01_-_Default_0".to_string(),
                "Pyramid_02_-_Default_0".to_string(),
            ],
            shadow_receivers: vec!["Skybox_03_-_Default_0".to_string()],
            shadow_map_size: 1024,
            cycle: CycleSetting::default(),
            fog: FogSetting::default(),
        }
    }
}

impl Setting {
    /// Reads `setting.json` from the assets, falling back to defaults when absent or malformed.
    pub async fn read() -> Self {
        let file = match load_string(SETTING_FILE).await {
            Ok(file) => file,
            Err(e) => {
                warn!("no {SETTING_FILE} found ({e}), using default setting");
                return Self::default();
            }
        };
        match Self::from_json(&file) {
            Ok(setting) => setting,
            Err(e) => {
                error!("unable to parse {SETTING_FILE}: {e}");
                Self::default()
            }
        }
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str::<Self>(json)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CycleSetting {
    pub angle_start: f64,
    /// Radians added every frame
    pub angle_step: f64,
    pub orbit_radius: f64,
    pub sun_intensity: f64,
    pub moon_intensity: f64,
    pub ambient_intensity: f64,
}

impl Default for CycleSetting {
    fn default() -> Self {
        Self {
            angle_start: std::f64::consts::FRAC_PI_2,
            angle_step: 0.002,
            orbit_radius: 9.5,
            sun_intensity: 200.0,
            moon_intensity: 100.0,
            ambient_intensity: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogSetting {
    pub max_density: f64,
    pub ramp_step: f64,
    pub decay_factor: f64,
    /// Per-frame chance of starting an episode while idle
    pub trigger_chance: f64,
    /// Episode length in frames is `duration_base + random * duration_spread`
    pub duration_base: f64,
    pub duration_spread: f64,
    /// sRGB
    pub color: [f64; 3],
}

impl Default for FogSetting {
    fn default() -> Self {
        Self {
            max_density: 0.15,
            ramp_step: 0.001,
            decay_factor: 0.001,
            trigger_chance: 0.003,
            duration_base: 300.0,
            duration_spread: 120.0,
            color: [170.0 / 255.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_gives_defaults() {
        let setting = Setting::from_json("{}").unwrap();
        assert_eq!(setting, Setting::default());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let setting = Setting::from_json(r#"{ "shadow_map_size": 512, "fog": { "max_density": 0.3 } }"#).unwrap();
        assert_eq!(setting.shadow_map_size, 512);
        assert_eq!(setting.fog.max_density, 0.3);
        assert_eq!(setting.fog.ramp_step, 0.001);
        assert_eq!(setting.cycle, CycleSetting::default());
        assert_eq!(setting.model_file, "scene.gltf");
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(Setting::from_json("{ shadow_map_size: }").is_err());
    }

    #[test]
    fn bundled_setting_matches_defaults() {
        let bundled = include_str!("../../assets/setting.json");
        let setting = Setting::from_json(bundled).unwrap();
        assert_eq!(setting.model_file, "scene.gltf");
        assert_eq!(setting.shadow_casters, Setting::default().shadow_casters);
        assert_eq!(setting.fog.max_density, 0.15);
        assert_eq!(setting.cycle.angle_step, 0.002);
    }
}
