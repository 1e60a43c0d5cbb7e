use std::f64::consts::PI;

use sundial::modules::environment::{cycle::Cycle, fog::FogPhase};
use sundial::modules::setting::{CycleSetting, FogSetting};
use sundial::modules::utils::random::{FixedRandom, ScriptedRandom};

fn default_cycle() -> Cycle {
    Cycle::new(CycleSetting::default(), FogSetting::default())
}

#[test]
fn density_stays_bounded_over_long_runs() {
    let mut cycle = default_cycle();
    let mut rng = fastrand::Rng::with_seed(7);
    let mut episodes = 0;
    let mut was_active = false;
    for _ in 0..100_000 {
        let frame = cycle.update(&mut rng);
        assert!(frame.fog_density >= 0.0 && frame.fog_density <= 0.15, "density {}", frame.fog_density);
        if frame.fog_phase == FogPhase::Idle {
            assert_eq!(frame.fog_density, 0.0);
        }
        if frame.fog_phase.is_active() && !was_active {
            episodes += 1;
        }
        was_active = frame.fog_phase.is_active();
    }
    assert!(episodes > 0);
}

#[test]
fn scripted_episode_ramps_decays_and_ends() {
    // trigger, then r2 = 0.5 gives a 360 frame episode
    let mut random = ScriptedRandom::new(vec![0.0, 0.5, 0.99]);
    let mut cycle = default_cycle();

    let frame = cycle.update(&mut random);
    assert_eq!(frame.fog_phase, FogPhase::RampingUp { timer: 360 });
    assert_eq!(frame.fog_density, 0.0);

    let mut previous = 0.0;
    let mut frames = 0;
    let mut reached_max = false;
    loop {
        let frame = cycle.update(&mut random);
        frames += 1;
        match frame.fog_phase {
            FogPhase::RampingUp { .. } => {
                assert!(frame.fog_density > previous);
            }
            FogPhase::Decaying { .. } => {
                if !reached_max {
                    assert_eq!(frame.fog_density, 0.15);
                    reached_max = true;
                } else {
                    assert!(frame.fog_density <= previous);
                }
            }
            FogPhase::Idle => {
                assert_eq!(frame.fog_density, 0.0);
                break;
            }
        }
        previous = frame.fog_density;
        assert!(frames <= 360);
    }
    assert!(reached_max);
    assert_eq!(frames, 360);

    // 0.99 never triggers again
    for _ in 0..1000 {
        assert_eq!(cycle.update(&mut random).fog_phase, FogPhase::Idle);
    }
}

#[test]
fn fog_never_starts_above_trigger_chance() {
    let mut cycle = default_cycle();
    let mut random = FixedRandom(0.003);
    for _ in 0..10_000 {
        assert_eq!(cycle.update(&mut random).fog_density, 0.0);
    }
}

#[test]
fn moon_stays_antipodal_through_a_full_day() {
    let mut cycle = default_cycle();
    let mut random = FixedRandom(0.5);
    let frames = (2.0 * PI / 0.002) as usize;
    for _ in 0..frames {
        let frame = cycle.update(&mut random);
        for axis in 0..3 {
            assert!((frame.sun.position[axis] + frame.moon.position[axis]).abs() < 1e-9);
        }
        let radius = frame.sun.position[0].hypot(frame.sun.position[1]);
        assert!((radius - 9.5).abs() < 1e-9);
        if frame.is_day() {
            assert!(frame.sky.intensity >= 5.0 && frame.sky.intensity <= 20.0);
            assert!(frame.ground.intensity >= 5.0 && frame.ground.intensity <= 20.0);
        } else {
            assert!(frame.sky.intensity >= 2.0 && frame.sky.intensity <= 5.0);
            assert_eq!(frame.sky.intensity, frame.ground.intensity);
        }
    }
}
