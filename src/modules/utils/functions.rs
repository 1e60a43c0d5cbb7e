pub fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    f64::min(f64::max(value, min), max)
}

pub fn calculate_fps(frame_time_ms: f64) -> f64 {
    if frame_time_ms == 0.0 {
        0.0
    } else {
        1000.0 / frame_time_ms
    }
}

pub fn to_fixed_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Converts a hue/saturation/lightness triple (all in `0..=1`, hue wraps) to sRGB.
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> [f64; 3] {
    let h = hue.rem_euclid(1.0);
    let s = clamp_f64(saturation, 0.0, 1.0);
    let l = clamp_f64(lightness, 0.0, 1.0);
    if s == 0.0 {
        return [l, l, l];
    }
    let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - (l * s) };
    let q = (2.0 * l) - p;
    [
        hue_to_rgb(q, p, h + 1.0 / 3.0),
        hue_to_rgb(q, p, h),
        hue_to_rgb(q, p, h - 1.0 / 3.0),
    ]
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 { t += 1.0 }
    if t > 1.0 { t -= 1.0 }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * 6.0 * (2.0 / 3.0 - t);
    }
    p
}

pub fn srgb_to_linear(value: f64) -> f64 {
    if value < 0.04045 {
        value * 0.0773993808
    } else {
        (value * 0.9478672986 + 0.0521327014).powf(2.4)
    }
}

pub fn srgb_to_linear_f32x3(rgb: [f64; 3]) -> [f32; 3] {
    [
        srgb_to_linear(rgb[0]) as f32,
        srgb_to_linear(rgb[1]) as f32,
        srgb_to_linear(rgb[2]) as f32,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rgb_eq(actual: [f64; 3], expected: [f64; 3]) {
        for i in 0..3 {
            assert!(
                (actual[i] - expected[i]).abs() < 1e-9,
                "channel {i}: {actual:?} != {expected:?}"
            );
        }
    }

    #[test]
    fn zero_saturation_is_gray() {
        assert_rgb_eq(hsl_to_rgb(0.42, 0.0, 0.3), [0.3, 0.3, 0.3]);
    }

    #[test]
    fn primary_hues() {
        assert_rgb_eq(hsl_to_rgb(0.0, 1.0, 0.5), [1.0, 0.0, 0.0]);
        assert_rgb_eq(hsl_to_rgb(1.0 / 3.0, 1.0, 0.5), [0.0, 1.0, 0.0]);
        assert_rgb_eq(hsl_to_rgb(2.0 / 3.0, 1.0, 0.5), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn lightness_extremes() {
        assert_rgb_eq(hsl_to_rgb(0.1, 1.0, 0.0), [0.0, 0.0, 0.0]);
        assert_rgb_eq(hsl_to_rgb(0.1, 1.0, 1.0), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn hue_wraps() {
        assert_rgb_eq(hsl_to_rgb(1.5, 1.0, 0.5), hsl_to_rgb(0.5, 1.0, 0.5));
        assert_rgb_eq(hsl_to_rgb(-0.25, 1.0, 0.5), hsl_to_rgb(0.75, 1.0, 0.5));
    }

    #[test]
    fn srgb_linear_endpoints() {
        assert!(srgb_to_linear(0.0).abs() < 1e-9);
        assert!((srgb_to_linear(1.0) - 1.0).abs() < 1e-6);
        assert!(srgb_to_linear(0.5) < 0.5);
    }

    #[test]
    fn fps_from_frame_time() {
        assert_eq!(calculate_fps(0.0), 0.0);
        assert_eq!(to_fixed_2(calculate_fps(16.0)), 62.5);
    }
}
