//! HSV to RGB color conversion for the frame color cycle.

/// Convert an HSV color to RGB using the six-sector formulation.
///
/// `hue` is in degrees; values outside `[0, 360)` wrap around the wheel.
/// `saturation` and `value` are expected in `[0, 1]`. Returns `[r, g, b]`
/// in `[0, 1]`.
#[must_use]
pub fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> [f32; 3] {
    let h = hue.rem_euclid(360.0) / 60.0;
    let sector = h as u32 % 6;
    let f = h.fract();

    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));

    match sector {
        0 => [value, t, p],
        1 => [q, value, p],
        2 => [p, value, t],
        3 => [p, q, value],
        4 => [t, p, value],
        _ => [value, p, q],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rgb_close(actual: [f32; 3], expected: [f32; 3]) {
        for (a, e) in actual.iter().zip(expected.iter()) {
            assert!(
                (a - e).abs() < 1e-5,
                "expected {:?}, got {:?}",
                expected,
                actual
            );
        }
    }

    #[test]
    fn test_primary_hues() {
        assert_rgb_close(hsv_to_rgb(0.0, 1.0, 1.0), [1.0, 0.0, 0.0]);
        assert_rgb_close(hsv_to_rgb(120.0, 1.0, 1.0), [0.0, 1.0, 0.0]);
        assert_rgb_close(hsv_to_rgb(240.0, 1.0, 1.0), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_secondary_hues() {
        assert_rgb_close(hsv_to_rgb(60.0, 1.0, 1.0), [1.0, 1.0, 0.0]);
        assert_rgb_close(hsv_to_rgb(180.0, 1.0, 1.0), [0.0, 1.0, 1.0]);
        assert_rgb_close(hsv_to_rgb(300.0, 1.0, 1.0), [1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_zero_saturation_is_gray() {
        for hue in [0.0, 45.0, 137.0, 251.0, 359.0] {
            assert_rgb_close(hsv_to_rgb(hue, 0.0, 0.7), [0.7, 0.7, 0.7]);
        }
    }

    #[test]
    fn test_hue_wraps_around() {
        assert_rgb_close(hsv_to_rgb(360.0, 1.0, 1.0), hsv_to_rgb(0.0, 1.0, 1.0));
        assert_rgb_close(
            hsv_to_rgb(480.0, 0.5, 1.0),
            hsv_to_rgb(120.0, 0.5, 1.0),
        );
        assert_rgb_close(
            hsv_to_rgb(-60.0, 1.0, 1.0),
            hsv_to_rgb(300.0, 1.0, 1.0),
        );
    }

    #[test]
    fn test_half_saturation_cycle_color() {
        // Frame 1 of the color cycle: hue 20, half saturation, full value.
        let rgb = hsv_to_rgb(20.0, 0.5, 1.0);
        assert_rgb_close(rgb, [1.0, 2.0 / 3.0, 0.5]);
    }

    #[test]
    fn test_value_scales_brightness() {
        let full = hsv_to_rgb(90.0, 0.5, 1.0);
        let half = hsv_to_rgb(90.0, 0.5, 0.5);
        for (f, h) in full.iter().zip(half.iter()) {
            assert!((h - f * 0.5).abs() < 1e-5);
        }
    }
}
