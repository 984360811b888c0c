//! Pixel/time conversion for a fixed-width timeline track.
//!
//! All functions take the track `width` and stream `duration` explicitly so they
//! can be used against any snapshot of the player read-model.

use crate::types::Px;

/// Map a stream time (seconds) onto the track.
///
/// Returns `0.0` while `duration` is zero, negative or not finite, i.e. before
/// playback metadata has arrived, instead of producing a non-finite pixel.
pub fn time_to_pixel(time: f64, width: Px, duration: f64) -> f64 {
    if !(duration.is_finite() && duration > 0.0) {
        return 0.0;
    }
    time * f64::from(width) / duration
}

/// Map a pixel offset on the track to stream time (seconds).
///
/// Returns `0.0` under the same conditions as [`time_to_pixel`], so an unknown
/// or unbounded duration never turns into a non-finite time.
pub fn pixel_to_time(pixel: Px, width: Px, duration: f64) -> f64 {
    if !(duration.is_finite() && duration > 0.0) {
        return 0.0;
    }
    f64::from(pixel) * duration / f64::from(width)
}

/// Render seconds as `MM:SS`.
///
/// Single-digit components get a leading zero, anything wider is printed as-is,
/// so `6000.0` renders as `100:00`. Negative and non-finite inputs are not
/// special-cased and produce malformed strings such as `0-1:0-1`.
pub fn format_time(time: f64) -> String {
    let minutes = (time / 60.0).floor();
    let seconds = (time % 60.0).floor();
    format!("{}:{}", pad_component(minutes), pad_component(seconds))
}

fn pad_component(value: f64) -> String {
    // `+ 0.0` folds negative zero so it prints as "0"
    let value = value + 0.0;
    if value > 9.0 {
        value.to_string()
    } else {
        format!("0{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_pads_single_digits() {
        assert_eq!(format_time(65.0), "01:05");
        assert_eq!(format_time(5.0), "00:05");
        assert_eq!(format_time(605.0), "10:05");
        assert_eq!(format_time(0.0), "00:00");
    }

    #[test]
    fn format_truncates_fractions() {
        assert_eq!(format_time(59.999), "00:59");
        assert_eq!(format_time(60.2), "01:00");
    }

    #[test]
    fn format_does_not_cap_minutes() {
        assert_eq!(format_time(6000.0), "100:00");
    }

    #[test]
    fn format_lets_negative_input_through() {
        assert_eq!(format_time(-1.0), "0-1:0-1");
        assert_eq!(format_time(-0.0), "00:00");
    }

    #[test]
    fn format_lets_nan_through() {
        assert_eq!(format_time(f64::NAN), "0NaN:0NaN");
    }

    #[test]
    fn time_to_pixel_scales_linearly() {
        assert_eq!(time_to_pixel(0.0, 1024, 200.0), 0.0);
        assert_eq!(time_to_pixel(100.0, 1024, 200.0), 512.0);
        assert_eq!(time_to_pixel(200.0, 1024, 200.0), 1024.0);
    }

    #[test]
    fn time_to_pixel_without_duration_is_zero() {
        assert_eq!(time_to_pixel(12.0, 1024, 0.0), 0.0);
        assert_eq!(time_to_pixel(12.0, 1024, f64::NAN), 0.0);
        assert_eq!(time_to_pixel(12.0, 1024, -5.0), 0.0);
    }

    #[test]
    fn pixel_to_time_scales_linearly() {
        assert_eq!(pixel_to_time(0, 1024, 200.0), 0.0);
        assert_eq!(pixel_to_time(512, 1024, 200.0), 100.0);
        assert_eq!(pixel_to_time(1024, 1024, 200.0), 200.0);
        assert_eq!(pixel_to_time(512, 1024, 0.0), 0.0);
    }

    #[test]
    fn pixel_to_time_without_usable_duration_is_zero() {
        assert_eq!(pixel_to_time(512, 1024, f64::INFINITY), 0.0);
        assert_eq!(pixel_to_time(512, 1024, f64::NAN), 0.0);
        assert_eq!(pixel_to_time(512, 1024, -200.0), 0.0);
    }

    #[test]
    fn round_trip_within_one_pixel() {
        let width = 1024;
        let duration = 200.0;
        let one_pixel = duration / f64::from(width);

        let mut t = 0.0;
        while t <= duration {
            let pixel = time_to_pixel(t, width, duration).round() as Px;
            let back = pixel_to_time(pixel, width, duration);
            assert!(
                (back - t).abs() <= one_pixel,
                "t={} pixel={} back={}",
                t,
                pixel,
                back
            );
            t += 0.37;
        }
    }
}
