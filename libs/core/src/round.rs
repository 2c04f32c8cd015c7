//! Numeric hygiene shared by the record model and the allocation engine.
//!
//! Stored values are kept to three decimal places. Arithmetic runs through a
//! six-decimal noise strip first, so binary-float artifacts (`0.1 + 0.2`)
//! never reach a stored record or a comparison.

/// Replaces a non-finite value with `0.0`.
///
/// User input and persisted blobs can both produce NaN or infinity; every
/// numeric path coerces through here before doing arithmetic.
#[must_use]
pub fn clamp_number(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Rounds to three decimal places, the storage resolution for counts and
/// targets.
#[must_use]
pub fn round3(v: f64) -> f64 {
    (clamp_number(v) * 1000.0).round() / 1000.0
}

/// Strips binary-float noise by rounding to six decimal places.
///
/// Used between intermediate allocation steps; coarser than machine epsilon,
/// finer than the storage resolution.
#[must_use]
pub fn strip_float(v: f64) -> f64 {
    (clamp_number(v) * 1_000_000.0).round() / 1_000_000.0
}

/// Rounds to the nearest multiple of `step`.
///
/// Falls back to plain three-decimal rounding when `step` is zero, negative,
/// or non-finite.
#[must_use]
pub fn round_step(v: f64, step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return round3(v);
    }
    strip_float((clamp_number(v) / step).round() * step)
}

/// Shortest display form of a stored value: three-decimal resolution with no
/// trailing zeros.
#[must_use]
pub fn fmt_count(v: f64) -> String {
    format!("{}", round3(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_number_passes_finite() {
        assert_eq!(clamp_number(1.25), 1.25);
        assert_eq!(clamp_number(-3.0), -3.0);
    }

    #[test]
    fn test_clamp_number_zeroes_non_finite() {
        assert_eq!(clamp_number(f64::NAN), 0.0);
        assert_eq!(clamp_number(f64::INFINITY), 0.0);
        assert_eq!(clamp_number(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(1.23456), 1.235);
        assert_eq!(round3(1.2344), 1.234);
        assert_eq!(round3(f64::NAN), 0.0);
    }

    #[test]
    fn test_strip_float_removes_binary_noise() {
        assert_eq!(strip_float(0.1 + 0.2), 0.3);
        assert_eq!(strip_float(0.30000000000000004), 0.3);
    }

    #[test]
    fn test_round_step_tenths() {
        assert_eq!(round_step(16.84, 0.1), 16.8);
        assert_eq!(round_step(16.85, 0.1), 16.9);
        assert_eq!(round_step(17.0, 0.1), 17.0);
    }

    #[test]
    fn test_round_step_bad_step_falls_back_to_round3() {
        assert_eq!(round_step(1.23456, 0.0), 1.235);
        assert_eq!(round_step(1.23456, -0.5), 1.235);
        assert_eq!(round_step(1.23456, f64::NAN), 1.235);
    }

    #[test]
    fn test_fmt_count_trims_trailing_zeros() {
        assert_eq!(fmt_count(10.0), "10");
        assert_eq!(fmt_count(5.6), "5.6");
        assert_eq!(fmt_count(1.0 / 3.0), "0.333");
    }
}
