//! Saturation / Soft Clipping
//!
//! A waveshaper applies a transfer function to each sample:
//!   output = f(input * drive)
//!
//! When drive is low (1.0) and the input is small, the signal stays in the
//! linear region of f() and passes through almost unchanged. Loud passages
//! are pushed into the curved region and squashed towards ±1.
//!
//! # Transfer Functions
//!
//! Hyperbolic tangent (used on the master bus):
//!   f(x) = tanh(x)
//!   - Slope 1 at the origin, so quiet material is untouched
//!   - Odd-symmetric, adds only odd harmonics when driven
//!   - Asymptotically bounded by ±1
//!
//! Hard Clip:
//!   f(x) = clamp(x, -threshold, threshold)
//!   - Harsh, buzzy when it engages
//!   - Used here only as a final ceiling after tanh
//!
//! # Floating Point Saturation
//!
//! Mathematically tanh never reaches 1.0, but in f32 it rounds to exactly
//! 1.0 once |x| exceeds roughly 9. [`OUTPUT_CEILING`] is the largest f32
//! strictly below 1.0 and is what the output is clamped to.

/// Largest representable sample strictly inside (-1, 1).
pub const OUTPUT_CEILING: f32 = 1.0 - f32::EPSILON / 2.0;

/// Soft clipping using the tanh transfer function.
#[inline]
pub fn soft_clip(sample: f32, drive: f32) -> f32 {
    (sample * drive).tanh()
}

/// Hard clipping - simply clamps the signal at a threshold.
#[inline]
pub fn hard_clip(sample: f32, threshold: f32) -> f32 {
    sample.clamp(-threshold, threshold)
}

/// Apply tanh soft clipping to an entire buffer in place, then clamp to
/// [`OUTPUT_CEILING`].
pub fn soft_clip_buffer(buffer: &mut [f32], drive: f32) {
    for sample in buffer.iter_mut() {
        *sample = hard_clip(soft_clip(*sample, drive), OUTPUT_CEILING);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soft_clip_is_transparent_near_zero() {
        let output = soft_clip(0.01, 1.0);
        assert!((output - 0.01).abs() < 1e-5);
    }

    #[test]
    fn test_soft_clip_unity_drive() {
        // tanh(0.5) ≈ 0.4621
        let output = soft_clip(0.5, 1.0);
        assert!((output - 0.4621).abs() < 1e-3);
    }

    #[test]
    fn test_soft_clip_is_odd() {
        assert_eq!(soft_clip(-0.7, 1.0), -soft_clip(0.7, 1.0));
    }

    #[test]
    fn test_ceiling_is_below_one() {
        assert!(OUTPUT_CEILING < 1.0);
        assert!(OUTPUT_CEILING > 0.9999);
    }

    #[test]
    fn test_buffer_never_reaches_unity() {
        let mut buffer = [50.0, -50.0, 1.0e9, f32::MAX, -f32::MAX, 0.0];
        soft_clip_buffer(&mut buffer, 1.0);
        for sample in buffer {
            assert!(sample.abs() < 1.0, "sample {sample} escaped the ceiling");
        }
    }

    #[test]
    fn test_hard_clip_above_threshold() {
        assert_eq!(hard_clip(1.6, 1.0), 1.0);
        assert_eq!(hard_clip(-1.6, 1.0), -1.0);
        assert!((hard_clip(0.3, 1.0) - 0.3).abs() < 1e-6);
    }
}
