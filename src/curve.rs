//! Curve model for the Lissajous figure
//!
//! Two sinusoidal oscillators, one per axis, combined with a constant phase
//! shift on the y axis:
//!
//!   x(t) = sin(x_frequency * t)
//!   y(t) = sin(y_frequency * t + phase_offset)
//!
//! Evaluation is pure. The animation engine relies on that to regenerate the
//! whole trace whenever the parameters change.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Angular frequencies and phase shift of the two oscillators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveParameters {
    pub x_frequency: f64,
    pub y_frequency: f64,
    /// Phase shift applied to the y oscillator, in radians
    pub phase_offset: f64,
}

impl Default for CurveParameters {
    fn default() -> Self {
        Self {
            x_frequency: 1.0,
            y_frequency: 1.0,
            phase_offset: 0.0,
        }
    }
}

impl CurveParameters {
    pub fn new(x_frequency: f64, y_frequency: f64, phase_offset: f64) -> Self {
        Self {
            x_frequency,
            y_frequency,
            phase_offset,
        }
    }

    pub fn set_x_frequency(&mut self, value: f64) {
        self.x_frequency = value;
    }

    pub fn set_y_frequency(&mut self, value: f64) {
        self.y_frequency = value;
    }

    pub fn set_phase_offset(&mut self, value: f64) {
        self.phase_offset = value;
    }

    /// All three values are finite (no NaN, no infinities)
    pub fn is_finite(&self) -> bool {
        self.x_frequency.is_finite() && self.y_frequency.is_finite() && self.phase_offset.is_finite()
    }
}

/// A point on the curve, before any viewport scaling
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl CurvePoint {
    pub const ORIGIN: CurvePoint = CurvePoint { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Evaluate the curve at time `t`
pub fn evaluate(params: &CurveParameters, t: f64) -> CurvePoint {
    CurvePoint {
        x: (params.x_frequency * t).sin(),
        y: (params.y_frequency * t + params.phase_offset).sin(),
    }
}

/// Upper bound on the number of points in a sampled trace
pub const MAX_SAMPLES: usize = 1 << 20;

/// Number of points [`sample_cycles`] produces
///
/// `cycles * points_per_cycle + 1`, capped at [`MAX_SAMPLES`].
pub fn sample_count(cycles: u32, points_per_cycle: usize) -> usize {
    (cycles as usize)
        .checked_mul(points_per_cycle)
        .and_then(|n| n.checked_add(1))
        .map_or(MAX_SAMPLES, |n| n.min(MAX_SAMPLES))
}

/// Sample `cycles` full periods of `t` with `points_per_cycle` points each
///
/// Returns [`sample_count`] points evenly spaced over `[0, 2π·cycles]`, both
/// ends included. Oversized requests are spread over the same range with
/// fewer points.
pub fn sample_cycles(params: &CurveParameters, cycles: u32, points_per_cycle: usize) -> Vec<CurvePoint> {
    let count = sample_count(cycles, points_per_cycle);
    let end = TAU * cycles as f64;

    if count == 1 {
        return vec![evaluate(params, 0.0)];
    }

    let step = end / (count - 1) as f64;
    (0..count)
        .map(|i| {
            // Pin the last sample to the exact end of the range
            let t = if i == count - 1 { end } else { i as f64 * step };
            evaluate(params, t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[rstest]
    #[case(CurveParameters::new(1.0, 1.0, 0.0))]
    #[case(CurveParameters::new(3.0, 2.0, PI / 4.0))]
    #[case(CurveParameters::new(29.9, 1.1, 23.0 * PI / 12.0))]
    #[case(CurveParameters::new(0.0, 0.0, 0.0))]
    fn test_points_stay_in_unit_square(#[case] params: CurveParameters) {
        for i in 0..5000 {
            let t = i as f64 * 0.0137 - 20.0;
            let p = evaluate(&params, t);
            assert!(p.x.abs() <= 1.0, "x out of range at t={}: {}", t, p.x);
            assert!(p.y.abs() <= 1.0, "y out of range at t={}: {}", t, p.y);
        }
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let params = CurveParameters::new(7.3, 2.1, 1.25);
        let a = evaluate(&params, 123.456);
        let b = evaluate(&params, 123.456);
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
    }

    #[test]
    fn test_unit_frequencies_peak_at_quarter_period() {
        let params = CurveParameters::default();
        let p = evaluate(&params, FRAC_PI_2);
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_frequency_degenerates_to_a_line() {
        let params = CurveParameters::new(0.0, 2.0, 0.0);
        for i in 0..100 {
            let p = evaluate(&params, i as f64 * 0.1);
            assert_eq!(p.x, 0.0);
        }
    }

    #[test]
    fn test_sample_cycles_count_and_endpoints() {
        let params = CurveParameters::default();
        let points = sample_cycles(&params, 10, 1000);
        assert_eq!(points.len(), 10_001);
        assert_eq!(points[0], CurvePoint::ORIGIN);

        // t = π/2 lands on index 250 (1000 points per 2π)
        let quarter = points[250];
        assert!((quarter.x - 1.0).abs() < 1e-9);
        assert!((quarter.y - 1.0).abs() < 1e-9);

        let last = points[points.len() - 1];
        assert!(last.x.abs() < 1e-9);
    }

    #[test]
    fn test_sample_zero_cycles_is_single_point() {
        let params = CurveParameters::new(2.0, 3.0, FRAC_PI_2);
        let points = sample_cycles(&params, 0, 1000);
        assert_eq!(points, vec![evaluate(&params, 0.0)]);
    }

    #[test]
    fn test_oversized_trace_is_capped() {
        assert_eq!(sample_count(10, 1000), 10_001);
        assert_eq!(sample_count(u32::MAX, usize::MAX), MAX_SAMPLES);
        assert_eq!(sample_count(1, MAX_SAMPLES), MAX_SAMPLES);

        let params = CurveParameters::default();
        let points = sample_cycles(&params, 10, usize::MAX / 4);
        assert_eq!(points.len(), MAX_SAMPLES);

        let last = points[MAX_SAMPLES - 1];
        let end = evaluate(&params, TAU * 10.0);
        assert_eq!((last.x, last.y), (end.x, end.y));
    }

    #[test]
    fn test_is_finite() {
        assert!(CurveParameters::default().is_finite());
        assert!(!CurveParameters::new(f64::NAN, 1.0, 0.0).is_finite());
        assert!(!CurveParameters::new(1.0, 1.0, f64::INFINITY).is_finite());
    }
}
