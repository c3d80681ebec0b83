// src/math.rs

use ndarray::Array1;

/// Logistic sigmoid, applied elementwise: 1 / (1 + e^-x).
pub fn sigmoid(v: &Array1<f32>) -> Array1<f32> {
    v.mapv(|x| 1.0 / (1.0 + (-x).exp()))
}

/// Piecewise-linear sigmoid approximation used by the LSTM gates:
/// clamp(0.2x + 0.5, 0, 1). Distinct from `sigmoid`; the gate equations
/// depend on this exact formula.
pub fn hard_sigmoid(v: &Array1<f32>) -> Array1<f32> {
    v.mapv(|x| (0.2 * x + 0.5).clamp(0.0, 1.0))
}

/// Hyperbolic tangent, applied elementwise.
pub fn tanh(v: &Array1<f32>) -> Array1<f32> {
    v.mapv(stable_tanh)
}

// (1 - e^-2x) / (1 + e^-2x), evaluated on |x| so the exponential never
// overflows; the sign is restored afterwards since tanh is odd.
fn stable_tanh(x: f32) -> f32 {
    let t = (-2.0 * x.abs()).exp();
    let y = (1.0 - t) / (1.0 + t);
    if x.is_sign_negative() {
        -y
    } else {
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use proptest::prelude::*;

    #[test]
    fn test_sigmoid_midpoint_and_symmetry() {
        let v = array![0.0_f32, 2.0, -2.0];
        let s = sigmoid(&v);
        assert_abs_diff_eq!(s[0], 0.5, epsilon = 1e-7);
        // sigmoid(-x) = 1 - sigmoid(x)
        assert_abs_diff_eq!(s[1] + s[2], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_hard_sigmoid_clamps_and_is_linear_inside() {
        let v = array![-10.0_f32, -2.5, 0.0, 1.0, 2.5, 10.0];
        let h = hard_sigmoid(&v);
        assert_eq!(h[0], 0.0);
        assert_abs_diff_eq!(h[1], 0.0, epsilon = 1e-7);
        assert_abs_diff_eq!(h[2], 0.5, epsilon = 1e-7);
        assert_abs_diff_eq!(h[3], 0.7, epsilon = 1e-7);
        assert_abs_diff_eq!(h[4], 1.0, epsilon = 1e-7);
        assert_eq!(h[5], 1.0);
    }

    #[test]
    fn test_tanh_reference_values() {
        let v = array![0.0_f32, 1.0, -1.0];
        let t = tanh(&v);
        assert_abs_diff_eq!(t[0], 0.0, epsilon = 1e-7);
        assert_abs_diff_eq!(t[1], 1.0_f32.tanh(), epsilon = 1e-6);
        assert_abs_diff_eq!(t[2], -t[1], epsilon = 1e-7);
    }

    #[test]
    fn test_tanh_does_not_overflow_for_large_inputs() {
        // The naive (1 - e^-2x)/(1 + e^-2x) form overflows for large
        // negative x; the stable form must saturate instead.
        let v = array![1e30_f32, -1e30, 500.0, -500.0];
        let t = tanh(&v);
        assert_eq!(t[0], 1.0);
        assert_eq!(t[1], -1.0);
        assert_eq!(t[2], 1.0);
        assert_eq!(t[3], -1.0);
        assert!(t.iter().all(|x| x.is_finite()));
    }

    proptest! {
        #[test]
        fn prop_sigmoid_open_unit_interval(x in -15.0_f32..15.0) {
            let s = sigmoid(&array![x]);
            prop_assert!(s[0] > 0.0 && s[0] < 1.0);
        }

        #[test]
        fn prop_hard_sigmoid_bounds_and_slope(x in -1e6_f32..1e6) {
            let h = hard_sigmoid(&array![x]);
            prop_assert!((0.0..=1.0).contains(&h[0]));
            if (-2.5..=2.5).contains(&x) {
                prop_assert!((h[0] - (0.2 * x + 0.5)).abs() < 1e-6);
            }
        }

        #[test]
        fn prop_tanh_bounded_and_odd(x in -8.0_f32..8.0) {
            let t = tanh(&array![x, -x]);
            prop_assert!(t[0] > -1.0 && t[0] < 1.0);
            prop_assert!((t[0] + t[1]).abs() < 1e-6);
        }

        #[test]
        fn prop_tanh_finite_everywhere(x in -1e30_f32..1e30) {
            let t = tanh(&array![x]);
            prop_assert!(t[0].is_finite());
            prop_assert!(t[0].abs() <= 1.0);
        }
    }
}
