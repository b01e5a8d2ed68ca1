use core::f64::consts::{LN_2, PI};

/// A continuous cumulative product of `(1 - beta)` over normalized time.
///
/// `evaluate` maps `t` in `[0, 1]` to the fraction of signal variance that
/// survives up to `t`. Implementations must be non-increasing and strictly
/// positive on `[0, 1)`; the discretizer divides by `evaluate(t)` and does not
/// check for zero.
pub trait AlphaBar {
    fn evaluate(&self, t: f64) -> f64;
}

impl<F> AlphaBar for F
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, t: f64) -> f64 {
        self(t)
    }
}

/// Glide cosine schedule, `cos²(((t + 0.008) / 1.008) · π/2)`.
///
/// The 0.008 offset keeps the slope at `t = 0` away from zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CosineAlphaBar;

impl AlphaBar for CosineAlphaBar {
    fn evaluate(&self, t: f64) -> f64 {
        f64::cos((t + 0.008) / 1.008 * PI / 2.0).powi(2)
    }
}

/// `1 - t^exponent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerAlphaBar {
    exponent: u32,
}

impl PowerAlphaBar {
    pub fn new(exponent: u32) -> Self {
        Self { exponent }
    }
}

impl AlphaBar for PowerAlphaBar {
    fn evaluate(&self, t: f64) -> f64 {
        1.0 - t.powf(self.exponent as f64)
    }
}

/// `2 - exp((t0 + ln 2) · t - t0)`, reaching zero at `t = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpAlphaBar {
    t0: f64,
}

impl ExpAlphaBar {
    pub fn new(t0: f64) -> Self {
        Self { t0 }
    }
}

impl AlphaBar for ExpAlphaBar {
    fn evaluate(&self, t: f64) -> f64 {
        2.0 - f64::exp((self.t0 + LN_2) * t - self.t0)
    }
}

/// `tanh(t1) - tanh((t0 + t1) · t - t0)`, reaching zero at `t = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TanhAlphaBar {
    t0: f64,
    t1: f64,
}

impl TanhAlphaBar {
    pub fn new(t0: f64, t1: f64) -> Self {
        Self { t0, t1 }
    }
}

impl AlphaBar for TanhAlphaBar {
    fn evaluate(&self, t: f64) -> f64 {
        -f64::tanh((self.t0 + self.t1) * t - self.t0) + f64::tanh(self.t1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_non_increasing(alpha_bar: &dyn AlphaBar) {
        let mut prev = alpha_bar.evaluate(0.0);
        for i in 1..=100 {
            let current = alpha_bar.evaluate(i as f64 / 100.0);
            assert!(current <= prev, "alpha_bar increased at t = {}", i as f64 / 100.0);
            prev = current;
        }
    }

    #[test]
    fn test_cosine_alpha_bar() {
        let cosine = CosineAlphaBar;
        assert!((cosine.evaluate(0.0) - 0.999_844_6).abs() < 1e-7);
        assert!(cosine.evaluate(1.0) < 1e-30);
        assert_non_increasing(&cosine);
    }

    #[test]
    fn test_power_alpha_bar() {
        let power = PowerAlphaBar::new(2);
        assert_eq!(power.evaluate(0.0), 1.0);
        assert_eq!(power.evaluate(0.5), 0.75);
        assert_eq!(power.evaluate(1.0), 0.0);
        assert_non_increasing(&power);
    }

    #[test]
    fn test_exp_alpha_bar_vanishes_at_one() {
        let exp = ExpAlphaBar::new(5.0);
        assert!((exp.evaluate(0.0) - (2.0 - f64::exp(-5.0))).abs() < 1e-15);
        assert!(exp.evaluate(1.0).abs() < 1e-12);
        assert_non_increasing(&exp);
    }

    #[test]
    fn test_tanh_alpha_bar_vanishes_at_one() {
        let tanh = TanhAlphaBar::new(1.0, 2.0);
        assert!((tanh.evaluate(0.0) - (f64::tanh(1.0) + f64::tanh(2.0))).abs() < 1e-15);
        assert_eq!(tanh.evaluate(1.0), 0.0);
        assert_non_increasing(&tanh);
    }

    #[test]
    fn test_closures_are_alpha_bars() {
        let linear_decay = |t: f64| 1.0 - 0.5 * t;
        assert_eq!(linear_decay.evaluate(1.0), 0.5);
    }
}
