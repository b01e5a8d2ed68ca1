use super::alpha_bar::AlphaBar;
use crate::error::{Error, Result};

/// Default upper bound on any single beta; keeps `1 - beta` away from zero.
pub const DEFAULT_MAX_BETA: f64 = 0.999;

/// Create a beta schedule that discretizes the given alpha_bar function, which defines the
/// cumulative product of `(1 - beta)` over time from `t = [0, 1]`.
///
/// Step `i` covers `[i / num_steps, (i + 1) / num_steps]` and destroys
/// `1 - alpha_bar(t2) / alpha_bar(t1)` of the remaining variance, capped at `max_beta`.
///
/// `alpha_bar` must be strictly positive on `[0, 1)`. A zero there yields a NaN or infinite
/// beta rather than an error.
pub fn discretize_alpha_bar<A>(num_steps: usize, alpha_bar: &A, max_beta: f64) -> Result<Vec<f64>>
where
    A: AlphaBar + ?Sized,
{
    check_num_steps(num_steps)?;

    let steps = num_steps as f64;
    let betas = (0..num_steps)
        .map(|i| {
            let t1 = i as f64 / steps;
            let t2 = (i + 1) as f64 / steps;
            cap(1.0 - alpha_bar.evaluate(t2) / alpha_bar.evaluate(t1), max_beta)
        })
        .collect();

    Ok(betas)
}

/// Linear schedule from Ho et al, extended to work for any number of diffusion steps.
///
/// The end points `0.0001` and `0.02` of the reference 1000-step schedule are scaled by
/// `1000 / num_steps`, then every value is capped at `max_beta`.
pub fn linear_betas(num_steps: usize, max_beta: f64) -> Result<Vec<f64>> {
    check_num_steps(num_steps)?;

    let scale = 1000.0 / num_steps as f64;
    let betas = linspace(scale * 0.0001, scale * 0.02, num_steps)
        .into_iter()
        .map(|beta| cap(beta, max_beta))
        .collect();

    Ok(betas)
}

/// Cumulative product of `(1 - beta)`: entry `i` is the fraction of the original signal
/// variance left after step `i`.
pub fn cumulative_alpha_bar(betas: &[f64]) -> Vec<f64> {
    betas
        .iter()
        .scan(1.0, |alpha_prod, beta| {
            *alpha_prod *= 1.0 - beta;
            Some(*alpha_prod)
        })
        .collect()
}

fn check_num_steps(num_steps: usize) -> Result<()> {
    if num_steps == 0 {
        return Err(Error::InvalidStepCount);
    }
    Ok(())
}

// NaN passes through uncapped.
fn cap(beta: f64, max_beta: f64) -> f64 {
    if beta > max_beta {
        max_beta
    } else {
        beta
    }
}

/// `num` evenly spaced values over `[start, end]`, both ends included. The last value is
/// pinned to `end` so it carries no accumulated rounding.
fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    if num == 1 {
        return vec![start];
    }

    let step = (end - start) / (num - 1) as f64;
    let mut values: Vec<f64> = (0..num).map(|i| i as f64 * step + start).collect();
    if let Some(last) = values.last_mut() {
        *last = end;
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedulers::alpha_bar::{CosineAlphaBar, PowerAlphaBar};

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "expected {e}, got {a}");
        }
    }

    #[test]
    fn test_discretize_cosine() {
        let betas = discretize_alpha_bar(4, &CosineAlphaBar, DEFAULT_MAX_BETA).unwrap();

        assert_close(
            &betas,
            &[0.1529878386730953, 0.41695808751199426, 0.7078587123971634, 0.999],
        );
    }

    #[test]
    fn test_discretize_power() {
        let betas = discretize_alpha_bar(4, &PowerAlphaBar::new(2), DEFAULT_MAX_BETA).unwrap();

        assert_close(&betas, &[0.0625, 0.2, 0.41666666666666663, 0.999]);
    }

    #[test]
    fn test_discretize_caps_at_max_beta() {
        let betas = discretize_alpha_bar(4, &PowerAlphaBar::new(2), 0.3).unwrap();

        assert_close(&betas, &[0.0625, 0.2, 0.3, 0.3]);
    }

    #[test]
    fn test_discretize_single_step() {
        let betas = discretize_alpha_bar(1, &|t: f64| 1.0 - 0.5 * t, DEFAULT_MAX_BETA).unwrap();

        assert_eq!(betas, vec![0.5]);
    }

    #[test]
    fn test_discretize_rejects_zero_steps() {
        let result = discretize_alpha_bar(0, &CosineAlphaBar, DEFAULT_MAX_BETA);

        assert_eq!(result, Err(Error::InvalidStepCount));
    }

    #[test]
    fn test_linear_reference_schedule() {
        let betas = linear_betas(1000, DEFAULT_MAX_BETA).unwrap();

        assert_eq!(betas.len(), 1000);
        assert_eq!(betas[0], 0.0001);
        assert_eq!(betas[999], 0.02);
        let step = (0.02 - 0.0001) / 999.0;
        for window in betas.windows(2) {
            assert!((window[1] - window[0] - step).abs() < 1e-12);
        }
    }

    #[test]
    fn test_linear_scales_with_step_count() {
        let betas = linear_betas(500, DEFAULT_MAX_BETA).unwrap();

        assert_eq!(betas.len(), 500);
        assert_eq!(betas[0], 0.0002);
        assert_eq!(betas[499], 0.04);
    }

    #[test]
    fn test_linear_is_capped_for_few_steps() {
        let betas = linear_betas(4, DEFAULT_MAX_BETA).unwrap();

        // Uncapped this would run from 0.025 to 5.0.
        assert_eq!(betas[0], 0.025);
        assert_eq!(betas[1], DEFAULT_MAX_BETA);
        assert_eq!(betas[3], DEFAULT_MAX_BETA);
    }

    #[test]
    fn test_linear_single_step() {
        assert_eq!(linear_betas(1, 0.5).unwrap(), vec![0.1]);
    }

    #[test]
    fn test_cumulative_alpha_bar() {
        let alphas_cumprod = cumulative_alpha_bar(&[0.5, 0.5, 0.2]);

        assert_eq!(alphas_cumprod, vec![0.5, 0.25, 0.2]);
    }

    #[test]
    fn test_cumulative_alpha_bar_of_empty_sequence() {
        assert!(cumulative_alpha_bar(&[]).is_empty());
    }

    #[test]
    fn test_nan_is_not_capped() {
        assert!(cap(f64::NAN, DEFAULT_MAX_BETA).is_nan());
    }
}
