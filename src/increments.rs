//! # Velocity increments
//!
//! Increments `v(t + tau) - v(t)` of turbulent velocity trajectories, the
//! quantity whose statistics a trained model is judged on.

use burn::tensor::{backend::Backend, Shape, Tensor};
use tracing::info;

use crate::error::{Error, Result};

/// All velocity increments at lag `tau`.
///
/// `trajectories` has shape `[samples, timesteps, dimensions]`; the result has
/// shape `[samples * (timesteps - tau), dimensions]`, one row per sample and
/// start time. `tau` must be in `1..timesteps`.
pub fn velocity_increments<B: Backend>(
    trajectories: Tensor<B, 3>,
    tau: usize,
) -> Result<Tensor<B, 2>> {
    let [samples, timesteps, dimensions] = trajectories.shape().dims;
    if tau == 0 || tau >= timesteps {
        return Err(Error::InvalidLag { tau, timesteps });
    }

    let later = trajectories
        .clone()
        .slice([0..samples, tau..timesteps, 0..dimensions]);
    let earlier = trajectories.slice([0..samples, 0..timesteps - tau, 0..dimensions]);

    Ok((later - earlier).reshape(Shape::new([samples * (timesteps - tau), dimensions])))
}

/// Divide every column by its population standard deviation.
pub fn standardize<B: Backend>(increments: Tensor<B, 2>) -> Tensor<B, 2> {
    let std = increments.clone().var_bias(0).sqrt();
    increments / std
}

/// [`velocity_increments`] at lag `tau`, standardized per dimension.
pub fn std_velocity_increments<B: Backend>(
    trajectories: Tensor<B, 3>,
    tau: usize,
) -> Result<Tensor<B, 2>> {
    let increments = standardize(velocity_increments(trajectories, tau)?);
    let [count, dimensions] = increments.shape().dims;
    info!("for {dimensions} dimension(s), each dimension has {count} velocity increments at tau = {tau}");

    Ok(increments)
}
