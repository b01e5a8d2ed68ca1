use core::marker::PhantomData;

use burn::tensor::{backend::Backend, Distribution, Tensor};

use super::{cumulative_alpha_bar, Schedule};
use crate::utils::tensor_to_f64s;

/// The closed-form forward process `q(x_t | x_0)` of a fixed schedule.
#[derive(Debug, Clone)]
pub struct ForwardDiffusion<B: Backend> {
    alphas_cumprod: Vec<f64>,
    __phantom: PhantomData<B>,
}

impl<B: Backend> ForwardDiffusion<B> {
    pub fn new(schedule: &Schedule) -> Self {
        Self {
            alphas_cumprod: schedule.alphas_cumprod().to_vec(),
            __phantom: PhantomData,
        }
    }

    /// Rebuild the forward process from betas alone, e.g. ones stored next to a
    /// trained model.
    pub fn from_betas(betas: Tensor<B, 1>) -> Self {
        Self {
            alphas_cumprod: cumulative_alpha_bar(&tensor_to_f64s(betas)),
            __phantom: PhantomData,
        }
    }

    pub fn num_steps(&self) -> usize {
        self.alphas_cumprod.len()
    }

    /// Corrupt `original` to diffusion step `timestep` with the given noise:
    /// `sqrt(alpha_bar) * original + sqrt(1 - alpha_bar) * noise`.
    ///
    /// Timesteps past the end of the schedule use the last step.
    pub fn add_noise<const D: usize>(
        &self,
        original: Tensor<B, D>,
        noise: Tensor<B, D>,
        timestep: usize,
    ) -> Tensor<B, D> {
        let alpha_prod = self.alpha_prod(timestep);
        let sqrt_alpha_prod = alpha_prod.sqrt();
        let sqrt_one_minus_alpha_prod = (1.0 - alpha_prod).sqrt();

        original.mul_scalar(sqrt_alpha_prod) + noise.mul_scalar(sqrt_one_minus_alpha_prod)
    }

    /// Like [`add_noise`](Self::add_noise) with standard normal noise drawn on the
    /// input's device. Returns the noisy sample and the noise used.
    pub fn add_random_noise<const D: usize>(
        &self,
        original: Tensor<B, D>,
        timestep: usize,
    ) -> (Tensor<B, D>, Tensor<B, D>) {
        let noise = Tensor::random(
            original.shape(),
            Distribution::Normal(0., 1.),
            &original.device(),
        );

        (self.add_noise(original, noise.clone(), timestep), noise)
    }

    fn alpha_prod(&self, timestep: usize) -> f64 {
        let timestep = timestep.min(self.alphas_cumprod.len().saturating_sub(1));
        self.alphas_cumprod.get(timestep).copied().unwrap_or(1.0)
    }
}
