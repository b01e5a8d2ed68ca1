//! # Turbulence diffusion
//!
//! Noise-variance schedules for denoising diffusion over turbulent velocity
//! trajectories, with the forward (noising) process and increment statistics
//! on top of [Burn](https://github.com/tracel-ai/burn) tensors.
//!
//! ```
//! use turbulence_diffusion::{cumulative_alpha_bar, named_schedule};
//!
//! let betas = named_schedule("cosine", 1000).unwrap();
//! let alphas_cumprod = cumulative_alpha_bar(&betas);
//! assert_eq!(alphas_cumprod.len(), 1000);
//! ```

pub mod error;
pub mod increments;
pub mod schedulers;
pub mod utils;

pub use error::{Error, Result};
pub use schedulers::{
    cumulative_alpha_bar, discretize_alpha_bar, named_schedule, BetaSchedule, Schedule,
    ScheduleConfig,
};

#[cfg(all(test, feature = "ndarray"))]
pub type TestBackend = burn::backend::NdArray<f32>;
