//! # Schedulers
//!
//! Noise-variance schedules for the forward diffusion process and the
//! closed-form noising step that consumes them.

mod alpha_bar;
mod beta;
pub mod forward;

pub use alpha_bar::{AlphaBar, CosineAlphaBar, ExpAlphaBar, PowerAlphaBar, TanhAlphaBar};
pub use beta::{cumulative_alpha_bar, discretize_alpha_bar, linear_betas, DEFAULT_MAX_BETA};

use core::fmt;
use core::str::FromStr;

use burn::config::Config;
use burn::tensor::{backend::Backend, Tensor};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Error;
use crate::utils::tensor_from_f64s;

/// This represents how alpha-bar decays from one to zero over the diffusion
/// steps.
///
/// A schedule is written as a name with its parameters embedded, e.g. `cosine`,
/// `power2`, `exp5` or `tanh1.0,2.0`. The sequence a given name produces for a
/// given step count is fixed: variants may be added but never changed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BetaSchedule {
    /// Linear interpolation of beta, rescaled to match a 1000-step schedule.
    Linear,
    /// Glide cosine schedule.
    Cosine,
    /// `alpha_bar(t) = 1 - t^exponent`.
    Power { exponent: u32 },
    /// `alpha_bar(t) = 2 - exp((t0 + ln 2) t - t0)`.
    Exp { t0: f64 },
    /// `alpha_bar(t) = tanh(t1) - tanh((t0 + t1) t - t0)`.
    Tanh { t0: f64, t1: f64 },
}

impl BetaSchedule {
    /// The continuous alpha-bar function behind this schedule, or `None` for
    /// [`BetaSchedule::Linear`] which is defined directly on the betas.
    pub fn alpha_bar(&self) -> Option<Box<dyn AlphaBar + Send + Sync>> {
        match *self {
            BetaSchedule::Linear => None,
            BetaSchedule::Cosine => Some(Box::new(CosineAlphaBar)),
            BetaSchedule::Power { exponent } => Some(Box::new(PowerAlphaBar::new(exponent))),
            BetaSchedule::Exp { t0 } => Some(Box::new(ExpAlphaBar::new(t0))),
            BetaSchedule::Tanh { t0, t1 } => Some(Box::new(TanhAlphaBar::new(t0, t1))),
        }
    }

    /// The `num_steps` betas of this schedule, each capped at `max_beta`.
    pub fn betas(&self, num_steps: usize, max_beta: f64) -> crate::Result<Vec<f64>> {
        match self.alpha_bar() {
            Some(alpha_bar) => discretize_alpha_bar(num_steps, alpha_bar.as_ref(), max_beta),
            None => linear_betas(num_steps, max_beta),
        }
    }
}

impl FromStr for BetaSchedule {
    type Err = Error;

    fn from_str(name: &str) -> crate::Result<Self> {
        match name {
            "linear" => return Ok(BetaSchedule::Linear),
            "cosine" => return Ok(BetaSchedule::Cosine),
            _ => {}
        }

        if let Some(exponent) = name.strip_prefix("power") {
            Ok(BetaSchedule::Power {
                exponent: parse_exponent(name, exponent)?,
            })
        } else if let Some(t0) = name.strip_prefix("exp") {
            Ok(BetaSchedule::Exp {
                t0: parse_decimal(name, t0)?,
            })
        } else if let Some(params) = name.strip_prefix("tanh") {
            let (t0, t1) = params
                .split_once(',')
                .ok_or_else(|| malformed(name, "expected `tanh<t0>,<t1>`"))?;
            Ok(BetaSchedule::Tanh {
                t0: parse_decimal(name, t0)?,
                t1: parse_decimal(name, t1)?,
            })
        } else {
            Err(Error::UnsupportedSchedule(name.to_owned()))
        }
    }
}

impl fmt::Display for BetaSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetaSchedule::Linear => f.write_str("linear"),
            BetaSchedule::Cosine => f.write_str("cosine"),
            BetaSchedule::Power { exponent } => write!(f, "power{exponent}"),
            BetaSchedule::Exp { t0 } => write!(f, "exp{t0}"),
            BetaSchedule::Tanh { t0, t1 } => write!(f, "tanh{t0},{t1}"),
        }
    }
}

impl TryFrom<String> for BetaSchedule {
    type Error = Error;

    fn try_from(name: String) -> crate::Result<Self> {
        name.parse()
    }
}

impl From<BetaSchedule> for String {
    fn from(schedule: BetaSchedule) -> Self {
        schedule.to_string()
    }
}

fn malformed(name: &str, reason: &str) -> Error {
    Error::MalformedParameter {
        name: name.to_owned(),
        reason: reason.to_owned(),
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_exponent(name: &str, digits: &str) -> crate::Result<u32> {
    if !is_digits(digits) {
        return Err(malformed(name, "the exponent must be a non-negative integer"));
    }
    match digits.parse::<u32>() {
        Ok(0) => Err(malformed(name, "the exponent must be at least 1")),
        Ok(exponent) => Ok(exponent),
        Err(err) => Err(malformed(name, &err.to_string())),
    }
}

// ["-"] 1*DIGIT ["." 1*DIGIT]
fn parse_decimal(name: &str, s: &str) -> crate::Result<f64> {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let well_formed = match unsigned.split_once('.') {
        Some((int, frac)) => is_digits(int) && is_digits(frac),
        None => is_digits(unsigned),
    };
    if !well_formed {
        return Err(malformed(name, &format!("`{s}` is not a decimal number")));
    }
    s.parse::<f64>()
        .map_err(|err| malformed(name, &err.to_string()))
}

/// The configuration for a beta schedule.
#[derive(Config, Debug)]
pub struct ScheduleConfig {
    /// How beta evolves over the diffusion steps.
    pub schedule: BetaSchedule,
    /// The number of diffusion steps.
    pub num_steps: usize,
    /// The largest beta allowed at any step; use values lower than 1 to prevent singularities.
    #[config(default = 0.999)]
    pub max_beta: f64,
}

impl ScheduleConfig {
    /// Compute the betas and their cumulative alpha-bars.
    pub fn init(&self) -> crate::Result<Schedule> {
        let betas = self.schedule.betas(self.num_steps, self.max_beta)?;
        let alphas_cumprod = cumulative_alpha_bar(&betas);
        debug!(
            schedule = %self.schedule,
            num_steps = self.num_steps,
            max_beta = self.max_beta,
            "resolved beta schedule"
        );

        Ok(Schedule {
            kind: self.schedule,
            betas,
            alphas_cumprod,
        })
    }
}

/// A resolved beta schedule: the betas and the alpha-bars derived from them.
///
/// Immutable once built; share it behind an `Arc` to read from many threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    kind: BetaSchedule,
    betas: Vec<f64>,
    alphas_cumprod: Vec<f64>,
}

impl Schedule {
    pub fn kind(&self) -> BetaSchedule {
        self.kind
    }

    pub fn num_steps(&self) -> usize {
        self.betas.len()
    }

    pub fn betas(&self) -> &[f64] {
        &self.betas
    }

    pub fn alphas_cumprod(&self) -> &[f64] {
        &self.alphas_cumprod
    }

    pub fn betas_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 1> {
        tensor_from_f64s(&self.betas, device)
    }

    pub fn alphas_cumprod_tensor<B: Backend>(&self, device: &B::Device) -> Tensor<B, 1> {
        tensor_from_f64s(&self.alphas_cumprod, device)
    }
}

/// Get the betas of a named schedule with the default `max_beta`.
///
/// Fails with [`Error::UnsupportedSchedule`] for unknown names and
/// [`Error::MalformedParameter`] when the embedded parameters do not parse.
pub fn named_schedule(name: &str, num_steps: usize) -> crate::Result<Vec<f64>> {
    let schedule: BetaSchedule = name.parse()?;
    schedule.betas(num_steps, DEFAULT_MAX_BETA)
}
