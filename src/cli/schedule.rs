use std::io::Write;

use anyhow::{anyhow, Context, Result};
use burn::config::Config;
use clap::Args;
use tracing::info;
use turbulence_diffusion::schedulers::{BetaSchedule, ScheduleConfig, DEFAULT_MAX_BETA};

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    /// The schedule name: `linear`, `cosine`, `power<P>`, `exp<T0>` or `tanh<T0>,<T1>`.
    #[arg(long, default_value = "cosine")]
    name: String,

    /// The number of diffusion steps.
    #[arg(long, default_value_t = 1000)]
    num_steps: usize,

    /// The largest beta allowed at any step.
    #[arg(long, default_value_t = DEFAULT_MAX_BETA)]
    max_beta: f64,

    /// Read the schedule configuration from this file instead of the flags above.
    #[arg(long, value_name = "FILE")]
    config: Option<String>,

    /// Save the resolved schedule configuration to this file.
    #[arg(long, value_name = "FILE")]
    save_config: Option<String>,

    /// Print the cumulative alpha-bar next to each beta.
    #[arg(long, action)]
    alpha_bar: bool,
}

pub fn handle_schedule(args: &ScheduleArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => ScheduleConfig::load(path)
            .map_err(|err| anyhow!("failed to load schedule config {path}: {err:?}"))?,
        None => {
            let schedule: BetaSchedule = args.name.parse()?;
            ScheduleConfig::new(schedule, args.num_steps).with_max_beta(args.max_beta)
        }
    };

    let schedule = config.init()?;
    info!(
        "{} schedule with {} steps, final alpha-bar {:e}",
        schedule.kind(),
        schedule.num_steps(),
        schedule.alphas_cumprod().last().copied().unwrap_or(1.0)
    );

    if let Some(path) = &args.save_config {
        config
            .save(path)
            .with_context(|| format!("failed to save schedule config to {path}"))?;
    }

    let mut out = std::io::stdout().lock();
    for (step, (beta, alpha_bar)) in schedule
        .betas()
        .iter()
        .zip(schedule.alphas_cumprod())
        .enumerate()
    {
        if args.alpha_bar {
            writeln!(out, "{step},{beta},{alpha_bar}")?;
        } else {
            writeln!(out, "{step},{beta}")?;
        }
    }

    Ok(())
}
