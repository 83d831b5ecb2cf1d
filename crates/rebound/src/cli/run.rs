use anyhow::Result;
use clap::Args;
use rebound::{config::Config, console::ConsoleSink};
use rebound_core::{CancelHandle, schedule};
use std::path::PathBuf;
use tokio::time::{self, MissedTickBehavior};

#[derive(Args)]
pub struct RunArgs {
    /// Path to the configuration file (TOML or JSON).
    pub config: PathBuf,

    /// Override the configured number of passes.
    #[arg(long)]
    pub passes: Option<u32>,
}

impl RunArgs {
    pub fn run(&self) -> Result<()> {
        let mut config = Config::from_file(&self.config)?;
        if let Some(passes) = self.passes {
            config.bounce.passes = passes.into();
        }
        config.validate()?;

        tracing::info!("Running bounce from config: {}", self.config.display());
        run_bounce(config)
    }
}

#[tokio::main]
async fn run_bounce(config: Config) -> Result<()> {
    let plan = config.bounce_plan()?;

    let stop = CancelHandle::new();
    let interrupt = {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Interrupted, stopping after the current tick");
                stop.cancel();
            }
        })
    };
    let mut stopped = stop.signal();

    if !config.delay().is_zero() {
        tokio::select! {
            _ = time::sleep(config.delay()) => {}
            _ = stopped.cancelled() => return Ok(()),
        }
    }

    let mut restarts = config.repeat().map(|period| {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    let mut chains = 0u64;
    loop {
        if let Some(restarts) = restarts.as_mut() {
            tokio::select! {
                _ = restarts.tick() => {}
                _ = stopped.cancelled() => break,
            }
        }

        let handle = schedule(plan, config.target(ConsoleSink::stdout(&config.target.element)))?;
        let chain = handle.cancel_handle();
        let finished = handle.finished();
        tokio::pin!(finished);
        let report = tokio::select! {
            report = &mut finished => report?,
            _ = stopped.cancelled() => {
                chain.cancel();
                finished.await?
            }
        };

        chains += 1;
        let writes: u64 = report.passes.iter().map(|pass| pass.writes).sum();
        tracing::info!(
            chain = chains,
            passes = report.passes.len(),
            writes,
            cancelled = report.cancelled,
            "Bounce finished"
        );

        if report.cancelled || restarts.is_none() {
            break;
        }
    }

    interrupt.abort();
    Ok(())
}
