use anyhow::Result;
use clap::Args;
use rebound::console::ConsoleSink;
use rebound_core::{StyleTarget, Sweep, Tween};
use std::time::Duration;

#[derive(Args)]
pub struct TweenArgs {
    /// Counter start value.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub from: f64,

    /// Counter end value.
    #[arg(long, allow_hyphen_values = true)]
    pub to: f64,

    /// Counter increment per tick.
    #[arg(long, default_value_t = 1.0)]
    pub step: f64,

    /// Bias added to the counter before writing; negative values descend.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub offset: f64,

    /// Milliseconds between ticks.
    #[arg(long, default_value_t = 10)]
    pub tick_ms: u64,

    #[arg(long, default_value = "element")]
    pub element: String,

    #[arg(long, default_value = "top")]
    pub property: String,

    #[arg(long, default_value = "px")]
    pub unit: String,
}

impl TweenArgs {
    pub fn run(&self) -> Result<()> {
        let sweep = Sweep {
            start: self.from,
            end: self.to,
            step: self.step,
            offset: self.offset,
            tick_period: Duration::from_millis(self.tick_ms),
        };
        let tween = Tween::new(sweep)?;
        tracing::info!(
            "Sweeping {}.{} over {} ticks",
            self.element,
            self.property,
            sweep.productive_ticks()
        );
        let target = StyleTarget::new(
            self.element.as_str(),
            self.property.as_str(),
            self.unit.as_str(),
            ConsoleSink::stdout(&self.element),
        );
        drive(tween, target)
    }
}

/// Run one sweep to completion, cancelling it on Ctrl-C.
#[tokio::main]
async fn drive(tween: Tween, target: StyleTarget<ConsoleSink>) -> Result<()> {
    let handle = tween.start(target);
    let cancel = handle.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let finished = handle.finished().await?;
    interrupt.abort();
    tracing::info!(writes = finished.writes, outcome = ?finished.outcome, "Sweep finished");
    Ok(())
}
