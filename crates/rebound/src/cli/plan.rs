use anyhow::{Context, Result};
use clap::Args;
use rebound::config::Config;
use rebound_core::BouncePlan;
use std::{fmt::Write as _, path::PathBuf};

#[derive(Args)]
pub struct PlanArgs {
    /// Path to the configuration file (TOML or JSON).
    pub config: PathBuf,

    /// Emit the passes as JSON.
    #[arg(long)]
    pub json: bool,
}

impl PlanArgs {
    pub fn run(&self) -> Result<()> {
        let config = Config::from_file(&self.config)?;
        config.validate()?;
        let plan = config.bounce_plan()?;

        let rendered = if self.json {
            let passes: Vec<_> = plan.passes().collect();
            serde_json::to_string_pretty(&passes).context("failed to render passes as JSON")?
        } else {
            render_table(&plan, &config.target.unit)
        };
        println!("{rendered}");
        Ok(())
    }
}

pub fn render_table(plan: &BouncePlan, unit: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "pass  phase  start  end  offset  ticks");
    for (index, pass) in plan.passes().enumerate() {
        let sweep = pass.sweep;
        let _ = writeln!(
            out,
            "{:>4}  {:<5}  {}{unit}  {}{unit}  {}  {}",
            index + 1,
            pass.phase,
            sweep.start,
            sweep.end,
            sweep.offset,
            sweep.productive_ticks()
        );
    }
    out.trim_end().to_string()
}
