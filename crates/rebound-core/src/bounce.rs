//! Decaying bounce chains built from repeated sweeps.
//!
//! A chain alternates rising and falling passes. The parity of the
//! remaining pass count picks the phase: even counts rise, odd counts
//! fall. A falling pass draws the same increasing counter through a
//! negative offset so the visible value descends from the amplitude back
//! to the start, and it lowers the amplitude for the next rise by the
//! decay. Each pass is armed from the previous pass's completion
//! continuation, so passes of one chain never overlap.

use crate::{
    error::{AnimateError, Result, ensure_finite},
    sink::{StyleSink, StyleTarget},
    tween::{CancelHandle, CancelSignal, Finished, Outcome, Sweep, Tween, serialize_millis},
};
use serde::Serialize;
use std::{fmt, time::Duration};
use tokio::sync::oneshot;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Rise,
    Fall,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Phase::Rise => "rise",
            Phase::Fall => "fall",
        })
    }
}

/// Parameters for the next pass of a chain and every pass after it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BouncePlan {
    pub remaining_passes: u32,
    pub amplitude_start: f64,
    pub amplitude_end: f64,
    /// Subtracted from `amplitude_end` after every falling pass.
    pub amplitude_decay: f64,
    pub step: f64,
    #[serde(rename = "tick_ms", serialize_with = "serialize_millis")]
    pub tick_period: Duration,
}

/// One sweep of a chain and the plan that follows it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Pass {
    pub phase: Phase,
    pub sweep: Sweep,
    #[serde(skip)]
    pub next: BouncePlan,
}

impl BouncePlan {
    pub fn validate(&self) -> Result<()> {
        ensure_finite("amplitude_start", self.amplitude_start)?;
        ensure_finite("amplitude_end", self.amplitude_end)?;
        ensure_finite("amplitude_decay", self.amplitude_decay)?;
        ensure_finite("step", self.step)?;
        if self.step <= 0.0 {
            return Err(AnimateError::invalid(
                "step",
                format!("{} would never reach the amplitude", self.step),
            ));
        }
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        self.remaining_passes == 0
    }

    /// `None` once the chain is exhausted.
    pub fn phase(&self) -> Option<Phase> {
        match self.remaining_passes {
            0 => None,
            n if n % 2 == 0 => Some(Phase::Rise),
            _ => Some(Phase::Fall),
        }
    }

    /// Offset that makes an increasing counter descend from the amplitude.
    pub fn fall_offset(&self) -> f64 {
        -self.amplitude_end.abs()
    }

    pub fn next_pass(&self) -> Option<Pass> {
        let phase = self.phase()?;
        let (offset, next_end) = match phase {
            Phase::Rise => (0.0, self.amplitude_end),
            Phase::Fall => (
                self.fall_offset(),
                self.amplitude_end - self.amplitude_decay,
            ),
        };
        Some(Pass {
            phase,
            sweep: Sweep {
                start: self.amplitude_start,
                end: self.amplitude_end,
                step: self.step,
                offset,
                tick_period: self.tick_period,
            },
            next: BouncePlan {
                remaining_passes: self.remaining_passes - 1,
                amplitude_end: next_end,
                ..*self
            },
        })
    }

    /// Every pass the chain would run, without arming any timer.
    pub fn passes(&self) -> Passes {
        Passes { plan: *self }
    }
}

pub struct Passes {
    plan: BouncePlan,
}

impl Iterator for Passes {
    type Item = Pass;

    fn next(&mut self) -> Option<Pass> {
        let pass = self.plan.next_pass()?;
        self.plan = pass.next;
        Some(pass)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.plan.remaining_passes as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Passes {}

/// What one pass of a chain did.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PassRecord {
    /// 1-based position in the chain.
    pub index: u32,
    pub phase: Phase,
    pub sweep: Sweep,
    pub writes: u64,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub struct BounceReport<S> {
    pub target: StyleTarget<S>,
    pub passes: Vec<PassRecord>,
    pub cancelled: bool,
}

/// Start a bounce chain on the current Tokio runtime.
///
/// A plan with no remaining passes arms no timer and reports immediately.
pub fn schedule<S>(plan: BouncePlan, target: StyleTarget<S>) -> Result<BounceHandle<S>>
where
    S: StyleSink + Send + 'static,
{
    plan.validate()?;
    let cancel = CancelHandle::new();
    let (done, rx) = oneshot::channel();
    debug!(
        element = target.element(),
        property = target.property(),
        passes = plan.remaining_passes,
        "bounce scheduled"
    );
    Chain {
        signal: cancel.signal(),
        done,
        records: Vec::with_capacity(plan.remaining_passes as usize),
    }
    .advance(plan, target);
    Ok(BounceHandle { cancel, done: rx })
}

struct Chain<S> {
    signal: CancelSignal,
    done: oneshot::Sender<Result<BounceReport<S>>>,
    records: Vec<PassRecord>,
}

impl<S> Chain<S>
where
    S: StyleSink + Send + 'static,
{
    fn advance(self, plan: BouncePlan, target: StyleTarget<S>) {
        let Some(pass) = plan.next_pass() else {
            debug!(passes = self.records.len(), "bounce finished");
            self.report(target, false);
            return;
        };
        if self.signal.is_cancelled() {
            self.report(target, true);
            return;
        }
        let tween = match Tween::new(pass.sweep) {
            Ok(tween) => tween,
            Err(err) => {
                self.fail(err);
                return;
            }
        };

        let index = self.records.len() as u32 + 1;
        debug!(
            index,
            phase = ?pass.phase,
            end = pass.sweep.end,
            offset = pass.sweep.offset,
            "pass started"
        );
        let signal = self.signal.clone();
        tween.spawn(
            target,
            signal,
            Box::new(move |result| self.complete_pass(index, pass, result)),
        );
    }

    fn complete_pass(mut self, index: u32, pass: Pass, result: Result<Finished<S>>) {
        let finished = match result {
            Ok(finished) => finished,
            Err(err) => {
                self.fail(err);
                return;
            }
        };
        self.records.push(PassRecord {
            index,
            phase: pass.phase,
            sweep: pass.sweep,
            writes: finished.writes,
            outcome: finished.outcome,
        });
        match finished.outcome {
            Outcome::Completed => self.advance(pass.next, finished.target),
            Outcome::Cancelled => {
                debug!(index, "bounce cancelled");
                self.report(finished.target, true);
            }
        }
    }

    fn report(self, target: StyleTarget<S>, cancelled: bool) {
        let _ = self.done.send(Ok(BounceReport {
            target,
            passes: self.records,
            cancelled,
        }));
    }

    fn fail(self, err: AnimateError) {
        let _ = self.done.send(Err(err));
    }
}

pub struct BounceHandle<S> {
    cancel: CancelHandle,
    done: oneshot::Receiver<Result<BounceReport<S>>>,
}

impl<S> BounceHandle<S> {
    /// Stop the running pass before its next tick and arm no further passes.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Resolves when the last pass completes, the chain is cancelled, or a
    /// pass fails.
    pub async fn finished(self) -> Result<BounceReport<S>> {
        self.done.await.map_err(|_| AnimateError::Abandoned)?
    }
}
