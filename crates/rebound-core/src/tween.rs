//! Linear counter sweeps driven by a repeating timer.
//!
//! A sweep advances an internal counter from `start` toward `end` by `step`
//! on every tick. Each productive tick writes `|offset + counter|` to the
//! target; the tick that finds the counter at or past `end` writes nothing
//! and completes the run. A negative `offset` turns the increasing counter
//! into a decreasing visible value, which is how falling passes are drawn.

use crate::{
    error::{AnimateError, Result, ensure_finite},
    sink::{StyleSink, StyleTarget},
};
use serde::{Serialize, Serializer};
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{oneshot, watch},
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, trace, warn};

/// Tokio intervals reject a zero period.
const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Sweep {
    pub start: f64,
    pub end: f64,
    /// Per-tick increment. Must be greater than zero.
    pub step: f64,
    /// Bias added to the counter before the absolute value is written.
    pub offset: f64,
    #[serde(rename = "tick_ms", serialize_with = "serialize_millis")]
    pub tick_period: Duration,
}

impl Sweep {
    pub fn validate(&self) -> Result<()> {
        ensure_finite("start", self.start)?;
        ensure_finite("end", self.end)?;
        ensure_finite("step", self.step)?;
        ensure_finite("offset", self.offset)?;
        if self.step <= 0.0 {
            return Err(AnimateError::invalid(
                "step",
                format!("{} would never reach the end bound", self.step),
            ));
        }
        Ok(())
    }

    /// Number of ticks that write before the terminal tick.
    ///
    /// Exact for steps that divide the span without rounding error.
    pub fn productive_ticks(&self) -> u64 {
        if self.start >= self.end {
            return 0;
        }
        ((self.end - self.start) / self.step).ceil() as u64
    }

    /// The period the timer is actually armed with.
    pub fn effective_tick_period(&self) -> Duration {
        self.tick_period.max(MIN_TICK_PERIOD)
    }
}

pub(crate) fn serialize_millis<S: Serializer>(
    period: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(period.as_millis() as u64)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
    /// The value written on a productive tick.
    Write(f64),
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    Cancelled,
}

/// The timer-free state of one sweep.
#[derive(Clone, Debug)]
pub struct Tween {
    sweep: Sweep,
    current: f64,
    writes: u64,
    complete: bool,
}

impl Tween {
    pub fn new(sweep: Sweep) -> Result<Self> {
        sweep.validate()?;
        Ok(Self {
            sweep,
            current: sweep.start,
            writes: 0,
            complete: false,
        })
    }

    pub fn sweep(&self) -> &Sweep {
        &self.sweep
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Advance by one tick. Once `Complete` is returned every later tick
    /// returns `Complete` as well.
    pub fn tick(&mut self) -> Tick {
        if self.complete || self.current >= self.sweep.end {
            self.complete = true;
            return Tick::Complete;
        }
        self.current += self.sweep.step;
        self.writes += 1;
        Tick::Write((self.sweep.offset + self.current).abs())
    }

    /// Drive the sweep on a timer until the terminal tick or cancellation.
    ///
    /// The first tick fires one period after the call. The timer belongs to
    /// this future and is released on every return path.
    pub async fn run<S: StyleSink>(
        &mut self,
        target: &mut StyleTarget<S>,
        cancel: &mut CancelSignal,
    ) -> Result<Outcome> {
        let period = self.sweep.effective_tick_period();
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(writes = self.writes, "sweep cancelled");
                    return Ok(Outcome::Cancelled);
                }
                _ = interval.tick() => {}
            }

            match self.tick() {
                Tick::Complete => {
                    debug!(writes = self.writes, "sweep complete");
                    return Ok(Outcome::Completed);
                }
                Tick::Write(value) => {
                    trace!(counter = self.current, value, "tick");
                    if let Err(err) = target.write(value) {
                        warn!(%err, "sweep stopped by sink failure");
                        return Err(err);
                    }
                }
            }
        }
    }

    /// Run the sweep on a spawned task and hand the outcome to
    /// `on_complete` exactly once.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<S>(
        self,
        target: StyleTarget<S>,
        cancel: CancelSignal,
        on_complete: Continuation<S>,
    ) where
        S: StyleSink + Send + 'static,
    {
        debug!(
            start = self.sweep.start,
            end = self.sweep.end,
            step = self.sweep.step,
            offset = self.sweep.offset,
            "sweep armed"
        );
        let mut tween = self;
        let mut target = target;
        let mut cancel = cancel;
        tokio::spawn(async move {
            let result = tween
                .run(&mut target, &mut cancel)
                .await
                .map(|outcome| Finished {
                    target,
                    writes: tween.writes,
                    outcome,
                });
            on_complete(result);
        });
    }

    /// Spawn the sweep and return a handle for cancelling and awaiting it.
    pub fn start<S>(self, target: StyleTarget<S>) -> TweenHandle<S>
    where
        S: StyleSink + Send + 'static,
    {
        let cancel = CancelHandle::new();
        let (tx, done) = oneshot::channel();
        self.spawn(
            target,
            cancel.signal(),
            Box::new(move |result| {
                let _ = tx.send(result);
            }),
        );
        TweenHandle { cancel, done }
    }
}

/// A finished sweep. Ownership of the target returns to the caller.
#[derive(Debug)]
pub struct Finished<S> {
    pub target: StyleTarget<S>,
    pub writes: u64,
    pub outcome: Outcome,
}

/// Invoked once when a spawned sweep ends.
pub type Continuation<S> = Box<dyn FnOnce(Result<Finished<S>>) + Send + 'static>;

/// Start a sweep on the current Tokio runtime.
///
/// Dropping the returned handle leaves the sweep running.
pub fn run<S>(
    sweep: Sweep,
    target: StyleTarget<S>,
    on_complete: Option<Continuation<S>>,
) -> Result<CancelHandle>
where
    S: StyleSink + Send + 'static,
{
    let tween = Tween::new(sweep)?;
    let cancel = CancelHandle::new();
    let on_complete = on_complete.unwrap_or_else(|| Box::new(|_| {}));
    tween.spawn(target, cancel.signal(), on_complete);
    Ok(cancel)
}

/// Requests cancellation of every sweep subscribed to it.
#[derive(Clone, Debug)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelHandle {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn signal(&self) -> CancelSignal {
        CancelSignal {
            rx: self.tx.subscribe(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CancelSignal {
    rx: watch::Receiver<bool>,
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested. Never resolves if every
    /// handle was dropped without cancelling.
    pub async fn cancelled(&mut self) {
        let closed = self.rx.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

pub struct TweenHandle<S> {
    cancel: CancelHandle,
    done: oneshot::Receiver<Result<Finished<S>>>,
}

impl<S> TweenHandle<S> {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub async fn finished(self) -> Result<Finished<S>> {
        self.done.await.map_err(|_| AnimateError::Abandoned)?
    }
}
