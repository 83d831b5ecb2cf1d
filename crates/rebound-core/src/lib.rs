//! Core animation primitives shared across Rebound components.
//!
//! A [`tween`] sweeps a counter linearly toward a bound on a fixed timer,
//! writing each value into a [`sink::StyleTarget`]. A [`bounce`] chain
//! re-arms that sweep through its completion continuation, alternating
//! rising and falling passes with a decaying amplitude.
//!
//! This crate has no knowledge of where the written values end up.

pub mod bounce;
pub mod error;
pub mod sink;
pub mod tween;

pub use bounce::{BounceHandle, BouncePlan, BounceReport, Pass, PassRecord, Phase, schedule};
pub use error::{AnimateError, Result};
pub use sink::{RecordingSink, SinkError, StyleSink, StyleTarget};
pub use tween::{
    CancelHandle, CancelSignal, Continuation, Finished, Outcome, Sweep, Tick, Tween, TweenHandle,
    run,
};
