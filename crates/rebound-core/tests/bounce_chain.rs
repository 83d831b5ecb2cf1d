use rebound_core::{
    AnimateError, BouncePlan, Outcome, Phase, RecordingSink, SinkError, StyleSink, StyleTarget,
    schedule,
};
use std::time::Duration;
use tokio::time::{self, Instant};

fn plan(passes: u32) -> BouncePlan {
    BouncePlan {
        remaining_passes: passes,
        amplitude_start: 0.0,
        amplitude_end: 20.0,
        amplitude_decay: 5.0,
        step: 1.0,
        tick_period: Duration::from_millis(10),
    }
}

fn target() -> StyleTarget<RecordingSink> {
    StyleTarget::new("#ball", "top", "px", RecordingSink::default())
}

fn px(values: impl IntoIterator<Item = u32>) -> Vec<String> {
    values.into_iter().map(|v| format!("{v}px")).collect()
}

/// Accepts a fixed number of writes, then rejects everything.
#[derive(Debug)]
struct Flaky {
    remaining: usize,
}

impl StyleSink for Flaky {
    fn set(&mut self, _property: &str, value: &str) -> Result<(), SinkError> {
        if self.remaining == 0 {
            return Err(SinkError::Rejected(format!("element detached before {value}")));
        }
        self.remaining -= 1;
        Ok(())
    }
}

#[tokio::test(start_paused = true)]
async fn four_pass_bounce_writes_every_pass_in_order() {
    let began = Instant::now();
    let report = schedule(plan(4), target()).unwrap().finished().await.unwrap();

    assert!(!report.cancelled);
    let phases: Vec<_> = report.passes.iter().map(|p| p.phase).collect();
    assert_eq!(phases, [Phase::Rise, Phase::Fall, Phase::Rise, Phase::Fall]);
    let writes: Vec<_> = report.passes.iter().map(|p| p.writes).collect();
    assert_eq!(writes, [20, 20, 15, 15]);
    assert_eq!(report.passes[3].sweep.offset, -15.0);

    let mut expected = px(1..=20);
    expected.extend(px((0..=19).rev()));
    expected.extend(px(1..=15));
    expected.extend(px((0..=14).rev()));
    let written: Vec<_> = report
        .target
        .sink()
        .values_of("top")
        .map(str::to_string)
        .collect();
    assert_eq!(written, expected);

    // every pass spends one extra tick on completion
    assert_eq!(began.elapsed(), Duration::from_millis(10 * (21 + 21 + 16 + 16)));
}

#[tokio::test(start_paused = true)]
async fn chain_goes_inert_after_last_pass() {
    let handle = schedule(plan(2), target()).unwrap();
    let report = handle.finished().await.unwrap();
    let total = report.target.sink().writes.len();
    assert_eq!(total, 40);
    assert_eq!(report.passes.len(), 2);

    time::sleep(Duration::from_secs(5)).await;
    assert_eq!(report.target.sink().writes.len(), total);
}

#[tokio::test(start_paused = true)]
async fn zero_passes_report_immediately() {
    let began = Instant::now();
    let report = schedule(plan(0), target()).unwrap().finished().await.unwrap();
    assert!(report.passes.is_empty());
    assert!(report.target.sink().writes.is_empty());
    assert_eq!(began.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_mid_chain() {
    let handle = schedule(plan(4), target()).unwrap();
    // 21 ticks finish the rise, then five ticks into the fall
    time::sleep(Duration::from_millis(265)).await;
    handle.cancel();
    let report = handle.finished().await.unwrap();

    assert!(report.cancelled);
    assert_eq!(report.passes.len(), 2);
    assert_eq!(report.passes[0].outcome, Outcome::Completed);
    assert_eq!(report.passes[1].outcome, Outcome::Cancelled);
    assert_eq!(report.passes[1].writes, 5);
    assert_eq!(report.target.sink().writes.len(), 25);
}

#[tokio::test(start_paused = true)]
async fn sink_failure_ends_the_chain() {
    let flaky = StyleTarget::new("#ball", "top", "px", Flaky { remaining: 25 });
    let err = schedule(plan(4), flaky).unwrap().finished().await.unwrap_err();
    match err {
        AnimateError::SinkWrite {
            element,
            property,
            value,
            source: SinkError::Rejected(_),
        } => {
            assert_eq!(element, "#ball");
            assert_eq!(property, "top");
            // 20 rising writes, then 19..15 falling, then 14 is refused
            assert_eq!(value, "14px");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn invalid_step_is_rejected_up_front() {
    let mut bad = plan(4);
    bad.step = -1.0;
    let err = schedule(bad, target()).err().unwrap();
    assert!(matches!(
        err,
        AnimateError::InvalidParameter { name: "step", .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn independent_chains_do_not_interfere() {
    let left = schedule(plan(2), target()).unwrap();
    let mut short = plan(2);
    short.amplitude_end = 4.0;
    short.tick_period = Duration::from_millis(3);
    let right = schedule(short, StyleTarget::new("#other", "left", "%", RecordingSink::default()))
        .unwrap();

    let (left, right) = tokio::join!(left.finished(), right.finished());
    let left = left.unwrap();
    let right = right.unwrap();

    assert_eq!(left.target.sink().writes.len(), 40);
    let right_values: Vec<_> = right.target.sink().values_of("left").collect();
    assert_eq!(
        right_values,
        ["1%", "2%", "3%", "4%", "3%", "2%", "1%", "0%"]
    );
}
