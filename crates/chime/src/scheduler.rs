//! Minute ticker and sequential chime playback.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Timelike};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::ChimeError;
use crate::audio::AudioBuffer;
use crate::schedule::{self, ChimeEvent, ClockTick};
use crate::sink::PlaybackSink;

/// Pause between consecutive strikes of one chime.
pub const STRIKE_PAUSE: Duration = Duration::from_millis(500);

/// Delay after the minute boundary before the clock is sampled.
pub const TICK_SETTLE: Duration = Duration::from_millis(250);

/// Source of wall-clock time for the ticker.
pub trait Clock: Send + Sync + 'static {
    /// Current hour and minute.
    fn now(&self) -> ClockTick;

    /// Time left until the next minute boundary.
    fn until_next_minute(&self) -> Duration;
}

/// The system clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> ClockTick {
        ClockTick::from_time(&Local::now())
    }

    fn until_next_minute(&self) -> Duration {
        let now = Local::now();
        until_next_minute_at(now.second(), now.nanosecond())
    }
}

/// Time from `second`:`nanosecond` past the minute to the next minute.
fn until_next_minute_at(second: u32, nanosecond: u32) -> Duration {
    // Leap seconds report nanosecond values past 1e9.
    let into_minute = Duration::from_secs(second as u64)
        + Duration::from_nanos(nanosecond.min(999_999_999) as u64);
    Duration::from_secs(60).saturating_sub(into_minute)
}

/// Timing knobs for the scheduler.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub strike_pause: Duration,
    pub tick_settle: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            strike_pause: STRIKE_PAUSE,
            tick_settle: TICK_SETTLE,
        }
    }
}

/// Plays `count` strikes one after another.
///
/// Each strike queues a fresh cursor over the whole buffer and waits for its
/// natural duration; `pause` separates strikes but does not follow the last
/// one. A failed submission abandons the remaining strikes.
pub async fn play_chime(
    buffer: &AudioBuffer,
    sink: &dyn PlaybackSink,
    count: u8,
    pause: Duration,
) -> Result<(), ChimeError> {
    for strike in 1..=count {
        let cursor = buffer.cursor();
        let duration = cursor.natural_duration();
        sink.play(cursor)
            .map_err(|source| ChimeError::Playback { strike, source })?;
        tokio::time::sleep(duration).await;

        if strike < count {
            tokio::time::sleep(pause).await;
        }
    }
    Ok(())
}

/// Everything a chime task needs, cheap to clone into each task.
#[derive(Clone)]
struct Chimer {
    buffer: AudioBuffer,
    sink: Arc<dyn PlaybackSink>,
    pause: Duration,
}

impl Chimer {
    async fn chime(self, event: ChimeEvent) {
        tracing::info!(time = %event.tick, count = event.count, "chiming");
        match play_chime(&self.buffer, self.sink.as_ref(), event.count, self.pause).await {
            Ok(()) => tracing::debug!(time = %event.tick, "chime finished"),
            Err(e) => tracing::warn!(time = %event.tick, "chime abandoned: {e}"),
        }
    }
}

/// Quarter-hour chime scheduler.
///
/// Spawns a tokio task that wakes at every minute boundary and, on quarter
/// hours, spawns an independent chime task. Chimes are never awaited by the
/// ticker, so a long chime cannot delay the next minute.
pub struct Scheduler {
    chimer: Chimer,
    tick_settle: Duration,
    cancel: Mutex<Option<CancellationToken>>,
    chimes: TaskTracker,
}

impl Scheduler {
    /// Creates a stopped scheduler playing `buffer` through `sink`.
    pub fn new(buffer: AudioBuffer, sink: Arc<dyn PlaybackSink>, config: SchedulerConfig) -> Self {
        Self {
            chimer: Chimer {
                buffer,
                sink,
                pause: config.strike_pause,
            },
            tick_settle: config.tick_settle,
            cancel: Mutex::new(None),
            chimes: TaskTracker::new(),
        }
    }

    /// Starts the minute ticker, replacing any running one.
    pub async fn start(&self, clock: Arc<dyn Clock>) {
        let mut guard = self.cancel.lock().await;
        if let Some(cancel) = guard.take() {
            cancel.cancel();
        }

        let cancel = CancellationToken::new();
        *guard = Some(cancel.clone());

        tokio::spawn(tick_loop(
            clock,
            self.chimer.clone(),
            self.tick_settle,
            self.chimes.clone(),
            cancel,
        ));

        tracing::info!("chime scheduler started");
    }

    /// Stops the ticker. Chimes already playing run to completion.
    pub async fn stop(&self) {
        if let Some(cancel) = self.cancel.lock().await.take() {
            cancel.cancel();
            tracing::info!("chime scheduler stopped");
        }
    }

    /// Returns `true` while the ticker is running.
    pub async fn is_running(&self) -> bool {
        self.cancel.lock().await.is_some()
    }

    /// Number of chimes currently playing.
    pub fn chimes_in_flight(&self) -> usize {
        self.chimes.len()
    }

    /// Waits until every chime spawned so far has finished.
    ///
    /// Safe to cancel: the tracker accepts new chimes again either way.
    pub async fn wait_idle(&self) {
        self.chimes.close();
        let _reopen = ReopenOnDrop(&self.chimes);
        self.chimes.wait().await;
    }
}

struct ReopenOnDrop<'a>(&'a TaskTracker);

impl Drop for ReopenOnDrop<'_> {
    fn drop(&mut self) {
        self.0.reopen();
    }
}

async fn tick_loop(
    clock: Arc<dyn Clock>,
    chimer: Chimer,
    settle: Duration,
    chimes: TaskTracker,
    cancel: CancellationToken,
) {
    loop {
        let wait = clock.until_next_minute() + settle;
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(wait) => {
                let tick = clock.now();
                match schedule::evaluate(tick) {
                    Some(event) => {
                        chimes.spawn(chimer.clone().chime(event));
                    }
                    None => tracing::trace!(time = %tick, "no chime"),
                }
            }
        }
    }
}
