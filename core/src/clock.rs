use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use web_time::Instant;

/// Elapsed-seconds counter driven by the session: started on the first reveal, stopped
/// when the game ends, reset on restart.
pub trait Clock {
    fn start(&mut self);
    fn stop(&mut self);
    fn reset(&mut self);
    fn is_running(&self) -> bool;
    /// Whole seconds between start and stop (or now, while running), 0 if never started.
    fn elapsed_secs(&self) -> u32;
}

/// Clock that records start and end instants and derives the elapsed time on demand.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Stopwatch {
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
}

impl Clock for Stopwatch {
    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
            self.ended_at = None;
        }
    }

    fn stop(&mut self) {
        if self.started_at.is_some() && self.ended_at.is_none() {
            self.ended_at = Some(Instant::now());
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn is_running(&self) -> bool {
        self.started_at.is_some() && self.ended_at.is_none()
    }

    fn elapsed_secs(&self) -> u32 {
        match self.started_at {
            Some(started_at) => {
                let ended_at = self.ended_at.unwrap_or_else(Instant::now);
                let secs = ended_at.saturating_duration_since(started_at).as_secs();
                secs.try_into().unwrap_or(u32::MAX)
            }
            None => 0,
        }
    }
}

type TickCallback = Arc<dyn Fn(u32) + Send + Sync>;

/// Clock backed by a background ticker thread that bumps a shared counter every `period`
/// and asks the display to refresh through `on_tick`.
///
/// The ticker is cancelled and joined on [`stop`](Clock::stop), [`reset`](Clock::reset)
/// and drop, so no tick fires once the session is done with it.
pub struct TickingClock {
    period: Duration,
    elapsed: Arc<AtomicU32>,
    on_tick: Option<TickCallback>,
    ticker: Option<Ticker>,
}

struct Ticker {
    cancel: Sender<()>,
    handle: JoinHandle<()>,
}

impl TickingClock {
    pub fn new() -> Self {
        Self::with_period(Duration::from_secs(1))
    }

    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            elapsed: Arc::new(AtomicU32::new(0)),
            on_tick: None,
            ticker: None,
        }
    }

    /// Called from the ticker thread with the new elapsed count after every tick.
    pub fn on_tick(mut self, callback: impl Fn(u32) + Send + Sync + 'static) -> Self {
        self.on_tick = Some(Arc::new(callback));
        self
    }

    fn cancel_ticker(&mut self) {
        if let Some(Ticker { cancel, handle }) = self.ticker.take() {
            drop(cancel);
            if handle.join().is_err() {
                log::warn!("Clock ticker panicked");
            }
        }
    }
}

impl Default for TickingClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TickingClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickingClock")
            .field("period", &self.period)
            .field("elapsed", &self.elapsed.load(Ordering::Acquire))
            .field("running", &self.is_running())
            .finish()
    }
}

impl Clock for TickingClock {
    fn start(&mut self) {
        if self.ticker.is_some() {
            return;
        }

        let (cancel, cancelled) = mpsc::channel::<()>();
        let period = self.period;
        let elapsed = Arc::clone(&self.elapsed);
        let on_tick = self.on_tick.clone();

        let handle = thread::spawn(move || {
            loop {
                match cancelled.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => {
                        let secs = elapsed.fetch_add(1, Ordering::AcqRel).saturating_add(1);
                        if let Some(on_tick) = &on_tick {
                            on_tick(secs);
                        }
                    }
                    // sender dropped or an explicit cancel
                    _ => break,
                }
            }
        });
        log::debug!("Clock started, ticking every {:?}", period);
        self.ticker = Some(Ticker { cancel, handle });
    }

    fn stop(&mut self) {
        if self.ticker.is_some() {
            self.cancel_ticker();
            log::debug!(
                "Clock stopped at {}s",
                self.elapsed.load(Ordering::Acquire)
            );
        }
    }

    fn reset(&mut self) {
        self.cancel_ticker();
        self.elapsed.store(0, Ordering::Release);
    }

    fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    fn elapsed_secs(&self) -> u32 {
        self.elapsed.load(Ordering::Acquire)
    }
}

impl Drop for TickingClock {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}

/// Clock that only moves when told to, for deterministic scoring.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ManualClock {
    elapsed: u32,
    running: bool,
}

impl ManualClock {
    /// Adds `secs` while running, ignored otherwise.
    pub fn advance(&mut self, secs: u32) {
        if self.running {
            self.elapsed = self.elapsed.saturating_add(secs);
        }
    }
}

impl Clock for ManualClock {
    fn start(&mut self) {
        self.running = true;
    }

    fn stop(&mut self) {
        self.running = false;
    }

    fn reset(&mut self) {
        *self = Self::default();
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn elapsed_secs(&self) -> u32 {
        self.elapsed
    }
}
