use std::sync::{Arc, Mutex};
use std::time::Duration;

use clock_core::{format_mm_ss_cs, Lap, StopwatchCore, TimerState};

use crate::error::TimerError;
use crate::ticker::{lock, Ticker};

pub const DEFAULT_TICK_MS: u64 = 10;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    Updated { elapsed: String },
    LapRecorded { lap: String, index: u32 },
    Stopped,
}

/// Receives stopwatch events on the ticker thread or the caller's thread.
/// Must not call back into the stopwatch.
pub type Listener = Box<dyn FnMut(TimerEvent) + Send>;

struct Shared {
    core: StopwatchCore,
    listener: Option<Listener>,
    // Bumped on every pause/stop; a tick from an older run is dropped.
    generation: u64,
}

impl Shared {
    fn emit(&mut self, event: TimerEvent) {
        if let Some(listener) = self.listener.as_mut() {
            listener(event);
        }
    }
}

/// The app's one stopwatch. Lives as long as the app, not the timer screen;
/// the screen attaches and detaches through `subscribe`/`unsubscribe`.
pub struct Stopwatch {
    shared: Arc<Mutex<Shared>>,
    tick: Duration,
    ticker: Option<Ticker>,
}

impl Stopwatch {
    pub fn new(tick: Duration) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                core: StopwatchCore::new(),
                listener: None,
                generation: 0,
            })),
            tick,
            ticker: None,
        }
    }

    pub fn state(&self) -> TimerState {
        lock(&self.shared).core.state()
    }

    pub fn elapsed_ms(&self) -> u64 {
        lock(&self.shared).core.elapsed_ms()
    }

    pub fn lap_count(&self) -> u32 {
        lock(&self.shared).core.lap_count()
    }

    pub fn laps(&self) -> Vec<Lap> {
        lock(&self.shared).core.laps().to_vec()
    }

    pub fn subscribe(&self, listener: Listener) -> Result<(), TimerError> {
        let mut shared = lock(&self.shared);
        if shared.listener.is_some() {
            return Err(TimerError::SubscriberActive);
        }
        shared.listener = Some(listener);
        Ok(())
    }

    /// Detach the listener. It is not called again once this returns.
    pub fn unsubscribe(&self) -> bool {
        lock(&self.shared).listener.take().is_some()
    }

    pub fn start(&mut self) -> Result<bool, TimerError> {
        let generation = {
            let mut shared = lock(&self.shared);
            if !shared.core.start() {
                return Ok(false);
            }
            shared.generation += 1;
            shared.generation
        };
        if let Err(e) = self.spawn_ticker(generation) {
            lock(&self.shared).core.stop();
            return Err(e);
        }
        log::info!("stopwatch started, tick {:?}", self.tick);
        Ok(true)
    }

    pub fn pause(&mut self) -> bool {
        {
            let mut shared = lock(&self.shared);
            if !shared.core.pause() {
                return false;
            }
            shared.generation += 1;
            log::info!("stopwatch paused at {} ms", shared.core.elapsed_ms());
        }
        self.cancel_ticker();
        true
    }

    pub fn resume(&mut self) -> Result<bool, TimerError> {
        let generation = {
            let mut shared = lock(&self.shared);
            if !shared.core.resume() {
                return Ok(false);
            }
            shared.generation += 1;
            shared.generation
        };
        if let Err(e) = self.spawn_ticker(generation) {
            lock(&self.shared).core.pause();
            return Err(e);
        }
        log::info!("stopwatch resumed");
        Ok(true)
    }

    /// Reset to Idle and tell the listener. No-op when already Idle.
    pub fn stop(&mut self) -> bool {
        {
            let mut shared = lock(&self.shared);
            if !shared.core.stop() {
                return false;
            }
            shared.generation += 1;
            shared.emit(TimerEvent::Stopped);
        }
        self.cancel_ticker();
        log::info!("stopwatch stopped");
        true
    }

    pub fn record_lap(&self) -> Option<Lap> {
        let mut shared = lock(&self.shared);
        let lap = shared.core.record_lap()?;
        log::debug!("lap {} recorded: {} ms", lap.index, lap.duration_ms);
        shared.emit(TimerEvent::LapRecorded {
            lap: format_mm_ss_cs(lap.duration_ms),
            index: lap.index,
        });
        Some(lap)
    }

    pub fn clear_laps(&self) -> bool {
        lock(&self.shared).core.clear_laps()
    }

    fn spawn_ticker(&mut self, generation: u64) -> Result<(), TimerError> {
        self.cancel_ticker();
        let shared = Arc::clone(&self.shared);
        let interval_ms = self.tick.as_millis() as u64;
        let ticker = Ticker::spawn("stopwatch-tick", self.tick, move || {
            let mut shared = lock(&shared);
            if shared.generation != generation {
                return false;
            }
            match shared.core.tick(interval_ms) {
                Some(elapsed) => {
                    shared.emit(TimerEvent::Updated {
                        elapsed: format_mm_ss_cs(elapsed),
                    });
                    true
                }
                None => false,
            }
        })
        .map_err(TimerError::Spawn)?;
        self.ticker = Some(ticker);
        Ok(())
    }

    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }
}

impl Drop for Stopwatch {
    fn drop(&mut self) {
        self.cancel_ticker();
    }
}
