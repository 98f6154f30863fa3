use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use flume::{RecvTimeoutError, Sender};

pub(crate) fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(g) => g,
        Err(poison) => poison.into_inner(),
    }
}

/// Shared cancellation flag. A tick runs while holding the flag's lock, so
/// `cancel` returns only once any in-flight tick has finished.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<Mutex<bool>>);

impl CancelToken {
    pub fn cancel(&self) {
        *lock(&self.0) = true;
    }

    fn run_unless_cancelled<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        let cancelled = lock(&self.0);
        if *cancelled {
            return None;
        }
        Some(f())
    }
}

/// A repeating task on its own thread.
///
/// `on_tick` must not cancel its own ticker; it holds the token lock while it runs.
pub struct Ticker {
    token: CancelToken,
    wake: Sender<()>,
    thread: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Call `on_tick` every `interval` until it returns `false` or the ticker is cancelled.
    pub fn spawn<F>(name: &str, interval: Duration, mut on_tick: F) -> std::io::Result<Self>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let token = CancelToken::default();
        let (wake, wake_rx) = flume::bounded::<()>(1);
        let thread_token = token.clone();
        let thread_name = name.to_string();

        let thread = thread::Builder::new().name(thread_name.clone()).spawn(move || {
            log::debug!("{} ticking every {:?}", thread_name, interval);
            loop {
                match wake_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    // Woken by cancel, or the handle was dropped
                    _ => break,
                }
                match thread_token.run_unless_cancelled(&mut on_tick) {
                    Some(true) => {}
                    _ => break,
                }
            }
            log::debug!("{} stopped", thread_name);
        })?;

        Ok(Self {
            token,
            wake,
            thread: Some(thread),
        })
    }

    /// No tick is delivered once this returns.
    pub fn cancel(&self) {
        self.token.cancel();
        self.wake.try_send(()).ok();
    }

    /// Cancel and wait for the thread to exit.
    pub fn join(mut self) {
        self.cancel();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("ticker thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
