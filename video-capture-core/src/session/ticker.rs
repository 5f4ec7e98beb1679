use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::models::error::CaptureError;
use crate::traits::tick_source::{TickSource, TimerToken};

/// Receives each tick. Runs on the ticker thread.
pub type TickCallback = Arc<dyn Fn(TimerToken) + Send + Sync>;

struct Running {
    token: TimerToken,
    signal: Arc<(Mutex<bool>, Condvar)>,
    handle: thread::JoinHandle<()>,
}

/// Periodic timer backed by a dedicated thread, for native hosts.
///
/// The callback should only forward the token (e.g. over a channel) to the
/// thread that owns the controller; it must not call into the controller
/// directly.
pub struct ThreadTicker {
    callback: TickCallback,
    running: Option<Running>,
}

impl ThreadTicker {
    pub fn new(callback: TickCallback) -> Self {
        Self {
            callback,
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    fn stop_running(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        let (cancelled, condvar) = &*running.signal;
        *cancelled.lock() = true;
        condvar.notify_all();

        // Cancelling from inside the callback cannot join its own thread.
        if running.handle.thread().id() == thread::current().id() {
            return;
        }
        if running.handle.join().is_err() {
            log::warn!("ticker thread for {:?} panicked", running.token);
        }
    }
}

impl TickSource for ThreadTicker {
    fn start(&mut self, period: Duration, token: TimerToken) -> Result<(), CaptureError> {
        if period.is_zero() {
            return Err(CaptureError::TimerFailed("tick period must be non-zero".into()));
        }
        self.stop_running();

        let signal = Arc::new((Mutex::new(false), Condvar::new()));
        let thread_signal = Arc::clone(&signal);
        let callback = Arc::clone(&self.callback);

        let handle = thread::Builder::new()
            .name("capture-ticker".into())
            .spawn(move || {
                let (cancelled, condvar) = &*thread_signal;
                let mut guard = cancelled.lock();
                let mut deadline = Instant::now() + period;
                while !*guard {
                    if condvar.wait_until(&mut guard, deadline).timed_out() && !*guard {
                        MutexGuard::unlocked(&mut guard, || callback(token));
                        deadline += period;
                    }
                }
            })
            .map_err(|e| CaptureError::TimerFailed(format!("failed to spawn ticker thread: {}", e)))?;

        log::debug!("ticker {:?} started every {:?}", token, period);
        self.running = Some(Running { token, signal, handle });
        Ok(())
    }

    fn cancel(&mut self, token: TimerToken) {
        match self.running {
            Some(ref running) if running.token == token => {
                self.stop_running();
                log::debug!("ticker {:?} cancelled", token);
            }
            _ => log::debug!("cancel for inactive ticker {:?} ignored", token),
        }
    }
}

impl Drop for ThreadTicker {
    fn drop(&mut self) {
        self.stop_running();
    }
}
