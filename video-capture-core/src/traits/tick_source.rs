use std::time::Duration;

use crate::models::error::CaptureError;

/// Identifies one running timer. Ticks carrying any other token are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(pub u64);

/// Periodic timer driving the elapsed-time counter.
pub trait TickSource {
    /// Start delivering `token` every `period` until cancelled.
    fn start(&mut self, period: Duration, token: TimerToken) -> Result<(), CaptureError>;

    /// Stop the timer for `token`. Unknown tokens are ignored.
    fn cancel(&mut self, token: TimerToken);
}
