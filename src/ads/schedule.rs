//! Mute/pause schedule run while a simulated ad is shown
//!
//! The signal with the longer duration goes active first. After `padding`
//! the other one joins, stays active for its (shorter) duration, then drops;
//! after another `padding` the first one drops too. The shorter window is
//! centered inside the longer one:
//!
//! ```text
//! longer   |<-pad->|<--- shorter --->|<-pad->|
//! shorter          |<--- shorter --->|
//! ```

use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use super::host::{HostContext, Signal};

/// Convert a millisecond setting into a duration; negative, NaN and
/// infinite inputs become zero
pub fn millis_to_duration(ms: f64) -> Duration {
    if !ms.is_finite() || ms <= 0.0 {
        return Duration::ZERO;
    }
    Duration::from_nanos((ms * 1_000_000.0).round() as u64)
}

/// One signal change, applied after waiting `wait` since the previous step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalStep {
    pub wait: Duration,
    pub signal: Signal,
    pub active: bool,
}

/// Timing of both signals for one ad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalPlan {
    /// Signal with the longer duration (pause wins ties)
    pub first: Signal,
    pub second: Signal,
    pub longer: Duration,
    pub shorter: Duration,
    /// Time before and after the window in which both signals are active
    pub padding: Duration,
}

impl SignalPlan {
    pub fn new(mute: Duration, pause: Duration) -> Self {
        let mute_first = mute > pause;
        let (first, second, longer, shorter) = if mute_first {
            (Signal::NeedsMute, Signal::NeedsPause, mute, pause)
        } else {
            (Signal::NeedsPause, Signal::NeedsMute, pause, mute)
        };

        Self {
            first,
            second,
            longer,
            shorter,
            padding: (longer - shorter) / 2,
        }
    }

    /// Build a plan from millisecond settings
    pub fn from_millis(mute_ms: f64, pause_ms: f64) -> Self {
        Self::new(millis_to_duration(mute_ms), millis_to_duration(pause_ms))
    }

    /// Time from the first activation to the last deactivation
    pub fn total(&self) -> Duration {
        self.longer
    }

    /// The four signal changes in order
    ///
    /// The trailing wait is computed from `longer` so the first signal stays
    /// active for exactly its duration even when the padding was rounded.
    pub fn steps(&self) -> [SignalStep; 4] {
        let trailing = self.longer - self.shorter - self.padding;
        [
            SignalStep { wait: Duration::ZERO, signal: self.first, active: true },
            SignalStep { wait: self.padding, signal: self.second, active: true },
            SignalStep { wait: self.shorter, signal: self.second, active: false },
            SignalStep { wait: trailing, signal: self.first, active: false },
        ]
    }
}

/// Presentation model of the full-screen overlay: a title plus the live
/// value of each signal
#[derive(Debug)]
pub struct AdOverlay {
    title: String,
    needs_pause: bool,
    needs_mute: bool,
    opened_at: Instant,
}

impl AdOverlay {
    pub fn open(title: &str) -> Self {
        info!(title, "Showing ad overlay");
        Self {
            title: title.to_string(),
            needs_pause: false,
            needs_mute: false,
            opened_at: Instant::now(),
        }
    }

    pub fn update(&mut self, signal: Signal, active: bool) {
        match signal {
            Signal::NeedsPause => self.needs_pause = active,
            Signal::NeedsMute => self.needs_mute = active,
        }
        debug!(
            title = %self.title,
            needs_pause = self.needs_pause,
            needs_mute = self.needs_mute,
            "Overlay state"
        );
    }

    pub fn state(&self) -> (bool, bool) {
        (self.needs_pause, self.needs_mute)
    }

    pub fn close(self) {
        info!(
            title = %self.title,
            elapsed_ms = self.opened_at.elapsed().as_millis() as u64,
            "Ad overlay closed"
        );
    }
}

/// Run `plan` to completion, reporting each change to `host` as it happens
///
/// Not cancellable: once started every signal is switched back off before
/// this returns.
pub async fn play(host: &dyn HostContext, title: &str, plan: SignalPlan) {
    let mut overlay = AdOverlay::open(title);

    for step in plan.steps() {
        // Zero waits must not yield, or equal durations would expose a
        // state where only one signal is active
        if !step.wait.is_zero() {
            sleep(step.wait).await;
        }
        host.set_signal(step.signal, step.active);
        overlay.update(step.signal, step.active);
    }

    debug_assert_eq!(overlay.state(), (false, false));
    overlay.close();
}
