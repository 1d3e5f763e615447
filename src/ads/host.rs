//! Host integration context receiving pause/mute signals

use tracing::info;

/// Signals raised while an ad plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    NeedsPause,
    NeedsMute,
}

impl Signal {
    pub fn name(self) -> &'static str {
        match self {
            Signal::NeedsPause => "needsPause",
            Signal::NeedsMute => "needsMute",
        }
    }
}

/// Provided by the host; called synchronously on every signal change
pub trait HostContext {
    fn set_needs_pause(&self, needs_pause: bool);
    fn set_needs_mute(&self, needs_mute: bool);

    fn set_signal(&self, signal: Signal, active: bool) {
        match signal {
            Signal::NeedsPause => self.set_needs_pause(active),
            Signal::NeedsMute => self.set_needs_mute(active),
        }
    }
}

/// Host that only logs the signals it receives
#[derive(Debug, Default)]
pub struct TracingHost;

impl HostContext for TracingHost {
    fn set_needs_pause(&self, needs_pause: bool) {
        info!(needs_pause, "Host needsPause changed");
    }

    fn set_needs_mute(&self, needs_mute: bool) {
        info!(needs_mute, "Host needsMute changed");
    }
}
