use std::cell::RefCell;
use std::rc::Rc;

use hyperspeed_platform::{FrameScheduler, FrameToken};
use tracing::warn;

#[derive(Debug, Default)]
struct SchedulerState {
    next_token: u64,
    pending: Option<FrameToken>,
    requested: u64,
    cancelled: u64,
}

/// Frame scheduler driven by the caller. Clones share one queue, so the host
/// keeps a clone to [`ManualScheduler::fire`] what the simulator requested.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the pending request, as a display refresh would.
    pub fn fire(&self) -> Option<FrameToken> {
        self.state.borrow_mut().pending.take()
    }

    pub fn pending(&self) -> Option<FrameToken> {
        self.state.borrow().pending
    }

    pub fn requested_count(&self) -> u64 {
        self.state.borrow().requested
    }

    pub fn cancelled_count(&self) -> u64 {
        self.state.borrow().cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameToken {
        let mut state = self.state.borrow_mut();
        state.next_token += 1;
        state.requested += 1;
        let token = FrameToken(state.next_token);
        if let Some(previous) = state.pending.replace(token) {
            warn!("Frame {:?} superseded by {:?} before firing", previous, token);
        }
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let mut state = self.state.borrow_mut();
        if state.pending == Some(token) {
            state.pending = None;
            state.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clones_share_the_pending_request() {
        let host = ManualScheduler::new();
        let mut client = host.clone();

        let token = client.request_frame();
        assert_eq!(host.pending(), Some(token));
        assert_eq!(host.fire(), Some(token));
        assert_eq!(host.fire(), None);
    }

    #[test]
    fn cancel_only_removes_matching_token() {
        let host = ManualScheduler::new();
        let mut client = host.clone();

        let first = client.request_frame();
        host.fire();
        let second = client.request_frame();
        client.cancel_frame(first);
        assert_eq!(host.pending(), Some(second));

        client.cancel_frame(second);
        assert_eq!(host.pending(), None);
        assert_eq!(host.cancelled_count(), 1);
        assert_eq!(host.requested_count(), 2);
    }
}
