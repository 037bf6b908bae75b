//! Deferred actions: sleep on the timer runtime, then post back to the loop.

use std::time::Duration;

use tokio::runtime::Handle;
use winit::event_loop::EventLoopProxy;

use kiosk_session::{DeferredAction, OwnerContext, SessionEvent};

pub struct ProxyContext {
    proxy: EventLoopProxy<SessionEvent>,
    timers: Handle,
}

impl ProxyContext {
    pub fn new(proxy: EventLoopProxy<SessionEvent>, timers: Handle) -> Self {
        Self { proxy, timers }
    }
}

impl OwnerContext for ProxyContext {
    fn post_after(&self, delay: Duration, action: DeferredAction) {
        let proxy = self.proxy.clone();
        self.timers.spawn(async move {
            tokio::time::sleep(delay).await;
            if proxy.send_event(SessionEvent::Deferred(action)).is_err() {
                tracing::trace!("event loop closed before deferred action fired");
            }
        });
    }
}
