//! Abstraction over the event-loop reply path.

use super::events::UserEvent;
use tao::event_loop::EventLoopProxy;

/// Sends `UserEvent`s toward the WebView. Fire-and-forget: channel replies
/// have no meaningful recovery if the event loop is gone.
pub trait EventProxy: Send + Sync + Clone + 'static {
    fn send_event(&self, event: UserEvent);
}

impl EventProxy for EventLoopProxy<UserEvent> {
    fn send_event(&self, event: UserEvent) {
        // Only fails when the event loop has shut down; a reply sent into a
        // closed window can simply be dropped.
        if let Err(e) = self.send_event(event) {
            tracing::warn!("Failed to send event to event loop: {}", e);
        }
    }
}
