//! The application layer: IPC dispatch and backend-to-frontend event routing.
//!
//! The WebView posts JSON messages of the form
//! `{"channel": "...", "command": "...", "requestId": n, "payload": ...}`.
//! `handle_ipc_message` parses them, routes them to the matching handler, and
//! emits exactly one [`events::UserEvent::ChannelReply`] per well-formed
//! request through the [`proxy::EventProxy`].

pub mod airplay;
pub mod events;
pub mod proxy;
pub mod state;

use airplay::{MethodReply, PlatformSupport, RoutePickerBridge};
use events::{IpcMessage, UserEvent};
use proxy::EventProxy;
use wry::WebView;

/// Entry point for raw IPC strings arriving from the WebView.
///
/// Malformed messages are dropped after a warning; there is no request id to
/// reply to if the envelope itself cannot be parsed.
pub fn handle_ipc_message<S: PlatformSupport, P: EventProxy>(
    message: String,
    bridge: &RoutePickerBridge<S>,
    proxy: P,
) {
    let message: IpcMessage = match serde_json::from_str(&message) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!("Malformed IPC message: {}", e);
            return;
        }
    };

    let reply = dispatch(&message, bridge);
    proxy.send_event(UserEvent::ChannelReply {
        request_id: message.request_id,
        reply,
    });
}

/// Routes a parsed message to its handler and returns the single reply.
///
/// Anything outside the known channel/command set gets the generic
/// not-implemented reply, never one of the bridge's error kinds.
pub fn dispatch<S: PlatformSupport>(
    message: &IpcMessage,
    bridge: &RoutePickerBridge<S>,
) -> MethodReply {
    if message.channel != airplay::AIRPLAY_CHANNEL {
        tracing::warn!(channel = %message.channel, "Message for unknown channel");
        return MethodReply::NotImplemented;
    }

    match message.command.as_str() {
        airplay::SHOW_ROUTE_PICKER => bridge.show_route_picker(),
        other => {
            tracing::warn!(command = %other, "Unknown channel command");
            MethodReply::NotImplemented
        }
    }
}

/// Forwards a backend event to the WebView as a JavaScript callback.
pub fn handle_user_event(event: UserEvent, webview: &WebView) {
    match event {
        UserEvent::ChannelReply { request_id, reply } => {
            let script = format!(
                "window.__ghost && window.__ghost.onChannelReply({}, {});",
                request_id,
                reply.to_wire()
            );
            if let Err(e) = webview.evaluate_script(&script) {
                tracing::warn!("Failed to deliver channel reply {}: {}", request_id, e);
            }
        }
    }
}
