//! Defines the event and message structures for communication between the backend and frontend.

use serde::Deserialize;

use super::airplay::MethodReply;

/// Events sent from the Rust backend to the WebView (UI thread).
#[derive(Debug)]
pub enum UserEvent {
    /// The single-shot reply to a channel invocation, delivered to
    /// `window.__ghost.onChannelReply(requestId, reply)` in the frontend.
    ChannelReply { request_id: u64, reply: MethodReply },
}

/// A message received from the WebView via the IPC channel.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct IpcMessage {
    /// The named channel the message addresses.
    pub channel: String,
    /// The name of the command to execute.
    pub command: String,
    /// Correlates the reply with the pending call in the frontend.
    #[serde(default)]
    pub request_id: u64,
    /// Command arguments. The commands this shell supports take none; the
    /// field is carried so the wire format does not change when one does.
    #[serde(default)]
    pub payload: serde_json::Value,
}
