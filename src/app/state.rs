//! Defines the central, mutable state of the application.

use crate::config::AppConfig;

/// Mutable shell state shared between event-loop callbacks.
///
/// Wrapped in an `Arc<Mutex<...>>` by the binary so window callbacks and the
/// close handler see the same configuration. The route picker bridge is
/// deliberately *not* part of this: it is owned by the IPC handler alone and
/// never shared.
pub struct AppState {
    /// The application's configuration settings.
    pub config: AppConfig,
}

impl Default for AppState {
    /// Creates a default `AppState`, loading the configuration from disk.
    fn default() -> Self {
        Self {
            config: AppConfig::load().unwrap_or_default(),
        }
    }
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}
