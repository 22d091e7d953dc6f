//! Platform-specific integration helpers.
//!
//! Keep OS quirks here to avoid leaking them into the app's core logic.

#[cfg(target_os = "macos")]
pub mod macos;

use crate::app::airplay::{PlatformSupport, RoutePickerBridge};
use tao::window::Window;

/// Version floor for the platform-managed picker presentation fallback.
/// AVKit ships the desktop route picker control from macOS 10.15.
#[cfg(target_os = "macos")]
const MIN_NATIVE_PICKER_VERSION: (i64, i64) = (10, 15);

/// Capability probe backed by the real operating system.
#[derive(Clone, Copy, Default)]
pub struct NativePlatformSupport;

impl PlatformSupport for NativePlatformSupport {
    fn presents_picker_natively(&self) -> bool {
        #[cfg(target_os = "macos")]
        {
            macos::os_at_least(MIN_NATIVE_PICKER_VERSION)
        }
        #[cfg(not(target_os = "macos"))]
        {
            false
        }
    }
}

/// Builds the route picker bridge for this platform.
///
/// Called exactly once during startup, after the window exists. On platforms
/// without a native picker control the bridge comes back detached and every
/// channel call reports `NO_PICKER`.
pub fn setup_airplay_bridge(window: &Window) -> RoutePickerBridge<NativePlatformSupport> {
    #[cfg(target_os = "macos")]
    {
        use crate::app::airplay::PickerHost;

        let host = macos::ContentViewHost::from_window(window);
        RoutePickerBridge::setup(
            host.as_ref().map(|h| h as &dyn PickerHost),
            NativePlatformSupport,
        )
    }
    #[cfg(not(target_os = "macos"))]
    {
        let _ = window;
        RoutePickerBridge::setup(None, NativePlatformSupport)
    }
}
