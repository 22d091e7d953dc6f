//! The AirPlay route picker bridge.
//!
//! The web player cannot open the system output-route selector itself, so the
//! shell keeps a hidden native picker control attached to the window and
//! forwards the `showRoutePicker` channel command to it by synthesizing a
//! click on the control's internal button.
//!
//! All platform types sit behind small traits (`PickerHost`, `PickerControl`,
//! `PlatformSupport`) so the command logic is testable without a real window.

use std::rc::Rc;

use thiserror::Error;

/// Channel the web player uses to reach this bridge. Must match the string
/// used by the frontend exactly.
pub const AIRPLAY_CHANNEL: &str = "com.ghostmusic/airplay";

/// The single command the bridge understands.
pub const SHOW_ROUTE_PICKER: &str = "showRoutePicker";

/// Footprint of the hidden picker control, in logical pixels.
const PICKER_SIZE: f64 = 40.0;

/// Errors reported back over the channel.
///
/// The `Display` strings are part of the wire contract shared with the
/// calling layer and must not be reworded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AirPlayError {
    /// The picker control was never attached (setup failed or never ran).
    #[error("Route picker not available")]
    NoPicker,
    /// The platform cannot present the picker on its own.
    #[error("AirPlay picker requires iOS 11+")]
    Unsupported,
}

impl AirPlayError {
    /// Short machine-readable code, as the frontend matches on it.
    pub fn code(&self) -> &'static str {
        match self {
            AirPlayError::NoPicker => "NO_PICKER",
            AirPlayError::Unsupported => "UNSUPPORTED",
        }
    }
}

/// Outcome of a single channel invocation.
///
/// All three variants are routine results, not faults; each invocation
/// produces exactly one of them.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodReply {
    /// The command succeeded. `showRoutePicker` always replies with a null
    /// value; the field exists for future commands that return data.
    Success(serde_json::Value),
    /// The command failed with one of the contract error kinds.
    Error(AirPlayError),
    /// The command (or channel) is not recognized. Distinct from both error
    /// kinds.
    NotImplemented,
}

impl MethodReply {
    /// Serializes the reply for delivery to the web layer.
    pub fn to_wire(&self) -> serde_json::Value {
        match self {
            MethodReply::Success(value) => serde_json::json!({
                "status": "ok",
                "value": value,
            }),
            MethodReply::Error(err) => serde_json::json!({
                "status": "error",
                "code": err.code(),
                "message": err.to_string(),
            }),
            MethodReply::NotImplemented => serde_json::json!({
                "status": "notImplemented",
            }),
        }
    }
}

/// The capability of a UI element to receive a synthesized primary-action
/// event, as if the user had clicked it.
pub trait Activatable {
    fn activate(&self);
}

/// One immediate sub-element of the picker control.
pub trait PickerElement {
    /// Capability query: returns the element's `Activatable` surface if it
    /// behaves as an interactive button, `None` otherwise.
    fn as_activatable(&self) -> Option<&dyn Activatable>;
}

/// An opaque handle to the native, invisible route picker control.
///
/// Exactly one handle exists per application instance, owned by the bridge
/// for the lifetime of the window. It is torn down implicitly with the
/// window; there is no explicit disposal.
pub trait PickerControl {
    /// Snapshot of the control's immediate sub-elements, front-most first.
    /// Nested descendants are not scanned.
    fn children(&self) -> Vec<Rc<dyn PickerElement>>;
}

/// A visual container that can host the hidden picker control.
///
/// Implemented by the real window content view on macOS and by test doubles
/// elsewhere. `attach_picker` returns `None` when the platform control type
/// is unavailable.
pub trait PickerHost {
    fn attach_picker(&self, size: f64) -> Option<Box<dyn PickerControl>>;
}

/// Capability probe: whether this runtime presents the picker UI on its own
/// when the control is activated without a discoverable button.
///
/// Injected rather than checked inline so the version branch is testable
/// without a real platform target.
pub trait PlatformSupport {
    fn presents_picker_natively(&self) -> bool;
}

/// Bridges the `com.ghostmusic/airplay` channel to the native picker.
///
/// Stateless beyond the handle itself: commands are independent and
/// idempotent, and each resolves synchronously on the main thread.
pub struct RoutePickerBridge<S: PlatformSupport> {
    picker: Option<Box<dyn PickerControl>>,
    support: S,
}

impl<S: PlatformSupport> RoutePickerBridge<S> {
    /// Performs the one-time bridge setup.
    ///
    /// When the container is absent, or when it cannot produce the platform
    /// control, setup aborts silently and every later command reports
    /// `NO_PICKER`. No error surfaces here; no caller exists yet to receive
    /// one.
    pub fn setup(host: Option<&dyn PickerHost>, support: S) -> Self {
        let picker = host.and_then(|h| h.attach_picker(PICKER_SIZE));
        match picker {
            Some(_) => tracing::info!("Route picker attached to the window"),
            None => tracing::warn!(
                "Route picker unavailable; '{}' will report NO_PICKER",
                SHOW_ROUTE_PICKER
            ),
        }
        Self { picker, support }
    }

    /// Handles the `showRoutePicker` command.
    ///
    /// Scans the control's immediate sub-elements for the first interactive
    /// button and clicks it. Without one, a supported platform is trusted to
    /// present the picker on its own and the call still reports success; the
    /// bridge never verifies that the system UI actually appeared.
    pub fn show_route_picker(&self) -> MethodReply {
        let picker = match &self.picker {
            Some(picker) => picker,
            None => return MethodReply::Error(AirPlayError::NoPicker),
        };

        for child in picker.children() {
            if let Some(button) = child.as_activatable() {
                button.activate();
                return MethodReply::Success(serde_json::Value::Null);
            }
        }

        if self.support.presents_picker_natively() {
            MethodReply::Success(serde_json::Value::Null)
        } else {
            MethodReply::Error(AirPlayError::Unsupported)
        }
    }

    /// `true` once setup has attached the native control.
    pub fn is_attached(&self) -> bool {
        self.picker.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Shared counter recording synthesized activations.
    #[derive(Clone, Default)]
    struct TapRecorder(Arc<AtomicUsize>);

    impl TapRecorder {
        fn taps(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    struct FakeButton {
        taps: TapRecorder,
    }

    impl PickerElement for FakeButton {
        fn as_activatable(&self) -> Option<&dyn Activatable> {
            Some(self)
        }
    }

    impl Activatable for FakeButton {
        fn activate(&self) {
            self.taps.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// A decorative element with no interactive surface.
    struct FakeLabel;

    impl PickerElement for FakeLabel {
        fn as_activatable(&self) -> Option<&dyn Activatable> {
            None
        }
    }

    struct FakePicker {
        children: Vec<Rc<dyn PickerElement>>,
    }

    impl PickerControl for FakePicker {
        fn children(&self) -> Vec<Rc<dyn PickerElement>> {
            self.children.clone()
        }
    }

    /// Host whose container exists but cannot produce the platform control.
    struct BarrenHost;

    impl PickerHost for BarrenHost {
        fn attach_picker(&self, _size: f64) -> Option<Box<dyn PickerControl>> {
            None
        }
    }

    /// Host that hands out a pre-built fake control exactly once.
    struct FakeHost {
        control: RefCell<Option<Box<dyn PickerControl>>>,
        attached_size: RefCell<Option<f64>>,
    }

    impl FakeHost {
        fn with_children(children: Vec<Rc<dyn PickerElement>>) -> Self {
            Self {
                control: RefCell::new(Some(Box::new(FakePicker { children }))),
                attached_size: RefCell::new(None),
            }
        }
    }

    impl PickerHost for FakeHost {
        fn attach_picker(&self, size: f64) -> Option<Box<dyn PickerControl>> {
            *self.attached_size.borrow_mut() = Some(size);
            self.control.borrow_mut().take()
        }
    }

    struct StubSupport(bool);

    impl PlatformSupport for StubSupport {
        fn presents_picker_natively(&self) -> bool {
            self.0
        }
    }

    fn bridge_with(
        children: Vec<Rc<dyn PickerElement>>,
        supported: bool,
    ) -> RoutePickerBridge<StubSupport> {
        let host = FakeHost::with_children(children);
        RoutePickerBridge::setup(Some(&host), StubSupport(supported))
    }

    #[test]
    fn missing_container_leaves_bridge_unattached() {
        let bridge = RoutePickerBridge::setup(None, StubSupport(true));
        assert!(!bridge.is_attached());
        assert_eq!(
            bridge.show_route_picker(),
            MethodReply::Error(AirPlayError::NoPicker)
        );
    }

    #[test]
    fn host_without_platform_control_degrades_to_no_picker() {
        let bridge = RoutePickerBridge::setup(Some(&BarrenHost), StubSupport(true));
        assert!(!bridge.is_attached());
        assert_eq!(
            bridge.show_route_picker(),
            MethodReply::Error(AirPlayError::NoPicker)
        );
    }

    #[test]
    fn no_picker_error_carries_contract_message() {
        let reply = RoutePickerBridge::setup(None, StubSupport(true)).show_route_picker();
        match reply {
            MethodReply::Error(err) => {
                assert_eq!(err.code(), "NO_PICKER");
                assert_eq!(err.to_string(), "Route picker not available");
            }
            other => panic!("Expected NO_PICKER error, got {:?}", other),
        }
    }

    #[test]
    fn setup_requests_fixed_footprint() {
        let host = FakeHost::with_children(vec![]);
        let bridge = RoutePickerBridge::setup(Some(&host), StubSupport(true));
        assert!(bridge.is_attached());
        assert_eq!(*host.attached_size.borrow(), Some(PICKER_SIZE));
    }

    #[test]
    fn clicks_the_internal_button_exactly_once() {
        let taps = TapRecorder::default();
        let bridge = bridge_with(vec![Rc::new(FakeButton { taps: taps.clone() })], false);

        assert_eq!(
            bridge.show_route_picker(),
            MethodReply::Success(serde_json::Value::Null)
        );
        assert_eq!(taps.taps(), 1);
    }

    #[test]
    fn skips_non_interactive_elements_before_the_button() {
        let taps = TapRecorder::default();
        let bridge = bridge_with(
            vec![Rc::new(FakeLabel), Rc::new(FakeButton { taps: taps.clone() })],
            false,
        );

        assert_eq!(
            bridge.show_route_picker(),
            MethodReply::Success(serde_json::Value::Null)
        );
        assert_eq!(taps.taps(), 1);
    }

    #[test]
    fn only_the_first_button_is_clicked() {
        let first = TapRecorder::default();
        let second = TapRecorder::default();
        let bridge = bridge_with(
            vec![
                Rc::new(FakeButton { taps: first.clone() }),
                Rc::new(FakeButton {
                    taps: second.clone(),
                }),
            ],
            false,
        );

        bridge.show_route_picker();
        assert_eq!(first.taps(), 1);
        assert_eq!(second.taps(), 0);
    }

    #[test]
    fn buttonless_control_succeeds_on_supported_platform() {
        let bridge = bridge_with(vec![Rc::new(FakeLabel)], true);
        assert_eq!(
            bridge.show_route_picker(),
            MethodReply::Success(serde_json::Value::Null)
        );
    }

    #[test]
    fn buttonless_control_fails_below_support_threshold() {
        let bridge = bridge_with(vec![Rc::new(FakeLabel)], false);
        match bridge.show_route_picker() {
            MethodReply::Error(err) => {
                assert_eq!(err.code(), "UNSUPPORTED");
                assert_eq!(err.to_string(), "AirPlay picker requires iOS 11+");
            }
            other => panic!("Expected UNSUPPORTED error, got {:?}", other),
        }
    }

    #[test]
    fn repeated_commands_are_independent() {
        let taps = TapRecorder::default();
        let bridge = bridge_with(vec![Rc::new(FakeButton { taps: taps.clone() })], false);

        assert_eq!(
            bridge.show_route_picker(),
            MethodReply::Success(serde_json::Value::Null)
        );
        assert_eq!(
            bridge.show_route_picker(),
            MethodReply::Success(serde_json::Value::Null)
        );
        assert_eq!(taps.taps(), 2);
    }

    #[test]
    fn wire_shapes_match_the_channel_contract() {
        assert_eq!(
            MethodReply::Success(serde_json::Value::Null).to_wire(),
            serde_json::json!({"status": "ok", "value": null})
        );
        assert_eq!(
            MethodReply::Error(AirPlayError::NoPicker).to_wire(),
            serde_json::json!({
                "status": "error",
                "code": "NO_PICKER",
                "message": "Route picker not available",
            })
        );
        assert_eq!(
            MethodReply::Error(AirPlayError::Unsupported).to_wire(),
            serde_json::json!({
                "status": "error",
                "code": "UNSUPPORTED",
                "message": "AirPlay picker requires iOS 11+",
            })
        );
        assert_eq!(
            MethodReply::NotImplemented.to_wire(),
            serde_json::json!({"status": "notImplemented"})
        );
    }
}
