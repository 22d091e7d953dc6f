//! macOS-specific helpers: the AVKit route picker host and AppKit quirks.

use std::rc::Rc;

use cocoa::appkit::{NSApp, NSApplication, NSMenu};
use cocoa::base::{id, nil, BOOL, YES};
use cocoa::foundation::{NSOperatingSystemVersion, NSPoint, NSProcessInfo, NSRect, NSSize};
use objc::runtime::Class;
use objc::{class, msg_send, sel, sel_impl};
use tao::platform::macos::WindowExtMacOS;
use tao::window::Window;

use crate::app::airplay::{Activatable, PickerControl, PickerElement, PickerHost};

// AVRoutePickerView lives in AVKit; linking it registers the class with the
// Objective-C runtime.
#[link(name = "AVKit", kind = "framework")]
extern "C" {}

/// Ensure that a main menu exists before creating the WebView.
///
/// wry (0.37) installs a parent NSView that forwards `keyDown:` to
/// `NSApp.mainMenu.performKeyEquivalent(_)`; with no main menu installed,
/// WebKit dereferences nil. An empty menu is enough to close that path.
pub fn ensure_main_menu() {
    unsafe {
        let app = NSApp();
        let current: id = app.mainMenu();
        if current == nil {
            let menubar: id = NSMenu::new(nil);
            app.setMainMenu_(menubar);
        }
    }
}

/// `true` when the running OS is at or above `(major, minor)`.
pub fn os_at_least((major, minor): (i64, i64)) -> bool {
    let version: NSOperatingSystemVersion =
        unsafe { NSProcessInfo::processInfo(nil).operatingSystemVersion() };
    (version.majorVersion as i64, version.minorVersion as i64) >= (major, minor)
}

/// The window's content view, acting as host for the hidden picker control.
pub struct ContentViewHost {
    content_view: id,
}

impl ContentViewHost {
    /// `None` when the window has no usable content view.
    pub fn from_window(window: &Window) -> Option<Self> {
        let view = window.ns_view() as id;
        if view == nil {
            return None;
        }
        Some(Self { content_view: view })
    }
}

impl PickerHost for ContentViewHost {
    fn attach_picker(&self, size: f64) -> Option<Box<dyn PickerControl>> {
        // The class is only registered when AVKit is present; its absence
        // means this system has no native picker at all.
        let picker_class = Class::get("AVRoutePickerView")?;
        unsafe {
            let frame = NSRect::new(NSPoint::new(0.0, 0.0), NSSize::new(size, size));
            let view: id = msg_send![picker_class, alloc];
            let view: id = msg_send![view, initWithFrame: frame];
            if view == nil {
                return None;
            }
            let _: () = msg_send![view, setHidden: YES];
            // The desktop control only grew tinting in later SDKs; apply the
            // fixed white tint where it is available.
            let tintable: BOOL = msg_send![view, respondsToSelector: sel!(setContentTintColor:)];
            if tintable == YES {
                let white: id = msg_send![class!(NSColor), whiteColor];
                let _: () = msg_send![view, setContentTintColor: white];
            }
            let _: () = msg_send![self.content_view, addSubview: view];
            Some(Box::new(NativePicker { view }))
        }
    }
}

/// The attached `AVRoutePickerView`.
///
/// Held for the lifetime of the window; AppKit tears the view down together
/// with its superview, so no explicit release happens here.
struct NativePicker {
    view: id,
}

impl PickerControl for NativePicker {
    fn children(&self) -> Vec<Rc<dyn PickerElement>> {
        unsafe {
            let subviews: id = msg_send![self.view, subviews];
            let count: usize = msg_send![subviews, count];
            (0..count)
                .map(|index| {
                    let view: id = msg_send![subviews, objectAtIndex: index];
                    Rc::new(NativeElement { view }) as Rc<dyn PickerElement>
                })
                .collect()
        }
    }
}

/// One immediate subview of the picker control.
struct NativeElement {
    view: id,
}

impl PickerElement for NativeElement {
    fn as_activatable(&self) -> Option<&dyn Activatable> {
        let is_button: BOOL = unsafe { msg_send![self.view, isKindOfClass: class!(NSButton)] };
        if is_button == YES {
            Some(self)
        } else {
            None
        }
    }
}

impl Activatable for NativeElement {
    fn activate(&self) {
        // Equivalent to the user clicking the control's internal button.
        let _: () = unsafe { msg_send![self.view, performClick: nil] };
    }
}
