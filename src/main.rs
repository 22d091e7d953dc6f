use ghostmusic_shell::app;
use ghostmusic_shell::app::state::AppState;
use ghostmusic_shell::config;
use ghostmusic_shell::platform;
use ghostmusic_shell::web_assets;
use std::sync::{Arc, Mutex};
use tao::{
    event::{Event, StartCause, WindowEvent},
    event_loop::{ControlFlow, EventLoopBuilder},
    window::WindowBuilder,
};
use wry::WebViewBuilder;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Create the event loop and window
    let event_loop = EventLoopBuilder::<app::events::UserEvent>::with_user_event().build();

    let initial_config = AppState::default().config;
    let (width, height) = initial_config.window_size;
    let (pos_x, pos_y) = initial_config.window_position;

    let window = WindowBuilder::new()
        .with_title("Ghost Music")
        .with_inner_size(tao::dpi::LogicalSize::new(width, height))
        .with_position(tao::dpi::LogicalPosition::new(pos_x, pos_y))
        .with_min_inner_size(tao::dpi::LogicalSize::new(480, 320))
        .build(&event_loop)
        .expect("Failed to build Window");

    let window = Arc::new(window);

    // WebKit needs a main menu in place before the WebView exists.
    #[cfg(target_os = "macos")]
    platform::macos::ensure_main_menu();

    // Shared shell state and the event loop proxy
    let state = Arc::new(Mutex::new(AppState::new(initial_config)));
    let proxy = event_loop.create_proxy();

    // One-time bridge setup: must run after the window's content view
    // exists and before the first channel command can arrive. The bridge is
    // owned by the IPC handler for the rest of the session.
    let bridge = platform::setup_airplay_bridge(&window);

    let ipc_proxy = proxy.clone();
    let ipc_handler = move |message: String| {
        app::handle_ipc_message(message, &bridge, ipc_proxy.clone());
    };

    let webview = WebViewBuilder::new(&*window)
        .with_custom_protocol("ghost".to_string(), web_assets::response)
        .with_url("ghost://localhost/")
        .with_ipc_handler(ipc_handler)
        .with_devtools(cfg!(debug_assertions))
        .build()
        .expect("Failed to build WebView");

    let state_for_events = state.clone();
    let window_for_events = window.clone();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::NewEvents(StartCause::Init) => {
                tracing::info!("Ghost Music shell initialized.");
            }
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    tracing::info!("Close requested. Saving final window state...");
                    let mut state_guard = state_for_events.lock().unwrap();
                    let size = window_for_events.inner_size();
                    let position = window_for_events.outer_position().unwrap_or_default();
                    state_guard.config.window_size = (size.width.into(), size.height.into());
                    state_guard.config.window_position = (position.x.into(), position.y.into());

                    if let Err(e) = config::settings::save_config(&state_guard.config, None) {
                        tracing::error!("Failed to save config on exit: {}", e);
                    }
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    let mut state_guard = state_for_events.lock().unwrap();
                    state_guard.config.window_size = (size.width.into(), size.height.into());
                }
                WindowEvent::Moved(position) => {
                    let mut state_guard = state_for_events.lock().unwrap();
                    state_guard.config.window_position = (position.x.into(), position.y.into());
                }
                _ => (),
            },
            Event::UserEvent(user_event) => {
                app::handle_user_event(user_event, &webview);
            }
            _ => (),
        }
    });
}
