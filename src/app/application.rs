//! Application - App Initialization and Window Management
//!
//! Main entry point for the GPUI application.

use std::sync::Arc;

use gpui::{
    actions, px, App, AppContext, Application, Bounds, SharedString, TitlebarOptions,
    WindowBounds, WindowOptions,
};

use crate::app::workspace::{Workspace, WorkspaceParts};
use crate::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use crate::domain::config::AppConfig;
use crate::error::Result;
use crate::services::{Backend, HttpBackend};

actions!(xcmd, [Quit]);

/// Run the xcmd GUI application
///
/// Fails before any window opens when the backend client or the controllers
/// cannot be built.
pub fn run_app(config: AppConfig) -> Result<()> {
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(config.backend.clone())?);
    tracing::info!(base_uri = %backend.base_uri(), "Backing service configured");
    let parts = WorkspaceParts::build(&config, backend)?;

    Application::new().run(move |cx: &mut App| {
        cx.on_action(|_: &Quit, cx: &mut App| cx.quit());

        // Quit the app when all windows are closed
        cx.on_window_closed(|cx| {
            if cx.windows().is_empty() {
                cx.quit();
            }
        })
        .detach();

        let bounds = Bounds::centered(
            None,
            gpui::size(px(DEFAULT_WINDOW_WIDTH), px(DEFAULT_WINDOW_HEIGHT)),
            cx,
        );
        let window_options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(bounds)),
            titlebar: Some(TitlebarOptions {
                title: Some(SharedString::from("xcmd")),
                appears_transparent: false,
                traffic_light_position: None,
            }),
            ..Default::default()
        };

        let opened = cx.open_window(window_options, |window, cx| {
            cx.new(|cx| Workspace::new(parts, window, cx))
        });
        if let Err(e) = opened {
            tracing::error!("Failed to open window: {}", e);
            cx.quit();
            return;
        }

        cx.activate(true);
    });
    Ok(())
}
