//! Redline Runtime
//!
//! Opens a window, ticks the probe once per redraw, and prints the exported
//! report when the window closes.
//!
//! Usage: `redline [config.json]`

use std::sync::Arc;

use anyhow::{Context, Result};
use redline_core::{ProbeConfig, ProbeController};
use redline_render::window::{create_event_loop, window_attributes, WindowConfig};
use redline_render::WgpuScene;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow},
    window::{Window, WindowId},
};

struct ProbeApp {
    config: ProbeConfig,
    window_config: WindowConfig,
    window: Option<Arc<Window>>,
    probe: Option<ProbeController<WgpuScene>>,
    failure: Option<anyhow::Error>,
}

impl ProbeApp {
    fn new(config: ProbeConfig) -> Self {
        Self {
            config,
            window_config: WindowConfig {
                title: format!("Redline v{}", redline_core::VERSION),
                ..WindowConfig::default()
            },
            window: None,
            probe: None,
            failure: None,
        }
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = Arc::new(
            event_loop
                .create_window(window_attributes(&self.window_config))
                .context("failed to create window")?,
        );

        let scene = WgpuScene::new(Arc::clone(&window)).context("failed to initialize renderer")?;
        let mut probe = ProbeController::new(self.config.clone(), scene)
            .context("failed to start probe")?;
        probe.on_report(|line| tracing::info!(target: "redline::report", "{line}"));

        self.window = Some(window);
        self.probe = Some(probe);
        Ok(())
    }

    fn abort(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        tracing::error!("{error:#}");
        self.failure = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for ProbeApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.start(event_loop) {
                self.abort(event_loop, e);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, shutting down...");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(probe) = &mut self.probe {
                    probe.scene_mut().resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(probe) = &mut self.probe else {
                    return;
                };
                // Any failed frame ends the session, including Lost, Outdated and
                // Timeout surface errors: a retried frame would skew the window.
                let ticked = probe.tick().map(|_| ());
                if let Err(e) = ticked {
                    let error = anyhow::Error::new(e).context("probe session aborted");
                    self.abort(event_loop, error);
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn load_config() -> Result<ProbeConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!("Loading config from {path}");
            ProbeConfig::load(&path).with_context(|| format!("invalid config file {path}"))
        }
        None => Ok(ProbeConfig::default()),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    tracing::info!("Redline v{}", redline_core::VERSION);
    let config = load_config()?;

    let event_loop = create_event_loop().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ProbeApp::new(config);
    event_loop.run_app(&mut app)?;

    if let Some(probe) = app.probe.take() {
        let report = probe.export_report();
        drop(probe.finish());
        if !report.is_empty() {
            println!("{report}");
        }
    }

    match app.failure {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
