use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use log::{debug, error, info};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use spaceport::cli::Cli;
use spaceport::config::Config;
use spaceport::core::{
    Button, Clock, Controller, FpsCounter, InputEvent, WindowContext, WindowRequest,
    WinitController,
};
use spaceport::frame::Orchestrator;
use spaceport::renderer::{FrameStats, Renderer};

struct App {
    config: Config,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    orchestrator: Orchestrator,
    controller: WinitController,
    clock: Clock,
    fps: FpsCounter,
    failure: Option<anyhow::Error>,
}

impl App {
    fn new(config: Config) -> Self {
        let orchestrator = Orchestrator::from_config(&config);
        Self {
            config,
            window: None,
            renderer: None,
            orchestrator,
            controller: WinitController::new(),
            clock: Clock::new(),
            fps: FpsCounter::new(),
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        error!("{:#}", err);
        self.failure = Some(err);
        event_loop.exit();
    }

    fn apply_requests(&self, event_loop: &ActiveEventLoop, requests: Vec<WindowRequest>) {
        for request in requests {
            match request {
                WindowRequest::Close => {
                    info!("Close requested");
                    event_loop.exit();
                }
                WindowRequest::SetCursor(mode) => {
                    if let Some(window) = &self.window {
                        window.set_cursor_mode(mode);
                    }
                }
            }
        }
    }

    fn handle_input(&mut self, event_loop: &ActiveEventLoop, event: &WindowEvent) {
        let Some(input) = self.controller.process_event(event) else {
            return;
        };

        let requests = match input {
            InputEvent::Key { button, action } => {
                let shift_held = self.controller.is_down(Button::Shift);
                self.orchestrator.handle_key(button, action, shift_held)
            }
            InputEvent::CursorMoved { x, y } => {
                self.orchestrator.handle_cursor_moved(x, y);
                Vec::new()
            }
            InputEvent::MouseButton { button, action } => {
                self.orchestrator.handle_mouse_button(button, action)
            }
        };
        self.apply_requests(event_loop, requests);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(renderer)) = (&self.window, &mut self.renderer) else {
            return;
        };

        let dims = window.dimensions();
        if dims.is_empty() {
            // Minimized: hold the clock so the scene does not jump on restore
            self.clock.reset();
            return;
        }

        let delta = self.clock.tick();
        if let Some(fps) = self.fps.update(delta) {
            info!("FPS: {:.1}", fps);
        }

        let started = Instant::now();
        self.orchestrator.update(delta);
        renderer.set_stats(FrameStats {
            fps: self.fps.fps(),
            frame_ms: delta * 1000.0,
        });
        let rendered = self.orchestrator.render(renderer, dims.width, dims.height);

        if self.config.benchmark {
            debug!(
                "Frame {}: frame time {:.3} ms, update+render {:.3} ms",
                self.clock.frames(),
                delta * 1000.0,
                started.elapsed().as_secs_f32() * 1000.0
            );
        }

        if let Err(e) = rendered {
            self.fail(event_loop, e.context("Render error"));
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(attributes) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                let err = anyhow::Error::new(e).context("Failed to create window");
                self.fail(event_loop, err);
                return;
            }
        };

        let renderer = match pollster::block_on(Renderer::new(
            window.clone(),
            self.config.clear_color,
            self.config.show_ui,
        )) {
            Ok(r) => r,
            Err(e) => {
                self.fail(event_loop, e.context("Failed to initialize renderer"));
                return;
            }
        };

        self.clock.reset();
        self.window = Some(window);
        self.renderer = Some(renderer);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(renderer) = &mut self.renderer {
            // The overlay is display-only, so input always reaches the scene
            renderer.handle_event(&event);
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::CursorMoved { .. } => self.handle_input(event_loop, &event),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            WindowContext::request_redraw(window.as_ref());
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = Config::resolve(&cli)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = App::new(config);

    info!("Spaceport - WASDQE move, Shift/Ctrl speed, right mouse to look");
    info!("F launch, R reset, C/Shift+C cameras, V split screen, Escape quit");
    event_loop.run_app(&mut app)?;

    match app.failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
