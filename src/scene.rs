//! Scene builder and windowed viewer.

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    window::{Window, WindowId},
};

use crate::composer::SceneComposer;
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::gpu::{Camera, GpuState};
use crate::spawn::SpawnContext;

/// The particle tree scene.
///
/// Use method chaining to configure, then call `.run()` to open the window.
///
/// ```ignore
/// TreeScene::new().with_seed(2024).formed(true).run()?;
/// ```
pub struct TreeScene {
    config: SceneConfig,
}

impl TreeScene {
    /// Scene with default settings.
    pub fn new() -> Self {
        Self {
            config: SceneConfig::default(),
        }
    }

    /// Replace all settings.
    pub fn with_config(mut self, config: SceneConfig) -> Self {
        self.config = config;
        self
    }

    /// Fix the attribute generation seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Whether the scene starts heading toward the assembled tree.
    pub fn formed(mut self, formed: bool) -> Self {
        self.config.morph.start_formed = formed;
        self
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Build the composer this scene would run.
    pub fn compose(&self) -> SceneComposer {
        let ctx = match self.config.seed {
            Some(seed) => SpawnContext::seeded(seed),
            None => SpawnContext::from_time(),
        };
        SceneComposer::new(&self.config, ctx)
    }

    /// Open the window and run until it is closed.
    pub fn run(self) -> Result<(), SceneError> {
        let composer = self.compose();

        let event_loop = EventLoop::new()?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = App::new(self.config, composer);
        event_loop.run_app(&mut app)?;
        match app.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Default for TreeScene {
    fn default() -> Self {
        Self::new()
    }
}

/// Title text shown while the scene heads toward `formed`.
pub fn action_hint(formed: bool) -> &'static str {
    if formed {
        "Scatter Elements"
    } else {
        "Assemble Tree"
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    composer: SceneComposer,
    camera: Camera,
    config: SceneConfig,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
    title: String,
    error: Option<SceneError>,
}

impl App {
    fn new(config: SceneConfig, composer: SceneComposer) -> Self {
        Self {
            window: None,
            gpu_state: None,
            composer,
            camera: Camera::new(&config.camera),
            config,
            mouse_pressed: false,
            last_mouse_pos: None,
            title: String::new(),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: SceneError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn update_title(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let title = format!(
            "{} | {:.0} fps | [Space] {}",
            self.config.window.title,
            self.composer.clock().fps(),
            action_hint(self.composer.is_formed())
        );
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let window_attrs = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, e.into()),
        };
        self.window = Some(window.clone());

        match pollster::block_on(GpuState::new(window, &self.composer, self.config.render.background)) {
            Ok(gpu_state) => self.gpu_state = Some(gpu_state),
            Err(e) => return self.fail(event_loop, e.into()),
        }
        log::info!("scene started, {}", action_hint(self.composer.is_formed()).to_lowercase());
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match logical_key {
                Key::Named(NamedKey::Space) | Key::Named(NamedKey::Enter) => {
                    self.composer.toggle();
                }
                Key::Named(NamedKey::Escape) => event_loop.exit(),
                _ => {}
            },
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let Some((last_x, last_y)) = self.last_mouse_pos {
                        let dx = position.x - last_x;
                        let dy = position.y - last_y;
                        self.camera.orbit(dx as f32, dy as f32);
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                self.camera.zoom(scroll);
            }
            WindowEvent::RedrawRequested => {
                let frame = self.composer.frame();
                if frame.formed && !self.mouse_pressed {
                    self.camera.auto_rotate(frame.delta);
                }

                let pixel_ratio = self
                    .window
                    .as_ref()
                    .map(|w| self.config.render.pixel_ratio(w.scale_factor()))
                    .unwrap_or(1.0);

                if let Some(gpu_state) = &mut self.gpu_state {
                    match gpu_state.render(&self.composer, &self.camera, pixel_ratio) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            log::warn!("surface lost, reconfiguring");
                            gpu_state.resize(winit::dpi::PhysicalSize {
                                width: gpu_state.config.width,
                                height: gpu_state.config.height,
                            })
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("GPU out of memory");
                            event_loop.exit();
                        }
                        Err(e) => log::error!("render error: {:?}", e),
                    }
                }

                self.update_title();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
