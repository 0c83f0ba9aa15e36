// app.rs
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::*,
    event_loop::ActiveEventLoop,
    keyboard::{Key, NamedKey},
    window::{CursorGrabMode, Window, WindowId},
};

use crate::input::InputState;
use crate::renderer::Renderer;
use crate::scene::Scene;
use crate::settings::RenderSettings;
use crate::time::FrameTimer;

pub struct App {
    renderer: Option<Renderer>,
    window: Option<Window>,
    window_id: Option<WindowId>,
    scene: Scene,
    input: InputState,
    timer: FrameTimer,
    settings: RenderSettings,
}

impl App {
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            renderer: None,
            window: None,
            window_id: None,
            scene: Scene::new(),
            input: InputState::new(),
            timer: FrameTimer::new(),
            settings,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let size = PhysicalSize::new(
                self.settings.resolution.width,
                self.settings.resolution.height,
            );
            let window = event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title("OIT wgpu")
                        .with_inner_size(size),
                )
                .expect("create window");
            let id = window.id();

            let renderer = pollster::block_on(Renderer::new(&window, &self.settings));
            self.scene.setup(&renderer);

            self.window = Some(window);
            self.window_id = Some(id);
            self.renderer = Some(renderer);
            self.timer = FrameTimer::new();

            if let Some(w) = &self.window {
                w.request_redraw();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if Some(id) != self.window_id {
            return;
        }

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                renderer.resize(size);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(w) = &self.window {
                    renderer.resize(w.inner_size());
                }
            }
            WindowEvent::RedrawRequested => {
                let dt = self.timer.tick();
                self.scene.update(dt, &mut self.input, &self.settings);

                match renderer.render(&self.scene) {
                    Ok(stats) => self.timer.record(stats),
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        if let Some(w) = &self.window {
                            renderer.resize(w.inner_size());
                        }
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Surface out of memory");
                        event_loop.exit();
                    }
                    Err(err) => {
                        log::warn!("Surface error: {:?}", err);
                    }
                }

                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Right,
                ..
            } => {
                // Capture the cursor while mouse-look is active
                if let Some(w) = &self.window {
                    let grabbing = state == ElementState::Pressed;
                    let mode = if grabbing {
                        CursorGrabMode::Confined
                    } else {
                        CursorGrabMode::None
                    };
                    if w.set_cursor_grab(mode).is_err() {
                        log::debug!("Cursor grab not supported on this platform");
                    }
                    w.set_cursor_visible(!grabbing);
                }
                let _ = self.input.handle_window_event(&event);
            }
            other => {
                let _ = self.input.handle_window_event(&other);
            }
        }
    }
}
