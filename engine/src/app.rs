use std::error::Error;
use std::time::{Duration, Instant};

use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, MouseButton, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::graphics::Renderer2d;
use crate::pixels_renderer::PixelsRenderer2d;
use crate::surface::SurfaceSize;

pub struct AppConfig {
    pub title: String,
    pub desired_size: PhysicalSize<u32>,
    pub clamp_to_monitor: bool,
    pub vsync: Option<bool>,
}

pub struct AppContext {
    pub window: Window,
    pub renderer: PixelsRenderer2d,
    pub surface_size: SurfaceSize,
}

/// Input gathered between two redraws.
///
/// `mouse_down` / `mouse_up` are edge flags for the left button and are cleared after every
/// frame; `mouse_held` is level-triggered.
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    pub mouse_pos: Option<(u32, u32)>,
    pub mouse_down: bool,
    pub mouse_up: bool,
    pub mouse_held: bool,
    pub keys_pressed: Vec<VirtualKeyCode>,
}

impl InputFrame {
    pub fn key_pressed(&self, key: VirtualKeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    fn end_frame(&mut self) {
        self.mouse_down = false;
        self.mouse_up = false;
        self.keys_pressed.clear();
    }
}

pub trait GameApp {
    type State;
    type Effect;

    fn init_state(&mut self, ctx: &mut AppContext) -> Self::State;

    /// One frame of game logic. Runs before rendering; returned effects are handed to
    /// `handle_effects` after the frame is presented.
    fn update_state(
        &mut self,
        state: &mut Self::State,
        input: &InputFrame,
        dt: Duration,
        ctx: &mut AppContext,
    ) -> Vec<Self::Effect>;

    fn render(&mut self, state: &Self::State, renderer: &mut dyn Renderer2d);

    fn handle_effects(&mut self, _effects: Vec<Self::Effect>, _ctx: &mut AppContext) {}
}

fn build_window(config: &AppConfig, event_loop: &EventLoop<()>) -> Result<Window, Box<dyn Error>> {
    let monitor_size = if config.clamp_to_monitor {
        event_loop.primary_monitor().map(|m| m.size())
    } else {
        None
    };
    let initial_size = if let Some(monitor) = monitor_size {
        PhysicalSize::new(
            config.desired_size.width.min(monitor.width),
            config.desired_size.height.min(monitor.height),
        )
    } else {
        config.desired_size
    };
    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(initial_size)
        .build(event_loop)?;
    Ok(window)
}

pub fn run_game<G>(config: AppConfig, mut game: G) -> Result<(), Box<dyn Error>>
where
    G: GameApp + 'static,
    G::State: 'static,
{
    let event_loop = EventLoop::new();
    let window = build_window(&config, &event_loop)?;

    let window_size = window.inner_size();
    let surface_size = SurfaceSize::new(window_size.width.max(1), window_size.height.max(1));

    let pixels: Pixels = {
        let surface_texture = SurfaceTexture::new(surface_size.width, surface_size.height, &window);
        let mut builder =
            PixelsBuilder::new(surface_size.width, surface_size.height, surface_texture);
        if let Some(vsync) = config.vsync {
            builder = builder.enable_vsync(vsync);
        }
        builder.build()?
    };

    let renderer = PixelsRenderer2d::new(pixels, surface_size)?;

    let mut ctx = AppContext {
        window,
        renderer,
        surface_size,
    };
    let mut state = game.init_state(&mut ctx);
    let mut input = InputFrame::default();
    let mut last_frame = Instant::now();

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    let new_size = SurfaceSize::new(size.width, size.height);
                    if let Err(err) = ctx.renderer.resize(new_size) {
                        eprintln!("resize failed: {err}");
                    }
                    ctx.surface_size = ctx.renderer.size();
                    ctx.window.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let new_x = position.x.max(0.0) as u32;
                    let new_y = position.y.max(0.0) as u32;
                    input.mouse_pos = Some((new_x, new_y));
                }
                WindowEvent::CursorLeft { .. } => {
                    input.mouse_pos = None;
                }
                WindowEvent::MouseInput {
                    state: mouse_state,
                    button: MouseButton::Left,
                    ..
                } => match mouse_state {
                    ElementState::Pressed => {
                        input.mouse_down = true;
                        input.mouse_held = true;
                    }
                    ElementState::Released => {
                        input.mouse_up = true;
                        input.mouse_held = false;
                    }
                },
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => {
                    if *key == VirtualKeyCode::Escape {
                        *control_flow = ControlFlow::Exit;
                    } else {
                        input.keys_pressed.push(*key);
                    }
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                let effects = game.update_state(&mut state, &input, dt, &mut ctx);

                ctx.renderer.draw_frame(|gfx| {
                    game.render(&state, gfx);
                });
                if let Err(err) = ctx.renderer.present() {
                    eprintln!("present failed: {err}");
                }

                game.handle_effects(effects, &mut ctx);
                input.end_frame();
            }
            Event::MainEventsCleared => {
                ctx.window.request_redraw();
            }
            _ => {}
        }
    });
}
