use std::error::Error;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Fullscreen, WindowBuilder};

pub use winit::event::VirtualKeyCode;

use crate::graphics::{Renderer2d, SurfaceSize};
use crate::pixels_renderer::PixelsPresenter;

pub struct AppConfig {
    pub title: String,
    pub desired_size: PhysicalSize<u32>,
    pub fullscreen: bool,
    /// Fixed update/render rate in ticks per second.
    pub tick_rate: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            desired_size: PhysicalSize::new(1280, 720),
            fullscreen: false,
            tick_rate: 30,
        }
    }
}

/// Raw input delivered to the game, already reduced to what it consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    PointerDown { x: u32, y: u32 },
    KeyDown(VirtualKeyCode),
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// One update + one render per tick. Pending input events are drained and
/// handed to `update` in arrival order before `render` runs.
pub trait GameApp {
    fn update(&mut self, events: &[AppEvent], now: Instant, size: SurfaceSize) -> AppControl;
    fn render(&mut self, gfx: &mut dyn Renderer2d);
}

pub fn run_game<G: GameApp + 'static>(config: AppConfig, mut game: G) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(config.desired_size)
        .build(&event_loop)?;
    if config.fullscreen {
        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
    }

    let window_size = window.inner_size();
    let mut surface_size = SurfaceSize::new(window_size.width.max(1), window_size.height.max(1));
    let surface_texture = SurfaceTexture::new(surface_size.width, surface_size.height, &window);
    let pixels = Pixels::new(surface_size.width, surface_size.height, surface_texture)?;
    let mut presenter = PixelsPresenter::new(pixels, surface_size)?;

    let tick = Duration::from_secs_f64(1.0 / config.tick_rate.max(1) as f64);
    let mut next_tick = Instant::now();
    let mut pending: Vec<AppEvent> = Vec::new();
    let mut cursor = (0u32, 0u32);

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    surface_size = SurfaceSize::new(size.width.max(1), size.height.max(1));
                    if let Err(err) = presenter.resize(surface_size) {
                        eprintln!("resize failed: {err}");
                    }
                    window.request_redraw();
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = (position.x.max(0.0) as u32, position.y.max(0.0) as u32);
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button: MouseButton::Left,
                    ..
                } => {
                    pending.push(AppEvent::PointerDown {
                        x: cursor.0,
                        y: cursor.1,
                    });
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => {
                    pending.push(AppEvent::KeyDown(key));
                }
                WindowEvent::ReceivedCharacter(ch) => {
                    pending.push(AppEvent::Char(ch));
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                let now = Instant::now();
                if now >= next_tick {
                    next_tick = now + tick;
                    window.request_redraw();
                }
            }
            Event::RedrawRequested(_) => {
                let events = std::mem::take(&mut pending);
                if game.update(&events, Instant::now(), surface_size) == AppControl::Exit {
                    *control_flow = ControlFlow::Exit;
                    return;
                }
                presenter.draw_frame(|gfx| game.render(gfx));
                if let Err(err) = presenter.present() {
                    eprintln!("present failed: {err}");
                }
            }
            _ => {}
        }
    });

    #[allow(unreachable_code)]
    Ok(())
}
