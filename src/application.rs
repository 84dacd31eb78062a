use std::time::{Duration, Instant};

use wgpu::SurfaceError;
use winit::{
    dpi::PhysicalSize,
    event::*,
    event_loop::EventLoop,
    platform::run_return::EventLoopExtRunReturn,
    window::{Window, WindowBuilder},
};

use crate::{
    color::Color,
    config::{Config, ConfigError},
    image_surface::ImageSurface,
    render_loop::{DisplaySurface, RenderLoop},
    renderer::BlitPass,
    scene::Scene,
    texture::Texture,
};

#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no graphics adapter is compatible with the window surface")]
    NoAdapter,
    #[error("failed to open graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface is not supported by the selected adapter")]
    UnsupportedSurface,
}

#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Screen(#[from] ScreenError),
}

/// Opens the window and renders until it is closed. Returns the number of
/// frames drawn.
pub async fn run(config: Config, scene: Scene) -> Result<u64, ApplicationError> {
    config.validate()?;
    let surface = WindowSurface::create(&config).await?;
    let mut render_loop = RenderLoop::new(config, scene, surface)?;
    let frames = render_loop.run();
    tracing::info!(frames, "exiting");
    Ok(frames)
}

/// Fixed frame-rate scheduler.
#[derive(Debug)]
pub struct FramePacer {
    frame_time: Duration,
    next_frame: Instant,
}

impl FramePacer {
    pub fn new(target_fps: u32) -> Self {
        Self::starting_at(target_fps, Instant::now())
    }

    pub fn starting_at(target_fps: u32, start: Instant) -> Self {
        Self {
            frame_time: Duration::from_secs(1) / target_fps.max(1),
            next_frame: start,
        }
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Schedules the next frame slot and returns how long to wait for it.
    /// A late frame restarts the schedule from `now` instead of bursting to
    /// catch up.
    pub fn delay(&mut self, now: Instant) -> Duration {
        self.next_frame += self.frame_time;
        if self.next_frame > now {
            self.next_frame - now
        } else {
            self.next_frame = now;
            Duration::ZERO
        }
    }

    pub fn wait(&mut self) {
        let delay = self.delay(Instant::now());
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Prefers an sRGB surface format so the sRGB framebuffer texture is
/// encoded back on write and colors reach the screen unchanged.
pub fn surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|format| format.is_srgb())
        .or_else(|| formats.first().copied())
}

pub struct Screen {
    pub surface: wgpu::Surface,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    window: Window,
}

impl Screen {
    pub async fn new(window: Window, instance: &wgpu::Instance) -> Result<Self, ScreenError> {
        // SAFETY:
        // The surface needs to live as long as the window that created it.
        // Screen owns the window and drops it after the surface.
        let surface = unsafe { instance.create_surface(&window) }?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(ScreenError::NoAdapter)?;
        tracing::info!(adapter = ?adapter.get_info(), "graphics adapter selected");

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::default(),
                    label: None,
                },
                None,
            )
            .await?;
        let size = window.inner_size();
        let mut config = surface
            .get_default_config(&adapter, size.width, size.height)
            .ok_or(ScreenError::UnsupportedSurface)?;
        let formats = surface.get_capabilities(&adapter).formats;
        if let Some(format) = surface_format(&formats) {
            config.format = format;
        }
        tracing::debug!(format = ?config.format, "surface configured");
        surface.configure(&device, &config);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resize the screen to new window size.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Resize the screen to current window inner size.
    pub fn resize_to_current(&mut self) {
        self.resize(self.window.inner_size());
    }
}

/// Display surface shown in a desktop window.
///
/// Pixels are drawn on the CPU into an [`ImageSurface`]; ending a frame
/// uploads it to a texture, stretches it over the window and waits for the
/// next frame slot.
pub struct WindowSurface {
    // Dropped before the event loop that owns the window.
    screen: Screen,
    event_loop: EventLoop<()>,
    framebuffer: ImageSurface,
    texture: Texture,
    blit: BlitPass,
    pacer: FramePacer,
    clear_color: Color,
    close_requested: bool,
    closed: bool,
}

impl WindowSurface {
    pub async fn create(config: &Config) -> Result<Self, ScreenError> {
        let event_loop = EventLoop::new();
        let window = WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(PhysicalSize::new(
                config.canvas_width,
                config.canvas_height,
            ))
            .with_resizable(false)
            .build(&event_loop)?;

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
        let screen = Screen::new(window, &instance).await?;

        let framebuffer = ImageSurface::new(config.canvas_width, config.canvas_height);
        let texture = Texture::from_image(
            &screen.device,
            &screen.queue,
            framebuffer.image(),
            Some("Framebuffer Texture"),
        );
        let blit = BlitPass::new(&screen.device, screen.config.format, &texture);

        Ok(Self {
            screen,
            event_loop,
            framebuffer,
            texture,
            blit,
            pacer: FramePacer::new(config.target_fps),
            clear_color: config.clear_color,
            close_requested: false,
            closed: false,
        })
    }

    /// Drains pending window events without blocking.
    fn pump_events(&mut self) {
        let window_id = self.screen.window().id();
        let mut close_requested = false;
        let mut resized = None;

        self.event_loop.run_return(|event, _, control_flow| {
            control_flow.set_poll();
            match event {
                Event::WindowEvent {
                    window_id: id,
                    event,
                } if id == window_id => match event {
                    WindowEvent::CloseRequested
                    | WindowEvent::Destroyed
                    | WindowEvent::KeyboardInput {
                        input:
                            KeyboardInput {
                                state: ElementState::Pressed,
                                virtual_keycode: Some(VirtualKeyCode::Escape),
                                ..
                            },
                        ..
                    } => close_requested = true,
                    WindowEvent::Resized(physical_size) => resized = Some(physical_size),
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        resized = Some(*new_inner_size)
                    }
                    _ => {}
                },
                Event::MainEventsCleared => control_flow.set_exit(),
                _ => {}
            }
        });

        if let Some(size) = resized {
            self.screen.resize(size);
        }
        if close_requested {
            tracing::info!("window close requested");
            self.close_requested = true;
        }
    }

    fn present(&mut self) -> Result<(), SurfaceError> {
        self.texture
            .update_data(&self.screen.queue, self.framebuffer.image());

        let output = self.screen.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .screen
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Present Encoder"),
            });
        self.blit.draw(&mut encoder, &view, self.clear_color.into());

        self.screen.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

impl DisplaySurface for WindowSurface {
    fn clear(&mut self, color: Color) {
        self.framebuffer.clear(color);
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.framebuffer.set_pixel(x, y, color);
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: u32, color: Color) {
        self.framebuffer.draw_text(text, x, y, size, color);
    }

    fn begin_frame(&mut self) {
        self.framebuffer.begin_frame();
    }

    fn end_frame(&mut self) {
        self.framebuffer.end_frame();
        match self.present() {
            Ok(_) => {}
            Err(SurfaceError::Lost | SurfaceError::Outdated) => self.screen.resize_to_current(),
            Err(SurfaceError::OutOfMemory) => {
                tracing::error!("surface out of memory, closing");
                self.close_requested = true;
            }
            Err(e) => tracing::error!("{:?}", e),
        }
        self.pacer.wait();
    }

    fn should_close(&mut self) -> bool {
        if !self.closed {
            self.pump_events();
        }
        self.close_requested || self.closed
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.screen.window().set_visible(false);
        self.closed = true;
        tracing::info!(
            frames = self.framebuffer.presented(),
            "display surface released"
        );
    }
}
