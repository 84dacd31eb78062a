use std::{
    ops::{Deref, DerefMut},
    time::Instant,
};

use rayon::prelude::*;

use crate::{
    camera::Camera,
    color::Color,
    config::{Config, ConfigError},
    ray::Interval,
    scene::Scene,
    tracer::Tracer,
    viewport::Viewport,
};

/// Output side of the renderer: a pixel target that can present frames and
/// report when the user wants to quit.
pub trait DisplaySurface {
    fn clear(&mut self, color: Color);
    /// Writes one pixel in top-left origin coordinates. Writes outside the
    /// surface are dropped.
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);
    fn draw_text(&mut self, text: &str, x: i32, y: i32, size: u32, color: Color);
    fn begin_frame(&mut self);
    fn end_frame(&mut self);
    fn should_close(&mut self) -> bool;
    fn close(&mut self);
}

/// Drawing scope for one frame. Ends the frame when dropped, including
/// during unwinding.
pub struct Frame<'a, S: DisplaySurface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: DisplaySurface + ?Sized> Frame<'a, S> {
    pub fn begin(surface: &'a mut S) -> Self {
        surface.begin_frame();
        Self { surface }
    }
}

impl<S: DisplaySurface + ?Sized> Deref for Frame<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: DisplaySurface + ?Sized> DerefMut for Frame<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: DisplaySurface + ?Sized> Drop for Frame<'_, S> {
    fn drop(&mut self) {
        self.surface.end_frame();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Terminated,
}

/// Moves centered canvas coordinates (y up) to top-left surface
/// coordinates (y down).
pub fn to_surface(x: i32, y: i32, width: u32, height: u32) -> (i32, i32) {
    (width as i32 / 2 + x, height as i32 / 2 - y - 1)
}

/// Everything one pixel trace reads. Holds no reference to the surface so
/// rows can be traced from worker threads.
struct Sweep<'s> {
    camera: Camera,
    viewport: Viewport,
    tracer: Tracer<'s>,
    window: Interval,
}

impl Sweep<'_> {
    fn color(&self, x: i32, y: i32) -> Color {
        let ray = self.camera.ray(self.viewport.direction(x, y));
        self.tracer.trace(&ray, self.window)
    }
}

pub struct RenderLoop<S: DisplaySurface> {
    config: Config,
    scene: Scene,
    camera: Camera,
    viewport: Viewport,
    surface: S,
    state: LoopState,
    frames: u64,
}

impl<S: DisplaySurface> RenderLoop<S> {
    pub fn new(config: Config, scene: Scene, surface: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            camera: Camera::new(config.camera_position),
            viewport: Viewport::new(&config),
            config,
            scene,
            surface,
            state: LoopState::Running,
            frames: 0,
        })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn sweep(&self) -> Sweep<'_> {
        Sweep {
            camera: self.camera,
            viewport: self.viewport,
            tracer: Tracer::new(&self.scene, self.config.background),
            window: Interval::new(self.config.t_min, self.config.t_max),
        }
    }

    /// Color of canvas pixel `(x, y)` in centered coordinates.
    pub fn trace_pixel(&self, x: i32, y: i32) -> Color {
        self.sweep().color(x, y)
    }

    /// Traces the whole canvas into a row-major buffer in surface order.
    ///
    /// Rows are independent and traced in parallel.
    pub fn trace_canvas(&self) -> Vec<Color> {
        let width = self.config.canvas_width as usize;
        let height = self.config.canvas_height as usize;
        let (half_w, half_h) = (self.config.half_width(), self.config.half_height());
        let sweep = self.sweep();

        let mut pixels = vec![self.config.background; width * height];
        pixels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, line)| {
                // Inverse of `to_surface` for the y axis.
                let y = half_h - 1 - row as i32;
                for (column, pixel) in line.iter_mut().enumerate() {
                    *pixel = sweep.color(column as i32 - half_w, y);
                }
            });
        pixels
    }

    /// Draws one complete frame: clear, pixel sweep, caption.
    pub fn render_frame(&mut self) {
        let started = Instant::now();
        let pixels = self.trace_canvas();
        let traced = started.elapsed();

        let config = &self.config;
        let (half_w, half_h) = (config.half_width(), config.half_height());
        let mut frame = Frame::begin(&mut self.surface);
        frame.clear(config.clear_color);

        for y in -half_h..half_h {
            for x in -half_w..half_w {
                let (sx, sy) = to_surface(x, y, config.canvas_width, config.canvas_height);
                let color = pixels[sy as usize * config.canvas_width as usize + sx as usize];
                frame.set_pixel(sx, sy, color);
            }
        }

        let caption = &config.caption;
        frame.draw_text(
            &caption.text,
            caption.x,
            caption.y,
            caption.size,
            caption.color,
        );
        drop(frame);

        self.frames += 1;
        tracing::debug!(
            frame = self.frames,
            trace_ms = traced.as_secs_f64() * 1000.0,
            total_ms = started.elapsed().as_secs_f64() * 1000.0,
            "frame rendered"
        );
    }

    /// Advances the loop by one frame boundary.
    pub fn step(&mut self) -> LoopState {
        if self.state == LoopState::Terminated {
            return self.state;
        }

        if self.surface.should_close() {
            tracing::info!(frames = self.frames, "close requested, terminating");
            self.state = LoopState::Terminated;
            self.surface.close();
            return self.state;
        }

        self.render_frame();
        self.state
    }

    /// Renders frames until the surface asks to close. Returns the number of
    /// frames drawn.
    pub fn run(&mut self) -> u64 {
        tracing::info!(
            width = self.config.canvas_width,
            height = self.config.canvas_height,
            spheres = self.scene.len(),
            "render loop started"
        );
        while self.step() == LoopState::Running {}
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
        close_requested: bool,
    }

    impl DisplaySurface for Recorder {
        fn clear(&mut self, _color: Color) {
            self.calls.push("clear");
        }
        fn set_pixel(&mut self, _x: i32, _y: i32, _color: Color) {}
        fn draw_text(&mut self, _text: &str, _x: i32, _y: i32, _size: u32, _color: Color) {
            self.calls.push("text");
        }
        fn begin_frame(&mut self) {
            self.calls.push("begin");
        }
        fn end_frame(&mut self) {
            self.calls.push("end");
        }
        fn should_close(&mut self) -> bool {
            self.close_requested
        }
        fn close(&mut self) {
            self.calls.push("close");
        }
    }

    fn small_config() -> Config {
        Config {
            canvas_width: 8,
            canvas_height: 6,
            ..Config::default()
        }
    }

    #[test]
    fn origin_pixel_lands_below_surface_center() {
        assert_eq!(to_surface(0, 0, 600, 600), (300, 299));
        assert_eq!(to_surface(-300, 299, 600, 600), (0, 0));
        assert_eq!(to_surface(299, -300, 600, 600), (599, 599));
    }

    #[test]
    fn frame_guard_ends_frame_on_unwind() {
        let mut recorder = Recorder::default();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _frame = Frame::begin(&mut recorder);
            panic!("sweep interrupted");
        }));
        assert!(result.is_err());
        assert_eq!(recorder.calls, vec!["begin", "end"]);
    }

    #[test]
    fn frame_calls_are_ordered() {
        let mut render_loop =
            RenderLoop::new(small_config(), Scene::preset().unwrap(), Recorder::default())
                .unwrap();
        assert_eq!(render_loop.step(), LoopState::Running);
        assert_eq!(render_loop.surface().calls, vec!["begin", "clear", "text", "end"]);
    }

    #[test]
    fn close_request_terminates_once() {
        let mut render_loop =
            RenderLoop::new(small_config(), Scene::preset().unwrap(), Recorder::default())
                .unwrap();
        render_loop.surface.close_requested = true;

        assert_eq!(render_loop.step(), LoopState::Terminated);
        assert_eq!(render_loop.step(), LoopState::Terminated);
        assert_eq!(render_loop.frames(), 0);
        assert_eq!(render_loop.surface().calls, vec!["close"]);
    }

    #[test]
    fn rejects_invalid_config() {
        let config = Config {
            canvas_height: 0,
            ..Config::default()
        };
        assert!(RenderLoop::new(config, Scene::preset().unwrap(), Recorder::default()).is_err());
    }

    #[test]
    fn parallel_sweep_matches_per_pixel_trace() {
        let render_loop =
            RenderLoop::new(small_config(), Scene::preset().unwrap(), Recorder::default())
                .unwrap();
        let pixels = render_loop.trace_canvas();
        for y in -3..3 {
            for x in -4..4 {
                let (sx, sy) = to_surface(x, y, 8, 6);
                assert_eq!(pixels[(sy * 8 + sx) as usize], render_loop.trace_pixel(x, y));
            }
        }
    }

    #[test]
    fn per_pixel_trace_is_deterministic() {
        let render_loop = RenderLoop::new(
            Config::default(),
            Scene::preset().unwrap(),
            Recorder::default(),
        )
        .unwrap();
        for (x, y) in [(0, 0), (0, -100), (-150, 10), (299, 299)] {
            assert_eq!(render_loop.trace_pixel(x, y), render_loop.trace_pixel(x, y));
        }
        assert_eq!(render_loop.trace_pixel(0, -100), Color::RED);
        assert_eq!(render_loop.trace_pixel(299, 299), Color::RAYWHITE);
    }
}
