use flat_shading_lib::{
    color::Color,
    config::Config,
    image_surface::ImageSurface,
    render_loop::{to_surface, LoopState, RenderLoop},
    scene::{Scene, Sphere},
};
use glam::Vec3;

fn small_config() -> Config {
    Config {
        canvas_width: 60,
        canvas_height: 40,
        ..Config::default()
    }
}

fn render_loop(config: Config, frames: u64) -> RenderLoop<ImageSurface> {
    let surface = ImageSurface::new(config.canvas_width, config.canvas_height).close_after(frames);
    RenderLoop::new(config, Scene::preset().unwrap(), surface).unwrap()
}

#[test]
fn runs_until_close_request() {
    let mut render_loop = render_loop(small_config(), 3);
    assert_eq!(render_loop.state(), LoopState::Running);

    assert_eq!(render_loop.run(), 3);
    assert_eq!(render_loop.state(), LoopState::Terminated);

    let surface = render_loop.into_surface();
    assert_eq!(surface.presented(), 3);
    assert!(surface.is_closed());
    assert!(!surface.in_frame());
}

#[test]
fn frame_matches_per_pixel_trace() {
    let config = Config {
        caption: flat_shading_lib::config::Caption {
            text: String::new(),
            ..Config::default().caption
        },
        ..small_config()
    };
    let mut render_loop = render_loop(config, 1);
    render_loop.step();

    for y in -20..20 {
        for x in -30..30 {
            let (sx, sy) = to_surface(x, y, 60, 40);
            assert_eq!(
                render_loop.surface().pixel(sx as u32, sy as u32),
                render_loop.trace_pixel(x, y),
                "pixel ({x}, {y})"
            );
        }
    }
}

#[test]
fn canvas_center_lands_at_flipped_position() {
    let config = Config::default();
    let mut render_loop = render_loop(config, 1);
    render_loop.step();

    // The straight-ahead ray grazes the top of the red sphere.
    assert_eq!(render_loop.trace_pixel(0, 0), Color::RED);
    assert_eq!(render_loop.surface().pixel(300, 299), Color::RED);
    assert_eq!(render_loop.surface().pixel(599, 0), Color::RAYWHITE);
    let (sx, sy) = to_surface(0, -100, 600, 600);
    assert_eq!((sx, sy), (300, 399));
    assert_eq!(render_loop.surface().pixel(300, 399), Color::RED);
}

#[test]
fn caption_is_drawn_over_the_scene() {
    let mut render_loop = render_loop(Config::default(), 1);
    render_loop.step();

    let image = render_loop.surface().image();
    let caption_pixels = image
        .enumerate_pixels()
        .filter(|(x, y, _)| *x < 300 && *y < 40)
        .filter(|(_, _, p)| Color::from(**p) == Color::GRAY)
        .count();
    assert!(caption_pixels > 0);
}

#[test]
fn consecutive_frames_are_identical() {
    let mut render_loop = render_loop(small_config(), 2);
    render_loop.step();
    let first = render_loop.surface().image().clone();
    render_loop.step();
    assert_eq!(&first, render_loop.surface().image());
}

#[test]
fn equal_distance_tie_prefers_earlier_sphere() {
    let center = Vec3::new(0.0, 0.0, 4.0);
    let scene = Scene::new(vec![
        Sphere::new(center, 1.5, Color::GREEN).unwrap(),
        Sphere::new(center, 1.5, Color::BLUE).unwrap(),
    ]);
    let config = small_config();
    let surface = ImageSurface::new(config.canvas_width, config.canvas_height);
    let render_loop = RenderLoop::new(config, scene, surface).unwrap();
    assert_eq!(render_loop.trace_pixel(0, 0), Color::GREEN);
}
