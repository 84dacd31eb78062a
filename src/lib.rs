pub mod application;
pub mod camera;
pub mod color;
pub mod config;
pub mod image_surface;
pub mod intersect;
pub mod ray;
pub mod render_loop;
pub mod renderer;
pub mod scene;
pub mod texture;
pub mod tracer;
pub mod viewport;
