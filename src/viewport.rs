use glam::Vec3;

use crate::config::Config;

/// Maps centered canvas pixels onto the projection plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    canvas_width: f32,
    canvas_height: f32,
    width: f32,
    height: f32,
    distance: f32,
}

impl Viewport {
    pub fn new(config: &Config) -> Self {
        Self {
            canvas_width: config.canvas_width as f32,
            canvas_height: config.canvas_height as f32,
            width: config.viewport_width,
            height: config.viewport_height,
            distance: config.projection_distance,
        }
    }

    /// Ray direction through canvas pixel `(x, y)`, where `(0, 0)` is the
    /// canvas center and `y` grows upwards.
    ///
    /// The z component is the projection distance, so the result is never
    /// the zero vector for a validated [`Config`].
    pub fn direction(&self, x: i32, y: i32) -> Vec3 {
        Vec3::new(
            x as f32 * self.width / self.canvas_width,
            y as f32 * self.height / self.canvas_height,
            self.distance,
        )
    }
}
