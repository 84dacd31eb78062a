use glam::Vec3;

use crate::color::Color;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("canvas size must be even and non-zero, got {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },
    #[error("viewport size must be positive and finite, got {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },
    #[error("projection plane distance must be positive and finite, got {0}")]
    InvalidProjectionDistance(f32),
    #[error("ray window ({t_min}, {t_max}) is empty")]
    EmptyRayWindow { t_min: f32, t_max: f32 },
    #[error("target frame rate must be non-zero")]
    ZeroFrameRate,
}

/// Static text drawn on top of every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    pub x: i32,
    pub y: i32,
    pub size: u32,
    pub color: Color,
}

/// Immutable render settings shared by every component.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Depth of the projection plane in front of the camera.
    pub projection_distance: f32,
    pub camera_position: Vec3,
    pub t_min: f32,
    pub t_max: f32,
    pub background: Color,
    pub clear_color: Color,
    pub caption: Caption,
    pub title: String,
    pub target_fps: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            canvas_width: 600,
            canvas_height: 600,
            viewport_width: 1.0,
            viewport_height: 1.0,
            projection_distance: 1.0,
            camera_position: Vec3::ZERO,
            t_min: 1.0,
            t_max: f32::INFINITY,
            background: Color::RAYWHITE,
            clear_color: Color::BLACK,
            caption: Caption {
                text: "Chapter 2: Flat shading".to_owned(),
                x: 10,
                y: 10,
                size: 18,
                color: Color::GRAY,
            },
            title: "CG from Scratch Book by Varomix".to_owned(),
            target_fps: 60,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let canvas_ok = |extent: u32| extent > 0 && extent % 2 == 0;
        if !canvas_ok(self.canvas_width) || !canvas_ok(self.canvas_height) {
            return Err(ConfigError::InvalidCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }

        let positive = |value: f32| value.is_finite() && value > 0.0;
        if !positive(self.viewport_width) || !positive(self.viewport_height) {
            return Err(ConfigError::InvalidViewport {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        if !positive(self.projection_distance) {
            return Err(ConfigError::InvalidProjectionDistance(
                self.projection_distance,
            ));
        }

        // NaN bounds fail this comparison too.
        if !(self.t_min < self.t_max) {
            return Err(ConfigError::EmptyRayWindow {
                t_min: self.t_min,
                t_max: self.t_max,
            });
        }

        if self.target_fps == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }

        Ok(())
    }

    pub fn half_width(&self) -> i32 {
        (self.canvas_width / 2) as i32
    }

    pub fn half_height(&self) -> i32 {
        (self.canvas_height / 2) as i32
    }
}
