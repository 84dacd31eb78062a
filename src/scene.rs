use glam::Vec3;

use crate::color::Color;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SceneError {
    #[error("sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),
    #[error("sphere center must be finite, got {0}")]
    NonFiniteCenter(Vec3),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    color: Color,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, color: Color) -> Result<Self, SceneError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SceneError::InvalidRadius(radius));
        }
        if !center.is_finite() {
            return Err(SceneError::NonFiniteCenter(center));
        }
        Ok(Self {
            center,
            radius,
            color,
        })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

/// Fixed, ordered set of spheres. Order decides ties between equal hits.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    spheres: Box<[Sphere]>,
}

impl Scene {
    pub fn new(spheres: impl Into<Box<[Sphere]>>) -> Self {
        Self {
            spheres: spheres.into(),
        }
    }

    /// Red, blue and green unit spheres in front of the origin.
    pub fn preset() -> Result<Self, SceneError> {
        Ok(Self::new([
            Sphere::new(Vec3::new(0.0, -1.0, 3.0), 1.0, Color::RED)?,
            Sphere::new(Vec3::new(2.0, 0.0, 4.0), 1.0, Color::BLUE)?,
            Sphere::new(Vec3::new(-2.0, 0.0, 4.0), 1.0, Color::GREEN)?,
        ]))
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sphere> {
        self.spheres.iter()
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}
