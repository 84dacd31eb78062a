use crate::ray::Ray;

/// Fixed eye point. Every primary ray starts here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: glam::Vec3,
}

impl Camera {
    pub fn new(eye: glam::Vec3) -> Self {
        Self { eye }
    }

    pub fn ray(&self, direction: glam::Vec3) -> Ray {
        Ray::new(self.eye, direction)
    }
}
