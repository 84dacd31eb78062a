use crate::{
    color::Color,
    intersect::intersect_ray_sphere,
    ray::{Interval, Ray},
    scene::{Scene, Sphere},
};

/// Nearest accepted intersection of a ray with the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit<'s> {
    pub t: f32,
    /// Position of `sphere` in scene order.
    pub index: usize,
    pub sphere: &'s Sphere,
}

/// Flat-shaded visibility queries against a read-only scene.
#[derive(Debug, Clone, Copy)]
pub struct Tracer<'s> {
    scene: &'s Scene,
    background: Color,
}

impl<'s> Tracer<'s> {
    pub fn new(scene: &'s Scene, background: Color) -> Self {
        Self { scene, background }
    }

    /// Brute force scan of every sphere and both of its roots.
    ///
    /// Only a strictly smaller `t` replaces the current best, so on exact
    /// ties the sphere that comes first in the scene wins.
    pub fn closest_hit(&self, ray: &Ray, window: Interval) -> Option<Hit<'s>> {
        let mut closest: Option<Hit<'s>> = None;
        let mut closest_t = f32::INFINITY;

        for (index, sphere) in self.scene.iter().enumerate() {
            let Some(roots) = intersect_ray_sphere(ray, sphere) else {
                continue;
            };
            for t in roots.iter() {
                if window.surrounds(t) && t < closest_t {
                    closest_t = t;
                    closest = Some(Hit { t, index, sphere });
                }
            }
        }

        closest
    }

    pub fn trace(&self, ray: &Ray, window: Interval) -> Color {
        self.closest_hit(ray, window)
            .map_or(self.background, |hit| hit.sphere.color())
    }
}
