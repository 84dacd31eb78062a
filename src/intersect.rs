use crate::{ray::Ray, scene::Sphere};

/// Both solutions of the ray/sphere quadratic, in solving order.
///
/// `t1` uses `+sqrt(discriminant)` and `t2` uses `-sqrt(discriminant)`, so
/// `t1 >= t2` whenever the direction is non-zero. They are equal for a
/// tangent ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roots {
    pub t1: f32,
    pub t2: f32,
}

impl Roots {
    pub fn iter(&self) -> impl Iterator<Item = f32> {
        [self.t1, self.t2].into_iter()
    }
}

/// Solves `|origin + t * direction - center|^2 = radius^2` for `t`.
///
/// Returns `None` when the ray misses the sphere. The ray direction must be
/// non-zero; a zero direction divides by zero and yields non-finite roots.
pub fn intersect_ray_sphere(ray: &Ray, sphere: &Sphere) -> Option<Roots> {
    // (d.d)t^2 + 2(oc.d)t + (oc.oc - r^2) = 0
    let oc = ray.origin - sphere.center();
    let a = ray.direction.dot(ray.direction);
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - sphere.radius() * sphere.radius();

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    Some(Roots {
        t1: (-b + sqrt_d) / (2.0 * a),
        t2: (-b - sqrt_d) / (2.0 * a),
    })
}
