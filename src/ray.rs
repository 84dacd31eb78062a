use glam::Vec3;

/// Half-line `origin + t * direction`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }
}

/// Open interval `(min, max)` of accepted ray parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Both bounds are exclusive.
    pub fn surrounds(&self, t: f32) -> bool {
        self.min < t && t < self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_excludes_bounds() {
        let window = Interval::new(1.0, f32::INFINITY);
        assert!(!window.surrounds(1.0));
        assert!(window.surrounds(1.0001));
        assert!(window.surrounds(1.0e30));
        assert!(!window.surrounds(f32::INFINITY));
        assert!(!window.surrounds(f32::NAN));
    }
}
