use crate::Vec3;

/// A ray with origin, direction and the time at which it exists.
///
/// The direction is not normalized; hit distances are expressed in units of
/// its length. `time` selects the position of moving geometry.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub time: f32,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0), 0.0);

        assert_eq!(ray.at(0.0), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(ray.at(1.5), Vec3::new(1.0, 3.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(1.0, -2.0, 0.0));
    }

    #[test]
    fn test_ray_keeps_time() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z, 0.25);
        assert_eq!(ray.time(), 0.25);
        assert_eq!(ray.direction(), Vec3::Z);
    }
}
