use crate::Vec3;

/// Orthonormal basis `(u, v, w)` with `w` along a chosen axis, usually a
/// surface normal. Used to express locally sampled directions in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onb {
    axis: [Vec3; 3],
}

impl Onb {
    /// Builds a basis whose `w` axis is `n` normalized.
    pub fn from_w(n: Vec3) -> Self {
        let w = n.normalize();
        // Any helper not parallel to w will do
        let a = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(a).normalize();
        let u = w.cross(v);
        Self { axis: [u, v, w] }
    }

    #[inline]
    pub fn u(&self) -> Vec3 {
        self.axis[0]
    }

    #[inline]
    pub fn v(&self) -> Vec3 {
        self.axis[1]
    }

    #[inline]
    pub fn w(&self) -> Vec3 {
        self.axis[2]
    }

    /// Converts local coordinates `(a, b, c)` into world space.
    #[inline]
    pub fn local(&self, a: Vec3) -> Vec3 {
        a.x * self.u() + a.y * self.v() + a.z * self.w()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(onb: &Onb) {
        for axis in [onb.u(), onb.v(), onb.w()] {
            assert!((axis.length() - 1.0).abs() < 1e-5);
        }
        assert!(onb.u().dot(onb.v()).abs() < 1e-5);
        assert!(onb.v().dot(onb.w()).abs() < 1e-5);
        assert!(onb.w().dot(onb.u()).abs() < 1e-5);
    }

    #[test]
    fn test_onb_is_orthonormal() {
        for n in [
            Vec3::X,
            Vec3::Y,
            -Vec3::Z,
            Vec3::new(0.3, -2.0, 5.0),
            Vec3::new(0.95, 0.1, 0.0),
        ] {
            let onb = Onb::from_w(n);
            assert_orthonormal(&onb);
            assert!((onb.w() - n.normalize()).length() < 1e-5);
        }
    }

    #[test]
    fn test_onb_local_maps_z_to_w() {
        let onb = Onb::from_w(Vec3::new(1.0, 1.0, 0.0));
        let world = onb.local(Vec3::Z);
        assert!((world - onb.w()).length() < 1e-6);
    }
}
