//! Thin-lens camera with a shutter interval.

use kiln_math::{Ray, Vec3};
use rand::RngCore;

use crate::sampling::{gen_f32, random_in_unit_disk};

/// Camera that maps normalized image coordinates to primary rays.
#[derive(Clone, Debug)]
pub struct Camera {
    // Positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens
    vfov: f32,       // Vertical field of view in degrees
    aperture: f32,   // Lens diameter; 0 is a pinhole
    focus_dist: f32, // Distance to the plane of perfect focus
    aspect: f32,     // Width over height

    // Shutter
    time0: f32,
    time1: f32,

    // Cached by initialize()
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Camera at the origin looking down -Z with a 90 degree field of view.
    pub fn new() -> Self {
        let mut camera = Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aperture: 0.0,
            focus_dist: 1.0,
            aspect: 1.0,
            time0: 0.0,
            time1: 1.0,
            origin: Vec3::ZERO,
            lower_left_corner: Vec3::ZERO,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            lens_radius: 0.0,
        };
        camera.initialize();
        camera
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, aperture: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the image aspect ratio (width / height).
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Set the interval primary ray times are drawn from.
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    pub fn shutter(&self) -> (f32, f32) {
        (self.time0, self.time1)
    }

    /// Recompute the view frame. Must be called after any `with_*` setter.
    pub fn initialize(&mut self) {
        let theta = self.vfov.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = self.aspect * half_height;

        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        self.origin = self.look_from;
        self.lens_radius = self.aperture / 2.0;
        self.lower_left_corner = self.origin
            - half_width * self.focus_dist * self.u
            - half_height * self.focus_dist * self.v
            - self.focus_dist * self.w;
        self.horizontal = 2.0 * half_width * self.focus_dist * self.u;
        self.vertical = 2.0 * half_height * self.focus_dist * self.v;
    }

    /// Primary ray through image-plane point `(s, t)`, where `(0, 0)` is the
    /// bottom-left corner and `(1, 1)` the top-right.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius <= 0.0 {
            Vec3::ZERO
        } else {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        };

        let time = if self.time1 > self.time0 {
            self.time0 + gen_f32(rng) * (self.time1 - self.time0)
        } else {
            self.time0
        };

        let origin = self.origin + offset;
        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(origin, target - origin, time)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
