//! What the integrator traces against.

use std::sync::Arc;

use kiln_math::Color;

use crate::hittable::Primitive;

/// Root primitive, optional light target and the radiance of rays that
/// escape.
#[derive(Clone)]
pub struct Scene {
    pub world: Arc<Primitive>,
    /// Primitive sampled for next-event directions, typically a list of the
    /// emitters. Without one, bounces sample their material only.
    pub lights: Option<Arc<Primitive>>,
    pub background: Color,
}

impl Scene {
    /// Scene with no light target and a black background.
    pub fn new(world: Arc<Primitive>) -> Self {
        Self {
            world,
            lights: None,
            background: Color::ZERO,
        }
    }

    pub fn with_lights(mut self, lights: Arc<Primitive>) -> Self {
        self.lights = Some(lights);
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }
}
