/// Closed range `[min, max]`, used both for accepted ray parameters and for
/// the extent of a box along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Contains nothing; the identity for [`Interval::hull`].
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    pub const UNIVERSE: Interval = Interval {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// `[min, +inf)`, the usual range for a fresh ray query.
    pub const fn from_min(min: f32) -> Self {
        Self::new(min, f32::INFINITY)
    }

    pub fn length(&self) -> f32 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Endpoints included.
    pub fn contains(&self, x: f32) -> bool {
        x >= self.min && x <= self.max
    }

    /// Endpoints excluded.
    pub fn surrounds(&self, x: f32) -> bool {
        x > self.min && x < self.max
    }

    /// Widens to `length() + width`, centred on the same midpoint.
    pub fn padded(&self, width: f32) -> Interval {
        let half = 0.5 * width;
        Interval::new(self.min - half, self.max + half)
    }

    pub fn shifted(&self, offset: f32) -> Interval {
        Interval::new(self.min + offset, self.max + offset)
    }

    pub fn hull(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::EMPTY
    }
}
