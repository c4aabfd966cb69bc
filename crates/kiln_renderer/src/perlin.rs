//! Perlin gradient noise.
//!
//! The lattice tables are built once from a caller-supplied RNG and never
//! change afterwards, so one generator can be shared by every texture (and
//! thread) that needs it.

use kiln_math::Vec3;
use rand::seq::SliceRandom;
use rand::RngCore;

use crate::sampling::gen_range;

const POINT_COUNT: usize = 256;

/// Default octave count for [`Perlin::turbulence`].
pub const DEFAULT_TURBULENCE_DEPTH: u32 = 7;

pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT)
            .map(|_| {
                Vec3::new(
                    gen_range(rng, -1.0, 1.0),
                    gen_range(rng, -1.0, 1.0),
                    gen_range(rng, -1.0, 1.0),
                )
                .normalize_or_zero()
            })
            .collect();

        Self {
            gradients,
            perm_x: generate_permutation(rng),
            perm_y: generate_permutation(rng),
            perm_z: generate_permutation(rng),
        }
    }

    /// Smooth noise in roughly [-1, 1]; identical points give identical values.
    pub fn noise(&self, p: Vec3) -> f32 {
        let u = p.x - p.x.floor();
        let v = p.y - p.y.floor();
        let w = p.z - p.z.floor();

        let i = p.x.floor() as i32;
        let j = p.y.floor() as i32;
        let k = p.z.floor() as i32;

        let mut c = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in c.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, cell) in row.iter_mut().enumerate() {
                    let index = self.perm_x[lattice(i, di)]
                        ^ self.perm_y[lattice(j, dj)]
                        ^ self.perm_z[lattice(k, dk)];
                    *cell = self.gradients[index];
                }
            }
        }

        trilinear_interpolation(&c, u, v, w)
    }

    /// Sum of `depth` octaves with halving weight, as an absolute value.
    pub fn turbulence(&self, p: Vec3, depth: u32) -> f32 {
        let mut accumulation = 0.0;
        let mut weight = 1.0;
        let mut temp_p = p;

        for _ in 0..depth {
            accumulation += weight * self.noise(temp_p);
            weight *= 0.5;
            temp_p *= 2.0;
        }

        accumulation.abs()
    }
}

#[inline]
fn lattice(base: i32, offset: usize) -> usize {
    (base.wrapping_add(offset as i32) & (POINT_COUNT as i32 - 1)) as usize
}

fn generate_permutation(rng: &mut dyn RngCore) -> Vec<usize> {
    let mut p: Vec<usize> = (0..POINT_COUNT).collect();
    p.shuffle(rng);
    p
}

/// Hermite-smoothed trilinear blend of the gradient dot products.
fn trilinear_interpolation(c: &[[[Vec3; 2]; 2]; 2], u: f32, v: f32, w: f32) -> f32 {
    let uu = u * u * (3.0 - 2.0 * u);
    let vv = v * v * (3.0 - 2.0 * v);
    let ww = w * w * (3.0 - 2.0 * w);

    let mut accumulation = 0.0;
    for (i, plane) in c.iter().enumerate() {
        let fi = i as f32;
        for (j, row) in plane.iter().enumerate() {
            let fj = j as f32;
            for (k, gradient) in row.iter().enumerate() {
                let fk = k as f32;
                let weight = Vec3::new(u - fi, v - fj, w - fk);
                accumulation += (fi * uu + (1.0 - fi) * (1.0 - uu))
                    * (fj * vv + (1.0 - fj) * (1.0 - vv))
                    * (fk * ww + (1.0 - fk) * (1.0 - ww))
                    * gradient.dot(weight);
            }
        }
    }
    accumulation
}
